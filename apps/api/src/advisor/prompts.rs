// All LLM prompt templates for the advisor module.
// Placeholders in `{braces}` are filled in one pass by `fill_template`.

/// Replace: {skills}, {goals}, {education}, {bio}, {format}
pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"As a career guidance AI, analyze this profile and provide exactly 5 personalized career recommendations in JSON format.

Profile:
- Skills: {skills}
- Career Goals: {goals}
- Education: {education}
- Bio: {bio}

Provide a JSON array of 5 career recommendations. Each should have:
- career_title: specific job role name
- summary: 2-3 sentence role description
- market_demand: current market analysis
- confidence_score: number 60-95
- required_skills: array of 5-8 key skills
- salary_range: realistic range
- growth_outlook: future predictions

{format}"#;

/// Replace: {career_title}, {current_skills}, {required_skills}, {format}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a detailed learning roadmap for becoming a {career_title}.

Current Skills: {current_skills}
Required Skills: {required_skills}

Provide 8-12 learning milestones in JSON format. Each milestone should have:
- title: clear milestone name
- description: what will be learned
- difficulty_level: Beginner/Intermediate/Advanced/Expert
- estimated_duration: realistic timeframe
- resource_links: array of 3-5 learning resources with title, url, and type (course/documentation/tutorial/project)
- certification_paths: array of relevant certifications

{format}"#;

/// Replace: {career_title}, {current_skills}, {missing_skills}, {format}
pub const SKILL_GAP_PROMPT_TEMPLATE: &str = r#"Analyze skill gaps for {career_title} role.

Current Skills: {current_skills}
Missing Skills: {missing_skills}

For each missing skill, provide:
- missing_skill: skill name
- importance: Critical/High/Medium/Low
- course_suggestions: array of 2-4 courses with title, provider, and realistic url

{format}"#;

pub const MENTOR_PERSONA: &str = "You are a professional career mentor AI. Your role is to provide career guidance, mentorship, and advice. Stay focused on career-related topics including:
- Career path recommendations
- Skill development strategies
- Job search and interview preparation
- Professional growth and networking
- Industry trends and insights
- Work-life balance and career transitions

Keep responses concise, actionable, and supportive. If asked about non-career topics, politely redirect to career-related discussions.";

/// Replace: {persona}, {history}, {message}
pub const MENTOR_PROMPT_TEMPLATE: &str = "{persona}\n\nConversation history:\n{history}\n\nUser: {message}\n\nAssistant:";

/// Fixed reply when the mentor cannot be reached.
pub const MENTOR_APOLOGY: &str = "I apologize, but I encountered an error. Please try again.";
