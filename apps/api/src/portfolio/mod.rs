// Portfolio: projects and certifications the user showcases.

pub mod handlers;
pub mod items;
