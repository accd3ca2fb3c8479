// Profile setup and the session gate that decides which part of the app a user sees.

pub mod gate;
pub mod handlers;
