pub mod auth;
pub mod debug_env;
pub mod identity;
