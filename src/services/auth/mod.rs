pub mod credential;
pub mod fingerprint;
pub mod resolver;

pub use credential::CookieNames;
pub use resolver::{ResolvedUser, UserResolver};
