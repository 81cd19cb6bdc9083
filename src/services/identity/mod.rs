pub mod client;
pub mod factory;
pub mod http;

pub use client::{IdentityClient, IdentityError, IdentityResult, UserIdentity};
pub use factory::build_identity_client;
pub use http::HttpIdentityClient;
