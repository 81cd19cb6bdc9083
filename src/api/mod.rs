pub mod debug;
pub mod v1;
