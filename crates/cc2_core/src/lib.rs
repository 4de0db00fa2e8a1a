pub mod codec;
pub mod core_api;
