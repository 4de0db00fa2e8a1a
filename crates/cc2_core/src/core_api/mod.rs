mod engine;
mod error;
mod json;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{SaveFormat, Snapshot};
