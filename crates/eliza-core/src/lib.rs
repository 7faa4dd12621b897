pub mod config;
pub mod error;
pub mod events;
pub mod response_data;
pub mod types;

pub use config::ElizaConfig;
pub use error::{ElizaError, Result};
pub use events::DialogEvent;
pub use response_data::{ResponseData, VerbForms};
pub use types::*;
