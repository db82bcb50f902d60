mod config;
pub mod logging;
pub mod types;
mod validate;

pub use config::HplConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use types::{EntityConfig, ParserConfig, SyntaxErrors};
