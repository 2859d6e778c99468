pub mod catalog;
pub mod config;
pub mod error;
pub mod keyword;
pub mod types;

pub use catalog::{MetricTypeSelection, TagColor, TypeBadge, type_badge};
pub use config::MetadexConfig;
pub use error::{ConfigError, ConfigResult};
pub use keyword::wrap_keyword;
pub use types::*;
