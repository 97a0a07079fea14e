use thiserror::Error;

use super::config::ConfigError;
use crate::core::layout::LayoutError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Malformed record: {source}")]
    Layout {
        #[from]
        source: LayoutError,
    },

    #[error("Population is empty; nothing to reduce")]
    EmptyPopulation,

    #[error("Search phase '{phase}' failed: {reason}")]
    PhaseFailed { phase: &'static str, reason: String },
}
