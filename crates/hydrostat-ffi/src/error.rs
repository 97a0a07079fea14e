use crate::HydrostatStatus;
use hydrostat::core::layout::LayoutError;
use hydrostat::engine::config::ConfigError;
use hydrostat::engine::error::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FfiError>;

#[derive(Debug, Error)]
pub enum FfiError {
    #[error("Null pointer passed as '{0}'")]
    NullPointer(&'static str),

    #[error("Buffer '{name}' holds {found} bytes, but {expected} are required")]
    BufferTooSmall {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Global {0} is already initialized")]
    AlreadyInitialized(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FfiError {
    pub fn status(&self) -> HydrostatStatus {
        match self {
            FfiError::NullPointer(_) => HydrostatStatus::NullPointer,
            FfiError::BufferTooSmall { .. } => HydrostatStatus::BufferTooSmall,
            FfiError::Layout(_) | FfiError::Engine(EngineError::Layout { .. }) => {
                HydrostatStatus::InvalidLayout
            }
            FfiError::Config(_) | FfiError::Engine(EngineError::Config { .. }) | FfiError::Io(_) => {
                HydrostatStatus::InvalidConfig
            }
            FfiError::AlreadyInitialized(_) => HydrostatStatus::AlreadyInitialized,
            FfiError::Engine(_) => HydrostatStatus::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_their_status_codes() {
        let too_small = FfiError::BufferTooSmall {
            name: "models_out",
            expected: 888,
            found: 10,
        };
        assert_eq!(too_small.status(), HydrostatStatus::BufferTooSmall);
        assert_eq!(
            FfiError::from(ConfigError::MissingParameter("seed")).status(),
            HydrostatStatus::InvalidConfig
        );
        assert_eq!(
            FfiError::from(EngineError::from(LayoutError::BufferSize {
                expected: 816,
                found: 0
            }))
            .status(),
            HydrostatStatus::InvalidLayout
        );
        assert_eq!(
            FfiError::from(EngineError::from(ConfigError::MissingParameter("seed"))).status(),
            HydrostatStatus::InvalidConfig
        );
        assert_eq!(
            FfiError::from(EngineError::EmptyPopulation).status(),
            HydrostatStatus::Internal
        );
    }

    #[test]
    fn buffer_error_names_the_buffer() {
        let error = FfiError::BufferTooSmall {
            name: "groups_out",
            expected: 1776,
            found: 888,
        };
        assert_eq!(
            error.to_string(),
            "Buffer 'groups_out' holds 888 bytes, but 1776 are required"
        );
    }
}
