use crate::config::ConfigError;
use planar_core::TransformError;

/// Error categories for the terminal front-end.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Terminal I/O: raw mode, event polling, drawing.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Stage matrices could not be built for a frame.
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// Log file or subscriber setup failed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}
