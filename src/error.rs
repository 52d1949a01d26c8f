//! Error types for chakra-odom

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// chakra-odom error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected calibration input (non-positive diameter, track width,
    /// counts-per-revolution, or re-base threshold)
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse error
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration file serialize error
    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
