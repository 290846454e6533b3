use thiserror::Error;

/// Errors produced during a sampling run.
///
/// Startup-time failures (unreadable TLE, uncreatable log file) abort the run
/// before the loop starts. Any of these occurring inside a cycle body is
/// caught at the cycle boundary, logged, and the cycle abandoned.
#[derive(Error, Debug)]
pub enum SamplerError {
    /// Orbital propagation could not produce a ground position.
    #[error("orbital propagation failed: {0}")]
    Propagation(String),

    /// Magnetometer / heading read failed.
    #[error("sensor read failed: {0}")]
    Sensor(String),

    /// Camera capture failed.
    #[error("capture failed: {0}")]
    Capture(String),

    /// Solar geometry could not be computed for the requested time.
    #[error("solar ephemeris error: {0}")]
    Ephemeris(String),

    /// Brightness metadata for a stored photo slot is missing or unreadable.
    ///
    /// Distinct from a `false` night classification: this must surface as a
    /// cycle failure, never be treated as "not night".
    #[error("photo metadata for slot {slot} unreadable: {reason}")]
    Metadata { slot: u32, reason: String },

    /// Sample log serialization or append failed.
    #[error("sample log append failed: {0}")]
    Record(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sampling operations.
pub type Result<T> = std::result::Result<T, SamplerError>;
