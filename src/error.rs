// error.rs - Error type shared by the simulation core and its collaborators

use thiserror::Error;

/// Errors raised by configuration, initialization, reporting and rendering.
///
/// The dynamics themselves never fail: once a trial starts it always
/// completes, either by absorption or by reaching the sweep horizon.
#[derive(Debug, Error)]
pub enum IsingError {
    /// Rejected before any trial runs
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The rejection-sampling initializer exceeded its draw budget
    #[error("Balanced initialization did not finish after {draws} draws")]
    NonTerminatingInitialization { draws: usize },

    #[error("Expected {expected} snapshot frames, found {found}")]
    MissingFrames { found: usize, expected: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, IsingError>;
