pub mod error;
pub mod config;
pub mod topology;
pub mod lattice;
pub mod dynamics;
pub mod observables;
pub mod detector;
pub mod observer;
pub mod measure;
pub mod ensemble;
pub mod report;
pub mod render;
pub mod utils;

pub use config::{SeedPolicy, SimConfig};
pub use ensemble::{run_ensemble, Ensemble, EnsembleResult, TrialOutcome, TrialStatus};
pub use error::IsingError;
