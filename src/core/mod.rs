// Core infrastructure module
// Data model, errors and configuration that other modules depend on

pub mod app_config;
pub mod candidate;
pub mod error;
pub mod outcome;
pub mod settings;
pub mod user_config;

pub use app_config::AppConfig;
pub use candidate::{Destination, DestinationTarget, TransferCandidate};
pub use error::ReconcileError;
pub use outcome::{
    BatchSummary, FreshnessDecision, ReconcileReport, ReconcileState, SkipReason, TransferOutcome,
};
pub use settings::{Settings, SettingsOverrides};
pub use user_config::UserConfig;
