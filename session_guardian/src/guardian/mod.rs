mod config;
mod errors;
mod main;
mod types;

pub use config::GuardianSettings;
pub use errors::GuardianError;
pub use main::{Guardian, GuardianHandle, Redirector, spawn_guardian};
pub use types::{
    GuardianExit, GuardianState, LogoutReason, RefreshFailure, TickOutcome, ValidationPolicy,
};
