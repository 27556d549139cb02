//! Draft coordinator configuration.
//!
//! Environment variables must be set by the runtime environment; every knob
//! has a production default matching the original league rules.

use crate::error::AppError;

const DEFAULT_PICK_SECONDS: u64 = 90;
const DEFAULT_ROUNDS: u32 = 15;

#[derive(Debug, Clone, Copy)]
pub struct DraftConfig {
    /// Wall-clock budget for one pick before auto-pick kicks in.
    pub pick_seconds: u64,
    /// Number of snake rounds built at draft start.
    pub rounds: u32,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            pick_seconds: DEFAULT_PICK_SECONDS,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl DraftConfig {
    /// Read `FML_PICK_SECONDS` and `FML_DRAFT_ROUNDS`, falling back to the
    /// defaults when unset.
    pub fn from_env() -> Result<Self, AppError> {
        let pick_seconds = match std::env::var("FML_PICK_SECONDS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| AppError::config(format!("FML_PICK_SECONDS must be a number, got {raw:?}")))?,
            Err(_) => DEFAULT_PICK_SECONDS,
        };
        let rounds = match std::env::var("FML_DRAFT_ROUNDS") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| AppError::config(format!("FML_DRAFT_ROUNDS must be a number, got {raw:?}")))?,
            Err(_) => DEFAULT_ROUNDS,
        };
        if pick_seconds == 0 {
            return Err(AppError::config("FML_PICK_SECONDS must be positive"));
        }
        if rounds == 0 {
            return Err(AppError::config("FML_DRAFT_ROUNDS must be positive"));
        }
        Ok(Self {
            pick_seconds,
            rounds,
        })
    }
}
