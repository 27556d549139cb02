//! Domain-level error type for the live draft coordinator.
//!
//! HTTP- and DB-agnostic. Route handlers return
//! `Result<T, crate::error::AppError>` and convert with the provided
//! `From<DraftError> for AppError` implementation; the draft room reports
//! these to the offending connection only.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// The submitting participant does not own the open turn's team.
    #[error("not your turn to pick")]
    NotYourTurn,

    /// The movie is already assigned somewhere in this league's picks,
    /// or the commit lost a race against a concurrent commit.
    #[error("movie already drafted")]
    MovieAlreadyDrafted,

    /// No unassigned pick remains; the draft is complete.
    #[error("no open pick remains")]
    NoOpenTurn,

    /// The league has no draft in progress.
    #[error("no draft in progress for this league")]
    RoomNotFound,

    /// Auto-pick found no rankable movie. A league catalog smaller than the
    /// pick board is a configuration error, not a recoverable state.
    #[error("no draftable movie left in the catalog")]
    EmptyCatalog,

    /// A durable write or read failed. The commit transaction guarantees no
    /// partial effect; the turn stays open for retry.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<sea_orm::DbErr> for DraftError {
    fn from(e: sea_orm::DbErr) -> Self {
        DraftError::Storage(e.to_string())
    }
}
