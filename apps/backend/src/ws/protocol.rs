//! Draft room wire protocol: a closed set of tagged variants, one per
//! message kind. Field names match the original browser client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Pick {
        #[serde(rename = "movieId")]
        movie_id: i64,
        #[serde(rename = "userId")]
        user_id: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// The currently open turn; sent to a joining connection and broadcast
    /// after every committed pick while turns remain.
    State {
        current_team: i64,
        current_pick: i32,
        round: i32,
    },

    /// Countdown progress; decorative only.
    Timer { seconds: u64 },

    /// A committed pick.
    Pick {
        team_id: i64,
        movie_id: i64,
        movie_title: String,
        auto: bool,
        remaining: u64,
    },

    DraftComplete,

    /// Reported to the offending connection only, never broadcast.
    Error { message: String },
}
