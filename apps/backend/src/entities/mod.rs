pub mod draft_picks;
pub mod leagues;
pub mod movies;
pub mod notifications;
pub mod rosters;
pub mod teams;
pub mod transactions;
