//! Play history: one JSON line per finished game.

mod error;
mod models;
mod repository;

pub use error::StatsError;
pub use models::{GameRecord, RecordedOutcome, StatsSummary};
pub use repository::StatsRepository;
