//! Game tracking: player registration, set recording and leaderboards

pub mod players;
pub mod rankings;
pub mod recorder;

pub use players::PlayerDirectory;
pub use rankings::RankingAggregator;
pub use recorder::{validate_submission, MatchRecorder, MAX_GAMES_PER_SET, MIN_GAMES_PER_SET};
