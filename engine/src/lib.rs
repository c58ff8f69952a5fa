pub mod assignment;
pub mod config;
pub mod elimination;
pub mod gameplay;
pub mod match_session;
pub mod night;
pub mod persistence;
pub mod roster;
pub mod session;
pub mod setup;
pub mod win;

pub use assignment::start_game;
pub use config::{AppConfig, ConfigError};
pub use gameplay::{run_match, start_match, LogObserver, MatchReport};
pub use match_session::MatchSession;
pub use persistence::DurabilityLog;
pub use roster::FrequentPlayers;
pub use session::{Command, SessionState};
pub use setup::{suggest_balanced_setup, validate, SetupDraft};
