pub mod action;
pub mod error;
pub mod event;
pub mod house_rules;
pub mod notification;
pub mod phase;
pub mod player;
pub mod role;
pub mod role_count;

pub use action::{Action, Step, StepKind};
pub use error::{GameError, StateError, ValidationError};
pub use event::{EliminationMethod, EventKind, GameEvent};
pub use house_rules::{HouseRules, MAX_PHASE_TIMER_SECONDS};
pub use notification::{dispatch, MatchObserver, Notification, Outcome};
pub use phase::{NightStage, Phase};
pub use player::{Player, PublicInfo, PublicPlayerState, RosterEntry, Strategy};
pub use role::{Alignment, RoleCatalog, RoleDefinition, RoleId};
pub use role_count::{builtin_presets, RoleCount, RoleCounts, RolePreset};
