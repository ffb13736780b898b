pub mod competition;
pub mod liveranking;
pub mod participant;
pub mod role;
pub mod run;
pub mod scale;
pub mod user;

pub use competition::{Competition, NewCompetition};
pub use liveranking::{LiverankingEntry, RunTotals};
pub use participant::{Gender, Participant};
pub use role::{Role, RoleSet};
pub use run::{DOOR_COUNT, Doors, NewRun, Run, RunDetails};
pub use scale::{DoorPoints, Scale, ZoneInfo};
pub use user::{NewUser, User};
