pub mod competition;
pub mod liveranking;
pub mod participant;
pub mod run;
pub mod scale;
pub mod user;

pub use competition::CompetitionRepository;
pub use liveranking::LiverankingRepository;
pub use participant::ParticipantRepository;
pub use run::RunRepository;
pub use scale::ScaleRepository;
pub use user::UserRepository;
