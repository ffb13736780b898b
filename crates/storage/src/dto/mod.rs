pub mod common;
pub mod competition;
pub mod liveranking;
pub mod participant;
pub mod run;
pub mod scale;
