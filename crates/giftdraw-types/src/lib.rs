pub mod api;
pub mod models;
pub mod random;

pub use models::{DrawPolicy, Participant, TargetRef};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
