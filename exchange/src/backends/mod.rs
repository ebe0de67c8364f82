//! Concrete [`GenerationBackend`](crate::backend::GenerationBackend) bridges.

#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "rig")]
pub mod rig_agent;

#[cfg(feature = "groq")]
pub use groq::GroqBackend;
#[cfg(feature = "rig")]
pub use rig_agent::RigBackend;
