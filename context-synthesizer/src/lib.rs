pub mod assemble;
pub mod budget;
pub mod classify;
pub mod error;
pub mod priorities;
pub mod sufficiency;

pub use assemble::{synthesize, EntityContextInput, SynthesizeInput};
pub use classify::classify;
pub use error::ContextError;
pub use priorities::section_priority;
pub use sufficiency::{sufficiency_score, SufficiencyInputs};
