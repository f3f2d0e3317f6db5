use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("no entities selected for context assembly")]
    NoEntities,
}
