pub mod error;
pub mod index;
pub mod persist;

pub use error::VectorError;
pub use index::VectorStore;
pub use persist::{load, save};
