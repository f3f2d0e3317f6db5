//! Scanner, Parser Frontends, and Graph Builder (spec §4.1-§4.3): turns a
//! source tree into a resolved entity/relationship set ready for the
//! Knowledge Store.

pub mod analyze;
pub mod error;
pub mod frontend;
pub mod graph;
pub mod language;
pub mod scan;

pub use analyze::{analyze, AnalyzeOptions, AnalyzeResult};
pub use language::LanguageKind;
