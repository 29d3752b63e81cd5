//! Data models for cohort analytics

pub mod column;
pub mod period;
pub mod record;
pub mod status;
pub mod table;

pub use column::Column;
pub use period::Period;
pub use record::StudentRecord;
pub use status::{Status, Vocabulary, VocabularyChoice};
pub use table::Table;
