//! Record type shared by the parser and the aggregation engine.

use chrono::NaiveDate;
use std::collections::HashMap;

/// One normalized speech entry parsed from a CSV row.
///
/// A row only becomes a `SpeechRecord` if `date`, `speaker`, and
/// `word_count` all coerced successfully; the parser drops anything else
/// before aggregation ever sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRecord {
    pub date: NaiveDate,
    pub speaker: String,
    pub topic: String,
    pub word_count: u32,
    /// Columns not mapped to a known field, carried through untouched.
    pub extra: HashMap<String, String>,
}
