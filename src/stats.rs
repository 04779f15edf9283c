//! Aggregation engine: groups speech records and derives the three
//! leaderboard statistics with a uniqueness-aware tie break.

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, warn};

use crate::record::SpeechRecord;

/// Fixed parameters of the aggregation engine. Service configuration, not
/// request inputs.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Year whose speech counts decide `mostSpeeches`.
    pub target_year: i32,
    /// Topic whose speech counts decide `mostSecurity`.
    pub target_topic: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            target_year: 2013,
            target_topic: "Internal Security".to_string(),
        }
    }
}

impl StatsConfig {
    /// Reads overrides for the built-in defaults from the environment
    /// (`STATS_TARGET_YEAR`, `STATS_TARGET_TOPIC`).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(year) = std::env::var("STATS_TARGET_YEAR") {
            match year.parse() {
                Ok(year) => config.target_year = year,
                Err(_) => warn!(value = %year, "ignoring unparsable STATS_TARGET_YEAR"),
            }
        }
        if let Ok(topic) = std::env::var("STATS_TARGET_TOPIC") {
            if !topic.trim().is_empty() {
                config.target_topic = topic;
            }
        }
        config
    }
}

/// The evaluation result: one optional winner per statistic.
///
/// A field is `None` when the statistic has no unique winner, either
/// because the extremal value is shared by several speakers or because
/// there was no data to rank. Serialized keys match the public wire
/// contract (`mostSpeeches` / `mostSecurity` / `leastWordy`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub most_speeches: Option<String>,
    pub most_security: Option<String>,
    pub least_wordy: Option<String>,
}

impl Evaluation {
    /// Derives all three statistics from the combined record set.
    ///
    /// Pure apart from diagnostic logging: element order never affects the
    /// result, and empty input yields all fields absent.
    pub fn from_records(records: &[SpeechRecord], config: &StatsConfig) -> Self {
        let speeches_in_year = count_by_speaker(
            records
                .iter()
                .filter(|r| r.date.year() == config.target_year),
        );
        debug!(year = config.target_year, counts = ?speeches_in_year, "speeches in target year");

        let speeches_on_topic =
            count_by_speaker(records.iter().filter(|r| r.topic == config.target_topic));
        debug!(topic = %config.target_topic, counts = ?speeches_on_topic, "speeches on target topic");

        let word_totals = sum_words_by_speaker(records);
        debug!(totals = ?word_totals, "word totals per speaker");

        Evaluation {
            most_speeches: unique_max(&speeches_in_year).map(str::to_owned),
            most_security: unique_max(&speeches_on_topic).map(str::to_owned),
            least_wordy: unique_min(&word_totals).map(str::to_owned),
        }
    }
}

/// Counts records per speaker over any record subset.
fn count_by_speaker<'a>(
    records: impl Iterator<Item = &'a SpeechRecord>,
) -> HashMap<&'a str, u64> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.speaker.as_str()).or_default() += 1;
    }
    counts
}

/// Sums word counts per speaker over all records.
fn sum_words_by_speaker(records: &[SpeechRecord]) -> HashMap<&str, u64> {
    let mut totals = HashMap::new();
    for record in records {
        *totals.entry(record.speaker.as_str()).or_default() += u64::from(record.word_count);
    }
    totals
}

/// Winner holding the highest aggregate, or `None` on a tie or no data.
fn unique_max<'a>(totals: &HashMap<&'a str, u64>) -> Option<&'a str> {
    sole_holder(totals, totals.values().copied().max()?)
}

/// Winner holding the lowest aggregate, or `None` on a tie or no data.
fn unique_min<'a>(totals: &HashMap<&'a str, u64>) -> Option<&'a str> {
    sole_holder(totals, totals.values().copied().min()?)
}

/// The shared tie-break rule: the key attaining `extremal`, provided
/// exactly one key does. An empty map never reaches this point (the
/// `max`/`min` calls above return `None` first), which is the vacuous
/// "no winner to report" case.
fn sole_holder<'a>(totals: &HashMap<&'a str, u64>, extremal: u64) -> Option<&'a str> {
    let mut holders = totals
        .iter()
        .filter(|(_, total)| **total == extremal)
        .map(|(speaker, _)| *speaker);
    let winner = holders.next()?;
    holders.next().is_none().then_some(winner)
}
