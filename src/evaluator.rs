//! Drives the full pipeline: fetch each source, parse what arrives, then
//! aggregate whatever survived into one evaluation.

use tracing::{debug, warn};

use crate::fetch::{HttpClient, fetch_text};
use crate::parser::parse_records;
use crate::record::SpeechRecord;
use crate::stats::{Evaluation, StatsConfig};

/// Owns the HTTP client and aggregation config for the lifetime of the
/// service. One instance serves every request.
pub struct Evaluator<C> {
    client: C,
    config: StatsConfig,
}

impl<C: HttpClient> Evaluator<C> {
    pub fn new(client: C, config: StatsConfig) -> Self {
        Self { client, config }
    }

    /// Evaluates the statistics over every location in `locations`.
    ///
    /// Sources are fetched one after another; a source that cannot be
    /// fetched or parsed contributes nothing and the rest still count.
    /// Never fails: with no locations, or none usable, every statistic
    /// comes back absent.
    #[tracing::instrument(skip(self, locations), fields(sources = locations.len()))]
    pub async fn evaluate(&self, locations: &[String]) -> Evaluation {
        if locations.is_empty() {
            warn!("no source locations supplied");
            return Evaluation::default();
        }

        let mut combined: Vec<SpeechRecord> = Vec::new();
        for location in locations {
            let Some(content) = fetch_text(&self.client, location).await else {
                continue;
            };
            let Some(records) = parse_records(&content) else {
                continue;
            };
            combined.extend(records);
        }

        debug!(record_count = combined.len(), "combined records ready for aggregation");
        Evaluation::from_records(&combined, &self.config)
    }
}
