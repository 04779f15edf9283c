//! Thin HTTP surface over the evaluation pipeline.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::evaluator::Evaluator;
use crate::fetch::HttpClient;
use crate::stats::Evaluation;

/// Builds the service router around a shared evaluator.
pub fn router<C: HttpClient + 'static>(evaluator: Arc<Evaluator<C>>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/statistics/evaluation", get(get_evaluation::<C>))
        .with_state(evaluator)
}

/// `GET /statistics/evaluation?url=...&url=...`
///
/// Always answers 200 with an evaluation body; unusable sources degrade
/// the result toward absent fields instead of failing the request.
async fn get_evaluation<C: HttpClient + 'static>(
    State(evaluator): State<Arc<Evaluator<C>>>,
    RawQuery(query): RawQuery,
) -> Json<Evaluation> {
    let locations = query.as_deref().map(url_params).unwrap_or_default();
    Json(evaluator.evaluate(&locations).await)
}

/// Collects every `url` parameter in query order. The typed `Query`
/// extractor keeps only the last repeated key, so the raw query string is
/// parsed instead.
fn url_params(query: &str) -> Vec<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .collect()
}
