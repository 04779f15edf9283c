pub mod api;
pub mod evaluator;
pub mod fetch;
pub mod parser;
pub mod record;
pub mod stats;
