//! Report generation for a scored repository
//!
//! A run produces a single NDJSON line: one flat JSON object holding the input URL, the
//! net score, and each sub-metric's score and latency. Ramp-up fields appear only when
//! ramp-up was measured.

mod ndjson;

pub use ndjson::generate as generate_ndjson;
