use crate::Result;
use crate::metrics::{NetScoreResult, round3};
use core::fmt::Write;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Record<'a> {
    #[serde(rename = "URL")]
    url: &'a str,

    #[serde(rename = "NetScore")]
    net_score: f64,

    #[serde(rename = "licenseScore")]
    license_score: f64,
    license_latency: f64,

    #[serde(rename = "responsivenessScore")]
    responsiveness_score: f64,
    responsive_latency: f64,

    #[serde(rename = "correctnessScore")]
    correctness_score: f64,
    correctness_latency: f64,

    #[serde(rename = "rampUpScore", skip_serializing_if = "Option::is_none")]
    ramp_up_score: Option<f64>,
    #[serde(rename = "rampup_latency", skip_serializing_if = "Option::is_none")]
    ramp_up_latency: Option<f64>,
}

/// Write `result` as a single newline-terminated JSON object.
pub fn generate<W: Write>(url: &str, result: &NetScoreResult, writer: &mut W) -> Result<()> {
    let record = Record {
        url,
        net_score: round3(result.net_score),
        license_score: result.license.score(),
        license_latency: result.license.latency_seconds(),
        responsiveness_score: result.responsiveness.score(),
        responsive_latency: result.responsiveness.latency_seconds(),
        correctness_score: result.correctness.score(),
        correctness_latency: result.correctness.latency_seconds(),
        ramp_up_score: result.ramp_up.map(|r| r.score()),
        ramp_up_latency: result.ramp_up.map(|r| r.latency_seconds()),
    };

    writeln!(writer, "{}", serde_json::to_string(&record)?)?;
    Ok(())
}
