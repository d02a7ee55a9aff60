use log::debug;

use super::client::{RawResponse, WebApiClient};
use crate::auth::Token;
use crate::error::{ProbeError, Result};
use crate::models::{PerformanceSample, PollWindow, ReportDefinition, ReportType};

/// A successfully answered poll: raw payload plus its transport cost.
#[derive(Debug, Clone)]
pub struct PolledResult {
    pub payload: Vec<u8>,
    pub sample: PerformanceSample,
}

/// Query parameters for one poll; AR results are always requested daily.
pub fn poll_query(window: &PollWindow, rtype: ReportType) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("start_time", window.start_time()),
        ("end_time", window.end_time()),
    ];
    if rtype == ReportType::Ar {
        query.push(("granularity", "daily".to_string()));
    }
    query
}

/// Poll the computed results of one report for `window`.
///
/// # Errors
/// Transport failures and non-2xx statuses come back as `ProbeError::Poll`
/// for this report only.
pub async fn poll_result(
    client: &WebApiClient,
    token: &Token,
    report: &ReportDefinition,
    group_type: &str,
    window: &PollWindow,
    rtype: ReportType,
) -> Result<PolledResult> {
    let raw = request(client, token, report, group_type, window, rtype)
        .await
        .map_err(|e| ProbeError::poll(&report.name, &e))?;

    let sample = PerformanceSample {
        report_name: report.name.clone(),
        latency_seconds: raw.latency.as_secs_f64(),
        payload_bytes: raw.size(),
    };
    debug!(
        "Report {}: {} bytes in {:.6}s",
        sample.report_name, sample.payload_bytes, sample.latency_seconds
    );

    Ok(PolledResult {
        payload: raw.body,
        sample,
    })
}

async fn request(
    client: &WebApiClient,
    token: &Token,
    report: &ReportDefinition,
    group_type: &str,
    window: &PollWindow,
    rtype: ReportType,
) -> Result<RawResponse> {
    let url = client.results_url(rtype, &report.name, group_type)?;
    client.get(url, &poll_query(window, rtype), token).await
}
