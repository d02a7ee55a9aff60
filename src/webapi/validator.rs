use log::warn;
use serde_json::Value;

use crate::error::ProbeError;
use crate::models::{ReportOutcome, ReportType};

/// One hop into a JSON document.
#[derive(Debug, Clone, Copy)]
enum Step {
    Key(&'static str),
    Index(usize),
}

// results[0].endpoints[0].results[0].availability
const AVAILABILITY_PATH: &[Step] = &[
    Step::Key("results"),
    Step::Index(0),
    Step::Key("endpoints"),
    Step::Index(0),
    Step::Key("results"),
    Step::Index(0),
    Step::Key("availability"),
];

// groups[0].statuses
const STATUSES_PATH: &[Step] = &[Step::Key("groups"), Step::Index(0), Step::Key("statuses")];

/// Follow `path`, yielding `None` as soon as a key or element is absent or a
/// hop meets the wrong JSON type.
fn navigate<'v>(root: &'v Value, path: &[Step]) -> Option<&'v Value> {
    path.iter().try_fold(root, |value, step| match step {
        Step::Key(key) => value.as_object()?.get(*key),
        Step::Index(index) => value.as_array()?.get(*index),
    })
}

/// `null`, `false`, zero and empty strings/arrays/objects carry no result.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn payload_has_results(payload: &Value, rtype: ReportType) -> bool {
    match rtype {
        ReportType::Ar => navigate(payload, AVAILABILITY_PATH).is_some_and(has_content),
        ReportType::Status => navigate(payload, STATUSES_PATH)
            .and_then(Value::as_array)
            .is_some_and(|statuses| !statuses.is_empty()),
    }
}

/// Classify a polled payload. Never fails: anything unreadable is CRITICAL.
pub fn validate(payload: &[u8], rtype: ReportType, report: &str) -> ReportOutcome {
    let valid = match serde_json::from_slice::<Value>(payload) {
        Ok(value) => payload_has_results(&value, rtype),
        Err(e) => {
            warn!("Report {report}: payload is not JSON: {e}");
            false
        }
    };

    if valid {
        ReportOutcome::Ok
    } else {
        warn!("Report {report}: no {} in payload", rtype.object());
        unreadable_payload(rtype, report)
    }
}

/// Outcome for a payload that arrived but lacks the expected field.
pub fn unreadable_payload(rtype: ReportType, report: &str) -> ReportOutcome {
    ReportOutcome::Critical(format!(
        "Unable to retrieve {} from report {report}",
        rtype.object()
    ))
}

/// Outcome for a poll that never produced a payload.
pub fn failed_poll(rtype: ReportType, report: &str, error: &ProbeError) -> ReportOutcome {
    warn!("Report {report}: {error}");
    ReportOutcome::Critical(format!(
        "Unable to retrieve {} for report {report}: {}",
        rtype.object(),
        error.root_cause()
    ))
}
