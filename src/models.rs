use std::fmt;

use chrono::{Days, NaiveDate, Utc};
use clap::ValueEnum;
use indexmap::IndexMap;

use crate::error::{ProbeError, Result};

/// Kind of computed result polled for each report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportType {
    /// Availability/reliability results
    Ar,
    /// Operational status results
    Status,
}

impl ReportType {
    /// Name of the object looked up in the payload, used in outcome reasons.
    pub fn object(self) -> &'static str {
        match self {
            Self::Ar => "availability",
            Self::Status => "status",
        }
    }

    /// Label used inside the CRITICAL summary clause.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ar => "AR",
            Self::Status => "status",
        }
    }

    /// Capitalized label used in the OK summary and verbose lines.
    pub fn title(self) -> &'static str {
        match self {
            Self::Ar => "AR",
            Self::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDefinition {
    pub name: String,
    pub topology_group_type: Option<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    pub day: NaiveDate,
}

impl PollWindow {
    /// Window covering the whole UTC day `day_offset` days before `today`.
    ///
    /// # Errors
    /// Returns `ProbeError::Config` when the offset reaches past the earliest
    /// representable date.
    pub fn for_day(today: NaiveDate, day_offset: u32) -> Result<Self> {
        today
            .checked_sub_days(Days::new(u64::from(day_offset)))
            .map(|day| Self { day })
            .ok_or_else(|| {
                ProbeError::Config(format!("Day offset {day_offset} is out of range"))
            })
    }

    pub fn days_ago(day_offset: u32) -> Result<Self> {
        Self::for_day(Utc::now().date_naive(), day_offset)
    }

    pub fn start_time(&self) -> String {
        self.day.format("%Y-%m-%dT00:00:00Z").to_string()
    }

    pub fn end_time(&self) -> String {
        self.day.format("%Y-%m-%dT23:59:59Z").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Ok,
    Critical(String),
}

impl ReportOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ReportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Critical(reason) => write!(f, "CRITICAL - {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSample {
    pub report_name: String,
    pub latency_seconds: f64,
    pub payload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TenantCheckResult {
    ReportsUnavailable(String),
    Checked {
        results: IndexMap<String, ReportOutcome>,
        performance: IndexMap<String, PerformanceSample>,
    },
}

/// Per-tenant results in tenant discovery order.
pub type AggregateCheckResult = IndexMap<String, TenantCheckResult>;
