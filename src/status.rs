use indexmap::IndexMap;

use crate::models::{AggregateCheckResult, PerformanceSample, ReportType, TenantCheckResult};

/// Monitoring plugin return codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok = 0,
    #[allow(dead_code)]
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Renders an aggregate into the plugin message and exit status.
pub struct StatusReport<'a> {
    aggregate: &'a AggregateCheckResult,
    rtype: ReportType,
    verbosity: u8,
}

impl<'a> StatusReport<'a> {
    pub fn new(aggregate: &'a AggregateCheckResult, rtype: ReportType, verbosity: u8) -> Self {
        Self {
            aggregate,
            rtype,
            verbosity,
        }
    }

    fn single_tenant(&self) -> bool {
        self.aggregate.len() == 1
    }

    /// Tenants with at least one non-OK report, mapped to those reports.
    fn reports_with_errors(&self) -> IndexMap<&'a str, Vec<&'a str>> {
        self.aggregate
            .iter()
            .filter_map(|(tenant, result)| match result {
                TenantCheckResult::Checked { results, .. } => {
                    let failed: Vec<&str> = results
                        .iter()
                        .filter(|(_, outcome)| !outcome.is_ok())
                        .map(|(report, _)| report.as_str())
                        .collect();
                    (!failed.is_empty()).then_some((tenant.as_str(), failed))
                }
                TenantCheckResult::ReportsUnavailable(_) => None,
            })
            .collect()
    }

    fn tenants_unavailable(&self) -> Vec<&'a str> {
        self.aggregate
            .iter()
            .filter(|(_, result)| matches!(result, TenantCheckResult::ReportsUnavailable(_)))
            .map(|(tenant, _)| tenant.as_str())
            .collect()
    }

    pub fn status(&self) -> ExitStatus {
        if self.reports_with_errors().is_empty() && self.tenants_unavailable().is_empty() {
            ExitStatus::Ok
        } else {
            ExitStatus::Critical
        }
    }

    /// Sample with the highest latency; the later one wins a tie.
    fn slowest_sample(&self) -> Option<&'a PerformanceSample> {
        self.aggregate
            .values()
            .filter_map(|result| match result {
                TenantCheckResult::Checked { performance, .. } => Some(performance.values()),
                TenantCheckResult::ReportsUnavailable(_) => None,
            })
            .flatten()
            .fold(None::<&'a PerformanceSample>, |slowest, sample| match slowest {
                Some(current) if current.latency_seconds > sample.latency_seconds => Some(current),
                _ => Some(sample),
            })
    }

    fn problem_clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();

        let reports_with_errors = self.reports_with_errors();
        if !reports_with_errors.is_empty() {
            let per_tenant: Vec<String> = reports_with_errors
                .iter()
                .map(|(tenant, reports)| {
                    if self.single_tenant() {
                        format!("report(s) {}", reports.join(", "))
                    } else {
                        format!("report(s) {} for tenant {tenant}", reports.join(", "))
                    }
                })
                .collect();
            clauses.push(format!(
                "with {} results for {}",
                self.rtype.label(),
                per_tenant.join("; ")
            ));
        }

        let tenants_unavailable = self.tenants_unavailable();
        if !tenants_unavailable.is_empty() {
            let fetching = if self.single_tenant() {
                "fetching all reports".to_string()
            } else {
                format!(
                    "fetching all reports for tenant(s) {}",
                    tenants_unavailable.join(", ")
                )
            };
            if clauses.is_empty() {
                clauses.push(fetching);
            } else {
                clauses.push(format!("problem {fetching}"));
            }
        }

        clauses
    }

    fn summary_line(&self) -> String {
        let clauses = self.problem_clauses();
        let mut line = if clauses.is_empty() {
            let scope = if self.single_tenant() {
                "all reports"
            } else {
                "all tenants and reports"
            };
            format!(
                "{} - {} results available for {scope}",
                ExitStatus::Ok.label(),
                self.rtype.title()
            )
        } else {
            format!(
                "{} - Problem {}",
                ExitStatus::Critical.label(),
                clauses.join("; ")
            )
        };

        if let Some(sample) = self.slowest_sample() {
            line.push_str(&format!(
                "|time={:.6}s;size={}B",
                sample.latency_seconds, sample.payload_bytes
            ));
        }

        line
    }

    fn tenant_details(&self, tenant: &str, result: &TenantCheckResult) -> String {
        let mut lines = Vec::new();
        if !self.single_tenant() {
            lines.push(format!("{tenant}:"));
        }

        match result {
            TenantCheckResult::ReportsUnavailable(reason) => lines.push(reason.clone()),
            TenantCheckResult::Checked { results, .. } => {
                lines.extend(results.iter().map(|(report, outcome)| {
                    format!("{} for report {report} - {outcome}", self.rtype.title())
                }));
            }
        }

        lines.join("\n")
    }

    pub fn message(&self) -> String {
        let summary = self.summary_line();
        if self.verbosity == 0 {
            return summary;
        }

        let details: Vec<String> = self
            .aggregate
            .iter()
            .map(|(tenant, result)| self.tenant_details(tenant, result))
            .collect();

        format!("{summary}\n{}", details.join("\n\n"))
            .trim_end()
            .to_string()
    }
}
