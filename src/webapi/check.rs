use std::time::Duration;

use indexmap::IndexMap;
use log::{info, warn};

use super::catalog::fetch_catalog;
use super::client::WebApiClient;
use super::pacing::Pacer;
use super::poller::poll_result;
use super::validator::{failed_poll, unreadable_payload, validate};
use crate::auth::Token;
use crate::models::{
    AggregateCheckResult, PollWindow, ReportDefinition, ReportType, TenantCheckResult,
};

/// Runs the whole check: catalog per tenant, then one poll per enabled report.
pub struct WebApiProbe {
    client: WebApiClient,
    tenants: IndexMap<String, Token>,
    rtype: ReportType,
    window: PollWindow,
    pace: Duration,
}

impl WebApiProbe {
    pub fn new(
        client: WebApiClient,
        tenants: IndexMap<String, Token>,
        rtype: ReportType,
        window: PollWindow,
        pace: Duration,
    ) -> Self {
        Self {
            client,
            tenants,
            rtype,
            window,
            pace,
        }
    }

    /// Check every tenant in order. Failures are recorded per tenant or per
    /// report; this never aborts part way.
    pub async fn check(&self) -> AggregateCheckResult {
        let mut pacer = Pacer::new(self.pace);
        let mut aggregate = AggregateCheckResult::with_capacity(self.tenants.len());

        for (tenant, token) in &self.tenants {
            info!("Fetching reports for tenant {tenant}");
            pacer.wait().await;

            let result = match fetch_catalog(&self.client, tenant, token).await {
                Ok(reports) => {
                    info!("Tenant {tenant}: polling {} reports", reports.len());
                    self.check_reports(token, &reports, &mut pacer).await
                }
                Err(e) => {
                    warn!("{e}");
                    TenantCheckResult::ReportsUnavailable(format!("CRITICAL - {e}"))
                }
            };

            aggregate.insert(tenant.clone(), result);
        }

        aggregate
    }

    async fn check_reports(
        &self,
        token: &Token,
        reports: &[ReportDefinition],
        pacer: &mut Pacer,
    ) -> TenantCheckResult {
        let mut results = IndexMap::with_capacity(reports.len());
        let mut performance = IndexMap::new();

        for report in reports {
            let Some(group_type) = report.topology_group_type.as_deref() else {
                warn!("Report {}: no topology group type to poll", report.name);
                results.insert(
                    report.name.clone(),
                    unreadable_payload(self.rtype, &report.name),
                );
                continue;
            };

            pacer.wait().await;
            let polled = poll_result(
                &self.client,
                token,
                report,
                group_type,
                &self.window,
                self.rtype,
            )
            .await;

            let outcome = match polled {
                Ok(polled) => {
                    let outcome = validate(&polled.payload, self.rtype, &report.name);
                    performance.insert(report.name.clone(), polled.sample);
                    outcome
                }
                Err(e) => failed_poll(self.rtype, &report.name, &e),
            };
            results.insert(report.name.clone(), outcome);
        }

        TenantCheckResult::Checked {
            results,
            performance,
        }
    }
}
