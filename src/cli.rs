use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;

use crate::auth::parse_tenant_tokens;
use crate::models::{PollWindow, ReportType};
use crate::status::{ExitStatus, StatusReport};
use crate::webapi::{WebApiClient, WebApiProbe};

#[derive(Parser, Debug)]
#[command(name = "webapi-probe")]
#[command(author, version, about = "Checks results of a multi-tenant reporting web API", long_about = None)]
pub struct Cli {
    /// Web API hostname
    #[arg(short = 'H', long)]
    hostname: String,

    /// Tenant and its API key, as TENANT:TOKEN (repeatable)
    #[arg(
        short = 'k',
        long = "tenant-token",
        env = "WEBAPI_TENANT_TOKENS",
        value_delimiter = ',',
        required = true
    )]
    tenant_tokens: Vec<String>,

    /// Report type to check
    #[arg(short, long, value_enum)]
    rtype: ReportType,

    /// Number of days before today to check (0 is today)
    #[arg(short, long, default_value_t = 1)]
    day: u32,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = 60)]
    timeout: u64,

    /// Seconds to wait between successive requests
    #[arg(short, long, default_value_t = 0)]
    pace: u64,

    /// Print per-report results (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Run the checks, print the plugin message and return its status.
    ///
    /// # Errors
    /// Only configuration problems are returned; everything that goes wrong
    /// upstream is part of the printed message.
    pub async fn execute(&self) -> Result<ExitStatus> {
        let tenants = parse_tenant_tokens(&self.tenant_tokens)?;
        let client = WebApiClient::new(
            &format!("https://{}", self.hostname),
            Duration::from_secs(self.timeout),
        )?;
        let window = PollWindow::days_ago(self.day)?;

        info!(
            "Checking {:?} results of {} tenant(s) on {} for {}",
            self.rtype,
            tenants.len(),
            self.hostname,
            window.day
        );

        let checker = WebApiProbe::new(
            client,
            tenants,
            self.rtype,
            window,
            Duration::from_secs(self.pace),
        );
        let aggregate = checker.check().await;

        let report = StatusReport::new(&aggregate, self.rtype, self.verbose);
        println!("{}", report.message());

        Ok(report.status())
    }
}
