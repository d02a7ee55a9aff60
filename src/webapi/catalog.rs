use log::{debug, warn};
use serde::Deserialize;

use super::client::WebApiClient;
use crate::auth::Token;
use crate::error::{ProbeError, Result};
use crate::models::ReportDefinition;

#[derive(Debug, Deserialize)]
struct ReportListDto {
    data: Vec<ReportDto>,
}

#[derive(Debug, Deserialize)]
struct ReportDto {
    info: ReportInfoDto,
    disabled: bool,
    #[serde(default)]
    topology_schema: Option<TopologySchemaDto>,
}

#[derive(Debug, Deserialize)]
struct ReportInfoDto {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TopologySchemaDto {
    #[serde(default)]
    group: Option<TopologyGroupDto>,
}

#[derive(Debug, Deserialize)]
struct TopologyGroupDto {
    #[serde(rename = "type", default)]
    group_type: Option<String>,
    #[serde(default)]
    group: Option<Box<TopologyGroupDto>>,
}

impl From<ReportDto> for ReportDefinition {
    fn from(dto: ReportDto) -> Self {
        // topology_schema.group.group.type names the groups results are computed for
        let topology_group_type = dto
            .topology_schema
            .and_then(|schema| schema.group)
            .and_then(|group| group.group)
            .and_then(|group| group.group_type)
            .filter(|group_type| !group_type.is_empty());

        Self {
            name: dto.info.name,
            topology_group_type,
            disabled: dto.disabled,
        }
    }
}

/// Fetch the enabled reports of one tenant, in catalog order.
///
/// # Errors
/// Any transport failure, non-2xx status or malformed body is returned as
/// `ProbeError::CatalogFetch` for `tenant`.
pub async fn fetch_catalog(
    client: &WebApiClient,
    tenant: &str,
    token: &Token,
) -> Result<Vec<ReportDefinition>> {
    fetch_enabled_reports(client, token)
        .await
        .map_err(|e| ProbeError::catalog_fetch(tenant, &e))
}

async fn fetch_enabled_reports(
    client: &WebApiClient,
    token: &Token,
) -> Result<Vec<ReportDefinition>> {
    let response = client.get(client.reports_url()?, &[], token).await?;
    let catalog: ReportListDto = serde_json::from_slice(&response.body)?;

    let total = catalog.data.len();
    let reports: Vec<ReportDefinition> = catalog
        .data
        .into_iter()
        .map(ReportDefinition::from)
        .filter(|report| !report.disabled)
        .collect();

    debug!("{} of {total} reports enabled", reports.len());
    for report in reports.iter().filter(|r| r.topology_group_type.is_none()) {
        warn!("Report {} has no topology group type", report.name);
    }

    Ok(reports)
}
