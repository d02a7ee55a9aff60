use indexmap::IndexMap;

use super::Token;
use crate::error::{ProbeError, Result};

#[derive(Debug, Clone)]
pub struct TenantCredential {
    pub tenant_name: String,
    pub token: Token,
}

impl TenantCredential {
    /// Parse a single `NAME:TOKEN` pair.
    ///
    /// # Errors
    /// Returns `ProbeError::Config` unless the pair splits into exactly two
    /// non-empty parts.
    pub fn parse(pair: &str) -> Result<Self> {
        let mut parts = pair.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(tenant), Some(token), None) if !tenant.is_empty() && !token.is_empty() => {
                let token = Token::new(token).map_err(|e| {
                    ProbeError::Config(format!("Tenant {tenant}: {}", e.root_cause()))
                })?;
                Ok(Self {
                    tenant_name: tenant.to_string(),
                    token,
                })
            }
            _ => Err(ProbeError::Config(format!(
                "Malformed tenant token '{}': expected TENANT:TOKEN",
                redact_pair(pair)
            ))),
        }
    }
}

/// Parse `NAME:TOKEN` pairs into a tenant-ordered map.
///
/// # Errors
/// Returns `ProbeError::Config` on the first malformed pair or when a tenant
/// is given twice.
pub fn parse_tenant_tokens<S: AsRef<str>>(pairs: &[S]) -> Result<IndexMap<String, Token>> {
    let mut tokens = IndexMap::with_capacity(pairs.len());

    for pair in pairs {
        let credential = TenantCredential::parse(pair.as_ref())?;
        if tokens.contains_key(&credential.tenant_name) {
            return Err(ProbeError::Config(format!(
                "Tenant {} given more than once",
                credential.tenant_name
            )));
        }
        tokens.insert(credential.tenant_name, credential.token);
    }

    if tokens.is_empty() {
        return Err(ProbeError::Config(
            "At least one tenant token is required".to_string(),
        ));
    }

    Ok(tokens)
}

// Keep the tenant part for the error message, never the key.
fn redact_pair(pair: &str) -> String {
    match pair.split_once(':') {
        Some((tenant, _)) => format!("{tenant}:<redacted>"),
        None => pair.to_string(),
    }
}
