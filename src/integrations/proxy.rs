use reqwest::{Client, StatusCode};
use std::sync::Arc;

use super::{ContactPayload, CrmResponse, HealthStatus, LeadPayload};
use crate::config::AppConfig;
use crate::error::{FallbackDispatchError, SubmitError, GENERIC_REJECTION};

pub const LEADS_PATH: &str = "/api/leads/create";
pub const CONTACT_PATH: &str = "/api/mantra/contact";
pub const HEALTH_PATH: &str = "/health";

/// Talks to the FastAPI proxy that fronts the CRM and the fallback contact sink.
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    config: Arc<AppConfig>,
}

impl ProxyClient {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Awaited by the qualified path. `Ok` only when the status is 2xx and the
    /// body says `succeeded: true`.
    pub async fn create_lead(&self, lead: &LeadPayload) -> Result<CrmResponse, SubmitError> {
        let url = self.config.endpoint(LEADS_PATH);
        log::debug!("Sending lead to {}: {:?}", url, lead);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(lead)
            .send()
            .await
            .map_err(|e| {
                log::error!("Lead request failed: {}", e);
                SubmitError::from_transport(&e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::from_transport(&e))?;

        let result: CrmResponse = match serde_json::from_str(&body) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Unparseable lead response ({}): {}", status, e);
                return Err(SubmitError::ServerRejection {
                    message: GENERIC_REJECTION.to_string(),
                    details: Vec::new(),
                });
            }
        };

        if status.is_success() && result.is_success() {
            log_created_lead(&result);
            return Ok(result);
        }

        log::error!("Lead rejected ({}): {}", status, body);
        let details = result.error_details();
        for (i, detail) in details.iter().enumerate() {
            log::error!("   Error {}: {}", i + 1, detail);
        }

        Err(SubmitError::ServerRejection {
            message: result
                .rejection_message()
                .unwrap_or_else(|| GENERIC_REJECTION.to_string()),
            details,
        })
    }

    /// Posts an unqualified contact. The caller only ever logs the outcome.
    pub async fn send_contact(
        &self,
        contact: &ContactPayload,
    ) -> Result<StatusCode, FallbackDispatchError> {
        let url = self.config.endpoint(CONTACT_PATH);
        log::debug!("Sending unqualified contact to {}: {:?}", url, contact);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(contact)
            .send()
            .await?;

        Ok(response.status())
    }

    /// Development aid: `true` when the proxy reports `status: "healthy"`.
    pub async fn probe_health(&self) -> Result<bool, String> {
        let url = self.config.endpoint(HEALTH_PATH);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Proxy health request failed: {}. Is the proxy running?", e))?;

        let status = response.status();
        let body: HealthStatus = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                log::warn!("Proxy answered {} with an unexpected body: {}", status, e);
                return Ok(false);
            }
        };

        let healthy = status.is_success() && body.status == "healthy";
        if healthy {
            log::info!("Proxy reachable at {}", url);
        } else {
            log::warn!("Proxy answered {} with status `{}`", status, body.status);
        }
        Ok(healthy)
    }
}

fn log_created_lead(result: &CrmResponse) {
    log::info!("Lead created");
    if let Some(data) = &result.data {
        if let Some(id) = data.get("leadId") {
            log::info!("   Lead ID: {}", id);
        }
        if let Some(assignee) = data.get("assignedTo") {
            log::info!("   Assigned to: {}", assignee);
        }
    }
}
