use super::proxy::ProxyClient;
use super::{ContactPayload, CrmResponse, LeadPayload};
use crate::error::SubmitError;
use crate::form::eligibility::EligibilityVerdict;
use crate::form::RawSubmission;

#[derive(Debug)]
pub enum Dispatch {
    /// Unqualified: no CRM call. `fallback_sent` says whether a fallback
    /// request was launched, not whether it succeeded.
    Declined { fallback_sent: bool },
    /// Qualified and accepted by the CRM.
    Accepted(CrmResponse),
}

/// Routes a validated submission to exactly one destination.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    proxy: ProxyClient,
}

impl Dispatcher {
    pub fn new(proxy: ProxyClient) -> Self {
        Self { proxy }
    }

    pub async fn dispatch(
        &self,
        submission: &RawSubmission,
        verdict: EligibilityVerdict,
    ) -> Result<Dispatch, SubmitError> {
        match verdict {
            EligibilityVerdict::Unqualified => {
                log::info!("Lead does not qualify; routing to fallback contact sink");
                Ok(Dispatch::Declined {
                    fallback_sent: self.decline(submission),
                })
            }
            EligibilityVerdict::Qualified => {
                let lead = LeadPayload::from_submission(submission);
                self.proxy.create_lead(&lead).await.map(Dispatch::Accepted)
            }
        }
    }

    fn decline(&self, submission: &RawSubmission) -> bool {
        match ContactPayload::from_submission(submission) {
            Some(contact) => {
                send_best_effort(self.proxy.clone(), contact);
                true
            }
            None => {
                log::info!("No usable phone number; skipping fallback contact");
                false
            }
        }
    }
}

/// Launches the fallback call on a detached task. Nobody awaits it; the only
/// thing that ever sees its result is the log.
pub fn send_best_effort(proxy: ProxyClient, contact: ContactPayload) {
    tokio::spawn(async move {
        match proxy.send_contact(&contact).await {
            Ok(status) => log::info!("Contact sent to fallback sink: {}", status),
            Err(e) => log::error!("{}", e),
        }
    });
}
