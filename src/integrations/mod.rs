pub mod dispatcher;
pub mod proxy;

use serde::{Deserialize, Serialize};

use crate::form::validator::MIN_PHONE_DIGITS;
use crate::form::{digits_only, RawSubmission};

pub const PORTAL_CODE: &str = "WEB";
pub const PROJECT_CODE: &str = "CASABONITA";
pub const DOCUMENT_TYPE_DNI: u8 = 1;
pub const COUNTRY_CODE: &str = "51";
pub const UNQUALIFIED_MARKER: &str = "Landing Page - No calificado para Bono Techo Propio";

/// Body of `POST /api/leads/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub portal_code: String,
    pub project_code: String,
    pub document_type: u8,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paternal_lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maternal_lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl LeadPayload {
    pub fn from_submission(submission: &RawSubmission) -> Self {
        let name = split_full_name(submission.full_name());

        Self {
            portal_code: PORTAL_CODE.to_string(),
            project_code: PROJECT_CODE.to_string(),
            document_type: DOCUMENT_TYPE_DNI,
            first_name: name.first_name,
            paternal_lastname: name.paternal_lastname,
            maternal_lastname: name.maternal_lastname,
            email: non_empty(submission.email().trim()),
            phone_number: normalize_phone(submission.phone()),
            comment: non_empty(submission.message().trim()),
        }
    }
}

/// Body of `POST /api/mantra/contact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub name: String,
    pub phone: String,
    pub country_code: String,
    #[serde(rename = "custom_1")]
    pub custom_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactPayload {
    /// `None` when the submission has no usable phone number.
    pub fn from_submission(submission: &RawSubmission) -> Option<Self> {
        let phone = digits_only(submission.phone());
        if phone.len() < MIN_PHONE_DIGITS {
            return None;
        }

        Some(Self {
            name: submission.full_name().trim().to_string(),
            phone,
            country_code: COUNTRY_CODE.to_string(),
            custom_1: UNQUALIFIED_MARKER.to_string(),
            email: non_empty(submission.email().trim()),
        })
    }
}

/// What the CRM proxy answers with. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrmResponse {
    pub succeeded: Option<bool>,
    pub data: Option<serde_json::Value>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub errors: Option<serde_json::Value>,
}

impl CrmResponse {
    pub fn is_success(&self) -> bool {
        self.succeeded == Some(true)
    }

    pub fn rejection_message(&self) -> Option<String> {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.clone().filter(|e| !e.is_empty()))
    }

    pub fn error_details(&self) -> Vec<serde_json::Value> {
        self.errors
            .as_ref()
            .and_then(|e| e.as_array())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub first_name: String,
    pub paternal_lastname: Option<String>,
    pub maternal_lastname: Option<String>,
}

/// First token, second token, then everything else joined by single spaces.
pub fn split_full_name(full_name: &str) -> NameParts {
    let mut tokens = full_name.split_whitespace();
    let first_name = tokens.next().unwrap_or_default().to_string();
    let paternal_lastname = tokens.next().map(str::to_string);
    let rest = tokens.collect::<Vec<_>>().join(" ");

    NameParts {
        first_name,
        paternal_lastname,
        maternal_lastname: non_empty(&rest),
    }
}

/// Digits only, prefixed `+51` unless the number already starts with `51`.
pub fn normalize_phone(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let digits = digits_only(raw);
    if digits.starts_with(COUNTRY_CODE) {
        Some(format!("+{}", digits))
    } else {
        Some(format!("+{}{}", COUNTRY_CODE, digits))
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
