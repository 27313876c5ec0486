pub mod eligibility;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const FORM_ID: &str = "contactForm";

pub const FIELD_NAME: &str = "nombre";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PHONE: &str = "telefono";
pub const FIELD_MESSAGE: &str = "mensaje";
pub const FIELD_TERMS: &str = "terminos";
pub const FIELD_QUESTIONS: [&str; 4] = ["pregunta1", "pregunta2", "pregunta3", "pregunta4"];

/// Field values captured from one submit event, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSubmission {
    fields: HashMap<String, String>,
}

impl RawSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses `name=value`. The value may be empty; the name may not.
    pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got `{}`", raw))?;
        if name.trim().is_empty() {
            return Err(format!("empty field name in `{}`", raw));
        }
        Ok((name.trim().to_string(), value.to_string()))
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Present and non-empty, the way a form value is truthy.
    pub fn is_filled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    pub fn full_name(&self) -> &str {
        self.get(FIELD_NAME).unwrap_or_default()
    }

    pub fn email(&self) -> &str {
        self.get(FIELD_EMAIL).unwrap_or_default()
    }

    pub fn phone(&self) -> &str {
        self.get(FIELD_PHONE).unwrap_or_default()
    }

    pub fn message(&self) -> &str {
        self.get(FIELD_MESSAGE).unwrap_or_default()
    }

    pub fn terms_accepted(&self) -> bool {
        self.is_filled(FIELD_TERMS)
    }

    /// The four eligibility answers in question order.
    pub fn answers(&self) -> [Option<&str>; 4] {
        FIELD_QUESTIONS.map(|q| self.get(q))
    }
}

/// Every digit in `raw`, in order.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
