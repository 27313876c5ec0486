use thiserror::Error;

const SUBMIT_FAILED_PREFIX: &str = "Error al enviar el formulario. ";
const CONNECTIVITY_HINT: &str = "No se pudo conectar con el servidor. ¿Está el proxy ejecutándose?";
const BUSY_MESSAGE: &str = "Tu solicitud ya se está enviando, por favor espera un momento.";

/// Generic rejection text used when the CRM gives no message of its own.
pub const GENERIC_REJECTION: &str = "Error al enviar el formulario";

/// First rule a submission broke, in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("terms not accepted")]
    TermsNotAccepted,
    #[error("missing required field: full name")]
    MissingFullName,
    #[error("malformed email")]
    MalformedEmail,
    #[error("phone too short")]
    PhoneTooShort,
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::TermsNotAccepted => {
                "Error: Debes aceptar los términos y condiciones".to_string()
            }
            ValidationError::MissingFullName => {
                "Error: Por favor ingresa tu nombre completo".to_string()
            }
            ValidationError::MalformedEmail => {
                "Error: Por favor ingresa un email válido".to_string()
            }
            ValidationError::PhoneTooShort => {
                "Error: Por favor ingresa un teléfono válido".to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The CRM answered but declined the lead.
    #[error("lead rejected: {message}")]
    ServerRejection {
        message: String,
        details: Vec<serde_json::Value>,
    },

    /// The CRM request never completed.
    #[error("transport failure: {message}")]
    Transport { message: String, connectivity: bool },

    #[error("a submission is already in flight")]
    Busy,
}

impl SubmitError {
    pub fn from_transport(err: &reqwest::Error) -> Self {
        SubmitError::Transport {
            message: err.to_string(),
            connectivity: err.is_connect() || err.is_timeout() || err.is_request(),
        }
    }

    /// Text shown in the error toast.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::ServerRejection { message, .. } => {
                format!("{}{}", SUBMIT_FAILED_PREFIX, message)
            }
            SubmitError::Transport {
                connectivity: true, ..
            } => format!("{}{}", SUBMIT_FAILED_PREFIX, CONNECTIVITY_HINT),
            SubmitError::Transport { message, .. } => {
                format!("{}{}", SUBMIT_FAILED_PREFIX, message)
            }
            SubmitError::Busy => BUSY_MESSAGE.to_string(),
        }
    }
}

/// Failure of the best-effort fallback call. Only ever logged.
#[derive(Debug, Error)]
pub enum FallbackDispatchError {
    #[error("fallback contact request failed: {0}")]
    Request(#[from] reqwest::Error),
}
