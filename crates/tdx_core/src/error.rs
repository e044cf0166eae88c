use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum TdxError {
    #[error("Trainer payload failed to decode")]
    #[diagnostic(
        code(tdx_core::trainer_decode),
        help("The TrainerDex API returned a payload missing or mistyping '{field}'")
    )]
    TrainerDecode {
        field: &'static str,
        payload_excerpt: String,
    },

    #[error("Faction id {id} is outside the known range")]
    #[diagnostic(
        code(tdx_core::unknown_faction),
        help("Valid faction ids are 0 (Teamless), 1 (Mystic), 2 (Valor), 3 (Instinct)")
    )]
    UnknownFaction { id: i64 },

    #[error("TrainerDex API request failed")]
    #[diagnostic(
        code(tdx_core::api_request_failed),
        help("Request to {endpoint} failed{}", status.map(|s| format!(" with status {s}")).unwrap_or_default())
    )]
    Api {
        endpoint: String,
        status: Option<u16>,
        #[source]
        cause: reqwest::Error,
    },

    #[error("TrainerDex API returned a non-success status")]
    #[diagnostic(
        code(tdx_core::api_status),
        help("Endpoint {endpoint} answered {status}; the request was not retried")
    )]
    ApiStatus {
        endpoint: String,
        status: u16,
        body_excerpt: String,
    },

    #[error("Posting stat updates is not supported")]
    #[diagnostic(
        code(tdx_core::update_submission_unsupported),
        help("The stat-update submission endpoint is not implemented at this API level")
    )]
    UpdateSubmissionUnsupported,

    #[error("Settings store operation failed")]
    #[diagnostic(
        code(tdx_core::store_failed),
        help("The host settings store rejected a {operation} for scope {scope}")
    )]
    Store {
        operation: &'static str,
        scope: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, TdxError>;

impl TdxError {
    /// Decode failure for a required payload field, keeping a short excerpt
    /// of the offending payload for diagnostics.
    pub fn decode(field: &'static str, payload: &serde_json::Value) -> Self {
        let rendered = payload.to_string();
        let payload_excerpt = if rendered.chars().count() > 120 {
            let head: String = rendered.chars().take(120).collect();
            format!("{head}...")
        } else {
            rendered
        };
        Self::TrainerDecode {
            field,
            payload_excerpt,
        }
    }
}
