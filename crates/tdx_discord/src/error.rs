use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DiscordError {
    #[error("Discord authentication failed")]
    #[diagnostic(
        code(tdx_discord::auth_failed),
        help("Check that your Discord bot token is valid and has not been regenerated")
    )]
    AuthenticationFailed {
        #[source]
        cause: serenity::Error,
        token_preview: String,
    },

    #[error("Gateway connection failed")]
    #[diagnostic(
        code(tdx_discord::gateway_failed),
        help("The gateway connection dropped and could not be re-established")
    )]
    GatewayFailed {
        #[source]
        cause: serenity::Error,
    },
}

pub type Result<T> = std::result::Result<T, DiscordError>;

impl DiscordError {
    pub fn auth_failed(cause: serenity::Error, token: &str) -> Self {
        // Show first 6 and last 4 characters of token for debugging
        let token_preview = if token.len() > 10 {
            format!("{}...{}", &token[..6], &token[token.len() - 4..])
        } else {
            "***".to_string()
        };
        Self::AuthenticationFailed {
            cause,
            token_preview,
        }
    }
}
