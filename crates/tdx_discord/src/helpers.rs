//! Chat formatting and interaction helpers.

use lazy_static::lazy_static;
use regex::Regex;
use serenity::{
    builder::{
        CreateInteractionResponse, CreateInteractionResponseFollowup,
        CreateInteractionResponseMessage,
    },
    client::Context,
    model::application::CommandInteraction,
};
use std::time::Duration;
use tracing::warn;

/// How long acknowledgement messages stay up before self-deleting.
pub const ACK_DELETE_AFTER: Duration = Duration::from_secs(30);

const LOADING_EMOJI: &str = "<a:loading:471298325904359434>";

lazy_static! {
    static ref ROLE_MENTION: Regex = Regex::new(r"<@&(\d+)>").unwrap();
}

/// Prefix text with the animated loading emoji.
pub fn loading(text: &str) -> String {
    format!("{LOADING_EMOJI} {text}")
}

/// Prefix text with a white checkmark.
pub fn success(text: &str) -> String {
    format!("\u{2705} {text}")
}

/// Append the support-contact footer.
pub fn append_twitter(text: &str) -> String {
    format!(
        "{text}\n\nIf that doesn't look right, please contact us on Twitter. @TrainerDexApp"
    )
}

/// Wrap text in a syntax-highlighted code block.
pub fn code_box(text: &str, lang: &str) -> String {
    format!("```{lang}\n{text}\n```")
}

pub fn role_mention(role_id: u64) -> String {
    format!("<@&{role_id}>")
}

/// Extract all role ids mentioned in free text, in order of appearance.
pub fn parse_role_mentions(text: &str) -> Vec<u64> {
    ROLE_MENTION
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Send the interaction response.
pub async fn respond(
    ctx: &Context,
    command: &CommandInteraction,
    content: String,
    ephemeral: bool,
) -> serenity::Result<()> {
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(ephemeral),
            ),
        )
        .await
}

/// Send the interaction response and delete it after [`ACK_DELETE_AFTER`].
pub async fn respond_then_delete(
    ctx: &Context,
    command: &CommandInteraction,
    content: String,
) -> serenity::Result<()> {
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content(content),
            ),
        )
        .await?;
    let http = ctx.http.clone();
    let command = command.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ACK_DELETE_AFTER).await;
        if let Err(e) = command.delete_response(&http).await {
            warn!("Failed to delete acknowledgement message: {}", e);
        }
    });
    Ok(())
}

/// Send a followup message that deletes itself after [`ACK_DELETE_AFTER`].
///
/// Deletion is best-effort: if the message is already gone or permissions
/// changed, the failure is logged and dropped.
pub async fn followup_then_delete(
    ctx: &Context,
    command: &CommandInteraction,
    content: String,
) -> serenity::Result<()> {
    let message = command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new().content(content),
        )
        .await?;
    let http = ctx.http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ACK_DELETE_AFTER).await;
        if let Err(e) = message.delete(&http).await {
            warn!("Failed to delete acknowledgement message: {}", e);
        }
    });
    Ok(())
}

/// Send a plain followup message.
pub async fn followup(
    ctx: &Context,
    command: &CommandInteraction,
    content: String,
) -> serenity::Result<()> {
    command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new().content(content),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_prefixes_checkmark() {
        assert_eq!(success("done"), "✅ done");
    }

    #[test]
    fn loading_prefixes_emoji() {
        assert!(loading("working").starts_with("<a:loading:"));
    }

    #[test]
    fn role_mentions_parse_in_order() {
        let text = "add these <@&111> and <@&222>, not @everyone or <@333>";
        assert_eq!(parse_role_mentions(text), vec![111, 222]);
    }

    #[test]
    fn no_mentions_parses_empty() {
        assert_eq!(parse_role_mentions("nothing here"), Vec::<u64>::new());
    }

    #[test]
    fn code_box_wraps_language() {
        assert_eq!(code_box("{}", "json"), "```json\n{}\n```");
    }
}
