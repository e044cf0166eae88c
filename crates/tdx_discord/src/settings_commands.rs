//! The /tdxset command surface.
//!
//! Every setting follows the same contract: invoked with a value it
//! validates, persists, and acknowledges with a self-deleting message;
//! invoked without one it shows the setting's help text and current value,
//! rendering "not set" distinctly from any falsy stored value. Free-text
//! settings accept the literal token `None` (exact match) to clear the
//! stored value to empty.

use miette::IntoDiagnostic;
use serenity::{
    client::Context,
    model::application::{CommandInteraction, ResolvedOption, ResolvedValue},
};
use tracing::debug;

use tdx_core::settings::{GuildToggleField, StoredRoles, TeamRoleField};

use crate::bot::TdxState;
use crate::helpers::{
    code_box, parse_role_mentions, respond, respond_then_delete, role_mention, success,
};

pub async fn handle_tdxset(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
) -> miette::Result<()> {
    let options = command.data.options();
    let Some(first) = options.first() else {
        return respond(ctx, command, usage_text(), true)
            .await
            .map_err(|e| miette::miette!("Failed to send usage: {}", e));
    };

    match (first.name, &first.value) {
        ("guild", ResolvedValue::SubCommandGroup(subs)) => {
            handle_guild_group(state, ctx, command, subs).await
        }
        ("channel", ResolvedValue::SubCommandGroup(subs)) => {
            handle_channel_group(state, ctx, command, subs).await
        }
        ("notice", ResolvedValue::SubCommand(args)) => {
            handle_global_text(state, ctx, command, GlobalTextField::Notice, args).await
        }
        ("footer", ResolvedValue::SubCommand(args)) => {
            handle_global_text(state, ctx, command, GlobalTextField::EmbedFooter, args).await
        }
        _ => {
            debug!(option = first.name, "unrecognized tdxset option");
            respond(ctx, command, usage_text(), true)
                .await
                .map_err(|e| miette::miette!("Failed to send usage: {}", e))
        }
    }
}

fn usage_text() -> String {
    "Set server and/or channel settings:\n\
     `/tdxset guild <option> [value]`\n\
     `/tdxset channel profile_ocr [value]`\n\
     `/tdxset notice [value]` (owner only)\n\
     `/tdxset footer [value]` (owner only)"
        .to_string()
}

async fn handle_guild_group(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    subs: &[ResolvedOption<'_>],
) -> miette::Result<()> {
    let Some(guild_id) = command.guild_id.map(|id| id.get()) else {
        return respond(
            ctx,
            command,
            "This command can only be used in a server.".to_string(),
            true,
        )
        .await
        .map_err(|e| miette::miette!("Failed to send guild-only response: {}", e));
    };

    let Some(sub) = subs.first() else {
        return show_guild_settings(state, ctx, command, guild_id).await;
    };
    let ResolvedValue::SubCommand(args) = &sub.value else {
        return show_guild_settings(state, ctx, command, guild_id).await;
    };

    if let Some(field) = GuildToggleField::from_key(sub.name) {
        return handle_guild_toggle(state, ctx, command, guild_id, field, bool_arg(args)).await;
    }

    match sub.name {
        "show" => show_guild_settings(state, ctx, command, guild_id).await,
        "mystic_role" => {
            handle_team_role(state, ctx, command, guild_id, TeamRoleField::Mystic, role_arg(args))
                .await
        }
        "valor_role" => {
            handle_team_role(state, ctx, command, guild_id, TeamRoleField::Valor, role_arg(args))
                .await
        }
        "instinct_role" => {
            handle_team_role(
                state,
                ctx,
                command,
                guild_id,
                TeamRoleField::Instinct,
                role_arg(args),
            )
            .await
        }
        "tl40_role" => {
            handle_team_role(
                state,
                ctx,
                command,
                guild_id,
                TeamRoleField::Level40,
                role_arg(args),
            )
            .await
        }
        "introduction_note" => {
            handle_introduction_note(state, ctx, command, guild_id, str_arg(args, "value")).await
        }
        "roles_to_assign_on_approval" => {
            handle_approval_roles(
                state,
                ctx,
                command,
                guild_id,
                str_arg(args, "action"),
                str_arg(args, "roles"),
            )
            .await
        }
        other => {
            debug!(subcommand = other, "unrecognized guild setting");
            show_guild_settings(state, ctx, command, guild_id).await
        }
    }
}

/// Dump the guild's current configuration as a JSON code block.
async fn show_guild_settings(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: u64,
) -> miette::Result<()> {
    let settings = state.store.guild(guild_id).await?;
    let dump = serde_json::to_string_pretty(&settings).into_diagnostic()?;
    respond(ctx, command, code_box(&dump, "json"), false)
        .await
        .map_err(|e| miette::miette!("Failed to send settings dump: {}", e))
}

async fn handle_guild_toggle(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: u64,
    field: GuildToggleField,
    value: Option<bool>,
) -> miette::Result<()> {
    let mut settings = state.store.guild(guild_id).await?;
    match value {
        Some(value) => {
            field.set(&mut settings, value);
            state.store.set_guild(guild_id, settings).await?;
            respond_then_delete(
                ctx,
                command,
                success(&format!("`guild.{}` set to {}", field.key(), value)),
            )
            .await
            .map_err(|e| miette::miette!("Failed to send acknowledgement: {}", e))
        }
        None => {
            let current = field.get(&settings);
            let text = format!(
                "{}\n\n`guild.{}` is {}",
                toggle_help(field),
                field.key(),
                current
            );
            respond(ctx, command, text, false)
                .await
                .map_err(|e| miette::miette!("Failed to send current value: {}", e))
        }
    }
}

fn toggle_help(field: GuildToggleField) -> &'static str {
    match field {
        GuildToggleField::AssignRolesOnJoin => {
            "Modify the roles of members when they're approved.\n\
             This is useful for granting users access to the rest of the server."
        }
        GuildToggleField::SetNicknameOnJoin => {
            "Modify the nickname of members when they're approved.\n\
             This is useful for ensuring players can be easily identified."
        }
        GuildToggleField::SetNicknameOnUpdate => {
            "Modify the nickname of members when they update their Total XP.\n\
             This is useful for setting levels in their name."
        }
    }
}

async fn handle_team_role(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: u64,
    field: TeamRoleField,
    role_id: Option<u64>,
) -> miette::Result<()> {
    let mut settings = state.store.guild(guild_id).await?;
    match role_id {
        Some(role_id) => {
            field.set(&mut settings, role_id);
            state.store.set_guild(guild_id, settings).await?;
            respond_then_delete(
                ctx,
                command,
                success(&format!(
                    "`guild.{}` set to {}",
                    field.key(),
                    role_mention(role_id)
                )),
            )
            .await
            .map_err(|e| miette::miette!("Failed to send acknowledgement: {}", e))
        }
        None => {
            let current = match field.get(&settings) {
                Some(id) => role_mention(id),
                None => "not set".to_string(),
            };
            let text = format!("`guild.{}` is {}", field.key(), current);
            respond(ctx, command, text, false)
                .await
                .map_err(|e| miette::miette!("Failed to send current value: {}", e))
        }
    }
}

async fn handle_introduction_note(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: u64,
    value: Option<&str>,
) -> miette::Result<()> {
    let mut settings = state.store.guild(guild_id).await?;
    match value {
        Some(value) => {
            let stored = text_or_cleared(value);
            settings.introduction_note = Some(stored.clone());
            state.store.set_guild(guild_id, settings).await?;
            respond_then_delete(
                ctx,
                command,
                success(&format!(
                    "`guild.introduction_note` set to {}",
                    display_stored_text(&Some(stored))
                )),
            )
            .await
            .map_err(|e| miette::miette!("Failed to send acknowledgement: {}", e))
        }
        None => {
            let text = format!(
                "Send a note to a member upon approval.\n\
                 Set value to `None` to empty it.\n\n\
                 `guild.introduction_note` is {}",
                display_stored_text(&settings.introduction_note)
            );
            respond(ctx, command, text, false)
                .await
                .map_err(|e| miette::miette!("Failed to send current value: {}", e))
        }
    }
}

/// Which roles to add/remove on profile approval.
///
/// A mutation REPLACES the stored list with the mentions of the triggering
/// invocation; it does not merge with prior contents. Without an action
/// keyword the current state is only displayed.
async fn handle_approval_roles(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    guild_id: u64,
    action: Option<&str>,
    roles_text: Option<&str>,
) -> miette::Result<()> {
    let mut settings = state.store.guild(guild_id).await?;
    let mentioned = roles_text.map(parse_role_mentions).unwrap_or_default();
    let mutated = apply_role_action(
        &mut settings.roles_to_assign_on_approval,
        action,
        mentioned,
    );

    if mutated {
        state
            .store
            .set_guild(guild_id, settings.clone())
            .await?;
        let dump = stored_roles_json(&settings.roles_to_assign_on_approval)?;
        respond_then_delete(ctx, command, format!("✅\n{}", code_box(&dump, "json")))
            .await
            .map_err(|e| miette::miette!("Failed to send acknowledgement: {}", e))
    } else {
        let dump = stored_roles_json(&settings.roles_to_assign_on_approval)?;
        let text = format!(
            "Which roles to add/remove to a user on approval.\n\
             Usage:\n\
             `/tdxset guild roles_to_assign_on_approval action:add roles:@Verified @Trainer`\n\
             `/tdxset guild roles_to_assign_on_approval action:remove roles:@Guest`\n\n{}",
            code_box(&dump, "json")
        );
        respond(ctx, command, text, false)
            .await
            .map_err(|e| miette::miette!("Failed to send current state: {}", e))
    }
}

/// Apply an add/remove action to the stored role lists. The named list is
/// REPLACED with `mentioned`; an empty mention set or a missing action
/// leaves the lists untouched. Returns whether a write is needed.
fn apply_role_action(roles: &mut StoredRoles, action: Option<&str>, mentioned: Vec<u64>) -> bool {
    match action {
        Some("add") if !mentioned.is_empty() => {
            roles.add = mentioned;
            true
        }
        Some("remove") if !mentioned.is_empty() => {
            roles.remove = mentioned;
            true
        }
        Some("add") | Some("remove") | None => false,
        Some(other) => {
            debug!(action = other, "unrecognized action keyword");
            false
        }
    }
}

fn stored_roles_json(roles: &StoredRoles) -> miette::Result<String> {
    serde_json::to_string_pretty(roles).into_diagnostic()
}

async fn handle_channel_group(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    subs: &[ResolvedOption<'_>],
) -> miette::Result<()> {
    let channel_id = command.channel_id.get();

    let Some(sub) = subs.first() else {
        return show_channel_settings(state, ctx, command, channel_id).await;
    };
    let ResolvedValue::SubCommand(args) = &sub.value else {
        return show_channel_settings(state, ctx, command, channel_id).await;
    };

    match sub.name {
        "profile_ocr" => {
            let mut settings = state.store.channel(channel_id).await?;
            match bool_arg(args) {
                Some(value) => {
                    settings.profile_ocr = value;
                    state.store.set_channel(channel_id, settings).await?;
                    respond_then_delete(
                        ctx,
                        command,
                        success(&format!(
                            "`channel[{channel_id}].profile_ocr` set to {value}"
                        )),
                    )
                    .await
                    .map_err(|e| miette::miette!("Failed to send acknowledgement: {}", e))
                }
                None => {
                    let text = format!(
                        "Set if this channel should accept OCR commands.\n\n\
                         `channel[{channel_id}].profile_ocr` is {}",
                        settings.profile_ocr
                    );
                    respond(ctx, command, text, false)
                        .await
                        .map_err(|e| miette::miette!("Failed to send current value: {}", e))
                }
            }
        }
        _ => show_channel_settings(state, ctx, command, channel_id).await,
    }
}

async fn show_channel_settings(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    channel_id: u64,
) -> miette::Result<()> {
    let settings = state.store.channel(channel_id).await?;
    let dump = serde_json::to_string_pretty(&settings).into_diagnostic()?;
    respond(ctx, command, code_box(&dump, "json"), false)
        .await
        .map_err(|e| miette::miette!("Failed to send settings dump: {}", e))
}

#[derive(Debug, Clone, Copy)]
enum GlobalTextField {
    Notice,
    EmbedFooter,
}

impl GlobalTextField {
    fn key(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::EmbedFooter => "embed_footer",
        }
    }
}

/// Owner-only free-text settings at global scope.
async fn handle_global_text(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
    field: GlobalTextField,
    args: &[ResolvedOption<'_>],
) -> miette::Result<()> {
    if !state.owner_ids.contains(&command.user.id.get()) {
        return respond(
            ctx,
            command,
            "🚫 Only the bot owner can change this setting.".to_string(),
            true,
        )
        .await
        .map_err(|e| miette::miette!("Failed to send authorization response: {}", e));
    }

    let mut settings = state.store.global().await?;
    match str_arg(args, "value") {
        Some(value) => {
            let stored = text_or_cleared(value);
            match field {
                GlobalTextField::Notice => settings.notice = Some(stored.clone()),
                GlobalTextField::EmbedFooter => settings.embed_footer = Some(stored.clone()),
            }
            state.store.set_global(settings).await?;
            respond_then_delete(
                ctx,
                command,
                success(&format!(
                    "`{}` set to {}",
                    field.key(),
                    display_stored_text(&Some(stored))
                )),
            )
            .await
            .map_err(|e| miette::miette!("Failed to send acknowledgement: {}", e))
        }
        None => {
            let current = match field {
                GlobalTextField::Notice => &settings.notice,
                GlobalTextField::EmbedFooter => &settings.embed_footer,
            };
            let text = format!("`{}` is {}", field.key(), display_stored_text(current));
            respond(ctx, command, text, false)
                .await
                .map_err(|e| miette::miette!("Failed to send current value: {}", e))
        }
    }
}

/// The literal token `None` (exact, case-sensitive) clears a free-text
/// value to empty; anything else is stored as-is.
fn text_or_cleared(value: &str) -> String {
    if value == "None" {
        String::new()
    } else {
        value.to_string()
    }
}

/// Render a stored free-text value, keeping "not set" distinct from a
/// value cleared to empty.
fn display_stored_text(value: &Option<String>) -> String {
    match value {
        None => "not set".to_string(),
        Some(s) if s.is_empty() => "\"\"".to_string(),
        Some(s) => s.clone(),
    }
}

fn bool_arg(args: &[ResolvedOption<'_>]) -> Option<bool> {
    args.iter().find(|o| o.name == "value").and_then(|o| match &o.value {
        ResolvedValue::Boolean(b) => Some(*b),
        _ => None,
    })
}

fn role_arg(args: &[ResolvedOption<'_>]) -> Option<u64> {
    args.iter().find(|o| o.name == "value").and_then(|o| match &o.value {
        ResolvedValue::Role(role) => Some(role.id.get()),
        _ => None,
    })
}

fn str_arg<'a>(args: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    args.iter().find(|o| o.name == name).and_then(|o| match &o.value {
        ResolvedValue::String(s) => Some(*s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn none_token_clears_to_empty() {
        assert_eq!(text_or_cleared("None"), "");
        // The sentinel is exact and case-sensitive.
        assert_eq!(text_or_cleared("none"), "none");
        assert_eq!(text_or_cleared("NONE"), "NONE");
        assert_eq!(text_or_cleared("welcome!"), "welcome!");
    }

    #[test]
    fn cleared_renders_distinct_from_unset() {
        assert_eq!(display_stored_text(&None), "not set");
        assert_eq!(display_stored_text(&Some(String::new())), "\"\"");
        assert_eq!(display_stored_text(&Some("hi".into())), "hi");
    }

    #[test]
    fn global_text_fields_have_stable_keys() {
        assert_eq!(GlobalTextField::Notice.key(), "notice");
        assert_eq!(GlobalTextField::EmbedFooter.key(), "embed_footer");
    }

    #[test]
    fn add_action_replaces_the_stored_list() {
        let mut roles = StoredRoles {
            add: vec![1, 2],
            remove: vec![9],
        };
        assert!(apply_role_action(&mut roles, Some("add"), vec![3]));
        // Earlier additions are discarded, not merged.
        assert_eq!(roles.add, vec![3]);
        assert_eq!(roles.remove, vec![9]);
    }

    #[test]
    fn remove_action_replaces_only_the_remove_list() {
        let mut roles = StoredRoles::default();
        assert!(apply_role_action(&mut roles, Some("remove"), vec![7, 8]));
        assert_eq!(roles.remove, vec![7, 8]);
        assert!(roles.add.is_empty());
    }

    #[test]
    fn empty_mentions_or_missing_action_leave_lists_untouched() {
        let mut roles = StoredRoles {
            add: vec![1],
            remove: vec![2],
        };
        assert!(!apply_role_action(&mut roles, Some("add"), vec![]));
        assert!(!apply_role_action(&mut roles, None, vec![3]));
        assert!(!apply_role_action(&mut roles, Some("purge"), vec![3]));
        assert_eq!(roles.add, vec![1]);
        assert_eq!(roles.remove, vec![2]);
    }
}
