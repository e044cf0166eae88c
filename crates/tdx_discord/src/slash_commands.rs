//! Slash command tree registration and dispatch.

use serenity::{
    builder::{CreateCommand, CreateCommandOption},
    client::Context,
    model::{
        application::{CommandInteraction, CommandOptionType},
        permissions::Permissions,
    },
};
use tracing::warn;

use crate::bot::TdxState;
use crate::{quickstart, settings_commands};

/// Create all slash commands for registration
pub fn create_commands() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("quickstart")
            .description("Find team and level-40 roles in this server and save them")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .dm_permission(false),
        CreateCommand::new("tdxset")
            .description("Set server and/or channel settings")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(guild_group())
            .add_option(channel_group())
            .add_option(text_sub("notice", "Global notice shown to users (owner only)"))
            .add_option(text_sub("footer", "Global embed footer (owner only)")),
    ]
}

fn guild_group() -> CreateCommandOption {
    CreateCommandOption::new(
        CommandOptionType::SubCommandGroup,
        "guild",
        "Server-scoped settings",
    )
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::SubCommand,
        "show",
        "Show the current server settings",
    ))
    .add_sub_option(toggle_sub(
        "assign_roles_on_join",
        "Modify the roles of members when they're approved",
    ))
    .add_sub_option(toggle_sub(
        "set_nickname_on_join",
        "Modify the nickname of members when they're approved",
    ))
    .add_sub_option(toggle_sub(
        "set_nickname_on_update",
        "Modify the nickname of members when they update their Total XP",
    ))
    .add_sub_option(
        CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "roles_to_assign_on_approval",
            "Which roles to add/remove to a user on approval",
        )
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "action", "add or remove")
                .add_string_choice("add", "add")
                .add_string_choice("remove", "remove")
                .required(false),
        )
        .add_sub_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "roles",
                "Role mentions to store for this action",
            )
            .required(false),
        ),
    )
    .add_sub_option(role_sub("mystic_role", "Role for Team Mystic members"))
    .add_sub_option(role_sub("valor_role", "Role for Team Valor members"))
    .add_sub_option(role_sub("instinct_role", "Role for Team Instinct members"))
    .add_sub_option(role_sub("tl40_role", "Role for level 40 trainers"))
    .add_sub_option(text_sub(
        "introduction_note",
        "Note sent to a member on approval ('None' to clear)",
    ))
}

fn channel_group() -> CreateCommandOption {
    CreateCommandOption::new(
        CommandOptionType::SubCommandGroup,
        "channel",
        "Channel-scoped settings",
    )
    .add_sub_option(CreateCommandOption::new(
        CommandOptionType::SubCommand,
        "show",
        "Show the current channel settings",
    ))
    .add_sub_option(toggle_sub(
        "profile_ocr",
        "Set if this channel should accept OCR commands",
    ))
}

fn toggle_sub(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, description).add_sub_option(
        CreateCommandOption::new(CommandOptionType::Boolean, "value", "New value").required(false),
    )
}

fn role_sub(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, description).add_sub_option(
        CreateCommandOption::new(CommandOptionType::Role, "value", "New role").required(false),
    )
}

fn text_sub(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, description).add_sub_option(
        CreateCommandOption::new(CommandOptionType::String, "value", "New value").required(false),
    )
}

/// Route a command interaction to its handler.
pub async fn dispatch(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
) -> miette::Result<()> {
    match command.data.name.as_str() {
        "quickstart" => quickstart::handle_quickstart(state, ctx, command).await,
        "tdxset" => settings_commands::handle_tdxset(state, ctx, command).await,
        other => {
            warn!(command = other, "no handler registered for command");
            Ok(())
        }
    }
}
