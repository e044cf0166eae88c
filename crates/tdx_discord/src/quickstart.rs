//! Guild role auto-discovery.
//!
//! `/quickstart` scans the guild's role list for the three team roles and
//! the level-40 role, persists whatever it finds, and dumps the resulting
//! configuration back to the channel. Matching is best-effort: a missing
//! role is skipped silently, and when several roles match the lowest one in
//! the guild's role ordering wins.

use miette::IntoDiagnostic;
use serenity::{
    builder::{CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse},
    client::Context,
    model::{application::CommandInteraction, guild::Role},
};
use tracing::debug;

use tdx_core::settings::TeamRoleField;

use crate::bot::TdxState;
use crate::helpers::{code_box, followup, followup_then_delete, loading, role_mention};

/// The slice of a guild role the matcher cares about. Ordering follows the
/// guild's role ordering: position first, id as tie-break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCandidate {
    pub id: u64,
    pub name: String,
    pub position: u16,
}

impl From<&Role> for RoleCandidate {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.get(),
            name: role.name.clone(),
            position: role.position,
        }
    }
}

/// Outcome of one best-effort lookup. `candidates` holds every role that
/// matched, so an ambiguous match stays observable even though only
/// `chosen` is acted upon.
#[derive(Debug, Clone, Default)]
pub struct RoleMatch {
    pub chosen: Option<RoleCandidate>,
    pub candidates: Vec<RoleCandidate>,
}

/// Find roles whose name contains any of `labels` as a case-insensitive
/// substring; choose the minimum under (position, id) ordering.
pub fn best_effort_role_match(roles: &[RoleCandidate], labels: &[&str]) -> RoleMatch {
    let candidates: Vec<RoleCandidate> = roles
        .iter()
        .filter(|role| {
            let name = role.name.to_lowercase();
            labels.iter().any(|label| name.contains(&label.to_lowercase()))
        })
        .cloned()
        .collect();
    let chosen = candidates
        .iter()
        .min_by_key(|role| (role.position, role.id))
        .cloned();
    RoleMatch { chosen, candidates }
}

/// Handle the /quickstart command.
pub async fn handle_quickstart(
    state: &TdxState,
    ctx: &Context,
    command: &CommandInteraction,
) -> miette::Result<()> {
    let Some(guild_id) = command.guild_id else {
        command
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content("This command can only be used in a server.")
                        .ephemeral(true),
                ),
            )
            .await
            .map_err(|e| miette::miette!("Failed to send guild-only response: {}", e))?;
        return Ok(());
    };

    // Progress message, edited as the scan moves on and deleted at the end.
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content(loading("Looking for team roles…")),
            ),
        )
        .await
        .map_err(|e| miette::miette!("Failed to send progress message: {}", e))?;

    let roles = ctx
        .http
        .get_guild_roles(guild_id)
        .await
        .map_err(|e| miette::miette!("Failed to fetch guild roles: {}", e))?;
    let candidates: Vec<RoleCandidate> = roles.iter().map(RoleCandidate::from).collect();

    let mut settings = state.store.guild(guild_id.get()).await?;

    for field in TeamRoleField::ALL {
        if field == TeamRoleField::Level40 {
            command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new().content(loading("Looking for TL40 role…")),
                )
                .await
                .map_err(|e| miette::miette!("Failed to edit progress message: {}", e))?;
        }

        let matched = best_effort_role_match(&candidates, field.search_labels());
        if matched.candidates.len() > 1 {
            debug!(
                field = %field,
                candidates = ?matched.candidates,
                "ambiguous role match, taking the lowest-ordered role"
            );
        }
        match matched.chosen {
            Some(role) => {
                field.set(&mut settings, role.id);
                state.store.set_guild(guild_id.get(), settings.clone()).await?;
                followup_then_delete(
                    ctx,
                    command,
                    format!("`{}` set to {}", field.key(), role_mention(role.id)),
                )
                .await
                .map_err(|e| miette::miette!("Failed to send confirmation: {}", e))?;
            }
            None => {
                debug!(field = %field, "no matching role, skipping");
            }
        }
    }

    if let Err(e) = command.delete_response(&ctx.http).await {
        debug!("Failed to delete progress message: {}", e);
    }

    followup(ctx, command, "That's it for now.".to_string())
        .await
        .map_err(|e| miette::miette!("Failed to send summary: {}", e))?;

    let dump = serde_json::to_string_pretty(&settings).into_diagnostic()?;
    followup(ctx, command, code_box(&dump, "json"))
        .await
        .map_err(|e| miette::miette!("Failed to send settings dump: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn role(id: u64, name: &str, position: u16) -> RoleCandidate {
        RoleCandidate {
            id,
            name: name.to_string(),
            position,
        }
    }

    #[test]
    fn sole_substring_match_is_chosen() {
        let roles = vec![
            role(1, "Team Mystic", 3),
            role(2, "Valor Squad", 2),
            role(3, "random", 1),
        ];
        let matched = best_effort_role_match(&roles, TeamRoleField::Mystic.search_labels());
        assert_eq!(matched.chosen.unwrap().id, 1);
        assert_eq!(matched.candidates.len(), 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let roles = vec![role(1, "MYSTIC crew", 0)];
        let matched = best_effort_role_match(&roles, &["mystic"]);
        assert_eq!(matched.chosen.unwrap().id, 1);
    }

    #[test]
    fn zero_matches_chooses_nothing() {
        let roles = vec![role(1, "random", 0)];
        let matched = best_effort_role_match(&roles, TeamRoleField::Instinct.search_labels());
        assert!(matched.chosen.is_none());
        assert!(matched.candidates.is_empty());
    }

    #[test]
    fn ambiguous_match_takes_lowest_ordered_role_and_reports_all() {
        let roles = vec![
            role(10, "Mystic Leaders", 5),
            role(11, "Team Mystic", 1),
            role(12, "mystic-chat", 1),
        ];
        let matched = best_effort_role_match(&roles, &["mystic"]);
        // Position ties break on id.
        assert_eq!(matched.chosen.unwrap().id, 11);
        assert_eq!(matched.candidates.len(), 3);
    }

    #[test]
    fn level40_matches_either_alias() {
        let roles = vec![role(1, "TL40 Club", 0)];
        let matched = best_effort_role_match(&roles, TeamRoleField::Level40.search_labels());
        assert_eq!(matched.chosen.unwrap().id, 1);

        let roles = vec![role(2, "Level 40+", 0)];
        let matched = best_effort_role_match(&roles, TeamRoleField::Level40.search_labels());
        assert_eq!(matched.chosen.unwrap().id, 2);
    }
}
