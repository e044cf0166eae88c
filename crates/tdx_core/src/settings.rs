//! Typed configuration schema for guild, channel, and global scope.
//!
//! Every option the bot persists has a named, typed field here; lookups go
//! through the enumerated field identifiers instead of string keys.

use serde::{Deserialize, Serialize};

use crate::faction::Faction;

/// Roles granted/revoked when a profile is approved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRoles {
    #[serde(default)]
    pub add: Vec<u64>,
    #[serde(default)]
    pub remove: Vec<u64>,
}

/// Per-guild options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildSettings {
    #[serde(default)]
    pub assign_roles_on_join: bool,
    #[serde(default)]
    pub set_nickname_on_join: bool,
    #[serde(default)]
    pub set_nickname_on_update: bool,
    #[serde(default)]
    pub roles_to_assign_on_approval: StoredRoles,
    #[serde(default)]
    pub mystic_role: Option<u64>,
    #[serde(default)]
    pub valor_role: Option<u64>,
    #[serde(default)]
    pub instinct_role: Option<u64>,
    #[serde(default)]
    pub tl40_role: Option<u64>,
    #[serde(default)]
    pub introduction_note: Option<String>,
}

/// Per-channel options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSettings {
    #[serde(default)]
    pub profile_ocr: bool,
}

/// Bot-wide options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub embed_footer: Option<String>,
}

/// The role-binding subset of guild settings, one variant per target the
/// quickstart reconciler discovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamRoleField {
    Mystic,
    Valor,
    Instinct,
    Level40,
}

impl TeamRoleField {
    pub const ALL: [TeamRoleField; 4] = [
        TeamRoleField::Mystic,
        TeamRoleField::Valor,
        TeamRoleField::Instinct,
        TeamRoleField::Level40,
    ];

    /// Settings key this field persists under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Mystic => "mystic_role",
            Self::Valor => "valor_role",
            Self::Instinct => "instinct_role",
            Self::Level40 => "tl40_role",
        }
    }

    /// Case-insensitive substrings a guild role name may match.
    pub fn search_labels(&self) -> &'static [&'static str] {
        match self {
            Self::Mystic => &["mystic"],
            Self::Valor => &["valor"],
            Self::Instinct => &["instinct"],
            Self::Level40 => &["level 40", "tl40"],
        }
    }

    /// The faction this role binding corresponds to, if any.
    pub fn faction(&self) -> Option<Faction> {
        match self {
            Self::Mystic => Some(Faction::Mystic),
            Self::Valor => Some(Faction::Valor),
            Self::Instinct => Some(Faction::Instinct),
            Self::Level40 => None,
        }
    }

    pub fn get(&self, settings: &GuildSettings) -> Option<u64> {
        match self {
            Self::Mystic => settings.mystic_role,
            Self::Valor => settings.valor_role,
            Self::Instinct => settings.instinct_role,
            Self::Level40 => settings.tl40_role,
        }
    }

    pub fn set(&self, settings: &mut GuildSettings, role_id: u64) {
        match self {
            Self::Mystic => settings.mystic_role = Some(role_id),
            Self::Valor => settings.valor_role = Some(role_id),
            Self::Instinct => settings.instinct_role = Some(role_id),
            Self::Level40 => settings.tl40_role = Some(role_id),
        }
    }
}

impl std::fmt::Display for TeamRoleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The boolean-toggle subset of guild settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuildToggleField {
    AssignRolesOnJoin,
    SetNicknameOnJoin,
    SetNicknameOnUpdate,
}

impl GuildToggleField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::AssignRolesOnJoin => "assign_roles_on_join",
            Self::SetNicknameOnJoin => "set_nickname_on_join",
            Self::SetNicknameOnUpdate => "set_nickname_on_update",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "assign_roles_on_join" => Some(Self::AssignRolesOnJoin),
            "set_nickname_on_join" => Some(Self::SetNicknameOnJoin),
            "set_nickname_on_update" => Some(Self::SetNicknameOnUpdate),
            _ => None,
        }
    }

    pub fn get(&self, settings: &GuildSettings) -> bool {
        match self {
            Self::AssignRolesOnJoin => settings.assign_roles_on_join,
            Self::SetNicknameOnJoin => settings.set_nickname_on_join,
            Self::SetNicknameOnUpdate => settings.set_nickname_on_update,
        }
    }

    pub fn set(&self, settings: &mut GuildSettings, value: bool) {
        match self {
            Self::AssignRolesOnJoin => settings.assign_roles_on_join = value,
            Self::SetNicknameOnJoin => settings.set_nickname_on_join = value,
            Self::SetNicknameOnUpdate => settings.set_nickname_on_update = value,
        }
    }
}

impl std::fmt::Display for GuildToggleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn guild_settings_default_is_all_unset() {
        let settings = GuildSettings::default();
        assert!(!settings.assign_roles_on_join);
        assert_eq!(settings.mystic_role, None);
        assert_eq!(settings.introduction_note, None);
        assert!(settings.roles_to_assign_on_approval.add.is_empty());
    }

    #[test]
    fn settings_survive_a_json_round_trip() {
        let mut settings = GuildSettings::default();
        settings.assign_roles_on_join = true;
        settings.valor_role = Some(42);
        settings.roles_to_assign_on_approval.add = vec![1, 2];
        settings.introduction_note = Some("welcome".into());

        let json = serde_json::to_string(&settings).unwrap();
        let back: GuildSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let back: GuildSettings = serde_json::from_str(r#"{"mystic_role": 7}"#).unwrap();
        assert_eq!(back.mystic_role, Some(7));
        assert!(!back.set_nickname_on_join);
    }

    #[test]
    fn team_role_fields_set_their_own_key() {
        let mut settings = GuildSettings::default();
        for (i, field) in TeamRoleField::ALL.iter().enumerate() {
            field.set(&mut settings, i as u64 + 1);
        }
        assert_eq!(settings.mystic_role, Some(1));
        assert_eq!(settings.valor_role, Some(2));
        assert_eq!(settings.instinct_role, Some(3));
        assert_eq!(settings.tl40_role, Some(4));
        for field in TeamRoleField::ALL {
            assert_eq!(field.get(&settings), Some(field as u64 + 1));
        }
    }

    #[test]
    fn toggle_fields_round_trip_their_key() {
        let mut settings = GuildSettings::default();
        let field = GuildToggleField::from_key("set_nickname_on_update").unwrap();
        assert!(!field.get(&settings));
        field.set(&mut settings, true);
        assert!(settings.set_nickname_on_update);
        assert!(GuildToggleField::from_key("bogus").is_none());
    }

    #[test]
    fn level40_field_has_both_aliases() {
        assert_eq!(TeamRoleField::Level40.search_labels(), ["level 40", "tl40"]);
        assert_eq!(TeamRoleField::Level40.faction(), None);
        assert_eq!(TeamRoleField::Mystic.faction(), Some(Faction::Mystic));
    }
}
