//! The closed set of Pokemon Go teams as defined by the TrainerDex API.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TdxError};

/// One of the four in-game teams. The integer mapping is part of the remote
/// service's contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Faction {
    Teamless,
    Mystic,
    Valor,
    Instinct,
}

impl Faction {
    /// Decode a faction from its wire id. Out-of-range ids are rejected at
    /// decode time rather than silently accepted.
    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            0 => Ok(Self::Teamless),
            1 => Ok(Self::Mystic),
            2 => Ok(Self::Valor),
            3 => Ok(Self::Instinct),
            other => Err(TdxError::UnknownFaction { id: other }),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Teamless => 0,
            Self::Mystic => 1,
            Self::Valor => 2,
            Self::Instinct => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Teamless => "No Team",
            Self::Mystic => "Team Mystic",
            Self::Valor => "Team Valor",
            Self::Instinct => "Team Instinct",
        }
    }

    /// Team colour, used for embed accents.
    pub fn colour(&self) -> (u8, u8, u8) {
        match self {
            Self::Teamless => (146, 146, 146),
            Self::Mystic => (0, 120, 240),
            Self::Valor => (255, 60, 60),
            Self::Instinct => (255, 230, 70),
        }
    }
}

impl TryFrom<i64> for Faction {
    type Error = TdxError;

    fn try_from(value: i64) -> Result<Self> {
        Self::from_id(value)
    }
}

impl From<Faction> for i64 {
    fn from(faction: Faction) -> i64 {
        faction.id()
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_ids_round_trip() {
        for id in 0..=3 {
            assert_eq!(Faction::from_id(id).unwrap().id(), id);
        }
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        assert!(matches!(
            Faction::from_id(4),
            Err(TdxError::UnknownFaction { id: 4 })
        ));
        assert!(matches!(
            Faction::from_id(-1),
            Err(TdxError::UnknownFaction { id: -1 })
        ));
    }

    #[test]
    fn serde_uses_integer_codes() {
        let faction: Faction = serde_json::from_str("2").unwrap();
        assert_eq!(faction, Faction::Valor);
        assert_eq!(serde_json::to_string(&Faction::Instinct).unwrap(), "3");
        assert!(serde_json::from_str::<Faction>("9").is_err());
    }
}
