//! Piece identities and kinds.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TacticsError;

/// Unique identifier for pieces, as assigned by the host simulation.
pub type PieceId = u64;

/// Country identifier, as named by the host simulation.
pub type CountryId = String;

/// Every piece type the host simulation knows about.
///
/// Serialized in `snake_case` (`"iron_dome"`); the host's older spelling
/// `"irondome"` is accepted on input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// Ground attacker.
    Tank,
    /// Fixed-wing aircraft.
    Airplane,
    /// Rotary-wing aircraft.
    Helicopter,
    /// Anti-armour ground unit.
    Antitank,
    /// Long-range ground unit.
    Artillery,
    /// Collects money and constructs new pieces.
    Builder,
    /// Long-sight ground structure.
    Tower,
    /// Very long-sight orbital unit.
    Satellite,
    /// Defensive structure.
    Bunker,
    /// Covert unit.
    Spy,
    /// Missile defence structure.
    #[serde(alias = "irondome")]
    IronDome,
}

impl PieceKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Tank,
        Self::Airplane,
        Self::Helicopter,
        Self::Antitank,
        Self::Artillery,
        Self::Builder,
        Self::Tower,
        Self::Satellite,
        Self::Bunker,
        Self::Spy,
        Self::IronDome,
    ];

    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tank => "tank",
            Self::Airplane => "airplane",
            Self::Helicopter => "helicopter",
            Self::Antitank => "antitank",
            Self::Artillery => "artillery",
            Self::Builder => "builder",
            Self::Tower => "tower",
            Self::Satellite => "satellite",
            Self::Bunker => "bunker",
            Self::Spy => "spy",
            Self::IronDome => "iron_dome",
        }
    }

    /// Whether this kind can be airborne.
    #[must_use]
    pub const fn is_aircraft(self) -> bool {
        matches!(self, Self::Airplane | Self::Helicopter)
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceKind {
    type Err = TacticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "irondome" {
            return Ok(Self::IronDome);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TacticsError::UnknownPieceKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_kinds() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.as_str().parse::<PieceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_iron_dome_spellings() {
        assert_eq!("iron_dome".parse::<PieceKind>().unwrap(), PieceKind::IronDome);
        assert_eq!("irondome".parse::<PieceKind>().unwrap(), PieceKind::IronDome);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "battleship".parse::<PieceKind>().unwrap_err();
        assert!(matches!(err, TacticsError::UnknownPieceKind(name) if name == "battleship"));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PieceKind::IronDome).unwrap();
        assert_eq!(json, "\"iron_dome\"");
        let kind: PieceKind = serde_json::from_str("\"irondome\"").unwrap();
        assert_eq!(kind, PieceKind::IronDome);
    }

    #[test]
    fn test_aircraft() {
        assert!(PieceKind::Airplane.is_aircraft());
        assert!(PieceKind::Helicopter.is_aircraft());
        assert!(!PieceKind::Satellite.is_aircraft());
    }
}
