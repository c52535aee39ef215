//! Engine configuration.
//!
//! Every heuristic constant the planners use lives here so that variants of
//! the agent differ only in data. Configs are written in RON; any field left
//! out keeps its default.
//!
//! ```ron
//! (
//!     economy: (collect_cap: 8, relocation: Safest(radius: 3)),
//!     attackers: [tank, artillery],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::SightTable;
use crate::construction::CostTable;
use crate::danger::PowerTable;
use crate::economy::EconomyConfig;
use crate::error::Result;
use crate::piece::PieceKind;

/// Tunables shared by all planners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Economic planner tunables.
    pub economy: EconomyConfig,
    /// Build cost per kind.
    pub costs: CostTable,
    /// Combat power per kind.
    pub powers: PowerTable,
    /// Sight radius per kind.
    pub sight: SightTable,
    /// Kinds allowed to take attack missions.
    pub attackers: Vec<PieceKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            economy: EconomyConfig::default(),
            costs: CostTable::default(),
            powers: PowerTable::default(),
            sight: SightTable::default(),
            attackers: vec![PieceKind::Tank],
        }
    }
}

impl EngineConfig {
    /// Load a config from a RON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading engine config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid config.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Ok(ron::from_str(ron)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::danger::PowerRule;
    use crate::economy::RelocationPolicy;
    use crate::error::TacticsError;
    use crate::math::Coordinates;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_ron_str("()").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_ron_str(
            "(economy: (collect_cap: 8, relocation: Fixed((x: 1, y: 2))), attackers: [tank, artillery])",
        )
        .unwrap();
        assert_eq!(config.economy.collect_cap, 8);
        assert_eq!(config.economy.min_collect, 5);
        assert_eq!(
            config.economy.relocation,
            RelocationPolicy::Fixed(Coordinates::new(1, 2))
        );
        assert_eq!(config.attackers, [PieceKind::Tank, PieceKind::Artillery]);
        assert_eq!(config.costs, CostTable::default());
    }

    #[test]
    fn test_cost_and_power_tables() {
        let config = EngineConfig::from_ron_str(
            "(costs: {tank: 3}, powers: (default: 1, rules: {spy: Constant(7)}))",
        )
        .unwrap();
        assert_eq!(config.costs.cost(PieceKind::Tank), Some(3));
        assert_eq!(config.costs.cost(PieceKind::Builder), None);
        assert_eq!(config.powers.rule(PieceKind::Spy), PowerRule::Constant(7));
        assert_eq!(config.powers.rule(PieceKind::Tank), PowerRule::Constant(1));
    }

    #[test]
    fn test_round_trip_through_ron() {
        let mut config = EngineConfig::default();
        config.economy.relocation = RelocationPolicy::Safest { radius: 4 };
        let text = ron::ser::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_ron_is_rejected() {
        let result = EngineConfig::from_ron_str("(economy: 12)");
        assert!(matches!(result, Err(TacticsError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::load("/definitely/not/here.ron");
        assert!(matches!(result, Err(TacticsError::ConfigRead(_))));
    }
}
