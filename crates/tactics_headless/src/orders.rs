//! Scripted standing orders for the headless agent.
//!
//! Standing orders describe what the agent does every turn without a human
//! or external controller in the loop: what its builders construct, when and
//! where its attackers march. They are written in RON and executed by a
//! [`Doctrine`].

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tactics_core::construction::CostTable;
use tactics_core::engine::Turn;
use tactics_core::error::TacticsError;
use tactics_core::ledger::MissionKind;
use tactics_core::math::Coordinates;
use tactics_core::piece::{PieceId, PieceKind};

use crate::error::{HeadlessError, Result};

/// A complete standing-orders configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingOrders {
    /// Orders name.
    pub name: String,
    /// Build order, consumed front to back.
    pub build_order: Vec<BuildOrderItem>,
    /// Money idle builders collect toward once the build order is done.
    pub collect_target: u32,
    /// First turn attackers are sent out.
    pub attack_from_turn: u64,
    /// Where attackers are sent.
    pub attack_target: AttackTarget,
}

impl Default for StandingOrders {
    fn default() -> Self {
        Self {
            name: "Balanced".to_string(),
            build_order: vec![
                BuildOrderItem::Build(PieceKind::Tank),
                BuildOrderItem::Build(PieceKind::Tank),
                BuildOrderItem::Build(PieceKind::Tower),
                BuildOrderItem::Build(PieceKind::Builder),
                BuildOrderItem::WaitForUnits(PieceKind::Tank, 2),
                BuildOrderItem::Build(PieceKind::Artillery),
            ],
            collect_target: 40,
            attack_from_turn: 10,
            attack_target: AttackTarget::NearestEnemyTile,
        }
    }
}

impl StandingOrders {
    /// Load standing orders from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HeadlessError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let orders: StandingOrders = ron::from_str(&contents)?;
        Ok(orders)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let orders: StandingOrders = ron::from_str(ron)?;
        Ok(orders)
    }

    /// Check that every `Build` item has a configured cost.
    pub fn check_costs(&self, costs: &CostTable) -> Result<()> {
        for item in &self.build_order {
            if let BuildOrderItem::Build(kind) = *item {
                if costs.cost(kind).is_none() {
                    return Err(TacticsError::UnknownBuildType(kind).into());
                }
            }
        }
        Ok(())
    }

    /// Orders that only collect and never attack.
    #[must_use]
    pub fn turtle() -> Self {
        Self {
            name: "Turtle".to_string(),
            build_order: vec![
                BuildOrderItem::Build(PieceKind::Bunker),
                BuildOrderItem::Build(PieceKind::IronDome),
                BuildOrderItem::Build(PieceKind::Tower),
            ],
            collect_target: 100,
            attack_from_turn: u64::MAX,
            attack_target: AttackTarget::Hold,
        }
    }

    /// Orders that pour everything into tanks and attack at once.
    #[must_use]
    pub fn rush() -> Self {
        Self {
            name: "Rush".to_string(),
            build_order: vec![BuildOrderItem::Build(PieceKind::Tank); 4],
            collect_target: 8,
            attack_from_turn: 0,
            attack_target: AttackTarget::NearestEnemyTile,
        }
    }
}

/// A single item in a build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOrderItem {
    /// Build a piece with the first free builder.
    Build(PieceKind),
    /// Wait until some builder carries this much money.
    WaitForMoney(u32),
    /// Wait until we own this many pieces of a kind.
    WaitForUnits(PieceKind, u32),
    /// Wait for a specific turn.
    WaitForTurn(u64),
}

/// Attack destination selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTarget {
    /// Never attack.
    Hold,
    /// Always the same cell.
    Cell(Coordinates),
    /// The enemy-owned tile closest to the attacker, lowest coordinates on
    /// ties.
    NearestEnemyTile,
}

/// Runtime state for executing standing orders.
#[derive(Debug, Clone)]
pub struct Doctrine {
    orders: StandingOrders,
    build_queue: VecDeque<BuildOrderItem>,
}

impl Doctrine {
    /// Create a doctrine for a set of standing orders.
    #[must_use]
    pub fn new(orders: StandingOrders) -> Self {
        let build_queue = orders.build_order.iter().copied().collect();
        Self {
            orders,
            build_queue,
        }
    }

    /// Standing orders being executed.
    #[must_use]
    pub const fn orders(&self) -> &StandingOrders {
        &self.orders
    }

    /// Build order items not yet executed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.build_queue.len()
    }

    /// Issue this turn's requests.
    pub fn command(&mut self, turn: &mut Turn<'_>) {
        self.command_builders(turn);
        self.command_attackers(turn);
    }

    fn command_builders(&mut self, turn: &mut Turn<'_>) {
        for (builder, report) in turn.report_builders() {
            let active = report
                .mission
                .and_then(|id| turn.ledger().mission(id))
                .map(|mission| mission.kind);

            let result = match active {
                Some(MissionKind::Build { kind }) => turn.build(builder, kind).map(|outcome| {
                    if outcome.is_built() {
                        tracing::info!("Builder {} finished {}", builder, kind);
                    }
                }),
                Some(MissionKind::Collect { target_amount }) => {
                    turn.collect_money(builder, target_amount).map(drop)
                }
                _ => match self.next_build(turn, report.money) {
                    Some(kind) => turn.build(builder, kind).map(|_| {
                        self.build_queue.pop_front();
                    }),
                    None => turn
                        .collect_money(builder, self.orders.collect_target)
                        .map(drop),
                },
            };
            if let Err(err) = result {
                tracing::warn!("Builder {} could not follow orders: {}", builder, err);
            }
        }
    }

    /// Pop waits that are satisfied and peek the next kind to build.
    ///
    /// The `Build` item stays queued until the builder accepts it.
    fn next_build(&mut self, turn: &Turn<'_>, money: u32) -> Option<PieceKind> {
        loop {
            let ready = match *self.build_queue.front()? {
                BuildOrderItem::Build(kind) => return Some(kind),
                BuildOrderItem::WaitForMoney(amount) => money >= amount,
                BuildOrderItem::WaitForUnits(kind, count) => {
                    turn.piece_of_type(kind).len() >= count as usize
                }
                BuildOrderItem::WaitForTurn(number) => turn.number() >= number,
            };
            if !ready {
                return None;
            }
            self.build_queue.pop_front();
        }
    }

    fn command_attackers(&self, turn: &mut Turn<'_>) {
        if turn.number() < self.orders.attack_from_turn {
            return;
        }
        let idle: Vec<PieceId> = turn
            .report_attacking_pieces()
            .into_iter()
            .filter(|(_, mission)| mission.is_none())
            .map(|(piece, _)| piece)
            .collect();

        for piece in idle {
            let Some(destination) = self.attack_destination(turn, piece) else {
                continue;
            };
            if let Err(err) = turn.attack(piece, destination) {
                tracing::warn!("Attacker {} could not march: {}", piece, err);
            }
        }
    }

    fn attack_destination(&self, turn: &Turn<'_>, piece: PieceId) -> Option<Coordinates> {
        match self.orders.attack_target {
            AttackTarget::Hold => None,
            AttackTarget::Cell(cell) => Some(cell),
            AttackTarget::NearestEnemyTile => {
                let board = turn.context().board();
                let from = board.piece(piece)?.coordinates;
                board
                    .tiles()
                    .filter(|tile| {
                        tile.country
                            .as_deref()
                            .is_some_and(|owner| owner != board.my_country())
                    })
                    .map(|tile| (from.manhattan_distance(tile.coordinates), tile.coordinates))
                    .min()
                    .map(|(_, cell)| cell)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::config::EngineConfig;
    use tactics_core::engine::Commander;
    use tactics_core::orders::Action;
    use tactics_test_utils::fixtures::{SnapshotBuilder, ENEMY};

    #[test]
    fn test_default_orders_parse_roundtrip() {
        let orders = StandingOrders::default();
        let text = ron::ser::to_string(&orders).unwrap();
        assert_eq!(StandingOrders::from_ron_str(&text).unwrap(), orders);
    }

    #[test]
    fn test_partial_orders_from_ron() {
        let orders = StandingOrders::from_ron_str(
            "(name: \"Scouts\", build_order: [Build(spy), WaitForTurn(3)], attack_target: Cell((x: 1, y: 1)))",
        )
        .unwrap();
        assert_eq!(orders.name, "Scouts");
        assert_eq!(orders.build_order.len(), 2);
        assert_eq!(orders.attack_target, AttackTarget::Cell(Coordinates::new(1, 1)));
        assert_eq!(orders.collect_target, 40);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            StandingOrders::load("/no/such/orders.ron"),
            Err(HeadlessError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rush.ron");
        let text = ron::ser::to_string_pretty(
            &StandingOrders::rush(),
            ron::ser::PrettyConfig::default(),
        )
        .unwrap();
        std::fs::write(&path, text).unwrap();

        let loaded = StandingOrders::load(&path).unwrap();
        assert_eq!(loaded, StandingOrders::rush());
    }

    #[test]
    fn test_load_rejects_bad_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(name: ").unwrap();
        assert!(matches!(
            StandingOrders::load(&path),
            Err(HeadlessError::Ron(_))
        ));
    }

    #[test]
    fn test_builder_follows_build_order() {
        let snapshot = SnapshotBuilder::new(5, 5).builder(1, 2, 2, 30).build();
        let mut doctrine = Doctrine::new(StandingOrders::rush());
        let mut commander = Commander::default();
        let mut turn = commander.begin_turn(snapshot).unwrap();
        doctrine.command(&mut turn);
        assert_eq!(
            turn.finish(),
            [Action::Build {
                piece: 1,
                kind: PieceKind::Tank
            }]
        );
        assert_eq!(doctrine.remaining(), 3);
    }

    #[test]
    fn test_check_costs() {
        let mut costs = CostTable::default();
        assert!(StandingOrders::rush().check_costs(&costs).is_ok());
        costs.remove(PieceKind::Tank);
        assert!(matches!(
            StandingOrders::rush().check_costs(&costs),
            Err(HeadlessError::Tactics(TacticsError::UnknownBuildType(
                PieceKind::Tank
            )))
        ));
    }

    #[test]
    fn test_failed_build_keeps_item_queued() {
        let mut config = EngineConfig::default();
        config.costs.remove(PieceKind::Tank);
        let snapshot = SnapshotBuilder::new(5, 5).builder(1, 2, 2, 30).build();
        let mut doctrine = Doctrine::new(StandingOrders::rush());
        let mut commander = Commander::new(config);
        let mut turn = commander.begin_turn(snapshot).unwrap();
        doctrine.command(&mut turn);
        assert!(turn.ledger().missions().is_empty());
        assert!(turn.finish().is_empty());
        assert_eq!(doctrine.remaining(), 4);
    }

    #[test]
    fn test_waits_block_build_order() {
        let orders = StandingOrders {
            build_order: vec![
                BuildOrderItem::WaitForTurn(2),
                BuildOrderItem::Build(PieceKind::Tank),
            ],
            attack_target: AttackTarget::Hold,
            ..StandingOrders::default()
        };
        let snapshot = SnapshotBuilder::new(5, 5)
            .money(2, 2, 10)
            .builder(1, 2, 2, 30)
            .build();
        let mut doctrine = Doctrine::new(orders);
        let mut commander = Commander::default();

        let mut turn = commander.begin_turn(snapshot.clone()).unwrap();
        doctrine.command(&mut turn);
        assert_eq!(
            turn.finish(),
            [Action::CollectMoney {
                piece: 1,
                amount: 5
            }]
        );
        assert_eq!(doctrine.remaining(), 2);

        // The collect mission stays active until its target is met.
        let mut turn = commander.begin_turn(snapshot).unwrap();
        doctrine.command(&mut turn);
        let _ = turn.finish();
        assert_eq!(doctrine.remaining(), 2);
    }

    #[test]
    fn test_idle_tanks_attack_nearest_enemy_tile() {
        let snapshot = SnapshotBuilder::new(6, 6)
            .claim(5, 0, ENEMY)
            .claim(5, 5, ENEMY)
            .unit(1, PieceKind::Tank, 4, 4)
            .build();
        let mut doctrine = Doctrine::new(StandingOrders::rush());
        let mut commander = Commander::default();
        let mut turn = commander.begin_turn(snapshot).unwrap();
        doctrine.command(&mut turn);

        let mission = turn.ledger().active_mission_of(1).unwrap();
        assert_eq!(
            mission.kind,
            MissionKind::Attack {
                target: Coordinates::new(5, 5)
            }
        );
    }

    #[test]
    fn test_hold_never_attacks() {
        let snapshot = SnapshotBuilder::new(4, 4)
            .claim(3, 3, ENEMY)
            .unit(1, PieceKind::Tank, 0, 0)
            .build();
        let mut doctrine = Doctrine::new(StandingOrders::turtle());
        let mut commander = Commander::default();
        let mut turn = commander.begin_turn(snapshot).unwrap();
        doctrine.command(&mut turn);
        assert!(turn.ledger().missions().is_empty());
    }
}
