//! Determinism testing utilities.
//!
//! The agent must produce the same actions for the same sequence of
//! snapshots, regardless of how many times or in which process it runs.
//! Sources of non-determinism guarded against:
//!
//! - **Floating-point math**: heuristics use [`tactics_core::math::Fixed`].
//! - **HashMap iteration order**: every index is a `BTreeMap`/`BTreeSet`.
//! - **System randomness**: relocation and tie-breaks are fully ordered.
//!
//! [`play_match`] drives a commander against the in-memory host for a number
//! of turns, and [`verify_determinism`] replays the same match several times
//! and compares the action transcripts.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tactics_core::config::EngineConfig;
use tactics_core::engine::{Commander, Turn};
use tactics_core::orders::Action;
use tactics_core::snapshot::Snapshot;

use crate::host::apply_actions;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical transcripts.
    pub is_deterministic: bool,
    /// Transcript hash of each run.
    pub hashes: Vec<u64>,
    /// Turns played per run.
    pub turns: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic agent).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the agent was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different transcripts.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Agent is non-deterministic!\n\
                 Runs: {}\n\
                 Turns: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.turns,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Actions of every turn of a match, in turn order.
pub type Transcript = Vec<Vec<Action>>;

/// Play `turns` turns starting from `initial`.
///
/// Each turn the `policy` issues requests on the open [`Turn`]; the finished
/// actions are then applied to the snapshot by the in-memory host before the
/// next turn begins. Turns whose snapshot is rejected record no actions.
pub fn play_match<P>(
    config: EngineConfig,
    initial: Snapshot,
    turns: u64,
    mut policy: P,
) -> (Commander, Transcript)
where
    P: FnMut(&mut Turn<'_>),
{
    let mut commander = Commander::new(config);
    let mut snapshot = initial;
    let mut transcript = Vec::new();

    for _ in 0..turns {
        let costs = commander.config().costs.clone();
        let actions = match commander.begin_turn(snapshot.clone()) {
            Ok(mut turn) => {
                policy(&mut turn);
                turn.finish()
            }
            Err(err) => {
                tracing::warn!("Snapshot rejected: {}", err);
                Vec::new()
            }
        };
        apply_actions(&mut snapshot, &actions, &costs);
        transcript.push(actions);
    }

    (commander, transcript)
}

/// Play the same match `runs` times and compare transcripts.
///
/// # Example
///
/// ```
/// use tactics_core::config::EngineConfig;
/// use tactics_test_utils::determinism::verify_determinism;
/// use tactics_test_utils::fixtures::builder_next_to_money;
///
/// let result = verify_determinism(3, 10, EngineConfig::default, builder_next_to_money, |turn| {
///     let _ = turn.collect_money(1, 20);
/// });
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<C, S, P>(
    runs: usize,
    turns: u64,
    config: C,
    setup: S,
    policy: P,
) -> DeterminismResult
where
    C: Fn() -> EngineConfig,
    S: Fn() -> Snapshot,
    P: Fn(&mut Turn<'_>),
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let (_, transcript) = play_match(config(), setup(), turns, &policy);
            compute_hash(&transcript)
        })
        .collect();

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        turns,
    }
}

/// Compare two runs turn by turn, finding the first divergence.
///
/// # Returns
///
/// `None` if the transcripts match, `Some(turn)` (zero based) otherwise.
#[must_use]
pub fn find_first_divergence(left: &Transcript, right: &Transcript) -> Option<usize> {
    left.iter()
        .zip(right)
        .position(|(a, b)| a != b)
        .or_else(|| (left.len() != right.len()).then_some(left.len().min(right.len())))
}

/// Compute a simple hash of a transcript.
#[must_use]
pub fn compute_hash(transcript: &Transcript) -> u64 {
    let mut hasher = DefaultHasher::new();
    for actions in transcript {
        actions.len().hash(&mut hasher);
        for action in actions {
            format!("{action:?}").hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Proptest strategies for property-based tests.
pub mod strategies {
    use proptest::prelude::*;
    use tactics_core::math::Coordinates;
    use tactics_core::piece::PieceKind;
    use tactics_core::snapshot::{PieceSnapshot, Snapshot};

    use crate::fixtures::{ENEMY, HOME};

    /// Any piece kind.
    pub fn arb_piece_kind() -> impl Strategy<Value = PieceKind> {
        proptest::sample::select(PieceKind::ALL.to_vec())
    }

    /// Coordinates inside a `width` x `height` board.
    pub fn arb_coordinates(width: u32, height: u32) -> impl Strategy<Value = Coordinates> {
        (0..width as i32, 0..height as i32).prop_map(|(x, y)| Coordinates::new(x, y))
    }

    /// Coordinates anywhere on a large grid, including negatives.
    pub fn arb_any_coordinates() -> impl Strategy<Value = Coordinates> {
        (-1000i32..1000, -1000i32..1000).prop_map(|(x, y)| Coordinates::new(x, y))
    }

    /// A piece of any kind, grounded or airborne, with optional money.
    pub fn arb_piece(id: u64) -> impl Strategy<Value = PieceSnapshot> {
        (
            arb_piece_kind(),
            any::<bool>(),
            proptest::option::of(0u32..200),
            proptest::option::of(0u32..50),
            any::<bool>(),
        )
            .prop_map(move |(kind, ours, money, time_in_air, flying)| {
                let country = if ours { HOME } else { ENEMY };
                let mut piece = PieceSnapshot::new(id, kind, country);
                piece.money = money;
                piece.flying = flying;
                piece.time_in_air = time_in_air;
                piece
            })
    }

    /// A board of up to `max_side` x `max_side` with random owners, money
    /// and up to `max_pieces` pieces.
    pub fn arb_snapshot(max_side: u32, max_pieces: usize) -> impl Strategy<Value = Snapshot> {
        (1..=max_side, 1..=max_side)
            .prop_flat_map(move |(width, height)| {
                let cells = (width * height) as usize;
                (
                    Just((width, height)),
                    proptest::collection::vec((0u8..3, 0u32..20), cells),
                    proptest::collection::vec(
                        (arb_coordinates(width, height), arb_piece(0)),
                        0..=max_pieces,
                    ),
                )
            })
            .prop_map(|((width, height), tiles, pieces)| {
                let mut snapshot = Snapshot::blank(width, height, HOME);
                for (tile, (owner, money)) in snapshot.tiles.iter_mut().zip(tiles) {
                    tile.country = match owner {
                        0 => None,
                        1 => Some(HOME.to_string()),
                        _ => Some(ENEMY.to_string()),
                    };
                    tile.money = money;
                }
                for (id, (cell, mut piece)) in pieces.into_iter().enumerate() {
                    piece.id = id as u64 + 1;
                    snapshot.place(cell, piece);
                }
                snapshot
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{builder_next_to_money, lone_tank, skirmish};
    use tactics_core::math::Coordinates;
    use tactics_core::piece::PieceKind;

    #[test]
    fn test_collecting_builder_is_deterministic() {
        let result = verify_determinism(
            3,
            12,
            EngineConfig::default,
            builder_next_to_money,
            |turn| {
                let _ = turn.build(1, PieceKind::Tank);
            },
        );
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
    }

    #[test]
    fn test_skirmish_is_deterministic() {
        verify_determinism(
            4,
            20,
            EngineConfig::default,
            || skirmish(12),
            |turn| {
                let _ = turn.collect_money(1, 40);
                for tank in turn.piece_of_type(PieceKind::Tank) {
                    if turn.report_attacking_pieces()[&tank].is_none() {
                        let _ = turn.attack(tank, Coordinates::new(10, 6));
                    }
                }
            },
        )
        .assert_deterministic();
    }

    #[test]
    fn test_play_match_applies_actions() {
        let (commander, transcript) = play_match(EngineConfig::default(), lone_tank(0, 0), 5, {
            let mut issued = false;
            move |turn: &mut Turn<'_>| {
                if !issued {
                    issued = turn.attack(1, Coordinates::new(0, 3)).is_ok();
                }
            }
        });
        assert_eq!(transcript.len(), 5);
        assert!(transcript[0].is_empty());
        assert_eq!(transcript[3].last(), Some(&Action::Attack { piece: 1 }));
        assert!(transcript[4].is_empty());
        assert_eq!(commander.ledger().active_count(), 0);
    }

    #[test]
    fn test_find_first_divergence() {
        let a: Transcript = vec![vec![], vec![Action::Attack { piece: 1 }]];
        let b: Transcript = vec![vec![], vec![Action::Attack { piece: 2 }]];
        assert_eq!(find_first_divergence(&a, &a), None);
        assert_eq!(find_first_divergence(&a, &b), Some(1));
        assert_eq!(find_first_divergence(&a, &a[..1].to_vec()), Some(1));
    }
}
