//! Test fixtures and helpers.
//!
//! Pre-built snapshots and piece layouts for consistent testing.

use tactics_core::math::{Coordinates, Fixed};
use tactics_core::piece::{PieceId, PieceKind};
use tactics_core::snapshot::{PieceSnapshot, Snapshot};

/// Country every fixture plays as.
pub const HOME: &str = "red";
/// Default opponent in fixtures.
pub const ENEMY: &str = "blue";

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> Fixed {
    Fixed::from_num(n)
}

/// Fluent builder for test snapshots.
///
/// Starts from a fully visible, unclaimed board played by [`HOME`].
///
/// ```
/// use tactics_core::piece::PieceKind;
/// use tactics_test_utils::fixtures::SnapshotBuilder;
///
/// let snapshot = SnapshotBuilder::new(5, 5)
///     .money(3, 2, 10)
///     .builder(1, 2, 2, 0)
///     .enemy(9, PieceKind::Tank, 4, 4)
///     .build();
/// assert_eq!(snapshot.all_countries, ["red", "blue"]);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// A `width` x `height` board played by [`HOME`].
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            snapshot: Snapshot::blank(width, height, HOME),
        }
    }

    /// Give a tile to `country`.
    #[must_use]
    pub fn claim(mut self, x: i32, y: i32, country: &str) -> Self {
        self.snapshot.claim(Coordinates::new(x, y), Some(country));
        self
    }

    /// Give every tile of a rectangle to `country`, corners inclusive.
    #[must_use]
    pub fn claim_area(mut self, from: (i32, i32), to: (i32, i32), country: &str) -> Self {
        for x in from.0..=to.0 {
            for y in from.1..=to.1 {
                self.snapshot.claim(Coordinates::new(x, y), Some(country));
            }
        }
        self
    }

    /// Put money on a tile.
    #[must_use]
    pub fn money(mut self, x: i32, y: i32, amount: u32) -> Self {
        self.snapshot.set_money(Coordinates::new(x, y), amount);
        self
    }

    /// Place an arbitrary piece.
    #[must_use]
    pub fn piece(mut self, x: i32, y: i32, piece: PieceSnapshot) -> Self {
        self.snapshot.place(Coordinates::new(x, y), piece);
        self
    }

    /// Place one of our pieces.
    #[must_use]
    pub fn unit(self, id: PieceId, kind: PieceKind, x: i32, y: i32) -> Self {
        self.piece(x, y, PieceSnapshot::new(id, kind, HOME))
    }

    /// Place one of our builders carrying `money`.
    #[must_use]
    pub fn builder(self, id: PieceId, x: i32, y: i32, money: u32) -> Self {
        self.piece(
            x,
            y,
            PieceSnapshot::new(id, PieceKind::Builder, HOME).with_money(money),
        )
    }

    /// Place an [`ENEMY`] piece.
    #[must_use]
    pub fn enemy(self, id: PieceId, kind: PieceKind, x: i32, y: i32) -> Self {
        self.piece(x, y, PieceSnapshot::new(id, kind, ENEMY))
    }

    /// Place an [`ENEMY`] aircraft that has been flying for `time_in_air` turns.
    #[must_use]
    pub fn enemy_aircraft(
        self,
        id: PieceId,
        kind: PieceKind,
        x: i32,
        y: i32,
        time_in_air: u32,
    ) -> Self {
        self.piece(
            x,
            y,
            PieceSnapshot::new(id, kind, ENEMY).airborne(time_in_air),
        )
    }

    /// Finish the snapshot.
    #[must_use]
    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

/// 5x5 board, our builder (id 1) at the centre on an empty tile and 10 money
/// on the tile to its right.
#[must_use]
pub fn builder_next_to_money() -> Snapshot {
    SnapshotBuilder::new(5, 5)
        .builder(1, 2, 2, 0)
        .money(3, 2, 10)
        .build()
}

/// 5x5 board with one of our tanks (id 1) at `(x, y)`.
#[must_use]
pub fn lone_tank(x: i32, y: i32) -> Snapshot {
    SnapshotBuilder::new(5, 5).unit(1, PieceKind::Tank, x, y).build()
}

/// Two countries facing each other across a `size` x `size` board.
///
/// We hold the left half with a builder and two tanks, the enemy holds the
/// right half with a tank, an antitank and an airborne helicopter. Every
/// tile carries some money.
#[must_use]
pub fn skirmish(size: u32) -> Snapshot {
    let side = size as i32;
    let half = side / 2;
    let mut snapshot = SnapshotBuilder::new(size, size)
        .builder(1, 0, half, 12)
        .unit(2, PieceKind::Tank, 1, 1)
        .unit(3, PieceKind::Tank, 1, side - 2)
        .enemy(10, PieceKind::Tank, side - 2, 1)
        .enemy(11, PieceKind::Antitank, side - 1, half)
        .enemy_aircraft(12, PieceKind::Helicopter, half, half, 2)
        .build();
    for tile in &mut snapshot.tiles {
        let Coordinates { x, y } = tile.coordinates;
        let owner = if x < half { HOME } else { ENEMY };
        tile.country = Some(owner.to_string());
        tile.money = ((x * 7 + y * 3) % 11) as u32;
    }
    snapshot
}
