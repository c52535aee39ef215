//! Per-unit orders handed back to the host.
//!
//! The host simulation owns the effectful primitives (`move`, `attack`,
//! `build_<type>`, `collect_money`). Planners only decide timing and targets
//! and express them through [`UnitOrders`]. The default sink, [`OrderBook`],
//! records every order as an [`Action`] descriptor in issue order.

use serde::{Deserialize, Serialize};

use crate::math::Coordinates;
use crate::piece::{PieceId, PieceKind};

/// One order for one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Move the piece to an adjacent cell.
    Move {
        /// Piece to move.
        piece: PieceId,
        /// Destination cell.
        to: Coordinates,
    },
    /// Attack whatever is on the piece's tile.
    Attack {
        /// Attacking piece.
        piece: PieceId,
    },
    /// Construct a new piece on the builder's tile.
    Build {
        /// Builder.
        piece: PieceId,
        /// Kind to construct.
        kind: PieceKind,
    },
    /// Pick up money from the builder's tile.
    CollectMoney {
        /// Builder.
        piece: PieceId,
        /// Amount to pick up.
        amount: u32,
    },
}

impl Action {
    /// The piece this order addresses.
    #[must_use]
    pub const fn piece(&self) -> PieceId {
        match self {
            Self::Move { piece, .. }
            | Self::Attack { piece }
            | Self::Build { piece, .. }
            | Self::CollectMoney { piece, .. } => *piece,
        }
    }
}

/// Capabilities a piece exposes to the planners.
pub trait UnitOrders {
    /// Move a piece one cell.
    fn move_piece(&mut self, piece: PieceId, to: Coordinates);

    /// Attack from the piece's current tile.
    fn attack(&mut self, piece: PieceId);

    /// Construct a piece of the given kind.
    fn build(&mut self, piece: PieceId, kind: PieceKind);

    /// Collect money from the piece's tile.
    fn collect_money(&mut self, piece: PieceId, amount: u32);
}

/// Ordered record of the actions issued during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBook {
    actions: Vec<Action>,
}

impl OrderBook {
    /// Create an empty order book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions issued so far, in order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions issued for one piece, in order.
    pub fn issued_for(&self, piece: PieceId) -> impl Iterator<Item = &Action> {
        self.actions
            .iter()
            .filter(move |action| action.piece() == piece)
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether nothing has been issued yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Consume the book, yielding the actions in issue order.
    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

impl UnitOrders for OrderBook {
    fn move_piece(&mut self, piece: PieceId, to: Coordinates) {
        self.actions.push(Action::Move { piece, to });
    }

    fn attack(&mut self, piece: PieceId) {
        self.actions.push(Action::Attack { piece });
    }

    fn build(&mut self, piece: PieceId, kind: PieceKind) {
        self.actions.push(Action::Build { piece, kind });
    }

    fn collect_money(&mut self, piece: PieceId, amount: u32) {
        self.actions.push(Action::CollectMoney { piece, amount });
    }
}
