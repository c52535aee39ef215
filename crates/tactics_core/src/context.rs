//! Read-only turn facade.
//!
//! A [`TurnContext`] pairs the turn's [`Board`] with the [`OrderBook`] of
//! actions issued so far this turn. Contexts are consumed when the turn ends;
//! nothing in them carries over to the next turn.

use crate::board::{Board, Piece, SightTable};
use crate::math::Coordinates;
use crate::orders::{Action, OrderBook};
use crate::piece::PieceId;

/// Everything known about the current turn.
#[derive(Debug, Clone)]
pub struct TurnContext {
    board: Board,
    sight: SightTable,
    orders: OrderBook,
}

impl TurnContext {
    /// Wrap a freshly built board.
    #[must_use]
    pub fn new(board: Board, sight: SightTable) -> Self {
        Self {
            board,
            sight,
            orders: OrderBook::new(),
        }
    }

    /// The turn's board indices.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The turn's order book.
    #[must_use]
    pub const fn orders(&self) -> &OrderBook {
        &self.orders
    }

    /// Tiles owned by `country`, or unclaimed tiles for `None`.
    #[must_use]
    pub fn tiles_owned_by(&self, country: Option<&str>) -> Vec<Coordinates> {
        self.board.tiles_owned_by(country)
    }

    /// Actions issued for a piece during this turn only.
    #[must_use]
    pub fn commands_issued_this_turn(&self, piece: PieceId) -> Vec<&Action> {
        self.orders.issued_for(piece).collect()
    }

    /// Pieces visible from a piece, using its kind's sight radius.
    #[must_use]
    pub fn sightings_of(&self, piece: PieceId) -> Vec<&Piece> {
        let Some(observer) = self.board.piece(piece) else {
            return Vec::new();
        };
        self.board
            .sightings_within(piece, self.sight.radius(observer.kind))
    }

    /// Board for reading and order book for writing, borrowed together.
    pub(crate) fn split(&mut self) -> (&Board, &mut OrderBook) {
        (&self.board, &mut self.orders)
    }

    /// End the turn, yielding its actions in issue order.
    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        self.orders.into_actions()
    }
}
