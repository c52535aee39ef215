//! Per-turn tile and piece indices.
//!
//! A [`Board`] is built from one [`Snapshot`] in a single pass and is never
//! mutated afterwards. All indices are ordered maps, so every query iterates
//! in a stable order (coordinates for tiles, ids for pieces).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TacticsError};
use crate::math::Coordinates;
use crate::piece::{CountryId, PieceId, PieceKind};
use crate::snapshot::{PieceSnapshot, Snapshot};

/// Orthogonal neighbour offsets, in scan order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// An indexed tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Cell coordinates.
    pub coordinates: Coordinates,
    /// Owning country, `None` when unclaimed.
    pub country: Option<CountryId>,
    /// Money lying on the tile.
    pub money: u32,
    /// Ids of the pieces on this tile, in snapshot order.
    pub pieces: Vec<PieceId>,
}

/// An indexed piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Unique piece id.
    pub id: PieceId,
    /// Piece type.
    pub kind: PieceKind,
    /// Owning country.
    pub country: CountryId,
    /// The tile this piece stands on.
    pub coordinates: Coordinates,
    /// Money carried (builders only).
    pub money: Option<u32>,
    /// Whether the piece is airborne.
    pub flying: bool,
    /// Turns spent in the air since take-off.
    pub time_in_air: Option<u32>,
}

impl Piece {
    fn from_snapshot(piece: PieceSnapshot, coordinates: Coordinates) -> Self {
        Self {
            id: piece.id,
            kind: piece.kind,
            country: piece.country,
            coordinates,
            money: piece.money,
            flying: piece.flying,
            time_in_air: piece.time_in_air,
        }
    }

    /// Money carried, zero when the piece has no purse.
    #[must_use]
    pub fn funds(&self) -> u32 {
        self.money.unwrap_or(0)
    }
}

/// Sight radius per piece kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightTable {
    /// Radius for kinds not listed in `radii`.
    pub default: u32,
    /// Per-kind overrides.
    pub radii: BTreeMap<PieceKind, u32>,
}

impl Default for SightTable {
    fn default() -> Self {
        Self {
            default: 1,
            radii: [(PieceKind::Tower, 3), (PieceKind::Satellite, 5)]
                .into_iter()
                .collect(),
        }
    }
}

impl SightTable {
    /// Sight radius for a kind.
    #[must_use]
    pub fn radius(&self, kind: PieceKind) -> u32 {
        self.radii.get(&kind).copied().unwrap_or(self.default)
    }
}

/// Immutable index over one turn's snapshot.
#[derive(Debug, Clone)]
pub struct Board {
    width: u32,
    height: u32,
    my_country: CountryId,
    all_countries: Vec<CountryId>,
    tiles: BTreeMap<Coordinates, Tile>,
    pieces: BTreeMap<PieceId, Piece>,
    my_pieces: BTreeSet<PieceId>,
}

impl Board {
    /// Index a snapshot.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Either dimension is zero
    /// - A tile lies outside the board or is listed twice
    /// - A piece id appears more than once
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let Snapshot {
            width,
            height,
            country,
            all_countries,
            tiles: raw_tiles,
        } = snapshot;

        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(TacticsError::InvalidDimensions { width, height });
        }

        let mut board = Self {
            width,
            height,
            my_country: country,
            all_countries,
            tiles: BTreeMap::new(),
            pieces: BTreeMap::new(),
            my_pieces: BTreeSet::new(),
        };

        for raw in raw_tiles {
            let coordinates = raw.coordinates;
            board.check_bounds(coordinates)?;
            if board.tiles.contains_key(&coordinates) {
                return Err(TacticsError::DuplicateTile {
                    x: coordinates.x,
                    y: coordinates.y,
                });
            }

            let mut piece_ids = Vec::with_capacity(raw.pieces.len());
            for raw_piece in raw.pieces {
                let id = raw_piece.id;
                if board.pieces.contains_key(&id) {
                    return Err(TacticsError::DuplicatePiece(id));
                }
                if raw_piece.country == board.my_country {
                    board.my_pieces.insert(id);
                }
                board
                    .pieces
                    .insert(id, Piece::from_snapshot(raw_piece, coordinates));
                piece_ids.push(id);
            }

            board.tiles.insert(
                coordinates,
                Tile {
                    coordinates,
                    country: raw.country,
                    money: raw.money,
                    pieces: piece_ids,
                },
            );
        }

        if !board.all_countries.contains(&board.my_country) {
            board.all_countries.push(board.my_country.clone());
        }

        Ok(board)
    }

    /// Board width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The country this agent plays.
    #[must_use]
    pub fn my_country(&self) -> &str {
        &self.my_country
    }

    /// Every country in the game.
    #[must_use]
    pub fn all_countries(&self) -> &[CountryId] {
        &self.all_countries
    }

    /// Whether the coordinates lie on the board.
    #[must_use]
    pub fn in_bounds(&self, coordinates: Coordinates) -> bool {
        coordinates.x >= 0
            && coordinates.y >= 0
            && (coordinates.x as u32) < self.width
            && (coordinates.y as u32) < self.height
    }

    /// Error unless the coordinates lie on the board.
    pub fn check_bounds(&self, coordinates: Coordinates) -> Result<()> {
        if self.in_bounds(coordinates) {
            Ok(())
        } else {
            Err(TacticsError::OutOfBounds {
                x: coordinates.x,
                y: coordinates.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// The central cell (rounded down).
    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Tile at the given coordinates, if delivered this turn.
    #[must_use]
    pub fn tile(&self, coordinates: Coordinates) -> Option<&Tile> {
        self.tiles.get(&coordinates)
    }

    /// All delivered tiles, in coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Money lying on a tile, zero for tiles not delivered.
    #[must_use]
    pub fn money_at(&self, coordinates: Coordinates) -> u32 {
        self.tile(coordinates).map_or(0, |tile| tile.money)
    }

    /// Any piece by id.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// A piece by id, only if it belongs to this country.
    #[must_use]
    pub fn my_piece(&self, id: PieceId) -> Option<&Piece> {
        if self.my_pieces.contains(&id) {
            self.pieces.get(&id)
        } else {
            None
        }
    }

    /// All pieces, in id order.
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// This country's pieces, in id order.
    pub fn my_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.my_pieces.iter().filter_map(|id| self.pieces.get(id))
    }

    /// This country's pieces of one kind, in id order.
    pub fn my_pieces_of_kind(&self, kind: PieceKind) -> impl Iterator<Item = &Piece> {
        self.my_pieces().filter(move |piece| piece.kind == kind)
    }

    /// Pieces standing on a tile.
    pub fn pieces_on(&self, coordinates: Coordinates) -> impl Iterator<Item = &Piece> {
        self.tile(coordinates)
            .into_iter()
            .flat_map(|tile| tile.pieces.iter())
            .filter_map(|id| self.pieces.get(id))
    }

    /// Whether a piece belongs to this country.
    #[must_use]
    pub fn is_mine(&self, piece: &Piece) -> bool {
        piece.country == self.my_country
    }

    /// Look up one of this country's pieces and check its kind.
    ///
    /// # Errors
    /// Returns an error if the piece is missing, foreign, or of a kind not
    /// listed in `kinds`.
    pub fn own_piece_of_kind(&self, id: PieceId, kinds: &[PieceKind]) -> Result<&Piece> {
        let piece = self.piece(id).ok_or(TacticsError::PieceNotFound(id))?;
        if !self.is_mine(piece) {
            return Err(TacticsError::NotOwned {
                piece: id,
                owner: piece.country.clone(),
            });
        }
        if !kinds.contains(&piece.kind) {
            return Err(TacticsError::WrongKind {
                piece: id,
                actual: piece.kind,
                expected: kinds
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(piece)
    }

    /// In-board orthogonal neighbours in [`NEIGHBOR_OFFSETS`] order.
    #[must_use]
    pub fn orthogonal_neighbors(&self, coordinates: Coordinates) -> Vec<Coordinates> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| coordinates.offset(dx, dy))
            .filter(|&c| self.in_bounds(c))
            .collect()
    }

    /// Coordinates of the tiles owned by `country`, or of the unclaimed tiles
    /// for `None`, in coordinate order.
    #[must_use]
    pub fn tiles_owned_by(&self, country: Option<&str>) -> Vec<Coordinates> {
        self.tiles
            .values()
            .filter(|tile| tile.country.as_deref() == country)
            .map(|tile| tile.coordinates)
            .collect()
    }

    /// Cells within Euclidean `radius` of `center`, clipped to the board.
    ///
    /// Scans the part of the `[-radius, +radius]` box that lies on the board,
    /// x-major. The centre itself may be off the board.
    pub fn cells_within(
        &self,
        center: Coordinates,
        radius: u32,
    ) -> impl Iterator<Item = Coordinates> + '_ {
        let r = i64::from(radius);
        let limit = u64::from(radius) * u64::from(radius);
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let x_range = (cx - r).max(0)..=(cx + r).min(i64::from(self.width) - 1);
        let y_range = (cy - r).max(0)..=(cy + r).min(i64::from(self.height) - 1);
        x_range
            .flat_map(move |x| {
                y_range
                    .clone()
                    .map(move |y| Coordinates::new(x as i32, y as i32))
            })
            .filter(move |&c| center.distance_squared(c) <= limit)
    }

    /// Other pieces within `radius` of the piece, in scan order.
    ///
    /// Returns an empty list for unknown pieces.
    #[must_use]
    pub fn sightings_within(&self, id: PieceId, radius: u32) -> Vec<&Piece> {
        let Some(observer) = self.piece(id) else {
            return Vec::new();
        };
        self.cells_within(observer.coordinates, radius)
            .flat_map(|c| self.pieces_on(c))
            .filter(|piece| piece.id != id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PieceSnapshot;

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::blank(5, 5, "red");
        snapshot.all_countries.push("blue".to_string());
        snapshot
            .claim(Coordinates::new(0, 0), Some("red"))
            .claim(Coordinates::new(4, 4), Some("blue"))
            .set_money(Coordinates::new(2, 2), 7)
            .place(
                Coordinates::new(2, 2),
                PieceSnapshot::new(1, PieceKind::Builder, "red").with_money(3),
            )
            .place(
                Coordinates::new(3, 2),
                PieceSnapshot::new(2, PieceKind::Tank, "blue"),
            )
            .place(
                Coordinates::new(4, 4),
                PieceSnapshot::new(3, PieceKind::Tower, "red"),
            );
        snapshot
    }

    #[test]
    fn test_indices() {
        let board = Board::from_snapshot(sample()).unwrap();
        assert_eq!(board.width(), 5);
        assert_eq!(board.my_country(), "red");
        assert_eq!(board.all_countries(), ["red", "blue"]);
        assert_eq!(board.piece(2).unwrap().coordinates, Coordinates::new(3, 2));
        assert!(board.my_piece(2).is_none());
        assert_eq!(board.my_pieces().map(|p| p.id).collect::<Vec<_>>(), [1, 3]);
        assert_eq!(board.money_at(Coordinates::new(2, 2)), 7);
        assert_eq!(board.pieces_on(Coordinates::new(2, 2)).count(), 1);
    }

    #[test]
    fn test_rejects_duplicate_piece() {
        let mut snapshot = sample();
        snapshot.place(
            Coordinates::new(0, 1),
            PieceSnapshot::new(1, PieceKind::Tank, "red"),
        );
        assert!(matches!(
            Board::from_snapshot(snapshot),
            Err(TacticsError::DuplicatePiece(1))
        ));
    }

    #[test]
    fn test_rejects_out_of_bounds_tile() {
        let mut snapshot = sample();
        snapshot.tiles[0].coordinates = Coordinates::new(5, 0);
        assert!(matches!(
            Board::from_snapshot(snapshot),
            Err(TacticsError::OutOfBounds { x: 5, y: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_tile() {
        let mut snapshot = sample();
        snapshot.tiles[1].coordinates = Coordinates::new(0, 0);
        assert!(matches!(
            Board::from_snapshot(snapshot),
            Err(TacticsError::DuplicateTile { x: 0, y: 0 })
        ));
    }

    #[test]
    fn test_rejects_empty_board() {
        let snapshot = Snapshot::blank(0, 3, "red");
        assert!(matches!(
            Board::from_snapshot(snapshot),
            Err(TacticsError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_tiles_owned_by() {
        let board = Board::from_snapshot(sample()).unwrap();
        assert_eq!(board.tiles_owned_by(Some("red")), [Coordinates::new(0, 0)]);
        assert_eq!(board.tiles_owned_by(Some("blue")), [Coordinates::new(4, 4)]);
        assert_eq!(board.tiles_owned_by(None).len(), 23);
    }

    #[test]
    fn test_orthogonal_neighbors_excludes_outside() {
        let board = Board::from_snapshot(sample()).unwrap();
        assert_eq!(
            board.orthogonal_neighbors(Coordinates::new(0, 0)),
            [Coordinates::new(0, 1), Coordinates::new(1, 0)]
        );
        assert_eq!(board.orthogonal_neighbors(Coordinates::new(2, 2)).len(), 4);
    }

    #[test]
    fn test_cells_within_is_symmetric() {
        let board = Board::from_snapshot(sample()).unwrap();
        let cells: Vec<_> = board.cells_within(Coordinates::new(2, 2), 1).collect();
        assert_eq!(
            cells,
            [
                Coordinates::new(1, 2),
                Coordinates::new(2, 1),
                Coordinates::new(2, 2),
                Coordinates::new(2, 3),
                Coordinates::new(3, 2),
            ]
        );
        // Radius 2 includes the diagonals (distance √2) but not (0, 0)-style corners.
        let cells: Vec<_> = board.cells_within(Coordinates::new(2, 2), 2).collect();
        assert_eq!(cells.len(), 13);
        assert!(!cells.contains(&Coordinates::new(0, 0)));
        assert!(cells.contains(&Coordinates::new(1, 1)));
        assert!(cells.contains(&Coordinates::new(2, 0)));
    }

    #[test]
    fn test_sightings_within() {
        let board = Board::from_snapshot(sample()).unwrap();
        let seen: Vec<_> = board.sightings_within(1, 1).iter().map(|p| p.id).collect();
        assert_eq!(seen, [2]);
        assert!(board.sightings_within(3, 1).is_empty());
        assert!(board.sightings_within(99, 5).is_empty());
    }

    #[test]
    fn test_own_piece_of_kind() {
        let board = Board::from_snapshot(sample()).unwrap();
        assert!(board.own_piece_of_kind(1, &[PieceKind::Builder]).is_ok());
        assert!(matches!(
            board.own_piece_of_kind(1, &[PieceKind::Tank]),
            Err(TacticsError::WrongKind { piece: 1, .. })
        ));
        assert!(matches!(
            board.own_piece_of_kind(2, &[PieceKind::Tank]),
            Err(TacticsError::NotOwned { piece: 2, .. })
        ));
        assert!(matches!(
            board.own_piece_of_kind(42, &[PieceKind::Tank]),
            Err(TacticsError::PieceNotFound(42))
        ));
    }

    #[test]
    fn test_sight_table() {
        let sight = SightTable::default();
        assert_eq!(sight.radius(PieceKind::Tank), 1);
        assert_eq!(sight.radius(PieceKind::Tower), 3);
        assert_eq!(sight.radius(PieceKind::Satellite), 5);
    }
}
