//! Wire format of the per-turn world state.
//!
//! The host simulation delivers one [`Snapshot`] per turn:
//!
//! ```text
//! {"width":5,"height":5,"country":"red","all_countries":["red","blue"],
//!  "tiles":[{"coordinates":{"x":0,"y":0},"country":"red","money":3,
//!            "pieces":[{"id":7,"type":"builder","country":"red","money":12}]}]}
//! ```
//!
//! Snapshots are plain data. Indexing and validation happen when a
//! [`Board`](crate::board::Board) is built from one.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::Coordinates;
use crate::piece::{CountryId, PieceId, PieceKind};

/// One turn's view of the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Board width in cells.
    pub width: u32,
    /// Board height in cells.
    pub height: u32,
    /// The country this agent plays.
    pub country: CountryId,
    /// Every country in the game, including this one.
    #[serde(default, alias = "allCountries")]
    pub all_countries: Vec<CountryId>,
    /// Tiles visible this turn.
    pub tiles: Vec<TileSnapshot>,
}

/// One tile as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// Cell coordinates.
    #[serde(alias = "coordinate")]
    pub coordinates: Coordinates,
    /// Owning country, `None` when unclaimed.
    #[serde(default)]
    pub country: Option<CountryId>,
    /// Money lying on the tile.
    #[serde(default)]
    pub money: u32,
    /// Pieces standing on the tile.
    #[serde(default)]
    pub pieces: Vec<PieceSnapshot>,
}

/// One piece as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    /// Unique piece id.
    pub id: PieceId,
    /// Piece type.
    #[serde(rename = "type")]
    pub kind: PieceKind,
    /// Owning country.
    pub country: CountryId,
    /// Money carried (builders only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<u32>,
    /// Whether the piece is airborne (aircraft only).
    #[serde(default)]
    pub flying: bool,
    /// Turns spent in the air since take-off (aircraft only).
    #[serde(
        default,
        alias = "timeInAir",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_in_air: Option<u32>,
}

impl PieceSnapshot {
    /// A grounded piece without money.
    #[must_use]
    pub fn new(id: PieceId, kind: PieceKind, country: impl Into<CountryId>) -> Self {
        Self {
            id,
            kind,
            country: country.into(),
            money: None,
            flying: false,
            time_in_air: None,
        }
    }

    /// Set the carried money.
    #[must_use]
    pub fn with_money(mut self, money: u32) -> Self {
        self.money = Some(money);
        self
    }

    /// Mark the piece airborne for `time_in_air` turns.
    #[must_use]
    pub fn airborne(mut self, time_in_air: u32) -> Self {
        self.flying = true;
        self.time_in_air = Some(time_in_air);
        self
    }
}

impl Snapshot {
    /// Parse a snapshot from its JSON wire form.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or names an unknown kind.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A fully visible board of unclaimed, empty tiles in row-major order.
    ///
    /// `all_countries` starts with just `country`.
    #[must_use]
    pub fn blank(width: u32, height: u32, country: impl Into<CountryId>) -> Self {
        let country = country.into();
        let mut tiles = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tiles.push(TileSnapshot {
                    coordinates: Coordinates::new(x, y),
                    country: None,
                    money: 0,
                    pieces: Vec::new(),
                });
            }
        }
        Self {
            width,
            height,
            all_countries: vec![country.clone()],
            country,
            tiles,
        }
    }

    /// Mutable access to the tile at `coordinates`, if delivered.
    pub fn tile_mut(&mut self, coordinates: Coordinates) -> Option<&mut TileSnapshot> {
        self.tiles
            .iter_mut()
            .find(|tile| tile.coordinates == coordinates)
    }

    /// Set the owner of a tile. Missing tiles are ignored.
    pub fn claim(&mut self, coordinates: Coordinates, country: Option<&str>) -> &mut Self {
        if let Some(tile) = self.tile_mut(coordinates) {
            tile.country = country.map(str::to_string);
        }
        self
    }

    /// Set the money on a tile. Missing tiles are ignored.
    pub fn set_money(&mut self, coordinates: Coordinates, money: u32) -> &mut Self {
        if let Some(tile) = self.tile_mut(coordinates) {
            tile.money = money;
        }
        self
    }

    /// Put a piece on a tile. Missing tiles are ignored.
    ///
    /// The piece's country is added to `all_countries` if new.
    pub fn place(&mut self, coordinates: Coordinates, piece: PieceSnapshot) -> &mut Self {
        if !self.all_countries.contains(&piece.country) {
            self.all_countries.push(piece.country.clone());
        }
        if let Some(tile) = self.tile_mut(coordinates) {
            tile.pieces.push(piece);
        }
        self
    }
}
