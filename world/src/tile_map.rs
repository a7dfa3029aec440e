//! Textual maze layouts and their validation.

use maze_chase_core::{AdversaryKind, TileGrid, BOARD_ROWS};
use thiserror::Error;

/// Layout of the classic board, one string per row.
pub const CLASSIC_LAYOUT: [&str; BOARD_ROWS as usize] = [
    "XXXXXXXXXXXXXXXXXXX",
    "X        X        X",
    "X XX XXX X XXX XX X",
    "X                 X",
    "X XX X XXXXX X XX X",
    "X            X    X",
    "XXXX XXXX XXXX XXXX",
    "X           X     X",
    "XXXX X XXrXX X XXXX",
    "X       bpo       X",
    "XXXX X XXXXX X XXXX",
    "X    X       X    X",
    "XXXX X XXXXX X XXXX",
    "X        X        X",
    "X XX XXX X XXX XX X",
    "X  X     P     X  X",
    "XX X X XXXXX X X XX",
    "X    X   X   X    X",
    "X XXXXXX X XXXXXX X",
    "X                 X",
    "XXXXXXXXXXXXXXXXXXX",
];

/// Contents of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable wall (`X`).
    Wall,
    /// Open corridor holding an item (space).
    Open,
    /// Player start (`P`).
    PlayerStart,
    /// Start cell of one adversary (`b`, `o`, `p` or `r`).
    AdversaryStart(AdversaryKind),
}

impl Tile {
    /// Decodes a tile from its layout character.
    #[must_use]
    pub const fn from_char(value: char) -> Option<Self> {
        match value {
            'X' => Some(Self::Wall),
            ' ' => Some(Self::Open),
            'P' => Some(Self::PlayerStart),
            other => match AdversaryKind::from_marker(other) {
                Some(kind) => Some(Self::AdversaryStart(kind)),
                None => None,
            },
        }
    }
}

/// Reasons a textual layout may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TileMapError {
    /// The layout contained no rows or only empty rows.
    #[error("tile map must contain at least one non-empty row")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A character outside the layout alphabet was found.
    #[error("unknown tile {found:?} at column {column}, row {row}")]
    UnknownTile {
        /// Zero-based column index.
        column: u32,
        /// Zero-based row index.
        row: u32,
        /// Offending character.
        found: char,
    },
    /// No `P` marker was present.
    #[error("tile map has no player start")]
    MissingPlayer,
    /// No open cell was present, so the board could never be cleared.
    #[error("tile map has no open cells to hold items")]
    NoItems,
    /// A second `P` marker was found.
    #[error("second player start at column {column}, row {row}")]
    DuplicatePlayer {
        /// Zero-based column index.
        column: u32,
        /// Zero-based row index.
        row: u32,
    },
    /// An adversary marker appeared more than once.
    #[error("adversary {marker:?} appears again at column {column}, row {row}")]
    DuplicateAdversary {
        /// Repeated marker.
        marker: char,
        /// Zero-based column index.
        column: u32,
        /// Zero-based row index.
        row: u32,
    },
}

/// Rectangular grid of tiles describing walls, corridors and start cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Returns the built-in 19x21 layout.
    #[must_use]
    pub fn classic() -> Self {
        Self::from_trusted_rows(&CLASSIC_LAYOUT)
    }

    /// Parses and validates a layout supplied from outside the crate.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, TileMapError> {
        let expected = rows
            .first()
            .map_or(0, |row| row.as_ref().chars().count() as u32);
        if expected == 0 {
            return Err(TileMapError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected as usize * rows.len());
        let mut player_found = false;
        let mut items_found = false;
        let mut adversaries_found: Vec<AdversaryKind> = Vec::new();

        for (row, line) in (0u32..).zip(rows) {
            let found = line.as_ref().chars().count() as u32;
            if found != expected {
                return Err(TileMapError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }

            for (column, value) in (0u32..).zip(line.as_ref().chars()) {
                let tile = Tile::from_char(value).ok_or(TileMapError::UnknownTile {
                    column,
                    row,
                    found: value,
                })?;
                match tile {
                    Tile::PlayerStart if player_found => {
                        return Err(TileMapError::DuplicatePlayer { column, row });
                    }
                    Tile::PlayerStart => player_found = true,
                    Tile::AdversaryStart(kind) if adversaries_found.contains(&kind) => {
                        return Err(TileMapError::DuplicateAdversary {
                            marker: kind.marker(),
                            column,
                            row,
                        });
                    }
                    Tile::AdversaryStart(kind) => adversaries_found.push(kind),
                    Tile::Open => items_found = true,
                    Tile::Wall => {}
                }
                tiles.push(tile);
            }
        }

        if !player_found {
            return Err(TileMapError::MissingPlayer);
        }
        if !items_found {
            return Err(TileMapError::NoItems);
        }

        Ok(Self {
            columns: expected,
            rows: rows.len() as u32,
            tiles,
        })
    }

    /// Builds a map from rows that are known to satisfy the layout rules.
    ///
    /// Unknown characters decode as open tiles and short rows are padded.
    fn from_trusted_rows(rows: &[&str]) -> Self {
        let columns = rows.first().map_or(0, |row| row.chars().count());
        let mut tiles = Vec::with_capacity(columns * rows.len());
        for row in rows {
            let mut decoded: Vec<Tile> = row
                .chars()
                .take(columns)
                .map(|value| Tile::from_char(value).unwrap_or(Tile::Open))
                .collect();
            decoded.resize(columns, Tile::Open);
            tiles.extend(decoded);
        }

        Self {
            columns: columns as u32,
            rows: rows.len() as u32,
            tiles,
        }
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile at the provided location, if it lies inside the layout.
    #[must_use]
    pub fn tile(&self, column: u32, row: u32) -> Option<Tile> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.tiles.get(index).copied()
    }

    /// Iterates over every tile in row-major order as `(column, row, tile)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Tile)> + '_ {
        let columns = self.columns.max(1);
        (0u32..).zip(self.tiles.iter()).map(move |(index, tile)| {
            (index % columns, index / columns, *tile)
        })
    }

    /// Grid geometry of the layout for the provided tile length.
    #[must_use]
    pub const fn grid(&self, tile_length: i32) -> TileGrid {
        TileGrid::new(self.columns, self.rows, tile_length)
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::BOARD_COLUMNS;

    #[test]
    fn classic_layout_passes_validation() {
        let parsed = TileMap::parse(&CLASSIC_LAYOUT).expect("classic layout is valid");
        assert_eq!(parsed, TileMap::classic());
        assert_eq!(parsed.columns(), BOARD_COLUMNS);
        assert_eq!(parsed.rows(), BOARD_ROWS);
    }

    #[test]
    fn classic_layout_places_red_adversary_in_row_eight() {
        let map = TileMap::classic();
        assert_eq!(
            map.tile(9, 8),
            Some(Tile::AdversaryStart(AdversaryKind::Red))
        );
        assert_eq!(map.tile(9, 15), Some(Tile::PlayerStart));
        assert_eq!(map.tile(19, 0), None);
    }

    #[test]
    fn iteration_is_row_major() {
        let map = TileMap::parse(&["XP", " b"]).expect("valid layout");
        let tiles: Vec<_> = map.iter().collect();
        assert_eq!(
            tiles,
            vec![
                (0, 0, Tile::Wall),
                (1, 0, Tile::PlayerStart),
                (0, 1, Tile::Open),
                (1, 1, Tile::AdversaryStart(AdversaryKind::Blue)),
            ]
        );
    }

    #[test]
    fn rejects_empty_layout() {
        let rows: [&str; 0] = [];
        assert_eq!(TileMap::parse(&rows), Err(TileMapError::Empty));
        assert_eq!(TileMap::parse(&[""]), Err(TileMapError::Empty));
    }

    #[test]
    fn rejects_ragged_rows() {
        assert_eq!(
            TileMap::parse(&["XXX", "XP"]),
            Err(TileMapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn rejects_skip_cell_marker() {
        assert_eq!(
            TileMap::parse(&["XPO"]),
            Err(TileMapError::UnknownTile {
                column: 2,
                row: 0,
                found: 'O',
            })
        );
    }

    #[test]
    fn rejects_missing_and_duplicate_player() {
        assert_eq!(TileMap::parse(&["X X"]), Err(TileMapError::MissingPlayer));
        assert_eq!(
            TileMap::parse(&["PXP"]),
            Err(TileMapError::DuplicatePlayer { column: 2, row: 0 })
        );
    }

    #[test]
    fn rejects_itemless_layout() {
        assert_eq!(
            TileMap::parse(&["XXX", "XPX", "XXX"]),
            Err(TileMapError::NoItems)
        );
        assert_eq!(TileMap::parse(&["bPr"]), Err(TileMapError::NoItems));
        assert!(TileMap::parse(&["bP "]).is_ok());
    }

    #[test]
    fn rejects_repeated_adversary_marker() {
        assert_eq!(
            TileMap::parse(&["rP", "br"]),
            Err(TileMapError::DuplicateAdversary {
                marker: 'r',
                column: 1,
                row: 1,
            })
        );
    }
}
