use std::cell::OnceCell;

use tracing::warn;

use crate::geometry::{Aabb, Vec2};

use super::tile::{Tile, TileKind, TILE_LENGTH};
use super::{real_pos_of_map_coord, WorldError};

/// Number of tiles per chunk side.
pub const CHUNK_LENGTH: usize = 16;

/// Lines per chunk description: two map-coordinate header lines plus the
/// tile grid. Records have fixed size, which is what lets the map loader
/// skip a malformed chunk and realign on the next one.
pub(crate) const RECORD_LINES: usize = 2 + CHUNK_LENGTH;

/// A fixed-size square grid of tiles; the unit of streaming in and out of the
/// active set. Terrain is static, so a chunk never changes after parsing.
#[derive(Debug, Clone)]
pub struct Chunk {
    map_coord: (i64, i64),
    tiles: Vec<Tile>,
    solid_cache: OnceCell<Vec<Tile>>,
}

impl Chunk {
    /// Parses one chunk record: two header lines (map x, map y) followed by
    /// `CHUNK_LENGTH` rows of `CHUNK_LENGTH` single-character tile codes.
    /// Unrecognized codes default to non-solid unknown tiles and are
    /// reported.
    pub fn parse(record: &[(usize, &str)]) -> Result<Self, WorldError> {
        let mut lines = record.iter().copied();

        let map_x = parse_coord_line(lines.next())?;
        let map_y = parse_coord_line(lines.next())?;
        let map_coord = (map_x, map_y);
        let origin = real_pos_of_map_coord(map_coord);

        let mut tiles = Vec::with_capacity(CHUNK_LENGTH * CHUNK_LENGTH);
        for row in 0..CHUNK_LENGTH {
            let (line_no, line) = lines.next().ok_or(WorldError::TruncatedChunk { row })?;
            let codes: Vec<char> = line.trim_end().chars().collect();
            if codes.len() != CHUNK_LENGTH {
                return Err(WorldError::BadRowLength {
                    line_no,
                    expected: CHUNK_LENGTH,
                    actual: codes.len(),
                });
            }
            for (column, code) in codes.into_iter().enumerate() {
                let kind = TileKind::from_code(code);
                if kind == TileKind::Unknown {
                    warn!(line_no, column, code = %code, "unknown_tile_code");
                }
                let pos = Vec2 {
                    x: origin.x + column as f64 * TILE_LENGTH,
                    y: origin.y + row as f64 * TILE_LENGTH,
                };
                tiles.push(Tile::new(pos, kind));
            }
        }

        Ok(Self {
            map_coord,
            tiles,
            solid_cache: OnceCell::new(),
        })
    }

    pub fn map_coord(&self) -> (i64, i64) {
        self.map_coord
    }

    /// Top-left corner of this chunk in world units.
    pub fn real_pos(&self) -> Vec2 {
        real_pos_of_map_coord(self.map_coord)
    }

    pub fn aabb(&self) -> Aabb {
        let side = CHUNK_LENGTH as f64 * TILE_LENGTH;
        Aabb::new(self.real_pos(), side, side)
    }

    pub fn tile_at(&self, column: usize, row: usize) -> Option<&Tile> {
        if column >= CHUNK_LENGTH || row >= CHUNK_LENGTH {
            return None;
        }
        self.tiles.get(row * CHUNK_LENGTH + column)
    }

    /// Solid tiles of this chunk, computed on first use and memoized; the
    /// grid is immutable so the cache never invalidates.
    pub fn solid_tiles(&self) -> &[Tile] {
        self.solid_cache.get_or_init(|| {
            self.tiles
                .iter()
                .filter(|tile| tile.is_solid())
                .copied()
                .collect()
        })
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.aabb().contains_point(x, y)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.aabb().overlaps(other)
    }

    pub fn intersects_solid(&self, other: &Aabb) -> bool {
        self.solid_tiles().iter().any(|tile| tile.intersects(other))
    }
}

fn parse_coord_line(line: Option<(usize, &str)>) -> Result<i64, WorldError> {
    let (line_no, text) = line.ok_or(WorldError::MissingHeader)?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| WorldError::BadCoordinate {
            line_no,
            text: text.trim().to_string(),
        })
}
