mod chunk;
mod tile;

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::geometry::{Aabb, Vec2};

pub use chunk::{Chunk, CHUNK_LENGTH};
pub use tile::{Tile, TileKind, TILE_LENGTH};

/// Chunks whose Chebyshev distance from the camera's chunk is at most this
/// many chunk slots stay in the active set.
pub const RENDER_DISTANCE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("missing chunk count line")]
    MissingChunkCount,
    #[error("line {line_no}: expected a chunk count, got '{text}'")]
    BadChunkCount { line_no: usize, text: String },
    #[error("missing chunk coordinate header")]
    MissingHeader,
    #[error("line {line_no}: expected an integer map coordinate, got '{text}'")]
    BadCoordinate { line_no: usize, text: String },
    #[error("chunk grid ends early at row {row}")]
    TruncatedChunk { row: usize },
    #[error("line {line_no}: expected {expected} tile codes, got {actual}")]
    BadRowLength {
        line_no: usize,
        expected: usize,
        actual: usize,
    },
}

/// Chunk-grid coordinate of the chunk containing a world position. The
/// inverse (`real_pos_of_map_coord`) multiplies back; map coordinates are
/// only ever used for chunk lookup, never reconstructed into exact world
/// positions.
pub fn map_coord_of_real_pos(real_pos: Vec2) -> (i64, i64) {
    let chunk_side = CHUNK_LENGTH as f64 * TILE_LENGTH;
    (
        (real_pos.x / chunk_side).floor() as i64,
        (real_pos.y / chunk_side).floor() as i64,
    )
}

pub fn real_pos_of_map_coord(map_coord: (i64, i64)) -> Vec2 {
    let chunk_side = CHUNK_LENGTH as f64 * TILE_LENGTH;
    Vec2 {
        x: map_coord.0 as f64 * chunk_side,
        y: map_coord.1 as f64 * chunk_side,
    }
}

fn chebyshev_distance(a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

/// Owns every chunk, partitioned into the active set (near the camera) and
/// the inactive rest. The two sets are disjoint and together always hold the
/// full chunk list.
#[derive(Debug, Default)]
pub struct WorldMap {
    active: Vec<Chunk>,
    inactive: Vec<Chunk>,
}

impl WorldMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a map description: a chunk count line followed by that many
    /// fixed-size chunk records. A malformed chunk is reported and skipped;
    /// the fixed record size lets the loader realign on the next record, so
    /// the rest of the map still loads. All chunks start inactive until the
    /// first `update_active_set` call.
    pub fn load_from_str(source: &str) -> Self {
        let lines: Vec<(usize, &str)> = source
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .collect();

        let declared = match lines.first() {
            Some((line_no, text)) => match text.trim().parse::<usize>() {
                Ok(count) => count,
                Err(_) => {
                    let error = WorldError::BadChunkCount {
                        line_no: *line_no,
                        text: text.trim().to_string(),
                    };
                    warn!(error = %error, "map_load_failed");
                    return Self::empty();
                }
            },
            None => {
                warn!(error = %WorldError::MissingChunkCount, "map_load_failed");
                return Self::empty();
            }
        };

        let mut map = Self::empty();
        for ordinal in 0..declared {
            let start = 1 + ordinal * chunk::RECORD_LINES;
            if start >= lines.len() {
                warn!(ordinal, declared, "map_truncated");
                break;
            }
            let end = lines.len().min(start + chunk::RECORD_LINES);
            match Chunk::parse(&lines[start..end]) {
                Ok(chunk) => map.inactive.push(chunk),
                Err(error) => warn!(ordinal, error = %error, "chunk_skipped"),
            }
        }

        info!(
            declared,
            loaded = map.chunk_count(),
            "world_loaded"
        );
        map
    }

    /// Missing or unreadable files degrade to an empty map; the simulation
    /// keeps running with nothing to collide against.
    pub fn load_from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(source) => Self::load_from_str(&source),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "map_file_unreadable");
                Self::empty()
            }
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.active.len() + self.inactive.len()
    }

    pub fn active_chunks(&self) -> &[Chunk] {
        &self.active
    }

    pub fn inactive_chunks(&self) -> &[Chunk] {
        &self.inactive
    }

    /// Migrates chunks between the active and inactive sets so that a chunk
    /// is active iff its Chebyshev distance from the camera's chunk is at
    /// most `RENDER_DISTANCE`. Call when the camera crosses a chunk
    /// boundary; calling every tick is wasted work but harmless.
    pub fn update_active_set(&mut self, camera_real_pos: Vec2) {
        let camera_coord = map_coord_of_real_pos(camera_real_pos);

        let mut index = 0;
        while index < self.active.len() {
            if chebyshev_distance(self.active[index].map_coord(), camera_coord) > RENDER_DISTANCE {
                let chunk = self.active.swap_remove(index);
                self.inactive.push(chunk);
            } else {
                index += 1;
            }
        }

        let mut index = 0;
        while index < self.inactive.len() {
            if chebyshev_distance(self.inactive[index].map_coord(), camera_coord)
                <= RENDER_DISTANCE
            {
                let chunk = self.inactive.swap_remove(index);
                self.active.push(chunk);
            } else {
                index += 1;
            }
        }
    }

    /// Finds the chunk whose footprint contains the point, searching active
    /// chunks first.
    pub fn chunk_containing(&self, x: f64, y: f64) -> Option<&Chunk> {
        self.active
            .iter()
            .chain(self.inactive.iter())
            .find(|chunk| chunk.contains_point(x, y))
    }

    /// Two-level solid query: only active chunks whose footprint overlaps
    /// the box are considered, and within each only the cached solid-tile
    /// list is tested.
    pub fn intersects_solid(&self, other: &Aabb) -> bool {
        self.active
            .iter()
            .filter(|chunk| chunk.intersects(other))
            .any(|chunk| chunk.intersects_solid(other))
    }
}

/// Cheap chunk-boundary detection: reports whether `floor(pos / chunk_side)`
/// changed since the last observation, so callers refresh the active set
/// only on crossings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraTracker {
    last_coord: Option<(i64, i64)>,
}

impl CameraTracker {
    pub fn crossed_chunk_boundary(&mut self, camera_real_pos: Vec2) -> bool {
        let coord = map_coord_of_real_pos(camera_real_pos);
        let crossed = self.last_coord != Some(coord);
        self.last_coord = Some(coord);
        crossed
    }
}
