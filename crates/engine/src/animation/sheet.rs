use std::path::Path;

use tracing::warn;

use crate::sprite_keys::SpriteKey;

/// Dimensions and identity of a sprite sheet. Frames are stacked vertically,
/// so the sheet height divided by the frame count gives the frame height,
/// the one piece of image data that shapes hit-geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    key: SpriteKey,
    width: u32,
    height: u32,
}

impl SpriteSheet {
    pub fn with_dimensions(key: SpriteKey, width: u32, height: u32) -> Self {
        Self { key, width, height }
    }

    /// Probes the sheet file for its dimensions. A missing or undecodable
    /// sheet degrades to the supplied fallback dimensions so the owning
    /// cycle still gets usable coarse geometry.
    pub fn load(key: SpriteKey, path: &Path, fallback: (u32, u32)) -> Self {
        match image::image_dimensions(path) {
            Ok((width, height)) => Self { key, width, height },
            Err(error) => {
                warn!(
                    key = key.as_str(),
                    path = %path.display(),
                    error = %error,
                    "sprite_sheet_unreadable"
                );
                Self {
                    key,
                    width: fallback.0,
                    height: fallback.1,
                }
            }
        }
    }

    pub fn key(&self) -> &SpriteKey {
        &self.key
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions for a vertically stacked sheet of `frame_count`
    /// frames. A zero count is treated as one frame.
    pub fn frame_dimensions(&self, frame_count: usize) -> (f64, f64) {
        let frame_count = frame_count.max(1) as u32;
        (self.width as f64, (self.height / frame_count) as f64)
    }
}
