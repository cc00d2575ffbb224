mod format;
mod frame;
mod sheet;

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::geometry::{Aabb, RelativeAabb, Vec2};
use crate::sprite_keys::SpriteKey;

pub use format::{parse_cycle_spec, CycleSpec, HitboxSpec};
pub use frame::AnimationFrame;
pub use sheet::SpriteSheet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error("missing '{label}' line")]
    MissingLine { label: &'static str },
    #[error("line {line_no}: expected {expected} tokens, got {actual}")]
    BadTokenCount {
        line_no: usize,
        expected: usize,
        actual: usize,
    },
    #[error("line {line_no}: expected a number, got '{text}'")]
    BadNumber { line_no: usize, text: String },
    #[error("missing label for frame {frame_index}")]
    MissingFrameLabel { frame_index: usize },
    #[error("line {line_no}: expected a FRAMEk label, got '{text}'")]
    BadFrameLabel { line_no: usize, text: String },
    #[error("line {line_no}: expected frame {expected}, got frame {actual}")]
    FrameLabelOutOfOrder {
        line_no: usize,
        expected: usize,
        actual: usize,
    },
    #[error("frame {frame_index} ends before its declared hitbox count")]
    TruncatedFrame { frame_index: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopStyle {
    /// Play once and hold the last frame.
    #[default]
    None,
    /// Snap back to frame 0 after the last frame.
    ToStart,
    /// Reverse direction at each end.
    PingPong,
}

/// An ordered sequence of frames plus a looping policy. The frame index is
/// the cycle's only mutable state; every assignment goes through a modulo so
/// it can never leave `0..frame_count`. The general hitbox is a single
/// coarse box sized to the frame, for callers that want an approximate
/// answer before committing to the active frame's exact box list.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationCycle {
    sheet: SpriteSheet,
    frames: Vec<AnimationFrame>,
    index: usize,
    direction: i64,
    loop_style: LoopStyle,
    general: RelativeAabb,
    frame_width: f64,
    frame_height: f64,
}

impl AnimationCycle {
    /// Builds a cycle from a parsed description. Frames the description left
    /// unpopulated fall back to full-frame hit-geometry.
    pub fn from_spec(anchor: Vec2, sheet: SpriteSheet, spec: &CycleSpec) -> Self {
        let frame_count = spec.frames.len().max(1);
        let (frame_width, frame_height) = sheet.frame_dimensions(frame_count);

        let mut frames = Vec::with_capacity(frame_count);
        for slot in &spec.frames {
            match slot {
                Some(hitboxes) => {
                    let boxes = hitboxes
                        .iter()
                        .map(|hitbox| {
                            RelativeAabb::new(anchor, hitbox.offset, hitbox.width, hitbox.height)
                        })
                        .collect();
                    frames.push(AnimationFrame::new(boxes));
                }
                None => frames.push(AnimationFrame::full_frame(anchor, frame_width, frame_height)),
            }
        }
        if frames.is_empty() {
            frames.push(AnimationFrame::full_frame(anchor, frame_width, frame_height));
        }

        Self {
            sheet,
            frames,
            index: 0,
            direction: 1,
            loop_style: spec.loop_style,
            general: RelativeAabb::new(
                anchor,
                spec.general_offset,
                spec.general_width,
                spec.general_height,
            ),
            frame_width,
            frame_height,
        }
    }

    /// Builds a cycle straight from a sheet: `frame_count` frames, each with
    /// a single full-frame hitbox, and a general box spanning the frame.
    pub fn from_sheet(
        anchor: Vec2,
        sheet: SpriteSheet,
        frame_count: usize,
        loop_style: LoopStyle,
    ) -> Self {
        let frame_count = frame_count.max(1);
        let (frame_width, frame_height) = sheet.frame_dimensions(frame_count);
        let frames = (0..frame_count)
            .map(|_| AnimationFrame::full_frame(anchor, frame_width, frame_height))
            .collect();
        Self {
            sheet,
            frames,
            index: 0,
            direction: 1,
            loop_style,
            general: RelativeAabb::new(anchor, Vec2::default(), frame_width, frame_height),
            frame_width,
            frame_height,
        }
    }

    /// Loads a cycle description from disk. A missing or malformed file is
    /// reported and degrades to a single-frame cycle with full-frame
    /// geometry; a bad animation never takes the simulation down.
    pub fn load(anchor: Vec2, sheet: SpriteSheet, path: &Path) -> Self {
        let spec = fs::read_to_string(path)
            .map_err(|error| {
                warn!(path = %path.display(), error = %error, "animation_file_unreadable");
            })
            .ok()
            .and_then(|source| {
                parse_cycle_spec(&source)
                    .map_err(|error| {
                        warn!(path = %path.display(), error = %error, "animation_file_malformed");
                    })
                    .ok()
            });

        match spec {
            Some(spec) => Self::from_spec(anchor, sheet, &spec),
            None => Self::from_sheet(anchor, sheet, 1, LoopStyle::None),
        }
    }

    pub fn sprite_key(&self) -> &SpriteKey {
        self.sheet.key()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_width(&self) -> f64 {
        self.frame_width
    }

    pub fn frame_height(&self) -> f64 {
        self.frame_height
    }

    pub fn loop_style(&self) -> LoopStyle {
        self.loop_style
    }

    pub fn active_index(&self) -> usize {
        self.index
    }

    pub fn active_frame(&self) -> &AnimationFrame {
        &self.frames[self.index]
    }

    pub fn anchor(&self) -> Vec2 {
        self.general.anchor()
    }

    /// Coarse pre-filter box; exact tests go through the active frame.
    pub fn general_aabb(&self) -> Aabb {
        self.general.aabb()
    }

    /// True once a non-looping cycle has reached its last frame; looping
    /// cycles are never done.
    pub fn is_done(&self) -> bool {
        self.loop_style == LoopStyle::None && self.index == self.frames.len() - 1
    }

    /// Advances one frame along the current direction, honoring the looping
    /// policy. A finished non-looping cycle holds its last frame.
    pub fn advance(&mut self) {
        if self.is_done() {
            return;
        }

        let count = self.frames.len() as i64;
        self.index = (self.index as i64 + self.direction).rem_euclid(count) as usize;

        if self.loop_style == LoopStyle::PingPong {
            if self.index == 0 {
                self.direction = 1;
            } else if self.index == self.frames.len() - 1 {
                self.direction = -1;
            }
        }
    }

    /// Restarts from frame 0, always playing forwards again even when a
    /// ping-pong cycle was mid-reverse.
    pub fn reset(&mut self) {
        self.index = 0;
        self.direction = 1;
    }

    /// The index is taken modulo the frame count, so callers never need to
    /// range-check.
    pub fn set_active_frame(&mut self, index: usize) {
        self.index = index % self.frames.len();
    }

    /// Moves the cycle's anchor, carrying every frame's hit-geometry and the
    /// general box with it so the visible pose and its hitboxes never drift
    /// apart.
    pub fn set_anchor(&mut self, anchor: Vec2) {
        for frame in &mut self.frames {
            frame.set_anchor(anchor);
        }
        self.general.set_anchor(anchor);
    }

    /// Mirrors every frame's hit-geometry across the vertical midline of the
    /// general hitbox. Two reflections restore the original geometry, which
    /// is how right-facing poses are derived from left-authored assets.
    pub fn reflect_horizontally(&mut self) {
        let axis_x = self.general.offset().x + self.general.width() / 2.0;
        for frame in &mut self.frames {
            frame.reflect_across_x(axis_x);
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.active_frame().contains_point(x, y)
    }

    pub fn overlaps_box(&self, other: &Aabb) -> bool {
        self.active_frame().overlaps_box(other)
    }

    pub fn overlaps_cycle(&self, other: &AnimationCycle) -> bool {
        self.active_frame().overlaps_frame(other.active_frame())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn test_sheet(frame_count: u32) -> SpriteSheet {
        SpriteSheet::with_dimensions(
            SpriteKey::new("anim/test").expect("key"),
            64,
            64 * frame_count,
        )
    }

    fn cycle_with(frame_count: usize, loop_style: LoopStyle) -> AnimationCycle {
        AnimationCycle::from_sheet(
            Vec2::default(),
            test_sheet(frame_count as u32),
            frame_count,
            loop_style,
        )
    }

    #[test]
    fn non_looping_cycle_converges_and_latches_done() {
        let mut cycle = cycle_with(4, LoopStyle::None);
        for _ in 0..10 {
            cycle.advance();
        }
        assert_eq!(cycle.active_index(), 3);
        assert!(cycle.is_done());
        cycle.advance();
        assert_eq!(cycle.active_index(), 3);
        assert!(cycle.is_done());
    }

    #[test]
    fn loop_to_start_wraps_by_modulo() {
        let mut cycle = cycle_with(3, LoopStyle::ToStart);
        for _ in 0..5 {
            cycle.advance();
        }
        assert_eq!(cycle.active_index(), 2);
        assert!(!cycle.is_done());
    }

    #[test]
    fn ping_pong_sequence_has_full_period_and_stays_in_bounds() {
        let frame_count = 4;
        let mut cycle = cycle_with(frame_count, LoopStyle::PingPong);
        let period = 2 * (frame_count - 1);

        let mut seen = Vec::new();
        for _ in 0..period * 2 {
            cycle.advance();
            assert!(cycle.active_index() < frame_count);
            seen.push(cycle.active_index());
        }
        assert_eq!(seen[..period], seen[period..]);
        assert_eq!(seen[..period], [1, 2, 3, 2, 1, 0]);
    }

    #[test]
    fn reset_restores_forward_play_mid_ping_pong() {
        let mut cycle = cycle_with(3, LoopStyle::PingPong);
        for _ in 0..3 {
            cycle.advance();
        }
        cycle.reset();
        assert_eq!(cycle.active_index(), 0);
        cycle.advance();
        assert_eq!(cycle.active_index(), 1);
    }

    #[test]
    fn set_active_frame_wraps_out_of_range_indices() {
        let mut cycle = cycle_with(4, LoopStyle::ToStart);
        cycle.set_active_frame(11);
        assert_eq!(cycle.active_index(), 3);
    }

    #[test]
    fn anchor_propagates_to_general_and_frame_geometry() {
        let mut cycle = cycle_with(2, LoopStyle::ToStart);
        cycle.set_anchor(Vec2::new(300.0, -40.0));
        assert_eq!(cycle.general_aabb().pos(), Vec2::new(300.0, -40.0));
        assert_eq!(
            cycle.active_frame().hitboxes()[0].aabb().pos(),
            Vec2::new(300.0, -40.0)
        );
    }

    #[test]
    fn reflecting_twice_restores_geometry() {
        let spec = parse_cycle_spec(
            "loopType: NO_LOOPING\n\
             generalHitbox: 4 0 40 60\n\
             numFrames: 1\n\
             FRAME0\n\
             numHitboxes: 1\n\
             blade: 30 10 8 12\n",
        )
        .expect("spec parses");
        let mut cycle = AnimationCycle::from_spec(Vec2::new(10.0, 10.0), test_sheet(1), &spec);

        let original = cycle.active_frame().hitboxes()[0];
        cycle.reflect_horizontally();
        assert_ne!(cycle.active_frame().hitboxes()[0], original);
        cycle.reflect_horizontally();
        assert_eq!(cycle.active_frame().hitboxes()[0], original);
    }

    #[test]
    fn degraded_load_still_yields_usable_cycle() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"loopType:\n").expect("write");
        let cycle = AnimationCycle::load(Vec2::default(), test_sheet(1), file.path());
        assert_eq!(cycle.frame_count(), 1);
        assert!(cycle.is_done());
    }

    #[test]
    fn load_reads_spec_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            b"loopType: LOOP_BACKWARDS\n\
              generalHitbox: 0 0 64 64\n\
              numFrames: 2\n\
              FRAME0\n\
              numHitboxes: 1\n\
              body: 1 1 10 10\n\
              FRAME1\n\
              numHitboxes: 1\n\
              body: 2 2 10 10\n",
        )
        .expect("write");
        let cycle = AnimationCycle::load(Vec2::default(), test_sheet(2), file.path());
        assert_eq!(cycle.frame_count(), 2);
        assert_eq!(cycle.loop_style(), LoopStyle::PingPong);
    }
}
