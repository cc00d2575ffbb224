use crate::geometry::{Aabb, RelativeAabb, Vec2};

/// Hit-geometry for one pose. The sprite itself is addressed through the
/// owning cycle's sheet plus this frame's index; only the hitboxes live here.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    hitboxes: Vec<RelativeAabb>,
}

impl AnimationFrame {
    pub fn new(hitboxes: Vec<RelativeAabb>) -> Self {
        Self { hitboxes }
    }

    /// A frame whose single hitbox spans the whole sprite.
    pub fn full_frame(anchor: Vec2, width: f64, height: f64) -> Self {
        Self {
            hitboxes: vec![RelativeAabb::new(anchor, Vec2::default(), width, height)],
        }
    }

    pub fn hitboxes(&self) -> &[RelativeAabb] {
        &self.hitboxes
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        for hitbox in &mut self.hitboxes {
            hitbox.set_anchor(anchor);
        }
    }

    pub fn reflect_across_x(&mut self, axis_x: f64) {
        for hitbox in &mut self.hitboxes {
            hitbox.reflect_across_x(axis_x);
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.hitboxes.iter().any(|hitbox| hitbox.contains_point(x, y))
    }

    pub fn overlaps_box(&self, other: &Aabb) -> bool {
        self.hitboxes.iter().any(|hitbox| hitbox.overlaps(other))
    }

    pub fn overlaps_frame(&self, other: &AnimationFrame) -> bool {
        self.hitboxes
            .iter()
            .any(|hitbox| other.overlaps_box(&hitbox.aabb()))
    }
}
