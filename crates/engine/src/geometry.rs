#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

pub const VEC2_ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn scale(self, scalar: f64) -> Vec2 {
        Vec2 {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(self, other: Vec2) -> f64 {
        other.sub(self).length()
    }

    pub fn normalized(self) -> Vec2 {
        let length = self.length();
        if length == 0.0 {
            return VEC2_ZERO;
        }
        self.scale(length.recip())
    }

    /// Returns this vector rescaled to `length`. The zero vector has no
    /// direction and stays zero.
    pub fn with_length(self, length: f64) -> Vec2 {
        self.normalized().scale(length)
    }

    pub fn rotated(self, angle_degrees: f64) -> Vec2 {
        let angle_radians = angle_degrees.to_radians();
        let cos_angle = angle_radians.cos();
        let sin_angle = angle_radians.sin();
        Vec2 {
            x: cos_angle * self.x - sin_angle * self.y,
            y: sin_angle * self.x + cos_angle * self.y,
        }
    }

    /// Mirrors the point across the vertical line `x = axis_x`.
    pub fn reflected_across_x(self, axis_x: f64) -> Vec2 {
        Vec2 {
            x: 2.0 * axis_x - self.x,
            y: self.y,
        }
    }
}

/// Axis-aligned box anchored at its top-left corner. Both the point and the
/// box-overlap tests are closed-interval: touching edges count as contact.
/// Sliding exactly flush against a wall therefore still reads as blocked,
/// which prevents tunneling at exact tile boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pos: Vec2,
    width: f64,
    height: f64,
}

impl Aabb {
    pub fn new(pos: Vec2, width: f64, height: f64) -> Self {
        Self {
            pos,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.pos.x + self.width / 2.0,
            y: self.pos.y + self.height / 2.0,
        }
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn translated(&self, delta: Vec2) -> Aabb {
        Aabb {
            pos: self.pos.add(delta),
            width: self.width,
            height: self.height,
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.pos.x <= x
            && x <= self.pos.x + self.width
            && self.pos.y <= y
            && y <= self.pos.y + self.height
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        let x_overlap =
            self.pos.x <= other.pos.x + other.width && other.pos.x <= self.pos.x + self.width;
        let y_overlap =
            self.pos.y <= other.pos.y + other.height && other.pos.y <= self.pos.y + self.height;
        x_overlap && y_overlap
    }
}

/// A hitbox positioned as `anchor + offset`. Moving the anchor moves the box
/// while preserving the offset, so the box tracks its owner automatically.
/// The absolute box is recomputed on every anchor/offset write; queries never
/// see stale geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeAabb {
    anchor: Vec2,
    offset: Vec2,
    absolute: Aabb,
}

impl RelativeAabb {
    pub fn new(anchor: Vec2, offset: Vec2, width: f64, height: f64) -> Self {
        Self {
            anchor,
            offset,
            absolute: Aabb::new(anchor.add(offset), width, height),
        }
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn width(&self) -> f64 {
        self.absolute.width()
    }

    pub fn height(&self) -> f64 {
        self.absolute.height()
    }

    pub fn aabb(&self) -> Aabb {
        self.absolute
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
        self.absolute.set_pos(self.anchor.add(self.offset));
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.absolute.set_pos(self.anchor.add(self.offset));
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.absolute.contains_point(x, y)
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.absolute.overlaps(other)
    }

    /// Mirrors the offset across the vertical line at `axis_x` (relative to
    /// the anchor), then shifts it left by the box's own width. Reflecting
    /// twice across the same line restores the original offset exactly.
    pub fn reflect_across_x(&mut self, axis_x: f64) {
        let mut offset = self.offset.reflected_across_x(axis_x);
        offset.x -= self.width();
        self.set_offset(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_length_keeps_direction_and_rescales() {
        let scaled = Vec2::new(3.0, 4.0).with_length(10.0);
        assert!((scaled.x - 6.0).abs() < 1e-9);
        assert!((scaled.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn with_length_of_zero_vector_stays_zero() {
        assert_eq!(VEC2_ZERO.with_length(5.0), VEC2_ZERO);
    }

    #[test]
    fn rotated_quarter_turn_swaps_components() {
        let rotated = Vec2::new(1.0, 0.0).rotated(90.0);
        assert!(rotated.x.abs() < 1e-9);
        assert!((rotated.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_dimensions_clamp_to_zero() {
        let box_ = Aabb::new(VEC2_ZERO, -3.0, -1.0);
        assert_eq!(box_.width(), 0.0);
        assert_eq!(box_.height(), 0.0);
    }

    #[test]
    fn touching_edges_count_as_overlap() {
        let left = Aabb::new(Vec2::new(0.0, 0.0), 10.0, 10.0);
        let right = Aabb::new(Vec2::new(10.0, 0.0), 10.0, 10.0);
        assert!(left.overlaps(&right));
        assert!(right.overlaps(&left));
    }

    #[test]
    fn separated_boxes_do_not_overlap() {
        let left = Aabb::new(Vec2::new(0.0, 0.0), 10.0, 10.0);
        let right = Aabb::new(Vec2::new(10.1, 0.0), 10.0, 10.0);
        assert!(!left.overlaps(&right));
    }

    #[test]
    fn contains_point_is_closed_interval() {
        let box_ = Aabb::new(Vec2::new(2.0, 3.0), 4.0, 5.0);
        assert!(box_.contains_point(2.0, 3.0));
        assert!(box_.contains_point(6.0, 8.0));
        assert!(!box_.contains_point(6.1, 8.0));
    }

    #[test]
    fn relative_box_tracks_anchor_moves() {
        let mut box_ = RelativeAabb::new(Vec2::new(10.0, 10.0), Vec2::new(2.0, 3.0), 4.0, 4.0);
        box_.set_anchor(Vec2::new(20.0, 30.0));
        assert_eq!(box_.aabb().pos(), Vec2::new(22.0, 33.0));
        assert_eq!(box_.offset(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn relative_box_set_offset_reposes_against_fixed_anchor() {
        let mut box_ = RelativeAabb::new(Vec2::new(10.0, 10.0), Vec2::new(2.0, 3.0), 4.0, 4.0);
        box_.set_offset(Vec2::new(-1.0, 0.0));
        assert_eq!(box_.aabb().pos(), Vec2::new(9.0, 10.0));
    }

    #[test]
    fn reflect_across_x_round_trips_exactly() {
        let original = RelativeAabb::new(Vec2::new(7.0, -2.0), Vec2::new(3.5, 1.0), 6.0, 2.0);
        let axis_x = 12.0;
        let mut reflected = original;
        reflected.reflect_across_x(axis_x);
        assert_ne!(reflected.offset(), original.offset());
        reflected.reflect_across_x(axis_x);
        assert_eq!(reflected.offset(), original.offset());
        assert_eq!(reflected.aabb(), original.aabb());
    }
}
