use crate::geometry::{Aabb, Vec2};
use crate::world::WorldMap;

/// Damping factors are quantized to tenths, so each axis resolves in at most
/// `DAMPING_STEPS` retests before clamping to zero.
const DAMPING_STEPS: u32 = 10;

/// Converts a desired per-tick velocity into one that does not end inside
/// solid terrain.
///
/// The axes resolve independently, horizontal first: the coarse hitbox is
/// tentatively displaced, and while it overlaps an active solid tile the
/// component is damped by 10% of its original magnitude and retested; if the
/// minimum factor still collides the component clamps to 0 for this tick.
/// The vertical component then resolves from the already-applied horizontal
/// displacement, which is what lets a diagonal push into a wall keep its
/// free-axis component and slide. The result is approximate rather than an
/// exact time-of-impact sweep; near corners a component can shrink more than
/// strictly necessary.
pub fn resolve_velocity(map: &WorldMap, coarse_box: &Aabb, desired: Vec2) -> Vec2 {
    let resolved_x = resolve_axis(map, coarse_box, Vec2::new(desired.x, 0.0));
    let base = coarse_box.translated(Vec2::new(resolved_x, 0.0));
    let resolved_y = resolve_axis(map, &base, Vec2::new(0.0, desired.y));
    Vec2::new(resolved_x, resolved_y)
}

fn resolve_axis(map: &WorldMap, base: &Aabb, axis_velocity: Vec2) -> f64 {
    if axis_velocity.x == 0.0 && axis_velocity.y == 0.0 {
        return 0.0;
    }

    for step in (1..=DAMPING_STEPS).rev() {
        let factor = step as f64 / DAMPING_STEPS as f64;
        let damped = axis_velocity.scale(factor);
        if !map.intersects_solid(&base.translated(damped)) {
            return damped.x + damped.y;
        }
    }
    0.0
}
