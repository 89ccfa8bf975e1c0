use bevy::prelude::*;

/// Heading used when a direction is requested between two identical points.
pub const DEFAULT_HEADING: Vec2 = Vec2::X;

/// Unit vector from `from` towards `to`; (1, 0) when the points coincide.
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    normalize_or_default(to - from)
}

/// Normalize `v`, resolving a zero-length vector to (1, 0).
pub fn normalize_or_default(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        DEFAULT_HEADING
    }
}

/// Rotate `v` counter-clockwise by `degrees`.
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unit vector for an absolute heading in degrees.
pub fn heading_deg(degrees: f32) -> Vec2 {
    rotate_deg(DEFAULT_HEADING, degrees)
}

/// Whether the closed segment `a`–`b` touches the closed rectangle.
///
/// Slab clipping: the segment is clipped against the x and y slabs in turn;
/// a non-empty parameter interval means the segment enters the rectangle.
pub fn segment_intersects_rect(a: Vec2, b: Vec2, rect: Rect) -> bool {
    let d = b - a;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for (origin, delta, lo, hi) in [
        (a.x, d.x, rect.min.x, rect.max.x),
        (a.y, d.y, rect.min.y, rect.max.y),
    ] {
        if delta == 0.0 {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let inv = 1.0 / delta;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// Closest point of `rect` to `point`.
pub fn closest_point_in_rect(point: Vec2, rect: Rect) -> Vec2 {
    point.clamp(rect.min, rect.max)
}

pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: Rect) -> bool {
    closest_point_in_rect(center, rect).distance_squared(center) <= radius * radius
}

pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Displacement that moves a circle out of `rect`, or None if they don't overlap.
pub fn push_circle_out_of_rect(center: Vec2, radius: f32, rect: Rect) -> Option<Vec2> {
    let closest = closest_point_in_rect(center, rect);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    if dist_sq > 0.0 {
        let dist = dist_sq.sqrt();
        return Some(delta / dist * (radius - dist));
    }

    // Center is inside the rectangle: leave through the nearest edge.
    let exits = [
        (center.x - rect.min.x + radius, Vec2::NEG_X),
        (rect.max.x - center.x + radius, Vec2::X),
        (center.y - rect.min.y + radius, Vec2::NEG_Y),
        (rect.max.y - center.y + radius, Vec2::Y),
    ];
    let mut best = exits[0];
    for exit in &exits[1..] {
        if exit.0 < best.0 {
            best = *exit;
        }
    }
    Some(best.1 * best.0)
}
