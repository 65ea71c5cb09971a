//! Narrow-phase collision detection.
//!
//! Pair tests between sphere and axis-aligned box colliders. Each test
//! returns the contact normal and penetration depth, or `None` when the
//! shapes are separated. Broad-phase culling is out of scope; the world
//! feeds every candidate pair straight into these tests.

use nalgebra::Vector3;

use crate::body::Collider;

// ComplexField provides sqrt() for f64 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

/// Test two colliders for overlap and produce contact data.
///
/// Returns `(normal, penetration)` or `None` when the shapes are separated.
/// For same-shape pairs the normal points from A toward B. Mixed box/sphere
/// pairs are evaluated box-first regardless of argument order and use the
/// box-first `(closest − center)` normal convention; the reversed argument
/// order negates the normal, which is algebraically identical to swapping
/// the pair's roles in the response math.
pub fn collide(
    pos_a: &Vector3<f64>,
    col_a: &Collider,
    pos_b: &Vector3<f64>,
    col_b: &Collider,
) -> Option<(Vector3<f64>, f64)> {
    match (col_a, col_b) {
        (Collider::Sphere { radius: ra }, Collider::Sphere { radius: rb }) => {
            collide_sphere_sphere(pos_a, *ra, pos_b, *rb)
        }
        (Collider::Aabb { half_extents: ha }, Collider::Aabb { half_extents: hb }) => {
            collide_aabb_aabb(pos_a, ha, pos_b, hb)
        }
        (Collider::Aabb { half_extents }, Collider::Sphere { radius }) => {
            collide_aabb_sphere(pos_a, half_extents, pos_b, *radius)
        }
        (Collider::Sphere { radius }, Collider::Aabb { half_extents }) => {
            let result = collide_aabb_sphere(pos_b, half_extents, pos_a, *radius);
            result.map(|(normal, penetration)| (-normal, penetration))
        }
    }
}

/// Sphere vs sphere.
///
/// No contact when the center distance is at least the radius sum.
/// Coincident centers fall back to a fixed (0, 1, 0) separation axis.
///
/// Returns `(normal_a_to_b, penetration)` or `None`.
fn collide_sphere_sphere(
    pos_a: &Vector3<f64>,
    radius_a: f64,
    pos_b: &Vector3<f64>,
    radius_b: f64,
) -> Option<(Vector3<f64>, f64)> {
    let diff = pos_b - pos_a;
    let dist_sq = diff.norm_squared();
    let sum_r = radius_a + radius_b;

    if dist_sq >= sum_r * sum_r {
        return None;
    }

    let dist = dist_sq.sqrt();
    let penetration = sum_r - dist;

    let normal = if dist > 0.0 {
        diff / dist
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    };

    Some((normal, penetration))
}

/// Axis-aligned box vs box.
///
/// Separation uses strict comparisons, so boxes that exactly touch on a
/// face still report a zero-penetration contact. The contact axis is the
/// one with the least overlap (the minimum-translation-vector heuristic);
/// the normal points along that axis from the lower-coordinate box toward
/// the other.
///
/// Returns `(normal_a_to_b, penetration)` or `None`.
fn collide_aabb_aabb(
    pos_a: &Vector3<f64>,
    half_a: &Vector3<f64>,
    pos_b: &Vector3<f64>,
    half_b: &Vector3<f64>,
) -> Option<(Vector3<f64>, f64)> {
    let min_a = pos_a - half_a;
    let max_a = pos_a + half_a;
    let min_b = pos_b - half_b;
    let max_b = pos_b + half_b;

    if max_a.x < min_b.x
        || min_a.x > max_b.x
        || max_a.y < min_b.y
        || min_a.y > max_b.y
        || max_a.z < min_b.z
        || min_a.z > max_b.z
    {
        return None;
    }

    let overlap_x = (max_a.x - min_b.x).min(max_b.x - min_a.x);
    let overlap_y = (max_a.y - min_b.y).min(max_b.y - min_a.y);
    let overlap_z = (max_a.z - min_b.z).min(max_b.z - min_a.z);

    if overlap_x <= overlap_y && overlap_x <= overlap_z {
        let sign = if pos_a.x < pos_b.x { 1.0 } else { -1.0 };
        Some((Vector3::new(sign, 0.0, 0.0), overlap_x))
    } else if overlap_y <= overlap_z {
        let sign = if pos_a.y < pos_b.y { 1.0 } else { -1.0 };
        Some((Vector3::new(0.0, sign, 0.0), overlap_y))
    } else {
        let sign = if pos_a.z < pos_b.z { 1.0 } else { -1.0 };
        Some((Vector3::new(0.0, 0.0, sign), overlap_z))
    }
}

/// Axis-aligned box vs sphere.
///
/// Finds the closest point on the box to the sphere center and compares it
/// against the radius. The normal convention is
/// `(closest − center) / distance`. A sphere center exactly on the closest
/// point (inside the box, or flush with a face) falls back to the nearest of
/// the six faces: the normal points outward through that face and the
/// penetration is `radius + face distance`.
///
/// Returns `(normal, penetration)` or `None`.
fn collide_aabb_sphere(
    box_pos: &Vector3<f64>,
    half: &Vector3<f64>,
    sphere_pos: &Vector3<f64>,
    radius: f64,
) -> Option<(Vector3<f64>, f64)> {
    let box_min = box_pos - half;
    let box_max = box_pos + half;

    let closest = Vector3::new(
        sphere_pos.x.clamp(box_min.x, box_max.x),
        sphere_pos.y.clamp(box_min.y, box_max.y),
        sphere_pos.z.clamp(box_min.z, box_max.z),
    );

    let diff = closest - sphere_pos;
    let dist_sq = diff.norm_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    if dist > 0.0 {
        return Some((diff / dist, radius - dist));
    }

    // Center on or inside the box — separate through the nearest face
    let faces = [
        (sphere_pos.x - box_min.x, Vector3::new(-1.0, 0.0, 0.0)),
        (box_max.x - sphere_pos.x, Vector3::new(1.0, 0.0, 0.0)),
        (sphere_pos.y - box_min.y, Vector3::new(0.0, -1.0, 0.0)),
        (box_max.y - sphere_pos.y, Vector3::new(0.0, 1.0, 0.0)),
        (sphere_pos.z - box_min.z, Vector3::new(0.0, 0.0, -1.0)),
        (box_max.z - sphere_pos.z, Vector3::new(0.0, 0.0, 1.0)),
    ];

    let mut nearest = faces[0];
    for candidate in &faces[1..] {
        if candidate.0 < nearest.0 {
            nearest = *candidate;
        }
    }

    Some((nearest.1, radius + nearest.0))
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- Sphere vs sphere --

    #[test]
    fn test_sphere_sphere_no_collision() {
        let result = collide_sphere_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            1.0,
            &Vector3::new(3.0, 0.0, 0.0),
            1.0,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_sphere_sphere_touching_is_separated() {
        let result = collide_sphere_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            1.0,
            &Vector3::new(2.0, 0.0, 0.0),
            1.0,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_sphere_sphere_overlapping() {
        let result = collide_sphere_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            1.0,
            &Vector3::new(1.5, 0.0, 0.0),
            1.0,
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 0.5));
        // Normal points from A to B along +x
        assert!(approx_eq(normal.x, 1.0));
        assert!(approx_eq(normal.y, 0.0));
        assert!(approx_eq(normal.z, 0.0));
    }

    #[test]
    fn test_sphere_sphere_off_axis_normal_is_unit() {
        let result = collide_sphere_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            1.0,
            &Vector3::new(1.0, 1.0, 0.0),
            1.0,
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(normal.norm(), 1.0));
        let dist = 2.0_f64.sqrt();
        assert!(approx_eq(penetration, 2.0 - dist));
        // Normal points from A toward B
        assert!(normal.x > 0.0 && normal.y > 0.0);
    }

    #[test]
    fn test_sphere_sphere_coincident() {
        let result = collide_sphere_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            1.0,
            &Vector3::new(0.0, 0.0, 0.0),
            1.5,
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 2.5));
        assert!(approx_eq(normal.y, 1.0));
    }

    // -- Box vs box --

    #[test]
    fn test_aabb_aabb_no_collision() {
        let result = collide_aabb_aabb(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(3.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_aabb_aabb_separated_on_single_axis() {
        // Overlapping on x and y, separated on z
        let result = collide_aabb_aabb(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.5, 0.5, 5.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_aabb_aabb_touching_reports_zero_penetration() {
        // Faces exactly flush at x = 1: still a contact, with depth 0
        let result = collide_aabb_aabb(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(2.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 0.0));
        assert!(approx_eq(normal.x, 1.0));
    }

    #[test]
    fn test_aabb_aabb_minimum_overlap_axis_x() {
        // x overlap 0.5, y and z overlap 2.0: the contact is on x
        let result = collide_aabb_aabb(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(1.5, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 0.5));
        assert!(approx_eq(normal.x, 1.0));
        assert!(approx_eq(normal.y, 0.0));
    }

    #[test]
    fn test_aabb_aabb_minimum_overlap_axis_y() {
        let result = collide_aabb_aabb(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, 1.5, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 0.5));
        assert!(approx_eq(normal.y, 1.0));
    }

    #[test]
    fn test_aabb_aabb_minimum_overlap_axis_z() {
        let result = collide_aabb_aabb(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, 0.0, -1.5),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 0.5));
        // B is on the negative-z side of A
        assert!(approx_eq(normal.z, -1.0));
    }

    #[test]
    fn test_aabb_aabb_normal_toward_higher_coordinate() {
        let result = collide_aabb_aabb(
            &Vector3::new(-1.5, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let (normal, _) = result.unwrap();
        assert!(approx_eq(normal.x, 1.0));
    }

    #[test]
    fn test_aabb_aabb_unequal_sizes() {
        // Large floor slab vs small box resting into it
        let result = collide_aabb_aabb(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(10.0, 0.5, 10.0),
            &Vector3::new(3.0, 0.9, -2.0),
            &Vector3::new(0.5, 0.5, 0.5),
        );
        let (normal, penetration) = result.unwrap();
        // Overlap on y: min(0.5 - 0.4, 1.4 + 0.5) = 0.1
        assert!(approx_eq(penetration, 0.1));
        assert!(approx_eq(normal.y, 1.0));
    }

    // -- Box vs sphere --

    #[test]
    fn test_aabb_sphere_no_collision() {
        let result = collide_aabb_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(5.0, 0.0, 0.0),
            1.0,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_aabb_sphere_touching_is_separated() {
        // Closest point (1, 0, 0), distance exactly the radius
        let result = collide_aabb_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(2.0, 0.0, 0.0),
            1.0,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_aabb_sphere_face_overlap() {
        // Sphere center at (1.5, 0, 0), closest point (1, 0, 0), distance 0.5
        let result = collide_aabb_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(1.5, 0.0, 0.0),
            1.0,
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 0.5));
        // (closest - center) / distance points from the sphere toward the box
        assert!(approx_eq(normal.x, -1.0));
    }

    #[test]
    fn test_aabb_sphere_corner_overlap() {
        // Sphere near the (1, 1, 1) corner
        let result = collide_aabb_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(1.5, 1.5, 1.5),
            1.0,
        );
        let (normal, penetration) = result.unwrap();
        let dist = (3.0_f64 * 0.25).sqrt();
        assert!(approx_eq(penetration, 1.0 - dist));
        assert!(approx_eq(normal.norm(), 1.0));
        // Diagonal from the sphere center back toward the corner
        assert!(normal.x < 0.0 && normal.y < 0.0 && normal.z < 0.0);
    }

    #[test]
    fn test_aabb_sphere_center_inside_box() {
        // Center inside, nearest face is +x (0.8 away)
        let result = collide_aabb_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.2, 0.0, 0.0),
            0.5,
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(normal.x, 1.0));
        assert!(approx_eq(penetration, 0.5 + 0.8));
    }

    #[test]
    fn test_aabb_sphere_center_on_face() {
        // Center exactly on the +y face: degenerate distance, face fallback
        let result = collide_aabb_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, 1.0, 0.0),
            0.5,
        );
        let (normal, penetration) = result.unwrap();
        assert!(approx_eq(normal.y, 1.0));
        assert!(approx_eq(penetration, 0.5));
    }

    #[test]
    fn test_aabb_sphere_center_inside_nearest_negative_face() {
        let result = collide_aabb_sphere(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(2.0, 1.0, 3.0),
            &Vector3::new(0.0, -0.7, 0.0),
            0.25,
        );
        let (normal, penetration) = result.unwrap();
        // Nearest face is -y, 0.3 away
        assert!(approx_eq(normal.y, -1.0));
        assert!(approx_eq(penetration, 0.25 + 0.3));
    }

    // -- Dispatch --

    #[test]
    fn test_collide_dispatch_sphere_sphere() {
        let a = Collider::Sphere { radius: 1.0 };
        let b = Collider::Sphere { radius: 1.0 };
        let result = collide(
            &Vector3::new(0.0, 0.0, 0.0),
            &a,
            &Vector3::new(1.5, 0.0, 0.0),
            &b,
        );
        let (_, penetration) = result.unwrap();
        assert!(approx_eq(penetration, 0.5));
    }

    #[test]
    fn test_collide_mixed_pair_order_negates_normal() {
        let box_col = Collider::Aabb {
            half_extents: Vector3::new(1.0, 1.0, 1.0),
        };
        let sphere_col = Collider::Sphere { radius: 1.0 };
        let box_pos = Vector3::new(0.0, 0.0, 0.0);
        let sphere_pos = Vector3::new(1.5, 0.0, 0.0);

        let (n_box_first, p1) = collide(&box_pos, &box_col, &sphere_pos, &sphere_col).unwrap();
        let (n_sphere_first, p2) = collide(&sphere_pos, &sphere_col, &box_pos, &box_col).unwrap();

        assert!(approx_eq(p1, p2));
        assert!(approx_eq(n_box_first.x, -n_sphere_first.x));
        assert!(approx_eq(n_box_first.x, -1.0));
    }

    #[test]
    fn test_collide_mixed_pair_miss() {
        let box_col = Collider::Aabb {
            half_extents: Vector3::new(1.0, 1.0, 1.0),
        };
        let sphere_col = Collider::Sphere { radius: 0.5 };
        assert!(collide(
            &Vector3::new(0.0, 0.0, 0.0),
            &sphere_col,
            &Vector3::new(4.0, 0.0, 0.0),
            &box_col,
        )
        .is_none());
    }
}
