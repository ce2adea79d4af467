use crate::types::*;

/// Move by one fixed step of `dt` seconds.
pub fn integrate(e: &mut Entity, dt: f64) {
    e.pos.x += e.vel.x * dt;
    e.pos.z += e.vel.z * dt;
}

/// Axis-aligned box overlap on the ground plane. Touching edges count.
pub fn overlaps(a: &Entity, b: &Entity, half_size: f64) -> bool {
    let reach = half_size * 2.0;
    (a.pos.x - b.pos.x).abs() <= reach && (a.pos.z - b.pos.z).abs() <= reach
}

/// Elastic-bounce approximation: the pair trades velocity vectors.
pub fn swap_velocities(a: &mut Entity, b: &mut Entity) {
    std::mem::swap(&mut a.vel, &mut b.vel);
}

/// Negate a velocity component that points further out past the edge.
///
/// Only outward motion is flipped, so an entity sitting on the edge reflects
/// once and then moves back in on later steps.
pub fn reflect_at_bounds(e: &mut Entity, half_extent: f64) {
    if (e.pos.x >= half_extent && e.vel.x > 0.0) || (e.pos.x <= -half_extent && e.vel.x < 0.0) {
        e.vel.x = -e.vel.x;
    }
    if (e.pos.z >= half_extent && e.vel.z > 0.0) || (e.pos.z <= -half_extent && e.vel.z < 0.0) {
        e.vel.z = -e.vel.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hostile(x: f64, z: f64, vx: f64, vz: f64) -> Entity {
        Entity {
            id: "foe0".into(),
            role: Role::Hostile,
            pos: Vec2::new(x, z),
            vel: Vec2::new(vx, vz),
        }
    }

    #[test]
    fn integrate_moves_by_velocity() {
        let mut e = hostile(1.0, -1.0, 6.0, -3.0);
        integrate(&mut e, 0.5);
        assert_eq!(e.pos, Vec2::new(4.0, -2.5));
        assert_eq!(e.vel, Vec2::new(6.0, -3.0));
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = hostile(0.0, 0.0, 0.0, 0.0);
        assert!(overlaps(&a, &hostile(2.0, 0.0, 0.0, 0.0), 1.0));
        assert!(overlaps(&a, &hostile(-1.5, 1.5, 0.0, 0.0), 1.0));
        assert!(!overlaps(&a, &hostile(2.01, 0.0, 0.0, 0.0), 1.0));
        assert!(!overlaps(&a, &hostile(0.0, -3.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn swap_exchanges_vectors() {
        let mut a = hostile(0.0, 0.0, 1.0, 2.0);
        let mut b = hostile(0.0, 0.0, -3.0, 4.0);
        swap_velocities(&mut a, &mut b);
        assert_eq!(a.vel, Vec2::new(-3.0, 4.0));
        assert_eq!(b.vel, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn reflects_outward_motion_only() {
        let mut e = hostile(49.0, -49.5, 2.0, -1.0);
        reflect_at_bounds(&mut e, 49.0);
        assert_eq!(e.vel, Vec2::new(-2.0, 1.0));

        // Already heading back in: untouched.
        let mut e = hostile(50.0, 0.0, -2.0, 0.0);
        reflect_at_bounds(&mut e, 49.0);
        assert_eq!(e.vel, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn reflection_is_idempotent_at_edge() {
        let mut e = hostile(49.0, 0.0, 3.0, 0.0);
        reflect_at_bounds(&mut e, 49.0);
        reflect_at_bounds(&mut e, 49.0);
        assert_eq!(e.vel.x, -3.0);
    }

    #[test]
    fn inside_field_untouched() {
        let mut e = hostile(10.0, -10.0, 5.0, -5.0);
        reflect_at_bounds(&mut e, 49.0);
        assert_eq!(e.vel, Vec2::new(5.0, -5.0));
    }
}
