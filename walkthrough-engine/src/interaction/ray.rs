use bevy::prelude::*;

/// Oriented pick box, sized in the entity's local space.
#[derive(Component, Debug, Clone, Copy)]
pub struct PickBounds(pub Vec3);

/// Ray parameter of the hit on an oriented box centred on `xf`.
/// With a unit `dir` this is the world distance.
pub fn ray_hits_obb(origin: Vec3, dir: Vec3, xf: &GlobalTransform, size: Vec3) -> Option<f32> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = ray_direction.recip();

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        if ray_direction[axis] == 0.0 {
            // Parallel to this slab: either always inside it or never.
            if ray_origin[axis] < min[axis] || ray_origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let mut t0 = (min[axis] - ray_origin[axis]) * inv[axis];
        let mut t1 = (max[axis] - ray_origin[axis]) * inv[axis];
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}
