use std::cmp::Ordering;

use bevy::prelude::*;
use constants::interaction::MAX_TAG_DEPTH;

use super::ExhibitTag;
use super::ray::{PickBounds, ray_hits_obb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
}

/// Window pixels (origin top-left) to normalized device coordinates.
pub fn pointer_to_ndc(cursor: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        1.0 - cursor.y / viewport.y * 2.0,
    ))
}

pub fn ndc_to_viewport(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * 0.5 * viewport.x, (1.0 - ndc.y) * 0.5 * viewport.y)
}

/// Closest pick box along `ray`. Equal distances resolve to the lowest
/// entity bits so the same scene always gives the same answer.
pub fn nearest_hit<'a>(
    ray: Ray3d,
    candidates: impl IntoIterator<Item = (Entity, &'a GlobalTransform, &'a PickBounds)>,
) -> Option<RayHit> {
    let origin = ray.origin;
    let dir = ray.direction.as_vec3();

    candidates
        .into_iter()
        .filter_map(|(entity, xf, PickBounds(size))| {
            ray_hits_obb(origin, dir, xf, *size).map(|distance| RayHit { entity, distance })
        })
        .min_by(|a, b| match a.distance.total_cmp(&b.distance) {
            Ordering::Equal => a.entity.to_bits().cmp(&b.entity.to_bits()),
            other => other,
        })
}

/// Cast through `ndc` and return the nearest hit.
pub fn resolve<'a>(
    ndc: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    candidates: impl IntoIterator<Item = (Entity, &'a GlobalTransform, &'a PickBounds)>,
) -> Option<RayHit> {
    let viewport = camera.logical_viewport_size()?;
    let ray = camera
        .viewport_to_world(camera_transform, ndc_to_viewport(ndc, viewport))
        .ok()?;
    nearest_hit(ray, candidates)
}

/// Walk up the parent chain from `entity` to the first tagged ancestor
/// (the entity itself included).
pub fn tag_of(
    entity: Entity,
    tag_lookup: impl Fn(Entity) -> Option<ExhibitTag>,
    parent_lookup: impl Fn(Entity) -> Option<Entity>,
) -> Option<(Entity, ExhibitTag)> {
    let mut current = entity;
    for _ in 0..MAX_TAG_DEPTH {
        if let Some(tag) = tag_lookup(current) {
            return Some((current, tag));
        }
        current = parent_lookup(current)?;
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn boxed(x: f32) -> (GlobalTransform, PickBounds) {
        (
            GlobalTransform::from_translation(Vec3::new(x, 0.0, 0.0)),
            PickBounds(Vec3::splat(2.0)),
        )
    }

    fn ray() -> Ray3d {
        Ray3d::new(Vec3::ZERO, Dir3::X)
    }

    #[test]
    fn nearest_of_two_wins() {
        let near = Entity::from_raw(7);
        let far = Entity::from_raw(3);
        let (near_xf, near_bounds) = boxed(6.0);
        let (far_xf, far_bounds) = boxed(11.0);

        let hit = nearest_hit(
            ray(),
            [(far, &far_xf, &far_bounds), (near, &near_xf, &near_bounds)],
        )
        .unwrap();

        assert_eq!(hit.entity, near);
        assert!((hit.distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn no_intersection_is_none() {
        let (xf, bounds) = boxed(-10.0);
        assert_eq!(nearest_hit(ray(), [(Entity::from_raw(1), &xf, &bounds)]), None);
        assert_eq!(nearest_hit(ray(), std::iter::empty()), None);
    }

    #[test]
    fn equal_distance_is_stable() {
        let (xf, bounds) = boxed(5.0);
        let a = Entity::from_raw(4);
        let b = Entity::from_raw(9);

        let forward = nearest_hit(ray(), [(b, &xf, &bounds), (a, &xf, &bounds)]).unwrap();
        let reverse = nearest_hit(ray(), [(a, &xf, &bounds), (b, &xf, &bounds)]).unwrap();
        assert_eq!(forward.entity, a);
        assert_eq!(reverse.entity, a);
    }

    #[test]
    fn ndc_round_trips_through_viewport() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(pointer_to_ndc(Vec2::ZERO, viewport), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), viewport), Some(Vec2::ZERO));
        assert_eq!(ndc_to_viewport(Vec2::new(1.0, -1.0), viewport), viewport);
        assert_eq!(pointer_to_ndc(Vec2::ONE, Vec2::ZERO), None);
    }

    #[test]
    fn tag_is_found_on_an_ancestor() {
        let mesh = Entity::from_raw(1);
        let node = Entity::from_raw(2);
        let root = Entity::from_raw(3);
        let parents = HashMap::from([(mesh, node), (node, root)]);
        let tags = HashMap::from([(root, ExhibitTag::Trophy)]);

        let found = tag_of(mesh, |e| tags.get(&e).copied(), |e| parents.get(&e).copied());
        assert_eq!(found, Some((root, ExhibitTag::Trophy)));
    }

    #[test]
    fn untagged_chain_ends_in_none() {
        let mesh = Entity::from_raw(1);
        let root = Entity::from_raw(2);
        let parents = HashMap::from([(mesh, root)]);

        assert_eq!(tag_of(mesh, |_| None, |e| parents.get(&e).copied()), None);
    }

    #[test]
    fn cyclic_chain_is_bounded() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let parents = HashMap::from([(a, b), (b, a)]);

        assert_eq!(tag_of(a, |_| None, |e| parents.get(&e).copied()), None);
    }
}
