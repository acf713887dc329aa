use cgmath::Vector3;
use rapier3d::prelude::*;

use crate::layers::LayerMask;

pub fn vec_to_npoint(vec: Vector3<f32>) -> Point<Real> {
    point![vec.x, vec.y, vec.z]
}

pub fn vec_to_nvec(vec: Vector3<f32>) -> Vector<Real> {
    vector![vec.x, vec.y, vec.z]
}

pub fn npoint_to_cgvec(point: Point<Real>) -> Vector3<f32> {
    Vector3 {
        x: point.x,
        y: point.y,
        z: point.z,
    }
}

/// Collision groups for a collider living on `layers`. The collider itself
/// accepts queries from every group.
pub fn layer_groups(layers: LayerMask) -> InteractionGroups {
    InteractionGroups::new(Group::from_bits_truncate(layers.bits()), Group::ALL)
}

/// Query filter that only sees colliders on `layers`.
pub fn layer_filter(layers: LayerMask) -> QueryFilter<'static> {
    QueryFilter::new().groups(InteractionGroups::new(
        Group::ALL,
        Group::from_bits_truncate(layers.bits()),
    ))
}
