use cgmath::Vector3;

use crate::layers::LayerMask;

/// Identity of an object owning one or more colliders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Object reported by an overlap query.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateObject {
    pub id: ObjectId,
    /// Short type name, e.g. `rhib` or `minicopter.entity`
    pub type_name: String,
    pub position: Vector3<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vector3<f32>,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

/// Sphere overlap against the objects of a world.
pub trait OverlapQuery {
    /// Append every object with a collider inside the sphere to `found`,
    /// considering only colliders on `layers`. Trigger volumes count.
    ///
    /// An object may be reported more than once if several of its colliders
    /// overlap.
    fn overlap_sphere(
        &self,
        center: Vector3<f32>,
        radius: f32,
        layers: LayerMask,
        found: &mut Vec<CandidateObject>,
    );
}

/// Bounded ray test against solid surfaces.
pub trait SurfaceQuery {
    /// First solid surface on `layers` hit within `max_distance` of `origin`.
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<SurfaceHit>;
}

impl<T: OverlapQuery + ?Sized> OverlapQuery for &T {
    fn overlap_sphere(
        &self,
        center: Vector3<f32>,
        radius: f32,
        layers: LayerMask,
        found: &mut Vec<CandidateObject>,
    ) {
        (**self).overlap_sphere(center, radius, layers, found)
    }
}

impl<T: SurfaceQuery + ?Sized> SurfaceQuery for &T {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<SurfaceHit> {
        (**self).cast_ray(origin, direction, max_distance, layers)
    }
}
