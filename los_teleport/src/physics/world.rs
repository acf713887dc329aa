use std::collections::HashMap;

use cgmath::Vector3;
use engine::physics_log;
use rapier3d::parry::query::PointQuery;
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::*;

use super::util::{layer_filter, layer_groups, npoint_to_cgvec, vec_to_npoint, vec_to_nvec};
use crate::layers::{Layer, LayerMask};
use crate::scene::SceneDescription;
use crate::teleport::{CandidateObject, ObjectId, OverlapQuery, SurfaceHit, SurfaceQuery};

/// Collider `user_data` of colliders not owned by an object (ground surfaces)
const NO_OWNER: u128 = 0;

/// Object registered in the world, resolvable from its collider.
#[derive(Clone, Debug)]
pub struct TrackedObject {
    pub id: ObjectId,
    pub type_name: String,
    pub position: Vector3<f32>,
    pub layer: Layer,
    pub collider: ColliderHandle,
}

impl TrackedObject {
    fn candidate(&self) -> CandidateObject {
        CandidateObject {
            id: self.id,
            type_name: self.type_name.clone(),
            position: self.position,
        }
    }
}

/// Static collision world answering the teleport queries.
///
/// Objects are balls owned by a [`TrackedObject`]; surfaces are unowned
/// cuboids. Call [`PhysicsWorld::update_queries`] after edits, queries run
/// against the last update.
pub struct PhysicsWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    islands: IslandManager,
    query_pipeline: QueryPipeline,
    objects: HashMap<ObjectId, TrackedObject>,
    next_object_id: u64,
    stale: bool,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            islands: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            objects: HashMap::new(),
            next_object_id: 0,
            stale: false,
        }
    }

    /// Build a world from a scene description, ready to query.
    pub fn from_scene(scene: &SceneDescription) -> Self {
        let mut world = Self::new();

        for object in &scene.objects {
            world.add_object(
                &object.type_name,
                Vector3::from(object.position),
                object.radius,
                object.layer,
                object.sensor,
            );
        }

        for surface in &scene.surfaces {
            world.add_surface(
                Vector3::from(surface.center),
                Vector3::from(surface.half_extents),
                surface.layer,
            );
        }

        world.update_queries();
        physics_log!(
            info,
            "scene loaded: {} objects, {} surfaces",
            world.object_count(),
            scene.surfaces.len()
        );
        world
    }

    pub fn add_object(
        &mut self,
        type_name: &str,
        position: Vector3<f32>,
        radius: f32,
        layer: Layer,
        sensor: bool,
    ) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;

        let collider = ColliderBuilder::ball(radius)
            .translation(vec_to_nvec(position))
            .collision_groups(layer_groups(layer.mask()))
            .sensor(sensor)
            .user_data(id.0 as u128 + 1)
            .build();
        let handle = self.colliders.insert(collider);

        self.objects.insert(
            id,
            TrackedObject {
                id,
                type_name: type_name.to_string(),
                position,
                layer,
                collider: handle,
            },
        );
        self.stale = true;

        physics_log!(debug, "added {} {:?} at {:?}", type_name, id, position);
        id
    }

    pub fn add_surface(
        &mut self,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        layer: Layer,
    ) -> ColliderHandle {
        if !layer.is_ground() {
            physics_log!(
                warn,
                "surface at {:?} is on {:?}, which terrain rays never hit",
                center,
                layer
            );
        }

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vec_to_nvec(center))
            .collision_groups(layer_groups(layer.mask()))
            .user_data(NO_OWNER)
            .build();
        self.stale = true;
        self.colliders.insert(collider)
    }

    /// Teleport an object; returns false for unknown ids.
    pub fn move_object(&mut self, id: ObjectId, position: Vector3<f32>) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        let Some(collider) = self.colliders.get_mut(object.collider) else {
            return false;
        };

        collider.set_translation(vec_to_nvec(position));
        object.position = position;
        self.stale = true;
        true
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<TrackedObject> {
        let object = self.objects.remove(&id)?;
        self.colliders
            .remove(object.collider, &mut self.islands, &mut self.bodies, false);
        self.stale = true;
        Some(object)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Rebuild the acceleration structure used by the queries.
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.bodies, &self.colliders);
        self.stale = false;
    }

    fn owner_of(&self, handle: ColliderHandle) -> Option<&TrackedObject> {
        let user_data = self.colliders.get(handle)?.user_data;
        if user_data == NO_OWNER {
            return None;
        }
        self.objects.get(&ObjectId((user_data - 1) as u64))
    }

    fn warn_if_stale(&self) {
        if self.stale {
            physics_log!(warn, "querying before update_queries; recent edits are invisible");
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapQuery for PhysicsWorld {
    fn overlap_sphere(
        &self,
        center: Vector3<f32>,
        radius: f32,
        layers: LayerMask,
        found: &mut Vec<CandidateObject>,
    ) {
        self.warn_if_stale();

        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);

        self.query_pipeline.intersections_with_shape(
            &self.bodies,
            &self.colliders,
            &shape_pos,
            &shape,
            layer_filter(layers),
            |handle| {
                if let Some(object) = self.owner_of(handle) {
                    found.push(object.candidate());
                }
                true
            },
        );
    }
}

impl SurfaceQuery for PhysicsWorld {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<SurfaceHit> {
        self.warn_if_stale();

        let ray = Ray::new(vec_to_npoint(origin), vec_to_nvec(direction));
        // Surfaces enclosing the origin are skipped so a ray starting inside a
        // block keeps sweeping instead of stopping at distance zero.
        let outside_origin = |_: ColliderHandle, collider: &Collider| {
            !collider
                .shape()
                .contains_point(collider.position(), &ray.origin)
        };
        let filter = layer_filter(layers)
            .exclude_sensors()
            .predicate(&outside_origin);

        self.query_pipeline
            .cast_ray(&self.bodies, &self.colliders, &ray, max_distance, true, filter)
            .map(|(_, toi)| SurfaceHit {
                point: npoint_to_cgvec(ray.point_at(toi)),
                distance: toi,
            })
    }
}
