use std::collections::HashSet;

use cgmath::{InnerSpace, Vector3};
use engine::debug_draw::{self, DebugDrawSink, DrawRequest};
use engine::teleport_log;
use ordered_float::OrderedFloat;

use super::query::{CandidateObject, OverlapQuery, SurfaceHit, SurfaceQuery};
use crate::layers::LayerMask;

/// Seconds the debug overlay of a teleport stays visible
pub const DEBUG_DRAW_DURATION: f32 = 10.0;

const PATH_ARROW_HEAD_SIZE: f32 = 5.0;
const MATCH_BOX_SIZE: f32 = 1.0;

/// Aim ray of the observer. `direction` is expected to be unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SightRay {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl SightRay {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    /// Point `distance` units down the ray
    pub fn at(&self, distance: f32) -> Vector3<f32> {
        self.origin + self.direction * distance
    }
}

/// Inputs of a single resolution.
///
/// Expected to be validated before use: `checkpoint_count >= 1`,
/// `max_distance > 0` and `detection_radius >= 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverConfig {
    pub max_distance: f32,
    pub detection_radius: f32,
    pub checkpoint_count: u32,
    pub prioritized_types: HashSet<String>,
    /// Layers scanned by the object search
    pub object_layers: LayerMask,
    /// Layers the terrain ray test can land on
    pub ground_layers: LayerMask,
    pub debug: bool,
}

impl ResolverConfig {
    pub fn new<I, T>(
        max_distance: f32,
        detection_radius: f32,
        checkpoint_count: u32,
        prioritized_types: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            max_distance,
            detection_radius,
            checkpoint_count,
            prioritized_types: prioritized_types.into_iter().map(Into::into).collect(),
            object_layers: LayerMask::OBJECT_SEARCH,
            ground_layers: LayerMask::GROUND,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Distance between two consecutive checkpoints
    pub fn step_distance(&self) -> f32 {
        self.max_distance / self.checkpoint_count as f32
    }

    pub fn is_prioritized(&self, type_name: &str) -> bool {
        self.prioritized_types.contains(type_name)
    }
}

/// What decided the destination.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// A prioritized object near `checkpoint`
    Object {
        checkpoint: u32,
        object: CandidateObject,
    },
    /// A ground surface between `checkpoint` and the next one
    Terrain { checkpoint: u32, hit: SurfaceHit },
    /// Nothing was found; the destination is the far end of the ray
    Unresolved,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    pub position: Vector3<f32>,
    pub resolution: Resolution,
    /// Number of checkpoints examined, including the deciding one
    pub checkpoints_evaluated: u32,
}

impl Destination {
    pub fn matched_object(&self) -> Option<&CandidateObject> {
        match &self.resolution {
            Resolution::Object { object, .. } => Some(object),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.resolution, Resolution::Unresolved)
    }

    /// Index of the deciding checkpoint, if any
    pub fn checkpoint(&self) -> Option<u32> {
        match self.resolution {
            Resolution::Object { checkpoint, .. } | Resolution::Terrain { checkpoint, .. } => {
                Some(checkpoint)
            }
            Resolution::Unresolved => None,
        }
    }
}

/// Sight-line resolver. Holds a candidate buffer that is reused between
/// checkpoints and calls; nothing else survives a call.
#[derive(Debug, Default)]
pub struct SightLineResolver {
    candidates: Vec<CandidateObject>,
}

impl SightLineResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the checkpoints of `ray` and pick the destination.
    ///
    /// Checkpoint `i` sits `i * step_distance` down the ray, for
    /// `i in 0..=checkpoint_count`. The origin checkpoint only runs the terrain
    /// test so the player's own vehicle never captures the teleport. Draw
    /// requests go to `visualize` only when `config.debug` is set.
    pub fn resolve<O, S>(
        &mut self,
        ray: &SightRay,
        config: &ResolverConfig,
        overlap: &O,
        surface: &S,
        visualize: Option<&mut dyn DebugDrawSink>,
    ) -> Destination
    where
        O: OverlapQuery + ?Sized,
        S: SurfaceQuery + ?Sized,
    {
        let _span = tracing::debug_span!(
            "sight_line",
            max_distance = config.max_distance,
            checkpoints = config.checkpoint_count
        )
        .entered();

        let mut sink = if config.debug { visualize } else { None };

        let step_distance = config.step_distance();
        let far_end = ray.at(config.max_distance);

        emit(&mut sink, || {
            DrawRequest::arrow(
                DEBUG_DRAW_DURATION,
                debug_draw::BLACK,
                ray.origin,
                far_end,
                PATH_ARROW_HEAD_SIZE,
            )
        });

        let mut checkpoints_evaluated = 0;

        for index in 0..=config.checkpoint_count {
            checkpoints_evaluated += 1;
            let checkpoint = ray.at(index as f32 * step_distance);
            teleport_log!(trace, "checkpoint {} at {:?}", index, checkpoint);

            emit(&mut sink, || {
                DrawRequest::sphere(
                    DEBUG_DRAW_DURATION,
                    debug_draw::BLACK,
                    checkpoint,
                    config.detection_radius,
                )
            });

            if index != 0 {
                if let Some(object) = self.nearest_prioritized(checkpoint, config, overlap) {
                    teleport_log!(
                        debug,
                        "checkpoint {} matched {} ({:?}) at {:?}",
                        index,
                        object.type_name,
                        object.id,
                        object.position
                    );
                    emit(&mut sink, || {
                        DrawRequest::cube(
                            DEBUG_DRAW_DURATION,
                            debug_draw::GREEN,
                            object.position,
                            MATCH_BOX_SIZE,
                        )
                    });
                    emit(&mut sink, || {
                        DrawRequest::text(
                            DEBUG_DRAW_DURATION,
                            debug_draw::WHITE,
                            object.position,
                            object.type_name.clone(),
                        )
                    });

                    return Destination {
                        position: object.position,
                        resolution: Resolution::Object {
                            checkpoint: index,
                            object,
                        },
                        checkpoints_evaluated,
                    };
                }
            }

            if let Some(hit) =
                surface.cast_ray(checkpoint, ray.direction, step_distance, config.ground_layers)
            {
                teleport_log!(debug, "checkpoint {} hit ground at {:?}", index, hit.point);
                emit(&mut sink, || {
                    DrawRequest::cube(
                        DEBUG_DRAW_DURATION,
                        debug_draw::GREEN,
                        hit.point,
                        MATCH_BOX_SIZE,
                    )
                });

                return Destination {
                    position: hit.point,
                    resolution: Resolution::Terrain {
                        checkpoint: index,
                        hit,
                    },
                    checkpoints_evaluated,
                };
            }
        }

        teleport_log!(
            debug,
            "nothing along {} checkpoints, using far end {:?}",
            checkpoints_evaluated,
            far_end
        );

        Destination {
            position: far_end,
            resolution: Resolution::Unresolved,
            checkpoints_evaluated,
        }
    }

    /// Closest prioritized object around `checkpoint`. Ties keep the object
    /// the query reported first.
    fn nearest_prioritized<O>(
        &mut self,
        checkpoint: Vector3<f32>,
        config: &ResolverConfig,
        overlap: &O,
    ) -> Option<CandidateObject>
    where
        O: OverlapQuery + ?Sized,
    {
        self.candidates.clear();
        overlap.overlap_sphere(
            checkpoint,
            config.detection_radius,
            config.object_layers,
            &mut self.candidates,
        );

        let nearest = self
            .candidates
            .iter()
            .filter(|candidate| config.is_prioritized(&candidate.type_name))
            .min_by_key(|candidate| OrderedFloat((candidate.position - checkpoint).magnitude()))
            .cloned();

        self.candidates.clear();
        nearest
    }
}

/// One-shot resolution with a fresh resolver.
pub fn resolve<O, S>(
    ray: &SightRay,
    config: &ResolverConfig,
    overlap: &O,
    surface: &S,
    visualize: Option<&mut dyn DebugDrawSink>,
) -> Destination
where
    O: OverlapQuery + ?Sized,
    S: SurfaceQuery + ?Sized,
{
    SightLineResolver::new().resolve(ray, config, overlap, surface, visualize)
}

fn emit(sink: &mut Option<&mut dyn DebugDrawSink>, request: impl FnOnce() -> DrawRequest) {
    if let Some(sink) = sink {
        (**sink).draw(request());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::teleport::ObjectId;
    use cgmath::vec3;
    use engine::debug_draw::{DrawRecorder, DrawShape};

    /// Point objects plus walls perpendicular to the x axis
    #[derive(Default)]
    struct FakeWorld {
        objects: Vec<(CandidateObject, LayerMask)>,
        walls: Vec<f32>,
        overlap_centers: RefCell<Vec<Vector3<f32>>>,
        ray_origins: RefCell<Vec<Vector3<f32>>>,
    }

    impl FakeWorld {
        fn with_object(mut self, type_name: &str, position: Vector3<f32>) -> Self {
            self.add_object(type_name, position, LayerMask::VEHICLE);
            self
        }

        fn with_wall(mut self, x: f32) -> Self {
            self.walls.push(x);
            self
        }

        fn add_object(&mut self, type_name: &str, position: Vector3<f32>, layer: LayerMask) {
            let id = ObjectId(self.objects.len() as u64);
            self.objects.push((
                CandidateObject {
                    id,
                    type_name: type_name.to_string(),
                    position,
                },
                layer,
            ));
        }

        fn overlap_calls(&self) -> usize {
            self.overlap_centers.borrow().len()
        }

        fn ray_calls(&self) -> usize {
            self.ray_origins.borrow().len()
        }
    }

    impl OverlapQuery for FakeWorld {
        fn overlap_sphere(
            &self,
            center: Vector3<f32>,
            radius: f32,
            layers: LayerMask,
            found: &mut Vec<CandidateObject>,
        ) {
            self.overlap_centers.borrow_mut().push(center);
            for (object, layer) in &self.objects {
                if layers.intersects(*layer) && (object.position - center).magnitude() <= radius {
                    found.push(object.clone());
                }
            }
        }
    }

    impl SurfaceQuery for FakeWorld {
        fn cast_ray(
            &self,
            origin: Vector3<f32>,
            direction: Vector3<f32>,
            max_distance: f32,
            layers: LayerMask,
        ) -> Option<SurfaceHit> {
            self.ray_origins.borrow_mut().push(origin);
            if !layers.contains(LayerMask::TERRAIN) || direction.x <= 0.0 {
                return None;
            }
            self.walls
                .iter()
                .map(|wall| (wall - origin.x) / direction.x)
                .filter(|t| *t >= 0.0 && *t <= max_distance)
                .min_by_key(|t| OrderedFloat(*t))
                .map(|t| SurfaceHit {
                    point: origin + direction * t,
                    distance: t,
                })
        }
    }

    fn along_x() -> SightRay {
        SightRay::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0))
    }

    fn boat_config() -> ResolverConfig {
        ResolverConfig::new(100.0, 5.0, 10, ["boat"])
    }

    fn run(world: &FakeWorld, config: &ResolverConfig) -> Destination {
        resolve(&along_x(), config, world, world, None)
    }

    #[test]
    fn test_object_match_stops_at_its_checkpoint() {
        let world = FakeWorld::default().with_object("boat", vec3(32.0, 0.0, 0.0));
        let destination = run(&world, &boat_config());

        assert_eq!(destination.position, vec3(32.0, 0.0, 0.0));
        assert_eq!(destination.checkpoint(), Some(3));
        assert_eq!(destination.checkpoints_evaluated, 4);
        assert_eq!(destination.matched_object().unwrap().type_name, "boat");

        // Origin skips the object search; the deciding checkpoint skips the ray
        assert_eq!(world.overlap_calls(), 3);
        assert_eq!(world.ray_calls(), 3);
    }

    #[test]
    fn test_terrain_match_stops_at_its_checkpoint() {
        let world = FakeWorld::default().with_wall(52.0);
        let destination = run(&world, &boat_config());

        assert_eq!(destination.position, vec3(52.0, 0.0, 0.0));
        assert_eq!(destination.checkpoint(), Some(5));
        assert_eq!(destination.checkpoints_evaluated, 6);
        assert!(destination.matched_object().is_none());
        assert_eq!(world.ray_calls(), 6);
        assert_eq!(world.overlap_calls(), 5);
        assert!(world.ray_origins.borrow().iter().all(|origin| origin.x <= 50.0));
    }

    #[test]
    fn test_no_hits_falls_back_to_far_end() {
        let world = FakeWorld::default();
        let destination = run(&world, &boat_config());

        assert_eq!(destination.position, vec3(100.0, 0.0, 0.0));
        assert_eq!(destination.resolution, Resolution::Unresolved);
        assert!(!destination.is_resolved());
        assert_eq!(destination.checkpoints_evaluated, 11);
        assert_eq!(world.ray_calls(), 11);
        assert_eq!(world.overlap_calls(), 10);
    }

    #[test]
    fn test_far_end_is_exact_for_uneven_steps() {
        let world = FakeWorld::default();
        let ray = SightRay::new(vec3(1.0, 2.0, 3.0), vec3(0.0, 0.6, 0.8));
        let config = ResolverConfig::new(900.0, 40.0, 7, ["boat"]);
        let destination = resolve(&ray, &config, &world, &world, None);

        assert_eq!(destination.position, ray.origin + ray.direction * 900.0);
        assert_eq!(destination.checkpoints_evaluated, 8);
    }

    #[test]
    fn test_unprioritized_objects_are_ignored() {
        let world = FakeWorld::default()
            .with_object("car", vec3(32.0, 0.0, 0.0))
            .with_object("car", vec3(71.0, 0.0, 0.0));
        let destination = run(&world, &boat_config());

        assert_eq!(destination.resolution, Resolution::Unresolved);
        assert_eq!(destination.position, vec3(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_object_beats_terrain_at_same_checkpoint() {
        let world = FakeWorld::default()
            .with_object("boat", vec3(32.0, 0.0, 0.0))
            .with_wall(35.0);
        let destination = run(&world, &boat_config());

        assert_eq!(destination.position, vec3(32.0, 0.0, 0.0));
        assert_eq!(destination.checkpoint(), Some(3));
    }

    #[test]
    fn test_earlier_terrain_beats_later_object() {
        let world = FakeWorld::default()
            .with_object("boat", vec3(32.0, 0.0, 0.0))
            .with_wall(25.0);
        let destination = run(&world, &boat_config());

        assert_eq!(destination.position, vec3(25.0, 0.0, 0.0));
        assert!(matches!(
            destination.resolution,
            Resolution::Terrain { checkpoint: 2, .. }
        ));
        assert_eq!(world.overlap_calls(), 2);
    }

    #[test]
    fn test_nearest_object_to_checkpoint_wins() {
        let world = FakeWorld::default()
            .with_object("rhib", vec3(27.0, 0.0, 0.0))
            .with_object("rowboat", vec3(31.0, 0.0, 0.0));
        let config = ResolverConfig::new(100.0, 5.0, 10, ["rhib", "rowboat"]);
        let destination = run(&world, &config);

        assert_eq!(destination.matched_object().unwrap().type_name, "rowboat");
    }

    #[test]
    fn test_ties_keep_query_order() {
        let world = FakeWorld::default()
            .with_object("boat", vec3(33.0, 0.0, 0.0))
            .with_object("boat", vec3(27.0, 0.0, 0.0));
        let destination = run(&world, &boat_config());

        assert_eq!(destination.matched_object().unwrap().id, ObjectId(0));
    }

    #[test]
    fn test_origin_checkpoint_skips_object_search() {
        let world = FakeWorld::default().with_object("boat", vec3(0.0, 0.0, 0.0));
        let destination = run(&world, &boat_config());

        assert_eq!(destination.resolution, Resolution::Unresolved);
        assert!(world
            .overlap_centers
            .borrow()
            .iter()
            .all(|center| *center != vec3(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_origin_checkpoint_runs_terrain_search() {
        let world = FakeWorld::default().with_wall(4.0);
        let destination = run(&world, &boat_config());

        assert_eq!(destination.checkpoint(), Some(0));
        assert_eq!(destination.position, vec3(4.0, 0.0, 0.0));
        assert_eq!(world.overlap_calls(), 0);
    }

    #[test]
    fn test_object_outside_search_layers_is_ignored() {
        let mut world = FakeWorld::default();
        world.add_object("boat", vec3(32.0, 0.0, 0.0), LayerMask::PLAYER);
        let destination = run(&world, &boat_config());

        assert_eq!(destination.resolution, Resolution::Unresolved);
    }

    #[test]
    fn test_larger_radius_never_matches_later() {
        let world = FakeWorld::default().with_object("boat", vec3(35.0, 0.0, 3.0));
        let mut previous = u32::MAX;

        for radius in [0.0, 3.0, 5.0, 6.0, 10.0, 16.0, 40.0] {
            let config = ResolverConfig::new(100.0, radius, 10, ["boat"]);
            let checkpoint = run(&world, &config).checkpoint().unwrap_or(u32::MAX);
            assert!(checkpoint <= previous, "radius {} moved the match later", radius);
            previous = checkpoint;
        }

        assert_eq!(previous, 1);
    }

    #[test]
    fn test_debug_draws_path_volumes_and_match() {
        let world = FakeWorld::default().with_object("boat", vec3(32.0, 0.0, 0.0));
        let config = boat_config().with_debug(true);
        let mut recorder = DrawRecorder::new();
        resolve(&along_x(), &config, &world, &world, Some(&mut recorder));

        let shapes: Vec<&DrawShape> = recorder.requests.iter().map(|r| &r.shape).collect();
        assert_eq!(shapes.len(), 7);
        assert!(matches!(shapes[0], DrawShape::Arrow { head_size, .. } if *head_size == 5.0));
        assert_eq!(
            shapes
                .iter()
                .filter(|s| matches!(s, DrawShape::Sphere { radius, .. } if *radius == 5.0))
                .count(),
            4
        );
        assert!(matches!(shapes[5], DrawShape::Box { center, .. } if *center == vec3(32.0, 0.0, 0.0)));
        assert!(matches!(shapes[6], DrawShape::Text { text, .. } if text == "boat"));
        assert!(recorder
            .requests
            .iter()
            .all(|r| r.duration == DEBUG_DRAW_DURATION));
    }

    #[test]
    fn test_terrain_match_draws_box_without_label() {
        let world = FakeWorld::default().with_wall(52.0);
        let config = boat_config().with_debug(true);
        let mut recorder = DrawRecorder::new();
        resolve(&along_x(), &config, &world, &world, Some(&mut recorder));

        let last = recorder.requests.last().unwrap();
        assert_eq!(last.color, debug_draw::GREEN);
        assert!(matches!(last.shape, DrawShape::Box { .. }));
        assert!(!recorder
            .requests
            .iter()
            .any(|r| matches!(r.shape, DrawShape::Text { .. })));
    }

    #[test]
    fn test_debug_disabled_draws_nothing() {
        let world = FakeWorld::default().with_object("boat", vec3(32.0, 0.0, 0.0));
        let mut recorder = DrawRecorder::new();
        resolve(&along_x(), &boat_config(), &world, &world, Some(&mut recorder));

        assert!(recorder.is_empty());
    }

    #[test]
    fn test_resolver_reuse_gives_same_answer() {
        let world = FakeWorld::default().with_object("boat", vec3(62.0, 0.0, 0.0));
        let mut resolver = SightLineResolver::new();
        let first = resolver.resolve(&along_x(), &boat_config(), &world, &world, None);
        let second = resolver.resolve(&along_x(), &boat_config(), &world, &world, None);

        assert_eq!(first, second);
        assert_eq!(first.checkpoint(), Some(6));
        assert!(resolver.candidates.is_empty());
    }
}
