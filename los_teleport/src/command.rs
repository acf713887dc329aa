// Console command interception
//
// Takes over the native `teleportlos` admin command: instead of stopping at
// the first collider under the crosshair, the caller is sent through the
// sight-line resolver.

use cgmath::Vector3;
use engine::command_log;
use engine::debug_draw::DrawRecorder;

use crate::config::TeleportConfig;
use crate::error::TeleportResult;
use crate::teleport::{
    Destination, OverlapQuery, ResolverConfig, SightLineResolver, SightRay, SurfaceQuery,
};

/// Fully qualified name of the intercepted command
pub const TELEPORT_LOS_COMMAND: &str = "global.teleportlos";

/// Player issuing a console command.
#[derive(Clone, Debug)]
pub struct Caller {
    pub name: String,
    pub is_admin: bool,
    /// Ray from the player's eyes along their view direction
    pub eye_ray: SightRay,
}

/// Something the host must apply on behalf of the command.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Run a console command on the caller's client
    ConsoleCommand { command: String },
    SetPlayerPosition {
        position: Vector3<f32>,
        is_teleport: bool,
    },
}

pub struct LineOfSightTeleport {
    config: ResolverConfig,
    resolver: SightLineResolver,
}

impl LineOfSightTeleport {
    pub fn new(config: &TeleportConfig) -> TeleportResult<Self> {
        config.validate()?;
        Ok(Self::with_resolver_config(config.resolver_config()))
    }

    pub fn with_resolver_config(config: ResolverConfig) -> Self {
        Self {
            config,
            resolver: SightLineResolver::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns `None` when the command is not ours to handle (unknown command,
    /// no player, or a player without admin rights) so the native command runs.
    pub fn on_server_command<W>(
        &mut self,
        caller: Option<&Caller>,
        command: &str,
        world: &W,
    ) -> Option<Vec<Effect>>
    where
        W: OverlapQuery + SurfaceQuery + ?Sized,
    {
        if command != TELEPORT_LOS_COMMAND {
            return None;
        }

        let caller = caller?;
        if !caller.is_admin {
            command_log!(debug, "{} is not an admin, leaving {} alone", caller.name, command);
            return None;
        }

        let (_, effects) = self.teleport(caller, world);
        Some(effects)
    }

    /// Resolve the caller's sight line. The effects hold the debug overlay
    /// commands (if enabled) followed by the teleport itself; an unresolved
    /// sight line still teleports to its far end.
    pub fn teleport<W>(&mut self, caller: &Caller, world: &W) -> (Destination, Vec<Effect>)
    where
        W: OverlapQuery + SurfaceQuery + ?Sized,
    {
        let mut recorder = DrawRecorder::new();
        let destination = self.resolver.resolve(
            &caller.eye_ray,
            &self.config,
            world,
            world,
            Some(&mut recorder),
        );

        command_log!(
            info,
            "teleporting {} to {:?} ({:?})",
            caller.name,
            destination.position,
            destination.checkpoint()
        );

        let mut effects: Vec<Effect> = recorder
            .drain()
            .map(|request| Effect::ConsoleCommand {
                command: request.console_command(),
            })
            .collect();
        effects.push(Effect::SetPlayerPosition {
            position: destination.position,
            is_teleport: true,
        });

        (destination, effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::Layer;
    use crate::physics::PhysicsWorld;
    use cgmath::vec3;

    fn admin() -> Caller {
        Caller {
            name: "admin".to_string(),
            is_admin: true,
            eye_ray: SightRay::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)),
        }
    }

    fn plugin(debug: bool) -> LineOfSightTeleport {
        let config = TeleportConfig {
            teleport_distance_limit: 100.0,
            checkpoint_count: 10,
            detection_radius: 5.0,
            enable_debug: debug,
            ..TeleportConfig::default()
        };
        LineOfSightTeleport::new(&config).unwrap()
    }

    fn world_with_rowboat() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_object("rowboat", vec3(32.0, 0.0, 0.0), 1.0, Layer::Vehicle, false);
        world.update_queries();
        world
    }

    #[test]
    fn test_ignores_other_commands() {
        let world = world_with_rowboat();
        let result = plugin(false).on_server_command(Some(&admin()), "global.teleport", &world);
        assert!(result.is_none());
    }

    #[test]
    fn test_ignores_non_admins_and_server_console() {
        let world = world_with_rowboat();
        let mut plugin = plugin(false);
        let player = Caller {
            is_admin: false,
            ..admin()
        };

        assert!(plugin
            .on_server_command(Some(&player), TELEPORT_LOS_COMMAND, &world)
            .is_none());
        assert!(plugin
            .on_server_command(None, TELEPORT_LOS_COMMAND, &world)
            .is_none());
    }

    #[test]
    fn test_admin_is_teleported_onto_boat() {
        let world = world_with_rowboat();
        let effects = plugin(false)
            .on_server_command(Some(&admin()), TELEPORT_LOS_COMMAND, &world)
            .unwrap();

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::SetPlayerPosition {
                position,
                is_teleport,
            } => {
                assert!((position.x - 32.0).abs() < 1e-3);
                assert!(*is_teleport);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_still_teleports_to_far_end() {
        let world = PhysicsWorld::new();
        let (destination, effects) = plugin(false).teleport(&admin(), &world);

        assert!(!destination.is_resolved());
        assert_eq!(
            effects,
            vec![Effect::SetPlayerPosition {
                position: vec3(100.0, 0.0, 0.0),
                is_teleport: true,
            }]
        );
    }

    #[test]
    fn test_debug_sends_draw_commands_before_teleport() {
        let world = world_with_rowboat();
        let effects = plugin(true)
            .on_server_command(Some(&admin()), TELEPORT_LOS_COMMAND, &world)
            .unwrap();

        // arrow, four search spheres, box and label
        assert_eq!(effects.len(), 8);
        assert!(matches!(
            &effects[0],
            Effect::ConsoleCommand { command } if command.starts_with("ddraw.arrow")
        ));
        assert!(matches!(
            &effects[6],
            Effect::ConsoleCommand { command } if command.ends_with("\"rowboat\"")
        ));
        assert!(matches!(effects[7], Effect::SetPlayerPosition { .. }));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TeleportConfig {
            checkpoint_count: 0,
            ..TeleportConfig::default()
        };
        assert!(LineOfSightTeleport::new(&config).is_err());
    }
}
