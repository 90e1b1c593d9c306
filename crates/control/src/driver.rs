use glam::Vec3;
use skiff_common::WORLD_FORWARD;
use skiff_input::{sample_into, DirectionToken, HeldKeys, InputQueue};
use skiff_physics::{BodyHandle, PhysicsWorld};
use skiff_scene::{FollowCamera, NodeId, Scene};

use crate::motion::{resolve_motion, sync_transforms, MotionConfig};

/// Upper bound on a single simulated step. A stall (breakpoint, window drag,
/// suspended laptop) otherwise comes back as one enormous dt and launches the
/// player through the floor.
pub const MAX_STEP_SECONDS: f32 = 0.1;

/// Where the demo is in its tiny lifecycle. One-way: once active, always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Instructions overlay is up; input sampling is off.
    Instructions,
    /// Player is in control.
    Active,
}

/// Fatal precondition failures inside a frame. These mean the world the
/// driver was built against no longer exists; the loop should stop.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("player body {0:?} is gone from the physics world")]
    MissingBody(BodyHandle),
    #[error("player node {0:?} is gone from the scene")]
    MissingNode(NodeId),
}

/// Owns per-frame control state and runs the frame in a fixed order:
/// sample, step, debug lines, resolve, sync. Rendering happens outside,
/// after `tick` returns.
pub struct FrameDriver {
    phase: Phase,
    queue: InputQueue,
    direction: Vec3,
    config: MotionConfig,
    player_body: BodyHandle,
    player_node: NodeId,
}

impl FrameDriver {
    pub fn new(player_body: BodyHandle, player_node: NodeId, config: MotionConfig) -> Self {
        Self {
            phase: Phase::Instructions,
            queue: InputQueue::new(),
            direction: WORLD_FORWARD,
            config,
            player_body,
            player_node,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Steering direction as of the last resolve.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn pending_tokens(&self) -> &[DirectionToken] {
        self.queue.tokens()
    }

    /// Leave the instructions phase. Further calls are no-ops.
    pub fn dismiss_instructions(&mut self) {
        if self.phase == Phase::Instructions {
            self.phase = Phase::Active;
            tracing::info!("instructions dismissed, control is live");
        }
    }

    /// Run one frame. `show_colliders` decides whether the physics world
    /// refills or empties its debug line buffer this frame.
    pub fn tick(
        &mut self,
        dt: f32,
        held: &HeldKeys,
        physics: &mut PhysicsWorld,
        scene: &mut Scene,
        camera: &mut FollowCamera,
        show_colliders: bool,
    ) -> Result<(), FrameError> {
        let dt = dt.min(MAX_STEP_SECONDS);
        debug_assert!(self.queue.is_empty(), "token queue must start a frame empty");

        if self.phase == Phase::Active {
            sample_into(held, &mut self.queue);
        }

        physics.step(dt);

        if show_colliders {
            physics.collect_debug_lines();
        } else {
            physics.clear_debug_lines();
        }

        resolve_motion(
            &mut self.queue,
            &mut self.direction,
            &self.config,
            physics,
            self.player_body,
            scene,
            self.player_node,
        )?;
        sync_transforms(physics, self.player_body, scene, self.player_node, camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiff_common::AxisMask;
    use skiff_input::Key;
    use skiff_scene::SceneNode;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        physics: PhysicsWorld,
        scene: Scene,
        camera: FollowCamera,
        driver: FrameDriver,
        body: BodyHandle,
        node: NodeId,
    }

    /// Zero-gravity rig so velocities stay exactly what the resolver wrote.
    fn rig() -> Rig {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let body = physics.add_dynamic_ball(Vec3::ZERO, 1.0, 1.0, 0.0, AxisMask::YAW_ONLY);
        let mut scene = Scene::new();
        let node = scene.insert(SceneNode::new("hull"));
        let driver = FrameDriver::new(body, node, MotionConfig::default());
        Rig {
            physics,
            scene,
            camera: FollowCamera::default(),
            driver,
            body,
            node,
        }
    }

    #[test]
    fn starts_in_instructions_phase() {
        let rig = rig();
        assert_eq!(rig.driver.phase(), Phase::Instructions);
        assert_eq!(rig.driver.direction(), WORLD_FORWARD);
        assert!(rig.driver.pending_tokens().is_empty());
    }

    #[test]
    fn instructions_phase_ignores_held_keys() {
        let mut rig = rig();
        let mut held = HeldKeys::new();
        held.press(Key::KeyW);

        rig.driver
            .tick(
                DT,
                &held,
                &mut rig.physics,
                &mut rig.scene,
                &mut rig.camera,
                false,
            )
            .unwrap();

        assert_eq!(rig.physics.linear_velocity(rig.body), Some(Vec3::ZERO));
    }

    #[test]
    fn dismissal_is_one_way_and_enables_sampling() {
        let mut rig = rig();
        let mut held = HeldKeys::new();
        held.press(Key::KeyW);

        rig.driver.dismiss_instructions();
        rig.driver.dismiss_instructions();
        assert_eq!(rig.driver.phase(), Phase::Active);

        rig.driver
            .tick(
                DT,
                &held,
                &mut rig.physics,
                &mut rig.scene,
                &mut rig.camera,
                false,
            )
            .unwrap();

        let vel = rig.physics.linear_velocity(rig.body).unwrap();
        assert!(vel.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-6));
        assert!(rig.driver.pending_tokens().is_empty());
    }

    #[test]
    fn direction_lags_the_synced_orientation_by_one_frame() {
        let mut rig = rig();
        rig.driver.dismiss_instructions();
        let held = HeldKeys::new();

        // Quarter turn in a single clamped frame: 5pi rad/s for 0.1 s.
        rig.physics
            .set_angular_velocity(rig.body, Vec3::new(0.0, 5.0 * std::f32::consts::PI, 0.0));
        rig.driver
            .tick(
                MAX_STEP_SECONDS,
                &held,
                &mut rig.physics,
                &mut rig.scene,
                &mut rig.camera,
                false,
            )
            .unwrap();

        // The node was synced to the new yaw, but the direction was computed
        // before that sync and still points the old way.
        let node_rot = rig.scene.get(rig.node).unwrap().transform.rotation;
        assert!((node_rot * WORLD_FORWARD).abs_diff_eq(Vec3::X, 0.05));
        assert!(rig.driver.direction().abs_diff_eq(WORLD_FORWARD, 1e-4));

        // The very next frame picks the new orientation up.
        rig.physics.set_angular_velocity(rig.body, Vec3::ZERO);
        rig.driver
            .tick(
                1e-4,
                &held,
                &mut rig.physics,
                &mut rig.scene,
                &mut rig.camera,
                false,
            )
            .unwrap();
        assert!(rig.driver.direction().abs_diff_eq(Vec3::X, 0.05));
    }

    #[test]
    fn tick_clamps_runaway_dt() {
        let mut rig = rig();
        rig.driver.dismiss_instructions();
        let held = HeldKeys::new();
        rig.physics
            .set_linear_velocity(rig.body, Vec3::new(1.0, 0.0, 0.0));

        rig.driver
            .tick(
                5.0,
                &held,
                &mut rig.physics,
                &mut rig.scene,
                &mut rig.camera,
                false,
            )
            .unwrap();

        let pos = rig.physics.position(rig.body).unwrap();
        assert!(
            (pos.x - MAX_STEP_SECONDS).abs() < 1e-3,
            "moved {} in one clamped frame",
            pos.x
        );
    }

    #[test]
    fn tick_controls_the_debug_line_buffer() {
        let mut rig = rig();
        let held = HeldKeys::new();

        rig.driver
            .tick(
                DT,
                &held,
                &mut rig.physics,
                &mut rig.scene,
                &mut rig.camera,
                true,
            )
            .unwrap();
        assert!(!rig.physics.debug_lines().is_empty());

        rig.driver
            .tick(
                DT,
                &held,
                &mut rig.physics,
                &mut rig.scene,
                &mut rig.camera,
                false,
            )
            .unwrap();
        assert!(rig.physics.debug_lines().is_empty());
    }

    #[test]
    fn tick_against_a_foreign_world_fails() {
        let mut rig = rig();
        let mut other = PhysicsWorld::new(Vec3::ZERO);
        let held = HeldKeys::new();

        let err = rig
            .driver
            .tick(
                DT,
                &held,
                &mut other,
                &mut rig.scene,
                &mut rig.camera,
                false,
            )
            .unwrap_err();
        assert!(matches!(err, FrameError::MissingBody(_)));
    }

    #[test]
    fn camera_tracks_the_player_after_tick() {
        let mut rig = rig();
        rig.driver.dismiss_instructions();
        let held = HeldKeys::new();
        rig.physics
            .set_linear_velocity(rig.body, Vec3::new(2.0, 0.0, 0.0));

        for _ in 0..30 {
            rig.driver
                .tick(
                    DT,
                    &held,
                    &mut rig.physics,
                    &mut rig.scene,
                    &mut rig.camera,
                    false,
                )
                .unwrap();
        }

        let pos = rig.physics.position(rig.body).unwrap();
        assert!(pos.x > 0.5);
        assert_eq!(rig.camera.target, pos);
    }
}
