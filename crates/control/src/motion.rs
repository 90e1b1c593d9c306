use glam::Vec3;
use skiff_common::{AxisMask, WORLD_FORWARD};
use skiff_input::{DirectionToken, InputQueue};
use skiff_physics::{BodyHandle, PhysicsWorld};
use skiff_scene::{FollowCamera, NodeId, Scene};

use crate::driver::FrameError;

/// Speeds for the two kinds of motion the player has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Planar speed applied while a forward or backward token is live, m/s.
    pub movement_speed: f32,
    /// Yaw rate applied while a turn token is live, rad/s.
    pub rotation_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            movement_speed: 3.0,
            rotation_speed: 2.0,
        }
    }
}

/// Apply this frame's tokens to the player body, then refresh the steering
/// direction from the visual node and empty the queue.
///
/// Tokens run first to last, each overwriting the rotation lock, so the last
/// token in the queue decides whether the body may yaw. The direction refresh
/// reads the node as it was synced last frame; this frame's physics result
/// reaches it one sync later.
pub fn resolve_motion(
    queue: &mut InputQueue,
    direction: &mut Vec3,
    config: &MotionConfig,
    physics: &mut PhysicsWorld,
    body: BodyHandle,
    scene: &Scene,
    node: NodeId,
) -> Result<(), FrameError> {
    for token in queue.tokens() {
        match token {
            DirectionToken::Forward => drive(physics, body, *direction, config.movement_speed)?,
            DirectionToken::Backward => drive(physics, body, *direction, -config.movement_speed)?,
            DirectionToken::TurnLeft => turn(physics, body, config.rotation_speed)?,
            DirectionToken::TurnRight => turn(physics, body, -config.rotation_speed)?,
        }
    }

    let visual = scene.get(node).ok_or(FrameError::MissingNode(node))?;
    *direction = visual.transform.rotation * WORLD_FORWARD;
    queue.clear();
    Ok(())
}

/// Set planar velocity along the steering direction, keeping whatever
/// vertical velocity gravity has produced, and lock all rotation.
fn drive(
    physics: &mut PhysicsWorld,
    body: BodyHandle,
    direction: Vec3,
    speed: f32,
) -> Result<(), FrameError> {
    let vy = physics
        .linear_velocity(body)
        .ok_or(FrameError::MissingBody(body))?
        .y;
    physics.set_linear_velocity(
        body,
        Vec3::new(direction.x * speed, vy, direction.z * speed),
    );
    physics.set_rotation_factor(body, AxisMask::LOCKED);
    Ok(())
}

/// Set a pure yaw rate and unlock exactly the yaw axis.
fn turn(physics: &mut PhysicsWorld, body: BodyHandle, rate: f32) -> Result<(), FrameError> {
    if !physics.set_angular_velocity(body, Vec3::new(0.0, rate, 0.0)) {
        return Err(FrameError::MissingBody(body));
    }
    physics.set_rotation_factor(body, AxisMask::YAW_ONLY);
    Ok(())
}

/// Copy the body pose onto its node and re-aim the chase camera at it.
pub fn sync_transforms(
    physics: &PhysicsWorld,
    body: BodyHandle,
    scene: &mut Scene,
    node: NodeId,
    camera: &mut FollowCamera,
) -> Result<(), FrameError> {
    let position = physics.position(body).ok_or(FrameError::MissingBody(body))?;
    let rotation = physics
        .orientation(body)
        .ok_or(FrameError::MissingBody(body))?;
    if !scene.set_pose(node, position, rotation) {
        return Err(FrameError::MissingNode(node));
    }
    camera.follow(position, rotation);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use skiff_scene::SceneNode;

    /// Zero-gravity world with a yaw-only unit ball at the origin and a bare
    /// node for it, so velocities are exactly what the resolver wrote.
    fn rig() -> (PhysicsWorld, Scene, BodyHandle, NodeId) {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let body = physics.add_dynamic_ball(Vec3::ZERO, 1.0, 1.0, 0.0, AxisMask::YAW_ONLY);
        let mut scene = Scene::new();
        let node = scene.insert(SceneNode::new("hull"));
        (physics, scene, body, node)
    }

    fn queue_of(tokens: &[DirectionToken]) -> InputQueue {
        let mut queue = InputQueue::new();
        for &t in tokens {
            queue.push(t);
        }
        queue
    }

    #[test]
    fn forward_sets_planar_velocity_and_locks_rotation() {
        let (mut physics, scene, body, node) = rig();
        let mut queue = queue_of(&[DirectionToken::Forward]);
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();

        let vel = physics.linear_velocity(body).unwrap();
        assert!(vel.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-6));
        assert_eq!(physics.rotation_factor(body), Some(AxisMask::LOCKED));
    }

    #[test]
    fn backward_reverses_the_direction() {
        let (mut physics, scene, body, node) = rig();
        let mut queue = queue_of(&[DirectionToken::Backward]);
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();

        let vel = physics.linear_velocity(body).unwrap();
        assert!(vel.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-6));
    }

    #[test]
    fn drive_preserves_vertical_velocity() {
        let (mut physics, scene, body, node) = rig();
        physics.set_linear_velocity(body, Vec3::new(0.5, -4.0, 0.5));
        let mut queue = queue_of(&[DirectionToken::Forward]);
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();

        let vel = physics.linear_velocity(body).unwrap();
        assert!(vel.abs_diff_eq(Vec3::new(0.0, -4.0, 3.0), 1e-6));
    }

    #[test]
    fn turns_set_yaw_rate_and_unlock_yaw_only() {
        let (mut physics, scene, body, node) = rig();
        let config = MotionConfig::default();
        let mut direction = WORLD_FORWARD;

        let mut queue = queue_of(&[DirectionToken::TurnLeft]);
        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();
        let angvel = physics.angular_velocity(body).unwrap();
        assert!(angvel.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
        assert_eq!(physics.rotation_factor(body), Some(AxisMask::YAW_ONLY));

        let mut queue = queue_of(&[DirectionToken::TurnRight]);
        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();
        let angvel = physics.angular_velocity(body).unwrap();
        assert!(angvel.abs_diff_eq(Vec3::new(0.0, -2.0, 0.0), 1e-6));
    }

    #[test]
    fn last_token_decides_the_rotation_lock() {
        let (mut physics, scene, body, node) = rig();
        let config = MotionConfig::default();
        let mut direction = WORLD_FORWARD;

        let mut queue = queue_of(&[DirectionToken::Forward, DirectionToken::TurnLeft]);
        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();
        assert_eq!(physics.rotation_factor(body), Some(AxisMask::YAW_ONLY));

        let mut queue = queue_of(&[DirectionToken::TurnLeft, DirectionToken::Forward]);
        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();
        assert_eq!(physics.rotation_factor(body), Some(AxisMask::LOCKED));
    }

    #[test]
    fn direction_follows_the_node_orientation() {
        let (mut physics, mut scene, body, node) = rig();
        scene.get_mut(node).unwrap().transform.rotation =
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let mut queue = InputQueue::new();
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();

        assert!(direction.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn empty_queue_changes_nothing_but_still_refreshes_direction() {
        let (mut physics, scene, body, node) = rig();
        physics.set_linear_velocity(body, Vec3::new(1.0, 2.0, 3.0));
        let mut queue = InputQueue::new();
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();

        assert_eq!(
            physics.linear_velocity(body),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(direction, WORLD_FORWARD);
    }

    #[test]
    fn queue_is_empty_after_resolve() {
        let (mut physics, scene, body, node) = rig();
        let mut queue = queue_of(&[DirectionToken::Forward, DirectionToken::TurnRight]);
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        resolve_motion(
            &mut queue, &mut direction, &config, &mut physics, body, &scene, node,
        )
        .unwrap();

        assert!(queue.is_empty());
    }

    #[test]
    fn missing_body_is_reported() {
        let (_donor, scene, body, node) = rig();
        let mut other = PhysicsWorld::new(Vec3::ZERO);
        let mut queue = queue_of(&[DirectionToken::Forward]);
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        let err = resolve_motion(
            &mut queue, &mut direction, &config, &mut other, body, &scene, node,
        )
        .unwrap_err();
        assert!(matches!(err, FrameError::MissingBody(_)));
    }

    #[test]
    fn missing_node_is_reported() {
        let (mut physics, _scene, body, _node) = rig();
        let mut empty_scene = Scene::new();
        let mut queue = InputQueue::new();
        let mut direction = WORLD_FORWARD;
        let config = MotionConfig::default();

        let err = resolve_motion(
            &mut queue,
            &mut direction,
            &config,
            &mut physics,
            body,
            &empty_scene,
            NodeId(7),
        )
        .unwrap_err();
        assert!(matches!(err, FrameError::MissingNode(_)));

        let mut camera = FollowCamera::default();
        let err =
            sync_transforms(&physics, body, &mut empty_scene, NodeId(7), &mut camera).unwrap_err();
        assert!(matches!(err, FrameError::MissingNode(_)));
    }

    #[test]
    fn sync_copies_pose_and_aims_camera() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let body = physics.add_dynamic_ball(
            Vec3::new(1.0, 2.0, 3.0),
            1.0,
            1.0,
            0.0,
            AxisMask::YAW_ONLY,
        );
        let mut scene = Scene::new();
        let node = scene.insert(SceneNode::new("hull"));
        let mut camera = FollowCamera::default();

        sync_transforms(&physics, body, &mut scene, node, &mut camera).unwrap();

        let t = &scene.get(node).unwrap().transform;
        assert!(t.position.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
        assert_eq!(t.rotation, physics.orientation(body).unwrap());
        assert_eq!(camera.target, t.position);
        assert!(camera
            .eye
            .abs_diff_eq(t.position + camera.offset, 1e-5));
    }
}
