use glam::Vec3;
use skiff_common::{AxisMask, Transform};
use skiff_physics::{BodyHandle, PhysicsWorld};
use skiff_scene::{FollowCamera, Lighting, NodeId, Scene, SceneNode};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

const GROUND_POSITION: Vec3 = Vec3::new(0.0, -0.9, 0.0);
const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(100.0, 1.0, 100.0);
const GROUND_FRICTION: f32 = 1.0;

const WALL_POSITION: Vec3 = Vec3::new(-3.0, 1.0, 0.0);
const WALL_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 1.0, 1.0);
const WALL_FRICTION: f32 = 0.0;

const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const PLAYER_RADIUS: f32 = 1.0;
const PLAYER_FRICTION: f32 = 1.0;
const PLAYER_ANGULAR_DAMPING: f32 = 10.0;

/// Where the player mesh sits before the first sync pulls it onto the body.
const PLAYER_NODE_SPAWN: Vec3 = Vec3::new(0.0, 2.0, 0.0);
const PLAYER_MESH_SCALE: f32 = 0.3;

/// The one scene this demo ships: a flat ground plane, a frictionless wall
/// block to bump into, and the player ball with its ship mesh on top.
///
/// Physics bodies and visual nodes are built together here so their
/// constants cannot drift apart between the desktop and headless apps.
pub struct DemoScene {
    pub physics: PhysicsWorld,
    pub scene: Scene,
    pub camera: FollowCamera,
    pub lighting: Lighting,
    pub player_body: BodyHandle,
    pub player_node: NodeId,
}

impl DemoScene {
    pub fn build() -> Self {
        let mut physics = PhysicsWorld::new(GRAVITY);
        physics.add_static_box(GROUND_POSITION, GROUND_HALF_EXTENTS, GROUND_FRICTION);
        physics.add_static_box(WALL_POSITION, WALL_HALF_EXTENTS, WALL_FRICTION);
        let player_body = physics.add_dynamic_ball(
            PLAYER_SPAWN,
            PLAYER_RADIUS,
            PLAYER_FRICTION,
            PLAYER_ANGULAR_DAMPING,
            AxisMask::YAW_ONLY,
        );

        let mut scene = Scene::new();
        scene.insert(SceneNode {
            mesh: Some("floor".into()),
            texture: Some("floor".into()),
            ..SceneNode::new("floor")
        });
        scene.insert(SceneNode {
            transform: Transform {
                position: WALL_POSITION,
                scale: WALL_HALF_EXTENTS * 2.0,
                ..Default::default()
            },
            mesh: Some("wall".into()),
            texture: Some("wall".into()),
            ..SceneNode::new("wall")
        });
        let player_node = scene.insert(SceneNode {
            transform: Transform {
                position: PLAYER_NODE_SPAWN,
                scale: Vec3::splat(PLAYER_MESH_SCALE),
                ..Default::default()
            },
            mesh: Some("ship".into()),
            texture: Some("ship".into()),
            ..SceneNode::new("ship")
        });

        Self {
            physics,
            scene,
            camera: FollowCamera::default(),
            lighting: Lighting::default(),
            player_body,
            player_node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameDriver, MotionConfig, Phase};
    use skiff_input::{HeldKeys, Key};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn build_produces_three_bodies_and_three_nodes() {
        let demo = DemoScene::build();
        assert_eq!(demo.physics.body_count(), 3);
        assert_eq!(demo.scene.node_count(), 3);
        let player = demo.scene.get(demo.player_node).unwrap();
        assert_eq!(player.transform.scale, Vec3::splat(PLAYER_MESH_SCALE));
        assert_eq!(player.mesh.as_deref(), Some("ship"));
    }

    #[test]
    fn player_settles_on_the_ground() {
        let mut demo = DemoScene::build();
        let mut driver = FrameDriver::new(demo.player_body, demo.player_node, MotionConfig::default());
        let held = HeldKeys::new();
        for _ in 0..240 {
            driver
                .tick(
                    DT,
                    &held,
                    &mut demo.physics,
                    &mut demo.scene,
                    &mut demo.camera,
                    false,
                )
                .unwrap();
        }
        let pos = demo.physics.position(demo.player_body).unwrap();
        // Ground top is y = 0.1, so the unit ball rests around y = 1.1.
        assert!((0.9..=1.3).contains(&pos.y), "rested at y = {}", pos.y);
        // Node was pulled down off its spawn height onto the body.
        let node_y = demo.scene.get(demo.player_node).unwrap().transform.position.y;
        assert!((node_y - pos.y).abs() < 1e-5);
    }

    #[test]
    fn holding_forward_drives_the_player_along_z() {
        let mut demo = DemoScene::build();
        let mut driver = FrameDriver::new(demo.player_body, demo.player_node, MotionConfig::default());
        driver.dismiss_instructions();
        assert_eq!(driver.phase(), Phase::Active);
        let mut held = HeldKeys::new();
        held.press(Key::KeyW);

        for _ in 0..120 {
            driver
                .tick(
                    DT,
                    &held,
                    &mut demo.physics,
                    &mut demo.scene,
                    &mut demo.camera,
                    false,
                )
                .unwrap();
        }

        let pos = demo.physics.position(demo.player_body).unwrap();
        assert!(pos.z > 3.0, "player only reached z = {}", pos.z);
        assert!(pos.x.abs() < 0.1, "player drifted to x = {}", pos.x);
    }

    #[test]
    fn holding_a_turn_then_forward_changes_heading() {
        let mut demo = DemoScene::build();
        let mut driver = FrameDriver::new(demo.player_body, demo.player_node, MotionConfig::default());
        driver.dismiss_instructions();

        let mut held = HeldKeys::new();
        held.press(Key::KeyA);
        for _ in 0..60 {
            driver
                .tick(
                    DT,
                    &held,
                    &mut demo.physics,
                    &mut demo.scene,
                    &mut demo.camera,
                    false,
                )
                .unwrap();
        }
        held.release(Key::KeyA);
        held.press(Key::KeyW);
        let before = demo.physics.position(demo.player_body).unwrap();
        for _ in 0..120 {
            driver
                .tick(
                    DT,
                    &held,
                    &mut demo.physics,
                    &mut demo.scene,
                    &mut demo.camera,
                    false,
                )
                .unwrap();
        }
        let after = demo.physics.position(demo.player_body).unwrap();
        let moved = after - before;
        // A left turn swings the heading toward +X.
        assert!(moved.x > 0.5, "moved {:?}", moved);
    }
}
