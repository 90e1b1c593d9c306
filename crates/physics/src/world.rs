use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use skiff_common::AxisMask;

use crate::debug::{DebugLine, LineCollector};

/// Opaque handle to a rigid body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// The full rapier pipeline plus the body and collider sets, owned together
/// so callers only ever see glam vectors and [`BodyHandle`]s.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    debug_render: DebugRenderPipeline,
    debug_lines: Vec<DebugLine>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        tracing::debug!(?gravity, "creating physics world");
        Self {
            gravity: vector![gravity.x, gravity.y, gravity.z],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            debug_render: DebugRenderPipeline::new(
                DebugRenderStyle::default(),
                DebugRenderMode::COLLIDER_SHAPES,
            ),
            debug_lines: Vec::new(),
        }
    }

    /// Add an immovable box body with the given half extents.
    pub fn add_static_box(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        friction: f32,
    ) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(friction)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        tracing::debug!(?position, ?half_extents, friction, "added static box");
        BodyHandle(handle)
    }

    /// Add a gravity-affected ball body. `rotation_factor` picks which axes
    /// the solver is allowed to spin; the demo's player starts yaw-only.
    pub fn add_dynamic_ball(
        &mut self,
        position: Vec3,
        radius: f32,
        friction: f32,
        angular_damping: f32,
        rotation_factor: AxisMask,
    ) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .angular_damping(angular_damping)
            .enabled_rotations(rotation_factor.x, rotation_factor.y, rotation_factor.z)
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::ball(radius).friction(friction).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        tracing::debug!(?position, radius, friction, "added dynamic ball");
        BodyHandle(handle)
    }

    /// Advance the simulation by `dt` seconds. Non-positive dt is a no-op.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn position(&self, body: BodyHandle) -> Option<Vec3> {
        let b = self.rigid_body_set.get(body.0)?;
        let t = b.translation();
        Some(Vec3::new(t.x, t.y, t.z))
    }

    pub fn orientation(&self, body: BodyHandle) -> Option<Quat> {
        let b = self.rigid_body_set.get(body.0)?;
        let r = b.rotation();
        Some(Quat::from_xyzw(r.i, r.j, r.k, r.w))
    }

    pub fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        let b = self.rigid_body_set.get(body.0)?;
        let v = b.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    pub fn angular_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        let b = self.rigid_body_set.get(body.0)?;
        let v = b.angvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    /// Overwrite the body's linear velocity. Returns false if the handle is stale.
    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) -> bool {
        match self.rigid_body_set.get_mut(body.0) {
            Some(b) => {
                b.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
                true
            }
            None => false,
        }
    }

    /// Overwrite the body's angular velocity. Returns false if the handle is stale.
    pub fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) -> bool {
        match self.rigid_body_set.get_mut(body.0) {
            Some(b) => {
                b.set_angvel(vector![velocity.x, velocity.y, velocity.z], true);
                true
            }
            None => false,
        }
    }

    /// Enable or lock rotation per axis.
    pub fn set_rotation_factor(&mut self, body: BodyHandle, mask: AxisMask) -> bool {
        match self.rigid_body_set.get_mut(body.0) {
            Some(b) => {
                b.set_enabled_rotations(mask.x, mask.y, mask.z, true);
                true
            }
            None => false,
        }
    }

    pub fn rotation_factor(&self, body: BodyHandle) -> Option<AxisMask> {
        let b = self.rigid_body_set.get(body.0)?;
        let locked = b.locked_axes();
        Some(AxisMask {
            x: !locked.contains(LockedAxes::ROTATION_LOCKED_X),
            y: !locked.contains(LockedAxes::ROTATION_LOCKED_Y),
            z: !locked.contains(LockedAxes::ROTATION_LOCKED_Z),
        })
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Refill the debug line buffer from the current collider shapes.
    pub fn collect_debug_lines(&mut self) {
        self.debug_lines.clear();
        let mut backend = LineCollector {
            lines: &mut self.debug_lines,
        };
        self.debug_render.render(
            &mut backend,
            &self.rigid_body_set,
            &self.collider_set,
            &self.impulse_joint_set,
            &self.multibody_joint_set,
            &self.narrow_phase,
        );
    }

    pub fn clear_debug_lines(&mut self) {
        self.debug_lines.clear();
    }

    pub fn debug_lines(&self) -> &[DebugLine] {
        &self.debug_lines
    }
}
