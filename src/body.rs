//! Rigid body state and per-body operations.
//!
//! A [`RigidBody`] carries the linear state the collision pass works on:
//! position, velocity, an accumulated-force register, mass, and a collider
//! shape. Bodies are either [`BodyType::Dynamic`] (integrated, collided,
//! clipped to terrain) or [`BodyType::Static`] (infinite effective mass,
//! never moved by the simulation).

use nalgebra::Vector3;

use crate::terrain::TerrainHeight;

// ComplexField provides abs() for f64 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

/// Horizontal velocity retained after a terrain contact.
const TERRAIN_DRAG: f64 = 0.8;
/// Vertical bounce damping on terrain contact.
const TERRAIN_BOUNCE: f64 = 0.5;
/// Vertical speeds below this settle to zero after a terrain bounce.
const TERRAIN_REST_SPEED: f64 = 0.1;

/// Determines how a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Fully simulated: affected by forces, gravity, and collisions.
    Dynamic,
    /// Never moves and has infinite effective mass (inverse mass = 0).
    /// Useful for floors, walls, and platforms.
    Static,
}

/// A collision shape attached to a [`RigidBody`].
///
/// The collider is centered on the body's position. For AABBs the
/// half-extents define the box dimensions along each axis from the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// A sphere defined by its radius.
    Sphere { radius: f64 },
    /// An axis-aligned bounding box defined by half-extents along each axis.
    Aabb { half_extents: Vector3<f64> },
}

/// A rigid body with linear dynamics.
///
/// Bodies are owned by a [`PhysicsWorld`](crate::world::PhysicsWorld) and
/// addressed through [`BodyId`](crate::world::BodyId) handles.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Mass in kg. Only meaningful for dynamic bodies; static bodies report
    /// infinity.
    pub mass: f64,
    /// `1 / mass` for dynamic bodies, `0` for static bodies. Used to
    /// distribute impulses and positional correction.
    pub inv_mass: f64,
    pub body_type: BodyType,
    pub collider: Collider,

    /// Accumulated forces applied this tick. Cleared by [`integrate`].
    ///
    /// [`integrate`]: RigidBody::integrate
    force_accumulator: Vector3<f64>,

    /// Whether this body participates in the simulation. Inactive bodies are
    /// skipped during integration, terrain clipping, and collision
    /// detection. Set to `false` by
    /// [`PhysicsWorld::remove_body`](crate::world::PhysicsWorld::remove_body).
    pub active: bool,
}

impl RigidBody {
    /// Create a new dynamic rigid body with the given mass (in kg).
    ///
    /// The body starts at the origin, at rest, with a unit box collider
    /// (half-extents 0.5 along each axis). Use the builder methods to
    /// configure it.
    ///
    /// # Panics
    /// Panics if `mass` is not positive and finite.
    pub fn new(mass: f64) -> Self {
        assert!(
            mass > 0.0 && mass.is_finite(),
            "mass must be positive and finite"
        );
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            mass,
            inv_mass: 1.0 / mass,
            body_type: BodyType::Dynamic,
            collider: Collider::Aabb {
                half_extents: Vector3::new(0.5, 0.5, 0.5),
            },
            force_accumulator: Vector3::zeros(),
            active: true,
        }
    }

    /// Create a new static rigid body (infinite mass, unaffected by forces).
    pub fn new_static() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            mass: f64::INFINITY,
            inv_mass: 0.0,
            body_type: BodyType::Static,
            collider: Collider::Aabb {
                half_extents: Vector3::new(0.5, 0.5, 0.5),
            },
            force_accumulator: Vector3::zeros(),
            active: true,
        }
    }

    /// Builder: set initial position.
    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    /// Builder: set initial velocity.
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set the collider shape.
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = collider;
        self
    }

    /// Apply a force (in Newtons) to this body. Forces accumulate until the
    /// next [`integrate`] call. Static bodies ignore forces.
    ///
    /// [`integrate`]: RigidBody::integrate
    #[inline]
    pub fn apply_force(&mut self, force: Vector3<f64>) {
        if self.body_type == BodyType::Dynamic {
            self.force_accumulator += force;
        }
    }

    /// Apply an instantaneous impulse (change in momentum) to this body.
    /// Directly modifies velocity: `delta_v = impulse / mass`.
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vector3<f64>) {
        if self.body_type == BodyType::Dynamic {
            self.velocity += impulse * self.inv_mass;
        }
    }

    /// Returns the current speed (magnitude of velocity).
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Returns the kinetic energy of this body: `0.5 * m * v^2`.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    pub(crate) fn clear_accumulated_force(&mut self) {
        self.force_accumulator = Vector3::zeros();
    }

    /// Integrate this body forward by `dt` seconds.
    ///
    /// Gravity enters as a force along the y axis (`gravity * mass`), so it
    /// composes with whatever [`apply_force`] accumulated this tick.
    /// Velocity is updated from the net acceleration, then position from the
    /// new velocity, then the accumulator is cleared.
    ///
    /// Static bodies are skipped entirely.
    ///
    /// [`apply_force`]: RigidBody::apply_force
    pub fn integrate(&mut self, dt: f64, gravity: f64) {
        if self.body_type != BodyType::Dynamic {
            return;
        }

        self.force_accumulator.y += gravity * self.mass;

        let acceleration = self.force_accumulator * self.inv_mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        self.force_accumulator = Vector3::zeros();
    }

    /// Clip this body against the terrain surface.
    ///
    /// When the body has sunk below the terrain height at its (x, z) column,
    /// it is snapped back onto the surface with a damped inelastic bounce:
    /// horizontal velocity is scaled by `0.8`, vertical velocity is inverted
    /// and scaled by `0.5`, and a resulting vertical speed below `0.1`
    /// settles to zero so the body comes to rest instead of oscillating.
    ///
    /// Static bodies are never clipped.
    pub fn clip_to_terrain<T: TerrainHeight + ?Sized>(&mut self, terrain: &T) {
        if self.body_type != BodyType::Dynamic {
            return;
        }

        let height = terrain.height_at(self.position.x, self.position.z);
        if self.position.y < height {
            self.position.y = height;
            self.velocity.x *= TERRAIN_DRAG;
            self.velocity.z *= TERRAIN_DRAG;
            self.velocity.y = -self.velocity.y * TERRAIN_BOUNCE;
            if self.velocity.y.abs() < TERRAIN_REST_SPEED {
                self.velocity.y = 0.0;
            }
        }
    }
}
