//! The simulation world: body storage, contact generation, and the
//! impulse-based collision response.

use nalgebra::Vector3;

use crate::body::{BodyType, RigidBody};
use crate::collision;
use crate::terrain::TerrainHeight;

/// Restitution applied to every contact (0 = inelastic, 1 = elastic).
const RESTITUTION: f64 = 0.2;
/// Fraction of the penetration corrected per resolution pass.
const CORRECTION_PERCENT: f64 = 0.2;
/// Penetrations at or below this depth are left to the impulse response.
const CORRECTION_SLOP: f64 = 0.01;

/// Default downward gravity along the y axis, in m/s².
pub const DEFAULT_GRAVITY: f64 = -9.81;

/// Unique identifier for a rigid body within a [`PhysicsWorld`].
///
/// Ids stay valid for the lifetime of the world: removing a body
/// deactivates its slot instead of shifting the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyId(usize);

/// A detected contact between two bodies.
///
/// Contacts are recomputed from scratch every detection pass and discarded
/// after resolution; nothing persists across ticks.
#[derive(Debug, Clone)]
pub struct Contact {
    /// ID of the first body.
    pub body_a: BodyId,
    /// ID of the second body.
    pub body_b: BodyId,
    /// Unit contact normal. For same-shape pairs it points from body A
    /// toward body B; mixed box/sphere pairs use the box-first convention
    /// of [`collision::collide`].
    pub normal: Vector3<f64>,
    /// Penetration depth (≥ 0 for every reported contact).
    pub penetration: f64,
}

/// The physics simulation world.
///
/// Owns a fixed-capacity set of rigid bodies and advances them tick by
/// tick. A tick is synchronous and single-threaded: [`update`] runs to
/// completion with exclusive ownership of the body set and performs no
/// locking of its own.
///
/// # Type Parameters
/// * `N` - Maximum number of bodies (compile-time capacity).
///
/// # Example
/// ```
/// use world_physics::{Collider, PhysicsWorld, RigidBody};
/// use nalgebra::Vector3;
///
/// let mut world = PhysicsWorld::<8>::new();
///
/// let ball = RigidBody::new(2.0)
///     .with_position(Vector3::new(0.0, 5.0, 0.0))
///     .with_collider(Collider::Sphere { radius: 0.5 });
/// let id = world.add_body(ball).unwrap();
///
/// world.update::<8>(None, 1.0 / 60.0);
/// assert!(world.body(id).unwrap().position.y < 5.0);
/// ```
///
/// [`update`]: PhysicsWorld::update
pub struct PhysicsWorld<const N: usize> {
    bodies: heapless::Vec<RigidBody, N>,
    /// Scalar gravity along the y axis, applied as a force during
    /// integration.
    gravity: f64,
}

impl<const N: usize> Default for PhysicsWorld<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PhysicsWorld<N> {
    /// Create a new physics world with the default gravity of −9.81 m/s².
    pub fn new() -> Self {
        Self {
            bodies: heapless::Vec::new(),
            gravity: DEFAULT_GRAVITY,
        }
    }

    /// Set the scalar y-axis gravity (e.g. `-9.81`, or `0.0` to disable).
    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
    }

    /// Returns the current gravity.
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Add a body to the world. Returns its [`BodyId`], or `None` if at
    /// capacity.
    pub fn add_body(&mut self, body: RigidBody) -> Option<BodyId> {
        let id = BodyId(self.bodies.len());
        self.bodies.push(body).ok()?;
        Some(id)
    }

    /// Get an immutable reference to a body by its ID.
    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id.0)
    }

    /// Get a mutable reference to a body by its ID.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id.0)
    }

    /// Returns the total number of bodies in the world (including inactive).
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of active bodies in the world.
    pub fn active_body_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.active).count()
    }

    /// Deactivate a body, effectively removing it from the simulation.
    ///
    /// The body remains in the world (its slot is preserved) but it is
    /// skipped during integration, terrain clipping, and collision
    /// detection. This avoids invalidating existing [`BodyId`]s.
    ///
    /// Returns `true` if the body was found and deactivated, `false` if the
    /// ID was out of bounds or the body was already inactive.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        if let Some(body) = self.bodies.get_mut(id.0) {
            if body.active {
                body.active = false;
                body.velocity = Vector3::zeros();
                body.clear_accumulated_force();
                return true;
            }
        }
        false
    }

    /// Set whether a body is active.
    ///
    /// Returns `true` if the body exists, `false` otherwise.
    pub fn set_active(&mut self, id: BodyId, active: bool) -> bool {
        if let Some(body) = self.bodies.get_mut(id.0) {
            body.active = active;
            true
        } else {
            false
        }
    }

    /// Iterate over all bodies immutably.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Iterate over all bodies mutably.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut RigidBody)> {
        self.bodies
            .iter_mut()
            .enumerate()
            .map(|(i, b)| (BodyId(i), b))
    }

    /// Detect all collisions between active bodies.
    ///
    /// Returns contacts in a fixed-capacity buffer. The `C` const generic
    /// sets the maximum number of contacts per detection pass; for `N`
    /// bodies the worst case is `N*(N-1)/2` pairs, so choose `C`
    /// accordingly. Overflowing contacts are dropped with a logged warning.
    ///
    /// Pair enumeration is O(n²) with no broad phase. Static/static pairs
    /// are skipped outright: they can never produce an actionable contact.
    pub fn detect_collisions<const C: usize>(&self) -> heapless::Vec<Contact, C> {
        let mut contacts = heapless::Vec::new();
        let len = self.bodies.len();

        for i in 0..len {
            let body_a = &self.bodies[i];
            if !body_a.active {
                continue;
            }

            for j in (i + 1)..len {
                let body_b = &self.bodies[j];
                if !body_b.active {
                    continue;
                }

                if body_a.body_type == BodyType::Static && body_b.body_type == BodyType::Static {
                    continue;
                }

                if let Some((normal, penetration)) = collision::collide(
                    &body_a.position,
                    &body_a.collider,
                    &body_b.position,
                    &body_b.collider,
                ) {
                    let contact = Contact {
                        body_a: BodyId(i),
                        body_b: BodyId(j),
                        normal,
                        penetration,
                    };
                    if contacts.push(contact).is_err() {
                        log::warn!("contact buffer full ({} slots), dropping contact {}-{}", C, i, j);
                    }
                }
            }
        }

        contacts
    }

    /// Resolve contacts by applying an impulse along each contact normal,
    /// plus a positional correction that pushes overlapping bodies apart.
    ///
    /// A contact whose bodies are already separating (relative velocity
    /// along the normal is positive) is skipped whole. Static bodies are
    /// never moved: their zero inverse mass routes the entire impulse and
    /// correction to the other body.
    pub fn resolve_contacts(&mut self, contacts: &[Contact]) {
        for contact in contacts {
            let a = contact.body_a.0;
            let b = contact.body_b.0;

            let inv_mass_a = self.bodies[a].inv_mass;
            let inv_mass_b = self.bodies[b].inv_mass;
            let inv_mass_sum = inv_mass_a + inv_mass_b;
            if inv_mass_sum == 0.0 {
                continue; // Both static
            }

            let relative_vel = self.bodies[b].velocity - self.bodies[a].velocity;
            let vel_along_normal = relative_vel.dot(&contact.normal);

            // Separating already — leave the pair alone
            if vel_along_normal > 0.0 {
                continue;
            }

            let j = -(1.0 + RESTITUTION) * vel_along_normal / inv_mass_sum;
            let impulse = contact.normal * j;
            self.bodies[a].velocity -= impulse * inv_mass_a;
            self.bodies[b].velocity += impulse * inv_mass_b;

            // De-penetrate, split in proportion to inverse mass so the
            // lighter body is pushed further
            if contact.penetration > CORRECTION_SLOP {
                let correction = contact.penetration * CORRECTION_PERCENT;
                let correction_a = correction * inv_mass_a / inv_mass_sum;
                let correction_b = correction * inv_mass_b / inv_mass_sum;
                self.bodies[a].position -= contact.normal * correction_a;
                self.bodies[b].position += contact.normal * correction_b;
            }
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// One tick: integrate every active dynamic body, clip dynamic bodies
    /// against the terrain when a height query is supplied, then detect and
    /// resolve collisions. The `C` const generic bounds the number of
    /// contacts considered per tick.
    pub fn update<const C: usize>(&mut self, terrain: Option<&dyn TerrainHeight>, dt: f64) {
        let gravity = self.gravity;
        for body in self.bodies.iter_mut() {
            if body.active {
                body.integrate(dt, gravity);
            }
        }

        if let Some(terrain) = terrain {
            for body in self.bodies.iter_mut() {
                if body.active {
                    body.clip_to_terrain(terrain);
                }
            }
        }

        let contacts = self.detect_collisions::<C>();
        self.resolve_contacts(&contacts);
    }
}
