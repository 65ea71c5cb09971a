#![no_std]
//! Rigid body collision physics for virtual world simulations.
//!
//! The owning simulation registers bodies (spheres and axis-aligned boxes,
//! dynamic or static) with a [`PhysicsWorld`], then calls
//! [`PhysicsWorld::update`] once per fixed-rate tick. Each tick integrates
//! accumulated forces and gravity, clips dynamic bodies against an optional
//! terrain height field, and detects and resolves body/body contacts with an
//! impulse response plus positional de-penetration.
//!
//! Storage is fixed-capacity (`heapless`), math is `nalgebra` over `f64`,
//! and the crate is `no_std` apart from the `std`-gated tick timing
//! utilities in [`perfcounter`].
//!
//! # Example
//! ```
//! use world_physics::{Collider, PhysicsWorld, RigidBody};
//! use nalgebra::Vector3;
//!
//! let mut world = PhysicsWorld::<16>::new();
//!
//! let ball = RigidBody::new(1.0)
//!     .with_position(Vector3::new(0.0, 10.0, 0.0))
//!     .with_collider(Collider::Sphere { radius: 0.5 });
//! let id = world.add_body(ball).unwrap();
//!
//! // Flat ground at y = 0; run one simulated second at 60 Hz.
//! let ground = |_x: f64, _z: f64| 0.0;
//! for _ in 0..60 {
//!     world.update::<16>(Some(&ground), 1.0 / 60.0);
//! }
//! assert!(world.body(id).unwrap().position.y >= 0.0);
//! ```

pub mod body;
pub mod collision;
#[cfg(any(test, feature = "std"))]
pub mod perfcounter;
pub mod terrain;
pub mod world;

pub use body::{BodyType, Collider, RigidBody};
pub use terrain::TerrainHeight;
pub use world::{BodyId, Contact, PhysicsWorld};
