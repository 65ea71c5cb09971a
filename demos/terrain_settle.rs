//! Terrain Settling Demo
//!
//! Drops a mix of spheres and boxes onto rolling terrain and prints their
//! state once per simulated second. Bodies bounce, lose energy to the
//! inelastic terrain response, and come to rest on the surface.
//!
//! Run with:
//!   cargo run --example terrain_settle --features std

use nalgebra::Vector3;
use world_physics::perfcounter::TickCounter;
use world_physics::{Collider, PhysicsWorld, RigidBody};

const DT: f64 = 1.0 / 60.0;
const SECONDS: usize = 10;

fn terrain_height(x: f64, z: f64) -> f64 {
    2.0 + (x * 0.3).sin() * 1.5 + (z * 0.3).cos() * 1.5
}

fn main() {
    let mut world = PhysicsWorld::<16>::new();

    let mut ids = Vec::new();
    for i in 0..6 {
        let x = i as f64 * 2.0 - 5.0;
        let body = if i % 2 == 0 {
            RigidBody::new(1.0)
                .with_position(Vector3::new(x, 15.0 + i as f64, x * 0.5))
                .with_collider(Collider::Sphere { radius: 0.5 })
        } else {
            RigidBody::new(2.0)
                .with_position(Vector3::new(x, 15.0 + i as f64, -x * 0.5))
                .with_collider(Collider::Aabb {
                    half_extents: Vector3::new(0.5, 0.5, 0.5),
                })
        };
        ids.push(world.add_body(body).expect("world capacity"));
    }

    let mut counter = TickCounter::new();

    for tick in 0..(SECONDS * 60) {
        counter.start_of_tick();
        world.update::<32>(Some(&terrain_height), DT);
        counter.add_measurement("update");
        counter.finish_tick();

        if tick % 60 == 59 {
            println!("t = {:>2}s", (tick + 1) / 60);
            for &id in &ids {
                let body = world.body(id).unwrap();
                println!(
                    "  {:?}  pos ({:6.2}, {:6.2}, {:6.2})  speed {:5.2}",
                    id, body.position.x, body.position.y, body.position.z,
                    body.speed()
                );
            }
        }
    }

    println!("\nlast tick timing:\n{}", counter.report());
}
