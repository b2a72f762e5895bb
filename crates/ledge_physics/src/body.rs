//! Explicit Euler integration of sprite motion

use ledge_core::{Contacts, Sprite};

use crate::{PhysicsConfig, Resolution};

/// Advance a sprite's velocity and hitbox by `dt` seconds
pub fn integrate(sprite: &mut Sprite, config: &PhysicsConfig, dt: f32) {
    let mut acceleration = sprite.acceleration;
    if sprite.gravity {
        acceleration += config.gravity();
    }
    sprite.velocity += acceleration * dt;
    sprite.velocity.y = sprite.velocity.y.max(-config.max_fall_speed);
    sprite.hitbox.translate(sprite.velocity * dt);
}

/// Apply a resolution to a sprite: move it, stop motion into each surface
/// it was pushed out of, and record which surfaces it touched.
///
/// Pushes are replayed one at a time, in the order the resolver applied
/// them, so the hitbox ends exactly where the resolver tested it.
pub fn apply_resolution(sprite: &mut Sprite, resolution: &Resolution) {
    let mut contacts = Contacts::default();
    for contact in &resolution.contacts {
        let push = contact.displacement;
        sprite.hitbox.translate(push);
        if push.y > 0.0 {
            contacts.ground = true;
            sprite.velocity.y = sprite.velocity.y.max(0.0);
        } else if push.y < 0.0 {
            contacts.ceiling = true;
            sprite.velocity.y = sprite.velocity.y.min(0.0);
        }
        if push.x > 0.0 {
            contacts.wall_left = true;
            sprite.velocity.x = sprite.velocity.x.max(0.0);
        } else if push.x < 0.0 {
            contacts.wall_right = true;
            sprite.velocity.x = sprite.velocity.x.min(0.0);
        }
    }
    sprite.contacts = contacts;
}
