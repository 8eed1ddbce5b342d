//! Rigid body types for the platformer physics step

use crate::collision::{should_collide, BroadPhase, CollisionGroup, ContactSides, Obstacle};
use crate::dispatch::CollisionDispatcher;
use crate::world::PhysicsConfig;
use platformer_math::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

// Define generational key type for bodies
new_key_type! {
    /// Key to a body in the physics world
    ///
    /// Uses generational indexing: once a body is removed and its slot
    /// reused, old keys return None instead of pointing at the new body.
    pub struct BodyKey;
}

/// How a body takes part in the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    /// Never moves; the only kind of obstacle a body can stand on
    #[default]
    Static,
    /// Integrates gravity and resolves collisions every tick
    Dynamic,
    /// Moves by its velocity, ignores gravity and never resolves collisions
    Kinematic,
}

/// Per-update inputs shared by every body in a tick
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    /// Key of the body being updated
    pub key: BodyKey,
    pub config: &'a PhysicsConfig,
}

/// An axis-aligned rectangular body
///
/// `T` is an opaque handle to the owning game entity. Physics copies it into
/// contact notifications and never looks inside.
#[derive(Clone, Debug)]
pub struct Body<T> {
    /// Bottom-left anchored bounds in world coordinates
    pub bounds: Rect,
    velocity: Vec2,
    /// Fraction of x velocity reflected on side contact
    pub restitution_x: f32,
    /// Fraction of y velocity reflected on floor/ceiling contact
    pub restitution_y: f32,
    gravity_scale: f32,
    /// Per-second horizontal velocity decay factor
    pub x_damping: f32,
    body_type: BodyType,
    pub collision_group: CollisionGroup,
    on_ground: bool,
    contacts: ContactSides,
    to_destroy: bool,
    user_data: T,
}

impl<T: Copy> Body<T> {
    /// Create a body with the given bounds and type
    ///
    /// # Panics
    /// If the bounds have a negative or non-finite dimension.
    pub fn new(bounds: Rect, body_type: BodyType, user_data: T) -> Self {
        assert!(bounds.is_well_formed(), "body bounds are malformed: {:?}", bounds);
        Self {
            bounds,
            velocity: Vec2::ZERO,
            restitution_x: 0.0,
            restitution_y: 0.0,
            gravity_scale: 1.0,
            x_damping: 0.0,
            body_type,
            collision_group: CollisionGroup::All,
            on_ground: false,
            contacts: ContactSides::empty(),
            to_destroy: false,
            user_data,
        }
    }

    pub fn new_dynamic(bounds: Rect, user_data: T) -> Self {
        Self::new(bounds, BodyType::Dynamic, user_data)
    }

    /// Create a static body that doesn't move
    pub fn new_static(bounds: Rect, user_data: T) -> Self {
        Self::new(bounds, BodyType::Static, user_data)
    }

    pub fn new_kinematic(bounds: Rect, user_data: T) -> Self {
        Self::new(bounds, BodyType::Kinematic, user_data)
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the per-axis restitution (negative values become 0)
    pub fn with_restitution(mut self, x: f32, y: f32) -> Self {
        self.restitution_x = x.max(0.0);
        self.restitution_y = y.max(0.0);
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_x_damping(mut self, x_damping: f32) -> Self {
        self.x_damping = x_damping;
        self
    }

    pub fn with_group(mut self, group: CollisionGroup) -> Self {
        self.collision_group = group;
        self
    }

    /// Center of the body
    pub fn position(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Move the body so its center lands on `position`
    pub fn set_transform(&mut self, position: Vec2) {
        self.bounds.set_center(position);
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Add to the velocity; position changes on the next update
    pub fn apply_impulse(&mut self, dx: f32, dy: f32) {
        self.velocity += Vec2::new(dx, dy);
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn set_gravity_scale(&mut self, gravity_scale: f32) {
        self.gravity_scale = gravity_scale;
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    pub fn is_kinematic(&self) -> bool {
        self.body_type == BodyType::Kinematic
    }

    /// True if the last update left this body resting on static geometry
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Sides touched during the last update
    pub fn contacts(&self) -> ContactSides {
        self.contacts
    }

    /// Mark the body for removal
    ///
    /// A destroyed body stops updating and is ignored by every collision
    /// test. It stays in the world until the world purges it.
    pub fn destroy(&mut self) {
        self.to_destroy = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.to_destroy
    }

    pub fn user_data(&self) -> T {
        self.user_data
    }

    /// Snapshot of this body as an obstacle for other bodies' updates
    pub fn as_obstacle(&self, key: BodyKey) -> Obstacle<T> {
        Obstacle {
            key,
            bounds: self.bounds,
            body_type: self.body_type,
            group: self.collision_group,
            destroyed: self.to_destroy,
            user_data: self.user_data,
        }
    }

    /// Advance this body by one tick
    ///
    /// Only dynamic bodies integrate and collide. `obstacles` must reflect
    /// every body in the world as it stands right now, this one included.
    ///
    /// # Panics
    /// If `delta` is negative or non-finite, or the body's velocity or
    /// bounds are not finite.
    pub fn update<B, D>(&mut self, delta: f32, ctx: &StepContext<'_>, obstacles: &B, dispatcher: &mut D)
    where
        B: BroadPhase<T>,
        D: CollisionDispatcher<T>,
    {
        if self.to_destroy {
            return;
        }
        assert!(
            delta.is_finite() && delta >= 0.0,
            "physics delta must be finite and non-negative, got {}",
            delta
        );

        match self.body_type {
            BodyType::Static => return,
            BodyType::Kinematic => {
                self.bounds = self.bounds.translated(self.velocity * delta);
                return;
            }
            BodyType::Dynamic => {}
        }
        assert!(self.velocity.is_finite(), "body velocity is not finite: {:?}", self.velocity);
        assert!(self.bounds.is_well_formed(), "body bounds are malformed: {:?}", self.bounds);

        self.on_ground = false;
        self.contacts = ContactSides::empty();

        self.integrate(delta, ctx.config.gravity);
        let displacement = self.velocity * delta;

        let offset = self.wrap_offset(ctx.config.world_width);
        self.bounds.x += offset;

        let origin = self.bounds.position();
        let target = origin + displacement;
        let threshold = ctx.config.vertical_first_speed;

        let mut y = target.y;
        if self.velocity.y.abs() > threshold {
            self.bounds.y = y;
            self.solve_vertical(origin.y, ctx, obstacles, dispatcher);
            y = self.bounds.y;
        }

        self.bounds.x = target.x;
        self.solve_horizontal(origin.x, ctx, obstacles, dispatcher);

        // Checked again: the first vertical pass may have stopped the body
        if self.velocity.y.abs() <= threshold {
            self.bounds.y = y;
            self.solve_vertical(origin.y, ctx, obstacles, dispatcher);
        }

        self.bounds.x -= offset;
    }

    /// Damping first, then gravity
    fn integrate(&mut self, delta: f32, gravity: Vec2) {
        self.velocity.x -= self.x_damping * delta * self.velocity.x;
        self.velocity += gravity * self.gravity_scale * delta;
    }

    /// X shift that moves a body crossing a world edge to the opposite side
    fn wrap_offset(&self, world_width: f32) -> f32 {
        if self.bounds.right() > world_width && self.velocity.x > 0.0 {
            -world_width
        } else if self.bounds.x < 0.0 && self.velocity.x < 0.0 {
            world_width
        } else {
            0.0
        }
    }

    fn solve_vertical<B, D>(&mut self, origin_y: f32, ctx: &StepContext<'_>, obstacles: &B, dispatcher: &mut D)
    where
        B: BroadPhase<T>,
        D: CollisionDispatcher<T>,
    {
        let rising = self.velocity.y > 0.0;
        let height = self.bounds.height;
        let separation = ctx.config.separation;
        let propose = move |other: &Rect| {
            if rising {
                other.y - height - separation
            } else {
                other.top() + separation
            }
        };

        let me = self.as_obstacle(ctx.key);
        let Some(y) = closest_proposal(obstacles, &me, origin_y, propose) else {
            return;
        };

        self.bounds.y = y;
        self.velocity.y *= -self.restitution_y;
        let resting = self.velocity.y <= 0.0;
        log::trace!("body {:?} resolved vertically to y={} (rising: {})", ctx.key, y, rising);

        let slop = contact_slop(separation, y);
        for other in obstacles.overlapping(me.bounds) {
            if !should_collide(&me, other) || (propose(&other.bounds) - y).abs() > slop {
                continue;
            }
            if rising {
                self.contacts |= ContactSides::TOP;
                dispatcher.on_jumped_under(me.contactant(), other.contactant());
            } else {
                self.contacts |= ContactSides::BOTTOM;
                if other.is_static() && resting {
                    self.on_ground = true;
                }
                dispatcher.on_landed_on(me.contactant(), other.contactant());
            }
        }
    }

    fn solve_horizontal<B, D>(&mut self, origin_x: f32, ctx: &StepContext<'_>, obstacles: &B, dispatcher: &mut D)
    where
        B: BroadPhase<T>,
        D: CollisionDispatcher<T>,
    {
        if self.velocity.x == 0.0 {
            return;
        }
        let moving_left = self.velocity.x < 0.0;
        let width = self.bounds.width;
        let separation = ctx.config.separation;
        let propose = move |other: &Rect| {
            if moving_left {
                other.right() + separation
            } else {
                other.x - width - separation
            }
        };

        let me = self.as_obstacle(ctx.key);
        let Some(x) = closest_proposal(obstacles, &me, origin_x, propose) else {
            return;
        };

        self.bounds.x = x;
        self.velocity.x *= -self.restitution_x;
        log::trace!("body {:?} resolved horizontally to x={}", ctx.key, x);

        let side = if moving_left { ContactSides::LEFT } else { ContactSides::RIGHT };
        let slop = contact_slop(separation, x);
        for other in obstacles.overlapping(me.bounds) {
            if !should_collide(&me, other) || (propose(&other.bounds) - x).abs() > slop {
                continue;
            }
            self.contacts |= side;
            dispatcher.on_touch_side(me.contactant(), other.contactant());
        }
    }
}

/// Least-displacement choice among the corrections proposed by every
/// eligible obstacle overlapping `me`
///
/// Distance is measured from `origin`, the coordinate before this tick's
/// move. Equal distances fall back to the smaller coordinate so the result
/// never depends on obstacle order.
fn closest_proposal<T, B>(
    obstacles: &B,
    me: &Obstacle<T>,
    origin: f32,
    propose: impl Fn(&Rect) -> f32,
) -> Option<f32>
where
    T: Copy,
    B: BroadPhase<T>,
{
    obstacles
        .overlapping(me.bounds)
        .filter(|other| should_collide(me, other))
        .map(|other| propose(&other.bounds))
        .min_by(|&a, &b| {
            (origin - a)
                .abs()
                .total_cmp(&(origin - b).abs())
                .then_with(|| a.total_cmp(&b))
        })
}

/// Obstacles whose proposal lies this close to the chosen coordinate count
/// as touched
fn contact_slop(separation: f32, coordinate: f32) -> f32 {
    (separation * 0.5).max(coordinate.abs().max(1.0) * f32::EPSILON * 4.0)
}
