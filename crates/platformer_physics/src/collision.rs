//! Collision filtering and broad-phase queries
//!
//! Provides the collision-group filter that decides whether two bodies are
//! eligible to collide, the side flags recorded on contact, and the
//! broad-phase seam used by the per-body update to find overlap candidates.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::body::{BodyKey, BodyType};
use crate::dispatch::Contactant;
use platformer_math::Rect;

/// Collision group a body belongs to
///
/// Groups suppress collision pairs independently of geometric overlap:
/// - `All` collides with everything that is willing to collide with it
/// - `None` blocks nobody and is only stopped by static geometry
/// - bodies sharing any other group never collide with each other
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionGroup {
    #[default]
    All,
    None,
    Player,
    Enemy,
    Projectile,
    Pickup,
    /// Game-defined group
    Custom(u16),
}

bitflags! {
    /// Sides of a body that touched an obstacle during its last update
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ContactSides: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        /// Head hit the underside of something while rising
        const TOP = 1 << 2;
        /// Landed on top of something
        const BOTTOM = 1 << 3;
    }
}

/// Read-only view of a body as seen by another body's update
///
/// The world builds one of these per body right before each update, so a
/// mover never aliases the storage of the bodies it collides against.
#[derive(Clone, Copy, Debug)]
pub struct Obstacle<T> {
    pub key: BodyKey,
    pub bounds: Rect,
    pub body_type: BodyType,
    pub group: CollisionGroup,
    pub destroyed: bool,
    pub user_data: T,
}

impl<T: Copy> Obstacle<T> {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Identity handed to the collision dispatcher
    #[inline]
    pub fn contactant(&self) -> Contactant<T> {
        Contactant {
            key: self.key,
            user_data: self.user_data,
        }
    }
}

/// Check whether `mover` should be resolved against `other`
///
/// The relation is not symmetric: a `None`-group mover is still stopped by
/// static geometry, but nothing is ever stopped by a `None`-group obstacle.
pub fn should_collide<T: Copy>(mover: &Obstacle<T>, other: &Obstacle<T>) -> bool {
    if mover.destroyed || other.destroyed {
        return false;
    }
    if mover.key == other.key {
        return false;
    }
    if other.group == CollisionGroup::None {
        return false;
    }
    if other.group != CollisionGroup::All && other.group == mover.group {
        return false;
    }
    if mover.group == CollisionGroup::None && !other.is_static() {
        return false;
    }
    true
}

/// Broad-phase query over the obstacles visible to one update
pub trait BroadPhase<T> {
    /// Every obstacle whose bounds strictly overlap `area`
    ///
    /// Implementations may return obstacles in any order; resolution does
    /// not depend on it.
    fn overlapping<'a>(&'a self, area: Rect) -> impl Iterator<Item = &'a Obstacle<T>> + 'a
    where
        T: 'a;
}

/// Brute-force broad phase: scans every obstacle on each query
#[derive(Clone, Copy, Debug)]
pub struct LinearScan<'a, T> {
    obstacles: &'a [Obstacle<T>],
}

impl<'a, T> LinearScan<'a, T> {
    pub fn new(obstacles: &'a [Obstacle<T>]) -> Self {
        Self { obstacles }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl<T> BroadPhase<T> for LinearScan<'_, T> {
    fn overlapping<'a>(&'a self, area: Rect) -> impl Iterator<Item = &'a Obstacle<T>> + 'a
    where
        T: 'a,
    {
        self.obstacles
            .iter()
            .filter(move |obstacle| obstacle.bounds.overlaps(&area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<BodyKey> {
        let mut map: SlotMap<BodyKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn obstacle(key: BodyKey, body_type: BodyType, group: CollisionGroup) -> Obstacle<u32> {
        Obstacle {
            key,
            bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
            body_type,
            group,
            destroyed: false,
            user_data: 0,
        }
    }

    #[test]
    fn test_default_group_is_all() {
        assert_eq!(CollisionGroup::default(), CollisionGroup::All);
    }

    #[test]
    fn test_all_groups_collide() {
        let k = keys(2);
        let a = obstacle(k[0], BodyType::Dynamic, CollisionGroup::All);
        let b = obstacle(k[1], BodyType::Dynamic, CollisionGroup::All);
        assert!(should_collide(&a, &b));
    }

    #[test]
    fn test_never_collides_with_self() {
        let k = keys(1);
        let a = obstacle(k[0], BodyType::Dynamic, CollisionGroup::All);
        assert!(!should_collide(&a, &a));
    }

    #[test]
    fn test_destroyed_bodies_are_inert() {
        let k = keys(2);
        let a = obstacle(k[0], BodyType::Dynamic, CollisionGroup::All);
        let mut b = obstacle(k[1], BodyType::Static, CollisionGroup::All);
        b.destroyed = true;
        assert!(!should_collide(&a, &b));
        assert!(!should_collide(&b, &a));
    }

    #[test]
    fn test_same_named_group_excluded() {
        let k = keys(2);
        let a = obstacle(k[0], BodyType::Dynamic, CollisionGroup::Enemy);
        let b = obstacle(k[1], BodyType::Dynamic, CollisionGroup::Enemy);
        assert!(!should_collide(&a, &b));

        let c = obstacle(k[1], BodyType::Dynamic, CollisionGroup::Player);
        assert!(should_collide(&a, &c));
    }

    #[test]
    fn test_custom_groups_compare_by_id() {
        let k = keys(2);
        let a = obstacle(k[0], BodyType::Dynamic, CollisionGroup::Custom(7));
        let same = obstacle(k[1], BodyType::Dynamic, CollisionGroup::Custom(7));
        let other = obstacle(k[1], BodyType::Dynamic, CollisionGroup::Custom(8));
        assert!(!should_collide(&a, &same));
        assert!(should_collide(&a, &other));
    }

    #[test]
    fn test_none_obstacle_blocks_nobody() {
        let k = keys(2);
        let a = obstacle(k[0], BodyType::Dynamic, CollisionGroup::All);
        let b = obstacle(k[1], BodyType::Static, CollisionGroup::None);
        assert!(!should_collide(&a, &b));
    }

    #[test]
    fn test_none_mover_only_hits_static() {
        let k = keys(2);
        let a = obstacle(k[0], BodyType::Dynamic, CollisionGroup::None);
        let wall = obstacle(k[1], BodyType::Static, CollisionGroup::All);
        let crate_box = obstacle(k[1], BodyType::Dynamic, CollisionGroup::All);
        let platform = obstacle(k[1], BodyType::Kinematic, CollisionGroup::All);
        assert!(should_collide(&a, &wall));
        assert!(!should_collide(&a, &crate_box));
        assert!(!should_collide(&a, &platform));
    }

    #[test]
    fn test_linear_scan_filters_by_overlap() {
        let k = keys(3);
        let mut near = obstacle(k[0], BodyType::Static, CollisionGroup::All);
        near.bounds = Rect::new(0.5, 0.5, 1.0, 1.0);
        let mut far = obstacle(k[1], BodyType::Static, CollisionGroup::All);
        far.bounds = Rect::new(10.0, 0.0, 1.0, 1.0);
        let mut edge = obstacle(k[2], BodyType::Static, CollisionGroup::All);
        edge.bounds = Rect::new(1.0, 0.0, 1.0, 1.0);

        let list = [near, far, edge];
        let scan = LinearScan::new(&list);
        assert_eq!(scan.len(), 3);

        let hits: Vec<BodyKey> = scan
            .overlapping(Rect::new(0.0, 0.0, 1.0, 1.0))
            .map(|o| o.key)
            .collect();
        assert_eq!(hits, vec![k[0]]);
    }

    #[test]
    fn test_contact_sides_flags() {
        let mut sides = ContactSides::empty();
        sides |= ContactSides::LEFT | ContactSides::BOTTOM;
        assert!(sides.contains(ContactSides::BOTTOM));
        assert!(!sides.intersects(ContactSides::TOP | ContactSides::RIGHT));
    }
}
