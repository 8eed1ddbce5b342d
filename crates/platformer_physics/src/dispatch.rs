//! Collision event dispatch
//!
//! Bodies report contacts to gameplay code through [`CollisionDispatcher`].
//! Notifications are fire-and-forget: the physics step never reads anything
//! back except the list of bodies the dispatcher wants destroyed.

use crate::body::BodyKey;

/// One party of a contact: the body key and its opaque user data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contactant<T> {
    pub key: BodyKey,
    pub user_data: T,
}

/// Receives contact notifications during a physics step
///
/// `mover` is always the body being updated, `other` the obstacle it was
/// resolved against. Only obstacles whose correction matches the chosen
/// position are reported; overlapped obstacles behind the chosen one get no
/// event. All methods default to doing nothing.
pub trait CollisionDispatcher<T> {
    /// The mover hit the left or right side of `other`
    fn on_touch_side(&mut self, _mover: Contactant<T>, _other: Contactant<T>) {}

    /// The mover came down on top of `other`
    fn on_landed_on(&mut self, _mover: Contactant<T>, _other: Contactant<T>) {}

    /// The mover hit the underside of `other` while rising
    fn on_jumped_under(&mut self, _mover: Contactant<T>, _other: Contactant<T>) {}

    /// Bodies to mark destroyed before the next body in the tick is updated
    ///
    /// Called by the world after every body update.
    fn take_removals(&mut self) -> Vec<BodyKey> {
        Vec::new()
    }
}

/// Dispatcher that ignores every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDispatcher;

impl<T> CollisionDispatcher<T> for NoopDispatcher {}

/// Kind of contact reported to a dispatcher
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactKind {
    TouchSide,
    LandedOn,
    JumpedUnder,
}

/// A recorded contact notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEvent<T> {
    pub kind: ContactKind,
    pub mover: Contactant<T>,
    pub other: Contactant<T>,
}

/// Dispatcher that records every event in the order it was raised
#[derive(Clone, Debug)]
pub struct ContactLog<T> {
    events: Vec<ContactEvent<T>>,
    pending_removals: Vec<BodyKey>,
}

impl<T> Default for ContactLog<T> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            pending_removals: Vec::new(),
        }
    }
}

impl<T: Copy> ContactLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far
    pub fn events(&self) -> &[ContactEvent<T>] {
        &self.events
    }

    /// Events of one kind, in order
    pub fn of_kind(&self, kind: ContactKind) -> impl Iterator<Item = &ContactEvent<T>> + '_ {
        self.events.iter().filter(move |event| event.kind == kind)
    }

    /// Drop all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Ask the world to destroy `key` after the current body update
    pub fn queue_removal(&mut self, key: BodyKey) {
        self.pending_removals.push(key);
    }

    fn record(&mut self, kind: ContactKind, mover: Contactant<T>, other: Contactant<T>) {
        self.events.push(ContactEvent { kind, mover, other });
    }
}

impl<T: Copy> CollisionDispatcher<T> for ContactLog<T> {
    fn on_touch_side(&mut self, mover: Contactant<T>, other: Contactant<T>) {
        self.record(ContactKind::TouchSide, mover, other);
    }

    fn on_landed_on(&mut self, mover: Contactant<T>, other: Contactant<T>) {
        self.record(ContactKind::LandedOn, mover, other);
    }

    fn on_jumped_under(&mut self, mover: Contactant<T>, other: Contactant<T>) {
        self.record(ContactKind::JumpedUnder, mover, other);
    }

    fn take_removals(&mut self) -> Vec<BodyKey> {
        std::mem::take(&mut self.pending_removals)
    }
}
