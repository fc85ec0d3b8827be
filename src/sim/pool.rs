//! Object pooling for high-churn entities
//!
//! Projectiles, enemies, and pickups spawn and die constantly; the pool
//! recycles inactive slots instead of reallocating. Slots live in one
//! growable `Vec`, so "returning" an instance is just deactivating it —
//! the next acquire wipes the slot before handing it out, which guarantees
//! no stale state (hit sets, collected flags) survives recycling.

/// Implemented by every pooled entity type
pub trait Poolable: Default {
    /// Live instances participate in the simulation; inactive slots are
    /// eligible for reuse
    fn is_active(&self) -> bool;

    /// Mark the slot dead. Idempotent: deactivating an already-inactive
    /// slot is a programming error, guarded rather than fatal.
    fn deactivate(&mut self);

    /// Guarded release back to the pool
    fn release(&mut self) {
        debug_assert!(self.is_active(), "double release of pooled instance");
        self.deactivate();
    }
}

/// A recycling pool over a growable slot vector
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    /// Hard cap on total slots; None grows without bound
    max: Option<usize>,
}

impl<T: Poolable> Pool<T> {
    pub fn new(max: Option<usize>) -> Self {
        Self {
            slots: Vec::new(),
            max,
        }
    }

    /// Acquire a slot: first inactive slot if one exists, else grow.
    /// The slot is reset to `T::default()` before `init` runs, so `init`
    /// sees no stale state and must leave the instance active.
    ///
    /// Returns None when the pool is capped and fully live (soft failure:
    /// the caller skips the spawn for this tick).
    pub fn acquire(&mut self, init: impl FnOnce(&mut T)) -> Option<&mut T> {
        let idx = match self.slots.iter().position(|s| !s.is_active()) {
            Some(idx) => idx,
            None => {
                if let Some(max) = self.max
                    && self.slots.len() >= max
                {
                    log::warn!("pool exhausted ({max} slots live), skipping spawn");
                    return None;
                }
                self.slots.push(T::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[idx];
        *slot = T::default();
        init(slot);
        Some(slot)
    }

    /// Total slots ever allocated (live + recyclable)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Currently live instances
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.is_active())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter(|s| s.is_active())
    }

    /// All slots including inactive ones (deferred-release passes)
    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }
}
