//! The save button of a spot.
//!
//! ```text
//! Unsaved --toggle--> Saving   --ok--> Saved
//!                     Saving   --err-> Unsaved
//! Saved   --toggle--> Unsaving --ok--> Unsaved
//!                     Unsaving --err-> Saved
//! ```
//!
//! Toggling while a request is pending is rejected.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use strum::Display;

use crate::entities::*;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SaveState {
    #[default]
    Unsaved,
    Saving,
    Saved,
    Unsaving,
}

impl SaveState {
    pub const fn from_saved(saved: bool) -> Self {
        if saved {
            Self::Saved
        } else {
            Self::Unsaved
        }
    }

    /// A request is in flight.
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Saving | Self::Unsaving)
    }

    /// Whether the spot is shown as saved.
    pub const fn is_saved(self) -> bool {
        matches!(self, Self::Saved | Self::Unsaving)
    }

    /// The state after the user toggled, or `None`
    /// if a request is still pending.
    pub const fn toggle(self) -> Option<Self> {
        match self {
            Self::Unsaved => Some(Self::Saving),
            Self::Saved => Some(Self::Unsaving),
            Self::Saving | Self::Unsaving => None,
        }
    }

    /// The state after the pending request completed.
    pub const fn settle(self, succeeded: bool) -> Self {
        match (self, succeeded) {
            (Self::Saving, true) | (Self::Unsaving, false) => Self::Saved,
            (Self::Saving, false) | (Self::Unsaving, true) => Self::Unsaved,
            (settled, _) => settled,
        }
    }
}

#[derive(Debug, Default)]
struct Slots {
    states: HashMap<SpotId, SaveState>,
    claimed: HashSet<SpotId>,
}

/// The save states of all spots that have been toggled
/// during this session.
#[derive(Debug, Default)]
pub struct SaveToggles {
    slots: Mutex<Slots>,
}

impl SaveToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, spot_id: SpotId) -> Option<SaveState> {
        self.slots.lock().states.get(&spot_id).copied()
    }

    /// Reserves the save button of a spot for a single toggle.
    ///
    /// Returns `None` if another toggle of this spot has not finished yet.
    /// The reservation is released when the returned claim is dropped.
    pub fn claim(&self, spot_id: SpotId) -> Option<SaveClaim<'_>> {
        if !self.slots.lock().claimed.insert(spot_id) {
            return None;
        }
        Some(SaveClaim {
            toggles: self,
            spot_id,
        })
    }
}

/// The exclusive right to toggle a spot.
#[derive(Debug)]
pub struct SaveClaim<'a> {
    toggles: &'a SaveToggles,
    spot_id: SpotId,
}

impl SaveClaim<'_> {
    /// Starts the request for a spot that is currently `saved` or not.
    pub fn begin(&self, saved: bool) -> SaveState {
        let current = SaveState::from_saved(saved);
        // Settled states always have a successor
        let next = current.toggle().unwrap_or(current);
        log::debug!("Spot {}: {current} -> {next}", self.spot_id);
        self.toggles.slots.lock().states.insert(self.spot_id, next);
        next
    }

    /// Completes the request and releases the claim.
    pub fn finish(self, succeeded: bool) -> SaveState {
        let mut slots = self.toggles.slots.lock();
        let state = slots.states.entry(self.spot_id).or_default();
        let next = state.settle(succeeded);
        log::debug!("Spot {}: {state} -> {next}", self.spot_id);
        *state = next;
        next
    }
}

impl Drop for SaveClaim<'_> {
    fn drop(&mut self) {
        let mut slots = self.toggles.slots.lock();
        slots.claimed.remove(&self.spot_id);
        // Abandoned before the request completed
        if slots
            .states
            .get(&self.spot_id)
            .is_some_and(|state| state.is_pending())
        {
            slots.states.remove(&self.spot_id);
        }
    }
}
