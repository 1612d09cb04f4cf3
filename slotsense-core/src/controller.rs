//! Controller glue
//!
//! One owned structure holding the slot registry, the selection cursor, the
//! debouncer, the dirty flag, and the output projector. Both mutation paths
//! (local press events and remote reservations) converge here; the platform
//! adapter wraps the whole controller in a mutex, which makes every
//! read-modify-write a single critical section with respect to the
//! interrupt-context input producer.

use log::debug;

use crate::config::InputConfig;
use crate::error::ReserveError;
use crate::input::{Debouncer, InputKind, Navigator};
use crate::render::OutputProjector;
use crate::slots::{SlotRegistry, SlotStatus};
use crate::traits::{Buzzer, Indicator, SlotMatrix, StatusDisplay};

/// The device's authoritative state
#[derive(Debug)]
pub struct Controller<const N: usize> {
    slots: SlotRegistry<N>,
    debouncer: Debouncer,
    navigator: Navigator<N>,
    projector: OutputProjector<N>,
    dirty: bool,
}

impl<const N: usize> Controller<N> {
    /// Build a controller with every slot Free
    ///
    /// Starts dirty so the first service tick renders the outputs and
    /// publishes the initial status batch.
    pub fn new(input: InputConfig) -> Self {
        Self {
            slots: SlotRegistry::new(),
            debouncer: Debouncer::new(input.debounce_window_ms),
            navigator: Navigator::new(),
            projector: OutputProjector::new(),
            dirty: true,
        }
    }

    /// Feed one raw press event through debounce and dispatch
    ///
    /// Returns true when the event was accepted. Navigation moves the
    /// cursor; a select toggles the highlighted slot and marks the registry
    /// dirty so the next loop tick renders and publishes.
    pub fn handle_raw_event(&mut self, kind: InputKind, now_ms: u64) -> bool {
        if !self.debouncer.accept(kind, now_ms) {
            debug!("Bounce suppressed for {:?} at {}", kind, now_ms);
            return false;
        }
        match kind {
            InputKind::Previous => self.navigator.previous(),
            InputKind::Next => self.navigator.next(),
            InputKind::Select => {
                self.slots.toggle_local(self.navigator.cursor());
                self.dirty = true;
            }
        }
        true
    }

    /// Reserve a slot on behalf of a remote request
    ///
    /// On success the registry is marked dirty; the render-and-publish cycle
    /// follows on the next loop tick, same as for local mutations.
    pub fn reserve_remote(&mut self, id: u16, now_ms: u64) -> Result<(), ReserveError> {
        self.slots.reserve_remote(id, now_ms)?;
        self.dirty = true;
        Ok(())
    }

    /// Whether a render+publish cycle is owed
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the dirty flag
    ///
    /// Mutations accumulated since the last call coalesce into the single
    /// batch this returns true for.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    /// Render the current state to the output devices
    pub fn render<I, M, D, B>(
        &mut self,
        indicator: &mut I,
        matrix: &mut M,
        display: &mut D,
        buzzer: &mut B,
    ) where
        I: Indicator,
        M: SlotMatrix,
        D: StatusDisplay,
        B: Buzzer,
    {
        let snapshot = self.slots.snapshot();
        self.projector
            .render(&snapshot, indicator, matrix, display, buzzer);
    }

    pub fn snapshot(&self) -> [SlotStatus; N] {
        self.slots.snapshot()
    }

    pub fn free_count(&self) -> usize {
        self.slots.free_count()
    }

    pub const fn cursor(&self) -> usize {
        self.navigator.cursor()
    }

    pub fn slots(&self) -> &SlotRegistry<N> {
        &self.slots
    }
}
