//! Shared state crossing the interrupt/loop boundary
//!
//! Raw press events originate in GPIO interrupt handlers and are consumed by
//! the cooperative service loop. The channel below is the only path between
//! the two contexts; everything the loop mutates lives behind mutexes, so no
//! field is ever read torn.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use slotsense_core::{Clock, InputKind};

/// A raw press event, timestamped at delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub kind: InputKind,
    /// Milliseconds since boot when the edge fired
    pub at_ms: u64,
}

/// Channel carrying raw press events from ISR context into the loop
pub type InputChannel<M, const DEPTH: usize> = Channel<M, RawInputEvent, DEPTH>;

/// Milliseconds since boot
pub fn uptime_ms() -> u64 {
    embassy_time::Instant::now().as_millis()
}

/// Offer a raw press event from interrupt context
///
/// Stamps the event with the current uptime and tries to enqueue it.
/// Returns false when the channel is full; the event is dropped, which is
/// indistinguishable from switch bounce to the layers above.
pub fn offer_raw_event<M: RawMutex, const DEPTH: usize>(
    channel: &InputChannel<M, DEPTH>,
    kind: InputKind,
) -> bool {
    let event = RawInputEvent {
        kind,
        at_ms: uptime_ms(),
    };
    channel.try_send(event).is_ok()
}

/// Monotonic clock on the Embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        uptime_ms()
    }
}
