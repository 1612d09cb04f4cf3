//! # SlotSense Core
//!
//! Platform-agnostic core of a parking-slot controller: the authoritative
//! slot state machine and its synchronization protocol with a
//! publish/subscribe broker.
//!
//! The core owns:
//!
//! - the slot registry (occupancy and reservations),
//! - debounced local input handling and slot navigation,
//! - the output projection onto indicator, matrix, display, and buzzer,
//! - the messaging synchronizer (topic set, command dispatch, status
//!   telemetry, online/will signaling).
//!
//! Everything else - network bootstrap, pixel drivers, raw input
//! acquisition - sits behind the capability traits in [`traits`]. The crate
//! is `no_std`, allocation-free (`heapless` buffers only), and has no async
//! runtime dependencies; platform adapters drive it from their own event
//! loop.

#![no_std]

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod render;
pub mod slots;
pub mod sync;
pub mod topics;
pub mod traits;

pub use config::{InputConfig, SyncConfig};
pub use controller::Controller;
pub use error::{Error, ReserveError, Result};
pub use input::InputKind;
pub use slots::{Slot, SlotRegistry, SlotStatus};
pub use sync::{ConnectionStatus, SessionPhase, SyncClient};
pub use traits::{
    Buzzer, Clock, DisplayLine, Indicator, IndicatorColor, QoS, Rgb, SlotMatrix, StatusDisplay,
    Transport, TransportError, DISPLAY_LINE_LENGTH,
};
