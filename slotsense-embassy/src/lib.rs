//! # slotsense-embassy
//!
//! Embassy adapter for the SlotSense parking controller core.
//!
//! This crate supplies the pieces `slotsense-core` leaves to the platform:
//! interrupt-safe shared state (the controller and synchronizer behind
//! `embassy-sync` mutexes), the raw input event channel crossing from ISR
//! context into the cooperative loop, a monotonic clock on `embassy-time`,
//! and the service loop that drives render-and-publish cycles plus the
//! periodic status telemetry.
//!
//! ## Example
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use slotsense_embassy::{ControllerMutex, InputChannel};
//! use static_cell::StaticCell;
//!
//! static CONTROLLER: StaticCell<ControllerMutex<CriticalSectionRawMutex, 4>> =
//!     StaticCell::new();
//! static EVENTS: InputChannel<CriticalSectionRawMutex, 8> = InputChannel::new();
//!
//! // In the GPIO interrupt handler:
//! //     slotsense_embassy::offer_raw_event(&EVENTS, InputKind::Select);
//! // In the main task: connect the transport, then drive
//! //     slotsense_embassy::service_loop(...) to completion.
//! ```

#![no_std]

pub mod service;
pub mod state;

// Re-export core for convenience
pub use slotsense_core::*;

pub use service::{
    deliver_message, deliver_subscribe_ack, deliver_unsubscribe_ack, service_loop, WakeSignal,
};
pub use state::{offer_raw_event, uptime_ms, EmbassyClock, InputChannel, RawInputEvent};

use embassy_sync::mutex::Mutex;

/// Controller behind a mutex shared between ISR-fed tasks and the loop
///
/// The raw mutex type is generic for portability across platforms; use
/// `CriticalSectionRawMutex` when the producer runs in interrupt context.
pub type ControllerMutex<M, const N: usize> = Mutex<M, Controller<N>>;

/// Messaging synchronizer behind a mutex
pub type SyncMutex<M> = Mutex<M, SyncClient>;

/// Transport handle behind a mutex
pub type TransportMutex<M, T> = Mutex<M, T>;
