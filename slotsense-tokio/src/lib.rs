//! # slotsense-tokio
//!
//! Tokio host adapter for the SlotSense parking controller core.
//!
//! Runs the controller off-target: a loopback transport records broker
//! traffic, console outputs report through the `log` facade, and
//! [`Device`] ties everything to a Tokio event loop. Useful for protocol
//! development and end-to-end testing without hardware. Re-exports all
//! types from `slotsense-core` for convenience.
//!
//! ## Usage
//!
//! ```no_run
//! use slotsense_tokio::*;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut device: Device<StdClock, 4> =
//!         Device::new("slotabcd", SyncConfig::default(), InputConfig::default());
//!     device.connect()?;
//!
//!     let (tx, mut rx) = mpsc::channel(8);
//!     tx.send(DeviceEvent::Press(InputKind::Select)).await.unwrap();
//!     device.run(&mut rx).await
//! }
//! ```

pub mod device;
pub mod outputs;
pub mod time;
pub mod transport;

// Re-export core for convenience
pub use slotsense_core::*;

pub use device::{Device, DeviceEvent};
pub use outputs::{ConsoleBuzzer, ConsoleDisplay, ConsoleIndicator, ConsoleMatrix};
pub use time::StdClock;
pub use transport::{LoopbackTransport, PublishRecord};
