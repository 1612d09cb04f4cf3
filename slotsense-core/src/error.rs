//! Error types for the slotsense core
//!
//! no_std compatible error handling

use crate::traits::TransportError;

/// Failure of a remote reservation request.
///
/// Both variants are recovered locally: the request is logged and dropped.
/// The protocol has no negative-acknowledgment channel, so the remote caller
/// is never informed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveError {
    /// Requested slot id is outside `[1, N]`
    InvalidSlotId { id: u16 },
    /// Requested slot is not Free
    SlotUnavailable { id: u16 },
}

impl core::fmt::Display for ReserveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReserveError::InvalidSlotId { id } => {
                write!(f, "Invalid slot id: {}", id)
            }
            ReserveError::SlotUnavailable { id } => {
                write!(f, "Slot {} is not free", id)
            }
        }
    }
}

impl core::error::Error for ReserveError {}

/// Session-level errors
///
/// All of these are fatal to the messaging session: the device cannot stay
/// synchronized without it, so the adapter above this core halts or restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Connection lost before the first successful connect
    ConnectFailed,
    /// Connection attempt rejected by the broker
    ConnectRejected,
    /// Broker rejected a subscribe request
    SubscribeRejected,
    /// Broker rejected an unsubscribe request
    UnsubscribeRejected,
    /// Transport reported an immediate failure
    Transport { error: TransportError },
    /// Operation requires a connected session
    NotConnected,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ConnectFailed => write!(f, "Connection lost before first connect"),
            Error::ConnectRejected => write!(f, "Connection rejected by broker"),
            Error::SubscribeRejected => write!(f, "Subscribe request rejected"),
            Error::UnsubscribeRejected => write!(f, "Unsubscribe request rejected"),
            Error::Transport { error } => write!(f, "Transport failure: {}", error),
            Error::NotConnected => write!(f, "Messaging session is not connected"),
        }
    }
}

impl core::error::Error for Error {}

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        Error::Transport { error }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
