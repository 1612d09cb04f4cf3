//! Capability traits consumed from collaborators
//!
//! The core never touches hardware or sockets directly. Everything below the
//! slot state machine is reached through these traits: the messaging
//! transport, the monotonic clock, and the four output devices.

/// Quality of service level for publish/subscribe operations
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl QoS {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(QoS::AtMostOnce),
            1 => Some(QoS::AtLeastOnce),
            2 => Some(QoS::ExactlyOnce),
            _ => None,
        }
    }
}

/// Immediate transport failure
///
/// Only covers errors raised at the call site. Request completion is
/// asynchronous and reported later through the acknowledgment path on
/// [`crate::sync::SyncClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No session is currently established
    NotConnected,
    /// Outgoing request queue is full
    QueueFull,
    /// I/O error occurred
    IoError,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::NotConnected => write!(f, "No session established"),
            TransportError::QueueFull => write!(f, "Outgoing request queue is full"),
            TransportError::IoError => write!(f, "I/O error occurred"),
        }
    }
}

impl core::error::Error for TransportError {}

/// Fire-and-forget messaging transport
///
/// All methods return as soon as the request is queued. Completion arrives
/// later through the adapter, which forwards broker acknowledgments to the
/// synchronizer (`on_subscribe_ack`, `on_unsubscribe_ack`,
/// `on_publish_result`).
pub trait Transport {
    /// Queue a message for publication
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportError>;

    /// Queue a subscription request for a topic filter
    fn subscribe(&mut self, filter: &str, qos: QoS) -> Result<(), TransportError>;

    /// Queue an unsubscribe request for a topic filter
    fn unsubscribe(&mut self, filter: &str) -> Result<(), TransportError>;

    /// Close the session
    fn disconnect(&mut self);
}

/// Monotonic clock source
///
/// Abstracts time for both std and embedded platforms. Used for debounce
/// timestamps, reservation start times, and the uptime telemetry reply.
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;
}

/// Color of the summary RGB indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    Red,
    Yellow,
    Green,
}

/// Low-intensity RGB triple for one matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const OFF: Rgb = Rgb::new(0, 0, 0);
}

/// Maximum length of one text display line
pub const DISPLAY_LINE_LENGTH: usize = 24;

/// One line of text on the status display
pub type DisplayLine = heapless::String<DISPLAY_LINE_LENGTH>;

/// Summary RGB indicator LED
pub trait Indicator {
    fn set_color(&mut self, color: IndicatorColor);
}

/// Per-slot cell on the LED matrix
///
/// `set_cell` stages a color for the cell representing one slot; `flush`
/// pushes the staged frame to the hardware.
pub trait SlotMatrix {
    fn set_cell(&mut self, index: usize, color: Rgb);
    fn flush(&mut self);
}

/// Small text display listing slot statuses
pub trait StatusDisplay {
    fn render(&mut self, lines: &[DisplayLine]);
}

/// Audible buzzer
///
/// The driver holds the tone for `duration_ms` and silences it afterwards.
pub trait Buzzer {
    fn tone(&mut self, pitch_hz: u16, duration_ms: u16);
}
