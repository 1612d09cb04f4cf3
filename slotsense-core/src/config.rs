//! Controller configuration
//!
//! Plain value structs; defaults match the deployed device. One instance is
//! passed into each component at construction so tests can build independent
//! configurations.

use crate::traits::QoS;

/// Messaging synchronizer configuration
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Keep-alive interval negotiated with the broker, in seconds
    ///
    /// Consumed by the transport adapter when it dials the broker; the core
    /// itself never reads it.
    pub keep_alive_secs: u16,
    /// QoS for the four command subscriptions
    pub subscribe_qos: QoS,
    /// QoS for status and uptime publishes
    pub publish_qos: QoS,
    /// Retain flag for status publishes
    pub publish_retain: bool,
    /// QoS for the will message and the online announcement
    pub will_qos: QoS,
    /// Prefix every topic with `/{client_id}` so several devices can share
    /// one broker
    pub unique_topic: bool,
    /// Period of the full-status telemetry publish, in milliseconds
    pub status_interval_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            keep_alive_secs: 60,
            subscribe_qos: QoS::AtLeastOnce,
            publish_qos: QoS::AtLeastOnce,
            publish_retain: false,
            will_qos: QoS::AtLeastOnce,
            unique_topic: false,
            status_interval_ms: 10_000,
        }
    }
}

/// Local input configuration
#[derive(Debug, Clone, Copy)]
pub struct InputConfig {
    /// Minimum time between accepted raw events for the same input, in
    /// milliseconds
    pub debounce_window_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 270,
        }
    }
}
