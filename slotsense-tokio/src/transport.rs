//! In-memory transport for host-side simulation

use log::trace;
use slotsense_core::{QoS, Transport, TransportError};

/// One recorded publish request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRecord {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

/// Transport that records every request instead of sending it
///
/// Stands in for a broker connection when running the controller on a host:
/// publishes, subscriptions, and unsubscriptions are appended to inspectable
/// logs, and the owner acknowledges them back into the synchronizer as if an
/// always-available broker confirmed each one immediately.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    published: Vec<PublishRecord>,
    subscribed: Vec<String>,
    unsubscribed: Vec<String>,
    disconnects: usize,
    fail_publishes: bool,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> &[PublishRecord] {
        &self.published
    }

    /// Most recent publish on the given topic
    pub fn published_on(&self, topic: &str) -> Option<&PublishRecord> {
        self.published.iter().rev().find(|p| p.topic == topic)
    }

    pub fn subscribed(&self) -> &[String] {
        &self.subscribed
    }

    pub fn unsubscribed(&self) -> &[String] {
        &self.unsubscribed
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects
    }

    /// Forget recorded publishes, keeping subscriptions intact
    pub fn clear_published(&mut self) {
        self.published.clear();
    }

    /// Make subsequent publish calls fail with `QueueFull`
    pub fn set_fail_publishes(&mut self, fail: bool) {
        self.fail_publishes = fail;
    }
}

impl Transport for LoopbackTransport {
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportError> {
        if self.fail_publishes {
            return Err(TransportError::QueueFull);
        }
        trace!("Publish {} ({} bytes)", topic, payload.len());
        self.published.push(PublishRecord {
            topic: topic.to_owned(),
            payload: payload.to_vec(),
            qos,
            retain,
        });
        Ok(())
    }

    fn subscribe(&mut self, filter: &str, _qos: QoS) -> Result<(), TransportError> {
        trace!("Subscribe {}", filter);
        self.subscribed.push(filter.to_owned());
        Ok(())
    }

    fn unsubscribe(&mut self, filter: &str) -> Result<(), TransportError> {
        trace!("Unsubscribe {}", filter);
        self.unsubscribed.push(filter.to_owned());
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
    }
}
