//! Messaging synchronizer
//!
//! Owns the session lifecycle against the remote broker: the subscribe set,
//! incoming-command dispatch, outgoing status publication, and the
//! online/will signaling. Publish and subscribe calls are fire-and-forget;
//! broker acknowledgments come back later through the `on_*_ack` methods.

use core::fmt::Write;

use log::{debug, info, warn};

use crate::config::SyncConfig;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::slots::SlotStatus;
use crate::topics::{
    Command, TopicBuf, TopicSpace, FILTER_RESERVATION, TOPIC_EXIT, TOPIC_PING, TOPIC_PRINT,
    TOPIC_UPTIME,
};
use crate::traits::{Clock, Transport, TransportError};

/// Payload published retained to the will topic on connect
pub const ONLINE_PAYLOAD: &[u8] = b"1";

/// Will payload the broker publishes on ungraceful disconnect
pub const WILL_PAYLOAD: &[u8] = b"0";

/// The four subscription filters taken out on connect
const FILTERS: [&str; 4] = [TOPIC_PRINT, TOPIC_PING, TOPIC_EXIT, FILTER_RESERVATION];

/// Session lifecycle phase
///
/// `Disconnected -> Resolving -> Connecting -> Connected -> Unsubscribing
/// -> Disconnected`. There is no terminal state; reconnection is driven by
/// the layer above this core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Disconnected,
    Resolving,
    Connecting,
    Connected,
    Unsubscribing,
}

/// Connection outcome signaled by the transport adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Session accepted by the broker
    Accepted,
    /// Connection attempt refused
    Refused,
    /// Established or in-progress connection was lost
    Lost,
}

/// Client side of the synchronization protocol
#[derive(Debug)]
pub struct SyncClient {
    topics: TopicSpace,
    config: SyncConfig,
    phase: SessionPhase,
    subscribe_count: u8,
    pending_stop: bool,
    connected_once: bool,
}

impl SyncClient {
    pub fn new(client_id: &str, config: SyncConfig) -> Self {
        Self {
            topics: TopicSpace::new(client_id, config.unique_topic),
            config,
            phase: SessionPhase::Disconnected,
            subscribe_count: 0,
            pending_stop: false,
            connected_once: false,
        }
    }

    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub const fn is_connected(&self) -> bool {
        matches!(self.phase, SessionPhase::Connected)
    }

    pub const fn subscribe_count(&self) -> u8 {
        self.subscribe_count
    }

    /// Whether the session has been accepted at least once since startup
    pub const fn connected_once(&self) -> bool {
        self.connected_once
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn topics(&self) -> &TopicSpace {
        &self.topics
    }

    /// Wire topic for the will registration and online announcement
    pub fn will_topic(&self) -> TopicBuf {
        self.topics.will_topic()
    }

    /// Address resolution for the broker has started
    pub fn begin_resolving(&mut self) {
        debug!("Session phase: resolving broker address");
        self.phase = SessionPhase::Resolving;
    }

    /// The transport is dialing the broker
    pub fn begin_connecting(&mut self) {
        debug!("Session phase: connecting");
        self.phase = SessionPhase::Connecting;
    }

    /// Handle the connection outcome signaled by the transport
    ///
    /// On acceptance: subscribe the four command topics, announce online on
    /// the will topic (retained), and leave the periodic status publish to
    /// the adapter's scheduler.
    ///
    /// # Errors
    ///
    /// A lost connection before the first successful connect, or an outright
    /// refusal, is fatal: the device cannot operate unsynchronized and the
    /// adapter must halt or restart.
    pub fn on_connection<T: Transport>(
        &mut self,
        status: ConnectionStatus,
        transport: &mut T,
    ) -> Result<()> {
        match status {
            ConnectionStatus::Accepted => {
                self.phase = SessionPhase::Connected;
                self.connected_once = true;
                info!("Session accepted as {}", self.topics.client_id());

                for filter in FILTERS {
                    let topic = self.topics.full_topic(filter);
                    transport.subscribe(topic.as_str(), self.config.subscribe_qos)?;
                }

                transport.publish(
                    self.will_topic().as_str(),
                    ONLINE_PAYLOAD,
                    self.config.will_qos,
                    true,
                )?;
                Ok(())
            }
            ConnectionStatus::Lost => {
                if !self.connected_once {
                    return Err(Error::ConnectFailed);
                }
                info!("Session closed");
                self.phase = SessionPhase::Disconnected;
                self.subscribe_count = 0;
                self.pending_stop = false;
                Ok(())
            }
            ConnectionStatus::Refused => Err(Error::ConnectRejected),
        }
    }

    /// Dispatch one incoming message
    ///
    /// The topic is stripped of the device prefix and parsed into a typed
    /// command in one step; unrecognized topics and messages arriving
    /// outside the Connected phase are dropped with a debug log.
    ///
    /// A successful reservation marks the controller dirty, so the shared
    /// render-and-publish path runs on the next loop tick. Failed
    /// reservations are logged and dropped; the protocol has no
    /// negative-acknowledgment channel.
    pub fn handle_message<T, C, const N: usize>(
        &mut self,
        topic: &str,
        payload: &[u8],
        controller: &mut Controller<N>,
        transport: &mut T,
        clock: &C,
    ) -> Result<()>
    where
        T: Transport,
        C: Clock,
    {
        if self.phase != SessionPhase::Connected {
            debug!("Dropping message on {:?} while not connected", topic);
            return Ok(());
        }

        let Some(command) = self.topics.parse(topic) else {
            debug!("Unhandled topic {:?}", topic);
            return Ok(());
        };

        match command {
            Command::Print => {
                let text = core::str::from_utf8(payload).unwrap_or("<non-utf8>");
                info!("{}", text);
                Ok(())
            }
            Command::Ping => self.publish_uptime(transport, clock),
            Command::Exit => {
                info!("Exit requested, unsubscribing");
                self.pending_stop = true;
                self.phase = SessionPhase::Unsubscribing;
                for filter in FILTERS {
                    let topic = self.topics.full_topic(filter);
                    transport.unsubscribe(topic.as_str())?;
                }
                Ok(())
            }
            Command::Reserve { id } => {
                if let Err(err) = controller.reserve_remote(id, clock.now_ms()) {
                    warn!("Reservation refused: {}", err);
                }
                Ok(())
            }
        }
    }

    /// Publish the full status batch, one topic per slot
    ///
    /// Payload is the ASCII status code, so retransmitting an unchanged
    /// snapshot is byte-identical and harmless.
    pub fn publish_status<T: Transport, const N: usize>(
        &mut self,
        snapshot: &[SlotStatus; N],
        transport: &mut T,
    ) -> Result<()> {
        if self.phase != SessionPhase::Connected {
            return Err(Error::NotConnected);
        }
        for (index, status) in snapshot.iter().enumerate() {
            let topic = self.topics.status_topic(index as u8 + 1);
            let payload = [b'0' + status.code()];
            transport.publish(
                topic.as_str(),
                &payload,
                self.config.publish_qos,
                self.config.publish_retain,
            )?;
        }
        Ok(())
    }

    /// Publish uptime in seconds in reply to a ping
    pub fn publish_uptime<T: Transport, C: Clock>(
        &mut self,
        transport: &mut T,
        clock: &C,
    ) -> Result<()> {
        if self.phase != SessionPhase::Connected {
            return Err(Error::NotConnected);
        }
        let mut payload = heapless::String::<20>::new();
        let _ = write!(payload, "{}", clock.now_ms() / 1000);
        let topic = self.topics.full_topic(TOPIC_UPTIME);
        transport.publish(
            topic.as_str(),
            payload.as_bytes(),
            self.config.publish_qos,
            self.config.publish_retain,
        )?;
        Ok(())
    }

    /// Completion of an earlier publish reported by the transport
    ///
    /// Publishes are fire-and-forget; a failed one costs a status update
    /// that the next periodic batch repeats anyway, so this only logs.
    pub fn on_publish_result(&mut self, result: core::result::Result<(), TransportError>) {
        match result {
            Ok(()) => debug!("Publish confirmed"),
            Err(err) => warn!("Publish failed: {}", err),
        }
    }

    /// Broker acknowledged (or rejected) a subscribe request
    ///
    /// Rejection is fatal: without the command subscriptions the device is
    /// not synchronized.
    pub fn on_subscribe_ack(&mut self, result: core::result::Result<(), TransportError>) -> Result<()> {
        result.map_err(|_| Error::SubscribeRejected)?;
        self.subscribe_count += 1;
        debug!("Subscription confirmed, {} active", self.subscribe_count);
        Ok(())
    }

    /// Broker acknowledged (or rejected) an unsubscribe request
    ///
    /// When the confirmation count returns to zero while a stop is pending,
    /// the session is closed. An acknowledgment without a matching
    /// subscription is an invariant violation and panics.
    pub fn on_unsubscribe_ack<T: Transport>(
        &mut self,
        result: core::result::Result<(), TransportError>,
        transport: &mut T,
    ) -> Result<()> {
        result.map_err(|_| Error::UnsubscribeRejected)?;
        assert!(
            self.subscribe_count > 0,
            "unsubscribe ack without matching subscription"
        );
        self.subscribe_count -= 1;
        debug!("Unsubscribe confirmed, {} remaining", self.subscribe_count);

        if self.subscribe_count == 0 && self.pending_stop {
            info!("All subscriptions released, closing session");
            transport.disconnect();
            self.phase = SessionPhase::Disconnected;
        }
        Ok(())
    }
}
