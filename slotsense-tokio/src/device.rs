//! Simulated device
//!
//! Bundles the core controller and synchronizer with the loopback transport,
//! console outputs, and a clock, so the full mutate -> render -> publish
//! path can run on a host. The loopback broker acknowledges every subscribe
//! and unsubscribe request immediately after it is issued.

use std::time::Duration;

use log::warn;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use slotsense_core::{
    Clock, ConnectionStatus, Controller, InputConfig, InputKind, Result, SessionPhase, SlotStatus,
    SyncClient, SyncConfig,
};

use crate::outputs::{ConsoleBuzzer, ConsoleDisplay, ConsoleIndicator, ConsoleMatrix};
use crate::time::StdClock;
use crate::transport::LoopbackTransport;

/// Input to the simulated device's event loop
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A raw press on one of the three buttons
    Press(InputKind),
    /// A message arriving from the broker
    Message { topic: String, payload: Vec<u8> },
}

/// A complete simulated device over `N` slots
#[derive(Debug)]
pub struct Device<C: Clock, const N: usize> {
    controller: Controller<N>,
    sync: SyncClient,
    transport: LoopbackTransport,
    clock: C,
    indicator: ConsoleIndicator,
    matrix: ConsoleMatrix,
    display: ConsoleDisplay,
    buzzer: ConsoleBuzzer,
    subs_acked: usize,
    unsubs_acked: usize,
    pubs_acked: usize,
}

impl<const N: usize> Device<StdClock, N> {
    pub fn new(client_id: &str, sync: SyncConfig, input: InputConfig) -> Self {
        Self::with_clock(client_id, sync, input, StdClock::new())
    }
}

impl<C: Clock, const N: usize> Device<C, N> {
    pub fn with_clock(client_id: &str, sync: SyncConfig, input: InputConfig, clock: C) -> Self {
        Self {
            controller: Controller::new(input),
            sync: SyncClient::new(client_id, sync),
            transport: LoopbackTransport::new(),
            clock,
            indicator: ConsoleIndicator::default(),
            matrix: ConsoleMatrix::default(),
            display: ConsoleDisplay::default(),
            buzzer: ConsoleBuzzer::default(),
            subs_acked: 0,
            unsubs_acked: 0,
            pubs_acked: 0,
        }
    }

    /// Establish the session against the loopback broker
    ///
    /// Walks the resolve/connect phases, accepts the session, and confirms
    /// the four command subscriptions.
    pub fn connect(&mut self) -> Result<()> {
        self.sync.begin_resolving();
        self.sync.begin_connecting();
        self.sync
            .on_connection(ConnectionStatus::Accepted, &mut self.transport)?;
        self.pump_acks()
    }

    /// Feed one raw button press, stamped with the current clock
    pub fn press(&mut self, kind: InputKind) -> bool {
        self.controller.handle_raw_event(kind, self.clock.now_ms())
    }

    /// Deliver one broker message to the synchronizer
    pub fn deliver(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        self.sync.handle_message(
            topic,
            payload,
            &mut self.controller,
            &mut self.transport,
            &self.clock,
        )?;
        self.pump_acks()
    }

    /// Confirm requests the loopback broker has not acknowledged yet
    fn pump_acks(&mut self) -> Result<()> {
        while self.subs_acked < self.transport.subscribed().len() {
            self.sync.on_subscribe_ack(Ok(()))?;
            self.subs_acked += 1;
        }
        while self.unsubs_acked < self.transport.unsubscribed().len() {
            self.sync.on_unsubscribe_ack(Ok(()), &mut self.transport)?;
            self.unsubs_acked += 1;
        }
        while self.pubs_acked < self.transport.published().len() {
            self.sync.on_publish_result(Ok(()));
            self.pubs_acked += 1;
        }
        Ok(())
    }

    /// Service the dirty flag: render outputs, publish the status batch
    ///
    /// Returns true when a batch was owed. Publish failures are logged and
    /// do not fail the service pass.
    pub fn service(&mut self) -> bool {
        if !self.controller.take_dirty() {
            return false;
        }
        self.controller.render(
            &mut self.indicator,
            &mut self.matrix,
            &mut self.display,
            &mut self.buzzer,
        );
        if self.sync.is_connected() {
            let snapshot = self.controller.snapshot();
            if let Err(err) = self.sync.publish_status(&snapshot, &mut self.transport) {
                warn!("Status publish failed: {}", err);
            }
        }
        true
    }

    /// Publish the full status batch regardless of the dirty flag
    pub fn publish_periodic(&mut self) {
        if !self.sync.is_connected() {
            return;
        }
        let snapshot = self.controller.snapshot();
        if let Err(err) = self.sync.publish_status(&snapshot, &mut self.transport) {
            warn!("Periodic status publish failed: {}", err);
        }
    }

    /// Whether the session ended after having been established
    pub fn is_stopped(&self) -> bool {
        self.sync.connected_once() && self.sync.phase() == SessionPhase::Disconnected
    }

    /// Drive the device until the session ends or the event source closes
    ///
    /// Each iteration services the dirty flag first, then waits on the next
    /// event or the periodic status tick.
    pub async fn run(&mut self, events: &mut mpsc::Receiver<DeviceEvent>) -> Result<()> {
        let interval_ms = self.sync.config().status_interval_ms;
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            self.service();
            if self.is_stopped() {
                return Ok(());
            }

            tokio::select! {
                event = events.recv() => match event {
                    Some(DeviceEvent::Press(kind)) => {
                        self.press(kind);
                    }
                    Some(DeviceEvent::Message { topic, payload }) => {
                        self.deliver(&topic, &payload)?;
                    }
                    None => return Ok(()),
                },
                _ = ticker.tick() => self.publish_periodic(),
            }
        }
    }

    pub fn snapshot(&self) -> [SlotStatus; N] {
        self.controller.snapshot()
    }

    pub fn controller(&self) -> &Controller<N> {
        &self.controller
    }

    pub fn sync(&self) -> &SyncClient {
        &self.sync
    }

    pub fn transport(&self) -> &LoopbackTransport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut LoopbackTransport {
        &mut self.transport
    }

    pub fn indicator(&self) -> &ConsoleIndicator {
        &self.indicator
    }

    pub fn display(&self) -> &ConsoleDisplay {
        &self.display
    }
}
