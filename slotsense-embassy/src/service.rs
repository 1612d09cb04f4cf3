//! Cooperative service loop
//!
//! Drives the mutate -> render -> publish path: raw input events and remote
//! commands mark the controller dirty, and the loop below turns every dirty
//! observation into exactly one render-and-publish batch. A periodic ticker
//! adds the full-status telemetry publish.

use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use log::warn;
use slotsense_core::{
    Buzzer, Clock, Indicator, Result, SessionPhase, SlotMatrix, StatusDisplay, Transport,
    TransportError,
};

use crate::state::InputChannel;
use crate::{ControllerMutex, SyncMutex, TransportMutex};

/// Wake-up signal for the service loop
///
/// Raised whenever state changed outside the loop (incoming message,
/// acknowledgment) so the dirty flag is observed on the very next loop
/// iteration instead of the next ticker period.
pub type WakeSignal<M> = Signal<M, ()>;

/// Deliver one incoming message from the network adapter
///
/// Dispatches through the synchronizer and wakes the service loop so a
/// reservation-induced mutation renders and publishes without waiting for
/// the next periodic tick.
pub async fn deliver_message<M, T, C, const N: usize>(
    sync: &SyncMutex<M>,
    controller: &ControllerMutex<M, N>,
    transport: &TransportMutex<M, T>,
    clock: &C,
    wake: &WakeSignal<M>,
    topic: &str,
    payload: &[u8],
) -> Result<()>
where
    M: RawMutex,
    T: Transport,
    C: Clock,
{
    {
        let mut sync = sync.lock().await;
        let mut ctl = controller.lock().await;
        let mut tr = transport.lock().await;
        sync.handle_message(topic, payload, &mut *ctl, &mut *tr, clock)?;
    }
    wake.signal(());
    Ok(())
}

/// Forward a subscribe acknowledgment from the network adapter
pub async fn deliver_subscribe_ack<M: RawMutex>(
    sync: &SyncMutex<M>,
    result: core::result::Result<(), TransportError>,
) -> Result<()> {
    sync.lock().await.on_subscribe_ack(result)
}

/// Forward an unsubscribe acknowledgment from the network adapter
///
/// Wakes the service loop so it notices session teardown promptly.
pub async fn deliver_unsubscribe_ack<M, T>(
    sync: &SyncMutex<M>,
    transport: &TransportMutex<M, T>,
    wake: &WakeSignal<M>,
    result: core::result::Result<(), TransportError>,
) -> Result<()>
where
    M: RawMutex,
    T: Transport,
{
    {
        let mut sync = sync.lock().await;
        let mut tr = transport.lock().await;
        sync.on_unsubscribe_ack(result, &mut *tr)?;
    }
    wake.signal(());
    Ok(())
}

/// Run the controller until the session ends
///
/// Call after the session has been accepted. Every iteration first services
/// the dirty flag (render plus status publish, mutations coalesced into one
/// batch), then waits on raw input, the wake signal, or the periodic ticker.
/// The initial iteration services the controller's startup dirty state, so
/// outputs and the first status batch go out with no delay.
///
/// Returns once the session reaches Disconnected after having connected,
/// which cancels the periodic publish with it. Publish failures are logged
/// and do not stop the loop; session-fatal errors propagate.
#[allow(clippy::too_many_arguments)]
pub async fn service_loop<M, T, I, X, D, B, const N: usize, const DEPTH: usize>(
    controller: &ControllerMutex<M, N>,
    sync: &SyncMutex<M>,
    transport: &TransportMutex<M, T>,
    events: &InputChannel<M, DEPTH>,
    wake: &WakeSignal<M>,
    indicator: &mut I,
    matrix: &mut X,
    display: &mut D,
    buzzer: &mut B,
) -> Result<()>
where
    M: RawMutex,
    T: Transport,
    I: Indicator,
    X: SlotMatrix,
    D: StatusDisplay,
    B: Buzzer,
{
    let interval_ms = sync.lock().await.config().status_interval_ms;
    let mut ticker = Ticker::every(Duration::from_millis(interval_ms));

    loop {
        service(controller, sync, transport, indicator, matrix, display, buzzer).await;

        {
            let sync = sync.lock().await;
            if sync.connected_once() && sync.phase() == SessionPhase::Disconnected {
                return Ok(());
            }
        }

        match select3(events.receive(), wake.wait(), ticker.next()).await {
            Either3::First(event) => {
                let mut ctl = controller.lock().await;
                ctl.handle_raw_event(event.kind, event.at_ms);
            }
            Either3::Second(()) => {
                // State changed outside the loop; the next service() pass
                // picks it up
            }
            Either3::Third(()) => {
                let snapshot = controller.lock().await.snapshot();
                let mut sync = sync.lock().await;
                if sync.is_connected() {
                    let mut tr = transport.lock().await;
                    if let Err(err) = sync.publish_status(&snapshot, &mut *tr) {
                        warn!("Periodic status publish failed: {}", err);
                    }
                }
            }
        }
    }
}

/// Turn a pending dirty flag into one render-and-publish batch
async fn service<M, T, I, X, D, B, const N: usize>(
    controller: &ControllerMutex<M, N>,
    sync: &SyncMutex<M>,
    transport: &TransportMutex<M, T>,
    indicator: &mut I,
    matrix: &mut X,
    display: &mut D,
    buzzer: &mut B,
) where
    M: RawMutex,
    T: Transport,
    I: Indicator,
    X: SlotMatrix,
    D: StatusDisplay,
    B: Buzzer,
{
    let snapshot = {
        let mut ctl = controller.lock().await;
        if !ctl.take_dirty() {
            return;
        }
        ctl.render(indicator, matrix, display, buzzer);
        ctl.snapshot()
    };

    let mut sync = sync.lock().await;
    if sync.is_connected() {
        let mut tr = transport.lock().await;
        if let Err(err) = sync.publish_status(&snapshot, &mut *tr) {
            warn!("Status publish failed: {}", err);
        }
    }
}
