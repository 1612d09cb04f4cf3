//! End-to-end scenarios against the simulated device

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use slotsense_tokio::{
    Clock, Device, DeviceEvent, InputConfig, InputKind, SessionPhase, SlotStatus, StdClock,
    SyncConfig,
};
use tokio::sync::mpsc;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Default)]
struct TestClock(Arc<AtomicU64>);

impl TestClock {
    fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::Relaxed);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

fn device() -> Device<TestClock, 4> {
    init_logs();
    let mut device = Device::with_clock(
        "slotabcd",
        SyncConfig::default(),
        InputConfig::default(),
        TestClock::default(),
    );
    device.connect().unwrap();
    // Drain the startup render-and-publish batch
    assert!(device.service());
    device.transport_mut().clear_published();
    device
}

#[test]
fn connect_subscribes_and_announces_online() {
    init_logs();
    let mut device: Device<StdClock, 4> =
        Device::new("slotabcd", SyncConfig::default(), InputConfig::default());
    device.connect().unwrap();

    assert_eq!(device.sync().subscribe_count(), 4);
    assert_eq!(
        device.transport().subscribed(),
        ["/print", "/ping", "/exit", "/parking/+/reservation"]
    );
    let online = device.transport().published_on("/online").unwrap();
    assert_eq!(online.payload, b"1");
    assert!(online.retain);
}

#[test]
fn startup_service_publishes_the_full_batch() {
    init_logs();
    let mut device: Device<StdClock, 4> =
        Device::new("slotabcd", SyncConfig::default(), InputConfig::default());
    device.connect().unwrap();

    assert!(device.service());
    for id in 1..=4 {
        let topic = format!("/parking/status/{}", id);
        assert_eq!(device.transport().published_on(&topic).unwrap().payload, b"0");
    }
    // Nothing changed; no second batch is owed
    assert!(!device.service());
}

#[test]
fn remote_reservation_renders_and_publishes_once() {
    let mut device = device();

    device.deliver("/parking/2/reservation", b"").unwrap();
    assert!(device.service());

    assert_eq!(device.snapshot()[1], SlotStatus::Reserved);
    assert_eq!(
        device
            .transport()
            .published_on("/parking/status/2")
            .unwrap()
            .payload,
        b"2"
    );
    assert_eq!(device.transport().published().len(), 4);
}

#[test]
fn reserving_an_unavailable_slot_changes_nothing() {
    let mut device = device();
    device.deliver("/parking/2/reservation", b"").unwrap();
    assert!(device.service());
    device.transport_mut().clear_published();

    device.deliver("/parking/2/reservation", b"").unwrap();
    assert!(!device.service());
    assert!(device.transport().published().is_empty());
    assert_eq!(device.snapshot()[1], SlotStatus::Reserved);
}

#[test]
fn select_press_toggles_the_highlighted_slot() {
    let mut device = device();

    assert!(device.press(InputKind::Next));
    assert!(device.press(InputKind::Select));
    assert!(device.service());

    assert_eq!(device.snapshot()[1], SlotStatus::Occupied);
    assert_eq!(
        device
            .transport()
            .published_on("/parking/status/2")
            .unwrap()
            .payload,
        b"1"
    );
}

#[test]
fn bounced_press_is_suppressed() {
    let mut device = device();

    assert!(device.press(InputKind::Select));
    assert!(!device.press(InputKind::Select));
    assert!(device.service());
    assert_eq!(device.snapshot()[0], SlotStatus::Occupied);
}

#[test]
fn ping_replies_with_uptime_seconds() {
    init_logs();
    let clock = TestClock::default();
    let mut device: Device<TestClock, 4> = Device::with_clock(
        "slotabcd",
        SyncConfig::default(),
        InputConfig::default(),
        clock.clone(),
    );
    device.connect().unwrap();
    clock.advance(42_500);

    device.deliver("/ping", b"").unwrap();
    assert_eq!(device.transport().published_on("/uptime").unwrap().payload, b"42");
}

#[test]
fn exit_unwinds_the_whole_session() {
    let mut device = device();

    device.deliver("/exit", b"").unwrap();

    assert_eq!(device.transport().unsubscribed().len(), 4);
    assert_eq!(device.transport().disconnect_count(), 1);
    assert_eq!(device.sync().phase(), SessionPhase::Disconnected);
    assert!(device.is_stopped());
}

#[test]
fn publish_failure_does_not_fail_the_service_pass() {
    let mut device = device();
    device.transport_mut().set_fail_publishes(true);

    device.deliver("/parking/1/reservation", b"").unwrap();
    assert!(device.service());
    assert_eq!(device.snapshot()[0], SlotStatus::Reserved);
}

#[tokio::test]
async fn run_loop_processes_events_until_exit() {
    let mut device = device();
    let (tx, mut rx) = mpsc::channel(8);

    tx.send(DeviceEvent::Press(InputKind::Next)).await.unwrap();
    tx.send(DeviceEvent::Press(InputKind::Select)).await.unwrap();
    tx.send(DeviceEvent::Message {
        topic: "/exit".into(),
        payload: Vec::new(),
    })
    .await
    .unwrap();

    device.run(&mut rx).await.unwrap();

    assert!(device.is_stopped());
    assert_eq!(device.snapshot()[1], SlotStatus::Occupied);
    assert_eq!(
        device
            .transport()
            .published_on("/parking/status/2")
            .unwrap()
            .payload,
        b"1"
    );
}
