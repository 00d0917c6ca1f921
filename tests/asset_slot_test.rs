use std::time::Duration;

use futures::channel::oneshot;
use portal_scene::{
    SceneError,
    assets::{AssetSlot, LoadResult, LoadState},
};

const TIMEOUT: Option<Duration> = Some(Duration::from_secs(30));

fn slot() -> (oneshot::Sender<LoadResult<u32>>, AssetSlot<u32>) {
    let (tx, rx) = oneshot::channel();
    (tx, AssetSlot::new("model/portal.glb", rx, Duration::ZERO, TIMEOUT))
}

#[test]
fn successful_load_binds_once() {
    let (tx, mut slot) = slot();
    assert!(slot.is_loading());
    assert!(!slot.poll(Duration::from_millis(16)));

    tx.send(Ok(7)).unwrap();
    assert!(slot.poll(Duration::from_millis(32)));
    assert_eq!(slot.get(), Some(&7));
    assert!(matches!(slot.state(), LoadState::Bound(7)));

    // Bound is final
    assert!(!slot.poll(Duration::from_secs(60)));
    assert_eq!(slot.get(), Some(&7));
}

#[test]
fn failed_load_keeps_its_error() {
    let (tx, mut slot) = slot();
    tx.send(Err(SceneError::MissingNode("portalLight".to_string())))
        .unwrap();

    assert!(slot.poll(Duration::from_millis(16)));
    match slot.state() {
        LoadState::Failed(err) => {
            assert_eq!(*err, SceneError::MissingNode("portalLight".to_string()));
            assert!(!err.is_fatal());
        }
        other => panic!("unexpected state {other:?}"),
    }
    assert!(slot.get().is_none());
    assert!(!slot.poll(Duration::from_millis(32)));
}

#[test]
fn stalled_load_times_out() {
    let (_tx, mut slot) = slot();

    assert!(!slot.poll(Duration::from_secs(29)));
    assert!(slot.is_loading());
    assert!(slot.poll(Duration::from_secs(30)));
    match slot.state() {
        LoadState::Failed(SceneError::LoadTimeout { path, after }) => {
            assert_eq!(path, "model/portal.glb");
            assert_eq!(*after, Duration::from_secs(30));
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn timeout_counts_from_dispatch() {
    let (_tx, rx) = oneshot::channel::<LoadResult<u32>>();
    let mut slot = AssetSlot::new("texture/baked.jpg", rx, Duration::from_secs(10), TIMEOUT);
    assert!(!slot.poll(Duration::from_secs(39)));
    assert!(slot.poll(Duration::from_secs(40)));
}

#[test]
fn without_timeout_a_load_may_take_forever() {
    let (_tx, rx) = oneshot::channel::<LoadResult<u32>>();
    let mut slot = AssetSlot::new("model/portal.glb", rx, Duration::ZERO, None);
    assert!(!slot.poll(Duration::from_secs(3600)));
    assert!(slot.is_loading());
}

#[test]
fn dropped_loader_fails_the_slot() {
    let (tx, mut slot) = slot();
    drop(tx);

    assert!(slot.poll(Duration::from_millis(16)));
    assert!(matches!(
        slot.state(),
        LoadState::Failed(SceneError::AssetLoad { path, .. }) if path == "model/portal.glb"
    ));
}
