use protocol::element::Point;
use protocol::ServerEvent;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::RoomRegistry;

fn client() -> (Uuid, mpsc::Sender<ServerEvent>, mpsc::Receiver<ServerEvent>) {
    let (tx, rx) = mpsc::channel(16);
    (Uuid::new_v4(), tx, rx)
}

#[tokio::test]
async fn join_and_leave_track_membership() {
    let registry = RoomRegistry::new();
    let (id, tx, _rx) = client();

    registry.join("room", id, "#D94B4B".into(), tx).await;
    assert_eq!(registry.member_count("room").await, 1);

    assert!(registry.leave("room", id).await);
    assert_eq!(registry.member_count("room").await, 0);
}

#[tokio::test]
async fn leave_of_non_member_is_false() {
    let registry = RoomRegistry::new();
    let (a, tx, _rx) = client();
    registry.join("room", a, "#D94B4B".into(), tx).await;

    assert!(!registry.leave("room", Uuid::new_v4()).await);
    assert!(!registry.leave("other-room", a).await);
    // Membership untouched by the failed leaves.
    assert_eq!(registry.member_count("room").await, 1);
}

#[tokio::test]
async fn empty_room_is_evicted() {
    let registry = RoomRegistry::new();
    let (a, tx_a, _rx_a) = client();
    let (b, tx_b, _rx_b) = client();
    registry.join("room", a, "#D94B4B".into(), tx_a).await;
    registry.join("room", b, "#4A9EFF".into(), tx_b).await;

    registry.leave("room", a).await;
    assert_eq!(registry.member_count("room").await, 1);

    registry.leave("room", b).await;
    // Updating a cursor in an evicted room is a no-op, not a resurrection.
    registry.update_cursor("room", b, Point { x: 1.0, y: 1.0 }).await;
    assert!(registry.cursors("room").await.is_empty());
}

#[tokio::test]
async fn cursor_is_dropped_with_the_connection() {
    let registry = RoomRegistry::new();
    let (a, tx_a, _rx_a) = client();
    let (b, tx_b, _rx_b) = client();
    registry.join("room", a, "#D94B4B".into(), tx_a).await;
    registry.join("room", b, "#4A9EFF".into(), tx_b).await;

    registry.update_cursor("room", a, Point { x: 5.0, y: 6.0 }).await;
    registry.update_cursor("room", b, Point { x: 7.0, y: 8.0 }).await;
    assert_eq!(registry.cursors("room").await.len(), 2);

    registry.leave("room", a).await;
    let cursors = registry.cursors("room").await;
    assert_eq!(cursors, vec![(b, Point { x: 7.0, y: 8.0 })]);
}

#[tokio::test]
async fn cursor_update_keeps_only_the_latest_point() {
    let registry = RoomRegistry::new();
    let (a, tx, _rx) = client();
    registry.join("room", a, "#D94B4B".into(), tx).await;

    registry.update_cursor("room", a, Point { x: 1.0, y: 1.0 }).await;
    registry.update_cursor("room", a, Point { x: 2.0, y: 3.0 }).await;
    assert_eq!(registry.cursors("room").await, vec![(a, Point { x: 2.0, y: 3.0 })]);
}

#[tokio::test]
async fn broadcast_skips_the_excluded_sender() {
    let registry = RoomRegistry::new();
    let (a, tx_a, mut rx_a) = client();
    let (b, tx_b, mut rx_b) = client();
    registry.join("room", a, "#D94B4B".into(), tx_a).await;
    registry.join("room", b, "#4A9EFF".into(), tx_b).await;

    registry.broadcast("room", &ServerEvent::BoardCleared, Some(a)).await;

    assert_eq!(rx_b.try_recv().unwrap(), ServerEvent::BoardCleared);
    assert!(rx_a.try_recv().is_err());
}

#[tokio::test]
async fn broadcast_is_room_scoped() {
    let registry = RoomRegistry::new();
    let (a, tx_a, mut rx_a) = client();
    let (b, tx_b, mut rx_b) = client();
    registry.join("room-1", a, "#D94B4B".into(), tx_a).await;
    registry.join("room-2", b, "#4A9EFF".into(), tx_b).await;

    registry.broadcast("room-1", &ServerEvent::BoardCleared, None).await;

    assert_eq!(rx_a.try_recv().unwrap(), ServerEvent::BoardCleared);
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn full_channel_drops_the_frame_without_blocking() {
    let registry = RoomRegistry::new();
    let slow = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel(1);
    registry.join("room", slow, "#D94B4B".into(), tx).await;

    registry.broadcast("room", &ServerEvent::BoardCleared, None).await;
    registry
        .broadcast("room", &ServerEvent::SyncBoard { elements: Vec::new() }, None)
        .await;

    // Capacity one: the first frame landed, the second was dropped.
    assert_eq!(rx.try_recv().unwrap(), ServerEvent::BoardCleared);
    assert!(rx.try_recv().is_err());
}
