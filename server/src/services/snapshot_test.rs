use protocol::element::{ElementKind, Point, Style};
use protocol::Element;

use super::{MemorySnapshotStore, SnapshotStore};

fn element(z: i64) -> Element {
    Element::create(ElementKind::Circle, Point { x: 0.0, y: 0.0 }, &Style::default(), z)
}

#[tokio::test]
async fn unsaved_room_loads_as_none() {
    let store = MemorySnapshotStore::new();
    assert!(store.load("never-saved").await.unwrap().is_none());
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let store = MemorySnapshotStore::new();
    let elements = vec![element(1), element(2)];

    store.save("room", &elements).await.unwrap();

    let snapshot = store.load("room").await.unwrap().expect("saved");
    assert_eq!(snapshot.room_id, "room");
    assert_eq!(snapshot.elements, elements);
    assert!(snapshot.updated_at > 0);
}

#[tokio::test]
async fn later_save_replaces_earlier_wholesale() {
    let store = MemorySnapshotStore::new();
    store.save("room", &[element(1), element(2)]).await.unwrap();

    let second = vec![element(3)];
    store.save("room", &second).await.unwrap();

    let snapshot = store.load("room").await.unwrap().expect("saved");
    assert_eq!(snapshot.elements, second);
}

#[tokio::test]
async fn saving_an_empty_board_is_a_real_save() {
    let store = MemorySnapshotStore::new();
    store.save("room", &[element(1)]).await.unwrap();
    store.save("room", &[]).await.unwrap();

    let snapshot = store.load("room").await.unwrap().expect("saved");
    assert!(snapshot.elements.is_empty());
}

#[tokio::test]
async fn rooms_are_isolated() {
    let store = MemorySnapshotStore::new();
    let a = vec![element(1)];
    let b = vec![element(2), element(3)];
    store.save("room-a", &a).await.unwrap();
    store.save("room-b", &b).await.unwrap();

    assert_eq!(store.load("room-a").await.unwrap().unwrap().elements, a);
    assert_eq!(store.load("room-b").await.unwrap().unwrap().elements, b);
}
