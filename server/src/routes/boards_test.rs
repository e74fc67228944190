use axum::extract::{Path, State};
use axum::http::StatusCode;
use protocol::element::{ElementKind, Point, Style};
use protocol::Element;

use super::get_board;
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn unsaved_room_is_not_found() {
    let state = test_app_state();
    let result = get_board(State(state), Path("ghost-room".to_owned())).await;
    assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn saved_room_returns_its_snapshot() {
    let state = test_app_state();
    let element = Element::create(
        ElementKind::Rectangle,
        Point { x: 10.0, y: 20.0 },
        &Style::default(),
        1,
    );
    state
        .store
        .save("design-review", std::slice::from_ref(&element))
        .await
        .unwrap();

    let result = get_board(State(state), Path("design-review".to_owned())).await;
    let snapshot = result.expect("saved room should load").0;
    assert_eq!(snapshot.room_id, "design-review");
    assert_eq!(snapshot.elements, vec![element]);
    assert!(snapshot.updated_at > 0);
}
