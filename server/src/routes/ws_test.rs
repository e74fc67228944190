use std::time::Duration;

use futures::{SinkExt, StreamExt};
use protocol::element::{ElementKind, Point, Style};
use protocol::{ClientEvent, Element, ServerEvent};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use super::process_inbound_text;
use crate::routes;
use crate::state::test_helpers::test_app_state;

const WAIT: Duration = Duration::from_secs(2);

// =============================================================================
// DISPATCH (no socket)
// =============================================================================

#[tokio::test]
async fn malformed_frame_is_dropped() {
    let state = test_app_state();
    let (tx, _rx) = mpsc::channel(16);
    let mut current_room = None;

    let replies =
        process_inbound_text(&state, &mut current_room, Uuid::new_v4(), &tx, "{not json").await;

    assert!(replies.is_empty());
    assert!(current_room.is_none());
}

#[tokio::test]
async fn unknown_event_tag_is_dropped() {
    let state = test_app_state();
    let (tx, _rx) = mpsc::channel(16);
    let mut current_room = None;
    let frame = json!({ "event": "teleport", "data": { "roomId": "room" } }).to_string();

    let replies =
        process_inbound_text(&state, &mut current_room, Uuid::new_v4(), &tx, &frame).await;

    assert!(replies.is_empty());
}

#[tokio::test]
async fn join_replies_with_board_state_and_records_the_room() {
    let state = test_app_state();
    let persisted = vec![Element::create(
        ElementKind::Rectangle,
        Point { x: 0.0, y: 0.0 },
        &Style::default(),
        1,
    )];
    state.store.save("room", &persisted).await.unwrap();

    let (tx, _rx) = mpsc::channel(16);
    let mut current_room = None;
    let frame = json!({ "event": "join-room", "data": { "roomId": "room" } }).to_string();

    let replies =
        process_inbound_text(&state, &mut current_room, Uuid::new_v4(), &tx, &frame).await;

    assert_eq!(replies, vec![ServerEvent::BoardState { elements: persisted }]);
    assert_eq!(current_room.as_deref(), Some("room"));
    assert_eq!(state.registry.member_count("room").await, 1);
}

#[tokio::test]
async fn rejoining_another_room_moves_the_connection() {
    let state = test_app_state();
    let (tx, _rx) = mpsc::channel(16);
    let connection_id = Uuid::new_v4();
    let mut current_room = None;

    let first = json!({ "event": "join-room", "data": { "roomId": "room-1" } }).to_string();
    process_inbound_text(&state, &mut current_room, connection_id, &tx, &first).await;
    let second = json!({ "event": "join-room", "data": { "roomId": "room-2" } }).to_string();
    process_inbound_text(&state, &mut current_room, connection_id, &tx, &second).await;

    assert_eq!(current_room.as_deref(), Some("room-2"));
    assert_eq!(state.registry.member_count("room-1").await, 0);
    assert_eq!(state.registry.member_count("room-2").await, 1);
}

#[tokio::test]
async fn non_join_events_relay_without_a_reply() {
    let state = test_app_state();
    let (tx, _rx) = mpsc::channel(16);
    let connection_id = Uuid::new_v4();
    let mut current_room = None;

    let join = json!({ "event": "join-room", "data": { "roomId": "room" } }).to_string();
    process_inbound_text(&state, &mut current_room, connection_id, &tx, &join).await;

    let clear = json!({ "event": "clear-board", "data": { "roomId": "room" } }).to_string();
    let replies =
        process_inbound_text(&state, &mut current_room, connection_id, &tx, &clear).await;

    assert!(replies.is_empty());
    assert_eq!(current_room.as_deref(), Some("room"));
}

// =============================================================================
// END TO END
// =============================================================================

type WsClient = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn spawn_server() -> String {
    let state = test_app_state();
    let app = routes::app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("ws://{addr}/api/ws")
}

async fn connect(url: &str) -> WsClient {
    let (socket, _response) = tokio_tungstenite::connect_async(url).await.unwrap();
    socket
}

async fn send(socket: &mut WsClient, event: &ClientEvent) {
    let frame = serde_json::to_string(event).unwrap();
    socket.send(Message::Text(frame.into())).await.unwrap();
}

async fn recv_event(socket: &mut WsClient) -> ServerEvent {
    loop {
        let message = timeout(WAIT, socket.next())
            .await
            .expect("receive timed out")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn draw_reaches_the_other_member_over_the_wire() {
    let url = spawn_server().await;

    let mut alice = connect(&url).await;
    send(&mut alice, &ClientEvent::JoinRoom { room_id: "e2e".into() }).await;
    assert_eq!(recv_event(&mut alice).await, ServerEvent::BoardState { elements: vec![] });

    let mut bob = connect(&url).await;
    send(&mut bob, &ClientEvent::JoinRoom { room_id: "e2e".into() }).await;
    assert_eq!(recv_event(&mut bob).await, ServerEvent::BoardState { elements: vec![] });

    // Alice hears about Bob joining.
    match recv_event(&mut alice).await {
        ServerEvent::UserJoined { .. } => {}
        other => panic!("expected user-joined, got {other:?}"),
    }

    let element = Element::create(
        ElementKind::FreehandPath,
        Point { x: 4.0, y: 8.0 },
        &Style::default(),
        1,
    );
    send(&mut alice, &ClientEvent::Draw { room_id: "e2e".into(), element: element.clone() })
        .await;

    assert_eq!(recv_event(&mut bob).await, ServerEvent::DrawUpdate { element });
}

#[tokio::test]
async fn disconnect_announces_user_left() {
    let url = spawn_server().await;

    let mut alice = connect(&url).await;
    send(&mut alice, &ClientEvent::JoinRoom { room_id: "e2e-leave".into() }).await;
    recv_event(&mut alice).await; // board-state

    let mut bob = connect(&url).await;
    send(&mut bob, &ClientEvent::JoinRoom { room_id: "e2e-leave".into() }).await;
    recv_event(&mut bob).await; // board-state

    let joined = recv_event(&mut alice).await;
    let ServerEvent::UserJoined { connection_id, .. } = joined else {
        panic!("expected user-joined, got {joined:?}");
    };

    bob.close(None).await.unwrap();

    assert_eq!(recv_event(&mut alice).await, ServerEvent::UserLeft { connection_id });
}
