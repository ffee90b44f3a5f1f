use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use roomcast::moderation::{ContentFilter, WordListFilter};
use roomcast::protocol::{
    ChatClientEvent, ChatServerMessage, ClientFrame, CounterClientEvent, CounterServerMessage,
};
use roomcast::state::hub::Outbox;
use roomcast::state::{AppState, ChatState, CounterState, DELIVERED_TEXT, LEFT_TEXT, WELCOME_TEXT};
use roomcast::ws::handlers::{handle_chat_event, handle_counter_event};
use std::sync::Arc;
use tower::ServiceExt;

/// Flags any message containing "badword"
struct StubFilter;

impl ContentFilter for StubFilter {
    fn is_profane(&self, text: &str) -> bool {
        text.contains("badword")
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn chat_state() -> ChatState {
    ChatState::new(Arc::new(StubFilter))
}

fn drain_chat(rx: &mut Outbox<ChatServerMessage>) -> Vec<ChatServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn texts(rx: &mut Outbox<ChatServerMessage>) -> Vec<String> {
    drain_chat(rx)
        .into_iter()
        .filter_map(|m| match m {
            ChatServerMessage::Message(m) => Some(m.text),
            _ => None,
        })
        .collect()
}

fn join(name: &str, room: &str) -> ClientFrame<ChatClientEvent> {
    ClientFrame::new(ChatClientEvent::Join {
        name: name.to_string(),
        room: room.to_string(),
    })
}

fn send(text: &str, ack: u64) -> ClientFrame<ChatClientEvent> {
    ClientFrame::with_ack(
        ChatClientEvent::SendMessage {
            text: text.to_string(),
        },
        ack,
    )
}

#[tokio::test]
async fn test_join_announcement_reaches_room_members_only() {
    let state = chat_state();
    let (a, mut rx_a) = state.connect().await;
    let (b, mut rx_b) = state.connect().await;
    let (c, mut rx_c) = state.connect().await;

    assert!(handle_chat_event(join("alice", "lobby"), &a, &state)
        .await
        .is_none());
    assert!(handle_chat_event(join("carol", "kitchen"), &c, &state)
        .await
        .is_none());

    // Discard connect-time greetings
    drain_chat(&mut rx_a);
    drain_chat(&mut rx_b);
    drain_chat(&mut rx_c);

    let reply = handle_chat_event(join("Bob", "Lobby"), &b, &state).await;
    assert!(reply.is_none(), "Successful join should not ack");

    assert_eq!(texts(&mut rx_a), vec!["Bob has joined the room!"]);
    assert!(texts(&mut rx_b).is_empty(), "Joiner must not see own announcement");
    assert!(texts(&mut rx_c).is_empty(), "Other rooms must not see it");

    let mut lobby: Vec<_> = state
        .users_in_room("lobby")
        .await
        .into_iter()
        .map(|p| p.name)
        .collect();
    lobby.sort();
    assert_eq!(lobby, vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_duplicate_name_is_acked_to_sender_only() {
    let state = chat_state();
    let (a, mut rx_a) = state.connect().await;
    let (b, mut rx_b) = state.connect().await;
    handle_chat_event(join("alice", "lobby"), &a, &state).await;
    drain_chat(&mut rx_a);
    drain_chat(&mut rx_b);

    let reply = handle_chat_event(
        ClientFrame::with_ack(
            ChatClientEvent::Join {
                name: " ALICE".to_string(),
                room: "lobby ".to_string(),
            },
            11,
        ),
        &b,
        &state,
    )
    .await;

    assert_eq!(
        reply,
        Some(ChatServerMessage::Ack {
            id: Some(11),
            ok: false,
            msg: "Username is already taken!".to_string(),
        })
    );
    assert!(state.get_user(&b).await.is_none());
    assert!(drain_chat(&mut rx_a).is_empty());
    assert!(drain_chat(&mut rx_b).is_empty());
}

#[tokio::test]
async fn test_message_reaches_everyone_including_sender() {
    let state = chat_state();
    let (a, mut rx_a) = state.connect().await;
    let (_b, mut rx_b) = state.connect().await;
    handle_chat_event(join("alice", "lobby"), &a, &state).await;
    // B never joins a room and still receives global messages
    drain_chat(&mut rx_a);
    drain_chat(&mut rx_b);

    let before = chrono::Utc::now().timestamp_millis();
    let reply = handle_chat_event(send("hello", 1), &a, &state).await;

    assert_eq!(
        reply,
        Some(ChatServerMessage::Ack {
            id: Some(1),
            ok: true,
            msg: DELIVERED_TEXT.to_string(),
        })
    );

    for rx in [&mut rx_a, &mut rx_b] {
        match drain_chat(rx).as_slice() {
            [ChatServerMessage::Message(m)] => {
                assert_eq!(m.text, "hello");
                assert!(m.created_at >= before);
            }
            other => panic!("Expected one message, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_profane_message_is_not_fanned_out() {
    let state = chat_state();
    let (a, mut rx_a) = state.connect().await;
    let (_b, mut rx_b) = state.connect().await;
    drain_chat(&mut rx_a);

    let reply = handle_chat_event(send("you badword", 2), &a, &state).await;

    assert_eq!(
        reply,
        Some(ChatServerMessage::Ack {
            id: Some(2),
            ok: false,
            msg: "Profanity is not allowed!".to_string(),
        })
    );
    assert!(drain_chat(&mut rx_a).is_empty());
    assert!(drain_chat(&mut rx_b).is_empty());
}

#[tokio::test]
async fn test_connect_and_disconnect_announcements() {
    let state = chat_state();
    let (a, mut rx_a) = state.connect().await;
    let (b, mut rx_b) = state.connect().await;
    let (_c, mut rx_c) = state.connect().await;

    assert_eq!(texts(&mut rx_a), vec![WELCOME_TEXT, WELCOME_TEXT]);
    assert_eq!(texts(&mut rx_b), vec![WELCOME_TEXT]);
    assert!(texts(&mut rx_c).is_empty());

    handle_chat_event(join("alice", "lobby"), &a, &state).await;
    handle_chat_event(join("bob", "lobby"), &b, &state).await;
    drain_chat(&mut rx_a);
    drain_chat(&mut rx_b);

    // Departure is announced process-wide, not only to the room
    let removed = state.disconnect(&a).await.expect("alice was joined");
    assert_eq!(removed.name, "alice");
    assert_eq!(texts(&mut rx_b), vec![LEFT_TEXT]);
    assert_eq!(texts(&mut rx_c), vec![LEFT_TEXT]);

    // The name is free again
    let (d, _rx_d) = state.connect().await;
    assert!(handle_chat_event(join("alice", "lobby"), &d, &state)
        .await
        .is_none());
}

#[tokio::test]
async fn test_unjoined_disconnect_is_not_an_error() {
    let state = chat_state();
    let (a, _rx_a) = state.connect().await;
    let (_b, mut rx_b) = state.connect().await;

    assert!(state.disconnect(&a).await.is_none());
    assert_eq!(texts(&mut rx_b), vec![LEFT_TEXT]);
    assert!(state.disconnect("never-connected").await.is_none());
    assert_eq!(state.connection_count().await, 1);
}

#[tokio::test]
async fn test_counter_sequence_seen_by_all_clients() {
    let state = CounterState::new();
    let (_a, mut rx_a) = state.connect().await;
    let (_b, mut rx_b) = state.connect().await;

    for event in [
        CounterClientEvent::Increment,
        CounterClientEvent::Increment,
        CounterClientEvent::Decrement,
    ] {
        assert!(handle_counter_event(ClientFrame::new(event), &state)
            .await
            .is_none());
    }

    let collect = |rx: &mut Outbox<CounterServerMessage>| {
        let mut seen = Vec::new();
        while let Ok(CounterServerMessage::CountUpdated { count }) = rx.try_recv() {
            seen.push(count);
        }
        seen
    };

    assert_eq!(collect(&mut rx_a), vec![0, 1, 2, 1]);
    assert_eq!(collect(&mut rx_b), vec![0, 1, 2, 1]);

    handle_counter_event(ClientFrame::new(CounterClientEvent::Reset), &state).await;
    assert_eq!(collect(&mut rx_a), vec![0]);
    assert_eq!(collect(&mut rx_b), vec![0]);
}

#[tokio::test]
async fn test_gateways_are_independent() {
    let first = chat_state();
    let second = chat_state();
    let (a, _rx_a) = first.connect().await;
    let (b, _rx_b) = second.connect().await;

    first.join(&a, "alice", "lobby").await.unwrap();
    second.join(&b, "alice", "lobby").await.unwrap();

    assert_eq!(first.users_in_room("lobby").await.len(), 1);
    assert_eq!(second.users_in_room("lobby").await.len(), 1);
}

#[tokio::test]
async fn test_http_room_users_and_health() {
    let state = AppState::new(Arc::new(WordListFilter::default()));
    let (a, _rx_a) = state.chat.connect().await;
    state.chat.join(&a, "Alice", "General").await.unwrap();
    state.counter.increment().await;

    let app = roomcast::router(state, None);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/rooms/general/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let users: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["name"], "alice");
    assert_eq!(users[0]["room"], "general");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["connections"], 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/counter")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let counter: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(counter["count"], 1);
}
