//! Drives the gateway over real WebSocket connections.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use pairline_gateway::ws_protocol::ServerMessage;
use pairline_gateway::{serve, GatewayState, Lobby, LobbyPolicy, MemoryModerationSink};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_gateway() -> SocketAddr {
    let lobby = Lobby::new(LobbyPolicy::default(), Arc::new(MemoryModerationSink::new())).into_shared();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, GatewayState::new(lobby)));
    addr
}

async fn open(addr: SocketAddr) -> Socket {
    let (socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    socket
}

async fn send(socket: &mut Socket, frame: serde_json::Value) {
    socket.send(Message::Text(frame.to_string().into())).await.unwrap();
}

/// Next frame that is not an online-count gauge update.
async fn next_event(socket: &mut Socket) -> ServerMessage {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for frame")
            .expect("socket closed")
            .unwrap();
        let Message::Text(text) = msg else { continue };
        let parsed: ServerMessage = serde_json::from_str(text.as_str()).unwrap();
        if !matches!(parsed, ServerMessage::OnlineCount { .. }) {
            return parsed;
        }
    }
}

async fn welcome(socket: &mut Socket) -> pairline_core::ConnId {
    match next_event(socket).await {
        ServerMessage::Welcome { id } => id,
        other => panic!("expected welcome, got {other:?}"),
    }
}

#[tokio::test]
async fn pair_chat_and_leave() {
    let addr = spawn_gateway().await;
    let mut x = open(addr).await;
    let x_id = welcome(&mut x).await;

    send(&mut x, json!({"type": "join", "displayName": "Xan", "genderTag": "female"})).await;
    assert_eq!(next_event(&mut x).await, ServerMessage::Waiting);

    let mut y = open(addr).await;
    let y_id = welcome(&mut y).await;
    send(&mut y, json!({"type": "join", "name": "Yuri", "gender": "male"})).await;

    match next_event(&mut x).await {
        ServerMessage::Paired { partner_id, initiator, partner_profile } => {
            assert_eq!(partner_id, y_id);
            assert!(initiator);
            assert_eq!(partner_profile.display_name, "Yuri");
        }
        other => panic!("unexpected {other:?}"),
    }
    match next_event(&mut y).await {
        ServerMessage::Paired { partner_id, initiator, partner_profile } => {
            assert_eq!(partner_id, x_id);
            assert!(!initiator);
            assert_eq!(partner_profile.display_name, "Xan");
        }
        other => panic!("unexpected {other:?}"),
    }

    send(&mut x, json!({"type": "handshake-offer", "to": y_id, "sdp": {"type": "offer", "sdp": "v=0"}})).await;
    assert_eq!(
        next_event(&mut y).await,
        ServerMessage::HandshakeOffer {
            from: x_id,
            sdp: json!({"type": "offer", "sdp": "v=0"}),
        }
    );

    send(&mut y, json!({"type": "chat-message", "to": x_id, "text": "hello"})).await;
    assert_eq!(
        next_event(&mut x).await,
        ServerMessage::ChatMessage {
            from: y_id,
            from_name: "Yuri".into(),
            text: "hello".into(),
        }
    );

    y.close(None).await.unwrap();
    assert_eq!(next_event(&mut x).await, ServerMessage::PartnerLeft);
}

#[tokio::test]
async fn malformed_frame_gets_error_and_connection_survives() {
    let addr = spawn_gateway().await;
    let mut x = open(addr).await;
    welcome(&mut x).await;

    x.send(Message::Text("not json".into())).await.unwrap();
    assert!(matches!(next_event(&mut x).await, ServerMessage::Error { code, .. } if code == "bad_message"));

    send(&mut x, json!({"type": "ping"})).await;
    assert_eq!(next_event(&mut x).await, ServerMessage::Pong);
}
