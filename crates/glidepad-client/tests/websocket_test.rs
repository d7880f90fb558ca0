//! Transport tests against a local WebSocket server.

use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use glidepad_client::{ConnectionEvent, endpoint_url, spawn_connection};
use glidepad_proto::{Button, Framing, SemanticAction, WireMessage};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(events: &mut mpsc::UnboundedReceiver<ConnectionEvent>) -> ConnectionEvent {
    timeout(WAIT, events.recv()).await.unwrap().unwrap()
}

#[tokio::test]
async fn writes_arrive_as_websocket_messages() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let mut received = Vec::new();
        while received.len() < 2 {
            match ws.next().await {
                Some(Ok(message)) => received.push(message),
                _ => break,
            }
        }
        received
    });

    let (tx, mut events) = mpsc::unbounded_channel();
    let connection = spawn_connection(7, endpoint_url("127.0.0.1", port), tx);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Opened { id: 7 });

    let click = Framing::Binary.encode(SemanticAction::Click { button: Button::Right }).unwrap();
    let scroll = Framing::Text.encode(SemanticAction::Scroll { dy: -1 }).unwrap();
    connection.send(click).unwrap();
    connection.send(scroll).unwrap();

    let received = timeout(WAIT, server).await.unwrap().unwrap();
    assert_eq!(received[0], Message::Binary(Bytes::from_static(&[0x03, 0x02])));
    assert_eq!(received[1].to_text().unwrap(), r#"{"msg_type":"scroll","delta_y":-1}"#);

    assert!(matches!(next_event(&mut events).await, ConnectionEvent::Closed { id: 7, .. }));
}

#[tokio::test]
async fn refused_connection_reports_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (tx, mut events) = mpsc::unbounded_channel();
    let connection = spawn_connection(1, endpoint_url("127.0.0.1", port), tx);

    let event = next_event(&mut events).await;
    assert!(matches!(event, ConnectionEvent::Closed { id: 1, .. }));
    assert!(connection.send(WireMessage::Text("{}".into())).is_err());
}

#[tokio::test]
async fn stalled_peer_never_blocks_sends() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // Completes the handshake, then holds the socket without reading.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let _ws = accept_async(stream).await.unwrap();
        std::future::pending::<()>().await;
    });

    let (tx, mut events) = mpsc::unbounded_channel();
    let connection = spawn_connection(3, endpoint_url("127.0.0.1", port), tx);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Opened { id: 3 });

    let movement = Framing::Binary.encode(SemanticAction::Move { dx: 1, dy: 1 }).unwrap();
    let burst = async {
        for _ in 0..64 {
            for _ in 0..10_000 {
                connection.send(movement.clone()).unwrap();
            }
            // Let the socket task fill the kernel buffers.
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    timeout(WAIT, burst).await.unwrap();

    assert!(events.try_recv().is_err());
    connection.stop();
    server.abort();
}
