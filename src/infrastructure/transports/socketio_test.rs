use std::time::Duration;

use anyhow::Result;
use futures::SinkExt;
use futures::StreamExt;
use test_utils::engine_open_fixture;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use super::saturating_attempts;
use super::websocket_url;
use super::SocketIo;
use crate::domain::models::ClientEvent;
use crate::domain::models::Event;
use crate::domain::models::ServerEvent;
use crate::domain::models::Transport;

async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Option<Event> {
    return time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .ok()
        .flatten();
}

#[test]
fn it_builds_websocket_urls() -> Result<()> {
    insta::assert_snapshot!(
        websocket_url("http://localhost:3000")?,
        @"ws://localhost:3000/socket.io/?EIO=4&transport=websocket"
    );
    insta::assert_snapshot!(
        websocket_url("https://chat.example.com/")?,
        @"wss://chat.example.com/socket.io/?EIO=4&transport=websocket"
    );
    insta::assert_snapshot!(
        websocket_url("ws://127.0.0.1:8080")?,
        @"ws://127.0.0.1:8080/socket.io/?EIO=4&transport=websocket"
    );
    return Ok(());
}

#[test]
fn it_rejects_unsupported_schemes() {
    assert!(websocket_url("ftp://localhost").is_err());
    assert!(websocket_url("localhost:3000").is_err());
}

#[test]
fn it_saturates_oversized_attempt_counts() {
    assert_eq!(saturating_attempts(5), 5);
    assert_eq!(saturating_attempts(u64::from(u32::MAX) + 1), u32::MAX);
}

#[tokio::test]
async fn it_fails_to_emit_before_connecting() {
    let transport = SocketIo::new("http://localhost:3000", 0, Duration::from_millis(10));
    assert!(transport.emit(ClientEvent::StartChat).await.is_err());
}

#[tokio::test]
async fn it_closes_twice_without_error() -> Result<()> {
    let mut transport = SocketIo::new("http://localhost:3000", 0, Duration::from_millis(10));
    transport.close().await?;
    transport.close().await?;
    return Ok(());
}

#[tokio::test]
async fn it_reports_failure_after_exhausting_attempts() -> Result<()> {
    // Bind then drop so nothing is listening on the port.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let mut transport = SocketIo::new(&format!("http://{addr}"), 2, Duration::from_millis(10));
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    transport.connect(tx).await?;

    let mut connect_errors = 0;
    loop {
        match next_event(&mut rx).await {
            Some(Event::TransportConnectError(_)) => connect_errors += 1,
            Some(Event::TransportReconnectFailed()) => break,
            other => panic!("unexpected event {other:?}"),
        }
    }

    assert_eq!(connect_errors, 3);
    transport.close().await?;
    return Ok(());
}

#[tokio::test]
async fn it_exchanges_events_with_a_socketio_server() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        ws.send(WsMessage::Text(engine_open_fixture("engine-sid")))
            .await
            .unwrap();
        let connect = ws.next().await.unwrap().unwrap();
        assert_eq!(connect, WsMessage::Text("40".to_string()));
        ws.send(WsMessage::Text(r#"40{"sid":"socket-sid"}"#.to_string()))
            .await
            .unwrap();

        ws.send(WsMessage::Text("2".to_string())).await.unwrap();
        ws.send(WsMessage::Text(r#"42["unknown",{}]"#.to_string()))
            .await
            .unwrap();
        ws.send(WsMessage::Text(r#"42["typing",{"sessionId":"assistant"}]"#.to_string()))
            .await
            .unwrap();
        ws.send(WsMessage::Text(
            r#"42["response",{"message":"Hello there"}]"#.to_string(),
        ))
        .await
        .unwrap();

        let mut received = vec![];
        while let Some(Ok(frame)) = ws.next().await {
            if let WsMessage::Text(text) = frame {
                let done = text == "41";
                received.push(text);
                if done {
                    break;
                }
            }
        }
        return received;
    });

    let mut transport = SocketIo::new(&format!("http://{addr}"), 0, Duration::from_millis(10));
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    transport.connect(tx).await?;

    assert_eq!(
        next_event(&mut rx).await,
        Some(Event::TransportOpen("socket-sid".to_string()))
    );
    assert_eq!(
        next_event(&mut rx).await,
        Some(Event::Remote(ServerEvent::Typing("assistant".to_string())))
    );
    assert_eq!(
        next_event(&mut rx).await,
        Some(Event::Remote(ServerEvent::Response("Hello there".to_string())))
    );

    transport.emit(ClientEvent::StartChat).await?;
    transport
        .emit(ClientEvent::Message("Hi".to_string()))
        .await?;
    time::sleep(Duration::from_millis(50)).await;
    transport.close().await?;

    let received = time::timeout(Duration::from_secs(5), server).await??;
    assert_eq!(
        received,
        vec![
            "3".to_string(),
            r#"42["startChat"]"#.to_string(),
            r#"42["message",{"message":"Hi"}]"#.to_string(),
            "41".to_string(),
        ]
    );

    return Ok(());
}

#[tokio::test]
async fn it_drops_events_queued_while_reconnecting() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let mut received = vec![];
        for sid in ["first-sid", "second-sid"] {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.send(WsMessage::Text(engine_open_fixture("engine-sid")))
                .await
                .unwrap();
            let _connect = ws.next().await.unwrap().unwrap();
            ws.send(WsMessage::Text(format!(r#"40{{"sid":"{sid}"}}"#)))
                .await
                .unwrap();

            if sid == "first-sid" {
                ws.close(None).await.unwrap();
                continue;
            }

            while let Some(Ok(frame)) = ws.next().await {
                if let WsMessage::Text(text) = frame {
                    let done = text == "41";
                    received.push(text);
                    if done {
                        break;
                    }
                }
            }
        }
        return received;
    });

    let mut transport = SocketIo::new(&format!("http://{addr}"), 1, Duration::from_millis(200));
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    transport.connect(tx).await?;

    assert_eq!(
        next_event(&mut rx).await,
        Some(Event::TransportOpen("first-sid".to_string()))
    );
    assert!(matches!(
        next_event(&mut rx).await,
        Some(Event::TransportDisconnect(_))
    ));

    transport
        .emit(ClientEvent::Message("sent while offline".to_string()))
        .await?;

    assert_eq!(
        next_event(&mut rx).await,
        Some(Event::TransportOpen("second-sid".to_string()))
    );
    transport.emit(ClientEvent::StartChat).await?;
    time::sleep(Duration::from_millis(50)).await;
    transport.close().await?;

    let received = time::timeout(Duration::from_secs(5), server).await??;
    assert_eq!(
        received,
        vec![r#"42["startChat"]"#.to_string(), "41".to_string()]
    );

    return Ok(());
}
