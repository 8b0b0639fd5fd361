//! Integration tests: a real controller talking to an axum WebSocket peer.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use calypso_client::{
    command::{Command, FileSelection},
    event::SessionEvent,
    session::SessionController,
    settings::Toggle,
    state::ConnectionState,
    transport::WebSocketConnector,
};
use calypso_shared::wire::{Frame, FrameAssembler, InboundMessage, ScriptConvention};
use tokio::{sync::mpsc, time::timeout};

const TIMEOUT: Duration = Duration::from_secs(5);

/// What the peer saw on the wire
#[derive(Debug)]
enum Received {
    Frame(Frame),
    Closed,
}

#[derive(Clone)]
struct PeerState {
    received: mpsc::UnboundedSender<Received>,
    welcome: Option<&'static str>,
}

/// WebSocket peer recording every frame it receives
struct TestPeer {
    addr: SocketAddr,
    received: mpsc::UnboundedReceiver<Received>,
}

impl TestPeer {
    /// Start a peer on an ephemeral port, optionally greeting each client
    async fn start(welcome: Option<&'static str>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new()
            .route("/", get(ws_handler))
            .with_state(PeerState {
                received: tx,
                welcome,
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestPeer {
            addr,
            received: rx,
        }
    }

    fn url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    async fn next(&mut self) -> Received {
        timeout(TIMEOUT, self.received.recv())
            .await
            .expect("timed out waiting for the peer")
            .expect("peer channel closed")
    }

    async fn next_frame(&mut self) -> Frame {
        match self.next().await {
            Received::Frame(frame) => frame,
            Received::Closed => panic!("expected a frame, got close"),
        }
    }

    /// Decode frames until one logical message is complete
    async fn next_message(&mut self, assembler: &mut FrameAssembler) -> InboundMessage {
        loop {
            let frame = self.next_frame().await;
            if let Some(message) = assembler.push(frame).expect("malformed frame sequence") {
                return message;
            }
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<PeerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| record(socket, state))
}

async fn record(mut socket: WebSocket, state: PeerState) {
    if let Some(welcome) = state.welcome {
        if socket.send(Message::Text(welcome.into())).await.is_err() {
            return;
        }
    }

    // keep reading after a close frame so the close reply gets flushed
    while let Some(Ok(message)) = socket.recv().await {
        let received = match message {
            Message::Text(text) => Received::Frame(Frame::Text(text.to_string())),
            Message::Binary(data) => Received::Frame(Frame::Binary(data.to_vec())),
            Message::Close(_) => Received::Closed,
            _ => continue,
        };
        let _ = state.received.send(received);
    }
}

async fn next_event(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
    timeout(TIMEOUT, events.recv())
        .await
        .expect("timed out waiting for a session event")
        .expect("event channel closed")
}

/// Create a controller and drive it until the connection is open
async fn open_session(
    url: &str,
    convention: ScriptConvention,
) -> (SessionController, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller =
        SessionController::new(url, Arc::new(WebSocketConnector), tx).with_convention(convention);
    controller.initialize();

    let event = next_event(&mut rx).await;
    controller.handle(event).await.unwrap();
    assert_eq!(controller.state(), ConnectionState::Open);

    (controller, rx)
}

/// Handle events until the file read completes and the upload is sent
async fn finish_file_read(
    controller: &mut SessionController,
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
) {
    loop {
        let event = next_event(events).await;
        let is_file = matches!(
            event,
            SessionEvent::FileLoaded { .. } | SessionEvent::FileFailed { .. }
        );
        controller.handle(event).await.unwrap();
        if is_file {
            return;
        }
    }
}

#[tokio::test]
async fn test_settings_reach_peer_in_order() {
    // テスト項目: 設定がアナウンスと 7 つの真偽値として届き、受信側で復元できる
    // given (前提条件):
    let mut peer = TestPeer::start(None).await;
    let (mut controller, _events) = open_session(&peer.url(), ScriptConvention::Single).await;
    controller.settings_mut().set(Toggle::Cutscenes, true);
    controller.settings_mut().set(Toggle::Music, true);

    // when (操作):
    controller.send_settings().await.unwrap();

    // then (期待する結果):
    assert_eq!(peer.next_frame().await, Frame::text("type: settings"));
    let mut values = Vec::new();
    for _ in 0..7 {
        values.push(peer.next_frame().await);
    }
    let expected: Vec<Frame> = ["false", "true", "false", "false", "false", "false", "true"]
        .into_iter()
        .map(Frame::text)
        .collect();
    assert_eq!(values, expected);
}

#[tokio::test]
async fn test_file_upload_frames() {
    // テスト項目: N バイトのファイルがアナウンス、名前、N の 10 進文字列、N バイトのバイナリの順で届く
    // given (前提条件):
    let mut peer = TestPeer::start(None).await;
    let (mut controller, mut events) = open_session(&peer.url(), ScriptConvention::Single).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glitchless.stas");
    let content: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, &content).unwrap();

    // when (操作):
    controller
        .send_file(Some(FileSelection::new(vec![path])))
        .await
        .unwrap();
    finish_file_read(&mut controller, &mut events).await;

    // then (期待する結果):
    assert_eq!(peer.next_frame().await, Frame::text("type: script"));
    assert_eq!(peer.next_frame().await, Frame::text("glitchless.stas"));
    assert_eq!(peer.next_frame().await, Frame::text("70000"));
    assert_eq!(peer.next_frame().await, Frame::Binary(content));
}

#[tokio::test]
async fn test_split_file_upload_is_reassembled() {
    // テスト項目: 分割形式のアップロードが受信側で 1 つのスクリプトに復元される
    // given (前提条件):
    let mut peer = TestPeer::start(None).await;
    let (mut controller, mut events) = open_session(&peer.url(), ScriptConvention::Split).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cap.stas");
    std::fs::write(&path, b"1 NONE 0;0 0;0\n").unwrap();
    let mut assembler = FrameAssembler::new();

    // when (操作):
    controller
        .send_file(Some(FileSelection::new(vec![path])))
        .await
        .unwrap();
    finish_file_read(&mut controller, &mut events).await;

    // then (期待する結果):
    assert_eq!(
        peer.next_message(&mut assembler).await,
        InboundMessage::ScriptInfo {
            name: "cap.stas".to_string()
        }
    );
    assert_eq!(
        peer.next_message(&mut assembler).await,
        InboundMessage::Script {
            name: "cap.stas".to_string(),
            data: b"1 NONE 0;0 0;0\n".to_vec(),
        }
    );
    assert!(!assembler.is_pending());
}

#[tokio::test]
async fn test_consecutive_actions_do_not_interleave() {
    // テスト項目: 連続した操作のフレームが混ざらず、操作順に復元される
    // given (前提条件):
    let mut peer = TestPeer::start(None).await;
    let (mut controller, mut events) = open_session(&peer.url(), ScriptConvention::Single).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moon.stas");
    std::fs::write(&path, [42u8; 10]).unwrap();
    let mut assembler = FrameAssembler::new();

    // when (操作):
    controller
        .handle(SessionEvent::Command(Command::File(Some(FileSelection::new(
            vec![path],
        )))))
        .await
        .unwrap();
    finish_file_read(&mut controller, &mut events).await;
    controller
        .handle(SessionEvent::Command(Command::Greeting))
        .await
        .unwrap();
    controller
        .handle(SessionEvent::Command(Command::Settings))
        .await
        .unwrap();

    // then (期待する結果):
    assert!(matches!(
        peer.next_message(&mut assembler).await,
        InboundMessage::Script { ref name, ref data } if name == "moon.stas" && data.len() == 10
    ));
    assert_eq!(
        peer.next_message(&mut assembler).await,
        InboundMessage::Greeting("hi :3".to_string())
    );
    assert!(matches!(
        peer.next_message(&mut assembler).await,
        InboundMessage::Settings(_)
    ));
    assert!(!assembler.is_pending());
}

#[tokio::test]
async fn test_request_close() {
    // テスト項目: requestClose で close アナウンスが 1 つ届き、その後接続が閉じられる
    // given (前提条件):
    let mut peer = TestPeer::start(None).await;
    let (mut controller, mut events) = open_session(&peer.url(), ScriptConvention::Single).await;

    // when (操作):
    controller.request_close().await.unwrap();
    let closed_event = next_event(&mut events).await;
    controller.handle(closed_event).await.unwrap();

    // then (期待する結果):
    assert_eq!(peer.next_frame().await, Frame::text("type: close"));
    assert!(matches!(peer.next().await, Received::Closed));
    assert_eq!(controller.state(), ConnectionState::Closed);
    assert_eq!(controller.log().render(), "onclose<br>onopen<br>");
}

#[tokio::test]
async fn test_server_message_is_logged() {
    // テスト項目: サーバーからのメッセージが onmessage としてエスケープされて記録される
    // given (前提条件):
    let peer = TestPeer::start(Some("connected! <3")).await;
    let (mut controller, mut events) = open_session(&peer.url(), ScriptConvention::Single).await;

    // when (操作):
    let event = next_event(&mut events).await;
    controller.handle(event).await.unwrap();

    // then (期待する結果):
    assert_eq!(
        controller.log().render(),
        "onmessage: connected! &lt;3<br>onopen<br>"
    );
}

#[tokio::test]
async fn test_connection_refused() {
    // テスト項目: 接続できない場合、onerror と onclose が記録され、送信は拒否される
    // given (前提条件):
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (tx, mut events) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(
        format!("ws://{}/", addr),
        Arc::new(WebSocketConnector),
        tx,
    );

    // when (操作):
    controller.initialize();
    for _ in 0..2 {
        let event = next_event(&mut events).await;
        controller.handle(event).await.unwrap();
    }
    let send_result = controller.send_greeting().await;

    // then (期待する結果):
    assert_eq!(controller.state(), ConnectionState::Closed);
    assert_eq!(controller.log().render(), "onclose<br>onerror<br>");
    assert!(send_result.is_err());
}
