//! WebSocket channel to the UI server.
//!
//! Inbound text frames are whole trees; outbound frames are `ClientEvent`s.
//! Events sent while the channel is not open are dropped, never queued.

use crate::widget::EventSink;
use futures::{SinkExt, StreamExt};
use shared::{ClientEvent, UINode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};

const SOCKET_PATH: &str = "/ws";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

/// Socket URL for a page served from `origin`: same host, `ws`/`wss` scheme,
/// path `/ws`, and the page path as the `path` query when there is one.
pub fn socket_url(origin: &str, page_path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let base = if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        origin.to_string()
    };
    let page = page_path.trim_start_matches('/');
    if page.is_empty() {
        format!("{base}{SOCKET_PATH}")
    } else {
        format!("{base}{SOCKET_PATH}?path={}", urlencoding::encode(page))
    }
}

enum Outbound {
    Frame(String),
    Close,
}

/// Handle to one connection attempt. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct ChannelHandle {
    state: Arc<watch::Sender<ChannelState>>,
    /// Set once by `close`; the server hanging up does not set it.
    closed: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

/// Opens the channel in a background task and returns immediately.
///
/// `on_tree` runs for every inbound frame that parses as a tree, until the
/// channel closes. Malformed frames are dropped.
pub fn connect<F>(url: &str, on_tree: F) -> ChannelHandle
where
    F: FnMut(UINode) + Send + 'static,
{
    let (state, _) = watch::channel(ChannelState::Connecting);
    let state = Arc::new(state);
    let (outbound, outbound_rx) = mpsc::unbounded_channel();

    let url = url.to_string();
    let task_state = state.clone();
    tokio::spawn(async move {
        run_channel(&url, &task_state, outbound_rx, on_tree).await;
        task_state.send_replace(ChannelState::Closed);
    });

    ChannelHandle {
        state,
        closed: Arc::new(AtomicBool::new(false)),
        outbound,
    }
}

async fn run_channel<F>(
    url: &str,
    state: &watch::Sender<ChannelState>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    mut on_tree: F,
) where
    F: FnMut(UINode),
{
    let ws_stream = match connect_async(url).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            log::warn!("Failed to connect to {}: {}", url, e);
            return;
        }
    };
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    let opened = state.send_if_modified(|current| {
        if *current == ChannelState::Connecting {
            *current = ChannelState::Open;
            true
        } else {
            false
        }
    });
    if !opened {
        let _ = ws_tx.send(Message::Close(None)).await;
        return;
    }
    log::info!("Connected to {}", url);

    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Frame(json)) => {
                    if let Err(e) = ws_tx.send(Message::Text(json.into())).await {
                        log::error!("WebSocket send error: {}", e);
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            },
            message = ws_rx.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let tree = match UINode::from_json(text.as_str()) {
                        Ok(tree) => tree,
                        Err(e) => {
                            log::debug!("Dropping malformed frame: {}", e);
                            continue;
                        }
                    };
                    let open = *state.borrow() == ChannelState::Open;
                    if !open {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    on_tree(tree);
                }
                Some(Ok(Message::Binary(_))) => log::debug!("Dropping binary frame"),
                Some(Ok(Message::Close(_))) | None => {
                    log::info!("Server closed the channel");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("WebSocket error: {}", e);
                    break;
                }
            },
        }
    }
}

impl ChannelHandle {
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    /// Waits until the connection attempt settles on `Open` or `Closed`.
    pub async fn wait_ready(&self) -> ChannelState {
        let mut state = self.state.subscribe();
        match state.wait_for(|state| *state != ChannelState::Connecting).await {
            Ok(state) => *state,
            Err(_) => ChannelState::Closed,
        }
    }

    /// Sends one frame if the channel is open; otherwise the event is dropped.
    pub fn send(&self, event: ClientEvent) {
        if !self.is_open() {
            log::debug!(
                "Channel not open, dropping '{}' for '{}'",
                event.event,
                event.node_id
            );
            return;
        }
        match serde_json::to_string(&event) {
            Ok(json) => {
                if self.outbound.send(Outbound::Frame(json)).is_err() {
                    log::debug!("Channel task gone, dropping '{}'", event.event);
                }
            }
            Err(e) => log::error!("Failed to serialize event: {}", e),
        }
    }

    /// Reports a route change to the server.
    pub fn navigate(&self, path: &str) {
        self.send(ClientEvent::navigate(path));
    }

    /// Stops tree delivery and closes the socket. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.state.send_replace(ChannelState::Closed);
            let _ = self.outbound.send(Outbound::Close);
        }
    }

    /// True once `close` has been called on any clone.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl EventSink for ChannelHandle {
    fn send_event(&self, event: ClientEvent) {
        self.send(event);
    }
}

/// Trees received by a [`ConnectionAdapter`]. Ends as soon as the adapter is
/// closed, even if trees are still queued.
pub struct TreeStream {
    trees: mpsc::UnboundedReceiver<UINode>,
    channel: ChannelHandle,
}

impl TreeStream {
    /// Next tree, or `None` once the channel is closed locally or gone.
    /// Cancel-safe.
    pub async fn recv(&mut self) -> Option<UINode> {
        if self.channel.is_closed() {
            return None;
        }
        let tree = self.trees.recv().await?;
        (!self.channel.is_closed()).then_some(tree)
    }

    /// Next tree if one is already queued.
    pub fn try_recv(&mut self) -> Option<UINode> {
        if self.channel.is_closed() {
            return None;
        }
        self.trees.try_recv().ok()
    }
}

/// Channel whose trees arrive on a stream instead of a callback.
pub struct ConnectionAdapter {
    channel: ChannelHandle,
}

impl ConnectionAdapter {
    pub fn new(url: &str) -> (Self, TreeStream) {
        let (tree_sender, trees) = mpsc::unbounded_channel();
        let channel = connect(url, move |tree| {
            let _ = tree_sender.send(tree);
        });
        let stream = TreeStream {
            trees,
            channel: channel.clone(),
        };
        (Self { channel }, stream)
    }

    pub fn channel(&self) -> &ChannelHandle {
        &self.channel
    }

    pub fn send_event(&self, event: ClientEvent) {
        self.channel.send(event);
    }

    pub fn navigate(&self, path: &str) {
        self.channel.navigate(path);
    }

    pub fn close(&self) {
        self.channel.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    const TREE: &str = r#"{"id":"r","type":"VStack","props":{},"children":[
        {"id":"b","type":"Button","props":{"label":"Go","events":{"click":true}},"children":[]}
    ]}"#;

    async fn local_server() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws", listener.local_addr().unwrap());
        (listener, url)
    }

    #[test]
    fn test_socket_url() {
        assert_eq!(socket_url("http://localhost:8000", ""), "ws://localhost:8000/ws");
        assert_eq!(socket_url("https://example.com/", "/"), "wss://example.com/ws");
        assert_eq!(
            socket_url("http://localhost:8000", "/settings"),
            "ws://localhost:8000/ws?path=settings"
        );
        assert_eq!(
            socket_url("https://example.com", "reports/q 1"),
            "wss://example.com/ws?path=reports%2Fq%201"
        );
    }

    #[tokio::test]
    async fn test_malformed_frame_dropped_then_tree_delivered() {
        let (listener, url) = local_server().await;
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            ws.send(Message::Text("{not json".into())).await.unwrap();
            ws.send(Message::Binary(vec![1, 2, 3].into())).await.unwrap();
            ws.send(Message::Text(TREE.into())).await.unwrap();
            // Hold the socket until the client hangs up.
            while let Some(Ok(message)) = ws.next().await {
                if message.is_close() {
                    break;
                }
            }
        });

        let (adapter, mut trees) = ConnectionAdapter::new(&url);
        let tree = tokio::time::timeout(Duration::from_secs(5), trees.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tree.id, "r");
        assert_eq!(tree.children[0].id, "b");

        adapter.close();
        assert_eq!(adapter.channel().state(), ChannelState::Closed);
        server.await.unwrap();
        assert!(trees.try_recv().is_none());
        assert!(trees.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_close_stops_queued_trees() {
        let (listener, url) = local_server().await;
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            for id in ["t0", "t1", "t2"] {
                let tree = format!(r#"{{"id":"{id}","type":"Text","props":{{}},"children":[]}}"#);
                ws.send(Message::Text(tree.into())).await.unwrap();
            }
            while let Some(Ok(message)) = ws.next().await {
                if message.is_close() {
                    break;
                }
            }
        });

        let (adapter, mut trees) = ConnectionAdapter::new(&url);
        let first = tokio::time::timeout(Duration::from_secs(5), trees.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.id, "t0");

        // Let the remaining trees queue up before closing.
        tokio::time::sleep(Duration::from_millis(200)).await;
        adapter.close();
        assert_eq!(adapter.channel().state(), ChannelState::Closed);

        assert!(trees.try_recv().is_none());
        assert!(trees.recv().await.is_none());
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_event_sent_while_connecting_is_dropped() {
        let (listener, url) = local_server().await;
        let (handshake_tx, handshake_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            // Hold the handshake until the client has tried to send.
            handshake_rx.await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let mut texts = Vec::new();
            while let Some(Ok(message)) = ws.next().await {
                match message {
                    Message::Text(text) => texts.push(text.as_str().to_string()),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            texts
        });

        let channel = connect(&url, |_| {});
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(channel.state(), ChannelState::Connecting);
        channel.send(ClientEvent::new("b", "click", None));

        handshake_tx.send(()).unwrap();
        assert_eq!(channel.wait_ready().await, ChannelState::Open);
        channel.close();

        let texts = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert!(texts.is_empty(), "unexpected frames: {texts:?}");
    }

    #[tokio::test]
    async fn test_events_reach_server_only_while_open() {
        let (listener, url) = local_server().await;
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let mut texts = Vec::new();
            while let Some(Ok(message)) = ws.next().await {
                match message {
                    Message::Text(text) => texts.push(text.as_str().to_string()),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            texts
        });

        let channel = connect(&url, |_| {});
        assert_eq!(channel.wait_ready().await, ChannelState::Open);

        channel.send(ClientEvent::new("s", "change", Some(json!(7))));
        channel.navigate("settings");
        channel.close();
        channel.send(ClientEvent::new("b", "click", None));

        let texts = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        let frames: Vec<serde_json::Value> = texts
            .iter()
            .map(|text| serde_json::from_str(text).unwrap())
            .collect();
        assert_eq!(
            frames,
            vec![
                json!({"event": "change", "nodeId": "s", "value": 7}),
                json!({"event": "navigate", "nodeId": "__route__", "value": "settings"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_settles_closed() {
        let (listener, url) = local_server().await;
        drop(listener);

        let channel = connect(&url, |_| {});
        assert_eq!(channel.wait_ready().await, ChannelState::Closed);
        channel.send(ClientEvent::new("b", "click", None));
        assert!(!channel.is_open());
    }
}
