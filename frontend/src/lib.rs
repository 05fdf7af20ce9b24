//! Headless renderer for server-driven UI trees.
//!
//! The remote owner pushes complete `UINode` trees over one WebSocket; the
//! [`App`] keeps the latest tree, renders it through the [`DispatchEngine`]
//! and forwards user interactions back as [`shared::ClientEvent`] frames when
//! the node's event gate allows it.

pub mod app;
pub mod components;
pub mod connection;
pub mod dispatch;
pub mod gate;
pub mod props;
pub mod upload;
pub mod widget;

pub use app::{App, View};
pub use connection::{ChannelHandle, ChannelState, ConnectionAdapter, TreeStream, connect, socket_url};
pub use dispatch::{Component, DispatchEngine, NodeHandler};
pub use gate::{EventGate, is_enabled};
pub use props::Props;
pub use widget::{EventSink, InteractError, Interaction, Outcome, Outlet, Reaction, Widget, WidgetKind};
