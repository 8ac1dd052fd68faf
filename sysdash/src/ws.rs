//! WebSocket transport: opens the collector's push channel and yields its text frames.

use futures::future::{self, LocalBoxFuture};
use futures_util::{FutureExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use url::Url;

use crate::connection::{Channel, Connector};
use crate::error::TransportError;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Connect to the collector and return the WS stream
pub async fn connect(url: &str) -> Result<WsStream, TransportError> {
    let (ws, _) = connect_async(url)
        .await
        .map_err(|e| TransportError::Open(e.to_string()))?;
    Ok(ws)
}

/// The dashboard only reads; control frames are handled by tungstenite and skipped here.
pub fn into_channel(ws: WsStream) -> Channel {
    ws.filter_map(|msg| future::ready(frame_text(msg)))
        .boxed_local()
}

fn frame_text(
    msg: Result<Message, tungstenite::Error>,
) -> Option<Result<String, TransportError>> {
    match msg {
        Ok(Message::Text(text)) => Some(Ok(text)),
        Ok(Message::Binary(bytes)) => String::from_utf8(bytes).ok().map(Ok),
        Ok(_) => None,
        Err(e) => Some(Err(TransportError::Stream(e.to_string()))),
    }
}

#[derive(Debug, Clone)]
pub struct WsConnector {
    url: Url,
}

impl WsConnector {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Connector for WsConnector {
    fn open(&self) -> LocalBoxFuture<'static, Result<Channel, TransportError>> {
        let url = self.url.to_string();
        async move { connect(&url).await.map(into_channel) }.boxed_local()
    }
}
