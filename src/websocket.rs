use crate::controller::Studio;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use warp::ws::Message;
use warp::Filter;

// `GET /ws`: the current state first, then every change
pub fn events_route(
    studio: Studio,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .map(move |ws: warp::ws::Ws| {
            let (current, rx) = studio.subscribe_from_current();
            ws.on_upgrade(move |socket| websocket_handler(socket, current, rx))
        })
}

async fn websocket_handler(
    ws: warp::ws::WebSocket,
    current: Option<String>,
    mut rx: broadcast::Receiver<String>,
) {
    log::debug!("New WebSocket connection established");
    let (mut ws_tx, mut ws_rx) = ws.split();

    // A page that connects after the last transition still learns where things stand
    if let Some(event) = current {
        if let Err(e) = ws_tx.send(Message::text(event)).await {
            log::warn!("WebSocket send error: {}", e);
            return;
        }
    }

    // Handle incoming messages
    let mut receive_task = tokio::spawn(async move {
        while let Some(result) = ws_rx.next().await {
            match result {
                Ok(msg) => {
                    if msg.is_close() {
                        log::debug!("WebSocket connection closed by client");
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("WebSocket receive error: {}", e);
                    break;
                }
            }
        }
    });

    // Forward state events to the socket
    let mut forward_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = ws_tx.send(Message::text(event)).await {
                        log::warn!("WebSocket send error: {}", e);
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("WebSocket client lagged, {} events skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut receive_task => forward_task.abort(),
        _ = &mut forward_task => receive_task.abort(),
    }
}
