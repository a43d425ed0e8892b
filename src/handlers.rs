// handlers.rs

use crate::{
    dashboard::{self, Control},
    error::AppError,
    models::{AppState, DashboardView, WsMessage},
    utils,
};
use axum::{
    Json,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Run one control and push the result to every connected client.
async fn run_control(state: &AppState, control: Control) -> DashboardView {
    let view = dashboard::interact(state, control).await;
    state.broadcast(&WsMessage::Dashboard(view.clone()));
    view
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, description = "Current device states", body = DashboardView))
)]
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(dashboard::snapshot(&state).await)
}

#[utoipa::path(
    post,
    path = "/api/devices/{device_id}/{action}",
    params(
        ("device_id" = String, Path, description = "light, fan, ac or led; others are ignored"),
        ("action" = String, Path, description = "on or off")
    ),
    responses(
        (status = 200, description = "Dashboard after the press", body = DashboardView),
        (status = 404, description = "Unknown action", body = WsMessage)
    )
)]
pub async fn press_device(
    State(state): State<Arc<AppState>>,
    Path((device_id, action)): Path<(String, String)>,
) -> Result<Json<DashboardView>, AppError> {
    let control = match action.as_str() {
        "on" => Control::TurnOn(device_id),
        "off" => Control::TurnOff(device_id),
        other => return Err(AppError::UnknownControl(other.to_string())),
    };
    Ok(Json(run_control(&state, control).await))
}

#[utoipa::path(
    post,
    path = "/api/controls/{control}",
    params(("control" = String, Path, description = "A control id from the dashboard")),
    responses(
        (status = 200, description = "Dashboard after the press", body = DashboardView),
        (status = 404, description = "Unknown control id", body = WsMessage)
    )
)]
pub async fn press_control(
    State(state): State<Arc<AppState>>,
    Path(control): Path<String>,
) -> Result<Json<DashboardView>, AppError> {
    let control = control.parse::<Control>()?;
    Ok(Json(run_control(&state, control).await))
}

#[utoipa::path(
    post,
    path = "/api/listen",
    responses(
        (status = 200, description = "Dashboard after the voice command", body = DashboardView)
    )
)]
pub async fn listen(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(run_control(&state, Control::Listen).await)
}

pub async fn handle_client_ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    if state.clients.len() >= state.max_connections {
        warn!(limit = state.max_connections, "Rejecting client connection");
        return AppError::TooManyConnections.into_response();
    }
    info!("Client connection attempt");
    ws.on_upgrade(|socket| handle_client(socket, state))
}

async fn handle_client(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = Uuid::new_v4();
    let (tx, mut rx) = broadcast::channel(100);
    state.clients.insert(client_id, tx.clone());
    info!(%client_id, "Client connected");

    let _ = tx.send(WsMessage::Dashboard(dashboard::snapshot(&state).await));

    let send_task = tokio::spawn(async move {
        loop {
            let msg = match rx.recv().await {
                Ok(msg) => msg,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%client_id, skipped, "Client lagging behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to encode message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn({
        let state = Arc::clone(&state);
        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                let text = match msg {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };
                match serde_json::from_str::<WsMessage>(text.as_str()) {
                    Ok(WsMessage::TurnOn { device_id }) => {
                        run_control(&state, Control::TurnOn(device_id)).await;
                    }
                    Ok(WsMessage::TurnOff { device_id }) => {
                        run_control(&state, Control::TurnOff(device_id)).await;
                    }
                    Ok(WsMessage::Press { control }) => match control.parse::<Control>() {
                        Ok(control) => {
                            run_control(&state, control).await;
                        }
                        Err(e) => {
                            let _ = tx.send(e.to_message());
                        }
                    },
                    Ok(WsMessage::Listen) => {
                        run_control(&state, Control::Listen).await;
                    }
                    Ok(WsMessage::Refresh) => {
                        let _ = tx.send(WsMessage::Dashboard(dashboard::snapshot(&state).await));
                    }
                    Ok(_) => {
                        let _ = tx.send(
                            AppError::Validation("unexpected message from client".into())
                                .to_message(),
                        );
                    }
                    Err(e) => {
                        error!("Invalid message format: {}", e);
                        let _ = tx.send(
                            AppError::Validation(format!("Invalid message format: {e}"))
                                .to_message(),
                        );
                    }
                }
            }
        }
    });

    tokio::pin!(send_task, recv_task);
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    };

    utils::cleanup_client_connection(client_id, &state).await;
}
