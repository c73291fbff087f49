//! Room-based notifications
//!
//! Socket.io layer for pushing events to connected back-office and
//! storefront clients. Clients join rooms named `role:<role>` or
//! `user:<id>`; emits are best-effort and only logged on failure.

use serde::{Deserialize, Serialize};
use shared::models::Role;
use socketioxide::{
    SocketIo,
    extract::{Data, SocketRef},
    layer::SocketIoLayer,
};

#[derive(Debug, Deserialize)]
struct RoomRequest {
    room: String,
}

/// Cloneable handle for emitting notification events
#[derive(Clone)]
pub struct Notifier {
    io: SocketIo,
}

impl Notifier {
    /// Build the socket.io layer and the emit handle.
    /// Room membership is client-driven: `join` / `leave` with a room name.
    pub fn new_layer() -> (SocketIoLayer, Notifier) {
        let (layer, io) = SocketIo::new_layer();

        io.ns("/", async |socket: SocketRef| {
            socket.on("join", async |socket: SocketRef, Data::<RoomRequest>(req)| {
                let _ = socket.join(req.room);
            });
            socket.on("leave", async |socket: SocketRef, Data::<RoomRequest>(req)| {
                let _ = socket.leave(req.room);
            });
        });

        (layer, Notifier { io })
    }

    /// Emit an event to every member of the given roles
    pub async fn notify_roles<T: Serialize>(&self, roles: &[Role], event: &str, payload: &T) {
        for role in roles {
            let room = match serde_json::to_value(role) {
                Ok(serde_json::Value::String(name)) => format!("role:{name}"),
                _ => continue,
            };
            if let Err(e) = self.io.to(room).emit(event.to_owned(), payload).await {
                tracing::warn!(event, ?role, "notification emit failed: {e}");
            }
        }
    }

    /// Emit an event to a single user's room
    pub async fn notify_user<T: Serialize>(&self, user_id: i64, event: &str, payload: &T) {
        let room = format!("user:{user_id}");
        if let Err(e) = self.io.to(room).emit(event.to_owned(), payload).await {
            tracing::warn!(event, user_id, "notification emit failed: {e}");
        }
    }
}
