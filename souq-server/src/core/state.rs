//! Shared server state

use std::sync::Arc;

use sqlx::SqlitePool;
use socketioxide::layer::SocketIoLayer;

use crate::clients::{
    HttpMailer, HttpShippingClient, HttpSmsClient, Mailer, MoyasarClient, PaymentGateway,
    ShippingProvider, SmsSender,
};
use crate::core::Config;
use crate::db::DbService;
use crate::notify::Notifier;
use crate::utils::AppResult;

/// Application state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub payment: Arc<dyn PaymentGateway>,
    pub shipping: Arc<dyn ShippingProvider>,
    pub mailer: Arc<dyn Mailer>,
    pub sms: Arc<dyn SmsSender>,
    pub notifier: Notifier,
}

impl ServerState {
    /// Open the database, build the production clients and the socket.io
    /// layer. The layer must be attached to the router by the caller.
    pub async fn initialize(config: &Config) -> AppResult<(Self, SocketIoLayer)> {
        let db = DbService::new(&config.database_path).await?;
        let (layer, notifier) = Notifier::new_layer();

        let state = Self {
            config: config.clone(),
            pool: db.pool,
            payment: Arc::new(MoyasarClient::new(config)),
            shipping: Arc::new(HttpShippingClient::new(config)),
            mailer: Arc::new(HttpMailer::new(config)),
            sms: Arc::new(HttpSmsClient::new(config)),
            notifier,
        };
        Ok((state, layer))
    }
}
