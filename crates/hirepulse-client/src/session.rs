//! One logged-in user's notification session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hirepulse_core::config::ClientConfig;
use hirepulse_core::result::AppResult;

use crate::alert::{AlertAdapter, AlertSink, TracingAlertSink};
use crate::api::{HttpNotificationApi, NotificationApi};
use crate::store::ClientNotificationStore;
use crate::transport::{
    ConnectionState, LiveTransport, ReconnectPolicy, TransportHandle, TransportSignal,
};

/// Owns the store, transport and alert adapter for one credential.
///
/// Created on login; [`NotificationSession::shutdown`] on logout stops
/// every task and clears the store.
#[derive(Debug)]
pub struct NotificationSession {
    store: Arc<ClientNotificationStore>,
    alerts: Arc<AlertAdapter>,
    transport: TransportHandle,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl NotificationSession {
    /// Start a session against the configured server, logging alerts.
    pub async fn start(config: &ClientConfig, credential: &str) -> AppResult<Self> {
        let api = Arc::new(HttpNotificationApi::new(config, credential)?);
        Self::start_with(config, credential, api, Arc::new(TracingAlertSink)).await
    }

    /// Start a session with an explicit REST client and alert sink.
    pub async fn start_with(
        config: &ClientConfig,
        credential: &str,
        api: Arc<dyn NotificationApi>,
        sink: Arc<dyn AlertSink>,
    ) -> AppResult<Self> {
        let cancel = CancellationToken::new();
        let (transport, signals, transport_task) = LiveTransport::spawn(
            &config.ws_url,
            credential,
            ReconnectPolicy::from(config),
            cancel.child_token(),
        )?;

        let store = Arc::new(ClientNotificationStore::new(
            api,
            Arc::new(transport.clone()),
        ));
        let alerts = Arc::new(AlertAdapter::new(sink, config.alerts_enabled));
        let alert_task = alerts
            .clone()
            .spawn(store.subscribe_new(), cancel.child_token());

        if let Err(e) = store.fetch_notifications(None).await {
            warn!(error = %e, "Initial notification fetch failed");
        }

        let dispatch_task = tokio::spawn(dispatch(store.clone(), signals, cancel.child_token()));

        info!(ws_url = %config.ws_url, "Notification session started");

        Ok(Self {
            store,
            alerts,
            transport,
            cancel,
            tasks: vec![transport_task, dispatch_task, alert_task],
        })
    }

    pub fn store(&self) -> &Arc<ClientNotificationStore> {
        &self.store
    }

    pub fn alerts(&self) -> &Arc<AlertAdapter> {
        &self.alerts
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.transport.state()
    }

    pub fn transport(&self) -> &TransportHandle {
        &self.transport
    }

    /// Stop the transport (including pending retries) and all session tasks,
    /// then clear the store.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Session task ended abnormally");
            }
        }
        self.store.clear();
        info!("Notification session closed");
    }
}

/// Route transport signals into the store until cancelled or the transport
/// task exits.
async fn dispatch(
    store: Arc<ClientNotificationStore>,
    mut signals: mpsc::Receiver<TransportSignal>,
    cancel: CancellationToken,
) {
    loop {
        let signal = tokio::select! {
            _ = cancel.cancelled() => break,
            signal = signals.recv() => match signal {
                Some(signal) => signal,
                None => break,
            },
        };

        match signal {
            TransportSignal::Connected => {
                store.set_connected(true);
                if let Err(e) = store.fetch_notifications(None).await {
                    warn!(error = %e, "Re-fetch after connect failed");
                }
            }
            TransportSignal::Disconnected => store.set_connected(false),
            TransportSignal::Failed => {
                store.set_connected(false);
                warn!("Live transport rejected the credential");
            }
            TransportSignal::Message(message) => {
                debug!(event = message.event_name(), "Applying server event");
                store.handle_server_message(message);
            }
        }
    }
    store.set_connected(false);
}
