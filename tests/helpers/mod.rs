//! Shared helpers for end-to-end tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use hirepulse_api::AppState;
use hirepulse_auth::JwtEncoder;
use hirepulse_client::{AlertSink, AlertTone, HttpNotificationApi, NotificationSession};
use hirepulse_core::config::{AppConfig, ClientConfig};
use hirepulse_core::result::AppResult;
use hirepulse_core::types::{SessionId, UserId};
use hirepulse_database::MemoryNotificationStore;
use hirepulse_entity::Notification;
use hirepulse_service::NotificationService;

/// A server running on an ephemeral port with the memory store.
pub struct TestServer {
    pub state: AppState,
    pub addr: SocketAddr,
    encoder: JwtEncoder,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = AppConfig::default();
        let encoder = JwtEncoder::new(&config.auth);
        let store = Arc::new(MemoryNotificationStore::new());
        let service = Arc::new(NotificationService::new(store));
        let state = AppState::new(config, service);
        state.realtime.start();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let serve_state = state.clone();
        let task = tokio::spawn(async move {
            hirepulse_api::app::serve(listener, serve_state, async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("serve");
        });

        Self {
            state,
            addr,
            encoder,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn token_for(&self, user_id: UserId) -> String {
        self.encoder
            .generate_access_token(user_id, SessionId::new(), "recruiter")
            .expect("token")
            .0
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: format!("http://{}/api", self.addr),
            ws_url: format!("ws://{}/ws", self.addr),
            reconnect_base_ms: 20,
            reconnect_max_ms: 200,
            request_timeout_seconds: 5,
            alerts_enabled: true,
        }
    }

    /// Start a client session with a recording alert sink.
    pub async fn session(&self, token: &str) -> (NotificationSession, Arc<RecordingAlerts>) {
        let config = self.client_config();
        let api = Arc::new(HttpNotificationApi::new(&config, token).expect("api"));
        let alerts = Arc::new(RecordingAlerts::default());
        let session = NotificationSession::start_with(&config, token, api, alerts.clone())
            .await
            .expect("session");
        (session, alerts)
    }

    pub async fn stop(mut self) {
        self.state.realtime.shutdown().expect("realtime shutdown");
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), task).await;
        }
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub played: Mutex<Vec<AlertTone>>,
}

impl AlertSink for RecordingAlerts {
    fn play(&self, tone: AlertTone, _: &Notification) -> AppResult<()> {
        self.played.lock().unwrap().push(tone);
        Ok(())
    }
}

/// Poll `check` until it holds, failing after five seconds.
pub async fn eventually<F>(what: &str, check: F)
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !check() {
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Await `future`, failing after five seconds.
#[allow(dead_code)]
pub async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("timed out")
}
