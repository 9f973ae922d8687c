//! Reconciled client-side notification state.
//!
//! One [`ClientNotificationStore`] exists per logged-in session. It merges
//! REST history with pushed frames so that both converge regardless of
//! arrival order:
//!
//! - inserts are keyed by id and never overwrite
//! - read state only moves from unread to read
//! - locally deleted ids are never resurrected
//! - a fetch response is applied only if no newer fetch was issued after it
//!
//! Views show the held records that match the active filter.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use hirepulse_core::result::AppResult;
use hirepulse_core::types::{MAX_PAGE_LIMIT, NotificationId, PageRequest};
use hirepulse_entity::notification::sort_for_display;
use hirepulse_entity::{
    ClientMessage, Notification, NotificationFilter, NotificationKind, ServerMessage,
};

use crate::api::NotificationApi;
use crate::transport::CommandSink;

#[derive(Debug, Default)]
struct StoreState {
    records: HashMap<NotificationId, Notification>,
    /// Ids marked read locally until the server reports them read.
    read: HashSet<NotificationId>,
    /// Ids deleted locally and the newest fetch token issued at the time.
    deleted: HashMap<NotificationId, u64>,
    /// Pushed ids and the newest fetch token issued when they arrived.
    pushed: HashMap<NotificationId, u64>,
    filter: NotificationFilter,
    is_loading: bool,
    error: Option<String>,
    is_connected: bool,
}

impl StoreState {
    fn mark_read(&mut self, id: NotificationId) -> bool {
        self.read.insert(id);
        self.records
            .get_mut(&id)
            .map(Notification::mark_read)
            .unwrap_or(false)
    }

    fn remove(&mut self, id: NotificationId, issued: u64) -> bool {
        self.deleted.insert(id, issued);
        self.pushed.remove(&id);
        self.records.remove(&id).is_some()
    }

    fn visible(&self) -> impl Iterator<Item = &Notification> {
        let filter = &self.filter;
        self.records.values().filter(move |n| filter.matches(n))
    }
}

/// Client notification state shared as `Arc` between the session, the UI
/// and the alert adapter.
pub struct ClientNotificationStore {
    api: Arc<dyn NotificationApi>,
    commands: Arc<dyn CommandSink>,
    state: Mutex<StoreState>,
    next_token: AtomicU64,
    new_tx: broadcast::Sender<Notification>,
}

impl std::fmt::Debug for ClientNotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ClientNotificationStore")
            .field("records", &state.records.len())
            .field("unread", &state.records.values().filter(|n| n.is_unread()).count())
            .field("is_connected", &state.is_connected)
            .finish()
    }
}

impl ClientNotificationStore {
    pub fn new(api: Arc<dyn NotificationApi>, commands: Arc<dyn CommandSink>) -> Self {
        let (new_tx, _) = broadcast::channel(64);
        Self {
            api,
            commands,
            state: Mutex::new(StoreState::default()),
            next_token: AtomicU64::new(0),
            new_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Fetch ────────────────────────────────────────────────────

    /// Replace the collection with the server's view.
    ///
    /// `None` re-uses the active filter. A response is discarded, success
    /// or failure, once a newer fetch has been issued.
    pub async fn fetch_notifications(&self, filter: Option<NotificationFilter>) -> AppResult<()> {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = {
            let mut state = self.lock();
            state.is_loading = true;
            filter.unwrap_or_else(|| state.filter.clone())
        };

        let result = self
            .api
            .list(&filter, PageRequest::new(1, MAX_PAGE_LIMIT))
            .await;

        let mut state = self.lock();
        let newest = self.next_token.load(Ordering::SeqCst);
        if token < newest {
            debug!(token, newest, "Discarded superseded fetch");
            return Ok(());
        }
        state.is_loading = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(token, error = %e, "Fetching notifications failed");
                state.error = Some(e.message.clone());
                return Err(e);
            }
        };

        // Absent from a complete unfiltered listing means gone on the server.
        let complete = filter.is_empty() && page.total <= page.items.len() as u64;
        let returned: HashSet<NotificationId> = page.items.iter().map(|n| n.id).collect();
        if complete {
            state
                .deleted
                .retain(|id, deleted_at| *deleted_at >= token || returned.contains(id));
        }

        let mut records: HashMap<NotificationId, Notification> = HashMap::new();
        for mut n in page.items {
            if state.deleted.contains_key(&n.id) {
                continue;
            }
            if n.is_read {
                state.read.remove(&n.id);
            } else if state.read.contains(&n.id) {
                n.mark_read();
            }
            records.insert(n.id, n);
        }

        // Pushed while this request was in flight, so the response may predate them.
        for (id, pushed_at) in &state.pushed {
            if *pushed_at < token || records.contains_key(id) {
                continue;
            }
            if let Some(n) = state.records.get(id) {
                records.insert(*id, n.clone());
            }
        }
        state.pushed.retain(|_, pushed_at| *pushed_at > token);

        debug!(token, count = records.len(), "Applied fetch");
        state.records = records;
        state.filter = filter;
        state.error = None;
        Ok(())
    }

    // ── Reducers for server frames ───────────────────────────────

    /// Insert a pushed record unless it is already known or was deleted.
    ///
    /// Returns whether the record was inserted. Records outside the active
    /// filter are held but hidden from the views; every inserted record is
    /// announced to [`subscribe_new`](Self::subscribe_new).
    pub fn apply_pushed(&self, mut notification: Notification) -> bool {
        {
            let mut state = self.lock();
            if state.deleted.contains_key(&notification.id)
                || state.records.contains_key(&notification.id)
            {
                return false;
            }
            if state.read.contains(&notification.id) {
                notification.mark_read();
            }
            let issued = self.next_token.load(Ordering::SeqCst);
            state.pushed.insert(notification.id, issued);
            state
                .records
                .insert(notification.id, notification.clone());
        }
        let _ = self.new_tx.send(notification);
        true
    }

    /// Mark one record read locally.
    pub fn apply_read(&self, id: NotificationId) {
        self.lock().mark_read(id);
    }

    /// Drop one record locally.
    pub fn apply_deleted(&self, id: NotificationId) {
        let issued = self.next_token.load(Ordering::SeqCst);
        self.lock().remove(id, issued);
    }

    /// Mark every held record read locally.
    pub fn apply_all_read(&self) {
        let mut state = self.lock();
        let ids: Vec<NotificationId> = state.records.keys().copied().collect();
        for id in ids {
            state.mark_read(id);
        }
    }

    /// Route one server frame to its reducer.
    pub fn handle_server_message(&self, message: ServerMessage) {
        match message {
            ServerMessage::NotificationNew(n) => {
                self.apply_pushed(n);
            }
            ServerMessage::NotificationRead { id } => self.apply_read(id),
            ServerMessage::NotificationDeleted { id } => self.apply_deleted(id),
            ServerMessage::NotificationAllRead { .. } => self.apply_all_read(),
            ServerMessage::Ping { .. } | ServerMessage::Error { .. } => {}
        }
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Mark read locally, persist, then mirror to sibling sessions.
    ///
    /// Failures are logged; the local change is kept.
    pub async fn mark_as_read(&self, id: NotificationId) {
        self.apply_read(id);
        match self.api.mark_read(id).await {
            Ok(()) => self.mirror(ClientMessage::MarkAsRead { id }),
            Err(e) => warn!(notification_id = %id, error = %e, "Mark as read failed"),
        }
    }

    /// Mark every held record read and ask the server to do the same for
    /// the whole user.
    pub async fn mark_all_as_read(&self) {
        self.apply_all_read();
        if let Err(e) = self.api.mark_all_read().await {
            warn!(error = %e, "Mark all as read failed");
        }
    }

    /// Remove locally, delete on the server, then mirror.
    ///
    /// A record the server no longer has counts as deleted.
    pub async fn delete_notification(&self, id: NotificationId) {
        self.apply_deleted(id);
        match self.api.delete(id).await {
            Ok(()) => self.mirror(ClientMessage::DeleteNotification { id }),
            Err(e) if e.is_not_found() => {
                debug!(notification_id = %id, "Already deleted on server");
                self.mirror(ClientMessage::DeleteNotification { id });
            }
            Err(e) => warn!(notification_id = %id, error = %e, "Delete failed"),
        }
    }

    fn mirror(&self, message: ClientMessage) {
        if let Err(e) = self.commands.send(message) {
            debug!(error = %e, "Mirror frame not sent");
        }
    }

    // ── Views ────────────────────────────────────────────────────

    /// Records under the active filter, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        let mut items: Vec<Notification> = self.lock().visible().cloned().collect();
        sort_for_display(&mut items);
        items
    }

    /// Records of one kind, newest first. `None` returns everything.
    pub fn filter_by_type(&self, kind: Option<NotificationKind>) -> Vec<Notification> {
        self.project(&NotificationFilter {
            kind,
            query: None,
        })
    }

    /// Records whose title or content contains `query`, ignoring case.
    pub fn search_notifications(&self, query: &str) -> Vec<Notification> {
        self.project(&NotificationFilter::by_query(query))
    }

    fn project(&self, filter: &NotificationFilter) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .lock()
            .visible()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        sort_for_display(&mut items);
        items
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.lock().visible().find(|n| n.id == id).cloned()
    }

    pub fn unread_count(&self) -> usize {
        self.lock().visible().filter(|n| n.is_unread()).count()
    }

    pub fn len(&self) -> usize {
        self.lock().visible().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn active_filter(&self) -> NotificationFilter {
        self.lock().filter.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Message of the last failed fetch, cleared by the next success.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_connected
    }

    pub fn set_connected(&self, connected: bool) {
        self.lock().is_connected = connected;
    }

    /// Records inserted by a push, for side effects such as alerts.
    pub fn subscribe_new(&self) -> broadcast::Receiver<Notification> {
        self.new_tx.subscribe()
    }

    /// Forget everything. Called on logout.
    pub fn clear(&self) {
        *self.lock() = StoreState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use hirepulse_core::types::{PageResponse, UserId};
    use hirepulse_entity::NewNotification;

    #[derive(Default)]
    struct ServerView {
        items: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationApi for ServerView {
        async fn list(
            &self,
            filter: &NotificationFilter,
            page: PageRequest,
        ) -> AppResult<PageResponse<Notification>> {
            let items: Vec<Notification> = self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|n| filter.matches(n))
                .cloned()
                .collect();
            let total = items.len() as u64;
            Ok(PageResponse::new(items, page, total))
        }

        async fn mark_read(&self, _id: NotificationId) -> AppResult<()> {
            Ok(())
        }

        async fn mark_all_read(&self) -> AppResult<u64> {
            Ok(0)
        }

        async fn delete(&self, _id: NotificationId) -> AppResult<()> {
            Ok(())
        }
    }

    struct Discard;

    impl CommandSink for Discard {
        fn send(&self, _message: ClientMessage) -> AppResult<()> {
            Ok(())
        }
    }

    fn record(user_id: UserId, kind: NotificationKind) -> Notification {
        NewNotification {
            user_id,
            kind,
            title: kind.to_string(),
            content: "details".into(),
            metadata: None,
        }
        .into_record(Utc::now())
    }

    #[tokio::test]
    async fn test_overlays_are_pruned_once_the_server_agrees() {
        let server = Arc::new(ServerView::default());
        let store = ClientNotificationStore::new(server.clone(), Arc::new(Discard));
        let user = UserId::new();
        let read = record(user, NotificationKind::NewApplication);
        let gone = record(user, NotificationKind::BiasAlert);
        store.apply_pushed(read.clone());
        store.apply_pushed(gone.clone());
        store.apply_read(read.id);
        store.apply_deleted(gone.id);

        // A filtered listing says nothing about records outside it.
        store
            .fetch_notifications(Some(NotificationFilter::by_kind(NotificationKind::StatusChange)))
            .await
            .unwrap();
        assert!(store.lock().deleted.contains_key(&gone.id));

        let mut confirmed = read.clone();
        confirmed.mark_read();
        server.items.lock().unwrap().push(confirmed);
        store
            .fetch_notifications(Some(NotificationFilter::default()))
            .await
            .unwrap();

        let state = store.lock();
        assert!(state.read.is_empty());
        assert!(state.deleted.is_empty());
        assert!(state.records[&read.id].is_read);
    }

    #[tokio::test]
    async fn test_unconfirmed_read_is_reapplied() {
        let server = Arc::new(ServerView::default());
        let store = ClientNotificationStore::new(server.clone(), Arc::new(Discard));
        let n = record(UserId::new(), NotificationKind::SecurityAlert);
        server.items.lock().unwrap().push(n.clone());
        store.apply_pushed(n.clone());
        store.apply_read(n.id);

        store.fetch_notifications(None).await.unwrap();

        assert!(store.get(n.id).unwrap().is_read);
        assert!(store.lock().read.contains(&n.id));
    }
}
