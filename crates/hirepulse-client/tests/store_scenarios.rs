//! Client store behaviour against a scripted REST API.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::oneshot;

use hirepulse_client::transport::CommandSink;
use hirepulse_client::{ClientNotificationStore, NotificationApi};
use hirepulse_core::error::AppError;
use hirepulse_core::result::AppResult;
use hirepulse_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use hirepulse_entity::{
    ClientMessage, NewNotification, Notification, NotificationFilter, NotificationKind,
    ServerMessage,
};

#[derive(Default)]
struct FakeApi {
    records: Mutex<Vec<Notification>>,
    calls: Mutex<Vec<String>>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    fail_list: Mutex<bool>,
}

impl FakeApi {
    fn seed(&self, notification: Notification) {
        self.records.lock().unwrap().push(notification);
    }

    /// The next `list` call snapshots the records, then waits for the sender.
    fn gate_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NotificationApi for FakeApi {
    async fn list(
        &self,
        filter: &NotificationFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.record("list".into());
        let (mut items, gate) = {
            let records = self.records.lock().unwrap();
            let items: Vec<Notification> =
                records.iter().filter(|n| filter.matches(n)).cloned().collect();
            (items, self.gates.lock().unwrap().pop_front())
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if *self.fail_list.lock().unwrap() {
            return Err(AppError::external_service("server unavailable"));
        }
        hirepulse_entity::notification::sort_for_display(&mut items);
        let total = items.len() as u64;
        Ok(PageResponse::new(items, page, total))
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.record(format!("mark_read:{id}"));
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.mark_read();
                Ok(())
            }
            None => Err(AppError::not_found(format!("Notification {id} not found"))),
        }
    }

    async fn mark_all_read(&self) -> AppResult<u64> {
        self.record("mark_all_read".into());
        let mut records = self.records.lock().unwrap();
        Ok(records
            .iter_mut()
            .map(|n| n.mark_read())
            .filter(|changed| *changed)
            .count() as u64)
    }

    async fn delete(&self, id: NotificationId) -> AppResult<()> {
        self.record(format!("delete:{id}"));
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|n| n.id != id);
        if records.len() == before {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<ClientMessage>>,
}

impl CommandSink for RecordingSink {
    fn send(&self, message: ClientMessage) -> AppResult<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

struct Harness {
    api: Arc<FakeApi>,
    sink: Arc<RecordingSink>,
    store: Arc<ClientNotificationStore>,
    user: UserId,
}

impl Harness {
    fn new() -> Self {
        let api = Arc::new(FakeApi::default());
        let sink = Arc::new(RecordingSink::default());
        let store = Arc::new(ClientNotificationStore::new(api.clone(), sink.clone()));
        Self {
            api,
            sink,
            store,
            user: UserId::new(),
        }
    }

    fn make(&self, kind: NotificationKind, title: &str, minutes_ago: i64) -> Notification {
        NewNotification {
            user_id: self.user,
            kind,
            title: title.to_string(),
            content: format!("{title} for candidate Jane Doe"),
            metadata: None,
        }
        .into_record(Utc::now() - Duration::minutes(minutes_ago))
    }

    fn sent(&self) -> Vec<ClientMessage> {
        self.sink.sent.lock().unwrap().clone()
    }

    fn assert_unread_consistent(&self) {
        let unread = self
            .store
            .notifications()
            .iter()
            .filter(|n| !n.is_read)
            .count();
        assert_eq!(self.store.unread_count(), unread);
    }
}

#[tokio::test]
async fn empty_fetch_yields_empty_store() {
    let h = Harness::new();
    h.store.fetch_notifications(None).await.unwrap();

    assert!(h.store.is_empty());
    assert_eq!(h.store.unread_count(), 0);
    assert!(!h.store.is_loading());
    assert_eq!(h.store.error(), None);
}

#[tokio::test]
async fn pushed_bias_alert_is_inserted_once() {
    let h = Harness::new();
    let mut new_rx = h.store.subscribe_new();
    let alert = h.make(NotificationKind::BiasAlert, "Bias Alert", 0);

    assert!(h.store.apply_pushed(alert.clone()));
    assert!(!h.store.apply_pushed(alert.clone()));

    assert_eq!(h.store.len(), 1);
    assert_eq!(h.store.unread_count(), 1);
    assert_eq!(new_rx.recv().await.unwrap().id, alert.id);
    assert!(new_rx.try_recv().is_err());
    h.assert_unread_consistent();
}

#[tokio::test]
async fn mark_read_issues_one_rest_call_and_mirrors() {
    let h = Harness::new();
    let n = h.make(NotificationKind::NewApplication, "New Application", 1);
    h.api.seed(n.clone());
    h.store.fetch_notifications(None).await.unwrap();
    assert_eq!(h.store.unread_count(), 1);

    h.store.mark_as_read(n.id).await;

    assert_eq!(h.store.unread_count(), 0);
    assert!(h.store.get(n.id).unwrap().is_read);
    let rest: Vec<String> = h
        .api
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("mark_read"))
        .collect();
    assert_eq!(rest, vec![format!("mark_read:{}", n.id)]);
    assert_eq!(h.sent(), vec![ClientMessage::MarkAsRead { id: n.id }]);
    h.assert_unread_consistent();
}

#[tokio::test]
async fn failed_mark_read_keeps_local_state_and_skips_mirror() {
    let h = Harness::new();
    let n = h.make(NotificationKind::StatusChange, "Status Change", 1);
    // Known locally but not on the server, so the REST call fails.
    h.store.apply_pushed(n.clone());

    h.store.mark_as_read(n.id).await;

    assert!(h.store.get(n.id).unwrap().is_read);
    assert!(h.sent().is_empty());
}

#[tokio::test]
async fn delete_of_missing_record_is_silent() {
    let h = Harness::new();
    let n = h.make(NotificationKind::SystemError, "System Error", 1);
    h.store.apply_pushed(n.clone());

    h.store.delete_notification(n.id).await;

    assert!(h.store.get(n.id).is_none());
    assert_eq!(h.store.error(), None);
    assert_eq!(h.sent(), vec![ClientMessage::DeleteNotification { id: n.id }]);
}

#[tokio::test]
async fn push_during_fetch_converges() {
    let h = Harness::new();
    let old = h.make(NotificationKind::StatusChange, "Status Change", 10);
    h.api.seed(old.clone());

    let release = h.api.gate_next_list();
    let mut fetch = Box::pin(h.store.fetch_notifications(None));
    assert!(futures::poll!(fetch.as_mut()).is_pending());

    // Created after the server built its response.
    let fresh = h.make(NotificationKind::BiasAlert, "Bias Alert", 0);
    h.api.seed(fresh.clone());
    assert!(h.store.apply_pushed(fresh.clone()));

    release.send(()).unwrap();
    fetch.await.unwrap();

    let ids: Vec<NotificationId> = h.store.notifications().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![fresh.id, old.id]);

    h.store.fetch_notifications(None).await.unwrap();
    let ids: Vec<NotificationId> = h.store.notifications().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![fresh.id, old.id]);
    h.assert_unread_consistent();
}

#[tokio::test]
async fn stale_fetch_response_is_discarded() {
    let h = Harness::new();
    let first = h.make(NotificationKind::NewApplication, "New Application", 5);
    h.api.seed(first.clone());

    let release = h.api.gate_next_list();
    let mut slow = Box::pin(h.store.fetch_notifications(None));
    assert!(futures::poll!(slow.as_mut()).is_pending());

    let second = h.make(NotificationKind::CandidateShortlisted, "Shortlisted", 1);
    h.api.seed(second.clone());
    h.store.fetch_notifications(None).await.unwrap();
    assert_eq!(h.store.len(), 2);

    release.send(()).unwrap();
    slow.await.unwrap();

    assert_eq!(h.store.len(), 2);
    assert!(!h.store.is_loading());
}

#[tokio::test]
async fn fetch_does_not_resurrect_or_unread() {
    let h = Harness::new();
    let keep = h.make(NotificationKind::AiAnalysisComplete, "Analysis Complete", 3);
    let gone = h.make(NotificationKind::DuplicateCandidate, "Duplicate", 2);
    h.api.seed(keep.clone());
    h.api.seed(gone.clone());
    h.store.fetch_notifications(None).await.unwrap();

    let release = h.api.gate_next_list();
    let mut fetch = Box::pin(h.store.fetch_notifications(None));
    assert!(futures::poll!(fetch.as_mut()).is_pending());

    // Another session acts while the snapshot is in flight.
    h.store.handle_server_message(ServerMessage::NotificationRead { id: keep.id });
    h.store
        .handle_server_message(ServerMessage::NotificationDeleted { id: gone.id });

    release.send(()).unwrap();
    fetch.await.unwrap();

    assert!(h.store.get(keep.id).unwrap().is_read);
    assert!(h.store.get(gone.id).is_none());

    // A late duplicate push cannot undo either change.
    let mut stale = keep.clone();
    stale.is_read = false;
    assert!(!h.store.apply_pushed(stale));
    assert!(!h.store.apply_pushed(gone.clone()));
    assert!(h.store.get(keep.id).unwrap().is_read);
    assert!(h.store.get(gone.id).is_none());
    h.assert_unread_consistent();
}

#[tokio::test]
async fn search_matches_case_insensitively() {
    let h = Harness::new();
    h.api.seed(h.make(NotificationKind::BiasAlert, "Bias Alert", 2));
    h.api.seed(h.make(NotificationKind::NewApplication, "New Application", 1));
    h.store.fetch_notifications(None).await.unwrap();

    let found = h.store.search_notifications("bias");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, NotificationKind::BiasAlert);
    assert_eq!(h.store.search_notifications("JANE DOE").len(), 2);
    assert_eq!(h.store.search_notifications("").len(), 2);

    let apps = h.store.filter_by_type(Some(NotificationKind::NewApplication));
    assert_eq!(apps.len(), 1);
    assert_eq!(h.store.filter_by_type(None).len(), 2);
}

#[tokio::test]
async fn mark_all_read_is_local_and_remote() {
    let h = Harness::new();
    for minutes in 0..3 {
        h.api.seed(h.make(NotificationKind::ProcessingMilestone, "Milestone", minutes));
    }
    h.store.fetch_notifications(None).await.unwrap();
    assert_eq!(h.store.unread_count(), 3);

    h.store.mark_all_as_read().await;

    assert_eq!(h.store.unread_count(), 0);
    assert_eq!(
        h.api.calls().iter().filter(|c| *c == "mark_all_read").count(),
        1
    );
    assert!(h.sent().is_empty());
    h.assert_unread_consistent();
}

#[tokio::test]
async fn all_read_event_marks_every_record() {
    let h = Harness::new();
    h.store.apply_pushed(h.make(NotificationKind::SecurityAlert, "Login", 1));
    h.store.apply_pushed(h.make(NotificationKind::HealthMetricsAlert, "Health", 0));

    h.store
        .handle_server_message(ServerMessage::NotificationAllRead { user_id: h.user });

    assert_eq!(h.store.unread_count(), 0);
    assert_eq!(h.store.len(), 2);
}

#[tokio::test]
async fn fetch_failure_sets_error_and_keeps_records() {
    let h = Harness::new();
    h.store
        .apply_pushed(h.make(NotificationKind::PerformanceDegradation, "Slow", 0));
    *h.api.fail_list.lock().unwrap() = true;

    let err = h.store.fetch_notifications(None).await.unwrap_err();

    assert_eq!(err.kind, hirepulse_core::error::ErrorKind::ExternalService);
    assert!(h.store.error().is_some());
    assert_eq!(h.store.len(), 1);
    assert!(!h.store.is_loading());

    *h.api.fail_list.lock().unwrap() = false;
    h.store.fetch_notifications(None).await.unwrap();
    assert_eq!(h.store.error(), None);
}

#[tokio::test]
async fn filtered_fetch_becomes_active_filter() {
    let h = Harness::new();
    h.api.seed(h.make(NotificationKind::BiasAlert, "Bias Alert", 2));
    h.api.seed(h.make(NotificationKind::NewApplication, "New Application", 1));

    h.store
        .fetch_notifications(Some(NotificationFilter::by_kind(NotificationKind::BiasAlert)))
        .await
        .unwrap();
    assert_eq!(h.store.len(), 1);
    assert_eq!(h.store.active_filter().kind, Some(NotificationKind::BiasAlert));

    // A re-fetch without an explicit filter keeps it.
    h.store.fetch_notifications(None).await.unwrap();
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn clear_forgets_everything() {
    let h = Harness::new();
    let n = h.make(NotificationKind::MonthlyAnalyticsReport, "Report", 0);
    h.store.apply_pushed(n.clone());
    h.store.apply_deleted(n.id);
    h.store.set_connected(true);

    h.store.clear();

    assert!(h.store.is_empty());
    assert!(!h.store.is_connected());
    // The tombstone is gone too.
    assert!(h.store.apply_pushed(n));
}

#[tokio::test]
async fn superseded_fetch_does_not_mask_newer_failure() {
    let h = Harness::new();
    let bias = h.make(NotificationKind::BiasAlert, "Bias Alert", 2);
    h.api.seed(bias.clone());
    h.api.seed(h.make(NotificationKind::StatusChange, "Status Change", 1));

    let release = h.api.gate_next_list();
    let mut older = Box::pin(
        h.store
            .fetch_notifications(Some(NotificationFilter::by_kind(NotificationKind::BiasAlert))),
    );
    assert!(futures::poll!(older.as_mut()).is_pending());

    *h.api.fail_list.lock().unwrap() = true;
    h.store
        .fetch_notifications(Some(NotificationFilter::by_kind(NotificationKind::StatusChange)))
        .await
        .unwrap_err();
    *h.api.fail_list.lock().unwrap() = false;

    release.send(()).unwrap();
    older.await.unwrap();

    assert!(h.store.error().is_some());
    assert_eq!(h.store.active_filter().kind, None);
    assert!(h.store.get(bias.id).is_none());
    assert!(h.store.is_empty());
    assert!(!h.store.is_loading());
}

#[tokio::test]
async fn push_outside_active_filter_is_held_but_hidden() {
    let h = Harness::new();
    let bias = h.make(NotificationKind::BiasAlert, "Bias Alert", 2);
    h.api.seed(bias.clone());
    h.store
        .fetch_notifications(Some(NotificationFilter::by_kind(NotificationKind::BiasAlert)))
        .await
        .unwrap();
    let mut new_rx = h.store.subscribe_new();

    let status = h.make(NotificationKind::StatusChange, "Status Change", 0);
    h.api.seed(status.clone());
    assert!(h.store.apply_pushed(status.clone()));
    assert!(!h.store.apply_pushed(status.clone()));

    let ids: Vec<NotificationId> = h.store.notifications().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![bias.id]);
    assert_eq!(h.store.unread_count(), 1);
    assert!(h.store.filter_by_type(Some(NotificationKind::StatusChange)).is_empty());
    assert_eq!(new_rx.recv().await.unwrap().id, status.id);
    h.assert_unread_consistent();

    h.store
        .fetch_notifications(Some(NotificationFilter::default()))
        .await
        .unwrap();
    let ids: Vec<NotificationId> = h.store.notifications().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![status.id, bias.id]);
}
