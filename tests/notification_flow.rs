//! End-to-end: real server, real client sessions over HTTP and WebSocket.

mod helpers;

use helpers::{TestServer, eventually};

use hirepulse_client::{AlertTone, ConnectionState};
use hirepulse_core::types::UserId;
use hirepulse_database::NotificationStore as _;
use hirepulse_entity::{NotificationEvent, NotificationKind};
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pushed_notification_reaches_every_session_of_its_user() {
    let server = TestServer::start().await;
    let user = UserId::new();
    let other = UserId::new();

    let token = server.token_for(user);
    let (laptop, laptop_alerts) = server.session(&token).await;
    let (phone, _) = server.session(&token).await;
    let (stranger, _) = server.session(&server.token_for(other)).await;

    for session in [&laptop, &phone, &stranger] {
        eventually("connected", || session.store().is_connected()).await;
    }
    assert_eq!(laptop.connection_state(), ConnectionState::Connected);
    let connections = &server.state.realtime.connections;
    eventually("server registration", || connections.connection_count() == 3).await;

    server
        .state
        .realtime
        .emitter
        .emit(NotificationEvent::bias_alert(
            user,
            "Senior Data Engineer",
            Uuid::new_v4(),
        ))
        .await
        .expect("emit");

    eventually("laptop push", || laptop.store().len() == 1).await;
    eventually("phone push", || phone.store().len() == 1).await;
    assert!(stranger.store().is_empty());

    let n = laptop.store().notifications().remove(0);
    assert_eq!(n.kind, NotificationKind::BiasAlert);
    assert_eq!(laptop.store().unread_count(), 1);
    assert_eq!(laptop.store().search_notifications("BIAS").len(), 1);
    eventually("alert played", || {
        laptop_alerts.played.lock().unwrap().as_slice() == [AlertTone::Warning]
    })
    .await;

    laptop.shutdown().await;
    phone.shutdown().await;
    stranger.shutdown().await;
    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn read_and_delete_are_mirrored_to_sibling_sessions() {
    let server = TestServer::start().await;
    let user = UserId::new();
    let token = server.token_for(user);

    let first = server
        .state
        .realtime
        .event_bridge
        .emit(NotificationEvent::health_metrics_alert(user, "p95_latency_ms", 950.0, 500.0))
        .await
        .expect("emit");
    let second = server
        .state
        .realtime
        .event_bridge
        .emit(NotificationEvent::bias_alert(user, "Product Designer", Uuid::new_v4()))
        .await
        .expect("emit");

    let (desk, _) = server.session(&token).await;
    let (tablet, _) = server.session(&token).await;
    eventually("desk connected", || desk.store().is_connected()).await;
    eventually("tablet connected", || tablet.store().is_connected()).await;
    eventually("history loaded", || tablet.store().len() == 2).await;
    eventually("desk transport", || desk.transport().is_connected()).await;
    let connections = &server.state.realtime.connections;
    eventually("server registration", || connections.connection_count() == 2).await;

    desk.store().mark_as_read(first.id).await;
    assert_eq!(desk.store().unread_count(), 1);
    eventually("read mirrored", || {
        tablet.store().get(first.id).is_some_and(|n| n.is_read)
    })
    .await;

    desk.store().delete_notification(second.id).await;
    eventually("delete mirrored", || tablet.store().get(second.id).is_none()).await;

    let unread = server
        .state
        .notification_service
        .store()
        .count_unread(user)
        .await
        .expect("count");
    assert_eq!(unread, 0);

    desk.shutdown().await;
    tablet.shutdown().await;
    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_credential_is_terminal() {
    let server = TestServer::start().await;

    let (session, _) = server.session("not-a-jwt").await;

    eventually("failed", || session.connection_state() == ConnectionState::Failed).await;
    assert!(!session.store().is_connected());
    assert!(session.store().error().is_some());

    session.shutdown().await;
    server.stop().await;
}
