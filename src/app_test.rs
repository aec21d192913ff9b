use super::*;
use crate::net::types::LoginForm;
use crate::platform::test_helpers::{TestPlatform, envelope};
use serde_json::{Value, json};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn login_navigation_and_expiry_share_one_session() {
    let tp = TestPlatform::new();
    let mut app = App::new(ClientConfig::default(), tp.platform());

    assert_eq!(app.router.push("/claim").unwrap().path, "/login");

    tp.transport.push_json(envelope(
        json!(200),
        json!({ "token": "jwt", "userInfo": { "username": "dana", "roleCode": "USER" } }),
        None,
    ));
    let form = LoginForm { username: "dana".to_owned(), password: "pw".to_owned() };
    app.session.login(&app.http, &form).await.unwrap();
    assert_eq!(app.router.push("/claim").unwrap().name.as_deref(), Some("MyClaims"));

    tp.transport.push_json(envelope(json!(401), Value::Null, None));
    let err = crate::net::api::claim::mine(&app.http, crate::net::api::PageRequest::default(), None)
        .await
        .unwrap_err();
    assert!(err.is_auth_expired());
    assert!(!app.session.is_logged_in());

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(tp.navigator.relaunches(), vec!["/login".to_owned()]);
    assert_eq!(app.router.push("/claim").unwrap().path, "/login");
}

#[test]
fn app_title_flows_into_guard() {
    let tp = TestPlatform::new();
    let config = ClientConfig { app_title: "Campus L&F".to_owned(), ..ClientConfig::default() };
    let mut app = App::new(config, tp.platform());

    app.router.push("/lost").unwrap();
    assert_eq!(tp.navigator.titles(), vec!["Lost Items - Campus L&F".to_owned()]);
}

#[tokio::test]
async fn notification_polling_uses_app_client() {
    let tp = TestPlatform::new();
    let app = App::new(ClientConfig::default(), tp.platform());
    tp.transport.push_json(envelope(json!(200), json!(4), None));

    let polling = app.notification_polling();
    polling.refresh().await;

    assert_eq!(polling.unread_count(), 4);
    assert_eq!(tp.transport.last().url, "http://localhost:1235/api/notification/unread-count");
}
