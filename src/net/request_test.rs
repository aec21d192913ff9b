use super::*;
use crate::platform::KeyValueStorage;
use crate::platform::test_helpers::{NotifyEvent, TestPlatform, envelope};
use serde_json::json;

fn client(tp: &TestPlatform) -> HttpClient {
    let platform = tp.platform();
    let session = SessionStore::new(platform.storage.clone());
    HttpClient::new(&ClientConfig::default(), session, &platform)
}

fn seed_session(tp: &TestPlatform) {
    tp.storage.set("token", "t-1").unwrap();
    tp.storage.set("userInfo", r#"{"username":"alice","roleCode":"USER"}"#).unwrap();
    tp.storage.set("role", "USER").unwrap();
}

// =============================================================
// Success path
// =============================================================

#[tokio::test]
async fn success_resolves_with_data_and_attaches_token() {
    let tp = TestPlatform::new();
    seed_session(&tp);
    tp.transport.push_json(envelope(json!(200), json!({ "id": 7 }), None));

    let data = client(&tp)
        .request_value("/lost-item/7", HttpMethod::Get, None, &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(data, json!({ "id": 7 }));
    let sent = tp.transport.last();
    assert_eq!(sent.url, "http://localhost:1235/api/lost-item/7");
    assert_eq!(sent.header("token"), Some("t-1"));
    assert_eq!(sent.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn missing_token_sends_no_token_header() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), Value::Null, None));

    client(&tp)
        .request_value("/category/list", HttpMethod::Get, None, &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(tp.transport.last().header("token"), None);
}

#[tokio::test]
async fn get_success_does_not_toast_by_default() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!("200"), json!([]), None));

    client(&tp)
        .request_value("/category/list", HttpMethod::Get, None, &RequestOptions::default())
        .await
        .unwrap();

    assert!(tp.notifier.toasts().is_empty());
    assert_eq!(
        tp.notifier.events(),
        vec![NotifyEvent::ShowLoading(LOADING_TITLE.to_owned()), NotifyEvent::HideLoading]
    );
}

#[tokio::test]
async fn mutation_success_toasts_default_message() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), Value::Null, None));

    client(&tp)
        .request_value("/lost-item", HttpMethod::Post, Some(json!({ "title": "Keys" })), &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(
        tp.notifier.toasts(),
        vec![(DEFAULT_SUCCESS_MSG.to_owned(), ToastIcon::Success, Duration::from_millis(1500))]
    );
    assert_eq!(tp.transport.last().body, Some(json!({ "title": "Keys" })));
}

#[tokio::test]
async fn explicit_success_message_shows_even_for_get_and_quiet() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), Value::Null, None));

    let opts = RequestOptions::quiet().with_success_msg("Loaded");
    client(&tp)
        .request_value("/claim/my", HttpMethod::Get, None, &opts)
        .await
        .unwrap();

    assert_eq!(
        tp.notifier.toasts(),
        vec![("Loaded".to_owned(), ToastIcon::Success, Duration::from_millis(2000))]
    );
}

#[tokio::test]
async fn quiet_mutation_shows_no_toast() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), Value::Null, None));

    client(&tp)
        .request_value("/notification/read-all", HttpMethod::Put, None, &RequestOptions::quiet())
        .await
        .unwrap();

    assert!(tp.notifier.toasts().is_empty());
}

#[tokio::test]
async fn caller_headers_override_defaults_case_insensitively() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), Value::Null, None));

    let opts = RequestOptions::default()
        .with_header("content-type", "text/plain")
        .with_header("X-Trace", "abc");
    client(&tp)
        .request_value("/x", HttpMethod::Get, None, &opts)
        .await
        .unwrap();

    let sent = tp.transport.last();
    assert_eq!(sent.header("Content-Type"), Some("text/plain"));
    assert_eq!(sent.header("x-trace"), Some("abc"));
    assert_eq!(sent.headers.len(), 2);
}

// =============================================================
// Application errors
// =============================================================

#[tokio::test]
async fn application_error_uses_server_message() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(500), json!({ "field": "title" }), Some("Title required")));

    let err = client(&tp)
        .request_value("/lost-item", HttpMethod::Post, Some(json!({})), &RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Title required");
    assert_eq!(err.code(), Some(&ResponseCode::Number(500)));
    match &err {
        ApiError::Application { data, .. } => assert_eq!(data, &json!({ "field": "title" })),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        tp.notifier.toasts(),
        vec![("Title required".to_owned(), ToastIcon::Plain, Duration::from_millis(2500))]
    );
}

#[tokio::test]
async fn explicit_error_message_beats_server_message() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(400), Value::Null, Some("bad")));

    let opts = RequestOptions::quiet().with_error_msg("Could not save");
    let err = client(&tp)
        .request_value("/found-item", HttpMethod::Put, Some(json!({})), &opts)
        .await
        .unwrap_err();

    assert_eq!(err.message(), "bad");
    assert_eq!(tp.notifier.toasts()[0].0, "Could not save");
}

#[tokio::test]
async fn missing_server_message_falls_back_to_default() {
    let tp = TestPlatform::new();
    tp.transport.push_json(json!({ "code": 403 }));

    let err = client(&tp)
        .request_value("/claim/audit", HttpMethod::Get, None, &RequestOptions::quiet())
        .await
        .unwrap_err();

    assert_eq!(err.message(), DEFAULT_ERROR_MSG);
    assert!(tp.notifier.toasts().is_empty());
}

#[tokio::test]
async fn non_envelope_body_is_an_application_error_without_code() {
    let tp = TestPlatform::new();
    tp.transport.push_raw(502, "<html>Bad Gateway</html>");

    let err = client(&tp)
        .request_value("/x", HttpMethod::Get, None, &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(&err, ApiError::Application { code: None, .. }));
    assert_eq!(err.message(), DEFAULT_ERROR_MSG);
}

#[tokio::test]
async fn loading_is_hidden_before_error_toast() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(500), Value::Null, Some("boom")));

    let _ = client(&tp)
        .request_value("/x", HttpMethod::Delete, None, &RequestOptions::default())
        .await;

    let events = tp.notifier.events();
    assert_eq!(events[0], NotifyEvent::ShowLoading(LOADING_TITLE.to_owned()));
    assert_eq!(events[1], NotifyEvent::HideLoading);
    assert!(matches!(events[2], NotifyEvent::Toast { .. }));
}

// =============================================================
// Session expiry
// =============================================================

#[tokio::test(start_paused = true)]
async fn auth_expired_clears_session_and_relaunches_after_delay() {
    let tp = TestPlatform::new();
    seed_session(&tp);
    tp.transport.push_json(envelope(json!(401), Value::Null, Some("token invalid")));

    let err = client(&tp)
        .request_value("/claim/my", HttpMethod::Get, None, &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(err.message(), SESSION_EXPIRED_MSG);
    assert!(tp.storage.is_empty());
    assert_eq!(
        tp.notifier.toasts(),
        vec![(SESSION_EXPIRED_MSG.to_owned(), ToastIcon::Plain, Duration::from_millis(2500))]
    );

    assert!(tp.navigator.relaunches().is_empty());
    tokio::time::sleep(Duration::from_millis(1499)).await;
    assert!(tp.navigator.relaunches().is_empty());
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(tp.navigator.relaunches(), vec!["/login".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn auth_expired_text_code_uses_configured_login_route() {
    let tp = TestPlatform::new();
    seed_session(&tp);
    tp.transport.push_json(envelope(json!("401"), Value::Null, None));

    let platform = tp.platform();
    let config = ClientConfig { platform: crate::config::PlatformKind::MiniProgram, ..ClientConfig::default() };
    let http = HttpClient::new(&config, SessionStore::new(platform.storage.clone()), &platform);

    let err = http
        .request_value("/x", HttpMethod::Get, None, &RequestOptions::quiet())
        .await
        .unwrap_err();
    assert!(err.is_auth_expired());
    assert!(tp.notifier.toasts().is_empty());

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(tp.navigator.relaunches(), vec!["/pages/auth/login".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn auth_expired_toast_prefers_explicit_error_msg() {
    let tp = TestPlatform::new();
    seed_session(&tp);
    tp.transport.push_json(envelope(json!(401), Value::Null, None));

    let options = RequestOptions::quiet().with_error_msg("Please sign in to claim items");
    let err = client(&tp)
        .request_value("/claim", HttpMethod::Post, None, &options)
        .await
        .unwrap_err();

    assert_eq!(err.message(), SESSION_EXPIRED_MSG);
    assert_eq!(
        tp.notifier.toasts(),
        vec![("Please sign in to claim items".to_owned(), ToastIcon::Plain, Duration::from_millis(2500))]
    );
    assert!(tp.storage.is_empty());
}

#[test]
fn auth_expired_without_runtime_relaunches_immediately() {
    let tp = TestPlatform::new();
    let http = client(&tp);
    http.expire_session(&RequestOptions::quiet());
    assert_eq!(tp.navigator.relaunches(), vec!["/login".to_owned()]);
}

// =============================================================
// Transport errors
// =============================================================

#[tokio::test]
async fn transport_failure_toasts_network_message() {
    let tp = TestPlatform::new();
    tp.transport.push_error("connection refused");

    let err = client(&tp)
        .request_value("/x", HttpMethod::Get, None, &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(&err, ApiError::Transport { source: TransportError::Request(m), .. } if m == "connection refused"));
    assert_eq!(err.message(), NETWORK_ERROR_MSG);
    assert_eq!(tp.notifier.toasts()[0].0, NETWORK_ERROR_MSG);
    assert_eq!(tp.notifier.events().last(), Some(&NotifyEvent::Toast {
        title: NETWORK_ERROR_MSG.to_owned(),
        icon: ToastIcon::Plain,
        duration: Duration::from_millis(2500),
    }));
}

#[tokio::test]
async fn quiet_transport_failure_is_silent_but_keeps_error_message() {
    let tp = TestPlatform::new();
    tp.transport.push_error("timeout");

    let err = client(&tp)
        .request_value("/x", HttpMethod::Get, None, &RequestOptions::quiet().with_error_msg("Offline"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Offline");
    assert!(tp.notifier.toasts().is_empty());
    assert_eq!(tp.transport.sent().len(), 1);
}

// =============================================================
// Typed wrappers
// =============================================================

#[tokio::test]
async fn get_builds_query_dropping_empty_values() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), json!(3), None));

    let params = json!({ "currentPage": 1, "size": 10, "title": "", "categoryId": null, "place": "Hall A&B" });
    let count: u32 = client(&tp)
        .get("/lost-item/page", &params, &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        tp.transport.last().url,
        "http://localhost:1235/api/lost-item/page?currentPage=1&size=10&place=Hall%20A%26B"
    );
}

#[tokio::test]
async fn get_without_params_has_no_query_string() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), json!([]), None));

    let _: Vec<Value> = client(&tp)
        .get("/category/list", &(), &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(tp.transport.last().url, "http://localhost:1235/api/category/list");
}

#[tokio::test]
async fn decode_mismatch_is_reported() {
    let tp = TestPlatform::new();
    tp.transport.push_json(envelope(json!(200), json!("not a number"), None));

    let err = client(&tp)
        .delete::<u32>("/lost-item/1", &RequestOptions::quiet())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(tp.transport.last().method, HttpMethod::Delete);
    assert_eq!(tp.transport.last().body, None);
}

#[test]
fn build_query_joins_arrays_and_rejects_scalars() {
    assert_eq!(build_query(&json!({ "ids": [1, 2], "ok": true })).unwrap(), "ids=1%2C2&ok=true");
    assert!(matches!(build_query(&json!(5)), Err(ApiError::Decode(_))));
}
