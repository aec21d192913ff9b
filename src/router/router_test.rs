use super::*;
use crate::platform::KeyValueStorage;
use crate::platform::test_helpers::TestPlatform;
use crate::session::SessionStore;

fn router(tp: &TestPlatform, policy: RoutePolicy) -> Router {
    let guard = NavigationGuard::new(SessionStore::new(tp.storage.clone()), tp.navigator.clone(), policy, "Lost & Found");
    Router::new(RouteTable::new(&default_routes()), guard)
}

#[test]
fn anonymous_push_to_protected_route_lands_on_login() {
    let tp = TestPlatform::new();
    let mut router = router(&tp, RoutePolicy::default());

    let route = router.push("/claim").unwrap();

    assert_eq!(route.path, "/login");
    assert_eq!(route.query_value("redirect"), Some("/claim"));
    assert_eq!(router.current().map(|r| r.path.as_str()), Some("/login"));
    assert_eq!(tp.navigator.titles().last().map(String::as_str), Some("Login - Lost & Found"));
}

#[test]
fn user_pushing_admin_layout_follows_both_redirects() {
    let tp = TestPlatform::new();
    tp.storage.set("token", "t").unwrap();
    tp.storage.set("userInfo", r#"{"roleCode":"USER"}"#).unwrap();
    let mut router = router(&tp, RoutePolicy::default());

    let route = router.push("/back").unwrap();
    assert_eq!(route.name.as_deref(), Some("Home"));
}

#[test]
fn admin_login_redirects_to_dashboard() {
    let tp = TestPlatform::new();
    tp.storage.set("token", "t").unwrap();
    tp.storage.set("userInfo", r#"{"roleCode":"ADMIN"}"#).unwrap();
    let mut router = router(&tp, RoutePolicy::default());

    assert_eq!(router.push("/login").unwrap().name.as_deref(), Some("Dashboard"));
}

#[test]
fn guard_cycle_is_reported_and_current_is_kept() {
    let tp = TestPlatform::new();
    tp.storage.set("token", "t").unwrap();
    tp.storage.set("userInfo", r#"{"roleCode":"ADMIN"}"#).unwrap();
    // Dashboard outside the admin prefix: every hop redirects again.
    let policy = RoutePolicy { admin_dashboard: "/lost".to_owned(), ..RoutePolicy::default() };
    let mut router = router(&tp, policy);

    let err = router.push("/").unwrap_err();

    assert_eq!(err, NavigationError::RedirectLoop { from: "/".to_owned(), last: "/lost".to_owned(), hops: MAX_GUARD_HOPS });
    assert!(router.current().is_none());
}
