//! Scripted adapters shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;

// =============================================================================
// MockTransport
// =============================================================================

/// Replays queued responses in order and records every request sent.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    pub(crate) requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, body: serde_json::Value) {
        self.push_raw(200, &body.to_string());
    }

    pub(crate) fn push_raw(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse { status, body: body.to_owned() }));
    }

    pub(crate) fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Request(message.to_owned())));
    }

    pub(crate) fn sent(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted response".to_owned())))
    }
}

/// `{ code, data, msg }` envelope body.
pub(crate) fn envelope(code: serde_json::Value, data: serde_json::Value, msg: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({ "code": code, "data": data });
    if let Some(msg) = msg {
        body["msg"] = serde_json::Value::String(msg.to_owned());
    }
    body
}

// =============================================================================
// RecordingNotifier
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NotifyEvent {
    ShowLoading(String),
    HideLoading,
    Toast { title: String, icon: ToastIcon, duration: Duration },
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) events: Mutex<Vec<NotifyEvent>>,
}

impl RecordingNotifier {
    pub(crate) fn events(&self) -> Vec<NotifyEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn toasts(&self) -> Vec<(String, ToastIcon, Duration)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NotifyEvent::Toast { title, icon, duration } => Some((title, icon, duration)),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn show_loading(&self, title: &str) {
        self.events
            .lock()
            .unwrap()
            .push(NotifyEvent::ShowLoading(title.to_owned()));
    }

    fn hide_loading(&self) {
        self.events.lock().unwrap().push(NotifyEvent::HideLoading);
    }

    fn show_toast(&self, title: &str, icon: ToastIcon, duration: Duration) {
        self.events
            .lock()
            .unwrap()
            .push(NotifyEvent::Toast { title: title.to_owned(), icon, duration });
    }
}

// =============================================================================
// RecordingNavigator
// =============================================================================

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    pub(crate) relaunches: Mutex<Vec<String>>,
    pub(crate) titles: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn relaunches(&self) -> Vec<String> {
        self.relaunches.lock().unwrap().clone()
    }

    pub(crate) fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn relaunch(&self, path: &str) {
        self.relaunches.lock().unwrap().push(path.to_owned());
    }

    fn set_title(&self, title: &str) {
        self.titles.lock().unwrap().push(title.to_owned());
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// Concrete handles kept alongside the type-erased [`Platform`].
pub(crate) struct TestPlatform {
    pub(crate) storage: Arc<MemoryStorage>,
    pub(crate) transport: Arc<MockTransport>,
    pub(crate) notifier: Arc<RecordingNotifier>,
    pub(crate) navigator: Arc<RecordingNavigator>,
}

impl TestPlatform {
    pub(crate) fn new() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::new()),
            transport: Arc::new(MockTransport::new()),
            notifier: Arc::new(RecordingNotifier::default()),
            navigator: Arc::new(RecordingNavigator::default()),
        }
    }

    pub(crate) fn platform(&self) -> Platform {
        Platform::new(
            self.storage.clone(),
            self.transport.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
        )
    }
}
