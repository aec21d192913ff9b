use super::debounce::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn recorder() -> (Arc<Mutex<Vec<String>>>, Debouncer<String>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let debouncer = Debouncer::new(Duration::from_millis(300), move |value: String| {
        let sink = sink.clone();
        async move { sink.lock().unwrap().push(value) }
    });
    (seen, debouncer)
}

#[tokio::test(start_paused = true)]
async fn only_the_last_call_runs() {
    let (seen, debouncer) = recorder();

    debouncer.call("w".to_owned());
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.call("wa".to_owned());
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.call("wal".to_owned());
    assert!(debouncer.is_pending());

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(seen.lock().unwrap().is_empty());
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(*seen.lock().unwrap(), vec!["wal".to_owned()]);
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn calls_spaced_beyond_the_delay_all_run() {
    let (seen, debouncer) = recorder();

    debouncer.call("a".to_owned());
    tokio::time::sleep(Duration::from_millis(400)).await;
    debouncer.call("b".to_owned());
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(*seen.lock().unwrap(), vec!["a".to_owned(), "b".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn cancel_and_drop_discard_the_pending_call() {
    let (seen, debouncer) = recorder();
    debouncer.call("x".to_owned());
    debouncer.cancel();
    assert!(!debouncer.is_pending());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(seen.lock().unwrap().is_empty());

    debouncer.call("y".to_owned());
    drop(debouncer);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn running_action_is_not_cancelled_by_a_new_call() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let debouncer = Debouncer::new(Duration::from_millis(100), move |value: u32| {
        let sink = sink.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            sink.lock().unwrap().push(value);
        }
    });

    debouncer.call(1);
    tokio::time::sleep(Duration::from_millis(150)).await;
    debouncer.call(2);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
}

#[test]
fn call_without_runtime_is_dropped() {
    let (seen, debouncer) = recorder();
    debouncer.call("lost".to_owned());
    assert!(!debouncer.is_pending());
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn search_debounce_tracks_text_and_searching_flag() {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let sink = queries.clone();
    let search = SearchDebounce::new(move |query: String| {
        let sink = sink.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            sink.lock().unwrap().push(query.clone());
            if query == "bad" { Err("index offline") } else { Ok(()) }
        }
    });

    search.set_text("umb");
    search.set_text("umbrella");
    assert_eq!(search.text(), "umbrella");
    assert!(!search.is_searching());

    tokio::time::sleep(Duration::from_millis(510)).await;
    assert!(search.is_searching());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!search.is_searching());
    assert_eq!(*queries.lock().unwrap(), vec!["umbrella".to_owned()]);

    search.set_text("bad");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!search.is_searching());
    assert_eq!(queries.lock().unwrap().len(), 2);
}
