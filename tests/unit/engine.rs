//! Tests for `NavigationEngine` driven directly, without the controller.

use crate::common::*;
use hyperlink_navigator::*;

fn engine() -> NavigationEngine {
    NavigationEngine::new(&NavigatorConfig::default())
}

#[test]
fn test_capture_current_uses_canonical_key() {
    let mut engine = engine();
    let mut host = FakeHost::at("/home", "Home");
    host.href = "http://LOCALHOST:80/a/../home".to_string();

    engine.capture_current(&host);

    assert!(engine.cache().contains(&url("/home")));
}

#[test]
fn test_restore_miss_changes_nothing() {
    let mut engine = engine();
    let mut host = FakeHost::at("/home", "Home");
    let bus = EventBus::new();

    assert!(!engine.restore(&url("/about"), &mut host, &bus));
    assert_eq!(host.title, "Home");
    assert!(host.pushed.is_empty());
}

#[test]
fn test_restore_skips_corrupt_snapshot() {
    let mut engine = engine();
    let mut host = FakeHost::at("/home", "Home");
    engine.capture_current(&host);
    host.reject_markup = true;
    host.href = url("/elsewhere");

    assert!(!engine.restore(&url("/home"), &mut host, &EventBus::new()));
    assert!(host.pushed.is_empty());
    assert_eq!(host.scrolls, 0);
}

#[test]
fn test_fetch_event_only_for_new_requests() {
    let mut engine = engine();
    let mut host = FakeHost::at("/home", "Home");
    let mut bus = EventBus::new();
    let fetches = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = std::rc::Rc::clone(&fetches);
    bus.subscribe(listener_fn(move |event: &PageEvent| {
        if matches!(event, PageEvent::Fetch { .. }) {
            counter.set(counter.get() + 1);
        }
        EventAction::Continue
    }));

    let first = engine.prefetch_replacement(&url("/a"), None, &mut host);
    let second = engine.fetch_replacement(&url("/a"), &mut host, &bus);
    let third = engine.fetch_replacement(&url("/a"), &mut host, &bus);

    assert!(first.is_issued());
    assert_eq!(second, Dispatch::Upgraded(first.id()));
    assert_eq!(third, Dispatch::Coalesced(first.id()));
    assert_eq!(fetches.get(), 0);

    engine.fetch_replacement(&url("/b"), &mut host, &bus);
    assert_eq!(fetches.get(), 1);
}

#[test]
fn test_capacity_query_does_not_change_it() {
    let mut engine = engine();

    assert_eq!(engine.configure_cache_capacity(None), 20);
    assert_eq!(engine.configure_cache_capacity(Some(5)), 5);
    assert_eq!(engine.configure_cache_capacity(None), 5);
    assert_eq!(engine.cache().capacity(), 5);
}

#[test]
fn test_loaded_page_is_cached_at_host_time() {
    let mut engine = engine();
    let mut host = FakeHost::at("/home", "Home");
    let bus = EventBus::new();
    host.advance(std::time::Duration::from_secs(30));

    let id = engine.fetch_replacement(&url("/a"), &mut host, &bus).id();
    let settlement = engine.complete(id, Ok(Page::standard("A").response()), &mut host, &bus);

    assert!(settlement.is_loaded());
    let entry = engine.cache().get(&url("/a")).unwrap();
    assert_eq!(entry.captured_at(), host.now());
}
