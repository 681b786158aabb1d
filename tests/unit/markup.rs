//! Tests for the fake host's markup helpers, so failures elsewhere point at
//! the navigator rather than the fixture.

use crate::common::*;
use hyperlink_navigator::Dom;

#[test]
fn test_page_parses_back() {
    let raw = Page::standard("About").meta("csrf-token", "abc").render();
    let document = parse_page(&raw).unwrap();

    assert_eq!(document.title(), "About");
    assert_eq!(document.body(), "<main>About</main>");
    assert_eq!(document.meta_content("csrf-token"), Some("abc"));
    assert_eq!(document.tracked_assets(), [APP_JS]);
}

#[test]
fn test_missing_body_is_unparseable() {
    assert!(parse_page("<html><head><title>x</title></head></html>").is_none());
}

#[test]
fn test_host_snapshot_matches_live_state() {
    let host = FakeHost::at("/home", "Home").with_meta("csrf-token", "t");
    let document = parse_page(&host.document_html()).unwrap();

    assert_eq!(document.title(), "Home");
    assert_eq!(document.meta_content("csrf-token"), Some("t"));
    assert_eq!(document.tracked_assets(), host.tracked_assets());
}
