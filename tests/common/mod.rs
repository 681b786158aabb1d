//! Test utilities shared by the integration tests.
//!
//! Provides an in-memory [`FakeHost`] that records every side effect, a tiny
//! markup format it can parse, and a few navigator helpers.

#![allow(dead_code)]

use hyperlink_navigator::*;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const ORIGIN: &str = "http://localhost";

/// Tracked asset every standard page ships.
pub const APP_JS: &str = "/assets/app.js";

/// Absolute URL for a path on the test origin.
pub fn url(path: &str) -> String {
    format!("{}{}", ORIGIN, path)
}

// ============================================================================
// Page markup
// ============================================================================

/// Builder for the markup the fake host understands.
#[derive(Debug, Clone, Default)]
pub struct Page {
    title: String,
    body: String,
    meta: Vec<(String, String)>,
    assets: Vec<String>,
}

impl Page {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            ..Self::default()
        }
    }

    /// A page titled `title` that ships the standard asset set.
    pub fn standard(title: &str) -> Self {
        Self::new(title, &format!("<main>{}</main>", title)).asset(APP_JS)
    }

    pub fn meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    pub fn asset(mut self, src: &str) -> Self {
        self.assets.push(src.to_string());
        self
    }

    pub fn render(&self) -> String {
        let mut head = format!("<title>{}</title>", self.title);
        for (name, content) in &self.meta {
            head.push_str(&format!("<meta name=\"{}\" content=\"{}\">", name, content));
        }
        for src in &self.assets {
            head.push_str(&format!(
                "<script {} src=\"{}\"></script>",
                TRACK_ATTRIBUTE, src
            ));
        }
        format!(
            "<html><head>{}</head><body>{}</body></html>",
            head, self.body
        )
    }

    pub fn response(&self) -> Response {
        Response::html(self.render())
    }
}

fn between<'a>(raw: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = raw.find(open)? + open.len();
    let len = raw[start..].find(close)?;
    Some(&raw[start..start + len])
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    between(tag, &format!("{}=\"", name), "\"")
}

/// Parse markup produced by [`Page::render`]. A missing `<body>` is an error.
pub fn parse_page(raw: &str) -> Option<Document> {
    let body = between(raw, "<body>", "</body>")?;
    let title = between(raw, "<title>", "</title>").unwrap_or("");
    let mut document = Document::new(title, body);

    for tag in raw.split('<').skip(1) {
        if let Some(rest) = tag.strip_prefix("meta ") {
            if let (Some(name), Some(content)) = (attribute(rest, "name"), attribute(rest, "content"))
            {
                document = document.meta(name, content);
            }
        } else if tag.starts_with("script ") && tag.contains(TRACK_ATTRIBUTE) {
            if let Some(src) = attribute(tag, "src") {
                document = document.tracked_asset(src);
            }
        }
    }

    Some(document)
}

// ============================================================================
// FakeHost
// ============================================================================

/// In-memory host that records every call the navigator makes.
#[derive(Debug)]
pub struct FakeHost {
    pub href: String,
    pub title: String,
    pub body: String,
    pub meta: BTreeMap<String, String>,
    pub assets: Vec<String>,

    pub issued: Vec<(RequestId, String)>,
    pub aborted: Vec<RequestId>,
    pub pushed: Vec<String>,
    pub assigned: Vec<String>,
    pub scrolls: usize,
    pub scheduled: Vec<(TimerId, Duration)>,
    pub cancelled: Vec<TimerId>,

    /// Make every `parse` call fail.
    pub reject_markup: bool,

    epoch: Instant,
    elapsed: Duration,
    next_request: u64,
    next_timer: u64,
}

impl FakeHost {
    /// A host showing the standard page titled `title` at `path`.
    pub fn at(path: &str, title: &str) -> Self {
        Self {
            href: url(path),
            title: title.to_string(),
            body: format!("<main>{}</main>", title),
            meta: BTreeMap::new(),
            assets: vec![APP_JS.to_string()],
            issued: Vec::new(),
            aborted: Vec::new(),
            pushed: Vec::new(),
            assigned: Vec::new(),
            scrolls: 0,
            scheduled: Vec::new(),
            cancelled: Vec::new(),
            reject_markup: false,
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
            next_request: 0,
            next_timer: 0,
        }
    }

    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.insert(name.to_string(), content.to_string());
        self
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// The most recently issued request.
    pub fn last_request(&self) -> (RequestId, String) {
        self.issued.last().cloned().expect("no request issued")
    }

    /// The most recently scheduled timer.
    pub fn last_timer(&self) -> TimerId {
        self.scheduled.last().expect("no timer scheduled").0
    }

    /// Requests issued minus requests aborted.
    pub fn outstanding(&self) -> usize {
        self.issued.len() - self.aborted.len()
    }
}

impl Transport for FakeHost {
    fn issue(&mut self, url: &str) -> RequestId {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.issued.push((id, url.to_string()));
        id
    }

    fn abort(&mut self, id: RequestId) {
        self.aborted.push(id);
    }
}

impl DocumentBuilder for FakeHost {
    fn parse(&self, raw: &str) -> Option<Document> {
        if self.reject_markup {
            return None;
        }
        parse_page(raw)
    }
}

impl Location for FakeHost {
    fn href(&self) -> String {
        self.href.clone()
    }

    fn push_state(&mut self, url: &str) {
        self.pushed.push(url.to_string());
        self.href = url.to_string();
    }

    fn assign(&mut self, url: &str) {
        self.assigned.push(url.to_string());
    }
}

impl Dom for FakeHost {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn replace_body(&mut self, document: &Document) {
        self.body = document.body().to_string();
    }

    fn scroll_to_top(&mut self) {
        self.scrolls += 1;
    }

    fn meta_content(&self, name: &str) -> Option<String> {
        self.meta.get(name).cloned()
    }

    fn set_meta_content(&mut self, name: &str, content: &str) {
        if let Some(value) = self.meta.get_mut(name) {
            *value = content.to_string();
        }
    }

    fn tracked_assets(&self) -> Vec<String> {
        self.assets.clone()
    }

    fn document_html(&self) -> String {
        let page = self
            .meta
            .iter()
            .fold(Page::new(&self.title, &self.body), |page, (name, content)| {
                page.meta(name, content)
            });
        self.assets
            .iter()
            .fold(page, |page, src| page.asset(src))
            .render()
    }
}

impl Scheduler for FakeHost {
    fn now(&self) -> Instant {
        self.epoch + self.elapsed
    }

    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.scheduled.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.cancelled.push(id);
    }
}

// ============================================================================
// Navigator helpers
// ============================================================================

/// A started navigator on a supported host at `/home`.
pub fn started() -> Navigator<FakeHost> {
    let mut navigator = Navigator::new(FakeHost::at("/home", "Home"), &Capabilities::modern());
    navigator.start();
    navigator
}

/// Subscribe a listener that records event names in order.
pub fn record_events(navigator: &mut Navigator<FakeHost>) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    navigator.subscribe(listener_fn(move |event: &PageEvent| {
        sink.borrow_mut().push(event.name().to_string());
        EventAction::Continue
    }));
    seen
}

/// Click `href` with a plain primary click.
pub fn click(navigator: &mut Navigator<FakeHost>, href: &str) -> NavigationResult {
    navigator.on_click(&Anchor::new(href), &ClickEvent::primary())
}

/// Answer the most recent request with `page`.
pub fn respond(navigator: &mut Navigator<FakeHost>, page: &Page) -> Settlement {
    let (id, _) = navigator.host().last_request();
    navigator.complete(id, Ok(page.response()))
}
