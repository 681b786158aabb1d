//! Visit Demo
//!
//! Drives a `Navigator` against an in-memory site: a click, a hover
//! prefetch, a back navigation served from cache, and a JSON endpoint that
//! forces a full load.
//!
//! Run with `RUST_LOG=debug cargo run --example visit_demo` to see the
//! navigator's own logging.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use hyperlink_navigator::{
    listener_fn, Anchor, Capabilities, ClickEvent, Document, DocumentBuilder, Dom, EventAction,
    Location, Navigator, PageEvent, RequestId, Response, Scheduler, TimerId, Transport,
    TransportError,
};

// ============================================================================
// In-memory site
// ============================================================================

const ORIGIN: &str = "http://demo.local";

fn page(title: &str, body: &str) -> String {
    format!("<title>{title}</title><body>{body}</body>")
}

fn between<'a>(raw: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = raw.find(open)? + open.len();
    let len = raw[start..].find(close)?;
    Some(&raw[start..start + len])
}

struct DemoHost {
    site: HashMap<String, Response>,
    pending: VecDeque<(RequestId, String)>,
    timers: Vec<TimerId>,
    href: String,
    title: String,
    body: String,
    started: Instant,
    next_id: u64,
}

impl DemoHost {
    fn new() -> Self {
        let mut site = HashMap::new();
        site.insert(
            format!("{ORIGIN}/"),
            Response::html(page("Home", "<h1>Welcome</h1>")),
        );
        site.insert(
            format!("{ORIGIN}/docs"),
            Response::html(page("Docs", "<h1>Documentation</h1>")),
        );
        site.insert(
            format!("{ORIGIN}/pricing"),
            Response::html(page("Pricing", "<h1>Plans</h1>")),
        );
        site.insert(
            format!("{ORIGIN}/status"),
            Response::ok("application/json", r#"{"ok":true}"#),
        );

        Self {
            site,
            pending: VecDeque::new(),
            timers: Vec::new(),
            href: format!("{ORIGIN}/"),
            title: "Home".to_string(),
            body: "<h1>Welcome</h1>".to_string(),
            started: Instant::now(),
            next_id: 0,
        }
    }

    fn serve(&self, url: &str) -> Result<Response, TransportError> {
        self.site
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::network(format!("404 for {url}")))
    }
}

impl Transport for DemoHost {
    fn issue(&mut self, url: &str) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.pending.push_back((id, url.to_string()));
        id
    }

    fn abort(&mut self, id: RequestId) {
        self.pending.retain(|(pending, _)| *pending != id);
    }
}

impl DocumentBuilder for DemoHost {
    fn parse(&self, raw: &str) -> Option<Document> {
        let body = between(raw, "<body>", "</body>")?;
        let title = between(raw, "<title>", "</title>").unwrap_or_default();
        Some(Document::new(title, body))
    }
}

impl Location for DemoHost {
    fn href(&self) -> String {
        self.href.clone()
    }

    fn push_state(&mut self, url: &str) {
        println!("  history.pushState({url})");
        self.href = url.to_string();
    }

    fn assign(&mut self, url: &str) {
        println!("  location.assign({url})  <- full page load");
    }
}

impl Dom for DemoHost {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn replace_body(&mut self, document: &Document) {
        self.body = document.body().to_string();
    }

    fn scroll_to_top(&mut self) {}

    fn meta_content(&self, _name: &str) -> Option<String> {
        None
    }

    fn set_meta_content(&mut self, _name: &str, _content: &str) {}

    fn tracked_assets(&self) -> Vec<String> {
        Vec::new()
    }

    fn document_html(&self) -> String {
        page(&self.title, &self.body)
    }
}

impl Scheduler for DemoHost {
    fn now(&self) -> Instant {
        self.started + Duration::from_millis(self.next_id * 100)
    }

    fn schedule(&mut self, _delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(id);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|timer| *timer != id);
    }
}

// ============================================================================
// Event loop
// ============================================================================

/// Deliver every outstanding response, like the host's network callbacks.
fn drain(navigator: &mut Navigator<DemoHost>) {
    while let Some((id, url)) = navigator.host_mut().pending.pop_front() {
        let response = navigator.host().serve(&url);
        let settlement = navigator.complete(id, response);
        println!("  {id} settled: {settlement:?}");
    }
}

fn show(navigator: &Navigator<DemoHost>) {
    let host = navigator.host();
    println!("  now showing '{}' at {}\n", host.title, host.href);
}

fn main() {
    env_logger::init();

    let mut navigator = Navigator::new(DemoHost::new(), &Capabilities::modern());
    navigator.subscribe(listener_fn(|event: &PageEvent| {
        println!("  event {event}");
        EventAction::Continue
    }));
    navigator.start();
    show(&navigator);

    println!("click /docs");
    let result = navigator.on_click(&Anchor::new("/docs"), &ClickEvent::primary());
    println!("  -> {result:?}");
    drain(&mut navigator);
    show(&navigator);

    println!("hover /pricing");
    navigator.on_mouse_move();
    navigator.on_mouse_enter(&Anchor::new("/pricing"));
    if let Some(timer) = navigator.host_mut().timers.pop() {
        navigator.on_timer(timer);
    }
    drain(&mut navigator);
    navigator.on_mouse_leave();
    println!("  cached pages: {:?}\n", navigator.cache().keys().collect::<Vec<_>>());

    println!("back to /");
    navigator.host_mut().href = format!("{ORIGIN}/");
    navigator.on_popstate(&format!("{ORIGIN}/"));
    show(&navigator);
    drain(&mut navigator);

    println!("click /status (JSON)");
    navigator.on_click(&Anchor::new("/status"), &ClickEvent::primary());
    drain(&mut navigator);
    show(&navigator);
}
