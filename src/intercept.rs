//! Link classification: intercept or pass through.
//!
//! A link activation is checked against an ordered list of rules; the first
//! rule that declines hands the activation back to the browser.
//!
//! # Built-in rules
//!
//! | Order | Rule | [`PassthroughReason`] |
//! |-------|------|-----------------------|
//! | 1 | default already prevented | `DefaultPrevented` |
//! | 2 | non-primary button or modifier key | `ModifiedClick` |
//! | 3 | anchor has a `target` | `ExplicitTarget` |
//! | 4 | anchor has the opt-out attribute | `OptedOut` |
//! | 5 | href does not resolve | `InvalidUrl` |
//! | 6 | different origin | `CrossOrigin` |
//! | 7 | same page, only the fragment differs | `SamePageAnchor` |
//! | 8 | same page, empty fragment | `EmptyAnchor` |
//! | 9 | pathname ends in `.ext` | `FileExtension` |
//! | 10 | registered [`InterceptRule`]s, by priority | `Rule` |
//!
//! Rules 1–2 inspect the activation event; hover prefetching only applies
//! rules 3–10 via [`classify_link`].
//!
//! # Custom rules
//!
//! ```
//! use hyperlink_navigator::intercept::{rule_fn, RuleAction};
//!
//! let admin_reloads = rule_fn(|link| {
//!     if link.target.pathname().starts_with("/admin") {
//!         RuleAction::passthrough("admin pages always reload")
//!     } else {
//!         RuleAction::Continue
//!     }
//! });
//! ```

use crate::canonical::CanonicalUrl;
use crate::error::PassthroughReason;
use crate::trace_log;

// ============================================================================
// Activation inputs
// ============================================================================

/// An `<a>` element as seen by the navigator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    href: String,
    target: Option<String>,
    attributes: Vec<String>,
}

impl Anchor {
    /// An anchor pointing at `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    /// Set the browsing-context `target`.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Mark the anchor with a (valueless) attribute.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// Raw href as written in the markup.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Check if a non-empty `target` is set.
    pub fn has_target(&self) -> bool {
        self.target.as_deref().is_some_and(|target| !target.is_empty())
    }

    /// Check if the anchor carries attribute `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr == name)
    }
}

/// Mouse button that activated a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    /// Usually the left button; also keyboard activation.
    #[default]
    Primary,
    /// Usually the wheel button.
    Auxiliary,
    /// Usually the right button.
    Secondary,
}

/// Modifier keys held during activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Check if any modifier is held.
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// A click on an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickEvent {
    pub button: MouseButton,
    pub modifiers: Modifiers,
    /// Whether an earlier handler already called `preventDefault()`.
    pub default_prevented: bool,
}

impl ClickEvent {
    /// A plain primary-button click.
    pub fn primary() -> Self {
        Self::default()
    }

    /// Set the button.
    pub fn button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Set the held modifiers.
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the event as already prevented.
    pub fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }
}

// ============================================================================
// InterceptRule trait
// ============================================================================

/// What a rule sees about a link.
#[derive(Debug, Clone, Copy)]
pub struct LinkRequest<'a> {
    /// The activated anchor.
    pub anchor: &'a Anchor,
    /// The anchor's resolved href.
    pub target: &'a CanonicalUrl,
    /// The current document location.
    pub current: &'a CanonicalUrl,
}

/// A rule's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// No objection; later rules decide.
    Continue,
    /// Leave the link to the browser.
    Passthrough { reason: String },
}

impl RuleAction {
    /// Create a passthrough verdict with a human-readable reason.
    pub fn passthrough(reason: impl Into<String>) -> Self {
        Self::Passthrough {
            reason: reason.into(),
        }
    }
}

/// Application-defined interception rule, checked after the built-ins.
pub trait InterceptRule: 'static {
    /// Inspect a link that passed every built-in rule.
    fn check(&self, link: &LinkRequest<'_>) -> RuleAction;

    /// Rule name for debugging and passthrough reasons.
    fn name(&self) -> &'static str {
        "InterceptRule"
    }

    /// Priority for execution order. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

/// Create a rule from a function or closure.
pub const fn rule_fn<F>(f: F) -> FnRule<F>
where
    F: Fn(&LinkRequest<'_>) -> RuleAction + 'static,
{
    FnRule { f }
}

/// Rule created from a function or closure.
pub struct FnRule<F> {
    f: F,
}

impl<F> InterceptRule for FnRule<F>
where
    F: Fn(&LinkRequest<'_>) -> RuleAction + 'static,
{
    fn check(&self, link: &LinkRequest<'_>) -> RuleAction {
        (self.f)(link)
    }
}

/// Registered rules kept in priority order (stable for equal priorities).
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn InterceptRule>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule.
    pub fn add(&mut self, rule: impl InterceptRule) {
        self.rules.push(Box::new(rule));
        self.rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority()));
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn check(&self, link: &LinkRequest<'_>) -> Option<PassthroughReason> {
        self.rules.iter().find_map(|rule| match rule.check(link) {
            RuleAction::Continue => None,
            RuleAction::Passthrough { reason } => Some(PassthroughReason::Rule {
                name: rule.name(),
                reason,
            }),
        })
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Outcome of classifying a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// Take over the navigation to this URL.
    Intercept(CanonicalUrl),
    /// Leave it to the browser.
    Passthrough(PassthroughReason),
}

/// Apply the event rules, then [`classify_link`].
pub fn classify_click(
    click: &ClickEvent,
    anchor: &Anchor,
    current_href: &str,
    opt_out_attribute: &str,
    rules: &RuleSet,
) -> LinkDecision {
    if click.default_prevented {
        return LinkDecision::Passthrough(PassthroughReason::DefaultPrevented);
    }
    if click.button != MouseButton::Primary || click.modifiers.any() {
        return LinkDecision::Passthrough(PassthroughReason::ModifiedClick);
    }
    classify_link(anchor, current_href, opt_out_attribute, rules)
}

/// Apply the anchor and URL rules.
pub fn classify_link(
    anchor: &Anchor,
    current_href: &str,
    opt_out_attribute: &str,
    rules: &RuleSet,
) -> LinkDecision {
    let decision = decide(anchor, current_href, opt_out_attribute, rules);
    if let LinkDecision::Passthrough(reason) = &decision {
        trace_log!("Passing '{}' through: {}", anchor.href(), reason);
    }
    decision
}

fn decide(
    anchor: &Anchor,
    current_href: &str,
    opt_out_attribute: &str,
    rules: &RuleSet,
) -> LinkDecision {
    use PassthroughReason as Reason;

    if anchor.has_target() {
        return LinkDecision::Passthrough(Reason::ExplicitTarget);
    }
    if anchor.has_attribute(opt_out_attribute) {
        return LinkDecision::Passthrough(Reason::OptedOut);
    }

    let (Ok(current), Ok(target)) = (
        CanonicalUrl::parse(current_href),
        CanonicalUrl::resolve(anchor.href(), current_href),
    ) else {
        return LinkDecision::Passthrough(Reason::InvalidUrl);
    };

    if !target.is_same_origin(&current) {
        return LinkDecision::Passthrough(Reason::CrossOrigin);
    }
    if target.is_same_page(&current) {
        if !target.hash().is_empty() {
            return LinkDecision::Passthrough(Reason::SamePageAnchor);
        }
        if target.has_empty_fragment() {
            return LinkDecision::Passthrough(Reason::EmptyAnchor);
        }
    }
    if target.has_extension() {
        return LinkDecision::Passthrough(Reason::FileExtension);
    }

    let link = LinkRequest {
        anchor,
        target: &target,
        current: &current,
    };
    if let Some(reason) = rules.check(&link) {
        return LinkDecision::Passthrough(reason);
    }

    LinkDecision::Intercept(target)
}
