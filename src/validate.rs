//! Response validation.
//!
//! A fetched response is adoptable only if it has a `2xx` status, is markup, parses into a
//! [`Document`], and ships the same tracked assets as the current page. A
//! changed asset set means a deploy happened in between; swapping the body
//! would run the old scripts against the new markup, so the caller must do a
//! full load instead.

use crate::error::Rejection;
use crate::host::{Document, DocumentBuilder, Response};

const HTML_CONTENT_TYPES: [&str; 3] = ["text/html", "application/xhtml+xml", "application/xml"];

/// Check a `Content-Type` value against the HTML/XHTML/XML family.
///
/// The media type must match exactly (parameters after `;` are allowed).
pub fn is_html_content_type(content_type: &str) -> bool {
    HTML_CONTENT_TYPES.iter().any(|media| {
        content_type
            .strip_prefix(media)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(';'))
    })
}

/// Check whether the tracked asset sets differ.
pub fn assets_changed(current: &[String], incoming: &[String]) -> bool {
    current.len() != incoming.len() || current.iter().any(|asset| !incoming.contains(asset))
}

/// Classify `response` as adoptable (returning its document) or rejected.
pub fn validate<B>(
    response: &Response,
    builder: &B,
    current_assets: &[String],
) -> Result<Document, Rejection>
where
    B: DocumentBuilder + ?Sized,
{
    if !(200..=299).contains(&response.status) {
        return Err(Rejection::Status {
            status: response.status,
        });
    }

    let content_type = response.content_type.as_deref();
    if !content_type.is_some_and(is_html_content_type) {
        return Err(Rejection::ContentType {
            content_type: content_type.map(str::to_string),
        });
    }

    let document = builder.parse(&response.body).ok_or(Rejection::Unparseable)?;

    if assets_changed(current_assets, document.tracked_assets()) {
        return Err(Rejection::AssetsChanged);
    }

    Ok(document)
}
