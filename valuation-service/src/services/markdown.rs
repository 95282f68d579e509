//! Markdown → HTML conversion for model output.
//!
//! The model's text is untrusted. Raw HTML is escaped except for the few
//! presentational tags the report template asks for, and script-capable link
//! targets are replaced with `#`.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

/// Raw HTML the report may contain verbatim.
const ALLOWED_RAW_TAGS: &[&str] = &["<small>", "</small>", "<br>", "<br/>", "<br />"];

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Convert a Markdown completion into an HTML fragment.
///
/// Supports GFM tables and strikethrough. Entity references already present
/// in the source are decoded and re-escaped once, so escaped input is not
/// double-escaped.
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options).map(sanitize);

    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, parser);
    out
}

fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) if !is_allowed_raw(&raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_blocked_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if is_blocked_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        other => other,
    }
}

fn is_allowed_raw(raw: &str) -> bool {
    let tag = raw.trim().to_ascii_lowercase();
    ALLOWED_RAW_TAGS.contains(&tag.as_str())
}

fn is_blocked_url(url: &str) -> bool {
    let url: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}
