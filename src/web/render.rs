//! HTML pages.
//!
//! All user-supplied text is escaped. Post text and author labels have
//! `@mentions`, `#hashtags`, `$cashtags` and `http(s)://` URLs turned into
//! links.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use html_escape::{encode_double_quoted_attribute, encode_text};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::FeedSnapshot;
use crate::oauth::signer::encode;
use crate::session::SessionContext;
use crate::stats::{StatsReport, StatsView};

const PROFILE_BASE: &str = "https://twitter.com/";
/// Trailing characters that usually end a sentence rather than a URL.
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];

/// Candidate entities. Word boundaries are checked in [`entity_link`] since
/// the regex crate has no lookaround.
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?P<url>https?://[^\s<>"]+)"#,
        r"|(?P<mention>@[A-Za-z0-9_]{1,15})",
        r"|(?P<hashtag>#\w+)",
        r"|(?P<cashtag>\$[A-Za-z]{1,6}(?:[._][A-Za-z]{1,2})?)",
    ))
    .expect("entity pattern is a valid regex")
});

fn layout(title: &str, body: &str) -> String {
    let mut nav = String::from("<a href=\"/about\">About</a> | <a href=\"/recent\">Recent</a>");
    for view in StatsView::ALL {
        let _ = write!(nav, " | <a href=\"/{0}\">{0}</a>", view.name());
    }
    nav.push_str(" | <a href=\"/logout\">Log out</a>");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<nav>{}</nav>\n{}\n</body>\n</html>\n",
        encode_text(title),
        nav,
        body
    )
}

pub fn about_page(session: &SessionContext) -> String {
    let mut body = format!(
        "<h1>Your feed</h1>\n<p>Signed in as @{}. {} tweets fetched at {}.</p>\n<ul>\n",
        encode_text(&session.access_token.screen_name),
        session.snapshot.len(),
        session.snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
    );
    body.push_str("<li><a href=\"/recent\">Recent tweets</a></li>\n");
    for view in StatsView::ALL {
        let _ = writeln!(
            body,
            "<li><a href=\"/{}\">{}</a></li>",
            view.name(),
            encode_text(view.heading())
        );
    }
    body.push_str("</ul>");

    layout("About", &body)
}

pub fn recent_heading(snapshot: &FeedSnapshot) -> String {
    format!("The last {} tweets from your feed", snapshot.len())
}

pub fn recent_page(snapshot: &FeedSnapshot, tz: Tz) -> String {
    let heading = recent_heading(snapshot);
    let mut body = format!("<h1>{}</h1>\n<table>\n", encode_text(&heading));

    for post in snapshot.posts() {
        let user = format!("@{} ({})", post.author_handle, post.author_display_name);
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            post.created_at.with_timezone(&tz).format("%H:%M"),
            autolink(&user),
            autolink(&post.text)
        );
    }
    body.push_str("</table>");

    layout(&heading, &body)
}

pub fn stats_page(report: &StatsReport) -> String {
    let mut body = format!("<h1>{}</h1>\n<table>\n", encode_text(report.heading));
    for entry in &report.entries {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td></tr>",
            entry.count,
            autolink(&entry.label)
        );
    }
    body.push_str("</table>");

    layout(report.heading, &body)
}

pub fn db_page(ticks: &[DateTime<Utc>]) -> String {
    let mut body = String::from("<h1>Database</h1>\n<ul>\n");
    for tick in ticks {
        let _ = writeln!(body, "<li>Read from DB: {}</li>", tick.to_rfc3339());
    }
    body.push_str("</ul>");

    layout("Database", &body)
}

pub fn signed_out_page() -> String {
    layout(
        "Signed out",
        "<h1>Signed out</h1>\n<p><a href=\"/\">Sign in again</a></p>",
    )
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!(
            "<h1>Something went wrong</h1>\n<p>{}</p>\n<p><a href=\"/\">Sign in again</a></p>",
            encode_text(message)
        ),
    )
}

/// Escapes `text` and links mentions, hashtags, cashtags and URLs in it.
pub fn autolink(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut plain_start = 0;

    for caps in ENTITY.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if !starts_word(text, whole.start()) {
            continue;
        }
        let Some((end, link)) = entity_link(text, &caps) else {
            continue;
        };

        out.push_str(&encode_text(&text[plain_start..whole.start()]));
        out.push_str(&link);
        plain_start = end;
    }

    out.push_str(&encode_text(&text[plain_start..]));
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_word(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().map_or(true, |c| !is_word_char(c))
}

fn ends_word(text: &str, at: usize) -> bool {
    text[at..].chars().next().map_or(true, |c| !is_word_char(c))
}

/// The end offset and HTML of the entity in `caps`, or `None` if the match
/// does not stand on its own.
fn entity_link(text: &str, caps: &Captures<'_>) -> Option<(usize, String)> {
    if let Some(m) = caps.name("url") {
        let url = trim_url(m.as_str());
        let scheme_len = url.find("://")? + "://".len();
        if url.len() <= scheme_len {
            return None;
        }
        let html = format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            encode_double_quoted_attribute(url),
            encode_text(url)
        );
        return Some((m.start() + url.len(), html));
    }

    if let Some(m) = caps.name("mention") {
        if !ends_word(text, m.end()) {
            return None;
        }
        let handle = &m.as_str()[1..];
        let html = format!(
            "@<a class=\"username\" href=\"{PROFILE_BASE}{handle}\" target=\"_blank\" rel=\"noopener\">{handle}</a>"
        );
        return Some((m.end(), html));
    }

    if let Some(m) = caps.name("hashtag") {
        let tag = m.as_str();
        if tag[1..].chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        return Some((m.end(), search_link("hashtag", tag)));
    }

    let m = caps.name("cashtag")?;
    if !ends_word(text, m.end()) {
        return None;
    }
    Some((m.end(), search_link("cashtag", m.as_str())))
}

fn search_link(class: &str, tag: &str) -> String {
    format!(
        "<a class=\"{class}\" href=\"{PROFILE_BASE}search?q={}\" target=\"_blank\" rel=\"noopener\">{}</a>",
        encode(tag),
        encode_text(tag)
    )
}

/// Drops trailing punctuation from a URL candidate. A closing parenthesis
/// stays when it balances an opening one inside the URL.
fn trim_url(mut url: &str) -> &str {
    while let Some(last) = url.chars().next_back() {
        let unbalanced = last == ')' && url.matches(')').count() > url.matches('(').count();
        if !unbalanced && !URL_TRAILING_PUNCTUATION.contains(&last) {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}
