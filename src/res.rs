use axum::{
    debug_handler,
    http::header,
    response::{Html, IntoResponse},
};
use pulldown_cmark::{Event, Options, Parser};

use crate::{appresult::UserError, nav::Page, session::SessionState};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], include_res!(str, "/style.css"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Warning,
    Error,
}

/// One-shot message shown above the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Error, text: text.into() }
    }

    fn to_html(&self) -> String {
        let class = match self.kind {
            FlashKind::Success => "success",
            FlashKind::Warning => "warning",
            FlashKind::Error => "error",
        };
        format!(r#"<div class="flash {class}">{}</div>"#, escape(&self.text))
    }
}

impl From<UserError> for Flash {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Unconfirmed => Flash::warning(err.to_string()),
            _ => Flash::error(err.to_string()),
        }
    }
}

/// Wraps a page body in the shared chrome: sidebar menu, flashes, logout.
pub fn layout(state: &SessionState, page: Page, flashes: &[Flash], body: &str) -> Html<String> {
    let options: String = state
        .menu()
        .iter()
        .map(|item| {
            let selected = if *item == page { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, item.key(), item.title())
        })
        .collect();

    let (sidebar_title, account) = match state.identity() {
        Some(identity) => (
            "User Dashboard",
            fill(include_res!(str, "/pages/logout.html"), &[
                ("username", &escape(&identity.username)),
                ("role", identity.role.as_str()),
            ]),
        ),
        None => ("User Authentication", String::new()),
    };

    let flashes: String = flashes.iter().map(Flash::to_html).collect();

    Html(fill(include_res!(str, "/pages/layout.html"), &[
        ("title", page.title()),
        ("sidebar_title", sidebar_title),
        ("options", &options),
        ("account", &account),
        ("flashes", &flashes),
        ("body", body),
    ]))
}

/// Substitutes `{key}` placeholders in one pass. Substituted text is never
/// scanned again, so user content containing `{body}` stays literal.
/// Unknown placeholders are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let found = tail.find('}').and_then(|end| {
            let name = &tail[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (end, *value))
        });
        match found {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markdown to HTML. Raw HTML in the source is shown as text, never passed
/// through, so user-written markdown can't inject markup.
pub fn markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accounts::Role, session::Identity};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b a="1">&'"#), "&lt;b a=&quot;1&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn markdown_drops_raw_html() {
        let html = markdown("**hi** <script>alert(1)</script>");
        assert!(html.contains("<strong>hi</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn fill_is_single_pass() {
        let html = fill("<p>{a}</p><p>{b}</p>{missing}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(html, "<p>{b}</p><p>two</p>{missing}");
        assert_eq!(fill("{ {a} }", &[("a", "x")]), "{ x }");
        assert_eq!(fill("{unclosed", &[("unclosed", "x")]), "{unclosed");
    }

    #[test]
    fn username_cannot_pull_in_the_body() {
        let state = SessionState::Authenticated(Identity { id: 1, username: "{body}".into(), role: Role::User });
        let Html(html) = layout(&state, Page::Info, &[Flash::success("Welcome back, {body}!")], "<p>page</p>");
        assert_eq!(html.matches("<p>page</p>").count(), 1);
        assert!(html.contains("Welcome back, {body}!"));
        assert!(html.contains("<strong>{body}</strong>"));
    }

    #[test]
    fn layout_lists_reachable_pages() {
        let Html(html) = layout(&SessionState::Anonymous, Page::Login, &[Flash::error("nope")], "<p>body</p>");
        assert!(html.contains(r#"<option value="login" selected>Login</option>"#));
        assert!(html.contains(r#"value="forgot_password""#));
        assert!(!html.contains(r#"value="chat""#));
        assert!(!html.contains(r#"action="/logout""#));
        assert!(html.contains(r#"<div class="flash error">nope</div>"#));
        assert!(html.contains("<p>body</p>"));

        let state = SessionState::Authenticated(Identity { id: 1, username: "<amy>".into(), role: Role::Doctor });
        let Html(html) = layout(&state, Page::Chat, &[], "");
        assert!(html.contains(r#"value="chat" selected"#));
        assert!(!html.contains(r#"value="login""#));
        assert!(html.contains(r#"action="/logout""#));
        assert!(html.contains("&lt;amy&gt;"));
    }
}
