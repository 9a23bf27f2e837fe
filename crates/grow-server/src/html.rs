//! HTML page chrome.
//!
//! Wraps a [`PageModel`] in a Bulma layout: a hero title with the heading,
//! the sibling listing on the left and the body on the right.
//!
//! Compiler output ([`Body::Content`]) is inserted without escaping. It is
//! the one place untrusted-looking text reaches the page verbatim, and it is
//! trusted because the compiler is. Every other interpolated string is
//! escaped.

use grow_site::{Body, ListingEntry, PageModel};

const BULMA_CSS: &str = "https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";
const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.6.0/css/all.min.css";
const FONT_AWESOME_INTEGRITY: &str = "sha512-Kc323vGBEqzTmouAECnVceyQqyqdsSiqLQISBL29aUW4U/M7pSPA/gEUZQqv1cwx4OnYxTxve5UMg5GT6L4JJg==";
const MATHJAX_JS: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";

/// Icons get a fixed width so names line up.
const INLINE_CSS: &str = "i.fa-regular { width: 1.5rem; text-align: center; }";

/// Render a full HTML document for `page`.
pub(crate) fn render_page(page: &PageModel, version: &str, live_reload: bool) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if !version.is_empty() {
        out.push_str(&format!(
            "<meta name=\"generator\" content=\"grow {}\">\n",
            escape_html(version)
        ));
    }
    out.push_str(&format!("<title>{}</title>\n", escape_html(&page.title())));
    out.push_str(&format!("<style>{INLINE_CSS}</style>\n"));
    out.push_str(&format!("<link rel=\"stylesheet\" href=\"{BULMA_CSS}\">\n"));
    out.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{FONT_AWESOME_CSS}\" integrity=\"{FONT_AWESOME_INTEGRITY}\" \
         crossorigin=\"anonymous\" referrerpolicy=\"no-referrer\">\n"
    ));
    out.push_str(&format!("<script src=\"{MATHJAX_JS}\"></script>\n"));
    if live_reload {
        out.push_str("<script src=\"/live-reload.js\" defer></script>\n");
    }
    out.push_str("</head>\n<body>\n");

    out.push_str(&format!(
        "<section class=\"hero\"><div class=\"hero-body\"><p class=\"title\">{}</p></div></section>\n",
        escape_html(&page.heading.to_string())
    ));

    out.push_str("<div class=\"section\"><div class=\"container\"><div class=\"columns\">\n");
    out.push_str("<div class=\"column is-two-fifths\">");
    render_menu(&mut out, &page.entries);
    out.push_str("</div>\n");
    out.push_str("<div class=\"column\">");
    render_body(&mut out, &page.body);
    out.push_str("</div>\n");
    out.push_str("</div></div></div>\n</body>\n</html>\n");

    out
}

fn render_menu(out: &mut String, entries: &[ListingEntry]) {
    out.push_str("<aside class=\"menu\"><ul class=\"menu-list\">");
    for entry in entries {
        let icon = if entry.node.is_file() {
            "fa-file"
        } else {
            "fa-folder"
        };
        out.push_str(&format!(
            "<li><a href=\"{}\"><i class=\"fa-regular {icon}\"></i>{}</a></li>",
            escape_html(&entry.href),
            escape_html(&entry.node.to_string())
        ));
    }
    out.push_str("</ul></aside>");
}

fn render_body(out: &mut String, body: &Body) {
    match body {
        Body::Placeholder(name) => out.push_str(&format!(
            "<div class=\"notification is-info\">{}</div>",
            escape_html(name)
        )),
        Body::Content(markup) => {
            out.push_str("<div class=\"content\">");
            out.push_str(markup);
            out.push_str("</div>");
        }
        Body::Error(text) => out.push_str(&format!(
            "<div class=\"notification is-danger\">{}</div>",
            escape_html(text)
        )),
    }
}

/// Escape text for HTML element content and quoted attributes.
pub(crate) fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
