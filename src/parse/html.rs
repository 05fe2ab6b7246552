//! A small, forgiving HTML tokenizer.
//!
//! Produces a flat stream of open/close/text events. Tag balance is never
//! checked; comments, doctypes and script/style bodies are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

/// Content between `<body>` tags of a full document.
static BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body>").expect("body regex"));

/// One tokenizer event.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlEvent {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Close {
        name: String,
    },
    /// Raw text, entities not yet decoded.
    Text(String),
}

impl HtmlEvent {
    /// Whether an open tag carries the note marker class.
    pub fn is_note(&self) -> bool {
        match self {
            HtmlEvent::Open { attrs, .. } => attrs
                .iter()
                .any(|(k, v)| k == "class" && v.split_whitespace().any(|c| c == "note")),
            _ => false,
        }
    }
}

/// If `html` is a full document, return only the body content.
pub fn extract_body(html: &str) -> &str {
    BODY.captures(html)
        .and_then(|c| c.get(1))
        .map_or(html, |m| m.as_str())
}

/// Split `html` into events.
pub fn tokenize(html: &str) -> Vec<HtmlEvent> {
    let mut events = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            events.push(HtmlEvent::Text(rest.to_string()));
            break;
        };
        if lt > 0 {
            events.push(HtmlEvent::Text(rest[..lt].to_string()));
        }
        rest = &rest[lt..];

        if rest.starts_with("<!--") {
            rest = match rest.find("-->") {
                Some(end) => &rest[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(gt) = rest.find('>') else {
            events.push(HtmlEvent::Text(rest.to_string()));
            break;
        };
        let inner = &rest[1..gt];
        rest = &rest[gt + 1..];

        if inner.starts_with('!') || inner.starts_with('?') {
            continue;
        }
        if let Some(name) = inner.strip_prefix('/') {
            events.push(HtmlEvent::Close {
                name: name.trim().to_ascii_lowercase(),
            });
            continue;
        }

        let self_closing = inner.ends_with('/');
        let inner = inner.trim_end_matches('/');
        let name_end = inner
            .find(|c: char| c.is_whitespace())
            .unwrap_or(inner.len());
        let name = inner[..name_end].to_ascii_lowercase();
        if name.is_empty() {
            events.push(HtmlEvent::Text(format!("<{}>", inner)));
            continue;
        }
        let attrs = parse_attrs(&inner[name_end..]);

        if name == "script" || name == "style" {
            let close = format!("</{}", name);
            rest = match rest.to_ascii_lowercase().find(&close) {
                Some(end) => match rest[end..].find('>') {
                    Some(gt) => &rest[end + gt + 1..],
                    None => "",
                },
                None => "",
            };
            continue;
        }

        events.push(HtmlEvent::Open {
            name: name.clone(),
            attrs,
        });
        if self_closing {
            events.push(HtmlEvent::Close { name });
        }
    }
    events
}

fn parse_attrs(mut s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            break;
        }
        let key_end = s
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(s.len());
        let key = s[..key_end].to_ascii_lowercase();
        s = s[key_end..].trim_start();

        let value = if let Some(after_eq) = s.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    s = body.get(end + 1..).unwrap_or("");
                    body[..end].to_string()
                }
                _ => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    s = &after_eq[end..];
                    after_eq[..end].to_string()
                }
            }
        } else {
            String::new()
        };
        if !key.is_empty() {
            attrs.push((key, decode_entities(&value)));
        }
    }
    attrs
}

/// Decode named and numeric character references.
///
/// Unknown references are left as written.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Escape text for embedding in generated HTML.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_nested_list_with_note() {
        let events = tokenize(r#"<li>a<span class="note big">n</span></li>"#);
        assert_eq!(events.len(), 6);
        assert!(events[2].is_note());
        assert_eq!(events[1], HtmlEvent::Text("a".into()));
        assert_eq!(events[5], HtmlEvent::Close { name: "li".into() });
    }

    #[test]
    fn skips_comments_and_doctype() {
        let events = tokenize("<!DOCTYPE html><!-- hi --><p>x</p>");
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt; &#65;&#x42; &bogus; &"), "a & b <c> AB &bogus; &");
        assert_eq!(decode_entities("caf&eacute; &mdash; &frac12;"), "café — ½");
    }

    #[test]
    fn extracts_body() {
        assert_eq!(
            extract_body("<html><head></head><body><li>x</li></body></html>"),
            "<li>x</li>"
        );
        assert_eq!(extract_body("<li>x</li>"), "<li>x</li>");
    }
}
