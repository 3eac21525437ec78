//! HTML to plain text
//!
//! Covers the small HTML subset the API emits in `text` and `about`
//! fields: `<p>`, `<a href>`, `<i>`, `<pre><code>` and character entities.

/// Convert an HTML fragment to plain text
///
/// Paragraphs are separated by a blank line, links show their target, and
/// preformatted blocks are kept verbatim with a four space indent.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pre: Option<String> = None;
    let mut link: Option<(String, usize)> = None;
    let mut rest = html;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            push_text(&mut out, pre.as_mut(), rest);
            break;
        };
        push_text(&mut out, pre.as_mut(), &rest[..open]);

        let Some(close) = rest[open..].find('>') else {
            // Unterminated tag, keep it as text
            push_text(&mut out, pre.as_mut(), &rest[open..]);
            break;
        };
        let tag = Tag::parse(&rest[open + 1..open + close]);
        rest = &rest[open + close + 1..];

        match (tag.name.as_str(), tag.closing) {
            ("p", false) => paragraph_break(&mut out, link.as_mut()),
            ("br", _) => match pre.as_mut() {
                Some(buf) => buf.push('\n'),
                None => out.push('\n'),
            },
            ("pre", false) => {
                paragraph_break(&mut out, link.as_mut());
                pre = Some(String::new());
            }
            ("pre", true) => {
                if let Some(buf) = pre.take() {
                    push_preformatted(&mut out, &buf);
                }
            }
            ("a", false) if pre.is_none() => {
                link = tag.href.map(|href| (href, out.len()));
            }
            ("a", true) => {
                if let Some((href, start)) = link.take() {
                    finish_link(&mut out, start, &href);
                }
            }
            _ => {}
        }
    }

    if let Some(buf) = pre.take() {
        push_preformatted(&mut out, &buf);
    }

    out.trim().to_string()
}

struct Tag {
    name: String,
    closing: bool,
    href: Option<String>,
}

impl Tag {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (closing, body) = match raw.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, raw),
        };
        let body = body.trim_end_matches('/');
        let name_end = body
            .find(|c: char| c.is_whitespace())
            .unwrap_or(body.len());
        let name = body[..name_end].to_ascii_lowercase();
        let href = attribute(&body[name_end..], "href").map(|v| decode_entities(&v));

        Self {
            name,
            closing,
            href,
        }
    }
}

/// Extract a quoted attribute value
fn attribute(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_ascii_lowercase();
    let mut search = 0;
    while let Some(found) = lower[search..].find(name) {
        let at = search + found;
        search = at + name.len();

        let preceded_ok = at == 0 || lower.as_bytes()[at - 1].is_ascii_whitespace();
        let after = attrs[search..].trim_start();
        let Some(value) = after.strip_prefix('=') else {
            continue;
        };
        if !preceded_ok {
            continue;
        }

        let value = value.trim_start();
        let quote = value.chars().next()?;
        if quote == '"' || quote == '\'' {
            let inner = &value[1..];
            let end = inner.find(quote)?;
            return Some(inner[..end].to_string());
        }
        let end = value
            .find(|c: char| c.is_whitespace())
            .unwrap_or(value.len());
        return Some(value[..end].to_string());
    }
    None
}

fn push_text(out: &mut String, pre: Option<&mut String>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let text = decode_entities(raw);
    match pre {
        Some(buf) => buf.push_str(&text),
        None => out.push_str(&text),
    }
}

fn paragraph_break(out: &mut String, open_link: Option<&mut (String, usize)>) {
    if out.trim_end().is_empty() {
        return;
    }
    while out.ends_with(' ') || out.ends_with('\n') {
        out.pop();
    }
    // Trimming can cut into an open link's text; keep its start in bounds.
    if let Some((_, start)) = open_link {
        *start = (*start).min(out.len());
    }
    out.push_str("\n\n");
}

fn push_preformatted(out: &mut String, block: &str) {
    for line in block.trim_matches('\n').lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
}

/// Replace the link text with its target
///
/// Long links are shortened with a trailing "..." in the text, so text that
/// is a prefix of the target collapses to the target alone.
fn finish_link(out: &mut String, start: usize, href: &str) {
    let text = out[start..].to_string();
    let shown = text.trim_end_matches("...");
    if text.is_empty() || href.starts_with(shown) {
        out.truncate(start);
        out.push_str(href);
    } else if text != href {
        out.push_str(" (");
        out.push_str(href);
        out.push(')');
    }
}

/// Decode named and numeric character references
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}
