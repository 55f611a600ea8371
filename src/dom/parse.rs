//! HTML to arena conversion.
//!
//! `tl` does the tokenizing; this module copies its node tree into the
//! [`Page`] arena so the result can be mutated.
//!
//! `tl` tokenizes `<script>` and `<style>` bodies as markup, so those bodies
//! are cut out before parsing and restored verbatim as a single text child.

use super::{DomError, Element, NodeId, NodeKind, Page};

/// Parse `html` into detached nodes owned by `page`.
///
/// Returns the top-level nodes in source order. Their parent links are left
/// unset; the caller attaches them.
pub(super) fn parse_into(page: &mut Page, html: &str) -> Result<Vec<NodeId>, DomError> {
    let mut top = Vec::new();

    let (doctype, rest) = split_doctype(html);
    if let Some(doctype) = doctype {
        top.push(page.alloc(NodeKind::Doctype(doctype.to_string())));
    }

    let (markup, raw_text) = stash_raw_text(rest);
    let dom = tl::parse(&markup, tl::ParserOptions::default())
        .map_err(|e| DomError::Parse(format!("{e:?}")))?;
    let mut cx = Convert {
        parser: dom.parser(),
        raw_text: raw_text.into_iter(),
    };

    for handle in dom.children() {
        if let Some(id) = cx.convert(page, *handle) {
            top.push(id);
        }
    }
    Ok(top)
}

/// Elements whose body is text, not markup.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Empty every raw-text element body, returning the bodies in source order.
fn stash_raw_text(html: &str) -> (String, Vec<String>) {
    // ASCII lowercasing keeps byte offsets
    let lower = html.to_ascii_lowercase();
    let mut markup = String::with_capacity(html.len());
    let mut bodies = Vec::new();
    let mut pos = 0;

    while let Some(found) = lower[pos..].find('<') {
        let open = pos + found;
        let tail = &lower[open..];

        if tail.starts_with("<!--") {
            let end = tail.find("-->").map_or(html.len(), |e| open + e + 3);
            markup.push_str(&html[pos..end]);
            pos = end;
            continue;
        }

        let Some(tag) = RAW_TEXT_ELEMENTS.iter().find(|tag| opens_tag(tail, tag)) else {
            markup.push_str(&html[pos..=open]);
            pos = open + 1;
            continue;
        };
        let Some(gt) = tail.find('>') else {
            break;
        };
        let body_start = open + gt + 1;
        let close = format!("</{tag}");
        let body_end = lower[body_start..]
            .find(&close)
            .map_or(html.len(), |e| body_start + e);

        markup.push_str(&html[pos..body_start]);
        bodies.push(html[body_start..body_end].to_string());
        pos = body_end;
    }
    markup.push_str(&html[pos..]);
    (markup, bodies)
}

/// `tail` starts with `<tag` followed by a tag-name boundary.
fn opens_tag(tail: &str, tag: &str) -> bool {
    tail.strip_prefix('<')
        .and_then(|rest| rest.strip_prefix(tag))
        .and_then(|rest| rest.bytes().next())
        .is_some_and(|b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
}

/// Split a leading `<!DOCTYPE ...>` off the input.
fn split_doctype(html: &str) -> (Option<&str>, &str) {
    let trimmed = html.trim_start();
    let is_doctype = trimmed
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"));
    if !is_doctype {
        return (None, html);
    }
    match trimmed.find('>') {
        Some(end) => (Some(&trimmed[..=end]), &trimmed[end + 1..]),
        None => (None, html),
    }
}

struct Convert<'p, 'a> {
    parser: &'p tl::Parser<'a>,
    raw_text: std::vec::IntoIter<String>,
}

impl Convert<'_, '_> {
    fn convert(&mut self, page: &mut Page, handle: tl::NodeHandle) -> Option<NodeId> {
        let node = handle.get(self.parser)?;

        match node {
            tl::Node::Tag(tag) => {
                let mut elem = Element::new(tag.name().as_utf8_str().to_ascii_lowercase());
                for (key, value) in tag.attributes().iter() {
                    let key: &str = key.as_ref();
                    elem.attrs
                        .push((key.to_string(), value.map(|v| v.to_string())));
                }

                if RAW_TEXT_ELEMENTS.contains(&elem.tag.as_str()) {
                    let body = self.raw_text.next().unwrap_or_default();
                    let id = page.alloc(NodeKind::Element(elem));
                    if !body.is_empty() {
                        let text = page.alloc(NodeKind::Text(body));
                        page.attach(id, text);
                    }
                    return Some(id);
                }

                let id = page.alloc(NodeKind::Element(elem));
                for child in tag.children().top().iter() {
                    if let Some(child_id) = self.convert(page, *child) {
                        page.attach(id, child_id);
                    }
                }
                Some(id)
            }
            tl::Node::Raw(bytes) => {
                let text = bytes.as_utf8_str();
                if text.is_empty() {
                    None
                } else {
                    Some(page.alloc(NodeKind::Text(text.into_owned())))
                }
            }
            tl::Node::Comment(bytes) => {
                Some(page.alloc(NodeKind::Comment(bytes.as_utf8_str().into_owned())))
            }
        }
    }
}
