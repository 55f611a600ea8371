//! Arena to HTML.

use std::borrow::Cow;

use super::{NodeId, NodeKind, Page};

pub(super) fn to_html(page: &Page, id: NodeId) -> String {
    let mut out = String::new();
    write_node(page, id, &mut out);
    out
}

fn write_node(page: &Page, id: NodeId, out: &mut String) {
    match page.kind(id) {
        NodeKind::Document => {
            for &child in page.children(id) {
                write_node(page, child, out);
            }
        }
        NodeKind::Doctype(raw) | NodeKind::Text(raw) => out.push_str(raw),
        NodeKind::Comment(raw) => {
            // tl may or may not keep the delimiters
            if raw.starts_with("<!--") {
                out.push_str(raw);
            } else {
                out.push_str("<!--");
                out.push_str(raw);
                out.push_str("-->");
            }
        }
        NodeKind::Element(elem) => {
            out.push('<');
            out.push_str(&elem.tag);
            for (key, value) in &elem.attrs {
                out.push(' ');
                out.push_str(key);
                if let Some(value) = value {
                    out.push_str("=\"");
                    out.push_str(&escape_quotes(value));
                    out.push('"');
                }
            }
            out.push('>');

            if is_void_element(&elem.tag) {
                return;
            }
            for &child in page.children(id) {
                write_node(page, child, out);
            }
            out.push_str("</");
            out.push_str(&elem.tag);
            out.push('>');
        }
    }
}

/// Attribute values are kept as written in the source, so only the
/// delimiter needs escaping.
fn escape_quotes(value: &str) -> Cow<'_, str> {
    if value.contains('"') {
        Cow::Owned(value.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Void elements have no closing tag.
#[inline]
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}
