//! Indented HTML serialization of an `RcDom` tree.
//!
//! One tag or text run per line, one space of indent per nesting level. Whitespace-only
//! text is dropped, except inside `<pre>`/`<textarea>` which are written inline untouched,
//! and `<script>`/`<style>` whose bodies are emitted verbatim.

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Parse with scripting off, so `<noscript>` content is a subtree rather than raw text.
pub fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(RcDom::default(), opts).one(html)
}

/// Children of a node; a `<template>` element's children live in its contents fragment.
pub(crate) fn child_nodes(handle: &Handle) -> Vec<Handle> {
    if let NodeData::Element {
        ref template_contents,
        ..
    } = handle.data
    {
        if let Some(ref contents) = *template_contents.borrow() {
            return contents.children.borrow().clone();
        }
    }
    handle.children.borrow().clone()
}

pub fn prettify(handle: &Handle) -> String {
    let mut out = String::new();
    write_pretty(handle, 0, &mut out);
    out
}

fn write_pretty(handle: &Handle, depth: usize, out: &mut String) {
    match handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                write_pretty(child, depth, out);
            }
        }
        NodeData::Doctype {
            ref name,
            ref public_id,
            ref system_id,
        } => {
            push_line(out, depth, &doctype(name, public_id, system_id));
        }
        NodeData::Comment { ref contents } => {
            push_line(out, depth, &format!("<!--{}-->", contents));
        }
        NodeData::Text { ref contents } => {
            let contents = contents.borrow();
            let text = contents.trim();
            if !text.is_empty() {
                push_line(out, depth, &escape_text(text));
            }
        }
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag = name.local.to_string();
            let open = open_tag(&tag, &attrs.borrow());

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                push_line(out, depth, &open);
                return;
            }

            if PREFORMATTED_ELEMENTS.contains(&tag.as_str()) {
                let mut line = open;
                for child in child_nodes(handle).iter() {
                    write_inline(child, &mut line);
                }
                line.push_str(&format!("</{}>", tag));
                push_line(out, depth, &line);
                return;
            }

            push_line(out, depth, &open);
            if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                let body: String = child_nodes(handle)
                    .iter()
                    .filter_map(|child| match child.data {
                        NodeData::Text { ref contents } => Some(contents.borrow().to_string()),
                        _ => None,
                    })
                    .collect();
                let body = body.trim();
                if !body.is_empty() {
                    push_line(out, depth + 1, body);
                }
            } else {
                for child in child_nodes(handle).iter() {
                    write_pretty(child, depth + 1, out);
                }
            }
            push_line(out, depth, &format!("</{}>", tag));
        }
        NodeData::ProcessingInstruction { .. } => {}
    }
}

/// Exact serialization, used where whitespace is significant.
fn write_inline(handle: &Handle, out: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => out.push_str(&escape_text(&contents.borrow())),
        NodeData::Comment { ref contents } => out.push_str(&format!("<!--{}-->", contents)),
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag = name.local.to_string();
            out.push_str(&open_tag(&tag, &attrs.borrow()));
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            for child in child_nodes(handle).iter() {
                write_inline(child, out);
            }
            out.push_str(&format!("</{}>", tag));
        }
        _ => {}
    }
}

fn doctype(name: &str, public_id: &str, system_id: &str) -> String {
    match (public_id.is_empty(), system_id.is_empty()) {
        (true, true) => format!("<!DOCTYPE {}>", name),
        (false, true) => format!("<!DOCTYPE {} PUBLIC \"{}\">", name, public_id),
        (true, false) => format!("<!DOCTYPE {} SYSTEM \"{}\">", name, system_id),
        (false, false) => format!(
            "<!DOCTYPE {} PUBLIC \"{}\" \"{}\">",
            name, public_id, system_id
        ),
    }
}

fn open_tag(tag: &str, attrs: &[html5ever::Attribute]) -> String {
    let mut open = format!("<{}", tag);
    for attr in attrs {
        open.push_str(&format!(
            " {}=\"{}\"",
            attr_name(&attr.name),
            escape_attr(&attr.value)
        ));
    }
    open.push('>');
    open
}

fn attr_name(name: &QualName) -> String {
    match name.prefix {
        Some(ref prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    out.push_str(&" ".repeat(depth));
    out.push_str(line);
    out.push('\n');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
