// src/core/html.rs
//
// Tolerant HTML reader: builds a small element tree from page source and answers
// CSS-style queries against it. Good enough for server-rendered listing pages;
// not a conforming HTML5 parser.
//
// Tolerance rules:
// - tag and attribute names are case-insensitive (stored lowercase);
// - a close tag pops back to the nearest open element of the same name, and is
//   ignored when no such element is open;
// - void elements and `<x/>` never take children;
// - `<script>`/`<style>` bodies and comments are skipped.

use super::sanitize::{decode_entities, normalize_lines, normalize_ws};

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];
const RAW_TEXT: &[&str] = &["script", "style"];
/// Elements whose boundaries become line breaks in `Element::text`.
const BLOCK: &[&str] = &[
    "br", "div", "p", "li", "ul", "ol", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];

#[derive(Debug)]
enum NodeData {
    Root,
    Element { name: String, attrs: Vec<(String, String)> },
    Text(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<usize>,
    children: Vec<usize>,
    /// One past the last descendant; nodes are stored in document order.
    end: usize,
    data: NodeData,
}

/// Parsed page.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(src: &str) -> Self {
        let mut b = Builder::new();
        let bytes = src.as_bytes();
        let n = bytes.len();
        let mut i = 0usize;

        while i < n {
            let lt = match src[i..].find('<') {
                Some(p) => i + p,
                None => { b.text(&src[i..]); break; }
            };
            if lt > i { b.text(&src[i..lt]); }

            let rest = &src[lt..];
            if rest.starts_with("<!--") {
                i = rest.find("-->").map_or(n, |e| lt + e + 3);
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                i = rest.find('>').map_or(n, |e| lt + e + 1);
                continue;
            }
            if rest.starts_with("</") {
                let gt = match rest.find('>') { Some(e) => lt + e, None => break };
                let name = tag_name(&src[lt + 2..gt]);
                if !name.is_empty() { b.close(&name); }
                i = gt + 1;
                continue;
            }
            // A '<' that does not start a tag is just text.
            if !bytes.get(lt + 1).is_some_and(|c| c.is_ascii_alphabetic()) {
                b.text("<");
                i = lt + 1;
                continue;
            }

            let gt = match find_tag_end(src, lt + 1) { Some(p) => p, None => break };
            let inner = &src[lt + 1..gt];
            let self_closing = inner.trim_end().ends_with('/');
            let name = tag_name(inner);
            let attrs = parse_attrs(&inner[name.len()..]);
            i = gt + 1;

            if RAW_TEXT.contains(&name.as_str()) {
                b.open(&name, attrs);
                b.close(&name);
                let close = format!("</{}", name);
                i = src[i..]
                    .to_ascii_lowercase()
                    .find(&close)
                    .and_then(|p| src[i + p..].find('>').map(|e| i + p + e + 1))
                    .unwrap_or(n);
                continue;
            }

            b.open(&name, attrs);
            if self_closing || VOID.contains(&name.as_str()) {
                b.close(&name);
            }
        }

        b.finish()
    }

    pub fn root(&self) -> Element<'_> {
        Element { doc: self, id: 0 }
    }

    /// All elements matching `css`, in document order.
    pub fn select(&self, css: &str) -> Vec<Element<'_>> {
        self.root().select(css)
    }

    pub fn select_first(&self, css: &str) -> Option<Element<'_>> {
        self.root().select_first(css)
    }
}

/// Borrowed handle to one element of a `Document`.
#[derive(Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    id: usize,
}

impl<'a> Element<'a> {
    fn node(&self) -> &'a Node {
        &self.doc.nodes[self.id]
    }

    /// Lowercase tag name; empty for the document root.
    pub fn name(&self) -> &'a str {
        match &self.node().data {
            NodeData::Element { name, .. } => name,
            _ => "",
        }
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        match &self.node().data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|x| x == class))
    }

    pub fn parent(&self) -> Option<Element<'a>> {
        let p = self.node().parent?;
        match self.doc.nodes[p].data {
            NodeData::Element { .. } => Some(Element { doc: self.doc, id: p }),
            _ => None,
        }
    }

    /// Child elements (text nodes skipped).
    pub fn children(&self) -> Vec<Element<'a>> {
        self.node()
            .children
            .iter()
            .copied()
            .filter(|&c| matches!(self.doc.nodes[c].data, NodeData::Element { .. }))
            .map(|id| Element { doc: self.doc, id })
            .collect()
    }

    /// Child elements with the given tag name.
    pub fn children_named(&self, name: &str) -> Vec<Element<'a>> {
        self.children().into_iter().filter(|c| c.name() == name).collect()
    }

    /// Text of the whole subtree. Block boundaries become line breaks;
    /// whitespace inside a line is collapsed.
    pub fn text(&self) -> String {
        let mut buf = s!();
        self.collect_text(self.id, &mut buf);
        normalize_lines(&buf)
    }

    /// Direct text children only, whitespace-collapsed (XPath `text()`).
    pub fn own_text(&self) -> String {
        let mut buf = s!();
        for &c in &self.node().children {
            if let NodeData::Text(t) = &self.doc.nodes[c].data {
                buf.push_str(t);
                buf.push(' ');
            }
        }
        normalize_ws(&buf)
    }

    fn collect_text(&self, id: usize, buf: &mut String) {
        let node = &self.doc.nodes[id];
        match &node.data {
            NodeData::Text(t) => buf.push_str(t),
            NodeData::Element { name, .. } => {
                let block = BLOCK.contains(&name.as_str());
                if block { buf.push('\n'); }
                for &c in &node.children { self.collect_text(c, buf); }
                if block { buf.push('\n'); }
            }
            NodeData::Root => {
                for &c in &node.children { self.collect_text(c, buf); }
            }
        }
    }

    /// Descendants matching `css`, in document order.
    pub fn select(&self, css: &str) -> Vec<Element<'a>> {
        let sel = Selector::parse(css);
        if sel.parts.is_empty() {
            return Vec::new();
        }
        let node = self.node();
        (self.id + 1..node.end)
            .filter(|&id| matches!(self.doc.nodes[id].data, NodeData::Element { .. }))
            .map(|id| Element { doc: self.doc, id })
            .filter(|el| sel.matches(el))
            .collect()
    }

    pub fn select_first(&self, css: &str) -> Option<Element<'a>> {
        self.select(css).into_iter().next()
    }
}

/* ---------------- tree building ---------------- */

struct Builder {
    nodes: Vec<Node>,
    stack: Vec<usize>,
}

impl Builder {
    fn new() -> Self {
        Self {
            nodes: vec![Node { parent: None, children: Vec::new(), end: 0, data: NodeData::Root }],
            stack: vec![0],
        }
    }

    fn current(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    fn push(&mut self, data: NodeData) -> usize {
        let id = self.nodes.len();
        let parent = self.current();
        self.nodes.push(Node { parent: Some(parent), children: Vec::new(), end: id + 1, data });
        self.nodes[parent].children.push(id);
        id
    }

    fn text(&mut self, raw: &str) {
        if raw.is_empty() { return; }
        self.push(NodeData::Text(decode_entities(raw)));
    }

    fn open(&mut self, name: &str, attrs: Vec<(String, String)>) {
        let id = self.push(NodeData::Element { name: s!(name), attrs });
        self.stack.push(id);
    }

    fn close(&mut self, name: &str) {
        let pos = self.stack.iter().rposition(|&id| {
            matches!(&self.nodes[id].data, NodeData::Element { name: n, .. } if n == name)
        });
        // Stray close tag: nothing to pop.
        let Some(pos) = pos else { return };
        let end = self.nodes.len();
        for id in self.stack.drain(pos..) {
            self.nodes[id].end = end;
        }
    }

    fn finish(mut self) -> Document {
        let end = self.nodes.len();
        for id in self.stack.drain(..) {
            self.nodes[id].end = end;
        }
        Document { nodes: self.nodes }
    }
}

/// Index of the `>` closing a start tag, skipping quoted attribute values.
fn find_tag_end(src: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (off, &c) in src.as_bytes()[from..].iter().enumerate() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == b'"' || c == b'\'' => quote = Some(c),
            None if c == b'>' => return Some(from + off),
            None => {}
        }
    }
    None
}

fn tag_name(s: &str) -> String {
    s.trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_attrs(s: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let s = s.trim().trim_end_matches('/');
    let bytes = s.as_bytes();
    let n = bytes.len();
    let mut i = 0usize;

    while i < n {
        while i < n && bytes[i].is_ascii_whitespace() { i += 1; }
        let start = i;
        while i < n && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' { i += 1; }
        if start == i { i += 1; continue; }
        let key = s[start..i].to_ascii_lowercase();

        while i < n && bytes[i].is_ascii_whitespace() { i += 1; }
        if i >= n || bytes[i] != b'=' {
            out.push((key, s!()));
            continue;
        }
        i += 1;
        while i < n && bytes[i].is_ascii_whitespace() { i += 1; }

        let value = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let vs = i + 1;
                let ve = s[vs..].find(q as char).map_or(n, |e| vs + e);
                i = (ve + 1).min(n);
                &s[vs..ve]
            }
            _ => {
                let vs = i;
                while i < n && !bytes[i].is_ascii_whitespace() { i += 1; }
                &s[vs..i]
            }
        };
        out.push((key, decode_entities(value)));
    }
    out
}

/* ---------------- selectors ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator { Descendant, Child }

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(s: &str) -> Self {
        let mut c = Compound::default();
        let mut rest = s;

        let tag_len = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        if !tag.is_empty() && tag != "*" {
            c.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while let Some(first) = rest.chars().next() {
            let body = &rest[first.len_utf8()..];
            match first {
                '[' => {
                    let close = body.find(']').unwrap_or(body.len());
                    let inner = &body[..close];
                    match inner.split_once('=') {
                        Some((k, v)) => c.attrs.push((
                            k.trim().to_ascii_lowercase(),
                            Some(s!(v.trim().trim_matches(['"', '\'']))),
                        )),
                        None => c.attrs.push((inner.trim().to_ascii_lowercase(), None)),
                    }
                    rest = body.get(close + 1..).unwrap_or("");
                }
                _ => {
                    let len = body.find(['.', '#', '[']).unwrap_or(body.len());
                    let val = s!(&body[..len]);
                    if first == '#' { c.id = Some(val); } else { c.classes.push(val); }
                    rest = &body[len..];
                }
            }
        }
        c
    }

    fn matches(&self, el: &Element<'_>) -> bool {
        if let Some(tag) = &self.tag {
            if el.name() != tag { return false; }
        }
        if let Some(id) = &self.id {
            if el.attr("id") != Some(id.as_str()) { return false; }
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(k, v)| match (el.attr(k), v) {
            (Some(_), None) => true,
            (Some(have), Some(want)) => have == want,
            (None, _) => false,
        })
    }
}

/// `tag`, `.class`, `#id`, `[attr]`, `[attr=value]`, compounds of those, joined by
/// descendant (space) or child (`>`) combinators.
#[derive(Debug)]
struct Selector {
    /// `(combinator to the previous part, compound)`; the first combinator is unused.
    parts: Vec<(Combinator, Compound)>,
}

impl Selector {
    fn parse(css: &str) -> Self {
        let spaced = css.replace('>', " > ");
        let mut parts = Vec::new();
        let mut comb = Combinator::Descendant;
        for tok in spaced.split_whitespace() {
            if tok == ">" {
                comb = Combinator::Child;
                continue;
            }
            parts.push((comb, Compound::parse(tok)));
            comb = Combinator::Descendant;
        }
        Self { parts }
    }

    fn matches(&self, el: &Element<'_>) -> bool {
        self.matches_at(el, self.parts.len() - 1)
    }

    fn matches_at(&self, el: &Element<'_>, idx: usize) -> bool {
        let (comb, compound) = &self.parts[idx];
        if !compound.matches(el) { return false; }
        if idx == 0 { return true; }
        match comb {
            Combinator::Child => el.parent().is_some_and(|p| self.matches_at(&p, idx - 1)),
            Combinator::Descendant => {
                let mut up = el.parent();
                while let Some(a) = up {
                    if self.matches_at(&a, idx - 1) { return true; }
                    up = a.parent();
                }
                false
            }
        }
    }
}
