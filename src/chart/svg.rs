//! Minimal SVG/HTML element tree
//!
//! Elements are built with a small builder API and serialized with escaping.
//! Attribute order is preserved so output is stable and diffable.

use std::fmt::Write;

/// A child node: a nested element, escaped text, or raw text written as is
/// (script and style bodies)
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier value for the same name
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Unescaped text content; only for `<script>`/`<style>` bodies
    pub fn raw(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Raw(text.into()));
        self
    }

    /// Copy of this element with every descendant element named `name` removed
    pub fn without(&self, name: &str) -> Element {
        let children = self
            .children
            .iter()
            .filter_map(|child| match child {
                Node::Element(e) if e.name == name => None,
                Node::Element(e) => Some(Node::Element(e.without(name))),
                other => Some(other.clone()),
            })
            .collect();
        Element {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            children,
        }
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first search for elements with the given tag name
    pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            if let Node::Element(e) = child {
                e.find_all(name, out);
            }
        }
    }

    /// Concatenated text content of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) | Node::Raw(t) => out.push_str(t),
                Node::Element(e) => out.push_str(&e.text_content()),
            }
        }
        out
    }

    /// Serialize with two-space indentation
    pub fn write_to(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{}<{}", indent, self.name);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }

        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        // Text-only elements stay on one line
        if self.children.iter().all(|c| !matches!(c, Node::Element(_))) {
            out.push('>');
            for child in &self.children {
                match child {
                    Node::Text(t) => out.push_str(&escape(t)),
                    Node::Raw(t) => out.push_str(t),
                    Node::Element(_) => {}
                }
            }
            let _ = writeln!(out, "</{}>", self.name);
            return;
        }

        out.push_str(">\n");
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_to(out, depth + 1),
                Node::Text(t) => {
                    let _ = writeln!(out, "{}  {}", indent, escape(t));
                }
                Node::Raw(t) => {
                    let _ = writeln!(out, "{}", t);
                }
            }
        }
        let _ = writeln!(out, "{}</{}>", indent, self.name);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, 0);
        out
    }
}

/// Escape text for XML/HTML content and attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Format a coordinate with at most three decimals, trailing zeros trimmed
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
