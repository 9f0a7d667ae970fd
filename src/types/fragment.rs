//! An owned, mutable copy of a slice of the parsed document.
//!
//! The markup parser hands out read-only trees, while media resolution has to
//! rewrite `src` attributes and sanitation has to strip everything else. Both
//! operate on this small node model, which is then written back out as HTML.

use std::{fmt, io};

use html5ever::{
	LocalName, QualName, namespace_url, ns,
	serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize},
};
use scraper::{ElementRef, Html, Node};

/// The parser drops one newline right after these start tags, so a body that
/// starts with a newline needs an extra one to survive a round trip
const NEWLINE_EATING_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
	Element(HtmlElement),
	Text(String),
	Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
	pub name:     String,
	pub attrs:    Vec<(String, String)>,
	pub children: Vec<HtmlNode>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fragment {
	pub nodes: Vec<HtmlNode>,
}

impl HtmlElement {
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
		let value = value.into();
		match self.attrs.iter_mut().find(|(key, _)| key == name) {
			Some((_, existing)) => *existing = value,
			None => self.attrs.push((name.to_string(), value)),
		}
	}

	fn qual_name(&self) -> QualName { QualName::new(None, ns!(html), LocalName::from(self.name.as_str())) }

	fn starts_with_newline(&self) -> bool {
		NEWLINE_EATING_ELEMENTS.contains(&self.name.as_str())
			&& matches!(self.children.first(), Some(HtmlNode::Text(text)) if text.starts_with('\n'))
	}

	fn is_empty_paragraph(&self) -> bool {
		self.name == "p"
			&& self.children.iter().all(|child| matches!(child, HtmlNode::Text(t) if t.trim().is_empty()))
	}
}

/// Attribute allow-list used for card content: only an image's source
/// survives.
pub fn keep_image_source(element: &str, attribute: &str) -> bool {
	element == "img" && attribute == "src"
}

impl Fragment {
	/// Parses a piece of HTML that may start or end in the middle of an
	/// element.
	pub fn parse(html: &str) -> Self {
		let document = Html::parse_fragment(html);
		Self::from_children(document.root_element(), None)
	}

	/// Copies the children of `parent`, leaving out `skip` wherever it sits in
	/// the subtree.
	pub fn from_children(parent: ElementRef<'_>, skip: Option<ElementRef<'_>>) -> Self {
		Self { nodes: convert_children(parent, skip) }
	}

	pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

	/// Every `<img>` element, in document order.
	pub fn images_mut(&mut self) -> Vec<&mut HtmlElement> {
		let mut images = Vec::new();
		collect_images(&mut self.nodes, &mut images);
		images
	}

	/// Strips every attribute the policy rejects, regardless of element kind.
	pub fn sanitize(&mut self, keep: impl Fn(&str, &str) -> bool) { sanitize_nodes(&mut self.nodes, &keep); }

	/// Drops blank text and empty paragraphs from both ends. Cutting markup
	/// in the middle of an element leaves exactly these behind; empty
	/// paragraphs anywhere else are content.
	pub fn trim_edges(mut self) -> Self {
		let is_edge_debris = |node: &HtmlNode| match node {
			HtmlNode::Text(text) => text.trim().is_empty(),
			HtmlNode::Element(element) => element.is_empty_paragraph(),
			HtmlNode::Comment(_) => false,
		};

		let start = self.nodes.iter().position(|node| !is_edge_debris(node)).unwrap_or(self.nodes.len());
		let end = self.nodes.iter().rposition(|node| !is_edge_debris(node)).map_or(start, |last| last + 1);
		self.nodes.truncate(end);
		self.nodes.drain(..start);
		self
	}

	pub fn to_html(&self) -> String { self.to_string() }
}

impl Serialize for HtmlNode {
	fn serialize<S: Serializer>(&self, serializer: &mut S, _: TraversalScope) -> io::Result<()> {
		match self {
			HtmlNode::Text(text) => serializer.write_text(text),
			HtmlNode::Comment(comment) => serializer.write_comment(comment),
			HtmlNode::Element(element) => {
				let name = element.qual_name();
				let attrs: Vec<(QualName, &str)> = element
					.attrs
					.iter()
					.map(|(key, value)| (QualName::new(None, ns!(), LocalName::from(key.as_str())), value.as_str()))
					.collect();

				serializer.start_elem(name.clone(), attrs.iter().map(|(key, value)| (key, *value)))?;
				if element.starts_with_newline() {
					serializer.write_text("\n")?;
				}
				for child in &element.children {
					child.serialize(serializer, TraversalScope::IncludeNode)?;
				}
				serializer.end_elem(name)
			}
		}
	}
}

impl Serialize for Fragment {
	fn serialize<S: Serializer>(&self, serializer: &mut S, scope: TraversalScope) -> io::Result<()> {
		self.nodes.iter().try_for_each(|node| node.serialize(serializer, scope.clone()))
	}
}

/// Lets the markup serializer write straight into a formatter
struct FormatterWriter<'a, 'f>(&'a mut fmt::Formatter<'f>);

impl io::Write for FormatterWriter<'_, '_> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let text = std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
		self.0.write_str(text).map_err(io::Error::other)?;
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl fmt::Display for Fragment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		serialize(FormatterWriter(f), self, SerializeOpts::default()).map_err(|_| fmt::Error)
	}
}

fn convert_children(parent: ElementRef<'_>, skip: Option<ElementRef<'_>>) -> Vec<HtmlNode> {
	let mut nodes = Vec::new();

	for child in parent.children() {
		match child.value() {
			Node::Text(text) => nodes.push(HtmlNode::Text(String::from(&**text))),
			Node::Comment(comment) => nodes.push(HtmlNode::Comment(String::from(&**comment))),
			Node::Element(_) => {
				let Some(element) = ElementRef::wrap(child) else { continue };
				if skip.is_some_and(|skipped| skipped == element) {
					continue;
				}

				let value = element.value();
				nodes.push(HtmlNode::Element(HtmlElement {
					name:     value.name().to_string(),
					attrs:    value.attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
					children: convert_children(element, skip),
				}));
			}
			// Doctypes and processing instructions have no place in a card
			_ => {}
		}
	}

	nodes
}

fn collect_images<'a>(nodes: &'a mut [HtmlNode], images: &mut Vec<&'a mut HtmlElement>) {
	for node in nodes {
		if let HtmlNode::Element(element) = node {
			if element.name == "img" {
				images.push(element);
			} else {
				collect_images(&mut element.children, images);
			}
		}
	}
}

fn sanitize_nodes(nodes: &mut [HtmlNode], keep: &impl Fn(&str, &str) -> bool) {
	for node in nodes {
		if let HtmlNode::Element(element) = node {
			let name = element.name.as_str();
			element.attrs.retain(|(attr, _)| keep(name, attr));
			sanitize_nodes(&mut element.children, keep);
		}
	}
}
