//! A parsed HTML page that region renderers mutate in place.
//!
//! Mutations only ever replace content: the children of one element, or one
//! attribute value. Nodes are never created outside an existing target, so a
//! full render pass is idempotent.

use std::fmt::Write as _;

use folio_shared::{FolioError, Result};
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};

use crate::escape::escape;
use crate::targets::{Target, compile};

/// Parsed page markup.
#[derive(Debug, Clone)]
pub struct Page {
    html: Html,
}

/// What to do to the element a mutation resolves to.
enum Mutation<'a> {
    ReplaceChildren { markup: &'a str },
    ReplaceWithText { text: &'a str },
    SetAttribute { name: &'a str, value: &'a str },
    RemoveAttribute { name: &'a str },
}

impl Page {
    /// Parse a full HTML document.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Serialize the current document.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Replace the target's children with a single text node.
    ///
    /// The text is stored verbatim, like setting `textContent`; it is only
    /// escaped when the page is serialized.
    pub fn set_text(&mut self, target: &Target, text: &str) -> Result<bool> {
        self.apply(Some(target.selector()), Mutation::ReplaceWithText { text })
    }

    /// Replace the target's children with parsed `markup`.
    pub fn set_inner_html(&mut self, target: &Target, markup: &str) -> Result<bool> {
        self.apply(Some(target.selector()), Mutation::ReplaceChildren { markup })
    }

    /// Set (or overwrite) one attribute on the target element.
    pub fn set_attribute(&mut self, target: &Target, name: &str, value: &str) -> Result<bool> {
        self.apply(Some(target.selector()), Mutation::SetAttribute { name, value })
    }

    /// Set an attribute on the document element (`<html>`).
    pub fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<bool> {
        self.apply(None, Mutation::SetAttribute { name, value })
    }

    /// Remove an attribute from the document element (`<html>`).
    pub fn remove_root_attribute(&mut self, name: &str) -> Result<bool> {
        self.apply(None, Mutation::RemoveAttribute { name })
    }

    /// Apply a mutation to the first element matching `selector`, or to the
    /// document element when `selector` is `None`. Returns `false` when there
    /// is no such element.
    fn apply(&mut self, selector: Option<&Selector>, mutation: Mutation<'_>) -> Result<bool> {
        let root = self.html.tree.root();
        let found = match selector {
            Some(sel) => root
                .descendants()
                .find(|node| ElementRef::wrap(*node).is_some_and(|el| sel.matches(&el))),
            None => root.children().find(|node| node.value().is_element()),
        };
        let Some(id) = found.map(|node| node.id()) else {
            return Ok(false);
        };
        let parts = self
            .html
            .tree
            .get(id)
            .and_then(|node| node.value().as_element())
            .map(|element| {
                let attrs: Vec<(String, String)> = element
                    .attrs()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect();
                (element.name().to_string(), attrs)
            });

        match mutation {
            Mutation::ReplaceChildren { markup } => {
                let fragment = Html::parse_fragment(markup);
                let source = fragment
                    .tree
                    .root()
                    .children()
                    .find(|node| node.value().is_element())
                    .ok_or_else(|| FolioError::Dom("fragment parse produced no root".into()))?;

                if let Some(mut node) = self.html.tree.get_mut(id) {
                    while let Some(mut child) = node.first_child() {
                        child.detach();
                    }
                }

                // Copy the fragment subtree under the target, preserving order.
                let mut pending = vec![(source, id)];
                while let Some((src, dest)) = pending.pop() {
                    for child in src.children() {
                        let Some(mut parent) = self.html.tree.get_mut(dest) else {
                            continue;
                        };
                        let copied = parent.append(child.value().clone()).id();
                        pending.push((child, copied));
                    }
                }
            }
            Mutation::ReplaceWithText { text } => {
                if let Some(mut node) = self.html.tree.get_mut(id) {
                    while let Some(mut child) = node.first_child() {
                        child.detach();
                    }
                    node.append(Node::Text(Text { text: text.into() }));
                }
            }
            Mutation::SetAttribute { name, value } => {
                let Some((tag, mut attrs)) = parts else {
                    return Ok(false);
                };
                match attrs.iter_mut().find(|(key, _)| key == name) {
                    Some(slot) => slot.1 = value.to_string(),
                    None => attrs.push((name.to_string(), value.to_string())),
                }
                let rebuilt = rebuild_element(&tag, &attrs)?;
                if let Some(mut node) = self.html.tree.get_mut(id) {
                    *node.value() = rebuilt;
                }
            }
            Mutation::RemoveAttribute { name } => {
                let Some((tag, mut attrs)) = parts else {
                    return Ok(false);
                };
                let before = attrs.len();
                attrs.retain(|(key, _)| key != name);
                if attrs.len() != before {
                    let rebuilt = rebuild_element(&tag, &attrs)?;
                    if let Some(mut node) = self.html.tree.get_mut(id) {
                        *node.value() = rebuilt;
                    }
                }
            }
        }

        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// First element in document order matching `selector`.
    pub(crate) fn first_match(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| selector.matches(el))
    }

    /// Whether the target element carries `class`.
    pub fn target_has_class(&self, target: &Target, class: &str) -> bool {
        self.first_match(target.selector())
            .is_some_and(|el| el.value().classes().any(|c| c == class))
    }

    /// Text content of the first element matching `pattern`.
    pub fn text(&self, pattern: &str) -> Result<Option<String>> {
        let selector = compile(pattern)?;
        Ok(self
            .first_match(&selector)
            .map(|el| el.text().collect::<String>()))
    }

    /// Inner markup of the first element matching `pattern`.
    pub fn inner_html(&self, pattern: &str) -> Result<Option<String>> {
        let selector = compile(pattern)?;
        Ok(self.first_match(&selector).map(|el| el.inner_html()))
    }

    /// Attribute value on the first element matching `pattern`.
    pub fn attr(&self, pattern: &str, name: &str) -> Result<Option<String>> {
        let selector = compile(pattern)?;
        Ok(self
            .first_match(&selector)
            .and_then(|el| el.value().attr(name).map(str::to_string)))
    }

    /// Number of elements matching `pattern` (attached to the document).
    pub fn count(&self, pattern: &str) -> Result<usize> {
        let selector = compile(pattern)?;
        Ok(self
            .html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| selector.matches(el))
            .count())
    }

    /// Attribute value on the document element.
    pub fn root_attr(&self, name: &str) -> Option<String> {
        self.html
            .tree
            .root()
            .children()
            .find_map(ElementRef::wrap)
            .and_then(|el| el.value().attr(name).map(str::to_string))
    }
}

/// Build a fresh element node named `tag` carrying exactly `attrs`.
///
/// The node is produced by the HTML parser itself so attribute bookkeeping
/// stays consistent with parsed elements.
fn rebuild_element(tag: &str, attrs: &[(String, String)]) -> Result<Node> {
    let mut start = format!("<{tag}");
    for (key, value) in attrs {
        let _ = write!(start, " {key}=\"{}\"", escape(value));
    }
    start.push('>');

    let element = if tag.eq_ignore_ascii_case("html") {
        Html::parse_document(&start)
            .tree
            .root()
            .children()
            .find_map(|node| node.value().as_element().cloned())
    } else {
        let _ = write!(start, "</{tag}>");
        Html::parse_fragment(&start)
            .tree
            .root()
            .descendants()
            .filter_map(|node| node.value().as_element())
            .find(|el| el.name() == tag)
            .cloned()
    };

    element
        .map(Node::Element)
        .ok_or_else(|| FolioError::Dom(format!("cannot rebuild <{tag}> element")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::resolve_first;

    fn target(page: &Page, pattern: &'static str) -> Target {
        resolve_first(page, &[pattern])
            .expect("valid selector")
            .expect("target exists")
    }

    #[test]
    fn untouched_page_serializes_stably() {
        let page = Page::parse("<!DOCTYPE html><html><body><p id=\"x\">hi</p></body></html>");
        let again = Page::parse(&page.to_html());
        assert_eq!(page.to_html(), again.to_html());
    }

    #[test]
    fn set_text_is_not_interpreted_as_markup() {
        let mut page = Page::parse(r#"<p id="about">old <b>bold</b></p>"#);
        let t = target(&page, "#about");
        assert!(page.set_text(&t, "<script>alert(1)</script> & co").unwrap());

        assert_eq!(
            page.text("#about").unwrap().as_deref(),
            Some("<script>alert(1)</script> & co")
        );
        assert_eq!(page.count("#about script").unwrap(), 0);
        assert_eq!(page.count("#about b").unwrap(), 0);
    }

    #[test]
    fn set_text_keeps_text_verbatim() {
        let mut page = Page::parse(r#"<p id="about">old</p>"#);
        let t = target(&page, "#about");
        page.set_text(&t, "line1\r\nline2\0end").unwrap();

        assert_eq!(page.text("#about").unwrap().as_deref(), Some("line1\r\nline2\0end"));
        assert_eq!(page.count("#about *").unwrap(), 0);
    }

    #[test]
    fn set_inner_html_replaces_children_in_order() {
        let mut page = Page::parse(r#"<div id="c"><span>placeholder</span></div>"#);
        let t = target(&page, "#c");
        page.set_inner_html(&t, r#"<ul><li>one</li><li>two</li></ul><em>three</em>"#)
            .unwrap();

        assert_eq!(
            page.inner_html("#c").unwrap().as_deref(),
            Some("<ul><li>one</li><li>two</li></ul><em>three</em>")
        );
        assert_eq!(page.count("#c span").unwrap(), 0);
    }

    #[test]
    fn replaced_nodes_are_no_longer_selectable() {
        let mut page = Page::parse(r#"<div id="c"><p class="old">x</p></div>"#);
        let t = target(&page, "#c");
        page.set_inner_html(&t, "").unwrap();
        assert_eq!(page.count(".old").unwrap(), 0);
        assert_eq!(page.inner_html("#c").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn set_attribute_keeps_children_and_other_attributes() {
        let mut page = Page::parse(
            r#"<a class="social" href="https://linkedin.com/in/old" target="_blank">Link<i>!</i></a>"#,
        );
        let t = target(&page, "a.social");
        page.set_attribute(&t, "href", "https://www.linkedin.com/in/new?a=1&b=\"2\"")
            .unwrap();

        assert_eq!(
            page.attr("a.social", "href").unwrap().as_deref(),
            Some("https://www.linkedin.com/in/new?a=1&b=\"2\"")
        );
        assert_eq!(page.attr("a.social", "target").unwrap().as_deref(), Some("_blank"));
        assert_eq!(page.text("a.social").unwrap().as_deref(), Some("Link!"));
    }

    #[test]
    fn root_attribute_round_trip() {
        let mut page = Page::parse(r#"<html lang="en"><body><p>x</p></body></html>"#);
        assert!(page.set_root_attribute("data-theme", "slate").unwrap());
        assert_eq!(page.root_attr("data-theme").as_deref(), Some("slate"));
        assert_eq!(page.root_attr("lang").as_deref(), Some("en"));
        assert_eq!(page.text("p").unwrap().as_deref(), Some("x"));

        assert!(page.remove_root_attribute("data-theme").unwrap());
        assert_eq!(page.root_attr("data-theme"), None);
        assert_eq!(page.root_attr("lang").as_deref(), Some("en"));
    }

    #[test]
    fn target_class_check() {
        let page = Page::parse(r#"<div id="g" class="timeline-grid wide"></div>"#);
        let t = target(&page, "#g");
        assert!(page.target_has_class(&t, "timeline-grid"));
        assert!(!page.target_has_class(&t, "timeline"));
    }
}
