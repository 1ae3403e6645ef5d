//! Markup tree abstraction used by the exchange decoder.
//!
//! The decoder only needs a handful of navigation primitives, so it is written
//! against [`MarkupTree`] rather than a concrete HTML library. [`Html5Parser`]
//! is the default implementation: it applies the HTML5 tree-construction
//! rules, which is what turns the unclosed `<DT>` and `<p>` tags of Netscape
//! bookmark files into a well-formed folder nesting.

use crate::error::Result;
use kuchikiki::traits::*;
use kuchikiki::NodeRef;
use std::rc::Rc;

/// Read-only view over a parsed document
///
/// Element names passed in and returned are lowercase.
pub trait MarkupTree {
    type Node: Clone;

    /// All elements with the given name, in document order
    fn elements_named(&self, name: &str) -> Vec<Self::Node>;

    /// Element name, or `None` for documents, text and other non-element nodes
    fn name(&self, node: &Self::Node) -> Option<String>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Concatenated text of the node and everything below it
    fn text(&self, node: &Self::Node) -> String;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Identity of `node`, distinct per node and stable while the tree lives
    fn node_key(&self, node: &Self::Node) -> usize;

    /// First element with the given name strictly below `node`, in document order
    fn first_descendant_named(&self, node: &Self::Node, name: &str) -> Option<Self::Node>;
}

/// Turns document text into a [`MarkupTree`]
pub trait MarkupParser {
    type Tree: MarkupTree;

    fn parse(&self, document: &str) -> Result<Self::Tree>;
}

/// HTML5-conformant parser backed by html5ever
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5Parser;

impl MarkupParser for Html5Parser {
    type Tree = Html5Tree;

    fn parse(&self, document: &str) -> Result<Html5Tree> {
        Ok(Html5Tree {
            root: kuchikiki::parse_html().one(document).document_node,
        })
    }
}

pub struct Html5Tree {
    root: NodeRef,
}

impl Html5Tree {
    pub fn root(&self) -> &NodeRef {
        &self.root
    }
}

fn is_element(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .is_some_and(|element| &*element.name.local == name)
}

impl MarkupTree for Html5Tree {
    type Node = NodeRef;

    fn elements_named(&self, name: &str) -> Vec<NodeRef> {
        self.root
            .descendants()
            .filter(|node| is_element(node, name))
            .collect()
    }

    fn name(&self, node: &NodeRef) -> Option<String> {
        node.as_element().map(|element| element.name.local.to_string())
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        node.as_element()
            .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
    }

    fn text(&self, node: &NodeRef) -> String {
        node.text_contents()
    }

    fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        node.parent()
    }

    fn node_key(&self, node: &NodeRef) -> usize {
        Rc::as_ptr(&node.0) as usize
    }

    fn first_descendant_named(&self, node: &NodeRef, name: &str) -> Option<NodeRef> {
        node.descendants().find(|candidate| is_element(candidate, name))
    }
}
