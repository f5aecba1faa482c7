use std::collections::{HashMap, HashSet};

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};

use super::xpath::{Axis, NodeTest, Operand, Path, Predicate, Step};

/// A node in the evaluation context. Attributes are addressed by their owner
/// and their position in the owner's attribute list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Item {
    Node(NodeId),
    Attr(NodeId, usize),
}

/// Evaluates `path` with `start` as the context node. Absolute paths ignore
/// `start` and begin at the document root.
pub(crate) fn evaluate(html: &Html, start: NodeId, path: &Path) -> Vec<Item> {
    let root = html.tree.root();
    let order: HashMap<NodeId, usize> = root
        .descendants()
        .enumerate()
        .map(|(i, node)| (node.id(), i))
        .collect();

    let origin = if path.absolute { root.id() } else { start };
    let mut context = vec![Item::Node(origin)];
    for step in &path.steps {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for item in &context {
            for candidate in select(html, *item, step) {
                if seen.insert(candidate) {
                    next.push(candidate);
                }
            }
        }
        next.sort_by_key(|item| match item {
            Item::Node(id) => (order.get(id).copied().unwrap_or(usize::MAX), 0),
            Item::Attr(id, idx) => (order.get(id).copied().unwrap_or(usize::MAX), idx + 1),
        });
        context = next;
    }
    context
}

fn select(html: &Html, item: Item, step: &Step) -> Vec<Item> {
    let mut candidates: Vec<Item> = axis(html, item, step.axis)
        .into_iter()
        .filter(|candidate| test(html, *candidate, &step.test))
        .collect();

    for predicate in &step.predicates {
        let len = candidates.len();
        candidates = candidates
            .into_iter()
            .enumerate()
            .filter(|(i, candidate)| matches(html, *candidate, predicate, i + 1, len))
            .map(|(_, candidate)| candidate)
            .collect();
    }
    candidates
}

fn axis(html: &Html, item: Item, axis: Axis) -> Vec<Item> {
    let node = match item {
        Item::Node(id) => match html.tree.get(id) {
            Some(node) => node,
            None => return Vec::new(),
        },
        Item::Attr(owner, _) => {
            return match axis {
                Axis::Parent => vec![Item::Node(owner)],
                Axis::SelfNode => vec![item],
                _ => Vec::new(),
            };
        }
    };

    match axis {
        Axis::Child => node.children().map(|n| Item::Node(n.id())).collect(),
        Axis::Descendant => node.descendants().skip(1).map(|n| Item::Node(n.id())).collect(),
        Axis::DescendantOrSelf => node.descendants().map(|n| Item::Node(n.id())).collect(),
        Axis::Parent => node.parent().map(|n| Item::Node(n.id())).into_iter().collect(),
        Axis::SelfNode => vec![item],
        Axis::Attribute => match node.value() {
            Node::Element(element) => (0..element.attrs().count())
                .map(|idx| Item::Attr(node.id(), idx))
                .collect(),
            _ => Vec::new(),
        },
    }
}

fn test(html: &Html, item: Item, test: &NodeTest) -> bool {
    match item {
        Item::Attr(owner, idx) => match test {
            NodeTest::Any | NodeTest::Node => true,
            NodeTest::Text => false,
            NodeTest::Name(name) => attribute(html, owner, idx)
                .map(|(attr, _)| attr.eq_ignore_ascii_case(name))
                .unwrap_or(false),
        },
        Item::Node(id) => {
            let Some(node) = html.tree.get(id) else {
                return false;
            };
            match (test, node.value()) {
                (NodeTest::Node, _) => true,
                (NodeTest::Text, Node::Text(_)) => true,
                (NodeTest::Any, Node::Element(_)) => true,
                (NodeTest::Name(name), Node::Element(element)) => {
                    element.name().eq_ignore_ascii_case(name)
                }
                _ => false,
            }
        }
    }
}

fn matches(html: &Html, item: Item, predicate: &Predicate, position: usize, len: usize) -> bool {
    match predicate {
        Predicate::Position(n) => position == *n,
        Predicate::Last => position == len,
        Predicate::Exists(operand) => !operand_values(html, item, operand).is_empty(),
        Predicate::Equals(operand, value) => operand_values(html, item, operand)
            .iter()
            .any(|v| v == value),
        Predicate::NotEquals(operand, value) => operand_values(html, item, operand)
            .iter()
            .any(|v| v != value),
        Predicate::Contains(operand, needle) => operand_values(html, item, operand)
            .iter()
            .any(|v| v.contains(needle.as_str())),
    }
}

fn operand_values<'a>(html: &'a Html, item: Item, operand: &Operand) -> Vec<&'a str> {
    let Item::Node(id) = item else {
        return Vec::new();
    };
    let Some(node) = html.tree.get(id) else {
        return Vec::new();
    };
    match operand {
        Operand::Attr(name) => match node.value() {
            Node::Element(element) => element
                .attrs()
                .filter(|(attr, _)| attr.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
                .collect(),
            _ => Vec::new(),
        },
        Operand::Text => node
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(&**text),
                _ => None,
            })
            .collect(),
    }
}

pub(crate) fn attribute(html: &Html, owner: NodeId, idx: usize) -> Option<(&str, &str)> {
    match html.tree.get(owner)?.value() {
        Node::Element(element) => element.attrs().nth(idx),
        _ => None,
    }
}

/// Concatenated text of a node and everything below it.
pub(crate) fn string_value(node: NodeRef<'_, Node>) -> String {
    node.descendants()
        .filter_map(|n| match n.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect()
}
