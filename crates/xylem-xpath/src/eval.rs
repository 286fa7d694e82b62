//! Path expression evaluator over the arena document.

use xylem_dom::{Document, NodeId};

use crate::ast::*;

enum Context {
    Document,
    Node(NodeId),
}

/// Evaluate with the document itself as the context: the first step selects
/// the root element. This is the semantics of type-level queries.
pub fn eval(path: &PathExpr, doc: &Document) -> Vec<NodeId> {
    eval_inner(path, doc, Context::Document)
}

/// Evaluate relative to `scope`: relative steps select among `scope`'s
/// children. Absolute (`/...`, `//...`) expressions still re-root at the
/// document.
pub fn eval_from(path: &PathExpr, doc: &Document, scope: NodeId) -> Vec<NodeId> {
    if path.absolute {
        eval_inner(path, doc, Context::Document)
    } else {
        eval_inner(path, doc, Context::Node(scope))
    }
}

fn eval_inner(path: &PathExpr, doc: &Document, start: Context) -> Vec<NodeId> {
    let mut steps = path.steps.iter();
    let Some(first) = steps.next() else {
        return match start {
            Context::Document => vec![doc.root()],
            Context::Node(node) => vec![node],
        };
    };

    let base = match start {
        Context::Document => {
            if first.descendant {
                let mut all = vec![doc.root()];
                all.extend(doc.descendants(doc.root()));
                all
            } else {
                vec![doc.root()]
            }
        }
        Context::Node(node) => {
            if first.descendant {
                doc.descendants(node)
            } else {
                doc.children(node).to_vec()
            }
        }
    };
    let mut current = select(doc, base, first);

    for step in steps {
        let mut next = Vec::new();
        for &node in &current {
            let base = if step.descendant {
                doc.descendants(node)
            } else {
                doc.children(node).to_vec()
            };
            next.extend(select(doc, base, step));
        }
        // ids sort into document order; descendant steps can revisit nodes
        next.sort_unstable();
        next.dedup();
        current = next;
    }
    current
}

fn select(doc: &Document, base: Vec<NodeId>, step: &Step) -> Vec<NodeId> {
    let matched: Vec<NodeId> = base
        .into_iter()
        .filter(|&node| step.test.matches(doc.name(node)))
        .collect();
    if step.predicates.is_empty() {
        return matched;
    }
    let count = matched.len();
    matched
        .into_iter()
        .enumerate()
        .filter(|&(index, node)| {
            step.predicates
                .iter()
                .all(|predicate| eval_predicate(doc, node, index + 1, count, predicate))
        })
        .map(|(_, node)| node)
        .collect()
}

fn eval_predicate(
    doc: &Document,
    node: NodeId,
    position: usize,
    count: usize,
    predicate: &Predicate,
) -> bool {
    match predicate {
        Predicate::Position(expected) => position == *expected,
        Predicate::Last => position == count,
        Predicate::Compare {
            target,
            op,
            literal,
        } => {
            let actual = match target {
                CompareTarget::Attribute(name) => doc.attribute(node, name),
                CompareTarget::Child(name) => {
                    doc.child_named(node, name).and_then(|child| doc.text(child))
                }
                CompareTarget::Text => doc.text(node),
            };
            match op {
                CompareOp::Eq => actual == Some(literal.as_str()),
                // a missing node-set compares unequal to nothing
                CompareOp::Ne => actual.is_some_and(|value| value != literal),
            }
        }
        Predicate::And(left, right) => {
            eval_predicate(doc, node, position, count, left)
                && eval_predicate(doc, node, position, count, right)
        }
        Predicate::Or(left, right) => {
            eval_predicate(doc, node, position, count, left)
                || eval_predicate(doc, node, position, count, right)
        }
    }
}
