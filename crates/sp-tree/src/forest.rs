//! Operations over a bare forest (`Vec<Element>`).
//!
//! Everything here is a pre-order rewrite: each element is offered to a
//! visitor; a match is transformed in place of the original, anything else
//! has its children rewritten recursively. Forests are taken by value and the
//! rewritten forest is returned, so callers never observe a half-applied
//! change.
//!
//! A missing target id is not an error. The returned [`Rewrite`] says whether
//! anything matched and the caller decides (see [`Mode`](crate::Mode)).

use std::collections::HashMap;

use sp_schema::Element;

use crate::Rewrite;

/// What the visitor decided for one element.
enum Step {
    /// Target hit: keep the replacement (if any) and do not descend.
    Matched(Option<Element>),
    /// Not a target: recurse into the children.
    Descend(Element),
}

fn rewrite<F>(forest: Vec<Element>, visit: &mut F) -> Vec<Element>
where
    F: FnMut(Element) -> Step,
{
    let mut out = Vec::with_capacity(forest.len());
    for element in forest {
        match visit(element) {
            Step::Matched(Some(element)) => out.push(element),
            Step::Matched(None) => {}
            Step::Descend(mut element) => {
                if let Some(stack) = element.stack_mut()
                    && let Some(children) = stack.children.take()
                {
                    stack.children = Some(rewrite(children, visit));
                }
                out.push(element);
            }
        }
    }
    out
}

fn into_children(element: Element) -> Option<Vec<Element>> {
    match element {
        Element::VStack(s) | Element::HStack(s) | Element::ZStack(s) => s.children,
        _ => None,
    }
}

/// First element with `id`, depth-first pre-order.
pub fn find_by_id<'a>(forest: &'a [Element], id: &str) -> Option<&'a Element> {
    for element in forest {
        if element.id() == id {
            return Some(element);
        }
        if let Some(found) = find_by_id(element.children(), id) {
            return Some(found);
        }
    }
    None
}

/// Replace the element with `id`.
///
/// If the replacement is a stack without a `children` array and the old
/// element had one, the old children move onto the replacement. Edit forms
/// only carry scalar fields, so this keeps them from truncating a subtree.
pub fn update_by_id(
    forest: Vec<Element>,
    id: &str,
    replacement: &Element,
) -> Rewrite<Vec<Element>> {
    let mut matched = false;
    let forest = rewrite(forest, &mut |element| {
        if element.id() != id {
            return Step::Descend(element);
        }
        matched = true;
        let mut next = replacement.clone();
        if let Some(stack) = next.stack_mut()
            && stack.children.is_none()
        {
            stack.children = into_children(element);
        }
        Step::Matched(Some(next))
    });
    Rewrite::new(forest, matched)
}

/// Remove the element with `id` together with its whole subtree.
pub fn delete_by_id(forest: Vec<Element>, id: &str) -> Rewrite<Vec<Element>> {
    let mut matched = false;
    let forest = rewrite(forest, &mut |element| {
        if element.id() == id {
            matched = true;
            Step::Matched(None)
        } else {
            Step::Descend(element)
        }
    });
    Rewrite::new(forest, matched)
}

/// Append `child` to the container with `parent_id`, creating its children
/// array if absent. A leaf with that id does not count as a match.
pub fn add_child(forest: Vec<Element>, parent_id: &str, child: Element) -> Rewrite<Vec<Element>> {
    let mut matched = false;
    let forest = rewrite(forest, &mut |mut element| {
        if element.id() != parent_id || !element.kind().is_container() {
            return Step::Descend(element);
        }
        matched = true;
        if let Some(stack) = element.stack_mut() {
            stack
                .children
                .get_or_insert_with(Vec::new)
                .push(child.clone());
        }
        Step::Matched(Some(element))
    });
    Rewrite::new(forest, matched)
}

/// Rebuild the children of the container with `parent_id` in `order`.
///
/// Ids in `order` that are not current children are skipped, and children not
/// named in `order` are dropped, so a reorder also prunes. A container without
/// a children array ends up with an empty one.
pub fn reorder_children<S: AsRef<str>>(
    forest: Vec<Element>,
    parent_id: &str,
    order: &[S],
) -> Rewrite<Vec<Element>> {
    let mut matched = false;
    let forest = rewrite(forest, &mut |mut element| {
        if element.id() != parent_id || !element.kind().is_container() {
            return Step::Descend(element);
        }
        matched = true;
        if let Some(stack) = element.stack_mut() {
            let children = stack.children.take().unwrap_or_default();
            stack.children = Some(reorder(children, order));
        }
        Step::Matched(Some(element))
    });
    Rewrite::new(forest, matched)
}

/// Map `order` through the existing children. Each child is used at most once.
pub(crate) fn reorder<S: AsRef<str>>(children: Vec<Element>, order: &[S]) -> Vec<Element> {
    let mut by_id: HashMap<String, Element> = children
        .into_iter()
        .map(|child| (child.id().to_owned(), child))
        .collect();
    order
        .iter()
        .filter_map(|id| by_id.remove(id.as_ref()))
        .collect()
}

/// Every element, parents before children, siblings in array order.
pub fn flatten(forest: &[Element]) -> Vec<&Element> {
    let mut out = Vec::new();
    collect(forest, &mut out);
    out
}

fn collect<'a>(forest: &'a [Element], out: &mut Vec<&'a Element>) {
    for element in forest {
        out.push(element);
        collect(element.children(), out);
    }
}
