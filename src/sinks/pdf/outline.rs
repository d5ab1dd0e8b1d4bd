//! Document outline (the bookmarks sidebar) built from the chapter ledger.

use super::Refs;
use crate::composer::TocEntry;
use pdf_writer::{Pdf, Ref, TextStr};

struct Node<'a> {
    entry: &'a TocEntry,
    children: Vec<&'a TocEntry>,
}

/// Chapters at the top level with their subchapters nested beneath them. A
/// subchapter whose chapter is not in the ledger becomes a top-level entry.
fn tree(ledger: &[TocEntry]) -> Vec<Node<'_>> {
    let mut nodes: Vec<Node> = Vec::new();
    for entry in ledger {
        match nodes.last_mut() {
            Some(parent)
                if entry.is_subchapter()
                    && !parent.entry.is_subchapter()
                    && parent.entry.chapter == entry.chapter =>
            {
                parent.children.push(entry)
            }
            _ => nodes.push(Node {
                entry,
                children: Vec::new(),
            }),
        }
    }
    nodes
}

/// Where an item sits among its siblings.
struct Links {
    parent: Ref,
    prev: Option<Ref>,
    next: Option<Ref>,
}

fn write_item(
    pdf: &mut Pdf,
    id: Ref,
    entry: &TocEntry,
    links: Links,
    children: &[Ref],
    page_ids: &[Ref],
) {
    let mut item = pdf.outline_item(id);
    item.title(TextStr(&entry.label())).parent(links.parent);
    if let Some(prev) = links.prev {
        item.prev(prev);
    }
    if let Some(next) = links.next {
        item.next(next);
    }
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        item.first(*first).last(*last).count(children.len() as i32);
    }
    // ledger pages are 1-based
    if let Some(page) = entry.page.checked_sub(1).and_then(|i| page_ids.get(i)) {
        item.dest().page(*page).fit();
    }
}

/// Write the outline and return its root, or `None` for an empty ledger.
pub fn write(pdf: &mut Pdf, refs: &mut Refs, ledger: &[TocEntry], page_ids: &[Ref]) -> Option<Ref> {
    let nodes = tree(ledger);
    if nodes.is_empty() {
        return None;
    }

    let root = refs.next();
    let ids: Vec<(Ref, Vec<Ref>)> = nodes
        .iter()
        .map(|node| (refs.next(), node.children.iter().map(|_| refs.next()).collect()))
        .collect();

    for (i, (node, (id, child_ids))) in nodes.iter().zip(&ids).enumerate() {
        let prev = i.checked_sub(1).map(|p| ids[p].0);
        let next = ids.get(i + 1).map(|(n, _)| *n);
        let links = Links { parent: root, prev, next };
        write_item(pdf, *id, node.entry, links, child_ids, page_ids);

        for (j, (child, child_id)) in node.children.iter().zip(child_ids).enumerate() {
            let prev = j.checked_sub(1).map(|p| child_ids[p]);
            let next = child_ids.get(j + 1).copied();
            let links = Links { parent: *id, prev, next };
            write_item(pdf, *child_id, child, links, &[], page_ids);
        }
    }

    let visible = ids.iter().map(|(_, children)| 1 + children.len()).sum::<usize>();
    let mut outline = pdf.outline(root);
    if let (Some((first, _)), Some((last, _))) = (ids.first(), ids.last()) {
        outline.first(*first).last(*last);
    }
    outline.count(visible as i32);
    Some(root)
}
