//! Document outline (bookmarks).
//!
//! Nodes live in a flat arena and refer to each other by index, so the
//! arena can grow while handles held by the caller stay valid. Index 0 is
//! the outline root; it is created with the first bookmark.

use std::io::Write;

use super::pages::PageTable;
use crate::error::{PdfError, Result};
use crate::objects::ObjectId;
use crate::writer::PdfWriter;

/// Handle of a bookmark, usable as the parent of later bookmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutlineHandle(usize);

impl OutlineHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct OutlineNode {
    title: String,
    /// Target page number.
    page: usize,
    id: ObjectId,
    parent: usize,
    first: Option<usize>,
    last: Option<usize>,
    prev: Option<usize>,
    next: Option<usize>,
    /// Visible descendants, unsigned; the sign is applied on output.
    count: i32,
    open: bool,
}

#[derive(Debug, Default)]
pub struct OutlineTree {
    nodes: Vec<OutlineNode>,
}

impl OutlineTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Number of bookmarks, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Object id of the outline root, once a bookmark exists.
    pub fn root_id(&self) -> Option<ObjectId> {
        self.nodes.first().map(|root| root.id)
    }

    /// Add a bookmark as the last child of `parent`, or at top level.
    ///
    /// Every ancestor up to the first closed one gets its visible count
    /// bumped; a closed ancestor takes the count but does not pass it on.
    pub fn add<W: Write>(
        &mut self,
        writer: &mut PdfWriter<W>,
        title: &str,
        parent: Option<OutlineHandle>,
        open: bool,
        page: usize,
    ) -> Result<OutlineHandle> {
        let parent = match parent {
            None => ROOT,
            Some(handle) if handle.0 >= 1 && handle.0 < self.nodes.len() => handle.0,
            Some(handle) => {
                return Err(PdfError::value(format!(
                    "Bad parent id {} for subordinate bookmark",
                    handle.0
                )))
            }
        };

        if self.nodes.is_empty() {
            self.nodes.push(OutlineNode {
                title: String::new(),
                page: 0,
                id: writer.alloc_id(),
                parent: ROOT,
                first: None,
                last: None,
                prev: None,
                next: None,
                count: 0,
                open: true,
            });
        }

        let index = self.nodes.len();
        let prev = self.nodes[parent].last;
        self.nodes.push(OutlineNode {
            title: title.to_string(),
            page,
            id: writer.alloc_id(),
            parent,
            first: None,
            last: None,
            prev,
            next: None,
            count: 0,
            open,
        });

        match prev {
            Some(prev) => self.nodes[prev].next = Some(index),
            None => self.nodes[parent].first = Some(index),
        }
        self.nodes[parent].last = Some(index);

        let mut ancestor = parent;
        loop {
            self.nodes[ancestor].count += 1;
            if !self.nodes[ancestor].open {
                break;
            }
            ancestor = self.nodes[ancestor].parent;
            if ancestor == ROOT {
                break;
            }
        }

        Ok(OutlineHandle(index))
    }

    /// The `/Count` a node will be written with: negative when closed.
    pub fn count(&self, handle: Option<OutlineHandle>) -> Option<i32> {
        let node = self.nodes.get(handle.map_or(ROOT, |h| h.0))?;
        Some(if node.open { node.count } else { -node.count })
    }

    /// Write the root and every bookmark.
    pub fn write<W: Write>(&self, writer: &mut PdfWriter<W>, pages: &PageTable) -> Result<()> {
        let root = match self.nodes.first() {
            Some(root) => root,
            None => return Ok(()),
        };

        writer.begin_obj(Some(root.id))?;
        writer.begin_dict()?;
        if root.count != 0 {
            write!(writer, "/Count {}\n", root.count)?;
        }
        if let (Some(first), Some(last)) = (root.first, root.last) {
            write!(writer, "/First {}\n", self.nodes[first].id)?;
            write!(writer, "/Last {}\n", self.nodes[last].id)?;
        }
        writer.end_dict()?;
        writer.end_obj()?;

        for node in &self.nodes[1..] {
            self.write_node(writer, node, pages)?;
        }
        Ok(())
    }

    fn write_node<W: Write>(
        &self,
        writer: &mut PdfWriter<W>,
        node: &OutlineNode,
        pages: &PageTable,
    ) -> Result<()> {
        let page_id = pages.id(node.page).ok_or_else(|| {
            PdfError::InvalidStructure(format!("bookmark targets missing page {}", node.page))
        })?;

        writer.begin_obj(Some(node.id))?;
        writer.begin_dict()?;
        write!(writer, "/Parent {}\n", self.nodes[node.parent].id)?;
        write!(writer, "/Dest [{} /XYZ 0 0 0]\n", page_id)?;
        writer.write_str("/Title ")?;
        writer.write_text(&node.title)?;
        writer.write_str("\n")?;
        if let Some(prev) = node.prev {
            write!(writer, "/Prev {}\n", self.nodes[prev].id)?;
        }
        if let Some(next) = node.next {
            write!(writer, "/Next {}\n", self.nodes[next].id)?;
        }
        if let (Some(first), Some(last)) = (node.first, node.last) {
            write!(writer, "/First {}\n", self.nodes[first].id)?;
            write!(writer, "/Last {}\n", self.nodes[last].id)?;
        }
        if node.count != 0 {
            let count = if node.open { node.count } else { -node.count };
            write!(writer, "/Count {}\n", count)?;
        }
        writer.end_dict()?;
        writer.end_obj()
    }
}
