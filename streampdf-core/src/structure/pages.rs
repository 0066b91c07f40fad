//! Page object ids and the page tree root.
//!
//! Pages are numbered from 1. A page's id may be handed out before the
//! page exists, when a link or bookmark targets it. Ids are kept sparse,
//! so a link to any page number costs one entry.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::Result;
use crate::objects::ObjectId;
use crate::writer::PdfWriter;

#[derive(Debug, Default)]
pub struct PageTable {
    ids: BTreeMap<usize, ObjectId>,
    current: usize,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the last page begun, 0 before the first.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn id(&self, page: usize) -> Option<ObjectId> {
        self.ids.get(&page).copied()
    }

    /// Id of `page`, allocating it on first use.
    pub fn id_for<W: Write>(&mut self, writer: &mut PdfWriter<W>, page: usize) -> ObjectId {
        *self
            .ids
            .entry(page.max(1))
            .or_insert_with(|| writer.alloc_id())
    }

    /// Move on to the next page and return its id.
    pub fn begin_next<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> ObjectId {
        self.current += 1;
        self.id_for(writer, self.current)
    }

    /// Write the `/Pages` root listing every page begun so far.
    pub fn write_root<W: Write>(&self, writer: &mut PdfWriter<W>, id: ObjectId) -> Result<()> {
        writer.begin_obj(Some(id))?;
        writer.begin_dict()?;
        writer.write_str("/Type /Pages\n")?;
        write!(writer, "/Count {}\n", self.current)?;
        writer.write_str("/Kids [")?;
        for (&page, kid) in self.ids.range(1..=self.current) {
            write!(writer, "{}", kid)?;
            writer.write_str(if page % 8 == 0 { "\n" } else { " " })?;
        }
        writer.write_str("]\n")?;
        writer.end_dict()?;
        writer.end_obj()
    }
}
