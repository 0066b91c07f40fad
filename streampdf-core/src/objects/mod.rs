//! Object identifiers and the offset table behind the cross-reference section.

use std::fmt;

use crate::error::{PdfError, Result};

/// An indirect object number. Generation numbers are always zero because
/// objects are never rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

/// Forward-allocating table of object offsets.
///
/// Slot 0 is the free-list head and is never handed out. An allocated id
/// stays `None` until the object is actually written, so an id can be
/// referenced long before its object appears in the output.
#[derive(Debug, Clone)]
pub struct ObjectTable {
    offsets: Vec<Option<u64>>,
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectTable {
    pub fn new() -> Self {
        let mut offsets = Vec::with_capacity(256);
        offsets.push(Some(0));
        Self { offsets }
    }

    /// Hand out the next unused object number.
    pub fn allocate(&mut self) -> ObjectId {
        self.offsets.push(None);
        ObjectId((self.offsets.len() - 1) as u32)
    }

    /// Record where `id` was written. Each id may be written once.
    pub fn record(&mut self, id: ObjectId, offset: u64) -> Result<()> {
        let slot = self
            .offsets
            .get_mut(id.0 as usize)
            .filter(|_| id.0 != 0)
            .ok_or_else(|| {
                PdfError::InvalidStructure(format!("object {} was never allocated", id.0))
            })?;
        if slot.is_some() {
            return Err(PdfError::InvalidStructure(format!(
                "object {} written twice",
                id.0
            )));
        }
        *slot = Some(offset);
        Ok(())
    }

    pub fn offset(&self, id: ObjectId) -> Option<u64> {
        self.offsets.get(id.0 as usize).copied().flatten()
    }

    pub fn is_written(&self, id: ObjectId) -> bool {
        self.offset(id).is_some()
    }

    /// Highest allocated object number.
    pub fn last_id(&self) -> u32 {
        (self.offsets.len() - 1) as u32
    }

    /// Number of slots including the reserved slot 0; this is `/Size`.
    pub fn size(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Ids that have been allocated but not written yet.
    pub fn unwritten(&self) -> Vec<ObjectId> {
        self.offsets
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, offset)| offset.is_none())
            .map(|(n, _)| ObjectId(n as u32))
            .collect()
    }

    /// Offsets of objects 1..=last_id, in order. Any id still unwritten is
    /// a structural error.
    pub fn xref_entries(&self) -> Result<Vec<u64>> {
        self.offsets
            .iter()
            .enumerate()
            .skip(1)
            .map(|(n, offset)| {
                offset.ok_or_else(|| {
                    PdfError::InvalidStructure(format!("object {} has no offset", n))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_monotonic_from_one() {
        let mut table = ObjectTable::new();
        let a = table.allocate();
        let b = table.allocate();
        assert_eq!(a.number(), 1);
        assert_eq!(b.number(), 2);
        assert_eq!(table.size(), 3);
        assert_eq!(table.last_id(), 2);
    }

    #[test]
    fn test_record_once() {
        let mut table = ObjectTable::new();
        let id = table.allocate();
        assert!(!table.is_written(id));
        table.record(id, 15).unwrap();
        assert_eq!(table.offset(id), Some(15));
        assert!(table.record(id, 40).is_err());
    }

    #[test]
    fn test_record_rejects_unallocated_and_zero() {
        let mut table = ObjectTable::new();
        assert!(table.record(ObjectId::new(0), 1).is_err());
        assert!(table.record(ObjectId::new(7), 1).is_err());
    }

    #[test]
    fn test_unwritten_and_xref_entries() {
        let mut table = ObjectTable::new();
        let a = table.allocate();
        let b = table.allocate();
        table.record(a, 9).unwrap();
        assert_eq!(table.unwritten(), vec![b]);
        assert!(table.xref_entries().is_err());

        table.record(b, 30).unwrap();
        assert_eq!(table.xref_entries().unwrap(), vec![9, 30]);
    }

    #[test]
    fn test_display_reference() {
        assert_eq!(ObjectId::new(12).to_string(), "12 0 R");
    }

    #[test]
    fn test_table_grows_past_initial_capacity() {
        let mut table = ObjectTable::new();
        for _ in 0..1000 {
            table.allocate();
        }
        assert_eq!(table.last_id(), 1000);
        assert_eq!(table.unwritten().len(), 1000);
    }
}
