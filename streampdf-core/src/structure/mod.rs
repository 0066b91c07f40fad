//! Document structure: the page table and the outline tree.

mod outline;
mod pages;

pub use outline::{OutlineHandle, OutlineTree};
pub use pages::PageTable;
