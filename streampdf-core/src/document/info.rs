//! The document information dictionary.

use std::io::Write;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::objects::ObjectId;
use crate::writer::PdfWriter;

/// Entries of the `/Info` dictionary.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub keywords: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub creator: Option<String>,
    pub author: Option<String>,
    /// One key of the caller's choice. Setting another replaces it.
    pub user: Option<(String, String)>,
    /// Defaults to the time the info object is written.
    pub creation_date: Option<DateTime<Local>>,
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entry by its PDF key name. Keys other than the five
    /// standard ones become the user-defined entry.
    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "Keywords" => self.keywords = Some(value),
            "Subject" => self.subject = Some(value),
            "Title" => self.title = Some(value),
            "Creator" => self.creator = Some(value),
            "Author" => self.author = Some(value),
            _ => self.user = Some((key.to_string(), value)),
        }
    }

    pub fn producer() -> String {
        format!("streampdf {}", crate::VERSION)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut PdfWriter<W>, id: ObjectId) -> Result<()> {
        writer.begin_obj(Some(id))?;
        writer.begin_dict()?;

        let standard = [
            ("Keywords", &self.keywords),
            ("Subject", &self.subject),
            ("Title", &self.title),
            ("Creator", &self.creator),
            ("Author", &self.author),
        ];
        for (key, value) in standard {
            if let Some(value) = value {
                write_entry(writer, key, value)?;
            }
        }
        if let Some((key, value)) = &self.user {
            write_entry(writer, key, value)?;
        }

        let date = self.creation_date.unwrap_or_else(Local::now);
        write!(
            writer,
            "/CreationDate (D:{})\n",
            date.format("%Y%m%d%H%M%S")
        )?;
        writer.write_str("/Producer ")?;
        writer.write_text(&Self::producer())?;
        writer.write_str("\n")?;

        writer.end_dict()?;
        writer.end_obj()
    }
}

fn write_entry<W: Write>(writer: &mut PdfWriter<W>, key: &str, value: &str) -> Result<()> {
    write!(writer, "/{} ", key)?;
    writer.write_text(value)?;
    writer.write_str("\n")
}
