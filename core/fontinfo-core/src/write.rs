//! A minimal sfnt writer
//!
//! Produces just enough of a font (a table directory plus arbitrary tables,
//! usually a `name` table) for the reader to chew on. Used to synthesise
//! fixtures; it does not compute checksums or write any glyph data.
//!
//! Only built for tests and with the `test-support` feature. Oversized
//! inputs panic rather than wrap.

use crate::name::{platform, NAME_TAG};
use crate::sfnt::TT_SFNT_VERSION;

/// Collects name records and serialises them as a format 0 `name` table.
#[derive(Debug, Clone, Default)]
pub struct NameTableBuilder {
    records: Vec<(u16, u16, u16, u16, Vec<u8>)>,
}

impl NameTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Windows (platform 3, encoding 1, US English) record.
    pub fn windows(self, name_id: u16, text: &str) -> Self {
        self.text(platform::WINDOWS, 1, 0x0409, name_id, text)
    }

    /// Add a Macintosh (platform 1, Roman, English) record.
    pub fn mac(self, name_id: u16, text: &str) -> Self {
        self.text(platform::MACINTOSH, 0, 0, name_id, text)
    }

    /// Add a Unicode (platform 0, encoding 3) record.
    pub fn unicode(self, name_id: u16, text: &str) -> Self {
        self.text(platform::UNICODE, 3, 0, name_id, text)
    }

    /// Add a record, encoding `text` the way the reader expects for the
    /// platform/encoding pair. Characters outside Mac Roman become `?`.
    pub fn text(
        self,
        platform_id: u16,
        encoding_id: u16,
        language_id: u16,
        name_id: u16,
        text: &str,
    ) -> Self {
        let bytes: Vec<u8> = if platform_id == platform::MACINTOSH && encoding_id == 0 {
            text.chars().map(encode_mac_roman).collect()
        } else {
            text.encode_utf16().flat_map(u16::to_be_bytes).collect()
        };
        self.raw(platform_id, encoding_id, language_id, name_id, bytes)
    }

    /// Add a record with arbitrary string bytes.
    pub fn raw(
        mut self,
        platform_id: u16,
        encoding_id: u16,
        language_id: u16,
        name_id: u16,
        bytes: Vec<u8>,
    ) -> Self {
        self.records
            .push((platform_id, encoding_id, language_id, name_id, bytes));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let count = u16::try_from(self.records.len()).expect("too many name records");
        let storage_offset = 6 + 12 * count;

        let mut header = Vec::new();
        let mut storage = Vec::new();
        header.extend_from_slice(&0u16.to_be_bytes());
        header.extend_from_slice(&count.to_be_bytes());
        header.extend_from_slice(&storage_offset.to_be_bytes());

        for (platform_id, encoding_id, language_id, name_id, bytes) in &self.records {
            for field in [
                *platform_id,
                *encoding_id,
                *language_id,
                *name_id,
                u16::try_from(bytes.len()).expect("name string too long"),
                u16::try_from(storage.len()).expect("name storage too large"),
            ] {
                header.extend_from_slice(&field.to_be_bytes());
            }
            storage.extend_from_slice(bytes);
        }

        header.extend_from_slice(&storage);
        header
    }
}

/// Assembles a table directory and table bodies into a font file.
#[derive(Debug, Clone)]
pub struct SfntBuilder {
    version: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl Default for SfntBuilder {
    fn default() -> Self {
        Self::new(TT_SFNT_VERSION)
    }
}

impl SfntBuilder {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            tables: Vec::new(),
        }
    }

    pub fn table(mut self, tag: [u8; 4], data: Vec<u8>) -> Self {
        self.tables.push((tag, data));
        self
    }

    pub fn names(self, names: &NameTableBuilder) -> Self {
        self.table(NAME_TAG, names.build())
    }

    pub fn build(&self) -> Vec<u8> {
        let num_tables = u16::try_from(self.tables.len()).expect("too many tables");
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        // searchRange, entrySelector, rangeShift are never read back
        out.extend_from_slice(&[0; 6]);

        let mut offset = 12 + 16 * self.tables.len();
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&0u32.to_be_bytes());
            for field in [offset, data.len()] {
                let field = u32::try_from(field).expect("font larger than 4 GiB");
                out.extend_from_slice(&field.to_be_bytes());
            }
            offset += padded_len(data.len());
        }

        for (_, data) in &self.tables {
            out.extend_from_slice(data);
            out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
        }
        out
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn encode_mac_roman(c: char) -> u8 {
    if c.is_ascii() {
        return c as u8;
    }
    (0x80..=0xFFu8)
        .find(|&b| crate::name::mac_roman_char(b) == c)
        .unwrap_or(b'?')
}
