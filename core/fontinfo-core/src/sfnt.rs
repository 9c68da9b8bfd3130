//! The sfnt container: version tag and table directory
//!
//! Everything here works on a borrowed byte slice with bounds-checked
//! big-endian reads; running off the end is reported as
//! [`MalformedKind::Truncated`] rather than a panic.

use crate::error::MalformedKind;

/// Version tag of TrueType-outline fonts.
pub const TT_SFNT_VERSION: u32 = 0x0001_0000;
/// Version tag of CFF-outline OpenType fonts (`OTTO`).
pub const CFF_SFNT_VERSION: u32 = u32::from_be_bytes(*b"OTTO");

const TABLE_DIRECTORY_OFFSET: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// A reference to raw big-endian font bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

impl<'a> FontData<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn slice(&self, start: usize, len: usize) -> Option<&'a [u8]> {
        let end = start.checked_add(len)?;
        self.bytes.get(start..end)
    }

    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        self.read_array::<2>(offset).map(u16::from_be_bytes)
    }

    pub fn read_u32(&self, offset: usize) -> Option<u32> {
        self.read_array::<4>(offset).map(u32::from_be_bytes)
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.slice(offset, N)?.try_into().ok()
    }
}

/// Flavour of outline data announced by the version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfntVersion {
    TrueType,
    Cff,
}

impl SfntVersion {
    pub fn from_tag(raw: u32) -> Result<Self, MalformedKind> {
        match raw {
            TT_SFNT_VERSION => Ok(SfntVersion::TrueType),
            CFF_SFNT_VERSION => Ok(SfntVersion::Cff),
            other => Err(MalformedKind::BadVersionTag(other)),
        }
    }
}

/// One entry of the table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: [u8; 4],
    pub offset: u32,
    pub length: u32,
}

/// The parsed header of an sfnt file.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    pub version: SfntVersion,
    pub records: Vec<TableRecord>,
}

impl TableDirectory {
    pub fn read(data: FontData<'_>) -> Result<Self, MalformedKind> {
        let raw_version = data
            .read_u32(0)
            .ok_or(MalformedKind::Truncated { what: "sfnt version" })?;
        let version = SfntVersion::from_tag(raw_version)?;

        let num_tables = data
            .read_u16(4)
            .ok_or(MalformedKind::Truncated { what: "table count" })?;

        let records = (0..num_tables as usize)
            .map(|i| read_table_record(data, TABLE_DIRECTORY_OFFSET + i * TABLE_RECORD_LEN))
            .collect::<Option<Vec<_>>>()
            .ok_or(MalformedKind::Truncated {
                what: "table directory",
            })?;

        Ok(TableDirectory { version, records })
    }

    pub fn find(&self, tag: &[u8; 4]) -> Option<&TableRecord> {
        self.records.iter().find(|rec| &rec.tag == tag)
    }
}

fn read_table_record(data: FontData<'_>, at: usize) -> Option<TableRecord> {
    Some(TableRecord {
        // the checksum at +4 is not verified
        tag: data.slice(at, 4)?.try_into().ok()?,
        offset: data.read_u32(at + 8)?,
        length: data.read_u32(at + 12)?,
    })
}
