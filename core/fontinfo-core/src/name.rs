//! The `name` table: record headers and string decoding
//!
//! Record layout and encodings follow the OpenType `name` table. Strings are
//! decoded eagerly; a record whose bytes cannot be decoded is dropped on its
//! own without failing the table.

use crate::error::{DecodeError, MalformedKind};
use crate::sfnt::FontData;

pub const NAME_TAG: [u8; 4] = *b"name";

const NAME_HEADER_LEN: usize = 6;
const NAME_RECORD_LEN: usize = 12;

/// Platform IDs that matter when choosing between duplicate records.
pub mod platform {
    pub const UNICODE: u16 = 0;
    pub const MACINTOSH: u16 = 1;
    pub const WINDOWS: u16 = 3;
}

/// Name IDs with a fixed meaning.
pub mod name_id {
    pub const COPYRIGHT_NOTICE: u16 = 0;
    pub const FULL_NAME: u16 = 4;
    pub const TRADEMARK: u16 = 7;
    pub const LICENSE_DESCRIPTION: u16 = 13;
}

/// One decoded entry of a font's `name` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub text: String,
}

/// Raw header of a record before its string has been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawNameRecord {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    length: u16,
    offset: u16,
}

/// The decoded contents of a `name` table.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    pub format: u16,
    pub records: Vec<NameRecord>,
}

impl NameTable {
    /// Decode the table found at `table_offset` in the file.
    ///
    /// Header or record-array overruns make the whole table malformed; a
    /// string that cannot be decoded only loses its own record.
    pub fn read(font: FontData<'_>, table_offset: usize) -> Result<Self, MalformedKind> {
        let table = font.split_off(table_offset).ok_or(MalformedKind::Truncated {
            what: "name table",
        })?;

        let header = |at: usize| {
            table.read_u16(at).ok_or(MalformedKind::Truncated {
                what: "name table header",
            })
        };
        let format = header(0)?;
        let count = header(2)?;
        let storage_offset = header(4)? as usize;

        let mut records = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let raw = read_raw_record(table, NAME_HEADER_LEN + i * NAME_RECORD_LEN).ok_or(
                MalformedKind::Truncated {
                    what: "name records",
                },
            )?;

            match decode_record(table, storage_offset, &raw) {
                Ok(text) => records.push(NameRecord {
                    platform_id: raw.platform_id,
                    encoding_id: raw.encoding_id,
                    language_id: raw.language_id,
                    name_id: raw.name_id,
                    text,
                }),
                Err(err) => log::debug!(
                    "dropping name record {} (platform {}, encoding {}): {err}",
                    raw.name_id,
                    raw.platform_id,
                    raw.encoding_id
                ),
            }
        }

        Ok(NameTable { format, records })
    }

    /// The full font name, preferring Windows, then Macintosh, then Unicode
    /// records; the first record in table order wins within a platform.
    pub fn full_name(&self) -> Option<&str> {
        self.records
            .iter()
            .filter(|rec| rec.name_id == name_id::FULL_NAME)
            .enumerate()
            .min_by_key(|(pos, rec)| (platform_rank(rec.platform_id), *pos))
            .map(|(_, rec)| rec.text.as_str())
    }
}

fn platform_rank(platform_id: u16) -> u8 {
    match platform_id {
        platform::WINDOWS => 0,
        platform::MACINTOSH => 1,
        platform::UNICODE => 2,
        _ => 3,
    }
}

fn read_raw_record(table: FontData<'_>, at: usize) -> Option<RawNameRecord> {
    Some(RawNameRecord {
        platform_id: table.read_u16(at)?,
        encoding_id: table.read_u16(at + 2)?,
        language_id: table.read_u16(at + 4)?,
        name_id: table.read_u16(at + 6)?,
        length: table.read_u16(at + 8)?,
        offset: table.read_u16(at + 10)?,
    })
}

fn decode_record(
    table: FontData<'_>,
    storage_offset: usize,
    raw: &RawNameRecord,
) -> Result<String, DecodeError> {
    let start = storage_offset + raw.offset as usize;
    let len = raw.length as usize;
    let bytes = table
        .slice(start, len)
        .ok_or(DecodeError::OutOfBounds {
            start,
            end: start + len,
        })?;

    Encoding::new(raw.platform_id, raw.encoding_id).decode(bytes)
}

/// The text encoding a record's bytes are stored in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    MacRoman,
}

impl Encoding {
    /// Macintosh/Roman is the only single-byte encoding handled; every other
    /// platform and encoding pair is read as UTF-16BE.
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (platform::MACINTOSH, 0) => Encoding::MacRoman,
            _ => Encoding::Utf16Be,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            Encoding::Utf16Be => decode_utf16be(bytes),
            Encoding::MacRoman => Ok(bytes.iter().map(|&b| mac_roman_char(b)).collect()),
        }
    }
}

fn decode_utf16be(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength(bytes.len()));
    }

    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));

    char::decode_utf16(units)
        .map(|c| c.map_err(|e| DecodeError::UnpairedSurrogate(e.unpaired_surrogate())))
        .collect()
}

/// Map one Mac OS Roman byte to its Unicode scalar.
pub fn mac_roman_char(byte: u8) -> char {
    match byte {
        0..=0x7F => byte as char,
        _ => MAC_ROMAN_HIGH[(byte - 0x80) as usize],
    }
}

/// Unicode values of Mac OS Roman bytes 0x80..=0xFF.
#[rustfmt::skip]
static MAC_ROMAN_HIGH: [char; 128] = [
    '\u{00C4}', '\u{00C5}', '\u{00C7}', '\u{00C9}', '\u{00D1}', '\u{00D6}', '\u{00DC}', '\u{00E1}',
    '\u{00E0}', '\u{00E2}', '\u{00E4}', '\u{00E3}', '\u{00E5}', '\u{00E7}', '\u{00E9}', '\u{00E8}',
    '\u{00EA}', '\u{00EB}', '\u{00ED}', '\u{00EC}', '\u{00EE}', '\u{00EF}', '\u{00F1}', '\u{00F3}',
    '\u{00F2}', '\u{00F4}', '\u{00F6}', '\u{00F5}', '\u{00FA}', '\u{00F9}', '\u{00FB}', '\u{00FC}',
    '\u{2020}', '\u{00B0}', '\u{00A2}', '\u{00A3}', '\u{00A7}', '\u{2022}', '\u{00B6}', '\u{00DF}',
    '\u{00AE}', '\u{00A9}', '\u{2122}', '\u{00B4}', '\u{00A8}', '\u{2260}', '\u{00C6}', '\u{00D8}',
    '\u{221E}', '\u{00B1}', '\u{2264}', '\u{2265}', '\u{00A5}', '\u{00B5}', '\u{2202}', '\u{2211}',
    '\u{220F}', '\u{03C0}', '\u{222B}', '\u{00AA}', '\u{00BA}', '\u{03A9}', '\u{00E6}', '\u{00F8}',
    '\u{00BF}', '\u{00A1}', '\u{00AC}', '\u{221A}', '\u{0192}', '\u{2248}', '\u{2206}', '\u{00AB}',
    '\u{00BB}', '\u{2026}', '\u{00A0}', '\u{00C0}', '\u{00C3}', '\u{00D5}', '\u{0152}', '\u{0153}',
    '\u{2013}', '\u{2014}', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '\u{00F7}', '\u{25CA}',
    '\u{00FF}', '\u{0178}', '\u{2044}', '\u{20AC}', '\u{2039}', '\u{203A}', '\u{FB01}', '\u{FB02}',
    '\u{2021}', '\u{00B7}', '\u{201A}', '\u{201E}', '\u{2030}', '\u{00C2}', '\u{00CA}', '\u{00C1}',
    '\u{00CB}', '\u{00C8}', '\u{00CD}', '\u{00CE}', '\u{00CF}', '\u{00CC}', '\u{00D3}', '\u{00D4}',
    '\u{F8FF}', '\u{00D2}', '\u{00DA}', '\u{00DB}', '\u{00D9}', '\u{0131}', '\u{02C6}', '\u{02DC}',
    '\u{00AF}', '\u{02D8}', '\u{02D9}', '\u{02DA}', '\u{00B8}', '\u{02DD}', '\u{02DB}', '\u{02C7}',
];
