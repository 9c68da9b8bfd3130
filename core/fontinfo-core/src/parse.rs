//! Per-file extraction of the full name and license strings

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::config::LicenseHints;
use crate::error::{MalformedKind, ParseError};
use crate::name::{NameTable, NAME_TAG};
use crate::sfnt::{FontData, TableDirectory};

/// What the report records for one font file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontInfo {
    pub font_name: String,
    pub license_info: BTreeSet<String>,
}

/// Read `path` and extract its [`FontInfo`].
///
/// The file handle lives only for the duration of the read and is closed on
/// every return path.
pub fn parse_font(path: &Path, hints: &LicenseHints) -> Result<FontInfo, ParseError> {
    let bytes = read_file(path).map_err(|source| ParseError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let info = parse_font_bytes(&bytes, hints).map_err(|kind| ParseError::Malformed {
        path: path.to_path_buf(),
        kind,
    })?;

    log::info!(
        "{} Font Name: {}",
        thread::current().name().unwrap_or("main"),
        info.font_name
    );
    Ok(info)
}

fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Decode an in-memory font.
pub fn parse_font_bytes(bytes: &[u8], hints: &LicenseHints) -> Result<FontInfo, MalformedKind> {
    let data = FontData::new(bytes);
    let directory = TableDirectory::read(data)?;
    let name_record = directory
        .find(&NAME_TAG)
        .ok_or(MalformedKind::MissingNameTable)?;
    let names = NameTable::read(data, name_record.offset as usize)?;
    log::trace!(
        "{:?} outlines, {} tables, name format {} with {} usable records",
        directory.version,
        directory.records.len(),
        names.format,
        names.records.len()
    );

    let font_name = names
        .full_name()
        .ok_or(MalformedKind::MissingFullName)?
        .to_string();

    let license_info = names
        .records
        .iter()
        .filter(|rec| hints.matches(&rec.text))
        .map(|rec| rec.text.clone())
        .collect();

    Ok(FontInfo {
        font_name,
        license_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::name_id;
    use crate::sfnt::CFF_SFNT_VERSION;
    use crate::write::{NameTableBuilder, SfntBuilder};

    fn font_with(names: NameTableBuilder) -> Vec<u8> {
        SfntBuilder::default().names(&names).build()
    }

    #[test]
    fn license_strings_are_collected_without_duplicates() {
        let names = NameTableBuilder::new()
            .mac(name_id::COPYRIGHT_NOTICE, "Copyright 2020 Acme")
            .windows(name_id::COPYRIGHT_NOTICE, "Copyright 2020 Acme")
            .windows(name_id::FULL_NAME, "Acme Sans")
            .windows(name_id::TRADEMARK, "Acme Sans is a trademark of Acme")
            .windows(name_id::LICENSE_DESCRIPTION, "SIL Open Font License 1.1");
        let info = parse_font_bytes(&font_with(names), &LicenseHints::default()).expect("parse");

        assert_eq!(info.font_name, "Acme Sans");
        let expected: BTreeSet<String> = [
            "Copyright 2020 Acme",
            "Acme Sans is a trademark of Acme",
            "SIL Open Font License 1.1",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(info.license_info, expected);
    }

    #[test]
    fn hints_apply_to_any_name_id() {
        let names = NameTableBuilder::new()
            .windows(name_id::FULL_NAME, "Segoe UI")
            .windows(9, "Microsoft Design Team");
        let info = parse_font_bytes(&font_with(names), &LicenseHints::default()).expect("parse");
        assert_eq!(
            info.license_info.into_iter().collect::<Vec<_>>(),
            vec!["Microsoft Design Team".to_string()]
        );
    }

    #[test]
    fn cff_fonts_are_accepted() {
        let names = NameTableBuilder::new().unicode(name_id::FULL_NAME, "Otto Regular");
        let font = SfntBuilder::new(CFF_SFNT_VERSION).names(&names).build();
        let info = parse_font_bytes(&font, &LicenseHints::default()).expect("parse");
        assert_eq!(info.font_name, "Otto Regular");
        assert!(info.license_info.is_empty());
    }

    #[test]
    fn undecodable_record_is_dropped_but_font_survives() {
        let names = NameTableBuilder::new()
            .raw(3, 1, 0x0409, name_id::COPYRIGHT_NOTICE, vec![0x00, 0x43, 0x00])
            .windows(name_id::FULL_NAME, "Survivor");
        let info = parse_font_bytes(&font_with(names), &LicenseHints::default()).expect("parse");
        assert_eq!(info.font_name, "Survivor");
        assert!(info.license_info.is_empty());
    }

    #[test]
    fn undecodable_full_name_counts_as_missing() {
        let names = NameTableBuilder::new().raw(3, 1, 0x0409, name_id::FULL_NAME, vec![0xDC, 0x00]);
        let err = parse_font_bytes(&font_with(names), &LicenseHints::default()).unwrap_err();
        assert_eq!(err, MalformedKind::MissingFullName);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = parse_font(Path::new("/nonexistent/fontinfo/None.ttf"), &LicenseHints::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::FileRead { .. }));
        assert!(err.path().ends_with("None.ttf"));
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let info = FontInfo {
            font_name: "Arial".into(),
            license_info: ["Copyright".to_string()].into_iter().collect(),
        };
        let value = serde_json::to_value(&info).expect("json");
        assert_eq!(value["fontName"], "Arial");
        assert_eq!(value["licenseInfo"][0], "Copyright");
    }
}
