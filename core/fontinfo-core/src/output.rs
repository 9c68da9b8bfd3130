//! Report serialisation helpers for fontinfo-core

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::WriteError;
use crate::parse::FontInfo;

/// Font records in the order their files were enumerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    fonts: Vec<FontInfo>,
}

impl Report {
    pub fn new(fonts: Vec<FontInfo>) -> Self {
        Self { fonts }
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FontInfo> {
        self.fonts.iter()
    }

    pub fn into_fonts(self) -> Vec<FontInfo> {
        self.fonts
    }
}

/// Write the report as a JSON array indented by four spaces.
pub fn write_json_pretty(report: &Report, w: impl Write) -> serde_json::Result<()> {
    let mut ser = serde_json::Serializer::with_formatter(w, PrettyFormatter::with_indent(b"    "));
    report.serialize(&mut ser)
}

/// Create or truncate `path` and write the report into it.
///
/// Not atomic: a failure part way leaves a partial file behind.
pub fn write_report(report: &Report, path: &Path) -> Result<(), WriteError> {
    let io_error = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    write_json_pretty(report, &mut writer).map_err(|err| {
        if err.is_io() {
            io_error(err.into())
        } else {
            WriteError::Serialize(err)
        }
    })?;
    writer.flush().map_err(io_error)?;

    log::info!("wrote {} fonts to {}", report.len(), path.display());
    Ok(())
}
