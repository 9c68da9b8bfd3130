#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fontinfo_core::name::name_id;
use fontinfo_core::write::{NameTableBuilder, SfntBuilder};

/// Write a TrueType font with the given full name and extra Windows records.
pub fn write_font(dir: &Path, file: &str, full_name: &str, extra: &[(u16, &str)]) -> PathBuf {
    let names = extra
        .iter()
        .fold(NameTableBuilder::new(), |names, (id, text)| {
            names.windows(*id, text)
        })
        .windows(name_id::FULL_NAME, full_name);
    let path = dir.join(file);
    fs::write(&path, SfntBuilder::default().names(&names).build()).expect("write font");
    path
}

/// The Arial-like fixture: a full name plus a Microsoft copyright notice.
pub fn write_arial(dir: &Path) -> PathBuf {
    write_font(
        dir,
        "Arial.ttf",
        "Arial",
        &[(
            name_id::COPYRIGHT_NOTICE,
            "Copyright (c) 2020 Microsoft Corporation",
        )],
    )
}

/// An OTF that starts like a CFF font but is cut off before its table directory.
pub fn write_broken(dir: &Path) -> PathBuf {
    let path = dir.join("Broken.otf");
    fs::write(&path, b"OTTO\x00\x03").expect("write broken font");
    path
}
