//! fontinfo-core: inventory installed fonts and their license strings
//!
//! The pipeline runs in four stages:
//!
//! - **Discovery** ([`discovery`]) lists `.ttf`/`.otf` files one level deep in
//!   the configured system and user font directories.
//! - **Parsing** ([`parse`]) decodes each file's sfnt table directory and
//!   `name` table ([`sfnt`], [`name`]) without any font library, yielding the
//!   full font name and every name string that looks license related.
//! - **Scheduling** ([`scheduler`], [`aggregate`]) runs the parses on a fixed
//!   worker pool and gathers results back in discovery order.
//! - **Output** ([`output`]) writes the report as four-space indented JSON.
//!
//! ```rust,no_run
//! use fontinfo_core::collect::collect_font_info;
//! use fontinfo_core::config::{CollectOptions, FontDirs, REPORT_FILE_NAME};
//! use fontinfo_core::output::write_report;
//! use fontinfo_core::scheduler::CancelToken;
//!
//! let dirs = FontDirs::new("/usr/share/fonts", "/home/me/.local/share/fonts");
//! let report = collect_font_info(&dirs, &CollectOptions::default(), &CancelToken::new())?;
//! write_report(&report, REPORT_FILE_NAME.as_ref())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Only two failures end a run: a font directory that cannot be listed and a
//! report that cannot be written. A file that fails to parse is logged and
//! left out of the report.

pub mod aggregate;
pub mod collect;
pub mod config;
pub mod discovery;
pub mod error;
pub mod name;
pub mod output;
pub mod parse;
pub mod scheduler;
pub mod sfnt;
#[cfg(any(test, feature = "test-support"))]
pub mod write;

pub use collect::collect_font_info;
pub use config::{CollectOptions, FontDirs, LicenseHints};
pub use error::{CollectError, ParseError, ScanError, WriteError};
pub use output::Report;
pub use parse::FontInfo;
