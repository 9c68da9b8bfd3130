//! Scan, parse in parallel, and fan results back in scan order

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use crate::config::{CollectOptions, FontDirs, LicenseHints};
use crate::discovery::{DirDiscovery, FontDiscovery};
use crate::error::{CollectError, ParseError};
use crate::output::Report;
use crate::parse::{parse_font, FontInfo};
use crate::scheduler::{CancelToken, Scheduler, ShutdownOutcome};

/// Inventory the fonts in `dirs`.
///
/// Only a directory that cannot be listed (or a pool that cannot start)
/// fails the run; files that cannot be parsed are logged and left out.
pub fn collect_font_info(
    dirs: &FontDirs,
    opts: &CollectOptions,
    cancel: &CancelToken,
) -> Result<Report, CollectError> {
    let discovery = DirDiscovery::from_dirs(dirs).follow_symlinks(opts.follow_symlinks);
    collect_with(&discovery, opts, cancel, parse_font)
}

/// Same pipeline as [`collect_font_info`] with the discovery source and the
/// per-file parser supplied by the caller.
pub fn collect_with<D, P>(
    discovery: &D,
    opts: &CollectOptions,
    cancel: &CancelToken,
    parse: P,
) -> Result<Report, CollectError>
where
    D: FontDiscovery + ?Sized,
    P: Fn(&Path, &LicenseHints) -> Result<FontInfo, ParseError> + Send + Sync + 'static,
{
    let candidates = discovery.discover()?;
    let mut scheduler = Scheduler::new(opts.effective_jobs(), cancel.clone())?;

    let parse = Arc::new(parse);
    let hints = Arc::new(opts.hints.clone());
    let pending: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            let parse = Arc::clone(&parse);
            let hints = Arc::clone(&hints);
            let path = candidate.path.clone();
            scheduler.submit(candidate.path, move || match (*parse)(path.as_path(), &*hints) {
                Ok(info) => Some(info),
                Err(err) => {
                    log::warn!("{}", error_chain(&err));
                    None
                }
            })
        })
        .collect();

    let submitted = pending.len();
    log::debug!(
        "queued {submitted} candidates on {} workers",
        scheduler.workers()
    );
    let fonts = crate::aggregate::collect_in_order(pending, cancel);

    if let ShutdownOutcome::Forced { abandoned } = scheduler.shutdown(opts.grace_period) {
        log::warn!("{abandoned} font tasks were still running at shutdown");
    }
    log::info!("collected {} fonts from {submitted} candidates", fonts.len());

    Ok(Report::new(fonts))
}

fn error_chain(err: &ParseError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::CandidatePath;
    use crate::error::{MalformedKind, ScanError};
    use std::io;
    use std::path::PathBuf;
    use std::thread;
    use std::time::Duration;

    struct FixedList(Vec<&'static str>);

    impl FontDiscovery for FixedList {
        fn discover(&self) -> Result<Vec<CandidatePath>, ScanError> {
            Ok(self
                .0
                .iter()
                .map(|p| CandidatePath {
                    path: PathBuf::from(p),
                })
                .collect())
        }
    }

    struct Unreadable;

    impl FontDiscovery for Unreadable {
        fn discover(&self) -> Result<Vec<CandidatePath>, ScanError> {
            Err(ScanError::DirectoryAccess {
                path: PathBuf::from("/missing"),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
        }
    }

    fn fake_parse(path: &Path, _hints: &LicenseHints) -> Result<FontInfo, ParseError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if stem.starts_with("slow") {
            thread::sleep(Duration::from_millis(150));
        }
        if stem.starts_with("bad") {
            return Err(ParseError::Malformed {
                path: path.to_path_buf(),
                kind: MalformedKind::MissingNameTable,
            });
        }
        Ok(FontInfo {
            font_name: stem,
            license_info: Default::default(),
        })
    }

    #[test]
    fn report_follows_enumeration_order() {
        let discovery = FixedList(vec!["slow-a.ttf", "b.ttf", "bad-c.otf", "d.otf"]);
        let opts = CollectOptions {
            jobs: Some(4),
            ..CollectOptions::default()
        };
        let report = collect_with(&discovery, &opts, &CancelToken::new(), fake_parse).expect("run");
        let names: Vec<&str> = report.iter().map(|f| f.font_name.as_str()).collect();
        assert_eq!(names, vec!["slow-a", "b", "d"]);
    }

    #[test]
    fn scan_failure_is_fatal() {
        let result = collect_with(
            &Unreadable,
            &CollectOptions::default(),
            &CancelToken::new(),
            fake_parse,
        );
        assert!(matches!(result, Err(CollectError::Scan(_))));
    }

    #[test]
    fn pre_cancelled_run_yields_empty_report() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let discovery = FixedList(vec!["a.ttf", "b.ttf"]);
        let report = collect_with(&discovery, &CollectOptions::default(), &cancel, fake_parse)
            .expect("run");
        assert!(report.is_empty());
    }

    #[test]
    fn zero_jobs_is_rejected() {
        let opts = CollectOptions {
            jobs: Some(0),
            ..CollectOptions::default()
        };
        let result = collect_with(&FixedList(vec![]), &opts, &CancelToken::new(), fake_parse);
        assert!(matches!(result, Err(CollectError::InvalidJobs(0))));
    }

    #[test]
    fn error_chain_includes_io_cause() {
        let err = ParseError::FileRead {
            path: PathBuf::from("x.ttf"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error_chain(&err), "failed to read font file x.ttf: denied");
    }
}
