//! Font discovery helpers for fontinfo-core

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::FontDirs;
use crate::error::ScanError;

/// Path to a candidate font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    pub path: PathBuf,
}

/// Trait for enumerating font candidates from some backing store.
pub trait FontDiscovery {
    fn discover(&self) -> Result<Vec<CandidatePath>, ScanError>;
}

/// Flat (one level deep) directory lister that collects `.ttf`/`.otf` files.
///
/// Entries are yielded directory by directory in configuration order, and
/// by file name within a directory, so repeated scans of an unchanged tree
/// agree.
#[derive(Debug, Clone)]
pub struct DirDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl DirDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn from_dirs(dirs: &FontDirs) -> Self {
        Self::new(dirs.iter())
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl FontDiscovery for DirDiscovery {
    fn discover(&self) -> Result<Vec<CandidatePath>, ScanError> {
        let mut found = Vec::new();

        for root in &self.roots {
            // Refuse up front so a missing directory never yields a partial scan.
            ensure_directory(root)?;

            let walker = WalkDir::new(root)
                .min_depth(1)
                .max_depth(1)
                .follow_links(self.follow_symlinks)
                .sort_by_file_name();

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) if err.depth() == 0 => {
                        return Err(ScanError::DirectoryAccess {
                            path: root.clone(),
                            source: err
                                .into_io_error()
                                .unwrap_or_else(|| io::Error::other("directory walk failed")),
                        });
                    }
                    Err(err) => {
                        log::warn!("skipping unreadable entry in {}: {err}", root.display());
                        continue;
                    }
                };

                if is_font(entry.path()) && is_regular_file(&entry) {
                    found.push(CandidatePath {
                        path: entry.path().to_path_buf(),
                    });
                }
            }
        }

        log::debug!("discovered {} font candidates", found.len());
        Ok(found)
    }
}

/// Enumerate candidates in the configured system and user directories.
pub fn scan(dirs: &FontDirs) -> Result<Vec<CandidatePath>, ScanError> {
    DirDiscovery::from_dirs(dirs).discover()
}

fn ensure_directory(root: &Path) -> Result<(), ScanError> {
    let access_error = |source| ScanError::DirectoryAccess {
        path: root.to_path_buf(),
        source,
    };

    let meta = fs::metadata(root).map_err(access_error)?;
    if !meta.is_dir() {
        return Err(access_error(io::Error::other("not a directory")));
    }
    let _ = fs::read_dir(root).map_err(access_error)?;
    Ok(())
}

/// Regular files qualify, and so do symlinks that resolve to one.
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    match fs::metadata(entry.path()) {
        Ok(meta) => meta.is_file(),
        Err(err) => {
            log::warn!("skipping dangling link {}: {err}", entry.path().display());
            false
        }
    }
}

fn is_font(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return false,
    };

    matches!(ext.as_str(), "ttf" | "otf")
}

#[cfg(test)]
mod tests {
    use super::is_font;
    use super::DirDiscovery;
    use super::FontDiscovery;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn recognises_font_extensions() {
        assert!(is_font("/A/B/font.ttf".as_ref()));
        assert!(is_font("/A/B/font.OTF".as_ref()));
        assert!(is_font("/A/B/Font.TtF".as_ref()));
        assert!(!is_font("/A/B/font.ttc".as_ref()));
        assert!(!is_font("/A/B/font.txt".as_ref()));
        assert!(!is_font("/A/B/font".as_ref()));
        assert!(!is_font("/A/B/ttf".as_ref()));
    }

    #[test]
    fn does_not_descend_into_subdirectories() {
        let tmp = tempdir().expect("tempdir");
        let nested = tmp.path().join("a");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("deep.ttf"), b"").expect("touch nested font");
        let top = tmp.path().join("top.otf");
        fs::write(&top, b"").expect("touch font");

        let fonts = DirDiscovery::new([tmp.path()]).discover().expect("discover");

        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].path, top);
    }

    #[test]
    fn directory_named_like_a_font_is_skipped() {
        let tmp = tempdir().expect("tempdir");
        fs::create_dir_all(tmp.path().join("folder.ttf")).expect("mkdir");

        let fonts = DirDiscovery::new([tmp.path()]).discover().expect("discover");

        assert!(fonts.is_empty());
    }

    #[test]
    fn plain_file_as_root_is_an_access_error() {
        let tmp = tempdir().expect("tempdir");
        let file = tmp.path().join("fonts");
        fs::write(&file, b"").expect("touch");

        assert!(DirDiscovery::new([&file]).discover().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_fonts_are_listed() {
        use std::os::unix::fs::symlink;

        let tmp = tempdir().expect("tempdir");
        let real = tmp.path().join("real.otf");
        fs::write(&real, b"").expect("touch font");
        let scan_dir = tmp.path().join("scan");
        fs::create_dir_all(&scan_dir).expect("mkdir scan");
        symlink(&real, scan_dir.join("linked.otf")).expect("symlink");

        for follow in [false, true] {
            let fonts = DirDiscovery::new([&scan_dir])
                .follow_symlinks(follow)
                .discover()
                .expect("discover");
            assert_eq!(fonts.len(), 1, "follow_symlinks = {follow}");
            assert!(fonts[0].path.ends_with("linked.otf"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn links_to_directories_and_dangling_links_are_skipped() {
        use std::os::unix::fs::symlink;

        let tmp = tempdir().expect("tempdir");
        let target_dir = tmp.path().join("dir");
        fs::create_dir_all(&target_dir).expect("mkdir");
        let scan_dir = tmp.path().join("scan");
        fs::create_dir_all(&scan_dir).expect("mkdir scan");
        symlink(&target_dir, scan_dir.join("folder.ttf")).expect("dir symlink");
        symlink(tmp.path().join("missing.ttf"), scan_dir.join("gone.ttf")).expect("dangling");

        let fonts = DirDiscovery::new([&scan_dir]).discover().expect("discover");

        assert!(fonts.is_empty());
    }
}
