//! fontinfo CLI

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use fontinfo_core::collect::collect_font_info;
use fontinfo_core::config::{CollectOptions, FontDirs, REPORT_FILE_NAME};
use fontinfo_core::output::write_report;
use fontinfo_core::scheduler::CancelToken;

/// Environment override for the system-wide font directory.
pub const SYSTEM_DIR_VAR: &str = "FONTINFO_SYSTEM_FONT_DIR";
/// Environment override for the per-user font directory.
pub const USER_DIR_VAR: &str = "FONTINFO_USER_FONT_DIR";

/// CLI entrypoint for fontinfo. Takes no arguments.
#[derive(Debug, Parser)]
#[command(
    name = "fontinfo",
    version,
    about = "Write the full name and license strings of every installed font to fonts_info.json"
)]
pub struct Cli {}

/// How a run ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Written { fonts: usize },
    Cancelled,
}

/// Parse CLI args and execute the inventory.
pub fn run() -> Result<RunOutcome> {
    let _cli = Cli::parse();
    init_logging();

    let dirs = resolve_font_dirs(|key| env::var_os(key))?;
    let cancel = CancelToken::new();
    install_interrupt_handler(cancel.clone());

    inventory(&dirs, &CollectOptions::default(), &cancel, Path::new(REPORT_FILE_NAME))
}

/// Collect the report for `dirs` and write it to `out`, unless cancelled.
pub fn inventory(
    dirs: &FontDirs,
    opts: &CollectOptions,
    cancel: &CancelToken,
    out: &Path,
) -> Result<RunOutcome> {
    log::info!(
        "scanning {} and {}",
        dirs.system.display(),
        dirs.user.display()
    );
    let report = collect_font_info(dirs, opts, cancel).context("font inventory failed")?;

    if cancel.is_cancelled() {
        log::warn!("interrupted; {} not written", out.display());
        return Ok(RunOutcome::Cancelled);
    }

    write_report(&report, out).context("writing the font report failed")?;
    Ok(RunOutcome::Written {
        fonts: report.len(),
    })
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Resolve the system and user font directories, honouring the
/// `FONTINFO_*_FONT_DIR` overrides before the platform defaults.
pub fn resolve_font_dirs(var: impl Fn(&str) -> Option<OsString>) -> Result<FontDirs> {
    let non_empty = |key: &str| var(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    let system = match non_empty(SYSTEM_DIR_VAR) {
        Some(dir) => dir,
        None => default_system_dir(&non_empty)?,
    };
    let user = match non_empty(USER_DIR_VAR) {
        Some(dir) => dir,
        None => default_user_dir(&non_empty)?,
    };

    Ok(FontDirs::new(system, user))
}

fn default_system_dir(var: &impl Fn(&str) -> Option<PathBuf>) -> Result<PathBuf> {
    if cfg!(target_os = "windows") {
        let windir = var("WINDIR")
            .or_else(|| var("SYSTEMROOT"))
            .ok_or_else(|| anyhow!("neither WINDIR nor SYSTEMROOT is set"))?;
        Ok(windir.join("Fonts"))
    } else if cfg!(target_os = "macos") {
        Ok(PathBuf::from("/Library/Fonts"))
    } else {
        Ok(PathBuf::from("/usr/share/fonts"))
    }
}

fn default_user_dir(var: &impl Fn(&str) -> Option<PathBuf>) -> Result<PathBuf> {
    if cfg!(target_os = "windows") {
        if let Some(local) = var("LOCALAPPDATA") {
            return Ok(local.join("Microsoft").join("Windows").join("Fonts"));
        }
        let profile = var("USERPROFILE")
            .ok_or_else(|| anyhow!("neither LOCALAPPDATA nor USERPROFILE is set"))?;
        Ok(profile
            .join("AppData")
            .join("Local")
            .join("Microsoft")
            .join("Windows")
            .join("Fonts"))
    } else {
        let home = var("HOME").ok_or_else(|| anyhow!("HOME is not set"))?;
        if cfg!(target_os = "macos") {
            Ok(home.join("Library").join("Fonts"))
        } else {
            Ok(home.join(".local").join("share").join("fonts"))
        }
    }
}

/// Cancel `cancel` on Ctrl-C. The listener runs on its own thread so the
/// worker pool never shares a runtime with it.
fn install_interrupt_handler(cancel: CancelToken) {
    let spawned = thread::Builder::new()
        .name("fontinfo-signal".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::warn!("Ctrl-C handling unavailable: {err}");
                    return;
                }
            };
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("interrupt received; cancelling outstanding font tasks");
                    cancel.cancel();
                }
            });
        });

    if let Err(err) = spawned {
        log::warn!("Ctrl-C handling unavailable: {err}");
    }
}
