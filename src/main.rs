//! CLI entry point for dutally

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use dutally::{
    Depth, Error, FolderSize, JsonReporter, ReportConfig, Reporter, SizeWalker, Unit, WalkerConfig,
    free_space,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dutally")]
#[command(about = "Show how much disk space each folder uses")]
#[command(version)]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Unit for sizes: b, kb, mb, gb, tb, kib, mib, gib, tib
    #[arg(short = 'u', long = "unit", default_value = "mib")]
    unit: Unit,

    /// List folders N levels deep ("max" for no limit)
    #[arg(short = 'd', long = "depth", value_name = "N", default_value = "1")]
    depth: Depth,

    /// Do not draw the progress spinner
    #[arg(long = "no-progress")]
    no_progress: bool,

    /// Leave out folders whose size rounds to zero
    #[arg(short = 'z', long = "hide-zero")]
    hide_zero: bool,

    /// Do not report free space on the volume
    #[arg(long = "no-free")]
    no_free: bool,

    /// Skip symbolic links instead of following them
    #[arg(long = "no-links")]
    no_links: bool,

    /// Count files marked offline
    #[arg(long = "offline")]
    offline: bool,

    /// Skip hidden files and folders
    #[arg(short = 'H', long = "skip-hidden")]
    skip_hidden: bool,

    /// Skip entries whose name matches pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "GLOB")]
    ignore: Vec<String>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Output a JSON document instead of the text report
    #[arg(long = "json")]
    json: bool,

    /// Log scan diagnostics to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "dutally=debug" } else { "dutally=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => {}
        Err(Error::Io(e)) => {
            eprintln!("dutally: error writing output: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("dutally: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> dutally::Result<()> {
    let root = resolve_root(&args.path)?;

    let walker = SizeWalker::new(WalkerConfig {
        follow_links: !args.no_links,
        include_offline: args.offline,
        skip_hidden: args.skip_hidden,
        ignore_patterns: args.ignore.clone(),
    })?;

    let report_config = ReportConfig {
        unit: args.unit,
        depth: args.depth,
        show_progress: !args.no_progress && !args.json && io::stdout().is_terminal(),
        hide_zero: args.hide_zero,
        use_color: should_use_color(args.color),
    };

    debug!(root = %root.display(), unit = %args.unit, depth = %args.depth, "starting scan");

    if args.json {
        let mut sink = JsonReporter::new(&root, report_config);
        let size = walker.walk(&root, &mut sink)?;
        report_root_size(&root, size);
        let free = volume_free_space(&root, !args.no_free);
        sink.finish(&mut io::stdout().lock(), free)?;
    } else {
        let mut reporter = Reporter::stdout(report_config);
        let size = walker.walk(&root, &mut reporter)?;
        report_root_size(&root, size);
        let free = volume_free_space(&root, !args.no_free);
        reporter.finish(free)?;
    }
    Ok(())
}

/// Make the scan root absolute and check that it exists and is a directory.
///
/// Whether it can be listed is only known once the walk starts.
fn resolve_root(path: &Path) -> dutally::Result<PathBuf> {
    let root = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    let meta = std::fs::metadata(&root).map_err(|source| Error::RootUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    Ok(root)
}

fn report_root_size(root: &Path, size: FolderSize) {
    if size.is_unreadable() {
        warn!(root = %root.display(), "cannot list the scan root; sizes are unknown");
    } else {
        debug!(?size, "scan finished");
    }
}

/// Free space for the report, or `None` when disabled or unavailable.
fn volume_free_space(root: &Path, enabled: bool) -> Option<u64> {
    if !enabled {
        return None;
    }
    free_space(root)
        .map_err(|e| debug!(error = %e, "omitting free space"))
        .ok()
}
