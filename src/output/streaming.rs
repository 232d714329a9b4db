//! Streaming text reporter
//!
//! `Reporter` buffers the folders of the top-level branch being scanned and
//! prints them, sorted by path, when that branch closes. Between flushes it
//! may draw a spinner on the current line.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::tree::ScanSink;
use crate::types::{FolderRecord, FolderSize};
use crate::units::UnitFormat;

use super::config::ReportConfig;
use super::progress::Progress;

/// Running byte counts for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotals {
    /// Files directly in the scan root
    pub top_level_folder_size: u64,
    /// Every counted file
    pub grand_total_size: u64,
}

/// Text reporter writing to any `WriteColor` stream.
pub struct Reporter<W: WriteColor> {
    config: ReportConfig,
    format: UnitFormat,
    out: W,
    pending: BTreeMap<PathBuf, FolderRecord>,
    totals: RunningTotals,
    root_unreadable: bool,
    progress: Progress,
    clock: Box<dyn FnMut() -> Instant>,
}

impl Reporter<StandardStream> {
    /// Reporter on stdout, coloured when the config asks for it.
    pub fn stdout(config: ReportConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self::new(config, StandardStream::stdout(choice))
    }
}

impl Reporter<NoColor<Vec<u8>>> {
    /// Reporter that renders into memory, without colour.
    pub fn buffered(config: ReportConfig) -> Self {
        Self::new(config, NoColor::new(Vec::new()))
    }

    /// Text written so far.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.out.get_ref()).to_string()
    }
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(config: ReportConfig, out: W) -> Self {
        Self {
            format: config.unit.format(),
            config,
            out,
            pending: BTreeMap::new(),
            totals: RunningTotals::default(),
            root_unreadable: false,
            progress: Progress::new(),
            clock: Box::new(Instant::now),
        }
    }

    /// Replace the time source the spinner is driven by.
    pub fn with_clock(mut self, clock: impl FnMut() -> Instant + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Flush the last branch and print the summary block.
    ///
    /// `free_space` is the volume's free byte count, or `None` to omit the
    /// free line.
    pub fn finish(&mut self, free_space: Option<u64>) -> io::Result<()> {
        self.flush_pending()?;

        // Nothing under an unlistable root is known, not even that it is empty.
        let (own, total) = if self.root_unreadable {
            (FolderSize::Unreadable, FolderSize::Unreadable)
        } else {
            (
                FolderSize::Known(self.totals.top_level_folder_size),
                FolderSize::Known(self.totals.grand_total_size),
            )
        };

        if let Some(size) = self.format.nice_size(own, self.config.hide_zero) {
            self.line_start()?;
            self.write_size(own, &size)?;
            writeln!(self.out, "  .")?;
        }

        writeln!(self.out, "{}", "-".repeat(self.format.width))?;

        let total_text = match total {
            FolderSize::Known(bytes) => self.format.bytes(bytes),
            FolderSize::Unreadable => format!("{:>width$}", "?", width = self.format.width),
        };
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        if total.is_unreadable() {
            spec.set_fg(Some(Color::Red));
        }
        self.out.set_color(&spec)?;
        write!(self.out, "{}", total_text)?;
        self.out.reset()?;
        writeln!(self.out)?;

        if let Some(free) = free_space {
            writeln!(self.out, "{} free", self.format.bytes(free))?;
        }
        self.out.flush()
    }

    /// Print buffered folders in path order and empty the buffer.
    fn flush_pending(&mut self) -> io::Result<()> {
        let blank = self.progress.clear_line();
        if !blank.is_empty() {
            write!(self.out, "{}", blank)?;
        }

        let pending = std::mem::take(&mut self.pending);
        for record in pending.values() {
            let Some(size) = self.format.nice_size(record.size, self.config.hide_zero) else {
                continue;
            };
            self.line_start()?;
            self.write_size(record.size, &size)?;
            write!(self.out, "  {}", "  ".repeat(record.level))?;
            self.write_name(record)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// Lines that may land on a spinner line start with a carriage return.
    fn line_start(&mut self) -> io::Result<()> {
        if self.config.show_progress {
            write!(self.out, "\r")?;
        }
        Ok(())
    }

    fn write_size(&mut self, size: FolderSize, text: &str) -> io::Result<()> {
        if size.is_unreadable() {
            self.out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(self.out, "{}", text)?;
            self.out.reset()
        } else {
            write!(self.out, "{}", text)
        }
    }

    fn write_name(&mut self, record: &FolderRecord) -> io::Result<()> {
        if record.is_link {
            self.out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(self.out, "{}", record.display_name())?;
            self.out.reset()
        } else {
            write!(self.out, "{}", record.name)
        }
    }

    fn tick(&mut self) -> io::Result<()> {
        if !self.config.show_progress {
            return Ok(());
        }
        let now = (self.clock)();
        if let Some(line) = self.progress.tick(now) {
            write!(self.out, "{}", line)?;
            self.out.flush()?;
        }
        Ok(())
    }
}

impl<W: WriteColor> ScanSink for Reporter<W> {
    fn note_current_folder(&mut self, name: &str, is_link: bool) -> io::Result<()> {
        self.progress.set_label(name, is_link);
        Ok(())
    }

    fn record_folder(&mut self, record: FolderRecord) -> io::Result<()> {
        let closes_branch = record.level == 0;
        if self.config.depth.lists(record.level) {
            self.pending.insert(record.relative_path.clone(), record);
        }
        if closes_branch {
            self.flush_pending()?;
            self.progress.reset();
        }
        Ok(())
    }

    fn record_file(&mut self, size: u64, level: usize) -> io::Result<()> {
        self.totals.grand_total_size += size;
        if level == 0 {
            self.totals.top_level_folder_size += size;
        }
        self.tick()
    }

    fn record_unreadable_root(&mut self) -> io::Result<()> {
        self.root_unreadable = true;
        Ok(())
    }
}
