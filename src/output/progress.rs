//! Live spinner for slow top-level folders
//!
//! The spinner shares its terminal line with the report. It is drawn with a
//! leading carriage return and no newline, and must be blanked out before the
//! next report line is written over it.

use std::time::{Duration, Instant};

/// How long a top-level folder must take before the spinner appears.
pub const SLOW_SCAN: Duration = Duration::from_millis(2000);

/// Minimum time between two redraws.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(500);

const GLYPHS: [char; 4] = ['-', '\\', '|', '/'];

/// Labels longer than this are cut so the spinner stays on one line.
const MAX_LABEL_CHARS: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No file seen yet in this branch.
    Quiet,
    /// First file seen; waiting to find out whether the scan is slow.
    Warming { since: Instant },
    /// Spinner visible.
    Animating { last_draw: Instant },
}

/// Spinner state for the branch currently being scanned.
#[derive(Debug, Clone)]
pub struct Progress {
    phase: Phase,
    glyph: usize,
    label: String,
    is_link: bool,
    drawn_width: usize,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            phase: Phase::Quiet,
            glyph: 0,
            label: String::new(),
            is_link: false,
            drawn_width: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_label(&mut self, name: &str, is_link: bool) {
        self.label = name.chars().take(MAX_LABEL_CHARS).collect();
        self.is_link = is_link;
    }

    /// Back to `Quiet` with no label, ready for the next top-level branch.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance on a file tick. Returns the spinner line to draw, if any.
    ///
    /// The returned text starts with `\r` and has no trailing newline.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        match self.phase {
            Phase::Quiet => {
                self.phase = Phase::Warming { since: now };
                None
            }
            Phase::Warming { since } if now.duration_since(since) >= SLOW_SCAN => Some(self.draw(now)),
            Phase::Warming { .. } => None,
            Phase::Animating { last_draw } if now.duration_since(last_draw) >= REDRAW_INTERVAL => {
                Some(self.draw(now))
            }
            Phase::Animating { .. } => None,
        }
    }

    /// Text that blanks out a drawn spinner, leaving the cursor at column 0.
    ///
    /// Empty when nothing has been drawn.
    pub fn clear_line(&mut self) -> String {
        if self.drawn_width == 0 {
            return String::new();
        }
        let blank = format!("\r{}\r", " ".repeat(self.drawn_width));
        self.drawn_width = 0;
        blank
    }

    fn draw(&mut self, now: Instant) -> String {
        let glyph = GLYPHS[self.glyph];
        self.glyph = (self.glyph + 1) % GLYPHS.len();
        self.phase = Phase::Animating { last_draw: now };

        let text = if self.is_link {
            format!("{} [{}]", glyph, self.label)
        } else {
            format!("{} {}", glyph, self.label)
        };
        // A shorter redraw must still cover the previous one.
        let width = text.chars().count();
        let pad = self.drawn_width.saturating_sub(width);
        self.drawn_width = self.drawn_width.max(width);
        format!("\r{}{}", text, " ".repeat(pad))
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
