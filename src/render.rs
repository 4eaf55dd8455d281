//! Status table rendering: row formatting and the in-place screen painter.

use std::io::{self, Write};

use crate::history::Sample;
use crate::monitor::HostSnapshot;
use crate::stats::{summarize, Summary};

const GLYPH_OK: char = '█';
const GLYPH_FAIL: char = '·';

const NAME_WIDTH: usize = 24;
const FIELD_WIDTH: usize = 8;

/// Per-sample outcome strip, oldest to newest.
pub fn glyphs(samples: &[Sample]) -> String {
    samples
        .iter()
        .map(|s| if s.is_success() { GLYPH_OK } else { GLYPH_FAIL })
        .collect()
}

fn field(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>width$.1}", v, width = FIELD_WIDTH),
        None => format!("{:>width$}", "-", width = FIELD_WIDTH),
    }
}

pub fn header() -> String {
    format!(
        "{:<nw$} {:>fw$} {:>fw$} {:>fw$} {:>fw$}  history",
        "host",
        "min",
        "mean",
        "max",
        "stddev",
        nw = NAME_WIDTH,
        fw = FIELD_WIDTH,
    )
}

/// One host's status line: identity, then either the terminal error or the
/// four statistics plus the history strip.
pub fn format_row(name: &str, snapshot: &HostSnapshot) -> String {
    match &snapshot.terminal {
        Some(err) => format!("{:<nw$} ERROR: {}", name, err, nw = NAME_WIDTH),
        None => {
            let Summary {
                min,
                mean,
                max,
                stddev,
            } = summarize(&snapshot.samples);
            format!(
                "{:<nw$} {} {} {} {}  {}",
                name,
                field(min),
                field(mean),
                field(max),
                field(stddev),
                glyphs(&snapshot.samples),
                nw = NAME_WIDTH,
            )
        }
    }
}

/// In-place frame painter: rewinds over the previous frame and overwrites
/// it, clearing each line before redrawing.
pub struct Screen {
    lines_drawn: usize,
}

impl Screen {
    pub fn new() -> Self {
        Self { lines_drawn: 0 }
    }

    pub fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.lines_drawn > 0 {
            write!(out, "\x1b[{}A", self.lines_drawn)?;
        }
        for line in lines {
            writeln!(out, "\x1b[2K{}", line)?;
        }
        out.flush()?;
        self.lines_drawn = lines.len();
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}
