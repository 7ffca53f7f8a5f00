//! Human-facing per-run report written to any `io::Write`.

use modelfix_render::{render_result_line, render_summary_line};
use modelfix_types::apply::{ExtractionStatus, ModelfixApply};
use std::io::{self, Write};

pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// One line per record, then the counts.
    pub fn report(&mut self, apply: &ModelfixApply) -> io::Result<()> {
        match apply.extraction.status {
            ExtractionStatus::NoFixNeeded => {
                writeln!(self.out, "No fix needed.")?;
                return Ok(());
            }
            ExtractionStatus::Empty => {
                writeln!(self.out, "⚠️  No fix blocks found in the reply.")?;
                return Ok(());
            }
            ExtractionStatus::Found => {}
        }

        if apply.dry_run {
            writeln!(self.out, "Dry run: no files were written.")?;
        }
        for result in &apply.results {
            writeln!(self.out, "{}", render_result_line(result))?;
        }
        writeln!(self.out, "{}", render_summary_line(&apply.summary))?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
