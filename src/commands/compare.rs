use crate::areas::controller::EditController;
use crate::areas::workspace::Workspace;
use crate::artifacts::source::{ByteSource, LoadRequest};
use colored::Colorize;
use derive_new::new;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Options of the `compare` command, straight from the CLI surface.
#[derive(Debug, Clone, new)]
pub struct CompareOptions {
    pub files: Vec<PathBuf>,
    pub pane_width: usize,
    pub boundaries: Option<String>,
    pub hide: Vec<String>,
    pub json: bool,
}

impl EditController {
    /// Compare a set of files and write the result to `writer`.
    ///
    /// Loads run concurrently; completions are applied one at a time on
    /// this task, so every rebuild observes a complete mutation.
    pub async fn compare(
        &mut self,
        workspace: &Workspace,
        options: &CompareOptions,
        writer: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let requests = options
            .files
            .iter()
            .map(|path| self.add_source(workspace.file_name(path), path.clone()))
            .collect::<Vec<_>>();

        self.fulfill_loads(workspace, requests).await;

        if let Some(payload) = &options.boundaries {
            self.replace_boundaries(payload)?;
        }

        for name in &options.hide {
            let ids = self
                .sources()
                .iter()
                .filter(|source| source.name() == name)
                .map(ByteSource::id)
                .collect::<Vec<_>>();
            if ids.is_empty() {
                log::warn!("no source named {name:?} to hide");
            }
            for id in ids {
                self.set_visibility(id, false);
            }
        }

        if options.json {
            self.render_json(options.pane_width, writer)
        } else {
            self.render_listing(writer)?;
            self.render_grid(options.pane_width, writer)
        }
    }

    /// Fulfill load tickets concurrently, one tokio task per file.
    ///
    /// Completions funnel through a channel back to this task; the
    /// controller itself is never touched from the load tasks. A failed
    /// read is logged and leaves its source pending (and ineligible).
    pub async fn fulfill_loads(&mut self, workspace: &Workspace, requests: Vec<LoadRequest>) {
        let (sender, mut receiver) = mpsc::channel(requests.len().max(1));

        for request in requests {
            let sender = sender.clone();
            let workspace = workspace.clone();
            tokio::spawn(async move {
                let loaded = workspace.read_capped(&request.path, request.cap).await;
                let _ = sender.send((request, loaded)).await;
            });
        }
        drop(sender);

        while let Some((request, loaded)) = receiver.recv().await {
            match loaded {
                Ok((bytes, truncated)) => {
                    self.complete_load(request.id, request.generation, bytes, truncated);
                }
                Err(error) => {
                    log::warn!(
                        "failed to load {:?}; source stays pending: {error:#}",
                        request.path
                    );
                }
            }
        }
    }

    /// One line per source: name, boundary list, state flags.
    pub fn render_listing(&self, writer: &mut dyn Write) -> anyhow::Result<()> {
        for source in self.sources() {
            let offsets = source
                .boundaries()
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(writer, "{} (boundaries at [{offsets}])", source.name())?;

            if !source.is_ready() {
                write!(writer, " {}", "[pending]".yellow())?;
            }
            if !source.is_visible() {
                write!(writer, " {}", "[hidden]".dimmed())?;
            }
            if source.is_truncated() {
                write!(writer, " {}", "[truncated]".yellow())?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    /// Hex grid of the aligned segments, one column per eligible
    /// source, `pane_width` bytes per row, mismatching offsets
    /// highlighted.
    pub fn render_grid(&self, pane_width: usize, writer: &mut dyn Write) -> anyhow::Result<()> {
        let pane_width = pane_width.max(1);
        let eligible = self
            .sources()
            .iter()
            .filter(|source| source.is_eligible())
            .collect::<Vec<_>>();
        if eligible.is_empty() {
            writeln!(writer, "nothing to compare")?;
            return Ok(());
        }

        let report = self.report();
        let lines_per_segment = report.lines_per_segment(pane_width);
        let column_width = pane_width * 3 - 1;

        writeln!(writer)?;
        let header = eligible
            .iter()
            .map(|source| format!("{:<column_width$.column_width$}", source.name()))
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(writer, "{header}")?;

        for (index, &lines) in lines_per_segment.iter().enumerate() {
            let mismatches = &self.diff_sets()[index];
            writeln!(writer, "{}", segment_heading(index, mismatches))?;

            for line in 0..lines {
                let row = eligible
                    .iter()
                    .map(|source| hex_row(source, index, line, pane_width, mismatches))
                    .collect::<Vec<_>>()
                    .join(" | ");
                writeln!(writer, "{row}")?;
            }
        }

        if report.any_truncated() {
            writeln!(
                writer,
                "\nsome sources were truncated at {} bytes; \
                 re-run with a larger --max-length to compare more",
                report.max_length
            )?;
        }

        Ok(())
    }

    /// Machine-readable report for external renderers.
    pub fn render_json(&self, pane_width: usize, writer: &mut dyn Write) -> anyhow::Result<()> {
        let report = self.report();
        let value = serde_json::json!({
            "sources": report.sources,
            "segment_lengths": report.segment_lengths,
            "mismatches": report.mismatches,
            "pane_width": pane_width,
            "lines_per_segment": report.lines_per_segment(pane_width),
            "max_length": report.max_length,
        });

        writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;

        Ok(())
    }
}

fn segment_heading(index: usize, mismatches: &BTreeSet<usize>) -> String {
    if mismatches.is_empty() {
        format!("-- segment {index} --")
    } else {
        let offsets = mismatches
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("-- segment {index}: mismatches at [{offsets}] --")
    }
}

/// One rendered row of one source's segment: `pane_width` byte slots,
/// two hex digits each, blanks past the segment's end.
fn hex_row(
    source: &ByteSource,
    index: usize,
    line: usize,
    pane_width: usize,
    mismatches: &BTreeSet<usize>,
) -> String {
    (0..pane_width)
        .map(|slot| {
            let pos = line * pane_width + slot;
            match source.segment_byte(index, pos) {
                Some(byte) if mismatches.contains(&pos) => {
                    format!("{byte:02x}").red().bold().to_string()
                }
                Some(byte) => format!("{byte:02x}"),
                None => "  ".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
