//! Response Presenter
//!
//! Renders the accumulated briefing after every fragment with a transient
//! in-progress marker, renders the final text without it, and packages the
//! result as a markdown download. The text is shown verbatim.

use chrono::NaiveDate;
use console::Term;
use futures::{Stream, StreamExt, pin_mut};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ai::client::FragmentObserver;
use crate::constants::output::{FILENAME_PREFIX, IN_PROGRESS_MARKER, MIME_TYPE, SPACE_SEPARATOR};
use crate::types::Result;

// =============================================================================
// Render Sink
// =============================================================================

/// Display surface for the briefing
pub trait RenderSink {
    /// Show the accumulated text followed by the in-progress marker
    fn render_partial(&mut self, text: &str, marker: &str) -> io::Result<()>;

    /// Show the final text; the marker must be gone afterwards
    fn render_final(&mut self, text: &str) -> io::Result<()>;
}

/// Writes to stdout, appending only what changed since the last render
pub struct TerminalSink {
    term: Term,
    written: usize,
    marker_width: usize,
}

impl TerminalSink {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
            written: 0,
            marker_width: 0,
        }
    }

    fn erase_marker(&mut self) -> io::Result<()> {
        if self.marker_width > 0 {
            let back = "\u{8}".repeat(self.marker_width);
            self.term
                .write_str(&format!("{back}{}{back}", " ".repeat(self.marker_width)))?;
            self.marker_width = 0;
        }
        Ok(())
    }

    fn write_delta(&mut self, text: &str) -> io::Result<()> {
        // the accumulated text only grows; anything else is redrawn from scratch
        let delta = match text.get(self.written..) {
            Some(delta) => delta,
            None => {
                self.term.write_line("")?;
                text
            }
        };
        self.term.write_str(delta)?;
        self.written = text.len();
        Ok(())
    }
}

impl RenderSink for TerminalSink {
    fn render_partial(&mut self, text: &str, marker: &str) -> io::Result<()> {
        self.erase_marker()?;
        self.write_delta(text)?;
        if self.term.is_term() {
            self.term.write_str(marker)?;
            self.marker_width = console::measure_text_width(marker);
        }
        self.term.flush()
    }

    fn render_final(&mut self, text: &str) -> io::Result<()> {
        self.erase_marker()?;
        self.write_delta(text)?;
        if !text.ends_with('\n') {
            self.term.write_line("")?;
        }
        self.term.flush()
    }
}

// =============================================================================
// Presenter
// =============================================================================

/// Accumulates fragments and drives a [`RenderSink`]
pub struct ResponsePresenter<S: RenderSink> {
    sink: S,
    buffer: String,
}

impl<S: RenderSink> ResponsePresenter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buffer: String::new(),
        }
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Append one fragment and re-render with the marker
    pub fn push(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
        if let Err(e) = self.sink.render_partial(&self.buffer, IN_PROGRESS_MARKER) {
            warn!("Failed to render partial response: {}", e);
        }
    }

    /// Final render without the marker
    pub fn finish(&mut self) {
        if let Err(e) = self.sink.render_final(&self.buffer) {
            warn!("Failed to render response: {}", e);
        }
    }

    /// Consume a fragment sequence and return the final text
    pub async fn present<St>(&mut self, fragments: St) -> String
    where
        St: Stream<Item = String>,
    {
        pin_mut!(fragments);
        while let Some(fragment) = fragments.next().await {
            self.push(&fragment);
        }
        self.finish();
        self.buffer.clone()
    }
}

impl<S: RenderSink> FragmentObserver for ResponsePresenter<S> {
    fn on_fragment(&mut self, fragment: &str) {
        self.push(fragment);
    }

    fn on_complete(&mut self, full_text: &str) {
        if self.buffer != full_text {
            self.buffer = full_text.to_string();
        }
        self.finish();
    }

    fn on_failed(&mut self) {
        // keep whatever arrived, drop the marker
        if !self.buffer.is_empty() {
            self.finish();
        }
    }
}

// =============================================================================
// Download Artifact
// =============================================================================

/// `Trip_Plan_<destination>_<YYYY-MM-DD>.md`, spaces replaced by `_`
pub fn download_filename(destination: &str, date: NaiveDate) -> String {
    let destination: String = destination
        .trim()
        .chars()
        .map(|c| {
            if c == ' ' || c == '/' || c == '\\' {
                SPACE_SEPARATOR
            } else {
                c
            }
        })
        .collect();

    format!(
        "{}_{}_{}.md",
        FILENAME_PREFIX,
        destination,
        date.format("%Y-%m-%d")
    )
}

/// Offline copy of the final briefing
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl DownloadArtifact {
    /// Package the final text exactly as received
    pub fn offer(final_text: &str, suggested_filename: impl Into<String>) -> Self {
        Self {
            filename: suggested_filename.into(),
            mime_type: MIME_TYPE,
            content: final_text.to_string(),
        }
    }

    /// Write the artifact into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)?;
        info!("Saved briefing to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::stream;
    use tempfile::TempDir;

    /// Captures every render for assertions
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub partials: Vec<String>,
        pub finals: Vec<String>,
    }

    impl RenderSink for RecordingSink {
        fn render_partial(&mut self, text: &str, marker: &str) -> io::Result<()> {
            self.partials.push(format!("{text}{marker}"));
            Ok(())
        }

        fn render_final(&mut self, text: &str) -> io::Result<()> {
            self.finals.push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_present_rerenders_with_marker_then_removes_it() {
        let mut presenter = ResponsePresenter::new(RecordingSink::default());
        let fragments = stream::iter(vec!["# Day 1".to_string(), "\nFuel".to_string()]);

        let final_text = presenter.present(fragments).await;
        assert_eq!(final_text, "# Day 1\nFuel");

        let sink = presenter.into_sink();
        assert_eq!(sink.partials, vec!["# Day 1▌", "# Day 1\nFuel▌"]);
        assert_eq!(sink.finals, vec!["# Day 1\nFuel"]);
        assert!(!sink.finals[0].contains(IN_PROGRESS_MARKER));
    }

    #[tokio::test]
    async fn test_present_empty_stream() {
        let mut presenter = ResponsePresenter::new(RecordingSink::default());
        let final_text = presenter.present(stream::empty::<String>()).await;
        assert_eq!(final_text, "");
        assert_eq!(presenter.into_sink().finals, vec![""]);
    }

    #[test]
    fn test_observer_failure_keeps_partial_text_without_marker() {
        let mut presenter = ResponsePresenter::new(RecordingSink::default());
        presenter.on_fragment("Day 1");
        presenter.on_failed();

        let sink = presenter.into_sink();
        assert_eq!(sink.finals, vec!["Day 1"]);
    }

    #[test]
    fn test_download_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert_eq!(
            download_filename("Moab UT", date),
            "Trip_Plan_Moab_UT_2026-02-15.md"
        );
        assert_eq!(
            download_filename(" Zion/Springdale ", date),
            "Trip_Plan_Zion_Springdale_2026-02-15.md"
        );
    }

    #[test]
    fn test_artifact_saves_exact_text() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("briefings");
        let artifact = DownloadArtifact::offer("# Briefing\n", "Trip_Plan_Moab_UT_2026-02-15.md");
        assert_eq!(artifact.mime_type, "text/markdown");

        let path = artifact.save(&dir).unwrap();
        assert_eq!(path, dir.join("Trip_Plan_Moab_UT_2026-02-15.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "# Briefing\n");
    }
}
