pub mod commands;
pub mod presenter;
pub mod ui;

pub use presenter::{DownloadArtifact, RenderSink, ResponsePresenter, TerminalSink, download_filename};
pub use ui::Output;
