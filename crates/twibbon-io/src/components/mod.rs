//! Dioxus UI components for twibbon.
//!
//! Provides the photo upload zone, the interactive editor canvas with
//! frame overlay, the zoom slider, and the export panel.

mod editor;
mod export;
mod upload;
mod zoom;

pub use editor::EditorView;
pub use export::ExportPanel;
pub use upload::FileUpload;
pub use zoom::ZoomSlider;
