//! twibbon-io: Browser I/O and Dioxus component library.
//!
//! Fetches the frame asset, reads uploaded files, turns bytes into
//! Blob URLs for preview, triggers PNG downloads, and provides the
//! editor, zoom slider, upload, and export components for the twibbon
//! web application.

pub mod components;
pub mod download;
pub mod loader;
pub mod raster;

pub use components::{EditorView, ExportPanel, FileUpload, ZoomSlider};
