#![forbid(unsafe_code)]
//! Printable PDF report for a single workshop order record.
//!
//! [`render_record`] lays out a fixed section twice on one Letter page and
//! writes the document into any [`std::io::Write`] sink, so callers can stream
//! bytes out while the document is still being serialized.

mod encoding;
mod error;
pub mod layout;
mod metrics;
mod render;
mod watermark;

pub use encoding::to_win_ansi;
pub use error::{RenderError, RenderErrorCode};
pub use metrics::text_width;
pub use render::render_record;
pub use watermark::Watermark;

pub const CRATE_NAME: &str = "taller-report";
pub const CONTENT_TYPE: &str = "application/pdf";
