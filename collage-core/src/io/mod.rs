//! # Saving
//!
//! A canvas is saved as a flat PNG snapshot with no companion metadata, so nothing about the
//! objects themselves survives a save. Picking where to save is the host's job: a cancelled pick
//! reaches here as `None` and results in nothing being rendered or written.

pub mod export;
pub mod render;

pub use export::{encode, export_to_file, EncodeError};
pub use render::{render_canvas, PixelBuffer};

use crate::state::Canvas;

/// Saves always produce this file type.
pub const EXTENSION: &str = "png";

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to encode collage: {0}")]
    Encode(#[from] EncodeError),
    #[error("failed to write collage: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(std::path::PathBuf),
    /// No target was picked. Not an error.
    Cancelled,
}

/// Render, encode, and write `canvas` to `target`.
/// # Errors
/// Encoding and IO errors are forwarded. Neither leaves the canvas changed.
pub fn save(
    canvas: &Canvas,
    target: Option<&std::path::Path>,
) -> Result<SaveOutcome, ExportError> {
    let Some(target) = target else {
        log::debug!("Save cancelled");
        return Ok(SaveOutcome::Cancelled);
    };

    let buffer = render_canvas(canvas);
    let bytes = export_to_file(&buffer)?;
    std::fs::write(target, bytes)?;
    log::info!(
        "Saved {}x{} collage to {target:?}",
        buffer.width,
        buffer.height
    );

    Ok(SaveOutcome::Saved(target.to_owned()))
}

/// Default name offered when saving, e.g. `2024-03-09_03-04-05-Collage.png`.
/// Hours are on a 12 hour clock.
#[must_use]
pub fn suggested_file_name(time: chrono::NaiveDateTime) -> String {
    format!("{}-Collage.{EXTENSION}", time.format("%Y-%m-%d_%I-%M-%S"))
}
