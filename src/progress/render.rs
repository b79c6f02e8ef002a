//! Text rendering of a single progress frame.
use crate::error::ProgressError;

/// Number of cells in the progress bar.
pub const BAR_WIDTH: usize = 30;

const MB: u64 = 1_000_000;

/// Renders one frame, terminated by a carriage return so the next frame
/// overwrites it.
///
/// A position past `length` is drawn as a full bar.
///
/// # Errors
///
/// Returns [`ProgressError::ZeroLength`] if `length` is zero.
pub fn render_frame(header: &str, position: u64, length: u64) -> Result<String, ProgressError> {
    if length == 0 {
        return Err(ProgressError::ZeroLength);
    }

    let position = position.min(length);
    let filled = (BAR_WIDTH as u128 * position as u128 / length as u128) as usize;
    let remaining = BAR_WIDTH - filled;
    let percent = 100.0 * position as f64 / length as f64;

    Ok(format!(
        "{} [{}{}] {:.2}% ({} of {}MB) \r",
        header,
        "=".repeat(filled),
        " ".repeat(remaining),
        percent,
        position / MB,
        length / MB
    ))
}
