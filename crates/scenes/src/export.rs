//! Frame export as pretty-printed JSON.
//!
//! The presentation layer draws frames itself; this is the file form the
//! CLI writes and the browser studio can load back.

use field_studio_core::error::FieldError;
use field_studio_core::frame::Frame;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes `frame` to `path` as pretty JSON.
///
/// Returns `FieldError::Io` on serialization or write failure.
pub fn write_frame_json(frame: &Frame, path: &Path) -> Result<(), FieldError> {
    let text = serde_json::to_string_pretty(frame).map_err(|e| FieldError::Io(e.to_string()))?;
    fs::write(path, text).map_err(|e| FieldError::Io(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), kind = frame.kind(), items = frame.len(), "frame written");
    Ok(())
}

/// Reads a frame previously written by [`write_frame_json`].
pub fn read_frame_json(path: &Path) -> Result<Frame, FieldError> {
    let text =
        fs::read_to_string(path).map_err(|e| FieldError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| FieldError::Io(e.to_string()))
}
