//! One snapshot of scene output handed to the presentation layer.

use crate::contour::ContourLine;
use crate::streamline::Streamline;
use crate::vector::GridVector;
use serde::{Deserialize, Serialize};

/// Geometry produced by a scene at one instant.
///
/// Serialized as `{ "type": "contours", "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Frame {
    Contours(Vec<ContourLine>),
    Vectors(Vec<GridVector>),
    Streamlines(Vec<Streamline>),
}

impl Frame {
    /// Number of lines or samples in the frame.
    pub fn len(&self) -> usize {
        match self {
            Frame::Contours(lines) => lines.len(),
            Frame::Vectors(samples) => samples.len(),
            Frame::Streamlines(lines) => lines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Contours(_) => "contours",
            Frame::Vectors(_) => "vectors",
            Frame::Streamlines(_) => "streamlines",
        }
    }
}
