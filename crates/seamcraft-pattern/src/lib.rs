#![warn(missing_docs)]

//! Panel and pattern-piece types exchanged across the seamcraft pipeline.
//!
//! Segmentation produces [`Panel`]s, flattening turns them into
//! [`FlattenedPanel`]s, and the validator and the export renderer consume
//! those. Every type here is plain data with serde support. Wrap payloads
//! in [`Versioned`] when they leave the process.

pub mod error;
pub mod flattened;
pub mod panel;
pub mod point;
pub mod polygon;
pub mod versioned;

pub use error::{PatternError, Result};
pub use flattened::{EdgeType, FlattenedPanel, PatternEdge};
pub use panel::{Color, Panel, PanelId};
pub use point::Point2D;
pub use polygon::{segment_intersection, segments_cross, Polygon};
pub use versioned::{Versioned, SCHEMA_VERSION};
