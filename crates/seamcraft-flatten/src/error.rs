//! Error types for flattening.

use seamcraft_mesh::MeshError;
use seamcraft_pattern::PanelId;
use thiserror::Error;

/// Errors that can occur while flattening panels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlattenError {
    /// The parent mesh breaks the mesh invariant.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The panel does not describe usable geometry in the parent mesh.
    #[error("panel {panel}: {reason}")]
    InvalidPanel {
        /// Offending panel.
        panel: PanelId,
        /// What is wrong with it.
        reason: String,
    },

    /// The panel has zero-area or collinear geometry.
    #[error("panel {panel} is degenerate: {reason}")]
    Degenerate {
        /// Offending panel.
        panel: PanelId,
        /// What is degenerate.
        reason: String,
    },

    /// A NaN or infinity appeared during the solve.
    #[error("panel {panel}: non-finite value during {stage}")]
    NonFinite {
        /// Offending panel.
        panel: PanelId,
        /// Pipeline stage that produced it.
        stage: &'static str,
    },

    /// The panel is a closed surface and cannot be laid flat without a cut.
    #[error("panel {panel} has no boundary")]
    NoBoundary {
        /// Offending panel.
        panel: PanelId,
    },

    /// The flattened outline crosses itself.
    #[error("flattened outline of panel {panel} self-intersects")]
    SelfIntersecting {
        /// Offending panel.
        panel: PanelId,
    },

    /// Invalid flattening or layout settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The caller cancelled the operation.
    #[error("flattening cancelled")]
    Cancelled,
}

/// Result type for flattening operations.
pub type Result<T> = std::result::Result<T, FlattenError>;
