#![warn(missing_docs)]

//! Manufacturability checks for flattened sewing patterns.
//!
//! Validation never fails: it always returns a structured result listing
//! issues (which can make a piece invalid) and warnings (which cannot).
//! A result is valid when no issue is `Critical` or `Major`.
//!
//! # Example
//!
//! ```
//! use seamcraft_pattern::{Color, FlattenedPanel, Point2D};
//! use seamcraft_validate::{validate_panel, IssueKind};
//!
//! let sliver = FlattenedPanel::from_outline(
//!     vec![Point2D::new(0.0, 0.0), Point2D::new(50.0, 0.0), Point2D::new(100.0, 0.0)],
//!     Color::default(),
//!     1000.0,
//! );
//! let result = validate_panel(&sliver);
//! assert!(!result.is_valid);
//! assert_eq!(result.issues[0].kind, IssueKind::CollinearPoints);
//! ```

mod checks;
pub mod error;
mod fabric;
pub mod issues;
pub mod result;
pub mod settings;
mod validator;

pub use error::{Result, ValidateError};
pub use issues::{IssueKind, Severity, ValidationIssue, ValidationWarning, WarningKind};
pub use result::{
    FabricCompatibility, FabricUtilizationResult, PatternSetValidationResult,
    PatternValidationResult,
};
pub use settings::{ValidationSettings, STANDARD_FABRIC_WIDTHS_MM};
pub use validator::{
    check_fabric_compatibility, validate_fabric_utilization, validate_panel, validate_panel_set,
    PatternValidator,
};
