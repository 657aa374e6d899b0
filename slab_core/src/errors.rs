//! # Error Types
//!
//! Structured error types for slab_core. Each variant carries enough
//! context to understand and fix the problem programmatically - a failed
//! rebar search reports the best area the catalog could reach, a failed
//! placement reports the cell where the overlap happened.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::errors::{SlabError, SlabResult};
//!
//! fn validate_thickness(h_mm: f64) -> SlabResult<()> {
//!     if h_mm <= 0.0 {
//!         return Err(SlabError::invalid_input(
//!             "slab_thickness_mm",
//!             h_mm.to_string(),
//!             "Thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for slab_core operations
pub type SlabResult<T> = Result<T, SlabError>;

/// Structured error type for placement and design operations.
///
/// Failures are caught per panel at the orchestration level, so one
/// panel's error never aborts a batch computation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SlabError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A new panel would overlap an existing panel's cells
    #[error("Slab '{label}' overlaps slab '{other}' at cell ({i}, {j})")]
    OverlappingPlacement {
        label: String,
        other: String,
        i: usize,
        j: usize,
    },

    /// A panel bbox extends outside the placement grid
    #[error("Slab '{label}' extends outside the {nx}x{ny} grid")]
    OutOfGrid { label: String, nx: usize, ny: usize },

    /// A slab id does not refer to a live panel
    #[error("Unknown slab id: {id}")]
    UnknownSlab { id: u32 },

    /// Section geometry is unusable (effective depth <= 0)
    #[error("Section geometry error: {message}")]
    Geometry { message: String },

    /// No rebar catalog combination meets the area requirement under the
    /// spacing cap. Carries the best achievable area for diagnosis.
    #[error(
        "No rebar choice reaches As = {required_mm2:.1} mm2/m under \
         s_max = {spacing_cap_mm} mm (best achievable {best_mm2:.1} mm2/m)"
    )]
    CatalogExhausted {
        required_mm2: f64,
        spacing_cap_mm: u32,
        best_mm2: f64,
    },

    /// A panel computation failed for a non-geometric reason
    #[error("Calculation failed for slab '{label}': {reason}")]
    CalculationFailed { label: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SlabError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SlabError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Geometry error
    pub fn geometry(message: impl Into<String>) -> Self {
        SlabError::Geometry {
            message: message.into(),
        }
    }

    /// Create a CatalogExhausted error
    pub fn catalog_exhausted(required_mm2: f64, spacing_cap_mm: u32, best_mm2: f64) -> Self {
        SlabError::CatalogExhausted {
            required_mm2,
            spacing_cap_mm,
            best_mm2,
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(label: impl Into<String>, reason: impl Into<String>) -> Self {
        SlabError::CalculationFailed {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        SlabError::Internal {
            message: message.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SlabError::InvalidInput { .. } => "INVALID_INPUT",
            SlabError::OverlappingPlacement { .. } => "OVERLAPPING_PLACEMENT",
            SlabError::OutOfGrid { .. } => "OUT_OF_GRID",
            SlabError::UnknownSlab { .. } => "UNKNOWN_SLAB",
            SlabError::Geometry { .. } => "GEOMETRY",
            SlabError::CatalogExhausted { .. } => "CATALOG_EXHAUSTED",
            SlabError::CalculationFailed { .. } => "CALCULATION_FAILED",
            SlabError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SlabError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
