//! # Project Container
//!
//! The root serializable document exchanged with external editors and
//! renderers: project metadata, the global design options, and the
//! placement grid. Everything round-trips through JSON.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::project::FloorProject;
//!
//! let project = FloorProject::new("Jane Engineer", "25-042", 64, 48);
//! let json = project.to_json_pretty().unwrap();
//! let restored = FloorProject::from_json(&json).unwrap();
//! assert_eq!(restored.meta.job_number, "25-042");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::DesignOptions;
use crate::errors::{SlabError, SlabResult};
use crate::grid::SlabSystem;

/// Current schema version for serialized projects
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Project identity and bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Unique project id
    pub id: Uuid,
    /// Schema version the document was written with
    pub schema_version: String,
    /// Responsible engineer
    pub engineer: String,
    /// Job number
    pub job_number: String,
    /// Creation timestamp (UTC)
    pub created: DateTime<Utc>,
    /// Last modification timestamp (UTC)
    pub modified: DateTime<Utc>,
}

impl ProjectMetadata {
    /// Create metadata with fresh id and timestamps
    pub fn new(engineer: impl Into<String>, job_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            schema_version: SCHEMA_VERSION.to_string(),
            engineer: engineer.into(),
            job_number: job_number.into(),
            created: now,
            modified: now,
        }
    }
}

/// Root document: metadata, design options, and the placement grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorProject {
    /// Project metadata
    pub meta: ProjectMetadata,
    /// Global design parameters
    pub options: DesignOptions,
    /// The placement grid with all panels and beams
    pub system: SlabSystem,
}

impl FloorProject {
    /// Create an empty project over an `nx` x `ny` grid
    pub fn new(
        engineer: impl Into<String>,
        job_number: impl Into<String>,
        nx: usize,
        ny: usize,
    ) -> Self {
        Self {
            meta: ProjectMetadata::new(engineer, job_number),
            options: DesignOptions::default(),
            system: SlabSystem::new(nx, ny),
        }
    }

    /// Stamp the modification time; call after any grid or option edit
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> SlabResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlabError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> SlabResult<Self> {
        serde_json::from_str(json).map_err(|e| SlabError::SerializationError {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Slab, SlabKind};

    #[test]
    fn test_project_roundtrip() {
        let mut project = FloorProject::new("Jane Engineer", "25-042", 32, 32);
        project
            .system
            .add_slab(Slab::new("D1", SlabKind::TwoWay, (0, 0), (15, 15)))
            .unwrap();
        project.touch();

        let json = project.to_json_pretty().unwrap();
        let restored = FloorProject::from_json(&json).unwrap();
        assert_eq!(restored.meta.id, project.meta.id);
        assert_eq!(restored.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(restored.system.len(), 1);
        assert_eq!(restored.options, project.options);
    }

    #[test]
    fn test_touch_advances_modified() {
        let mut project = FloorProject::new("Jane Engineer", "25-042", 8, 8);
        let created = project.meta.created;
        project.touch();
        assert!(project.meta.modified >= created);
    }

    #[test]
    fn test_from_json_error_is_structured() {
        let err = FloorProject::from_json("not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
