//! # Materials
//!
//! Concrete and reinforcing steel grades plus the K-ks design chart used
//! to size slab reinforcement from a bending moment.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::materials::{ConcreteGrade, SteelGrade, design_chart};
//!
//! let as_req = design_chart::steel_area_for_moment(
//!     11.25,
//!     ConcreteGrade::C25_30,
//!     SteelGrade::B420C,
//!     120.0,
//!     25.0,
//!     None,
//! )
//! .unwrap();
//! assert!(as_req > 0.0);
//! ```

pub mod design_chart;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use design_chart::{interp_ks, steel_area_for_moment};

/// Concrete strength class (characteristic cylinder/cube strength)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConcreteGrade {
    #[serde(rename = "C20/25")]
    C20_25,
    #[default]
    #[serde(rename = "C25/30")]
    C25_30,
    #[serde(rename = "C30/37")]
    C30_37,
    #[serde(rename = "C35/45")]
    C35_45,
    #[serde(rename = "C40/50")]
    C40_50,
}

impl ConcreteGrade {
    /// All grades for UI selection
    pub const ALL: [ConcreteGrade; 5] = [
        ConcreteGrade::C20_25,
        ConcreteGrade::C25_30,
        ConcreteGrade::C30_37,
        ConcreteGrade::C35_45,
        ConcreteGrade::C40_50,
    ];

    /// Characteristic compressive strength fck (MPa)
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::C20_25 => 20.0,
            ConcreteGrade::C25_30 => 25.0,
            ConcreteGrade::C30_37 => 30.0,
            ConcreteGrade::C35_45 => 35.0,
            ConcreteGrade::C40_50 => 40.0,
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteGrade::C20_25 => "C20/25",
            ConcreteGrade::C25_30 => "C25/30",
            ConcreteGrade::C30_37 => "C30/37",
            ConcreteGrade::C35_45 => "C35/45",
            ConcreteGrade::C40_50 => "C40/50",
        }
    }

    /// Column of the K-ks chart this grade reads from.
    ///
    /// C20/25 has no column of its own and reads the C25 column, as the
    /// source chart does.
    pub(crate) fn chart_column(&self) -> usize {
        match self {
            ConcreteGrade::C20_25 | ConcreteGrade::C25_30 => design_chart::COL_C25,
            ConcreteGrade::C30_37 => design_chart::COL_C30,
            ConcreteGrade::C35_45 => design_chart::COL_C35,
            ConcreteGrade::C40_50 => design_chart::COL_C40,
        }
    }
}

impl fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Reinforcing steel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SteelGrade {
    #[default]
    B420C,
    B500C,
}

impl SteelGrade {
    /// All grades for UI selection
    pub const ALL: [SteelGrade; 2] = [SteelGrade::B420C, SteelGrade::B500C];

    /// Characteristic yield strength fyk (MPa)
    pub fn fyk_mpa(&self) -> f64 {
        match self {
            SteelGrade::B420C => 420.0,
            SteelGrade::B500C => 500.0,
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SteelGrade::B420C => "B420C",
            SteelGrade::B500C => "B500C",
        }
    }

    /// Minimum one-way reinforcement ratio per TS500 (ribbed bars)
    pub fn rho_min(&self) -> f64 {
        match self {
            SteelGrade::B420C | SteelGrade::B500C => 0.002,
        }
    }

    pub(crate) fn chart_column(&self) -> usize {
        match self {
            SteelGrade::B420C => design_chart::COL_S420,
            SteelGrade::B500C => design_chart::COL_B500,
        }
    }
}

impl fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_strengths() {
        assert_eq!(ConcreteGrade::C25_30.fck_mpa(), 25.0);
        assert_eq!(ConcreteGrade::C40_50.fck_mpa(), 40.0);
        assert_eq!(SteelGrade::B420C.fyk_mpa(), 420.0);
        assert_eq!(SteelGrade::B500C.fyk_mpa(), 500.0);
    }

    #[test]
    fn test_c20_reads_c25_column() {
        assert_eq!(
            ConcreteGrade::C20_25.chart_column(),
            ConcreteGrade::C25_30.chart_column()
        );
    }

    #[test]
    fn test_grade_serialization_uses_display_names() {
        let json = serde_json::to_string(&ConcreteGrade::C25_30).unwrap();
        assert_eq!(json, "\"C25/30\"");
        let grade: ConcreteGrade = serde_json::from_str("\"C30/37\"").unwrap();
        assert_eq!(grade, ConcreteGrade::C30_37);
    }
}
