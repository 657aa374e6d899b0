//! # Rebar Catalog & Selection
//!
//! The constructible bar catalog (discrete diameters x 5 mm spacing
//! steps) and the brute-force search for the cheapest choice meeting an
//! area requirement. The catalog is ~15 x 51 combinations; the search is
//! plain enumeration.

use std::f64::consts::PI;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{SlabError, SlabResult};

/// Available bar diameters (mm)
pub const PHI_CATALOG_MM: [u32; 15] = [6, 7, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32];

/// Available bar spacings (mm), 50 to 300 in 5 mm steps
pub static SPACING_CATALOG_MM: Lazy<Vec<u32>> =
    Lazy::new(|| (50..=300).step_by(5).collect());

/// Default minimum diameter for main reinforcement (mm)
pub const DEFAULT_PHI_MIN_MM: u32 = 8;

/// Largest diameter in the catalog (mm)
pub const PHI_MAX_MM: u32 = 32;

/// Steel area per metre of strip for bars of diameter `phi_mm` at
/// spacing `s_mm` (mm2/m)
pub fn area_per_m(phi_mm: u32, s_mm: u32) -> f64 {
    let bar = PI * (phi_mm as f64).powi(2) / 4.0;
    bar * (1000.0 / s_mm as f64)
}

/// A concrete bar choice: diameter, spacing, and the resulting area.
///
/// Derived and immutable; ordering for selection is minimal area first,
/// then larger spacing on an area tie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarChoice {
    /// Bar diameter (mm)
    pub phi_mm: u32,
    /// Bar spacing (mm)
    pub s_mm: u32,
    /// Provided steel area (mm2/m)
    pub area_mm2_per_m: f64,
}

impl RebarChoice {
    /// Build a choice, deriving its area
    pub fn new(phi_mm: u32, s_mm: u32) -> Self {
        Self {
            phi_mm,
            s_mm,
            area_mm2_per_m: area_per_m(phi_mm, s_mm),
        }
    }

    /// Drawing label, e.g. "Ø10/150"
    pub fn label(&self) -> String {
        format!("Ø{}/{}", self.phi_mm, self.s_mm)
    }

    /// Label with the provided area appended
    pub fn label_with_area(&self) -> String {
        format!(
            "Ø{}/{} (Aprov = {:.1} mm2/m)",
            self.phi_mm, self.s_mm, self.area_mm2_per_m
        )
    }
}

impl fmt::Display for RebarChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Cheapest catalog choice providing at least `as_req_mm2` under the
/// spacing cap, or `None` when nothing qualifies.
///
/// Minimal area wins; equal areas resolve to the larger spacing (fewer
/// bars to place).
pub fn select_rebar_min_area(as_req_mm2: f64, s_max_mm: u32, phi_min_mm: u32) -> Option<RebarChoice> {
    let mut best: Option<RebarChoice> = None;
    for &phi in PHI_CATALOG_MM.iter() {
        if phi < phi_min_mm || phi > PHI_MAX_MM {
            continue;
        }
        for &s in SPACING_CATALOG_MM.iter() {
            if s > s_max_mm {
                continue;
            }
            let area = area_per_m(phi, s);
            if area + 1e-9 < as_req_mm2 {
                continue;
            }
            let cand = RebarChoice {
                phi_mm: phi,
                s_mm: s,
                area_mm2_per_m: area,
            };
            best = match best {
                None => Some(cand),
                Some(cur) => {
                    if cand.area_mm2_per_m < cur.area_mm2_per_m - 1e-9 {
                        Some(cand)
                    } else if (cand.area_mm2_per_m - cur.area_mm2_per_m).abs() < 1e-9
                        && cand.s_mm > cur.s_mm
                    {
                        Some(cand)
                    } else {
                        Some(cur)
                    }
                }
            };
        }
    }
    best
}

/// Largest area any catalog combination can provide under the constraints
pub fn max_possible_area(s_max_mm: u32, phi_min_mm: u32) -> f64 {
    let mut max = 0.0_f64;
    for &phi in PHI_CATALOG_MM.iter() {
        if phi < phi_min_mm || phi > PHI_MAX_MM {
            continue;
        }
        for &s in SPACING_CATALOG_MM.iter() {
            if s > s_max_mm {
                continue;
            }
            max = max.max(area_per_m(phi, s));
        }
    }
    max
}

/// Like [`select_rebar_min_area`] but a failed search becomes a
/// [`SlabError::CatalogExhausted`] carrying the best achievable area
pub fn select_rebar(as_req_mm2: f64, s_max_mm: u32, phi_min_mm: u32) -> SlabResult<RebarChoice> {
    select_rebar_min_area(as_req_mm2, s_max_mm, phi_min_mm).ok_or_else(|| {
        SlabError::catalog_exhausted(as_req_mm2, s_max_mm, max_possible_area(s_max_mm, phi_min_mm))
    })
}

/// Split a main-bar choice into its straight and bent-up halves.
///
/// Detailing convention: alternate bars bend up toward the support face,
/// so each variant carries half the area at double the spacing.
pub fn split_straight_bent(choice: RebarChoice) -> (RebarChoice, RebarChoice) {
    let half = RebarChoice {
        phi_mm: choice.phi_mm,
        s_mm: choice.s_mm * 2,
        area_mm2_per_m: choice.area_mm2_per_m / 2.0,
    };
    (half, half)
}

// =============================================================================
// Spacing caps (TS500 detailing rules)
// =============================================================================

/// Main-bar spacing cap for one-way slabs: min(1.5h, 200) mm
pub fn smax_oneway_main(h_mm: f64) -> u32 {
    (1.5 * h_mm).min(200.0) as u32
}

/// Distribution-bar spacing cap: 300 mm
pub fn smax_distribution() -> u32 {
    300
}

/// Short-direction spacing cap for two-way slabs: min(1.5h, 200) mm
pub fn smax_twoway_short(h_mm: f64) -> u32 {
    (1.5 * h_mm).min(200.0) as u32
}

/// Long-direction spacing cap for two-way slabs: min(1.5h, 250) mm
pub fn smax_twoway_long(h_mm: f64) -> u32 {
    (1.5 * h_mm).min(250.0) as u32
}

/// Spacing cap for support extras; above the catalog maximum, so it
/// never constrains the search
pub fn smax_support_extra() -> u32 {
    330
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_per_m() {
        // Ø10/100: 78.54 mm2 per bar, 10 bars per metre
        assert!((area_per_m(10, 100) - 785.398).abs() < 0.01);
        // Ø8/200: 50.27 mm2 per bar, 5 bars per metre
        assert!((area_per_m(8, 200) - 251.327).abs() < 0.01);
    }

    #[test]
    fn test_selection_meets_requirement_and_cap() {
        for req in [50.0, 188.0, 251.3, 420.0, 900.0, 1500.0, 2400.0] {
            for cap in [150u32, 200, 300] {
                match select_rebar_min_area(req, cap, DEFAULT_PHI_MIN_MM) {
                    Some(choice) => {
                        assert!(choice.area_mm2_per_m + 1e-9 >= req);
                        assert!(choice.s_mm <= cap);
                        assert!(choice.phi_mm >= DEFAULT_PHI_MIN_MM);
                    }
                    None => {
                        assert!(max_possible_area(cap, DEFAULT_PHI_MIN_MM) < req);
                    }
                }
            }
        }
    }

    #[test]
    fn test_selection_fails_exactly_when_unreachable() {
        let cap = 200u32;
        let max = max_possible_area(cap, DEFAULT_PHI_MIN_MM);
        assert!(select_rebar_min_area(max, cap, DEFAULT_PHI_MIN_MM).is_some());
        assert!(select_rebar_min_area(max + 1.0, cap, DEFAULT_PHI_MIN_MM).is_none());
    }

    #[test]
    fn test_selection_minimizes_area() {
        // Just above Ø8/200 (251.33): Ø8/195 = 257.77 is the cheapest step
        let choice = select_rebar_min_area(252.0, 300, 8).unwrap();
        assert_eq!((choice.phi_mm, choice.s_mm), (8, 195));
    }

    #[test]
    fn test_area_tie_prefers_larger_spacing() {
        // Ø6/50 and Ø12/200 provide the identical area (565.487 mm2/m);
        // the tie must go to the wider spacing
        assert!((area_per_m(6, 50) - area_per_m(12, 200)).abs() < 1e-9);
        let choice = select_rebar_min_area(565.0, 300, 6).unwrap();
        assert_eq!((choice.phi_mm, choice.s_mm), (12, 200));
    }

    #[test]
    fn test_select_rebar_error_carries_diagnostics() {
        let err = select_rebar(1.0e6, 200, 8).unwrap_err();
        match err {
            SlabError::CatalogExhausted {
                required_mm2,
                spacing_cap_mm,
                best_mm2,
            } => {
                assert_eq!(required_mm2, 1.0e6);
                assert_eq!(spacing_cap_mm, 200);
                assert!((best_mm2 - max_possible_area(200, 8)).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_split_straight_bent() {
        let main = RebarChoice::new(10, 100);
        let (straight, bent) = split_straight_bent(main);
        assert_eq!(straight.s_mm, 200);
        assert_eq!(bent.s_mm, 200);
        assert!((straight.area_mm2_per_m - main.area_mm2_per_m / 2.0).abs() < 1e-9);
        assert_eq!(straight, bent);
    }

    #[test]
    fn test_spacing_caps() {
        assert_eq!(smax_oneway_main(120.0), 180);
        assert_eq!(smax_oneway_main(150.0), 200);
        assert_eq!(smax_twoway_long(150.0), 225);
        assert_eq!(smax_twoway_long(200.0), 250);
        assert_eq!(smax_distribution(), 300);
    }

    #[test]
    fn test_rebar_serialization_roundtrip() {
        let choice = RebarChoice::new(12, 150);
        let json = serde_json::to_string(&choice).unwrap();
        let roundtrip: RebarChoice = serde_json::from_str(&json).unwrap();
        assert_eq!(choice, roundtrip);
    }
}
