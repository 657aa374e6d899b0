//! # Slab Calculations
//!
//! The per-kind solvers and the batch orchestrator. Each solver follows
//! the pattern:
//!
//! - `compute_moments(system, id, ...) -> *Moments` - pure raw analysis
//! - `design(...) -> DesignResult` - reinforcement selection
//!
//! ## Two-pass pipeline
//!
//! Placement edits can flip any panel's neighbor-derived fixity, so a
//! batch always recomputes from scratch in a fixed order:
//!
//! 1. [`compute_raw_moments`] - raw moments for every panel (plus the
//!    bent-up bar areas later passes need)
//! 2. [`balance::balance_support_moments`] - cross-panel support-moment
//!    balancing, which needs every panel's raw result
//! 3. [`design_all_panels`] - reinforcement selection from the balanced
//!    moments
//!
//! [`compute_all`] runs the pipeline and collects a per-panel pass/fail
//! report; one panel's failure never aborts the batch.

pub mod balance;
pub mod balcony;
pub mod oneway;
pub mod twoway;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use balance::{BalanceOutcome, BalancedEdge};
pub use balcony::BalconyMoments;
pub use oneway::OneWayMoments;
pub use twoway::TwoWayMoments;

use crate::errors::{SlabError, SlabResult};
use crate::grid::{Axis, Edge, EdgeFlags, SlabId, SlabKind, SlabSystem};
use crate::materials::{steel_area_for_moment, ConcreteGrade, SteelGrade};
use crate::rebar::{
    select_rebar, smax_oneway_main, smax_twoway_short, split_straight_bent, RebarChoice,
    DEFAULT_PHI_MIN_MM,
};

// =============================================================================
// DESIGN OPTIONS
// =============================================================================

/// Global design parameters shared by every panel in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignOptions {
    /// Concrete grade
    pub concrete: ConcreteGrade,
    /// Reinforcing steel grade
    pub steel: SteelGrade,
    /// Slab thickness h (mm)
    pub slab_thickness_mm: f64,
    /// Concrete cover to the bar mat (mm)
    pub cover_mm: f64,
    /// Supporting beam width (m)
    pub beam_width_m: f64,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            concrete: ConcreteGrade::C25_30,
            steel: SteelGrade::B420C,
            slab_thickness_mm: 120.0,
            cover_mm: 25.0,
            beam_width_m: 0.30,
        }
    }
}

impl DesignOptions {
    /// Validate option parameters
    pub fn validate(&self) -> SlabResult<()> {
        if self.slab_thickness_mm <= 0.0 {
            return Err(SlabError::invalid_input(
                "slab_thickness_mm",
                self.slab_thickness_mm.to_string(),
                "Thickness must be positive",
            ));
        }
        if self.cover_mm < 0.0 {
            return Err(SlabError::invalid_input(
                "cover_mm",
                self.cover_mm.to_string(),
                "Cover must not be negative",
            ));
        }
        if self.beam_width_m < 0.0 {
            return Err(SlabError::invalid_input(
                "beam_width_m",
                self.beam_width_m.to_string(),
                "Beam width must not be negative",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// MOMENTS & RESULTS
// =============================================================================

/// Raw solver output for one panel, by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PanelMoments {
    OneWay(OneWayMoments),
    TwoWay(TwoWayMoments),
    Balcony(BalconyMoments),
}

/// Pass-1 output: raw moments for every panel plus the bent-up bar
/// areas the one-way extra-support rule needs in pass 3
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MomentPass {
    /// Per-panel raw result; failed panels carry their error
    pub moments: BTreeMap<SlabId, SlabResult<PanelMoments>>,
    /// Bent-up (pilye) bar area per panel (mm2/m), from a preliminary
    /// main-bar selection
    pub bent_bar_areas: BTreeMap<SlabId, f64>,
}

/// Per-panel design output - the only artifact handed to external
/// consumers.
///
/// Classification fields describe how the panel was analyzed; `bars`
/// maps structural role names to the selected rebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    /// Panel kind this design was produced for
    pub kind: SlabKind,
    /// Carrying direction (one-way strips and balconies)
    pub span_axis: Option<Axis>,
    /// Boundary case 1-7 (two-way panels)
    pub two_way_case: Option<u8>,
    /// Axis of the short net span (two-way panels)
    pub short_axis: Option<Axis>,
    /// Restrained edge (balconies)
    pub fixed_edge: Option<Edge>,
    /// Final design moment where it differs from the raw solver value
    /// (balconies: neighbor-driven cantilever moment, kNm/m)
    pub design_moment_knm: Option<f64>,
    /// Per-edge continuity flags the solver classified against
    pub edge_continuity: EdgeFlags,
    /// The (possibly balanced) moments the design was made from
    pub moments: PanelMoments,
    /// Selected rebar per structural role
    pub bars: BTreeMap<String, RebarChoice>,
}

/// Outcome of one panel in a batch: a design or a per-panel failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value")]
pub enum PanelOutcome {
    Pass(DesignResult),
    Fail(SlabError),
}

impl PanelOutcome {
    /// Whether the panel produced a design
    pub fn is_pass(&self) -> bool {
        matches!(self, PanelOutcome::Pass(_))
    }

    /// The design, if the panel passed
    pub fn design(&self) -> Option<&DesignResult> {
        match self {
            PanelOutcome::Pass(d) => Some(d),
            PanelOutcome::Fail(_) => None,
        }
    }

    /// The error, if the panel failed
    pub fn error(&self) -> Option<&SlabError> {
        match self {
            PanelOutcome::Pass(_) => None,
            PanelOutcome::Fail(e) => Some(e),
        }
    }
}

/// One panel's row in a batch report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelReport {
    /// Panel label as placed
    pub label: String,
    /// Panel kind
    pub kind: SlabKind,
    /// Design or failure
    pub outcome: PanelOutcome,
}

/// Full batch output: per-panel reports plus the balancing outcome
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-panel reports keyed by id
    pub panels: BTreeMap<SlabId, PanelReport>,
    /// Support-moment balancing results and log
    pub balance: BalanceOutcome,
}

impl BatchReport {
    /// Whether every panel produced a design
    pub fn all_passed(&self) -> bool {
        self.panels.values().all(|p| p.outcome.is_pass())
    }

    /// Ids and errors of failed panels
    pub fn failures(&self) -> Vec<(SlabId, &SlabError)> {
        self.panels
            .iter()
            .filter_map(|(&id, p)| p.outcome.error().map(|e| (id, e)))
            .collect()
    }
}

// =============================================================================
// SHARED REBAR SIZING
// =============================================================================

/// Size main reinforcement for a moment: required area from the design
/// chart, floored by the minimum reinforcement ratio, then the cheapest
/// catalog choice under the spacing cap.
///
/// Returns (required area mm2/m, selected choice). `d_delta_mm` shifts
/// the effective depth for layered mats; `as_min_override` replaces the
/// ratio-based minimum.
pub fn main_rebar_for_moment(
    m_knm: f64,
    options: &DesignOptions,
    s_max_mm: u32,
    as_min_override: Option<f64>,
    d_delta_mm: f64,
) -> SlabResult<(f64, RebarChoice)> {
    let d_eff = options.slab_thickness_mm - options.cover_mm + d_delta_mm;
    let as_raw = steel_area_for_moment(
        m_knm,
        options.concrete,
        options.steel,
        options.slab_thickness_mm,
        options.cover_mm,
        Some(d_eff),
    )?;
    let d_mm = d_eff.max(1.0);
    let as_min = as_min_override.unwrap_or(options.steel.rho_min() * 1000.0 * d_mm);
    let as_req = as_raw.max(as_min);
    let choice = select_rebar(as_req, s_max_mm, DEFAULT_PHI_MIN_MM)?;
    Ok((as_req, choice))
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Pass 1: raw moments for every panel, plus the preliminary bent-up
/// bar areas. A panel failing here carries its error into the report.
pub fn compute_raw_moments(system: &SlabSystem, options: &DesignOptions) -> MomentPass {
    let mut pass = MomentPass::default();
    let bw = options.beam_width_m;
    let h = options.slab_thickness_mm;

    for (id, slab) in system.iter() {
        let computed: SlabResult<(PanelMoments, Option<f64>)> = match slab.kind {
            SlabKind::OneWay => oneway::compute_moments(system, id, bw).and_then(|m| {
                let m_pos = m.m_pos_max.unwrap_or(0.0);
                let (_, main) =
                    main_rebar_for_moment(m_pos, options, smax_oneway_main(h), None, 0.0)?;
                let (_, bent) = split_straight_bent(main);
                Ok((PanelMoments::OneWay(m), Some(bent.area_mm2_per_m)))
            }),
            SlabKind::TwoWay => twoway::compute_moments(system, id, bw).and_then(|m| {
                let m_pos_short = match m.short_axis {
                    Axis::X => m.mx_pos,
                    Axis::Y => m.my_pos,
                }
                .unwrap_or(0.0);
                let (_, main) =
                    main_rebar_for_moment(m_pos_short, options, smax_twoway_short(h), None, 0.0)?;
                let (_, bent) = split_straight_bent(main);
                Ok((PanelMoments::TwoWay(m), Some(bent.area_mm2_per_m)))
            }),
            SlabKind::Balcony => {
                balcony::compute_moments(system, id, bw).map(|m| (PanelMoments::Balcony(m), None))
            }
        };

        match computed {
            Ok((moments, bent)) => {
                pass.moments.insert(id, Ok(moments));
                if let Some(area) = bent {
                    pass.bent_bar_areas.insert(id, area);
                }
            }
            Err(e) => {
                pass.moments.insert(id, Err(e));
            }
        }
    }
    pass
}

/// Pass 3: reinforcement selection for every panel, preferring balanced
/// two-way moments where the balancer adjusted them
pub fn design_all_panels(
    system: &SlabSystem,
    options: &DesignOptions,
    pass: &MomentPass,
    balance: &BalanceOutcome,
) -> BTreeMap<SlabId, PanelReport> {
    let mut reports = BTreeMap::new();

    for (id, slab) in system.iter() {
        let outcome = match pass.moments.get(&id) {
            Some(Ok(moments)) => {
                let designed = match moments {
                    PanelMoments::OneWay(m) => {
                        oneway::design(system, id, m, &pass.bent_bar_areas, options)
                    }
                    PanelMoments::TwoWay(m) => {
                        let effective = balance.adjusted.get(&id).unwrap_or(m);
                        twoway::design(effective, options)
                    }
                    PanelMoments::Balcony(m) => balcony::design(system, id, m, pass, options),
                };
                match designed {
                    Ok(d) => PanelOutcome::Pass(d),
                    Err(e) => PanelOutcome::Fail(e),
                }
            }
            Some(Err(e)) => PanelOutcome::Fail(e.clone()),
            None => PanelOutcome::Fail(SlabError::internal(format!(
                "no pass-1 result for slab {id}"
            ))),
        };

        reports.insert(
            id,
            PanelReport {
                label: slab.label.clone(),
                kind: slab.kind,
                outcome,
            },
        );
    }
    reports
}

/// Run the full two-pass pipeline over the current grid state
pub fn compute_all(system: &SlabSystem, options: &DesignOptions) -> SlabResult<BatchReport> {
    options.validate()?;
    let pass = compute_raw_moments(system, options);
    let balance = balance::balance_support_moments(system, &pass);
    let panels = design_all_panels(system, options, &pass, &balance);
    Ok(BatchReport { panels, balance })
}

// =============================================================================
// RESULT CACHE
// =============================================================================

/// The only cache in the engine: explicit and caller-invalidated.
///
/// Any grid or option edit must be followed by [`ResultCache::invalidate`];
/// the next access recomputes the full batch from scratch.
#[derive(Debug, Default)]
pub struct ResultCache {
    report: Option<BatchReport>,
}

impl ResultCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached report
    pub fn invalidate(&mut self) {
        self.report = None;
    }

    /// Whether a report is cached
    pub fn is_valid(&self) -> bool {
        self.report.is_some()
    }

    /// Cached report, recomputing on a cold cache
    pub fn get_or_compute(
        &mut self,
        system: &SlabSystem,
        options: &DesignOptions,
    ) -> SlabResult<&BatchReport> {
        if self.report.is_none() {
            self.report = Some(compute_all(system, options)?);
        }
        match &self.report {
            Some(report) => Ok(report),
            None => Err(SlabError::internal("result cache miss after compute")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Slab;

    /// Mixed floor: a two-way block, a chained one-way strip, a balcony
    fn mixed_floor() -> SlabSystem {
        let mut system = SlabSystem::new(64, 48);
        // Two-way 6 x 6 m
        system
            .add_slab(
                Slab::new("D1", SlabKind::TwoWay, (0, 0), (23, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        // One-way 3 x 6 m against its right edge
        system
            .add_slab(
                Slab::new("D2", SlabKind::OneWay, (24, 0), (35, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        // Balcony 1.5 x 6 m below the two-way panel
        system
            .add_slab(
                Slab::new("B1", SlabKind::Balcony, (0, 24), (23, 29))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        system
    }

    #[test]
    fn test_compute_all_mixed_floor() {
        let system = mixed_floor();
        let report = compute_all(&system, &DesignOptions::default()).unwrap();

        assert_eq!(report.panels.len(), 3);
        assert!(report.all_passed(), "failures: {:?}", report.failures());

        for panel in report.panels.values() {
            let design = panel.outcome.design().unwrap();
            assert_eq!(design.kind, panel.kind);
            assert!(!design.bars.is_empty());
            match panel.kind {
                SlabKind::OneWay => assert!(design.bars.contains_key("main")),
                SlabKind::TwoWay => assert!(design.bars.contains_key("main-x")),
                SlabKind::Balcony => assert!(design.bars.contains_key("balcony-main")),
            }
        }
        // The two-way/one-way shared edge went through the balancer
        assert_eq!(report.balance.edges.len(), 1);
    }

    #[test]
    fn test_failing_panel_does_not_poison_batch() {
        let mut system = mixed_floor();
        // Unreachable steel demand: huge load forces the catalog search
        // past its maximum for this panel only
        system
            .add_slab(
                Slab::new("D9", SlabKind::TwoWay, (40, 0), (63, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(100000.0),
            )
            .unwrap();
        let report = compute_all(&system, &DesignOptions::default()).unwrap();

        assert!(!report.all_passed());
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].1.error_code(), "CATALOG_EXHAUSTED");
        // The other three panels still designed
        let passed = report
            .panels
            .values()
            .filter(|p| p.outcome.is_pass())
            .count();
        assert_eq!(passed, 3);
    }

    #[test]
    fn test_balanced_moments_flow_into_twoway_design() {
        // Unequal two-way pair: the smaller panel's support design must
        // see the balanced (larger) moment, not its raw one
        let mut system = SlabSystem::new(64, 24);
        let small = system
            .add_slab(
                Slab::new("D1", SlabKind::TwoWay, (0, 0), (15, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        system
            .add_slab(
                Slab::new("D2", SlabKind::TwoWay, (16, 0), (47, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();

        let options = DesignOptions::default();
        let pass = compute_raw_moments(&system, &options);
        let balance = balance::balance_support_moments(&system, &pass);
        let report = compute_all(&system, &options).unwrap();

        let design = report.panels[&small].outcome.design().unwrap().clone();
        let PanelMoments::TwoWay(designed_from) = design.moments else {
            panic!("expected two-way moments");
        };
        let balanced = &balance.adjusted[&small];
        assert_eq!(designed_from.mx_neg, balanced.mx_neg);
        // And the balanced value differs from the raw one
        let Ok(PanelMoments::TwoWay(raw)) = &pass.moments[&small] else {
            panic!("expected raw two-way moments");
        };
        assert_ne!(designed_from.mx_neg, raw.mx_neg);
    }

    #[test]
    fn test_result_cache_explicit_invalidation() {
        let system = mixed_floor();
        let options = DesignOptions::default();
        let mut cache = ResultCache::new();

        assert!(!cache.is_valid());
        let first = cache.get_or_compute(&system, &options).unwrap().clone();
        assert!(cache.is_valid());
        let second = cache.get_or_compute(&system, &options).unwrap();
        assert_eq!(first.panels.len(), second.panels.len());

        cache.invalidate();
        assert!(!cache.is_valid());
    }

    #[test]
    fn test_main_rebar_minimum_governs_zero_moment() {
        let options = DesignOptions::default();
        // Zero moment still gets the ratio minimum: 0.002 * 1000 * 95
        let (as_req, choice) = main_rebar_for_moment(0.0, &options, 200, None, 0.0).unwrap();
        assert!((as_req - 190.0).abs() < 1e-9);
        assert!(choice.area_mm2_per_m + 1e-9 >= 190.0);
    }

    #[test]
    fn test_geometry_error_propagates() {
        let options = DesignOptions {
            slab_thickness_mm: 20.0,
            cover_mm: 25.0,
            ..DesignOptions::default()
        };
        let err = main_rebar_for_moment(5.0, &options, 200, None, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "GEOMETRY");
    }

    #[test]
    fn test_report_serialization_roundtrip() {
        let system = mixed_floor();
        let report = compute_all(&system, &DesignOptions::default()).unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("main-x"));
        assert!(json.contains("balcony-main"));
        let roundtrip: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.panels.len(), report.panels.len());
        assert!(roundtrip.all_passed());
    }
}
