//! # Two-Way Coefficient Solver
//!
//! Two-way panels are classified into one of seven boundary cases from
//! the continuity of their four edges, then moment coefficients are read
//! from the alpha table at the panel's net aspect ratio. All four design
//! moments use the SHORT net span squared, including the long-direction
//! pair; the code table is built that way.

use serde::{Deserialize, Serialize};

use crate::calculations::{main_rebar_for_moment, DesignOptions, DesignResult, PanelMoments};
use crate::errors::SlabResult;
use crate::grid::{Axis, Edge, EdgeFlags, SlabId, SlabKind, SlabSystem, MIN_NET_SPAN_M};
use crate::materials::design_chart::interp_clamped;
use crate::rebar::{
    select_rebar, smax_support_extra, smax_twoway_long, smax_twoway_short, DEFAULT_PHI_MIN_MM,
};

/// Y-direction span mats sit under the X mats; their effective depth
/// loses one bar layer (mm)
const LONG_MAT_DEPTH_DELTA_MM: f64 = -10.0;

/// Aspect-ratio breakpoints of the alpha table
pub const M_POINTS: [f64; 8] = [1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.75, 2.0];

/// Moment coefficients for one boundary case.
///
/// Short-direction entries are curves over [`M_POINTS`]; long-direction
/// entries are constants. A missing entry means "not applicable" for
/// that case and is never coerced to zero.
#[derive(Debug, Clone, Copy)]
pub struct AlphaRow {
    pub short_neg: Option<[f64; 8]>,
    pub short_pos: Option<[f64; 8]>,
    pub long_neg: Option<f64>,
    pub long_pos: Option<f64>,
}

/// Alpha coefficients for cases 1-7 (index = case - 1)
const ALPHA_TABLE: [AlphaRow; 7] = [
    // Case 1: all four edges continuous
    AlphaRow {
        short_neg: Some([0.033, 0.040, 0.045, 0.050, 0.054, 0.059, 0.071, 0.083]),
        short_pos: Some([0.025, 0.030, 0.034, 0.038, 0.041, 0.045, 0.053, 0.062]),
        long_neg: Some(0.033),
        long_pos: Some(0.025),
    },
    // Case 2: one edge discontinuous
    AlphaRow {
        short_neg: Some([0.042, 0.047, 0.053, 0.057, 0.061, 0.065, 0.075, 0.085]),
        short_pos: Some([0.031, 0.035, 0.040, 0.043, 0.046, 0.049, 0.056, 0.064]),
        long_neg: Some(0.042),
        long_pos: Some(0.031),
    },
    // Case 3: two adjacent edges discontinuous (also the 2-edge fallback)
    AlphaRow {
        short_neg: Some([0.049, 0.056, 0.062, 0.066, 0.070, 0.073, 0.082, 0.090]),
        short_pos: Some([0.037, 0.042, 0.047, 0.050, 0.053, 0.055, 0.062, 0.068]),
        long_neg: Some(0.049),
        long_pos: Some(0.037),
    },
    // Case 4: both short edges discontinuous
    AlphaRow {
        short_neg: Some([0.056, 0.061, 0.065, 0.069, 0.071, 0.073, 0.077, 0.080]),
        short_pos: Some([0.044, 0.046, 0.049, 0.051, 0.053, 0.055, 0.058, 0.060]),
        long_neg: None,
        long_pos: Some(0.044),
    },
    // Case 5: both long edges discontinuous
    AlphaRow {
        short_neg: None,
        short_pos: Some([0.044, 0.053, 0.060, 0.065, 0.068, 0.071, 0.077, 0.080]),
        long_neg: Some(0.056),
        long_pos: Some(0.044),
    },
    // Case 6: three edges discontinuous
    AlphaRow {
        short_neg: Some([0.058, 0.065, 0.071, 0.077, 0.081, 0.085, 0.092, 0.098]),
        short_pos: Some([0.044, 0.049, 0.054, 0.058, 0.061, 0.064, 0.069, 0.074]),
        long_neg: Some(0.058),
        long_pos: Some(0.044),
    },
    // Case 7: all four edges discontinuous
    AlphaRow {
        short_neg: None,
        short_pos: Some([0.050, 0.057, 0.062, 0.067, 0.071, 0.075, 0.081, 0.083]),
        long_neg: None,
        long_pos: Some(0.050),
    },
];

/// Coefficient row for a boundary case (1-7)
pub fn alpha_row(case: u8) -> &'static AlphaRow {
    let idx = (case.clamp(1, 7) - 1) as usize;
    &ALPHA_TABLE[idx]
}

/// Human-readable description of a boundary case
pub fn case_description(case: u8) -> &'static str {
    match case {
        1 => "all 4 edges continuous",
        2 => "1 edge discontinuous",
        3 => "2 adjacent edges discontinuous",
        4 => "2 short edges discontinuous",
        5 => "2 long edges discontinuous",
        6 => "3 edges discontinuous",
        7 => "all 4 edges discontinuous",
        _ => "-",
    }
}

/// Raw moment result of the two-way solver for a single panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoWayMoments {
    /// Net span along X (m)
    pub lx_net_m: f64,
    /// Net span along Y (m)
    pub ly_net_m: f64,
    /// Short net span ls (m)
    pub ls_m: f64,
    /// Aspect ratio m = ll/ls (>= 1)
    pub aspect_ratio: f64,
    /// Boundary case 1-7
    pub case: u8,
    /// Axis of the short net span
    pub short_axis: Axis,
    /// Full-coverage continuity flags used for the case selection
    pub continuity: EdgeFlags,
    /// Support / span moments along X (kNm/m); None = not applicable
    pub mx_neg: Option<f64>,
    pub mx_pos: Option<f64>,
    /// Support / span moments along Y (kNm/m); None = not applicable
    pub my_neg: Option<f64>,
    pub my_pos: Option<f64>,
}

impl TwoWayMoments {
    /// Support moment on a panel edge: X moments carry the L/R edges,
    /// Y moments the T/B edges
    pub fn support_moment_on_edge(&self, edge: Edge) -> Option<f64> {
        match edge.axis() {
            Axis::X => self.mx_neg,
            Axis::Y => self.my_neg,
        }
    }

    /// Net span perpendicular to a panel edge
    pub fn net_span_for_edge(&self, edge: Edge) -> f64 {
        match edge.axis() {
            Axis::X => self.lx_net_m,
            Axis::Y => self.ly_net_m,
        }
    }
}

// =============================================================================
// CASE SELECTION
// =============================================================================

/// Boundary case (1-7) from edge continuity and the net dimensions.
///
/// Counts of discontinuous edges map 0 -> 1, 1 -> 2, 3 -> 6, 4 -> 7.
/// With exactly two: the short pair -> 4, the long pair -> 5, adjacent
/// corners -> 3. Equal net dimensions have no short/long pair; an
/// opposite pair then resolves by axis (T/B -> 4, L/R -> 5) and anything
/// else falls back to case 3.
pub fn classify_case(
    lx_net_m: f64,
    ly_net_m: f64,
    cont_left: bool,
    cont_right: bool,
    cont_top: bool,
    cont_bottom: bool,
) -> u8 {
    let disc_left = !cont_left;
    let disc_right = !cont_right;
    let disc_top = !cont_top;
    let disc_bottom = !cont_bottom;
    let n_disc =
        disc_left as u8 + disc_right as u8 + disc_top as u8 + disc_bottom as u8;

    match n_disc {
        0 => return 1,
        4 => return 7,
        1 => return 2,
        3 => return 6,
        _ => {}
    }

    // Exactly two discontinuous edges from here on. The T/B edges are
    // the short pair when Lx < Ly (they span the shorter dimension),
    // the L/R edges otherwise.
    let eps = 1e-9;
    let x_pair = disc_left && disc_right;
    let y_pair = disc_top && disc_bottom;
    if (lx_net_m - ly_net_m).abs() >= eps {
        let short_is_tb = lx_net_m < ly_net_m;
        let short_pair_hit = if short_is_tb { y_pair } else { x_pair };
        let long_pair_hit = if short_is_tb { x_pair } else { y_pair };
        if short_pair_hit {
            return 4;
        }
        if long_pair_hit {
            return 5;
        }
    }
    // Equal nets: opposite pairs resolve by axis, everything else
    // (adjacent corners included) is case 3
    if y_pair {
        return 4;
    }
    if x_pair {
        return 5;
    }
    3
}

// =============================================================================
// MOMENT SOLVER
// =============================================================================

/// Net spans of a two-way panel: half the beam width comes off per
/// beamed edge, independently per edge
pub fn net_dimensions(
    system: &SlabSystem,
    id: SlabId,
    beam_width_m: f64,
) -> SlabResult<(f64, f64)> {
    let slab = system.get_slab(id)?;
    let (lx_g, ly_g) = slab.size_m_gross();
    let cut = |beamed: bool| if beamed { 0.5 * beam_width_m } else { 0.0 };
    let lx = lx_g
        - cut(system.edge_has_beam(id, Edge::Left))
        - cut(system.edge_has_beam(id, Edge::Right));
    let ly = ly_g
        - cut(system.edge_has_beam(id, Edge::Top))
        - cut(system.edge_has_beam(id, Edge::Bottom));
    Ok((lx.max(MIN_NET_SPAN_M), ly.max(MIN_NET_SPAN_M)))
}

/// Compute the raw two-way moments for one panel: case classification,
/// alpha interpolation at the net aspect ratio, and M = alpha * pd * ls^2
/// for all four roles
pub fn compute_moments(
    system: &SlabSystem,
    id: SlabId,
    beam_width_m: f64,
) -> SlabResult<TwoWayMoments> {
    let slab = system.get_slab(id)?;
    let pd = slab.load_kn_m2;
    let (lx_n, ly_n) = net_dimensions(system, id, beam_width_m)?;

    let ll = lx_n.max(ly_n);
    let ls = lx_n.min(ly_n);
    let aspect = if ls > 0.0 { ll / ls } else { 1.0 };

    let continuity = system.edge_continuity(id).full_flags();
    let case = classify_case(
        lx_n,
        ly_n,
        continuity.left,
        continuity.right,
        continuity.top,
        continuity.bottom,
    );
    let row = alpha_row(case);

    let a_sn = row
        .short_neg
        .map(|pts| interp_clamped(&M_POINTS, &pts, aspect));
    let a_sp = row
        .short_pos
        .map(|pts| interp_clamped(&M_POINTS, &pts, aspect));
    let a_ln = row.long_neg;
    let a_lp = row.long_pos;

    let ls_sq = ls * ls;
    let m_sn = a_sn.map(|a| a * pd * ls_sq);
    let m_sp = a_sp.map(|a| a * pd * ls_sq);
    let m_ln = a_ln.map(|a| a * pd * ls_sq);
    let m_lp = a_lp.map(|a| a * pd * ls_sq);

    let short_axis = if lx_n <= ly_n { Axis::X } else { Axis::Y };
    let (mx_neg, mx_pos, my_neg, my_pos) = match short_axis {
        Axis::X => (m_sn, m_sp, m_ln, m_lp),
        Axis::Y => (m_ln, m_lp, m_sn, m_sp),
    };

    Ok(TwoWayMoments {
        lx_net_m: lx_n,
        ly_net_m: ly_n,
        ls_m: ls,
        aspect_ratio: aspect,
        case,
        short_axis,
        continuity,
        mx_neg,
        mx_pos,
        my_neg,
        my_pos,
    })
}

// =============================================================================
// REINFORCEMENT DESIGN
// =============================================================================

/// Design the two-way reinforcement set from (possibly balanced) moments.
///
/// Span mats per axis plus support extras that top up the span mats
/// where the support requirement exceeds what they already provide.
pub fn design(
    moments: &TwoWayMoments,
    options: &DesignOptions,
) -> SlabResult<DesignResult> {
    let h = options.slab_thickness_mm;
    let (smax_x, smax_y) = match moments.short_axis {
        Axis::X => (smax_twoway_short(h), smax_twoway_long(h)),
        Axis::Y => (smax_twoway_long(h), smax_twoway_short(h)),
    };

    let (_, main_x) =
        main_rebar_for_moment(moments.mx_pos.unwrap_or(0.0), options, smax_x, None, 0.0)?;
    let (_, main_y) = main_rebar_for_moment(
        moments.my_pos.unwrap_or(0.0),
        options,
        smax_y,
        None,
        LONG_MAT_DEPTH_DELTA_MM,
    )?;

    let (_, support_x) = main_rebar_for_moment(
        moments.mx_neg.unwrap_or(0.0).abs(),
        options,
        smax_x,
        None,
        0.0,
    )?;
    let (_, support_y) = main_rebar_for_moment(
        moments.my_neg.unwrap_or(0.0).abs(),
        options,
        smax_y,
        None,
        0.0,
    )?;

    let mut bars = std::collections::BTreeMap::new();
    bars.insert("main-x".to_string(), main_x);
    bars.insert("main-y".to_string(), main_y);
    bars.insert(
        "extra-support-x".to_string(),
        select_rebar(
            (support_x.area_mm2_per_m - main_x.area_mm2_per_m).max(0.0),
            smax_support_extra(),
            DEFAULT_PHI_MIN_MM,
        )?,
    );
    bars.insert(
        "extra-support-y".to_string(),
        select_rebar(
            (support_y.area_mm2_per_m - main_y.area_mm2_per_m).max(0.0),
            smax_support_extra(),
            DEFAULT_PHI_MIN_MM,
        )?,
    );

    Ok(DesignResult {
        kind: SlabKind::TwoWay,
        span_axis: None,
        two_way_case: Some(moments.case),
        short_axis: Some(moments.short_axis),
        fixed_edge: None,
        design_moment_knm: None,
        edge_continuity: moments.continuity,
        moments: PanelMoments::TwoWay(moments.clone()),
        bars,
    })
}
