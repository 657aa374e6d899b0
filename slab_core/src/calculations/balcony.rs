//! # Balcony Cantilever Solver
//!
//! A balcony cantilevers off its shorter gross dimension. The fixed edge
//! is guessed as the edge with the highest neighbor-coverage ratio, and
//! the reinforcement design moment is the larger of the balcony's own
//! cantilever moment and the support moment any fixed-edge neighbor
//! brings to the shared edge.

use serde::{Deserialize, Serialize};

use crate::calculations::{
    main_rebar_for_moment, DesignOptions, DesignResult, MomentPass, PanelMoments,
};
use crate::errors::SlabResult;
use crate::grid::{Axis, Edge, SlabId, SlabKind, SlabSystem, MIN_NET_SPAN_M};
use crate::rebar::{select_rebar, smax_distribution, smax_oneway_main, DEFAULT_PHI_MIN_MM};

/// Raw moment result of the balcony solver for a single panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalconyMoments {
    /// Cantilever direction (axis of the shorter gross dimension)
    pub span_axis: Axis,
    /// Line load on the strip, w = load x strip width (kN/m)
    pub w_kn_m: f64,
    /// Clear cantilever length (m)
    pub l_net_m: f64,
    /// Cantilever support moment, w * L^2 / 2 (kNm/m, stored positive)
    pub m_neg: f64,
}

/// Compute the raw cantilever moment for one balcony panel.
///
/// Net length deducts half the beam width for the single supported edge.
pub fn compute_moments(
    system: &SlabSystem,
    id: SlabId,
    beam_width_m: f64,
) -> SlabResult<BalconyMoments> {
    let slab = system.get_slab(id)?;
    let w = slab.load_kn_m2 * slab.strip_width_m;
    let span_axis = slab.span_axis();
    let l_gross = slab.short_gross_m();
    let l_net = (l_gross - 0.5 * beam_width_m).max(MIN_NET_SPAN_M);
    Ok(BalconyMoments {
        span_axis,
        w_kn_m: w,
        l_net_m: l_net,
        m_neg: 0.5 * w * l_net * l_net,
    })
}

/// Guess the fixed (restrained) edge: the edge with the highest
/// neighbor-coverage ratio, ratios forced to zero where no cell touches
/// a neighbor. Ties resolve to the first maximum in L, R, T, B order.
pub fn fixed_edge_guess(system: &SlabSystem, id: SlabId) -> Edge {
    let mut best = Edge::Left;
    let mut best_ratio = f64::NEG_INFINITY;
    for edge in Edge::ALL {
        let cov = system.edge_coverage(id, edge);
        let ratio = if cov.any { cov.ratio } else { 0.0 };
        if ratio > best_ratio {
            best = edge;
            best_ratio = ratio;
        }
    }
    best
}

/// Support moment a neighbor brings to the shared edge, read from the
/// raw pass-1 moments. Absent or failed results contribute zero.
fn neighbor_support_moment(pass: &MomentPass, neighbor: SlabId, edge: Edge) -> f64 {
    match pass.moments.get(&neighbor) {
        Some(Ok(PanelMoments::TwoWay(tm))) => tm
            .support_moment_on_edge(edge)
            .map(f64::abs)
            .unwrap_or(0.0),
        Some(Ok(PanelMoments::OneWay(om))) => om.m_neg_min.map(f64::abs).unwrap_or(0.0),
        Some(Ok(PanelMoments::Balcony(bm))) => bm.m_neg.abs(),
        _ => 0.0,
    }
}

/// The reinforcement design moment: the balcony's own cantilever moment
/// or the largest support moment among fixed-edge neighbors, whichever
/// is greater. Returns the moment and the fixed edge used.
pub fn design_moment(
    system: &SlabSystem,
    id: SlabId,
    m_cantilever: f64,
    pass: &MomentPass,
) -> (f64, Edge) {
    let fixed = fixed_edge_guess(system, id);
    let neighbors = system.neighbors_on_side(id, fixed.axis(), fixed.side());
    if neighbors.is_empty() {
        return (m_cantilever.abs(), fixed);
    }
    let m_nb = neighbors
        .iter()
        .map(|&nb| neighbor_support_moment(pass, nb, fixed))
        .fold(0.0_f64, f64::max);
    (m_cantilever.abs().max(m_nb), fixed)
}

/// Design the balcony reinforcement: main bars for the design moment and
/// distribution bars at a fifth of the provided main area
pub fn design(
    system: &SlabSystem,
    id: SlabId,
    moments: &BalconyMoments,
    pass: &MomentPass,
    options: &DesignOptions,
) -> SlabResult<DesignResult> {
    system.get_slab(id)?;
    let (m_des, fixed) = design_moment(system, id, moments.m_neg, pass);

    let (_, main) = main_rebar_for_moment(
        m_des,
        options,
        smax_oneway_main(options.slab_thickness_mm),
        None,
        0.0,
    )?;
    let dist = select_rebar(
        main.area_mm2_per_m / 5.0,
        smax_distribution(),
        DEFAULT_PHI_MIN_MM,
    )?;

    let mut bars = std::collections::BTreeMap::new();
    bars.insert("balcony-main".to_string(), main);
    bars.insert("balcony-distribution".to_string(), dist);

    Ok(DesignResult {
        kind: SlabKind::Balcony,
        span_axis: Some(moments.span_axis),
        two_way_case: None,
        short_axis: None,
        fixed_edge: Some(fixed),
        design_moment_knm: Some(m_des),
        edge_continuity: system.edge_continuity(id).any_flags(),
        moments: PanelMoments::Balcony(moments.clone()),
        bars,
    })
}
