//! # Support-Moment Balancer
//!
//! Adjacent panels compute their shared support moment independently, so
//! the two sides rarely agree. Per TS500 practice, when the smaller side
//! is below 80% of the larger, two thirds of the difference is
//! redistributed between the panels in proportion to their strip
//! stiffnesses (1/L each side), and the larger adjusted value becomes the
//! shared design moment. Within 80%, the larger raw value is used as is.
//!
//! Pairs are discovered from two-way panels in id order and processed
//! exactly once via a canonical (smaller id, larger id, edge) key.
//! Eligible pairs are TwoWay-TwoWay and TwoWay-OneWay.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::calculations::{MomentPass, PanelMoments, TwoWayMoments};
use crate::grid::{Edge, SlabId, SlabKind, SlabSystem};

/// Redistribution threshold: balance only when M_min < 0.8 * M_max
const BALANCE_THRESHOLD: f64 = 0.8;

/// Share of the moment gap that gets redistributed
const DISTRIBUTE_SHARE: f64 = 2.0 / 3.0;

/// One balanced panel-edge pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedEdge {
    /// Initiating panel and its edge
    pub a: SlabId,
    pub a_edge: Edge,
    /// Neighbor panel and its facing edge
    pub b: SlabId,
    pub b_edge: Edge,
    /// Raw support moments on each side (absolute, kNm/m)
    pub m_a: f64,
    pub m_b: f64,
    /// Moments after redistribution (equal to the raw values when the
    /// sides already agreed within the threshold)
    pub m_a_adjusted: f64,
    pub m_b_adjusted: f64,
    /// Shared design moment after the rule (absolute, kNm/m)
    pub design_moment: f64,
    /// Whether the 2/3 redistribution fired
    pub redistributed: bool,
}

/// Result of the balancing pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceOutcome {
    /// Two-way panel moments with balanced support values written back
    pub adjusted: BTreeMap<SlabId, TwoWayMoments>,
    /// Every balanced pair, in processing order
    pub edges: Vec<BalancedEdge>,
    /// Human-readable balancing log
    pub log: Vec<String>,
}

impl BalanceOutcome {
    /// Shared design moment recorded for a panel edge, if any
    pub fn design_moment_for(&self, id: SlabId, edge: Edge) -> Option<f64> {
        self.edges.iter().find_map(|e| {
            if e.a == id && e.a_edge == edge {
                Some(e.design_moment)
            } else if e.b == id && e.b_edge == edge {
                Some(e.design_moment)
            } else {
                None
            }
        })
    }
}

/// Distribution factors from strip stiffness K = 1/L per side
/// (equal thickness assumed). Degenerate lengths fall back to an even
/// split.
pub fn stiffness_distribution(l1_m: f64, l2_m: f64) -> (f64, f64) {
    if l1_m <= 0.0 || l2_m <= 0.0 {
        return (0.5, 0.5);
    }
    let k1 = 1.0 / l1_m;
    let k2 = 1.0 / l2_m;
    let total = k1 + k2;
    if total < 1e-9 {
        return (0.5, 0.5);
    }
    (k1 / total, k2 / total)
}

/// Neighbor-side support moment and perpendicular span for a pair.
///
/// Two-way neighbors read their raw opposite-edge moment and the net
/// span keyed by the initiator's edge axis; one-way neighbors use their
/// chain support moment and shorter gross dimension.
fn neighbor_moment_and_span(
    system: &SlabSystem,
    pass: &MomentPass,
    neighbor: SlabId,
    neighbor_kind: SlabKind,
    edge: Edge,
) -> Option<(f64, f64)> {
    match neighbor_kind {
        SlabKind::TwoWay => {
            let Some(Ok(PanelMoments::TwoWay(tm))) = pass.moments.get(&neighbor) else {
                return None;
            };
            let m = tm.support_moment_on_edge(edge.opposite())?;
            Some((m.abs(), tm.net_span_for_edge(edge)))
        }
        SlabKind::OneWay => {
            let Some(Ok(PanelMoments::OneWay(om))) = pass.moments.get(&neighbor) else {
                return None;
            };
            let m = om.m_neg_min?;
            let slab = system.slab(neighbor)?;
            Some((m.abs(), slab.short_gross_m()))
        }
        SlabKind::Balcony => None,
    }
}

/// Run the balancing pass over the raw pass-1 moments.
///
/// Needs every panel's raw result, which is why this is a separate pass
/// and not folded into the per-panel solvers.
pub fn balance_support_moments(system: &SlabSystem, pass: &MomentPass) -> BalanceOutcome {
    let mut outcome = BalanceOutcome::default();
    let mut edge_design: BTreeMap<(SlabId, Edge), f64> = BTreeMap::new();
    let mut processed: HashSet<(SlabId, SlabId, Edge)> = HashSet::new();

    for (&sid, result) in &pass.moments {
        let Ok(PanelMoments::TwoWay(tm)) = result else {
            continue;
        };
        if system
            .slab(sid)
            .map(|s| s.kind != SlabKind::TwoWay)
            .unwrap_or(true)
        {
            continue;
        }

        for edge in Edge::ALL {
            let Some((neighbor, neighbor_kind)) = system.first_neighbor_on_edge(sid, edge) else {
                continue;
            };
            if !matches!(neighbor_kind, SlabKind::TwoWay | SlabKind::OneWay) {
                continue;
            }

            // Canonical pair key: the edge as seen from the smaller id
            let key = if sid < neighbor {
                (sid, neighbor, edge)
            } else {
                (neighbor, sid, edge.opposite())
            };
            if !processed.insert(key) {
                continue;
            }

            let Some(m1) = tm.support_moment_on_edge(edge) else {
                continue;
            };
            let m1 = m1.abs();
            let Some((m2, l2)) =
                neighbor_moment_and_span(system, pass, neighbor, neighbor_kind, edge)
            else {
                continue;
            };
            let l1 = tm.net_span_for_edge(edge);

            let m_max = m1.max(m2);
            let m_min = m1.min(m2);
            outcome.log.push(format!(
                "Edge {sid}:{edge} <-> {neighbor}:{opp}: M1 = {m1:.3}, M2 = {m2:.3}",
                opp = edge.opposite()
            ));

            let (m1_new, m2_new, redistributed) = if m_min < BALANCE_THRESHOLD * m_max {
                let delta = m_max - m_min;
                let (df1, df2) = stiffness_distribution(l1, l2);
                let distribute = DISTRIBUTE_SHARE * delta;
                let (m1_new, m2_new) = if m1 > m2 {
                    (m1 - distribute * df1, m2 + distribute * df2)
                } else {
                    (m1 + distribute * df1, m2 - distribute * df2)
                };
                outcome.log.push(format!(
                    "  M_min < 0.8 x M_max: distribute {distribute:.3} \
                     (DF1 = {df1:.3}, DF2 = {df2:.3}) -> M1 = {m1_new:.3}, M2 = {m2_new:.3}"
                ));
                (m1_new, m2_new, true)
            } else {
                outcome.log.push(format!(
                    "  M_min >= 0.8 x M_max: larger value governs ({m_max:.3})"
                ));
                (m1, m2, false)
            };
            let design_moment = m1_new.max(m2_new);
            outcome.log.push(format!("  Design moment: {design_moment:.3} kNm/m"));

            edge_design.insert((sid, edge), design_moment);
            edge_design.insert((neighbor, edge.opposite()), design_moment);
            outcome.edges.push(BalancedEdge {
                a: sid,
                a_edge: edge,
                b: neighbor,
                b_edge: edge.opposite(),
                m_a: m1,
                m_b: m2,
                m_a_adjusted: m1_new,
                m_b_adjusted: m2_new,
                design_moment,
                redistributed,
            });
        }
    }

    // Write balanced values back onto two-way panels: the first balanced
    // edge of each axis pair replaces that axis' support moment
    for (&sid, result) in &pass.moments {
        let Ok(PanelMoments::TwoWay(tm)) = result else {
            continue;
        };
        let mut adjusted = tm.clone();
        for edge in [Edge::Left, Edge::Right] {
            if let Some(&m) = edge_design.get(&(sid, edge)) {
                adjusted.mx_neg = Some(-m);
                break;
            }
        }
        for edge in [Edge::Top, Edge::Bottom] {
            if let Some(&m) = edge_design.get(&(sid, edge)) {
                adjusted.my_neg = Some(-m);
                break;
            }
        }
        outcome.adjusted.insert(sid, adjusted);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{compute_raw_moments, DesignOptions};
    use crate::grid::{Slab, SlabSystem};

    /// Two unequal two-way panels sharing a full vertical edge
    fn unequal_pair() -> (SlabSystem, SlabId, SlabId) {
        let mut system = SlabSystem::new(64, 24);
        // 4 x 6 m panel
        let a = system
            .add_slab(
                Slab::new("D1", SlabKind::TwoWay, (0, 0), (15, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        // 8 x 6 m panel
        let b = system
            .add_slab(
                Slab::new("D2", SlabKind::TwoWay, (16, 0), (47, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        (system, a, b)
    }

    #[test]
    fn test_stiffness_distribution() {
        let (df1, df2) = stiffness_distribution(4.0, 4.0);
        assert!((df1 - 0.5).abs() < 1e-12);
        assert!((df2 - 0.5).abs() < 1e-12);

        // Shorter (stiffer) side takes the larger share
        let (df1, df2) = stiffness_distribution(2.0, 4.0);
        assert!((df1 - 2.0 / 3.0).abs() < 1e-12);
        assert!((df2 - 1.0 / 3.0).abs() < 1e-12);

        // Degenerate lengths fall back to an even split
        assert_eq!(stiffness_distribution(0.0, 4.0), (0.5, 0.5));
    }

    #[test]
    fn test_redistribution_reduces_gap() {
        let (system, a, b) = unequal_pair();
        let pass = compute_raw_moments(&system, &DesignOptions::default());
        let outcome = balance_support_moments(&system, &pass);

        assert_eq!(outcome.edges.len(), 1);
        let edge = &outcome.edges[0];
        assert!(edge.redistributed, "moments {:.3}/{:.3} should trigger", edge.m_a, edge.m_b);

        // The rule strictly narrows |M1 - M2| and designs to the larger
        // adjusted value
        let raw_gap = (edge.m_a - edge.m_b).abs();
        let adjusted_gap = (edge.m_a_adjusted - edge.m_b_adjusted).abs();
        let m_max = edge.m_a.max(edge.m_b);
        let m_min = edge.m_a.min(edge.m_b);
        assert!(m_min < 0.8 * m_max);
        assert!(adjusted_gap < raw_gap);
        assert!(
            (edge.design_moment - edge.m_a_adjusted.max(edge.m_b_adjusted)).abs() < 1e-12
        );
        assert!(edge.design_moment < m_max);
        assert!(edge.design_moment > m_min);

        // Both panels' cached X support moments carry the shared value
        let adj_a = &outcome.adjusted[&a];
        let adj_b = &outcome.adjusted[&b];
        assert!((adj_a.mx_neg.unwrap() + edge.design_moment).abs() < 1e-9);
        assert!((adj_b.mx_neg.unwrap() + edge.design_moment).abs() < 1e-9);
        // Y support moments are untouched
        let raw_a = match &pass.moments[&a] {
            Ok(PanelMoments::TwoWay(tm)) => tm.clone(),
            _ => panic!("expected two-way moments"),
        };
        assert_eq!(adj_a.my_neg, raw_a.my_neg);
    }

    #[test]
    fn test_noop_within_threshold() {
        // Identical panels: equal moments, no redistribution
        let mut system = SlabSystem::new(64, 24);
        let a = system
            .add_slab(
                Slab::new("D1", SlabKind::TwoWay, (0, 0), (15, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        let b = system
            .add_slab(
                Slab::new("D2", SlabKind::TwoWay, (16, 0), (31, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        let pass = compute_raw_moments(&system, &DesignOptions::default());
        let outcome = balance_support_moments(&system, &pass);

        assert_eq!(outcome.edges.len(), 1);
        let edge = &outcome.edges[0];
        assert!(!edge.redistributed);
        assert!((edge.design_moment - edge.m_a.max(edge.m_b)).abs() < 1e-12);

        let raw_a = match &pass.moments[&a] {
            Ok(PanelMoments::TwoWay(tm)) => tm.clone(),
            _ => panic!("expected two-way moments"),
        };
        // The written-back value equals the raw magnitude
        let adj_a = &outcome.adjusted[&a];
        assert!((adj_a.mx_neg.unwrap().abs() - raw_a.mx_neg.unwrap().abs()).abs() < 1e-9);
        let _ = b;
    }

    #[test]
    fn test_pair_processed_once() {
        let (system, _a, _b) = unequal_pair();
        let pass = compute_raw_moments(&system, &DesignOptions::default());
        let outcome = balance_support_moments(&system, &pass);
        // One shared edge -> exactly one balanced pair, despite both
        // panels seeing it
        assert_eq!(outcome.edges.len(), 1);
        assert!(!outcome.log.is_empty());
    }

    #[test]
    fn test_oneway_neighbor_participates_but_keeps_own_result() {
        let mut system = SlabSystem::new(64, 24);
        let two = system
            .add_slab(
                Slab::new("D1", SlabKind::TwoWay, (0, 0), (15, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        // One-way neighbor sharing the vertical edge: spans 2.0 m along X
        let one = system
            .add_slab(
                Slab::new("D2", SlabKind::OneWay, (16, 0), (23, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        let pass = compute_raw_moments(&system, &DesignOptions::default());
        let outcome = balance_support_moments(&system, &pass);

        assert_eq!(outcome.edges.len(), 1);
        let edge = &outcome.edges[0];
        assert_eq!((edge.a, edge.b), (two, one));
        // The shared design moment is recorded for both sides
        assert!(outcome.design_moment_for(two, Edge::Right).is_some());
        assert!(outcome.design_moment_for(one, Edge::Left).is_some());
        // But only the two-way panel's cached moments are rewritten
        assert!(outcome.adjusted.contains_key(&two));
        assert!(!outcome.adjusted.contains_key(&one));
    }

    #[test]
    fn test_balcony_neighbor_ignored() {
        let mut system = SlabSystem::new(64, 24);
        system
            .add_slab(
                Slab::new("D1", SlabKind::TwoWay, (0, 0), (15, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        system
            .add_slab(
                Slab::new("B1", SlabKind::Balcony, (16, 0), (21, 23))
                    .with_pitch(0.25, 0.25)
                    .with_load(10.0),
            )
            .unwrap();
        let pass = compute_raw_moments(&system, &DesignOptions::default());
        let outcome = balance_support_moments(&system, &pass);
        assert!(outcome.edges.is_empty());
    }
}
