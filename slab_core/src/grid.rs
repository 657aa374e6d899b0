//! # Grid Placement Model & Adjacency Analyzer
//!
//! Rectangular slab panels placed on an integer grid. Panels live in an
//! arena indexed by [`SlabId`]; cell ownership is a dense row-major array
//! of optional ids, which keeps every neighbor query O(edge length)
//! without a pointer graph. Beam edges are independent grid-edge markers,
//! not tied to any single panel.
//!
//! ## Invariants
//!
//! - Panel bboxes are pairwise cell-disjoint; placement rejects overlaps.
//! - The ownership array always equals the union of live panel bboxes
//!   (placement fills it, deletion clears it).
//! - Panel geometry is immutable after placement.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::grid::{Axis, Side, Slab, SlabKind, SlabSystem};
//!
//! let mut system = SlabSystem::new(16, 16);
//! let a = system
//!     .add_slab(Slab::new("D1", SlabKind::TwoWay, (0, 0), (7, 7)))
//!     .unwrap();
//! let b = system
//!     .add_slab(Slab::new("D2", SlabKind::TwoWay, (8, 0), (15, 7)))
//!     .unwrap();
//!
//! assert_eq!(system.neighbors_on_side(a, Axis::X, Side::End), vec![b]);
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{SlabError, SlabResult};

/// Net-span floor: a clear span never drops below this (m)
pub const MIN_NET_SPAN_M: f64 = 0.05;

// =============================================================================
// AXES, SIDES, EDGES
// =============================================================================

/// Grid axis. `X` indexes columns (i), `Y` indexes rows (j).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, X first
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// The other axis
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Which end of an axis interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Start,
    End,
}

/// One of the four bbox edges of a panel.
///
/// `Left`/`Right` sit on the X axis sides, `Top`/`Bottom` on the Y axis
/// sides (`Top` is the smaller-j side). The declaration order is load
/// bearing: heuristics that scan "the four edges" do so in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// All edges in canonical scan order
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// The axis whose sides this edge sits on
    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::X,
            Edge::Top | Edge::Bottom => Axis::Y,
        }
    }

    /// Which side of its axis this edge is
    pub fn side(self) -> Side {
        match self {
            Edge::Left | Edge::Top => Side::Start,
            Edge::Right | Edge::Bottom => Side::End,
        }
    }

    /// The facing edge on the opposite side
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }

    /// Edge from an (axis, side) pair
    pub fn from_axis_side(axis: Axis, side: Side) -> Edge {
        match (axis, side) {
            (Axis::X, Side::Start) => Edge::Left,
            (Axis::X, Side::End) => Edge::Right,
            (Axis::Y, Side::Start) => Edge::Top,
            (Axis::Y, Side::End) => Edge::Bottom,
        }
    }

    /// Short display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Edge::Left => "L",
            Edge::Right => "R",
            Edge::Top => "T",
            Edge::Bottom => "B",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// SLAB
// =============================================================================

/// Structural behavior of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SlabKind {
    /// Spans load in one direction, analyzed as a continuous beam strip
    OneWay,
    /// Spans both directions, analyzed via coefficient tables
    #[default]
    TwoWay,
    /// Cantilever balcony fixed along one edge
    Balcony,
}

impl SlabKind {
    /// All kinds for UI selection
    pub const ALL: [SlabKind; 3] = [SlabKind::OneWay, SlabKind::TwoWay, SlabKind::Balcony];

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SlabKind::OneWay => "One-way",
            SlabKind::TwoWay => "Two-way",
            SlabKind::Balcony => "Balcony",
        }
    }
}

impl fmt::Display for SlabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Arena index of a panel within its [`SlabSystem`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct SlabId(pub u32);

impl fmt::Display for SlabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A rectangular slab panel on the placement grid.
///
/// The bbox `(i0, j0)..=(i1, j1)` is inclusive in cells. Gross size is
/// cell count times grid pitch. Geometry is immutable once placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    /// User label (e.g. "D1")
    pub label: String,

    /// Structural behavior
    pub kind: SlabKind,

    /// First column of the bbox
    pub i0: usize,
    /// First row of the bbox
    pub j0: usize,
    /// Last column of the bbox (inclusive)
    pub i1: usize,
    /// Last row of the bbox (inclusive)
    pub j1: usize,

    /// Grid pitch along X (m per cell)
    pub dx_m: f64,
    /// Grid pitch along Y (m per cell)
    pub dy_m: f64,

    /// Design load per area (kN/m2)
    pub load_kn_m2: f64,
    /// Width of the analyzed strip (m)
    pub strip_width_m: f64,
}

impl Slab {
    /// Create a panel from two corner cells (normalized to min/max)
    pub fn new(label: impl Into<String>, kind: SlabKind, a: (usize, usize), b: (usize, usize)) -> Self {
        Self {
            label: label.into(),
            kind,
            i0: a.0.min(b.0),
            j0: a.1.min(b.1),
            i1: a.0.max(b.0),
            j1: a.1.max(b.1),
            dx_m: 0.25,
            dy_m: 0.25,
            load_kn_m2: 10.0,
            strip_width_m: 1.0,
        }
    }

    /// Set the grid pitch (m per cell)
    pub fn with_pitch(mut self, dx_m: f64, dy_m: f64) -> Self {
        self.dx_m = dx_m;
        self.dy_m = dy_m;
        self
    }

    /// Set the design load (kN/m2)
    pub fn with_load(mut self, load_kn_m2: f64) -> Self {
        self.load_kn_m2 = load_kn_m2;
        self
    }

    /// Set the strip width (m)
    pub fn with_strip_width(mut self, strip_width_m: f64) -> Self {
        self.strip_width_m = strip_width_m;
        self
    }

    /// Inclusive bbox as (i0, j0, i1, j1)
    pub fn bbox(&self) -> (usize, usize, usize, usize) {
        (self.i0, self.j0, self.i1, self.j1)
    }

    /// Size in cells (columns, rows)
    pub fn size_cells(&self) -> (usize, usize) {
        (self.i1 - self.i0 + 1, self.j1 - self.j0 + 1)
    }

    /// Gross size in metres (Lx, Ly)
    pub fn size_m_gross(&self) -> (f64, f64) {
        let (nx, ny) = self.size_cells();
        (nx as f64 * self.dx_m, ny as f64 * self.dy_m)
    }

    /// Shorter gross dimension (m)
    pub fn short_gross_m(&self) -> f64 {
        let (lx, ly) = self.size_m_gross();
        lx.min(ly)
    }

    /// Axis along which a one-way strip (or balcony cantilever) spans:
    /// the axis of the shorter gross dimension, Y on a tie.
    pub fn span_axis(&self) -> Axis {
        let (lx, ly) = self.size_m_gross();
        if lx < ly {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// Bbox interval along an axis, as (start cell, end cell) inclusive
    pub fn interval(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::X => (self.i0, self.i1),
            Axis::Y => (self.j0, self.j1),
        }
    }

    /// Whether the bbox contains a cell
    pub fn contains_cell(&self, i: usize, j: usize) -> bool {
        i >= self.i0 && i <= self.i1 && j >= self.j0 && j <= self.j1
    }

    /// Validate panel parameters
    pub fn validate(&self) -> SlabResult<()> {
        if self.dx_m <= 0.0 || self.dy_m <= 0.0 {
            return Err(SlabError::invalid_input(
                "pitch",
                format!("({}, {})", self.dx_m, self.dy_m),
                "Grid pitch must be positive",
            ));
        }
        if self.load_kn_m2 < 0.0 {
            return Err(SlabError::invalid_input(
                "load_kn_m2",
                self.load_kn_m2.to_string(),
                "Design load must not be negative",
            ));
        }
        if self.strip_width_m <= 0.0 {
            return Err(SlabError::invalid_input(
                "strip_width_m",
                self.strip_width_m.to_string(),
                "Strip width must be positive",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// EDGE COVERAGE
// =============================================================================

/// How much of a panel edge touches neighboring panels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeCoverage {
    /// Every cell along the edge touches some neighbor
    pub full: bool,
    /// At least one cell touches a neighbor
    pub any: bool,
    /// Fraction of edge cells touching a neighbor
    pub ratio: f64,
}

/// Per-edge coverage of all four edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeContinuity {
    pub left: EdgeCoverage,
    pub right: EdgeCoverage,
    pub top: EdgeCoverage,
    pub bottom: EdgeCoverage,
}

impl EdgeContinuity {
    /// Coverage for one edge
    pub fn coverage(&self, edge: Edge) -> EdgeCoverage {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    /// Full-coverage flags (L, R, T, B) - the two-way continuity notion
    pub fn full_flags(&self) -> EdgeFlags {
        EdgeFlags {
            left: self.left.full,
            right: self.right.full,
            top: self.top.full,
            bottom: self.bottom.full,
        }
    }

    /// Any-coverage flags (L, R, T, B) - the one-way continuity notion
    pub fn any_flags(&self) -> EdgeFlags {
        EdgeFlags {
            left: self.left.full || self.left.any,
            right: self.right.full || self.right.any,
            top: self.top.full || self.top.any,
            bottom: self.bottom.full || self.bottom.any,
        }
    }
}

/// One boolean per panel edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeFlags {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl EdgeFlags {
    /// Flag for one edge
    pub fn get(&self, edge: Edge) -> bool {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }
}

// =============================================================================
// SLAB SYSTEM
// =============================================================================

/// The placement grid: panel arena, cell ownership, and beam edge sets.
///
/// Beam sets mark grid edges carrying a drawn beam: `v_beams` holds
/// `(g, j)` for a vertical beam crossing row `j` on X-gridline `g`,
/// `h_beams` holds `(i, g)` for a horizontal beam crossing column `i` on
/// Y-gridline `g`. Gridline 0 never counts as beamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlabSystem {
    nx: usize,
    ny: usize,
    slabs: Vec<Option<Slab>>,
    cells: Vec<Option<SlabId>>,
    v_beams: HashSet<(usize, usize)>,
    h_beams: HashSet<(usize, usize)>,
}

impl SlabSystem {
    /// Create an empty grid of `nx` x `ny` cells
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            slabs: Vec::new(),
            cells: vec![None; nx * ny],
            v_beams: HashSet::new(),
            h_beams: HashSet::new(),
        }
    }

    /// Grid width in cells
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Grid height in cells
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of live panels
    pub fn len(&self) -> usize {
        self.slabs.iter().filter(|s| s.is_some()).count()
    }

    /// Whether no panels are placed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// Owner of a cell, if any (None outside the grid)
    pub fn owner_of(&self, i: usize, j: usize) -> Option<SlabId> {
        if i >= self.nx || j >= self.ny {
            return None;
        }
        self.cells[self.cell_index(i, j)]
    }

    /// Borrow a panel by id
    pub fn slab(&self, id: SlabId) -> Option<&Slab> {
        self.slabs.get(id.0 as usize).and_then(|s| s.as_ref())
    }

    /// Borrow a panel by id, as a structured error on a dead id
    pub fn get_slab(&self, id: SlabId) -> SlabResult<&Slab> {
        self.slab(id).ok_or(SlabError::UnknownSlab { id: id.0 })
    }

    /// Live panel ids in ascending order
    pub fn slab_ids(&self) -> Vec<SlabId> {
        self.slabs
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| s.as_ref().map(|_| SlabId(idx as u32)))
            .collect()
    }

    /// Iterate live panels in id order
    pub fn iter(&self) -> impl Iterator<Item = (SlabId, &Slab)> {
        self.slabs
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| s.as_ref().map(|slab| (SlabId(idx as u32), slab)))
    }

    /// Place a panel, claiming its cells.
    ///
    /// Rejects panels outside the grid or overlapping a live panel.
    /// Ids are never reused.
    pub fn add_slab(&mut self, slab: Slab) -> SlabResult<SlabId> {
        slab.validate()?;
        if slab.i1 >= self.nx || slab.j1 >= self.ny {
            return Err(SlabError::OutOfGrid {
                label: slab.label.clone(),
                nx: self.nx,
                ny: self.ny,
            });
        }
        for j in slab.j0..=slab.j1 {
            for i in slab.i0..=slab.i1 {
                if let Some(other) = self.cells[self.cell_index(i, j)] {
                    let other_label = self
                        .slab(other)
                        .map(|s| s.label.clone())
                        .unwrap_or_else(|| other.to_string());
                    return Err(SlabError::OverlappingPlacement {
                        label: slab.label.clone(),
                        other: other_label,
                        i,
                        j,
                    });
                }
            }
        }

        let id = SlabId(self.slabs.len() as u32);
        for j in slab.j0..=slab.j1 {
            for i in slab.i0..=slab.i1 {
                let idx = self.cell_index(i, j);
                self.cells[idx] = Some(id);
            }
        }
        self.slabs.push(Some(slab));
        Ok(id)
    }

    /// Delete a panel, releasing its cells
    pub fn remove_slab(&mut self, id: SlabId) -> SlabResult<Slab> {
        let slab = self.get_slab(id)?.clone();
        for j in slab.j0..=slab.j1 {
            for i in slab.i0..=slab.i1 {
                let idx = self.cell_index(i, j);
                if self.cells[idx] == Some(id) {
                    self.cells[idx] = None;
                }
            }
        }
        self.slabs[id.0 as usize] = None;
        Ok(slab)
    }

    // =========================================================================
    // Beam edge sets
    // =========================================================================

    /// Mark a vertical beam segment on X-gridline `g` at row `j`
    pub fn mark_v_beam(&mut self, g: usize, j: usize) {
        self.v_beams.insert((g, j));
    }

    /// Mark a horizontal beam segment on Y-gridline `g` at column `i`
    pub fn mark_h_beam(&mut self, i: usize, g: usize) {
        self.h_beams.insert((i, g));
    }

    /// Mark a vertical beam line on gridline `g` across rows `j0..=j1`
    pub fn mark_v_beam_line(&mut self, g: usize, j0: usize, j1: usize) {
        for j in j0..=j1 {
            self.v_beams.insert((g, j));
        }
    }

    /// Mark a horizontal beam line on gridline `g` across columns `i0..=i1`
    pub fn mark_h_beam_line(&mut self, g: usize, i0: usize, i1: usize) {
        for i in i0..=i1 {
            self.h_beams.insert((i, g));
        }
    }

    /// Remove all beam markers
    pub fn clear_beams(&mut self) {
        self.v_beams.clear();
        self.h_beams.clear();
    }

    /// Whether gridline `g` of `axis` carries a beam across the panel's
    /// full perpendicular extent. Gridline 0 and gridlines past the grid
    /// never count.
    pub fn is_beam_gridline_for_slab(&self, id: SlabId, axis: Axis, g: usize) -> bool {
        let Some(slab) = self.slab(id) else {
            return false;
        };
        match axis {
            Axis::X => {
                if g == 0 || g > self.nx {
                    return false;
                }
                (slab.j0..=slab.j1).all(|j| self.v_beams.contains(&(g, j)))
            }
            Axis::Y => {
                if g == 0 || g > self.ny {
                    return false;
                }
                (slab.i0..=slab.i1).all(|i| self.h_beams.contains(&(i, g)))
            }
        }
    }

    /// Interior gridlines of the panel (along `axis`) carrying a
    /// full-extent beam - extra support lines inside a single panel
    pub fn support_gridlines_from_beams(&self, id: SlabId, axis: Axis) -> Vec<usize> {
        let Some(slab) = self.slab(id) else {
            return Vec::new();
        };
        let (start, end) = slab.interval(axis);
        (start + 1..=end)
            .filter(|&g| self.is_beam_gridline_for_slab(id, axis, g))
            .collect()
    }

    /// Whether the panel edge sits on an interior gridline carrying a
    /// full-extent beam
    pub fn edge_has_beam(&self, id: SlabId, edge: Edge) -> bool {
        let Some(slab) = self.slab(id) else {
            return false;
        };
        match edge {
            Edge::Left => slab.i0 != 0 && self.is_beam_gridline_for_slab(id, Axis::X, slab.i0),
            Edge::Right => {
                slab.i1 < self.nx - 1 && self.is_beam_gridline_for_slab(id, Axis::X, slab.i1 + 1)
            }
            Edge::Top => slab.j0 != 0 && self.is_beam_gridline_for_slab(id, Axis::Y, slab.j0),
            Edge::Bottom => {
                slab.j1 < self.ny - 1 && self.is_beam_gridline_for_slab(id, Axis::Y, slab.j1 + 1)
            }
        }
    }

    // =========================================================================
    // Adjacency queries
    // =========================================================================

    /// Distinct panels immediately outside the given bbox side, in scan
    /// order along the edge. Empty at the grid boundary.
    pub fn neighbors_on_side(&self, id: SlabId, axis: Axis, side: Side) -> Vec<SlabId> {
        let Some(slab) = self.slab(id) else {
            return Vec::new();
        };
        let mut found: Vec<SlabId> = Vec::new();
        let mut push = |nb: Option<SlabId>| {
            if let Some(nb) = nb {
                if nb != id && !found.contains(&nb) {
                    found.push(nb);
                }
            }
        };

        match (axis, side) {
            (Axis::X, Side::Start) => {
                if slab.i0 == 0 {
                    return found;
                }
                for j in slab.j0..=slab.j1 {
                    push(self.owner_of(slab.i0 - 1, j));
                }
            }
            (Axis::X, Side::End) => {
                if slab.i1 >= self.nx - 1 {
                    return found;
                }
                for j in slab.j0..=slab.j1 {
                    push(self.owner_of(slab.i1 + 1, j));
                }
            }
            (Axis::Y, Side::Start) => {
                if slab.j0 == 0 {
                    return found;
                }
                for i in slab.i0..=slab.i1 {
                    push(self.owner_of(i, slab.j0 - 1));
                }
            }
            (Axis::Y, Side::End) => {
                if slab.j1 >= self.ny - 1 {
                    return found;
                }
                for i in slab.i0..=slab.i1 {
                    push(self.owner_of(i, slab.j1 + 1));
                }
            }
        }
        found
    }

    /// First neighbor found scanning along an edge, with its kind
    pub fn first_neighbor_on_edge(&self, id: SlabId, edge: Edge) -> Option<(SlabId, SlabKind)> {
        let neighbors = self.neighbors_on_side(id, edge.axis(), edge.side());
        let nb = neighbors.first().copied()?;
        self.slab(nb).map(|s| (nb, s.kind))
    }

    /// Coverage of one panel edge by neighboring panels
    pub fn edge_coverage(&self, id: SlabId, edge: Edge) -> EdgeCoverage {
        let Some(slab) = self.slab(id) else {
            return EdgeCoverage::default();
        };

        let mut total = 0usize;
        let mut covered = 0usize;
        let mut count = |owner: Option<SlabId>| {
            total += 1;
            if owner.is_some() && owner != Some(id) {
                covered += 1;
            }
        };

        match edge {
            Edge::Left => {
                if slab.i0 == 0 {
                    return EdgeCoverage::default();
                }
                for j in slab.j0..=slab.j1 {
                    count(self.owner_of(slab.i0 - 1, j));
                }
            }
            Edge::Right => {
                if slab.i1 >= self.nx - 1 {
                    return EdgeCoverage::default();
                }
                for j in slab.j0..=slab.j1 {
                    count(self.owner_of(slab.i1 + 1, j));
                }
            }
            Edge::Top => {
                if slab.j0 == 0 {
                    return EdgeCoverage::default();
                }
                for i in slab.i0..=slab.i1 {
                    count(self.owner_of(i, slab.j0 - 1));
                }
            }
            Edge::Bottom => {
                if slab.j1 >= self.ny - 1 {
                    return EdgeCoverage::default();
                }
                for i in slab.i0..=slab.i1 {
                    count(self.owner_of(i, slab.j1 + 1));
                }
            }
        }

        EdgeCoverage {
            full: total > 0 && covered == total,
            any: covered > 0,
            ratio: if total > 0 {
                covered as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Coverage of all four edges
    pub fn edge_continuity(&self, id: SlabId) -> EdgeContinuity {
        EdgeContinuity {
            left: self.edge_coverage(id, Edge::Left),
            right: self.edge_coverage(id, Edge::Right),
            top: self.edge_coverage(id, Edge::Top),
            bottom: self.edge_coverage(id, Edge::Bottom),
        }
    }
}

/// Clear span after deducting the local beam width: the full width when
/// both span ends are beamed, half when only one end is, floored at
/// [`MIN_NET_SPAN_M`].
pub fn net_span(gross_m: f64, start_is_beam: bool, end_is_beam: bool, beam_width_m: f64) -> f64 {
    let net = if start_is_beam && end_is_beam {
        gross_m - beam_width_m
    } else if start_is_beam || end_is_beam {
        gross_m - 0.5 * beam_width_m
    } else {
        gross_m
    };
    net.max(MIN_NET_SPAN_M)
}
