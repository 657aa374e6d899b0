//! # slab_core - Floor Slab Analysis & Reinforcement Design Engine
//!
//! `slab_core` lays reinforced-concrete floor panels out on an integer
//! grid, computes their bending moments by the code-table method
//! (one-way continuous strips, two-way coefficient slabs, cantilever
//! balconies), balances support moments between adjoining panels, and
//! selects constructible reinforcement from a bar catalog. All inputs
//! and outputs are JSON-serializable, so external editors and renderers
//! exchange plain data contracts with the engine.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every result is a pure function of the grid state
//! - **JSON-First**: all contract types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, caught per panel
//! - **Explicit ordering**: raw moments, then balancing, then rebar -
//!   the two-pass dependency is visible in the pipeline types
//!
//! ## Quick Start
//!
//! ```rust
//! use slab_core::calculations::{compute_all, DesignOptions};
//! use slab_core::grid::{Slab, SlabKind, SlabSystem};
//!
//! let mut system = SlabSystem::new(32, 32);
//! system
//!     .add_slab(
//!         Slab::new("D1", SlabKind::OneWay, (0, 0), (15, 11))
//!             .with_pitch(0.25, 0.25)
//!             .with_load(10.0),
//!     )
//!     .unwrap();
//!
//! let report = compute_all(&system, &DesignOptions::default()).unwrap();
//! assert!(report.all_passed());
//! ```
//!
//! ## Modules
//!
//! - [`grid`] - placement grid, panels, adjacency and beam queries
//! - [`calculations`] - solvers, balancer, and the batch orchestrator
//! - [`materials`] - concrete/steel grades and the K-ks design chart
//! - [`rebar`] - bar catalog and selection search
//! - [`project`] - root serializable container
//! - [`errors`] - structured error types

pub mod calculations;
pub mod errors;
pub mod grid;
pub mod materials;
pub mod project;
pub mod rebar;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute_all, BatchReport, DesignOptions, DesignResult, ResultCache};
pub use errors::{SlabError, SlabResult};
pub use grid::{Slab, SlabId, SlabKind, SlabSystem};
pub use project::FloorProject;
pub use rebar::RebarChoice;
