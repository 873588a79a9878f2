//! cutlist-core - Cutting plans for aluminium sliding window sections.
//!
//! Window openings are turned into frame, shutter, interlock and track-rail
//! pieces using the deduction constants of a section type, packed onto
//! fixed-length stock bars, and rolled up into per-section and project
//! purchasing summaries.
//!
//! # Example
//!
//! ```no_run
//! use cutlist_core::{calculate_materials, Catalogue, WindowInput};
//!
//! let input: WindowInput = serde_json::from_str(r#"{ "sections": [] }"#).unwrap();
//! let result = calculate_materials(&input, &Catalogue::domal_27mm()).unwrap();
//! println!("{:.2}% wastage", result.combined_summary.wastage_percent);
//! ```
//!
//! Everything here is pure computation: no I/O, no shared state, and the same
//! input always gives byte-identical output.

pub mod calculation;
pub mod catalogue;
pub mod derivation;
pub mod format;
pub mod geometry;
pub mod optimizer;
pub mod summary;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use calculation::calculate_materials;
pub use catalogue::{default_stock_options, Catalogue, SectionConfiguration, SectionLookup, SectionType};
pub use geometry::{FinalDimensions, SectionGeometry};
pub use optimizer::{pack_stock, PackedStock, StockOptimizer};
pub use summary::{combine_summaries, summarize_section};
pub use types::*;
pub use validation::{validate_dimension, validate_section_dimensions, UnitMode};
