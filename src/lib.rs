//! Grade Lens: the data and statistics engine behind an interactive story
//! about secondary-school mathematics performance.
//!
//! ```text
//!   data::loader ──► Dataset ──► state::DataStore ──► filtered records
//!                                      │
//!                                      ▼
//!                    stats::{describe, spearman, anova, pca, grouping}
//! ```
//!
//! Everything a chart needs is computed here and handed over as plain,
//! serializable values; nothing in this crate draws.

pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod stats;
pub mod tree;
