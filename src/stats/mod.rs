//! The statistics engine.
//!
//! Every routine here is a pure function over plain numeric samples or
//! record slices, recomputed on demand. Degenerate input (empty samples,
//! zero variance, too few groups) produces a defined neutral result rather
//! than an error:
//!
//! - [`descriptive`]: mean, median, population std, nearest-rank quartiles
//! - [`correlation`]: tie-aware Spearman rank correlation
//! - [`anova`]: one-way F-test with a coarse significance band
//! - [`pca`]: two-component PCA by power iteration and deflation
//! - [`grouping`]: grade comparisons built from the routines above

pub mod anova;
pub mod correlation;
pub mod descriptive;
pub mod grouping;
pub mod pca;

pub use anova::{anova, AnovaResult, Significance};
pub use correlation::spearman;
pub use descriptive::{describe, Summary};
pub use pca::{pca, PcaResult};
