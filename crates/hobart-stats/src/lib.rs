#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod chi_square;
pub mod cholesky;
pub mod covariance;
pub mod percentile;
pub mod tables;

// Re-export main functions
pub use chi_square::chi_square_cdf;
pub use cholesky::cholesky;
pub use covariance::{correlation_from_covariance, sample_covariance, symmetrize};
pub use percentile::{percentile_index, sorted_tail_value};
pub use tables::{time_scaling_factor, trading_days, z_score};
