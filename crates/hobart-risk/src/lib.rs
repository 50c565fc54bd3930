#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backtest;
pub mod deadline;
pub mod decomposition;

// Re-export main types
pub use backtest::{christoffersen_test, kupiec_test, run_backtest};
pub use deadline::Deadline;
pub use decomposition::{DecompositionEngine, group_by_asset_class};
