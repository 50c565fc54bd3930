#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod report;

// Re-export main types from sub-crates
pub use hobart_methods as methods;
pub use hobart_model as model;
pub use hobart_risk as risk;
pub use hobart_stats as stats;

pub use engine::{EngineConfig, VarEngine};
pub use hobart_methods::MonteCarloConfig;
pub use hobart_model::{
    AssetClass, ConfidenceLevel, Position, ReturnMatrix, RiskError, TimeHorizon, VarMethod,
    VarRequest, VarResult,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
