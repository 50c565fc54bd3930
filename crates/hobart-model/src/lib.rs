#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod position;
pub mod request;
pub mod result;
pub mod returns;

// Re-export main types
pub use error::RiskError;
pub use position::{AssetClass, Position};
pub use request::{ConfidenceLevel, TimeHorizon, VarMethod, VarParams, VarRequest};
pub use result::{
    BacktestResult, BaseVar, ChristoffersenTest, ComponentVar, IncrementalVar, KupiecTest,
    MarginalVar, TestStatus, VarResult,
};
pub use returns::ReturnMatrix;
