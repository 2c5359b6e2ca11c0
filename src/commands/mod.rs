//! Command implementations for the ctxpack CLI

pub mod bundle;
pub mod completions;
pub mod explain;
pub mod scan;
pub mod version;
