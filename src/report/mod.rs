//! Bundle rendering
//!
//! Turns a `BundleResult` into its on-disk artifacts: a Markdown bundle for
//! pasting into an agent conversation, a JSON twin for tooling, and an
//! explain report that narrates why each file made the cut.

pub mod explain;
pub mod json;
pub mod markdown;

pub use explain::{default_explain_path, write_explain_markdown};
pub use json::{BundleJson, read_bundle_json, write_bundle_json};
pub use markdown::write_bundle_markdown;
