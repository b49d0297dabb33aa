//! Text edit primitives and the edit minimizer used by formatcheck.
//!
//! A formatter hands the checker coarse [`TextChange`]s; [`minimize_changes`]
//! turns them into the smallest [`Finding`]s that still describe the same
//! edit, ready to be reported one by one.

pub mod apply;
pub mod error;
pub mod finding;
pub mod minimize;
pub mod span;

pub use apply::apply_findings;
pub use error::{ChangeError, ChangeResult};
pub use finding::{Finding, FindingKind};
pub use minimize::{minimize_change, minimize_changes};
pub use span::{TextChange, TextSpan};
