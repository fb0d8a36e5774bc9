//! # ghostline-cost
//!
//! C1 CostLedger. Records every model invocation; fails closed so a
//! storage failure never aborts generation (spec §4.1, §7: "CostLedger
//! errors are always swallowed").

pub mod errors;
pub mod ledger;
pub mod pricing;
pub mod sqlite_ledger;
pub mod summary;

pub use errors::{CostError, CostResult};
pub use ledger::CostLedger;
pub use sqlite_ledger::SqliteCostLedger;
pub use summary::{CostFilter, CostSummary};
