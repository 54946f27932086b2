pub mod audit;
pub mod boundary;
pub mod record;
pub mod row;
pub mod totals;

pub use audit::{audit, AuditFinding};
pub use boundary::GeoBoundary;
pub use record::{Coalition, Level, PartyShare, ResultRecord};
pub use totals::{CoalitionTotal, ResultsDocument, ResultsTable, TurnoutSplit};
