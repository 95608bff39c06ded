pub mod expense_aggregator;
pub mod incentive_cascade;
pub mod ledger_service;
pub mod membership_ledger;
pub mod settlement_calculator;

pub use expense_aggregator::ExpenseAggregator;
pub use incentive_cascade::IncentiveCascade;
pub use ledger_service::{GroupSnapshot, LedgerService};
pub use membership_ledger::MembershipLedger;
pub use settlement_calculator::SettlementCalculator;
