//! Built-in rules.
//!
//! Each rule inspects the solc JSON AST through the query engine and reports
//! findings with resolved source locations. One file per rule.

pub mod balance_equality;
pub mod delegatecall;
pub mod deprecated;
pub mod low_level_call;
pub mod reentrancy;
pub mod timestamp_dependence;
pub mod tx_origin;

pub use balance_equality::BalanceEqualityRule;
pub use delegatecall::DelegatecallRule;
pub use deprecated::DeprecatedConstructsRule;
pub use low_level_call::LowLevelCallRule;
pub use reentrancy::ReentrancyRule;
pub use timestamp_dependence::TimestampDependenceRule;
pub use tx_origin::TxOriginRule;
