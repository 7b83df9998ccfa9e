pub mod dates;
pub mod export;
pub mod ledger;
pub mod money;
pub mod transaction;

pub use ledger::Ledger;
pub use money::Money;
pub use transaction::{Origin, Transaction};
