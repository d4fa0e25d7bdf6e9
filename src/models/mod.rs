mod budget;
mod transaction;

pub use budget::Budget;
pub use transaction::{Transaction, TxStatus};

#[cfg(test)]
mod tests;
