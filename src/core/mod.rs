pub mod connector;
pub mod report;

pub use crate::domain::bank_transaction::{BankTransaction, BankTransactionLine};
pub use crate::domain::ports::ProcessXml;
pub use crate::utils::error::Result;
pub use connector::{BankTransactionApiConnector, ItemResult};
pub use report::SendReport;
