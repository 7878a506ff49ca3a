pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod xml;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::soap::{Credentials, SoapProcessXmlClient};
pub use config::TwinfieldConfig;
pub use crate::core::{BankTransactionApiConnector, ItemResult, SendReport};
pub use domain::bank_transaction::{BankTransaction, BankTransactionLine};
pub use domain::model::{Currency, DebitCredit, Destiny, LineType, Money, Office};
pub use domain::ports::ProcessXml;
pub use utils::error::{Result, TwinfieldError};
pub use xml::{BankTransactionsDocument, Response};
