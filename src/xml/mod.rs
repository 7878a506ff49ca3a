// Twinfield XML dialect: request writer, response document and response mapping.

pub mod element;
pub mod mapper;
pub mod response;
pub mod writer;

pub use element::Element;
pub use mapper::BankTransactionMapper;
pub use response::Response;
pub use writer::BankTransactionsDocument;
