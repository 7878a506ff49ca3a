// Domain layer: value types, bank transaction entities and the transport port.

pub mod bank_transaction;
pub mod model;
pub mod ports;
