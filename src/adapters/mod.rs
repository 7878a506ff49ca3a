// Adapters layer: concrete transports for the ProcessXml port.

pub mod soap;
