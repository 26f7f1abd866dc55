pub mod port;

pub use port::{list_ports, LineReader, LineSource, SerialLineSource, BAUD_RATES};
