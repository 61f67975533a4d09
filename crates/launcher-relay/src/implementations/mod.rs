pub mod http;

pub use http::{HttpRelay, RelaySettings};
