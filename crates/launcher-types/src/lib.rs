pub mod account;
pub mod call;
pub mod outcome;
pub mod receipt;
pub mod request;

pub use account::*;
pub use call::*;
pub use outcome::*;
pub use receipt::*;
pub use request::*;
