pub mod market;
pub mod response;

pub use market::*;
pub use response::*;
