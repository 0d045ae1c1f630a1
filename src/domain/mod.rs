pub mod catalog;
pub mod error;
pub mod setting;

pub use catalog::*;
pub use error::*;
pub use setting::*;
