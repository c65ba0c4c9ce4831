//! Data models for the imaging pipeline

mod operation;
mod request;
mod result;

pub use operation::*;
pub use request::*;
pub use result::*;
