//! Domain models: lockers, vault documents, extraction results, and
//! service requirement sets.

pub mod bounded_log;
pub mod document;
pub mod enums;
pub mod extracted;
pub mod locker;
pub mod requirement;
pub mod validation;

pub use bounded_log::BoundedLog;
pub use document::*;
pub use enums::*;
pub use extracted::*;
pub use locker::*;
pub use requirement::*;
pub use validation::*;
