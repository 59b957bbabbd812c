//! Route handlers.

pub mod api;
pub mod artifacts;
pub mod page;
pub mod report;
