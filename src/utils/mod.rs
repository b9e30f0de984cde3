//! Shared infrastructure: arena allocation, logging, math helpers.

pub mod allocator;
pub mod logging;
pub mod math;
