//! Session planning on top of generated schedule instants: conflict checks
//! against booked sessions, free-slot search, and multi-tenant batch runs.

pub mod availability;
pub mod batch;
pub mod conflict;
pub mod error;
pub mod planner;
