//! StickyBoard library
//!
//! Projects hold boards, boards hold freeform sticky notes. This library
//! exposes the storage layer and the HTTP router so the binary and the
//! integration tests share one code path.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
