//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of a
//! shared cache.
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries at the configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
