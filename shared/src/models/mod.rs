//! Data models
//!
//! Shared between floor-server and frontend (via API).
//! Table ids are opaque strings (UUID v4 when generated server-side).

pub mod floor_layout;
pub mod floor_stats;
pub mod floor_table;

// Re-exports
pub use floor_layout::*;
pub use floor_stats::*;
pub use floor_table::*;
