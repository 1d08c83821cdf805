//! Route tree.
//!
//! ```text
//! GET  /health        liveness
//! POST /run           process every eligible row of a sheet
//! POST /regenerate    regenerate specific rows
//! ```

pub mod health;
pub mod runs;
