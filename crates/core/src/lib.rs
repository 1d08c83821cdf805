//! Domain model and ports for the promptsheet image pipeline.
//!
//! - [`row`] — prompt rows, statuses and lenient parsing from sheet cells.
//! - [`layout`] — fixed sheet layout, A1 ranges and base-column records.
//! - [`ports`] — async traits for the store, asset storage, model and chat.
//! - [`notification`] — pipeline events and the notify-mode filter.

pub mod error;
pub mod layout;
pub mod links;
pub mod naming;
pub mod notification;
pub mod ports;
pub mod prompt;
pub mod row;
pub mod text;

pub use error::CoreError;
