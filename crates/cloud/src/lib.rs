//! Google Workspace adapters.
//!
//! - [`drive::DriveClient`] — uploads images, shares them publicly, and
//!   locates or creates the daily spreadsheet. Implements
//!   [`AssetStore`](promptsheet_core::ports::AssetStore).
//! - [`sheets::SheetsClient`] — reads and writes prompt rows. Implements
//!   [`PromptStore`](promptsheet_core::ports::PromptStore).
//!
//! Both talk to the REST APIs directly with a bearer token obtained
//! elsewhere ([`auth::AccessToken`]).

pub mod auth;
pub mod drive;
pub mod error;
pub mod sheets;

pub use auth::AccessToken;
pub use drive::DriveClient;
pub use error::CloudError;
pub use sheets::SheetsClient;
