//! schoolloop library: a scraping client for School Loop student portals
//!
//! This library logs in to `https://<subdomain>.schoolloop.com`, fetches the
//! student home, dropbox and calendar pages, and extracts typed records from
//! their markup: classes, submitted files, current assignments and calendar
//! events.
//!
//! # Example
//!
//! ```no_run
//! use schoolloop::{Config, Session};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     subdomain: "lhs-sfusd-ca".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut session = Session::new(&config)?;
//! if !session.login("jdoe", "secret").await? {
//!     return Err("login rejected".into());
//! }
//! for assignment in session.assignment_list(None).await? {
//!     println!("{}", assignment);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. A session issues one request at a
//! time, so a current-thread runtime is enough.

pub mod config;
mod error_handling;
pub mod export;
pub mod fetch;
pub mod initialization;
pub mod models;
pub mod parse;
pub mod session;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, OutputFormat, Protocol};
pub use error_handling::{InitializationError, PortalError, StructureError};
pub use fetch::{HttpTransport, RedirectInterceptor, Transport};
pub use models::{
    AssignmentRecord, AssignmentStatus, CalendarEvent, CalendarMonth, ClassRecord, DropboxRecord,
    Link,
};
pub use session::{PageKind, Session};
