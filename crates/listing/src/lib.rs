//! # dirindex Listing Library
//!
//! This crate provides the root-confined core of the dirindex directory
//! browser: turning an untrusted request path into a location inside a fixed
//! root, describing a directory's visible contents, and opening files for
//! delivery.
//!
//! ## Overview
//!
//! - **Confinement**: lexical normalization plus symlink resolution, both
//!   checked against the root on a component boundary
//! - **Listings**: sorted, deduplicated rows with icon, size, timestamp and link
//! - **Delivery**: inline vs. attachment decision and an open file handle
//! - **Ignore set**: literal names hidden from listings and refused on download
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         requested path (untrusted)      │
//! ├─────────────────────────────────────────┤
//! │             confine()                   │  PathEscape / NotFound
//! ├────────────────────┬────────────────────┤
//! │  build_listing()   │     deliver()      │  Blocked / NotFound
//! ├────────────────────┴────────────────────┤
//! │        ListEntry rows  │  Delivery      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use listing::{DirectoryBrowser, IgnoreSet, Locale, Root};
//!
//! let root = Root::new("/srv/data")?;
//! let browser = DirectoryBrowser::new(root, IgnoreSet::parse_list(".env,index.py"));
//!
//! let locale = Locale { code: "en", parent_label: "Parent Directory" };
//! for entry in browser.list_requested("docs", &locale)? {
//!     println!("{} -> {}", entry.name, entry.link);
//! }
//!
//! let delivery = browser.deliver("docs/readme.txt")?;
//! println!("{} ({} bytes)", delivery.content_type(), delivery.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`confine`](mod@confine): Root and confined path types
//! - [`browser`]: Listing builder and the [`DirectoryBrowser`] facade
//! - [`delivery`]: File delivery
//! - [`entry`]: Listing rows and link construction
//! - [`icon`]: MIME to icon classification
//! - [`size`]: Human-readable sizes
//! - [`ignore`]: Ignore set
//! - [`error`]: Error types

pub mod browser;
pub mod confine;
pub mod delivery;
pub mod entry;
pub mod error;
pub mod icon;
pub mod ignore;
pub mod size;

pub use browser::{build_listing, DirectoryBrowser, Locale};
pub use confine::{confine, confine_directory, confine_file, ConfinedPath, PathKind, Root};
pub use delivery::{deliver, Delivery, Disposition, OCTET_STREAM};
pub use entry::{EntryKind, ListEntry};
pub use error::{AccessError, Outcome, Result};
pub use icon::IconClass;
pub use ignore::IgnoreSet;
pub use size::format_size;
