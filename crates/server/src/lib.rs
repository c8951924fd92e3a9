//! # dirindex Server Library
//!
//! This crate provides the HTTP front end of dirindex: a localized
//! directory listing page and file downloads for a single served root.
//!
//! ## Overview
//!
//! - **Listing pages**: `/{lang}?dir=...` renders a sortable, searchable table
//! - **Downloads**: any other path streams the file, inline or as attachment
//! - **Translations**: one TOML file per language, loaded at startup
//! - **Favicon proxy**: `/favicon.ico` relays a configured upstream icon
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            axum Router (trace, gzip)          │
//! ├───────────────┬───────────────┬───────────────┤
//! │  / redirect   │  /{lang}      │  /{*path}     │
//! │               │  listing page │  download     │
//! ├───────────────┴───────┬───────┴───────────────┤
//! │   Translations, page  │   listing crate       │
//! │   rendering (maud)    │   (confine, deliver)  │
//! └───────────────────────┴───────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use server::{build_router, AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::load_default()?;
//!     config.apply_env_overrides();
//!     config.validate()?;
//!
//!     let state = AppState::from_config(config)?;
//!     let addr = state.config().bind_address();
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, build_router(Arc::new(state))).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and defaults
//! - [`i18n`]: Translation files
//! - [`page`]: HTML rendering
//! - [`favicon`]: Upstream favicon fetch
//! - [`router`]: HTTP routes and error mapping

pub mod config;
pub mod favicon;
pub mod i18n;
pub mod page;
pub mod router;

pub use config::{Config, ConfigError};
pub use i18n::{Translation, Translations};
pub use page::PageContext;
pub use router::{build_router, AppError, AppState, SharedState};
