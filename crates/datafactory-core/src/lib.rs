//! # datafactory-core
//!
//! Typed async client for registering and managing custom activity types
//! on a Data Factory through the resource manager REST API.
//!
//! ## What Lives Here
//!
//! - **Client** - [`DataFactoryClient`], the HTTP/JSON layer holding the
//!   connection pool and credentials
//! - **Operations** - [`ActivityTypeOperations`]: begin-delete, delete,
//!   create-or-update (typed or raw JSON), get, list and list-next
//! - **Long-running operations** - [`poll_until_complete`] with progress
//!   callbacks
//! - **Paging** - [`list_all`] and [`list_stream`] over continuation links
//! - **Config** - named profiles with env var expansion and optional
//!   keyring-backed credentials
//!
//! ## Example
//!
//! ```rust,ignore
//! use datafactory_core::{ActivityTypeGetParameters, ActivityTypeOperations, DataFactoryClient};
//!
//! let client = DataFactoryClient::builder()
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .access_token(token)
//!     .build()?;
//!
//! let params = ActivityTypeGetParameters::new("MyCustomActivity");
//! let response = client.get("my-rg", "my-factory", &params).await?;
//! println!("{}", response.activity_type.properties.schema);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod lro;
pub mod models;
pub mod operations;
pub mod paging;

pub use client::{ClientSettings, DataFactoryClient, DataFactoryClientBuilder};
pub use error::{CoreError, Result};
pub use lro::{ProgressCallback, ProgressEvent, poll_until_complete};
pub use models::*;
pub use operations::{ActivityTypeOperations, cancellable};
pub use paging::{list_all, list_stream};

// Re-export so callers of `cancellable` need no direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;
