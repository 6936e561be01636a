//! Google Workspace REST client.
//!
//! Implements [`gdrive_engine::RemoteResources`] over plain HTTPS with
//! `reqwest`. Credentials come from `GOOGLE_OAUTH_ACCESS_TOKEN` or gcloud
//! application default credentials.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;

pub use auth::{Credentials, TokenSource};
pub use client::{GoogleClient, escape_query_literal};
pub use config::{Endpoints, GoogleConfig};
pub use error::{ClientError, ClientResult};
