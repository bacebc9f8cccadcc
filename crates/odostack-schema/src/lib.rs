//! Manifest parsing and generated-artifact models for odostack.
//!
//! This crate defines the `odostack.toml` manifest, the per-version
//! `StackProfile` every generated value is derived from, and the typed
//! models for the two generated artifacts: the docker-compose descriptor
//! and the `odoo.conf` application configuration.

pub mod compose;
pub mod conf;
pub mod manifest;
pub mod profile;

pub use compose::{ComposeFile, Service, COMPOSE_FILE};
pub use conf::{OdooConf, CONF_FILE};
pub use manifest::{parse_manifest_file, parse_manifest_str, ManifestError, StackManifest};
pub use profile::{StackProfile, VersionTag};
