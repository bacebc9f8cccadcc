use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one application release line (e.g. `"11"`, `"14"`).
///
/// Opaque and trusted: the tag is a small alphanumeric token supplied by the
/// manifest and is substituted into names, ports, and paths without escaping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// The fixed per-version constants every generated artifact is a pure
/// function of: version tag, application name, and the two image references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackProfile {
    pub version: VersionTag,
    pub app_name: String,
    /// Full application image reference, repo and tag (e.g.
    /// `moutazmuhammad/odoo:11.3.7-14`).
    pub app_image: String,
    pub db_image: String,
}

impl StackProfile {
    /// Container and service name of the application, `<app><version>`.
    pub fn app_container(&self) -> String {
        format!("{}{}", self.app_name, self.version)
    }

    /// Container and service name of the database, `db<version>`.
    pub fn db_container(&self) -> String {
        format!("db{}", self.version)
    }

    /// Host port mapped to the application web interface, `<version>69`.
    pub fn web_port(&self) -> String {
        format!("{}69", self.version)
    }

    /// Host port mapped to the longpolling interface, `<version>72`.
    pub fn longpoll_port(&self) -> String {
        format!("{}72", self.version)
    }

    /// Placeholder credential reused as database user and password.
    pub fn credential(&self) -> String {
        self.app_container()
    }

    /// Placeholder master password, `admin<version>`.
    pub fn admin_password(&self) -> String {
        format!("admin{}", self.version)
    }

    pub fn web_volume(&self) -> String {
        format!("{}-web-data", self.app_container())
    }

    pub fn db_volume(&self) -> String {
        format!("{}-db-data", self.app_container())
    }
}
