use crate::profile::{StackProfile, VersionTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported manifest_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("app.name must not be empty")]
    EmptyAppName,
    #[error("[stacks] must declare at least one version")]
    NoStacks,
}

/// The `odostack.toml` manifest: which application versions to provision
/// and the image references to build them from.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StackManifest {
    pub manifest_version: u32,
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub stacks: StacksSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Image repository; the per-stack tag from `[stacks]` is appended.
    #[serde(default = "default_app_image")]
    pub image: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            image: default_app_image(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    #[serde(default = "default_db_image")]
    pub image: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            image: default_db_image(),
        }
    }
}

/// Map from version tag to application image tag, e.g. `"11" = "11.3.7-14"`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct StacksSection {
    #[serde(flatten)]
    pub entries: BTreeMap<String, String>,
}

fn default_app_name() -> String {
    "odoo".to_owned()
}

fn default_app_image() -> String {
    "moutazmuhammad/odoo".to_owned()
}

fn default_db_image() -> String {
    "postgres:14".to_owned()
}

impl StackManifest {
    fn validate(self) -> Result<Self, ManifestError> {
        if self.manifest_version != 1 {
            return Err(ManifestError::UnsupportedVersion(self.manifest_version));
        }
        if self.app.name.is_empty() {
            return Err(ManifestError::EmptyAppName);
        }
        if self.stacks.entries.is_empty() {
            return Err(ManifestError::NoStacks);
        }
        Ok(self)
    }

    /// One profile per declared stack, in version order.
    pub fn profiles(&self) -> Vec<StackProfile> {
        self.stacks
            .entries
            .iter()
            .map(|(version, tag)| StackProfile {
                version: VersionTag::new(version.clone()),
                app_name: self.app.name.clone(),
                app_image: format!("{}:{tag}", self.app.image),
                db_image: self.database.image.clone(),
            })
            .collect()
    }
}

pub fn parse_manifest_str(input: &str) -> Result<StackManifest, ManifestError> {
    let manifest: StackManifest = toml::from_str(input)?;
    manifest.validate()
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<StackManifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let input = r#"
manifest_version = 1

[app]
name = "odoo"
image = "moutazmuhammad/odoo"

[database]
image = "postgres:14"

[stacks]
"11" = "11.3.7-14"
"14" = "14.0"
"#;
        let manifest = parse_manifest_str(input).expect("should parse");
        assert_eq!(manifest.manifest_version, 1);
        assert_eq!(manifest.app.name, "odoo");
        assert_eq!(manifest.stacks.entries.len(), 2);

        let profiles = manifest.profiles();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].version.as_str(), "11");
        assert_eq!(profiles[0].app_image, "moutazmuhammad/odoo:11.3.7-14");
        assert_eq!(profiles[1].app_image, "moutazmuhammad/odoo:14.0");
    }

    #[test]
    fn parses_minimal_manifest() {
        let input = r#"
manifest_version = 1

[stacks]
"11" = "11.3.7-14"
"#;
        let manifest = parse_manifest_str(input).expect("should parse");
        assert_eq!(manifest.app.name, "odoo");
        assert_eq!(manifest.app.image, "moutazmuhammad/odoo");
        assert_eq!(manifest.database.image, "postgres:14");
    }

    #[test]
    fn rejects_unknown_fields() {
        let input = r#"
manifest_version = 1

[app]
name = "odoo"
unknown_field = true

[stacks]
"11" = "11.3.7-14"
"#;
        assert!(parse_manifest_str(input).is_err());
    }

    #[test]
    fn rejects_wrong_version() {
        let input = r#"
manifest_version = 2

[stacks]
"11" = "11.3.7-14"
"#;
        assert!(matches!(
            parse_manifest_str(input),
            Err(ManifestError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn rejects_empty_stacks() {
        let input = "manifest_version = 1\n";
        assert!(matches!(
            parse_manifest_str(input),
            Err(ManifestError::NoStacks)
        ));
    }

    #[test]
    fn rejects_empty_app_name() {
        let input = r#"
manifest_version = 1

[app]
name = ""

[stacks]
"11" = "11.3.7-14"
"#;
        assert!(matches!(
            parse_manifest_str(input),
            Err(ManifestError::EmptyAppName)
        ));
    }
}
