use crate::profile::StackProfile;
use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical descriptor filename, both generated and searched for at teardown.
pub const COMPOSE_FILE: &str = "docker-compose.yaml";

/// Container port of the application web interface.
pub const APP_WEB_PORT: &str = "8069";
/// Container port of the longpolling interface.
pub const APP_LONGPOLL_PORT: &str = "8072";
/// Database port, identical inside the container and in `odoo.conf`.
pub const DB_PORT: &str = "5432";

/// Persistent application data directory inside the container.
pub const DATA_DIR: &str = "/var/lib/odoo";
/// Addons shipped with the application image.
pub const BUILTIN_ADDONS: &str = "/opt/odoo/addons";
/// Mount point of the host `addons/` directory.
pub const EXTRA_ADDONS: &str = "/mnt/extra-addons";
/// Mount point of the host `config/` directory.
pub const CONFIG_MOUNT: &str = "/etc/odoo";

const PG_DATA_DIR: &str = "/var/lib/postgresql/data";

/// Typed model of the generated docker-compose document.
///
/// Built in memory and serialized with serde_yaml rather than interpolated
/// into a text template, so the document structure is fixed by the type and
/// only the substituted scalars vary per version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeFile {
    pub services: BTreeMap<String, Service>,
    pub volumes: BTreeMap<String, VolumeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub container_name: String,
    pub image: String,
    pub restart: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    pub environment: Vec<String>,
    pub volumes: Vec<String>,
}

/// Named volume declaration at document scope; intentionally empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeDecl;

impl ComposeFile {
    /// The two-service descriptor for one stack: application container
    /// depending on the database container, with per-version names, ports,
    /// credentials, and named volumes.
    pub fn for_stack(profile: &StackProfile) -> Self {
        let credential = profile.credential();

        let app = Service {
            container_name: profile.app_container(),
            image: profile.app_image.clone(),
            restart: "always".to_owned(),
            depends_on: vec![profile.db_container()],
            ports: vec![
                format!("{}:{APP_WEB_PORT}", profile.web_port()),
                format!("{}:{APP_LONGPOLL_PORT}", profile.longpoll_port()),
            ],
            environment: vec![
                format!("DB_HOST={}", profile.db_container()),
                format!("DB_PORT={DB_PORT}"),
                format!("DB_USER={credential}"),
                format!("DB_PASSWORD={credential}"),
            ],
            volumes: vec![
                format!("{}:{DATA_DIR}", profile.web_volume()),
                format!("./config:{CONFIG_MOUNT}"),
                format!("./addons:{EXTRA_ADDONS}"),
            ],
        };

        let db = Service {
            container_name: profile.db_container(),
            image: profile.db_image.clone(),
            restart: "always".to_owned(),
            depends_on: Vec::new(),
            ports: Vec::new(),
            environment: vec![
                "POSTGRES_DB=postgres".to_owned(),
                format!("POSTGRES_PASSWORD={credential}"),
                format!("POSTGRES_USER={credential}"),
            ],
            volumes: vec![format!("{}:{PG_DATA_DIR}", profile.db_volume())],
        };

        let mut services = BTreeMap::new();
        services.insert(profile.app_container(), app);
        services.insert(profile.db_container(), db);

        let mut volumes = BTreeMap::new();
        volumes.insert(profile.web_volume(), VolumeDecl);
        volumes.insert(profile.db_volume(), VolumeDecl);

        Self { services, volumes }
    }

    /// Serialize to YAML with the leading document marker.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        Ok(format!("---\n{}", serde_yaml::to_string(self)?))
    }
}
