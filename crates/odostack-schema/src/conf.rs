use crate::compose::{BUILTIN_ADDONS, DATA_DIR, DB_PORT, EXTRA_ADDONS};
use crate::profile::StackProfile;
use serde::Serialize;
use std::fmt::Write;

/// Canonical application configuration filename inside `config/`.
pub const CONF_FILE: &str = "odoo.conf";

/// Typed model of the generated `odoo.conf`.
///
/// The database parameters must match the environment variables in the
/// compose descriptor for the same stack; both are derived from the same
/// `StackProfile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OdooConf {
    pub admin_passwd: String,
    pub db_host: String,
    pub db_port: String,
    pub db_user: String,
    pub db_password: String,
    pub addons_path: Vec<String>,
    pub data_dir: String,
}

impl OdooConf {
    pub fn for_stack(profile: &StackProfile) -> Self {
        let credential = profile.credential();
        Self {
            admin_passwd: profile.admin_password(),
            db_host: profile.db_container(),
            db_port: DB_PORT.to_owned(),
            db_user: credential.clone(),
            db_password: credential,
            addons_path: vec![BUILTIN_ADDONS.to_owned(), EXTRA_ADDONS.to_owned()],
            data_dir: DATA_DIR.to_owned(),
        }
    }

    /// Render to the `[options]` key = value section format.
    pub fn render(&self) -> String {
        let mut out = String::from("[options]\n");
        let _ = writeln!(out, "admin_passwd = {}", self.admin_passwd);
        let _ = writeln!(out, "db_host = {}", self.db_host);
        let _ = writeln!(out, "db_port = {}", self.db_port);
        let _ = writeln!(out, "db_user = {}", self.db_user);
        let _ = writeln!(out, "db_password = {}", self.db_password);
        out.push('\n');
        let _ = writeln!(out, "addons_path = {}", self.addons_path.join(","));
        let _ = writeln!(out, "data_dir = {}", self.data_dir);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ComposeFile;
    use crate::profile::VersionTag;

    fn profile() -> StackProfile {
        StackProfile {
            version: VersionTag::new("11"),
            app_name: "odoo".to_owned(),
            app_image: "moutazmuhammad/odoo:11.3.7-14".to_owned(),
            db_image: "postgres:14".to_owned(),
        }
    }

    #[test]
    fn renders_expected_keys() {
        let conf = OdooConf::for_stack(&profile());
        let text = conf.render();
        assert!(text.starts_with("[options]\n"));
        assert!(text.contains("admin_passwd = admin11\n"));
        assert!(text.contains("db_host = db11\n"));
        assert!(text.contains("db_port = 5432\n"));
        assert!(text.contains("db_user = odoo11\n"));
        assert!(text.contains("db_password = odoo11\n"));
        assert!(text.contains("addons_path = /opt/odoo/addons,/mnt/extra-addons\n"));
        assert!(text.contains("data_dir = /var/lib/odoo\n"));
    }

    #[test]
    fn render_is_deterministic() {
        let conf = OdooConf::for_stack(&profile());
        assert_eq!(conf.render(), conf.render());
    }

    #[test]
    fn credentials_match_compose_environment() {
        let p = profile();
        let conf = OdooConf::for_stack(&p);
        let compose = ComposeFile::for_stack(&p);
        let app = &compose.services[&p.app_container()];
        assert!(app.environment.contains(&format!("DB_USER={}", conf.db_user)));
        assert!(app
            .environment
            .contains(&format!("DB_PASSWORD={}", conf.db_password)));
        assert!(app.environment.contains(&format!("DB_HOST={}", conf.db_host)));
        assert!(app.environment.contains(&format!("DB_PORT={}", conf.db_port)));
    }
}
