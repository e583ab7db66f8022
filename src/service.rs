//! systemd unit and pm2 ecosystem file generation.
//!
//! Templates use `%name%` placeholders. systemd's own one-letter specifiers such
//! as `%h` or `%i` never match because a placeholder needs a closing `%`
//! directly after an identifier.

use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::IndexMap;
use log::{debug, warn};
use regex::{Captures, Regex};

use crate::constants::{PM2_CONFIG_TEMPLATE, SYSTEMD_UNIT_TEMPLATE};
use crate::error::{Error, Result};

/// Service manager a file is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Systemd,
    Pm2,
}

impl ServiceKind {
    pub fn builtin_template(self) -> &'static str {
        match self {
            ServiceKind::Systemd => SYSTEMD_UNIT_TEMPLATE,
            ServiceKind::Pm2 => PM2_CONFIG_TEMPLATE,
        }
    }

    /// Conventional file name for a service called `name`.
    pub fn file_name(self, name: &str) -> String {
        match self {
            ServiceKind::Systemd => format!("{}.service", name),
            ServiceKind::Pm2 => "ecosystem.config.js".to_string(),
        }
    }
}

impl FromStr for ServiceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "systemd" => Ok(ServiceKind::Systemd),
            "pm2" => Ok(ServiceKind::Pm2),
            other => Err(Error::ValidationError(format!(
                "unknown service kind '{}' (expected systemd or pm2)",
                other
            ))),
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%").expect("placeholder pattern is valid")
    })
}

/// Parses a `key=value` pair given on the command line.
pub fn parse_var(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::ValidationError(format!("expected key=value, got '{}'", s))),
    }
}

/// Replaces every `%key%` of `template` with its value in `vars`.
///
/// Placeholders without a value are kept as they are and logged.
pub fn render_service_template(template: &str, vars: &IndexMap<String, String>) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => {
                debug!("Substituting %{}% with '{}'", &caps[1], value);
                value.clone()
            }
            None => {
                warn!("No value for placeholder %{}%, keeping it", &caps[1]);
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Operator input for a service file.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub kind: ServiceKind,
    pub name: String,
    pub description: Option<String>,
    pub workdir: String,
    pub exec: String,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub extra: Vec<(String, String)>,
}

impl ServiceSpec {
    /// Variables available to service templates. Extra variables override built-in ones.
    pub fn vars(&self) -> IndexMap<String, String> {
        let mut vars = IndexMap::new();
        vars.insert("name".to_string(), self.name.clone());
        vars.insert(
            "description".to_string(),
            self.description.clone().unwrap_or_else(|| format!("{} service", self.name)),
        );
        vars.insert("workdir".to_string(), self.workdir.clone());
        vars.insert("exec".to_string(), self.exec.clone());
        vars.insert("user".to_string(), self.user.clone().unwrap_or_else(|| "root".to_string()));
        if let Some(port) = self.port {
            vars.insert("port".to_string(), port.to_string());
        }
        for (key, value) in &self.extra {
            vars.insert(key.clone(), value.clone());
        }
        vars
    }

    /// Renders `template`, or the built-in template of the service kind.
    pub fn render(&self, template: Option<&str>) -> Result<String> {
        if self.name.trim().is_empty() {
            return Err(Error::ValidationError("service name is required".to_string()));
        }
        let template = template.unwrap_or_else(|| self.kind.builtin_template());
        Ok(render_service_template(template, &self.vars()))
    }
}
