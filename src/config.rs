//! Collector settings.
//!
//! Loading is the host application's job; this type only describes the shape
//! and is `Deserialize` so it can come from any serde format.

use crate::{Credentials, Instance, SecretString};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[non_exhaustive]
pub struct CollectorSettings {
    /// Instance base URLs, optionally with `user:key@` embedded.
    pub servers: Vec<String>,
    /// Display names, positionally matched to `servers`.
    pub nice_names: Vec<String>,
    /// Fetch and keep `consoleText` for every resolved build.
    pub save_log: bool,
    pub username: Option<String>,
    pub api_key: Option<SecretString>,
    /// Address that replaces `localhost` in discovered build URLs when the
    /// collector runs inside Docker.
    #[serde(alias = "dockerLocalHostIP")]
    pub docker_local_host_ip: Option<String>,
}

impl CollectorSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(url.into());
        self
    }

    #[must_use]
    pub fn nice_name(mut self, name: impl Into<String>) -> Self {
        self.nice_names.push(name.into());
        self
    }

    #[must_use]
    pub fn save_log(mut self, yes: bool) -> Self {
        self.save_log = yes;
        self
    }

    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    #[must_use]
    pub fn docker_local_host_ip(mut self, address: impl Into<String>) -> Self {
        self.docker_local_host_ip = Some(address.into());
        self
    }

    /// NAT override address; empty when unset.
    #[must_use]
    pub fn localhost_override(&self) -> &str {
        self.docker_local_host_ip.as_deref().unwrap_or_default()
    }

    /// Configured username/API-key pair, only when both are present.
    #[must_use]
    pub fn fallback_credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.api_key) {
            (Some(user), Some(key)) => Some(Credentials {
                user: user.clone(),
                key: Some(key.clone()),
            }),
            _ => None,
        }
    }

    /// Servers paired with their display names.
    #[must_use]
    pub fn instances(&self) -> Vec<Instance> {
        self.servers
            .iter()
            .enumerate()
            .map(|(idx, url)| Instance {
                url: url.clone(),
                nice_name: self
                    .nice_names
                    .get(idx)
                    .filter(|name| !name.is_empty())
                    .cloned(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_property_names() {
        let settings: CollectorSettings = serde_json::from_value(json!({
            "servers": ["http://bamboo-a:8085", "http://bamboo-b:8085"],
            "niceNames": ["Team A"],
            "saveLog": true,
            "username": "ci-bot",
            "apiKey": "s3cret",
            "dockerLocalHostIP": "10.0.2.2"
        }))
        .unwrap();

        assert!(settings.save_log);
        assert_eq!(settings.localhost_override(), "10.0.2.2");
        assert_eq!(
            settings.fallback_credentials(),
            Some(Credentials::basic("ci-bot", "s3cret"))
        );
        assert!(!format!("{settings:?}").contains("s3cret"));

        let instances = settings.instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].nice_name.as_deref(), Some("Team A"));
        assert_eq!(instances[1].nice_name, None);
    }

    #[test]
    fn missing_values_default_to_empty() {
        let settings: CollectorSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings.localhost_override(), "");
        assert!(!settings.save_log);
        assert_eq!(settings.fallback_credentials(), None);
    }

    #[test]
    fn credentials_need_both_parts() {
        let mut settings = CollectorSettings::new();
        settings.username = Some("ci-bot".into());
        assert_eq!(settings.fallback_credentials(), None);
    }
}
