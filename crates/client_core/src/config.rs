use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const SETTINGS_FILE_NAME: &str = "folio.toml";

const PROFILE_PATH: &str = "user/me/portfolio";
const CERTIFICATES_PATH: &str = "softwareapplication/getall";
// Route name as published by the backend.
const PROJECTS_PATH: &str = "projrct/getall";
const SKILLS_PATH: &str = "skill/getall";
const TIMELINE_PATH: &str = "timeline/getall";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub chat_url: String,
    pub carousel_interval_secs: u64,
    pub owner_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://amit-cackend.vercel.app/api/v1".into(),
            chat_url: "http://localhost:3001/api/chat".into(),
            carousel_interval_secs: 10,
            owner_name: "Amit".into(),
        }
    }
}

/// Fully resolved endpoint URLs, one per loader plus the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub profile: Url,
    pub certificates: Url,
    pub projects: Url,
    pub skills: Url,
    pub timeline: Url,
    pub chat: Url,
}

impl Settings {
    pub fn carousel_interval(&self) -> Duration {
        Duration::from_secs(self.carousel_interval_secs.max(1))
    }

    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let base = self.api_base_url.trim().trim_end_matches('/');
        let join = |key: &'static str, path: &str| {
            Url::parse(&format!("{base}/{path}"))
                .map_err(|source| ConfigError::InvalidUrl { key, source })
        };

        Ok(Endpoints {
            profile: join("api_base_url", PROFILE_PATH)?,
            certificates: join("api_base_url", CERTIFICATES_PATH)?,
            projects: join("api_base_url", PROJECTS_PATH)?,
            skills: join("api_base_url", SKILLS_PATH)?,
            timeline: join("api_base_url", TIMELINE_PATH)?,
            chat: Url::parse(self.chat_url.trim()).map_err(|source| ConfigError::InvalidUrl {
                key: "chat_url",
                source,
            })?,
        })
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("FOLIO_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(v) = lookup("FOLIO_CHAT_URL") {
            self.chat_url = v;
        }
        if let Some(v) = lookup("APP__CHAT_URL") {
            self.chat_url = v;
        }

        if let Some(v) = lookup("FOLIO_CAROUSEL_INTERVAL_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.carousel_interval_secs = parsed,
                Err(err) => tracing::warn!(value = %v, "ignoring FOLIO_CAROUSEL_INTERVAL_SECS: {err}"),
            }
        }

        if let Some(v) = lookup("FOLIO_OWNER_NAME") {
            self.owner_name = v;
        }
    }
}

fn default_settings_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let global = dirs::config_dir()?.join("folio").join(SETTINGS_FILE_NAME);
    global.exists().then_some(global)
}

fn read_settings_file(path: &Path) -> Option<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(path = %path.display(), "unable to read settings file: {err}");
            return None;
        }
    };
    match toml::from_str::<Settings>(&raw) {
        Ok(settings) => Some(settings),
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring malformed settings file: {err}");
            None
        }
    }
}

/// Defaults, then the settings file (explicit path or discovered), then the
/// environment.
pub fn load_settings(explicit_path: Option<&Path>) -> Settings {
    let path = explicit_path
        .map(Path::to_path_buf)
        .or_else(default_settings_path);

    let mut settings = path
        .as_deref()
        .and_then(read_settings_file)
        .unwrap_or_default();

    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn derives_every_endpoint_from_base_url() {
        let settings = Settings {
            api_base_url: "https://api.example.test/v1/".into(),
            ..Settings::default()
        };
        let endpoints = settings.endpoints().expect("endpoints");
        assert_eq!(
            endpoints.profile.as_str(),
            "https://api.example.test/v1/user/me/portfolio"
        );
        assert_eq!(
            endpoints.certificates.as_str(),
            "https://api.example.test/v1/softwareapplication/getall"
        );
        assert_eq!(
            endpoints.timeline.as_str(),
            "https://api.example.test/v1/timeline/getall"
        );
        assert_eq!(endpoints.chat.as_str(), "http://localhost:3001/api/chat");
    }

    #[test]
    fn rejects_unparseable_chat_url() {
        let settings = Settings {
            chat_url: "not a url".into(),
            ..Settings::default()
        };
        let err = settings.endpoints().expect_err("invalid chat url");
        assert!(matches!(err, ConfigError::InvalidUrl { key: "chat_url", .. }));
    }

    #[test]
    fn app_prefixed_env_wins_over_folio_prefixed() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FOLIO_CHAT_URL", "http://a.test/chat"),
            ("APP__CHAT_URL", "http://b.test/chat"),
            ("FOLIO_CAROUSEL_INTERVAL_SECS", "3"),
        ]);
        let mut settings = Settings::default();
        settings.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.chat_url, "http://b.test/chat");
        assert_eq!(settings.carousel_interval(), Duration::from_secs(3));
    }

    #[test]
    fn unparseable_interval_keeps_default() {
        let mut settings = Settings::default();
        settings.apply_env(|key| (key == "FOLIO_CAROUSEL_INTERVAL_SECS").then(|| "soon".into()));
        assert_eq!(settings.carousel_interval_secs, 10);
    }

    #[test]
    fn reads_partial_settings_file() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("folio_settings_test_{suffix}.toml"));
        fs::write(&path, "owner_name = \"Sam\"\ncarousel_interval_secs = 4\n").expect("write");

        let settings = read_settings_file(&path).expect("settings");
        assert_eq!(settings.owner_name, "Sam");
        assert_eq!(settings.carousel_interval_secs, 4);
        assert_eq!(settings.chat_url, Settings::default().chat_url);

        fs::remove_file(path).expect("cleanup");
    }
}
