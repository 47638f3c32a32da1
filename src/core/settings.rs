use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
    net::{Ipv4Addr, SocketAddr},
    path::Path,
};

use crate::error::{FolioError, Result};

pub const SETTINGS_PATH: &str = "core/settings.json";
const HERO_IMAGE: &str =
    "https://images.unsplash.com/photo-1558494949-ef010cbdcc31?q=80&w=1200&auto=format&fit=crop";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    pub ipv4_addr: Ipv4Setting,
    pub port: U16Setting,
    pub content_root: StrSetting,
    pub default_language: StrSetting,
    pub author: StrSetting,
    pub contact_email: StrSetting,
    pub github_url: StrSetting,
    pub linkedin_url: StrSetting,
    pub cv_url: StrSetting,
    #[serde(default = "default_hero_image")]
    pub hero_image_url: StrSetting,
}

fn default_hero_image() -> StrSetting {
    StrSetting::new("Hero Image", HERO_IMAGE)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StrSetting {
    pub name: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct U16Setting {
    pub name: String,
    pub value: u16,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Ipv4Setting {
    pub name: String,
    pub value: Ipv4Addr,
}

impl StrSetting {
    fn new(name: &str, value: &str) -> Self {
        StrSetting {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl Settings {
    /// Reads the settings file at `path`. A missing file yields the defaults,
    /// a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match File::open(path) {
            Ok(file) => {
                let mut buffer = Vec::new();
                let mut reader = BufReader::new(file);
                reader.read_to_end(&mut buffer)?;
                serde_json::from_slice::<Settings>(&buffer).map_err(|error| {
                    FolioError::Settings {
                        message: format!("{}: {}", path.display(), error),
                    }
                })
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "Settings file {} not found, using defaults",
                    path.display()
                );
                Ok(Settings::new())
            }
            Err(error) => Err(error.into()),
        }
    }

    pub fn new() -> Self {
        Settings {
            ipv4_addr: Ipv4Setting {
                name: "Ipv4 Address".to_string(),
                value: Ipv4Addr::new(127, 0, 0, 1),
            },
            port: U16Setting {
                name: "Port".to_string(),
                value: 4010,
            },
            content_root: StrSetting::new("Content Root", "content"),
            default_language: StrSetting::new("Default Language", "en"),
            author: StrSetting::new("Author", "Ronel Herzass"),
            contact_email: StrSetting::new("Contact Email", "ronelherzass@gmail.com"),
            github_url: StrSetting::new("GitHub", "https://github.com/rh8991"),
            linkedin_url: StrSetting::new("LinkedIn", "https://www.linkedin.com/in/ronel-herzass"),
            cv_url: StrSetting::new("CV", "/content/CV_Ronel_Herzass.pdf"),
            hero_image_url: default_hero_image(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ipv4_addr.value.into(), self.port.value)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings.port.value, 4010);
        assert_eq!(settings.default_language.value, "en");
    }

    #[test]
    fn loads_named_settings_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::new();
        settings.port.value = 8080;
        settings.content_root.value = "https://cdn.example.com/content".to_string();
        let mut file = File::create(&path).unwrap();
        file.write_all(serde_json::to_string_pretty(&settings).unwrap().as_bytes())
            .unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.port.value, 8080);
        assert_eq!(loaded.port.name, "Port");
        assert_eq!(loaded.content_root.value, "https://cdn.example.com/content");
        assert_eq!(loaded.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn hero_image_defaults_when_absent_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut value = serde_json::to_value(Settings::new()).unwrap();
        value.as_object_mut().unwrap().remove("hero_image_url");
        std::fs::write(&path, value.to_string()).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.hero_image_url.name, "Hero Image");
        assert!(loaded.hero_image_url.value.starts_with("https://images.unsplash.com/"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(FolioError::Settings { .. })
        ));
    }
}
