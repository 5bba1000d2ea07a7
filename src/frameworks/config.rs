use std::{env, fs, num::NonZeroU32, path::PathBuf};

use serde::Deserialize;

use crate::domain::entities::Secret;
use crate::domain::window::DEFAULT_LOOKAHEAD;

const DEFAULT_PORT: u16 = 3004;

// Upper bound on tokens per batch; larger values fall back to the default.
const MAX_LOOKAHEAD: u32 = 16;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// Runtime settings for the issuance service.
#[derive(Clone, Debug)]
pub struct Settings {
    pub port: u16,
    // Empty or missing secrets are kept as None and surface per request.
    pub secret: Option<Secret>,
    pub lookahead: NonZeroU32,
}

// Optional TOML overlay. No Debug: it may hold the raw secret.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    port: Option<u16>,
    secret: Option<String>,
    lookahead: Option<u32>,
}

impl Settings {
    // File named by QR_CONFIG_FILE (if any), then environment overrides.
    pub fn load() -> Result<Self, SettingsError> {
        let file = match env::var("QR_CONFIG_FILE") {
            Ok(path) => read_file(PathBuf::from(path))?,
            Err(_) => FileSettings::default(),
        };
        Ok(Self::resolve(file, |key| env::var(key).ok()))
    }

    fn resolve(file: FileSettings, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("QR_SERVER_PORT")
            .and_then(|value| value.parse().ok())
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let secret = lookup("QR_SECRET")
            .or(file.secret)
            .and_then(|value| Secret::new(value).ok());

        let lookahead = lookup("QR_LOOKAHEAD")
            .and_then(|value| value.parse::<u32>().ok())
            .or(file.lookahead)
            .filter(|value| *value <= MAX_LOOKAHEAD)
            .and_then(NonZeroU32::new)
            .unwrap_or(DEFAULT_LOOKAHEAD);

        Self {
            port,
            secret,
            lookahead,
        }
    }
}

fn read_file(path: PathBuf) -> Result<FileSettings, SettingsError> {
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(source) => return Err(SettingsError::Read { path, source }),
    };
    parse_file(&contents).map_err(|source| SettingsError::Parse { path, source })
}

fn parse_file(contents: &str) -> Result<FileSettings, toml::de::Error> {
    toml::from_str(contents)
}
