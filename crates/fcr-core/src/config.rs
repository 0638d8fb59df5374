use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    deeplink::DeepLinkConfig, domain::ChatId, errors::Error, relay::RelayConfig, Result,
};

/// Telegram credentials. `api_id` / `api_hash` identify the application;
/// the Bot API transport only needs the token.
#[derive(Clone)]
pub struct TelegramCredentials {
    pub api_id: i32,
    pub api_hash: String,
    pub bot_token: String,
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

/// Typed configuration, read from the environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    // Store
    pub mongo_uri: String,
    pub db_name: String,
    pub collection_name: String,
    pub search_field: String,
    pub max_per_page: u64,

    // Telegram
    pub telegram: TelegramCredentials,
    pub bin_channel_id: ChatId,
    pub deeplink: DeepLinkConfig,

    // Relay
    pub relay: RelayConfig,

    // HTTP
    pub public_base_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

const REQUIRED: &[&str] = &[
    "MONGO_URI",
    "DB_NAME",
    "COLLECTION_NAME",
    "KOYEB_URL",
    "API_ID",
    "API_HASH",
    "BOT_TOKEN",
    "BIN_CHANNEL_ID",
];

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(env_str)
    }

    /// Build the config from an arbitrary key lookup (the process env in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|k| get(*k).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        let required = |key: &str| get(key).unwrap_or_default();

        let api_id = parse_required::<i32>("API_ID", &required("API_ID"))?;
        let bin_channel_id = ChatId(parse_required::<i64>(
            "BIN_CHANNEL_ID",
            &required("BIN_CHANNEL_ID"),
        )?);

        let port = match get("PORT") {
            Some(raw) => parse_required::<u16>("PORT", &raw)?,
            None => 8080,
        };

        let relay = RelayConfig {
            max_throttle_retries: get("RELAY_MAX_THROTTLE_RETRIES")
                .and_then(|s| s.trim().parse::<u32>().ok()),
            timeout: get("RELAY_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        let defaults = DeepLinkConfig::default();
        let deeplink = DeepLinkConfig {
            bot_username: get("DEEPLINK_BOT_USERNAME").unwrap_or(defaults.bot_username),
            start_prefix: get("DEEPLINK_START_PREFIX").unwrap_or(defaults.start_prefix),
        };

        Ok(Self {
            mongo_uri: required("MONGO_URI"),
            db_name: required("DB_NAME"),
            collection_name: required("COLLECTION_NAME"),
            search_field: get("SEARCH_FIELD_NAME").unwrap_or_else(|| "file_name".to_string()),
            max_per_page: get("MAX_PER_PAGE")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(200),
            telegram: TelegramCredentials {
                api_id,
                api_hash: required("API_HASH"),
                bot_token: required("BOT_TOKEN"),
            },
            bin_channel_id,
            deeplink,
            relay,
            public_base_url: required("KOYEB_URL").trim_end_matches('/').to_string(),
            port,
            static_dir: PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| "static".to_string())),
        })
    }
}

fn parse_required<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{key} must be a number, got {raw:?}")))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("MONGO_URI", "mongodb://localhost:27017"),
            ("DB_NAME", "files"),
            ("COLLECTION_NAME", "catalog"),
            ("KOYEB_URL", "https://stream.example.app/"),
            ("API_ID", "123456"),
            ("API_HASH", "0123456789abcdef"),
            ("BOT_TOKEN", "1:ABC"),
            ("BIN_CHANNEL_ID", "-1001234567890"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|k| env.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&base_env()).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.search_field, "file_name");
        assert_eq!(cfg.public_base_url, "https://stream.example.app");
        assert_eq!(cfg.bin_channel_id, ChatId(-1001234567890));
        assert_eq!(cfg.max_per_page, 200);
        assert_eq!(cfg.relay.max_throttle_retries, None);
        assert_eq!(cfg.relay.timeout, None);
        assert_eq!(cfg.deeplink, DeepLinkConfig::default());
    }

    #[test]
    fn missing_required_vars_are_all_reported() {
        let mut env = base_env();
        env.remove("BOT_TOKEN");
        env.insert("DB_NAME", "  ");

        let err = load(&env).unwrap_err().to_string();
        assert!(err.contains("BOT_TOKEN"), "{err}");
        assert!(err.contains("DB_NAME"), "{err}");
    }

    #[test]
    fn non_numeric_channel_is_rejected() {
        let mut env = base_env();
        env.insert("BIN_CHANNEL_ID", "@bin");
        assert!(matches!(load(&env), Err(Error::Config(_))));
    }

    #[test]
    fn optional_overrides() {
        let mut env = base_env();
        env.insert("PORT", "9000");
        env.insert("SEARCH_FIELD_NAME", "title");
        env.insert("RELAY_MAX_THROTTLE_RETRIES", "5");
        env.insert("RELAY_TIMEOUT_SECS", "90");
        env.insert("DEEPLINK_START_PREFIX", "file_42");

        let cfg = load(&env).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.search_field, "title");
        assert_eq!(cfg.relay.max_throttle_retries, Some(5));
        assert_eq!(cfg.relay.timeout, Some(Duration::from_secs(90)));
        assert_eq!(cfg.deeplink.start_prefix, "file_42");
        assert_eq!(cfg.deeplink.bot_username, "dhyeyautofilterbot");
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = load(&base_env()).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("1:ABC"));
        assert!(!dbg.contains("0123456789abcdef"));
    }

    #[test]
    fn dotenv_parsing() {
        let parsed = parse_dotenv("# comment\nA=1\nexport B = \"two\"\n\nnoequals\nC='3'\n");
        assert_eq!(
            parsed,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "two".to_string()),
                ("C".to_string(), "3".to_string()),
            ]
        );
    }
}
