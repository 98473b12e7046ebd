//! Configuration loading and representation.
//!
//! Sources, lowest to highest priority:
//! 1. Defaults declared on the settings structs
//! 2. The YAML config file (`config.yaml`, or the path in `NINJABOT_CONFIG`)
//! 3. Environment variables prefixed `NINJABOT_`, nested keys split on `__`
//!    (`NINJABOT_TOKEN`, `NINJABOT_REDIS__URL`, ...)
//!
//! Loading a `.env` file into the process environment is the binary's job.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;
use thiserror::Error;

use ninjabot_core::{ChannelId, GuildId, NinjaEmoji, Permissions, RoleId, names::ninja_names};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "NINJABOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const ENV_PREFIX: &str = "NINJABOT_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read resource {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Bot token; never printed.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Token(***)")
    }
}

/// All settings for the bot process.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub token: Token,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default)]
    pub redis: RedisSettings,
    pub guild: GuildSettings,
    pub game: GameSettings,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub resources: ResourceSettings,
    /// Directory relative resource paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix for every key the bot writes.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
    #[serde(default = "default_connect_backoff_ms")]
    pub connect_backoff_ms: u64,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            namespace: default_namespace(),
            connect_attempts: default_connect_attempts(),
            connect_backoff_ms: default_connect_backoff_ms(),
        }
    }
}

impl RedisSettings {
    pub fn connect_backoff(&self) -> Duration {
        Duration::from_millis(self.connect_backoff_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuildSettings {
    pub guild_id: GuildId,
    pub admins_id: RoleId,
    pub moderators_id: RoleId,
    /// Fallback ninja emoji id, used when a fresh emoji cannot be created.
    pub emoji_id: u64,
    /// Chat markup of the fallback emoji, e.g. `<:ninjaduck:637923502535606293>`.
    pub emoji_full: String,
    pub emoji_confirm: u64,
    pub emoji_deny: u64,
    pub summary_channel: ChannelId,
    #[serde(default)]
    pub bypass_roles: Vec<RoleId>,
    #[serde(default)]
    pub commands_channels: Vec<ChannelId>,
}

impl GuildSettings {
    /// The fallback emoji, parsed from `emoji_full`. Its id must equal `emoji_id`.
    pub fn fallback_emoji(&self) -> Result<NinjaEmoji, ConfigError> {
        let emoji = NinjaEmoji::parse_mention(&self.emoji_full)
            .map_err(|e| ConfigError::Invalid(format!("guild.emoji_full: {e}")))?;
        if emoji.id.get() != self.emoji_id {
            return Err(ConfigError::Invalid(format!(
                "guild.emoji_id {} does not match guild.emoji_full {}",
                self.emoji_id, self.emoji_full
            )));
        }
        Ok(emoji)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameSettings {
    /// Only hunt in channels the default role can read and write.
    pub public_only: bool,
    /// Minimum sleep between rounds, in seconds.
    pub cooldown: u64,
    /// Upper bound of the random extra sleep, in seconds.
    pub max_time_jitter: u64,
    pub probability_multiplier: f64,
    pub max_points: u32,
    /// Reaction window, in seconds.
    pub reaction_timeout: u64,
    /// Per-channel probability scale factors, keyed by channel id.
    #[serde(default)]
    pub channel_scalars: HashMap<String, f64>,
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
}

impl GameSettings {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown)
    }

    pub fn reaction_timeout(&self) -> Duration {
        Duration::from_secs(self.reaction_timeout)
    }

    /// Channel scalars keyed by typed channel id.
    pub fn channel_scalars(&self) -> Result<HashMap<ChannelId, f64>, ConfigError> {
        self.channel_scalars
            .iter()
            .map(|(raw, scalar)| {
                let channel = raw
                    .parse::<ChannelId>()
                    .map_err(|e| ConfigError::Invalid(format!("game.channel_scalars: {e}")))?;
                Ok((channel, *scalar))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSettings {
    #[serde(default = "default_ninja_names")]
    pub ninja_names: PathBuf,
    /// Image for freshly created ninja emoji; without it the fallback emoji is used.
    #[serde(default)]
    pub ninja_image: Option<PathBuf>,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            ninja_names: default_ninja_names(),
            ninja_image: None,
        }
    }
}

fn default_command_prefix() -> String {
    "$".to_string()
}

fn default_redis_url() -> String {
    "redis://redis:6379".to_string()
}

fn default_namespace() -> String {
    "ninja_bot".to_string()
}

fn default_connect_attempts() -> u32 {
    10
}

fn default_connect_backoff_ms() -> u64 {
    500
}

fn default_auto_start() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ninja_names() -> PathBuf {
    PathBuf::from("resources/ninja_names.txt")
}

impl Settings {
    /// Load from the file named by `NINJABOT_CONFIG` (default `config.yaml`) plus env.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// Load from a specific YAML file plus env.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let mut settings: Settings = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
            .extract()
            .map_err(Box::new)?;

        settings.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token.expose().trim().is_empty() {
            return Err(ConfigError::Invalid("token must not be empty".to_string()));
        }
        if self.command_prefix.is_empty() {
            return Err(ConfigError::Invalid("command_prefix must not be empty".to_string()));
        }
        if self.game.max_points == 0 {
            return Err(ConfigError::Invalid("game.max_points must be at least 1".to_string()));
        }
        if self.game.reaction_timeout == 0 {
            return Err(ConfigError::Invalid(
                "game.reaction_timeout must be at least 1 second".to_string(),
            ));
        }
        if !(self.game.probability_multiplier >= 0.0) {
            return Err(ConfigError::Invalid(
                "game.probability_multiplier must be a non-negative number".to_string(),
            ));
        }
        if self.redis.connect_attempts == 0 {
            return Err(ConfigError::Invalid(
                "redis.connect_attempts must be at least 1".to_string(),
            ));
        }
        self.game.channel_scalars()?;
        self.guild.fallback_emoji()?;
        Ok(())
    }

    /// Resolve a resource path against the config file's directory.
    pub fn resource_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Static resources loaded once at startup.
#[derive(Clone, Default)]
pub struct Resources {
    pub ninja_names: Vec<String>,
    pub ninja_image: Option<Vec<u8>>,
}

impl core::fmt::Debug for Resources {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resources")
            .field("ninja_names", &self.ninja_names.len())
            .field("ninja_image_bytes", &self.ninja_image.as_ref().map(Vec::len))
            .finish()
    }
}

impl Resources {
    pub fn load(settings: &Settings) -> Result<Self, ConfigError> {
        let names_path = settings.resource_path(&settings.resources.ninja_names);
        let source = std::fs::read_to_string(&names_path).map_err(|source| ConfigError::Resource {
            path: names_path.clone(),
            source,
        })?;
        let ninja_names = ninja_names(&source)
            .map_err(|e| ConfigError::Invalid(format!("{}: {e}", names_path.display())))?;

        let ninja_image = match &settings.resources.ninja_image {
            Some(path) => {
                let path = settings.resource_path(path);
                let bytes = std::fs::read(&path).map_err(|source| ConfigError::Resource {
                    path: path.clone(),
                    source,
                })?;
                Some(bytes)
            }
            None => None,
        };

        Ok(Self {
            ninja_names,
            ninja_image,
        })
    }
}
