use jokerpoker_engine::config::GameConfig;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "JOKERPOKER_CONFIG";
pub const SEED_ENV: &str = "JOKERPOKER_SEED";
pub const PRESET_ENV: &str = "JOKERPOKER_PRESET";
pub const PLAYERS_ENV: &str = "JOKERPOKER_PLAYERS";
pub const STARTING_BANK_ENV: &str = "JOKERPOKER_STARTING_BANK";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub preset: String,
    pub players: usize,
    pub starting_bank: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub preset: ValueSource,
    pub players: ValueSource,
    pub starting_bank: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            preset: ValueSource::Default,
            players: ValueSource::Default,
            starting_bank: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            preset: "classic".into(),
            players: 3,
            starting_bank: 1_000,
        }
    }
}

impl Config {
    /// Engine rules for the configured preset, shuffled with the configured seed.
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let mut game = GameConfig::preset(&self.preset)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        game.deck.seed = self.seed;
        Ok(game)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::CliError {
    fn from(e: ConfigError) -> Self {
        crate::error::CliError::Config(e.to_string())
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.preset {
            cfg.preset = v;
            sources.preset = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.starting_bank {
            cfg.starting_bank = v;
            sources.starting_bank = ValueSource::File;
        }
    }

    if let Some(seed) = env_value(SEED_ENV) {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(preset) = env_value(PRESET_ENV) {
        cfg.preset = preset;
        sources.preset = ValueSource::Env;
    }
    if let Some(players) = env_value(PLAYERS_ENV) {
        cfg.players = players
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid players".into()))?;
        sources.players = ValueSource::Env;
    }
    if let Some(bank) = env_value(STARTING_BANK_ENV) {
        cfg.starting_bank = bank
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid starting_bank".into()))?;
        sources.starting_bank = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    starting_bank: Option<u32>,
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !GameConfig::PRESETS.contains(&cfg.preset.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: preset must be one of {}",
            GameConfig::PRESETS.join(", ")
        )));
    }
    if cfg.players < 2 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: players must be >=2".into(),
        ));
    }
    if cfg.starting_bank == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_bank must be >0".into(),
        ));
    }
    Ok(())
}
