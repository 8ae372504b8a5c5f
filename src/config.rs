//! Agent configuration parsed from `key=value` argument strings.

use crate::board::Stone;
use crate::search::{Budget, SearchConfig};
use log::warn;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Settings applied before the user's arguments.
const DEFAULT_ARGS: &str = "name=random role=unknown N=0 T=0 c=0.1 psi=-1 threads=1";
/// Characters that may not appear in an agent name.
const FORBIDDEN_NAME_CHARS: &[char] = &['[', ']', '(', ')', ':', ';', ' '];

/// Errors raised while building an agent configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// A named set of search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 200 cycles of plain UCB.
    Weak,
    /// 10000 cycles of plain UCB.
    Medium,
    /// 10000 cycles with alternating exploitation sign and more exploration.
    Strong,
    /// No search, uniformly random legal moves.
    Random,
}

impl Preset {
    const ALL: [Preset; 4] = [Preset::Weak, Preset::Medium, Preset::Strong, Preset::Random];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Weak => "weak",
            Preset::Medium => "medium",
            Preset::Strong => "strong",
            Preset::Random => "random",
        }
    }

    /// The `key=value` pairs this preset forces.
    fn overrides(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Preset::Weak => &[("N", "200"), ("c", "0.1"), ("psi", "1")],
            Preset::Medium => &[("N", "10000"), ("c", "0.1"), ("psi", "1")],
            Preset::Strong => &[("N", "10000"), ("c", "0.2"), ("psi", "-1")],
            Preset::Random => &[],
        }
    }
}

/// Configuration of a player agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub role: Stone,
    /// `None` means the agent plays uniformly random legal moves.
    pub search: Option<SearchConfig>,
    /// Every `key=value` pair after defaults and presets were applied.
    pub meta: BTreeMap<String, String>,
}

impl AgentConfig {
    /// Parses whitespace separated `key=value` tokens. A token without `=` sets the key to
    /// itself, which is how presets are selected (`strong`, `weak`, ...).
    ///
    /// Search is enabled iff `N` or `T` is non-zero once presets are applied; a non-zero `T`
    /// (milliseconds) takes precedence over `N`.
    pub fn parse(args: &str) -> Result<Self, ConfigError> {
        let mut meta = BTreeMap::new();
        for token in DEFAULT_ARGS.split_whitespace().chain(args.split_whitespace()) {
            let (key, value) = token.split_once('=').unwrap_or((token, token));
            meta.insert(key.to_string(), value.to_string());
        }

        let preset = Preset::ALL
            .into_iter()
            .find(|preset| meta.contains_key(preset.name()));
        if let Some(preset) = preset {
            for (key, value) in preset.overrides() {
                let explicit = format!("{}=", key);
                if args.split_whitespace().any(|token| token.starts_with(&explicit)) {
                    warn!("preset {} overrides {}={}", preset.name(), key, meta[*key]);
                }
                meta.insert(key.to_string(), value.to_string());
            }
            meta.insert("name".to_string(), preset.name().to_string());
        }

        let name = meta["name"].clone();
        if name.contains(FORBIDDEN_NAME_CHARS) {
            return Err(ConfigError::InvalidName(name));
        }
        let role: Stone = meta["role"].parse().map_err(ConfigError::InvalidRole)?;

        let iterations: u32 = parse_value(&meta, "N")?;
        let millis: u64 = parse_value(&meta, "T")?;
        let search_enabled = match preset {
            Some(Preset::Random) => false,
            _ => iterations != 0 || millis != 0,
        };

        let search = if search_enabled {
            let budget = if millis != 0 {
                Budget::Deadline(Duration::from_millis(millis))
            } else {
                Budget::Iterations(iterations)
            };
            let mut config = SearchConfig::default()
                .with_exploration(parse_value(&meta, "c")?)
                .with_decay(parse_value(&meta, "psi")?)
                .with_threads(parse_value(&meta, "threads")?)
                .with_budget(budget);
            if meta.contains_key("seed") {
                config = config.with_seed(parse_value(&meta, "seed")?);
            }
            Some(config)
        } else {
            None
        };

        Ok(AgentConfig {
            name,
            role,
            search,
            meta,
        })
    }

    /// Returns the seed given in the arguments, if any.
    pub fn seed(&self) -> Option<u64> {
        self.meta.get("seed").and_then(|v| v.parse().ok())
    }
}

impl FromStr for AgentConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentConfig::parse(s)
    }
}

fn parse_value<V: FromStr>(meta: &BTreeMap<String, String>, key: &str) -> Result<V, ConfigError> {
    let value = meta.get(key).map(String::as_str).unwrap_or_default();
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
