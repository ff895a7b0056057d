use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ConfigError, SessionError};
use crate::hand_history::LogDialect;

/// Maps a canonical player identity to the names it has used in logs.
///
/// Identities iterate in sorted order so reports come out the same on
/// every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(BTreeMap<String, Vec<String>>);

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity with its aliases, replacing any earlier entry.
    pub fn insert<I, S>(&mut self, identity: impl Into<String>, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(identity.into(), aliases.into_iter().map(Into::into).collect());
    }

    /// Builder style version of [`AliasTable::insert`].
    pub fn with<I, S>(mut self, identity: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(identity, aliases);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn aliases(&self, identity: &str) -> Option<&[String]> {
        self.0.get(identity).map(Vec::as_slice)
    }

    /// Reverse lookup from a log name to its identity.
    pub fn identity_for(&self, alias: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a == alias))
            .map(|(identity, _)| identity.as_str())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (identity, aliases) in &self.0 {
            if aliases.is_empty() {
                return Err(ConfigError::EmptyAliasList(identity.clone()));
            }
            for alias in aliases {
                match owners.entry(alias.as_str()) {
                    Entry::Vacant(slot) => {
                        slot.insert(identity.as_str());
                    }
                    Entry::Occupied(slot) if *slot.get() != identity.as_str() => {
                        return Err(ConfigError::DuplicateAlias {
                            alias: alias.clone(),
                            first: slot.get().to_string(),
                            second: identity.clone(),
                        });
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }
        Ok(())
    }
}

/// Everything a session run needs to know that is not in the log itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stack every player is seeded with and buys back in for
    pub starting_stack: u64,
    /// Big blind of the game, used for chart headroom
    pub big_blind: u64,
    /// Marker tokens of the log format
    pub dialect: LogDialect,
    /// Canonical identities and their log names
    pub aliases: AliasTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_stack: 10_000,
            big_blind: 100,
            dialect: LogDialect::default(),
            aliases: AliasTable::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn small_blind(&self) -> u64 {
        self.big_blind / 2
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_stack == 0 {
            return Err(ConfigError::NonPositiveStartingStack);
        }
        if self.big_blind == 0 {
            return Err(ConfigError::NonPositiveBigBlind);
        }
        self.dialect.validate()?;
        self.aliases.validate()
    }

    /// Parse and validate a config from JSON text. Missing fields take
    /// their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SessionError> {
        debug!(?path, "Loading session config");
        let json = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SessionConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}
