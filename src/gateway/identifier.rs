//! Player identifier parsing.
//!
//! Each game addresses players differently. Parsing is strict and local:
//! an identifier that fails here never reaches the cache or an upstream.

use std::fmt;
use thiserror::Error;

/// Why an identifier was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Invalid tag")]
    Tag,

    #[error("Invalid summoner name")]
    SummonerName,

    #[error("Invalid Riot ID, expected name#tag")]
    RiotId,

    #[error("Invalid PUUID")]
    Puuid,

    #[error("Invalid username")]
    Username,
}

/// Supercell player tag: uppercase, 3 to 15 ASCII alphanumerics, stored
/// without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerTag(String);

impl PlayerTag {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let tag = raw.strip_prefix('#').unwrap_or(raw).to_ascii_uppercase();
        let valid = (3..=15).contains(&tag.len()) && tag.bytes().all(|b| b.is_ascii_alphanumeric());
        if valid {
            Ok(Self(tag))
        } else {
            Err(IdentifierError::Tag)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tag as the Supercell APIs expect it in the path.
    pub fn with_hash(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// League of Legends summoner name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummonerName(String);

impl SummonerName {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let name = raw.trim();
        let len = name.chars().count();
        let valid = (3..=16).contains(&len)
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == ' ' || c == '_' || c == '.');
        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(IdentifierError::SummonerName)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Riot ignores case and spaces when matching summoner names.
    pub fn cache_id(&self) -> String {
        self.0
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

/// Riot ID, `gameName#tagLine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    name: String,
    tag: String,
}

impl RiotId {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let (name, tag) = raw.trim().split_once('#').ok_or(IdentifierError::RiotId)?;
        let (name, tag) = (name.trim(), tag.trim());

        let name_len = name.chars().count();
        let tag_len = tag.chars().count();
        if name_len == 0 || name_len > 16 || tag_len == 0 || tag_len > 5 || tag.contains('#') {
            return Err(IdentifierError::RiotId);
        }
        if name.chars().chain(tag.chars()).any(char::is_control) {
            return Err(IdentifierError::RiotId);
        }

        Ok(Self {
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn cache_id(&self) -> String {
        format!("{}#{}", self.name, self.tag).to_uppercase()
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.tag)
    }
}

/// Riot PUUID. Case-sensitive, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puuid(String);

impl Puuid {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let valid = (1..=128).contains(&raw.len())
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(IdentifierError::Puuid)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Epic display name used by Fortnite lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let name = raw.trim();
        let len = name.chars().count();
        if (3..=16).contains(&len) && !name.chars().any(char::is_control) {
            Ok(Self(name.to_string()))
        } else {
            Err(IdentifierError::Username)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn cache_id(&self) -> String {
        self.0.to_lowercase()
    }
}
