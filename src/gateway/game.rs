//! Supported games.

use std::fmt;

/// Cache namespace for Valorant rank lookups, kept apart from accounts.
pub const VALORANT_RANK_NAMESPACE: &str = "valorant-rank";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    BrawlStars,
    ClashRoyale,
    ClashOfClans,
    LeagueOfLegends,
    Valorant,
    Fortnite,
}

impl Game {
    pub fn name(self) -> &'static str {
        match self {
            Game::BrawlStars => "Brawl Stars",
            Game::ClashRoyale => "Clash Royale",
            Game::ClashOfClans => "Clash of Clans",
            Game::LeagueOfLegends => "League of Legends",
            Game::Valorant => "Valorant",
            Game::Fortnite => "Fortnite",
        }
    }

    /// Prefix of this game's cache keys.
    pub fn cache_namespace(self) -> &'static str {
        match self {
            Game::BrawlStars => "brawl",
            Game::ClashRoyale => "clash",
            Game::ClashOfClans => "coc",
            Game::LeagueOfLegends => "lol",
            Game::Valorant => "valorant",
            Game::Fortnite => "fortnite",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
