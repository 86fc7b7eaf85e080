//! Game identifiers.
//!
//! Provider game ids have the form `SSSSTTNNNN`: the starting year of the
//! season, a two-digit game type, and a four-digit game number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest season for which shift charts are published.
pub const FIRST_SHIFT_SEASON: u32 = 2010;

/// Last season that fits the four-digit season field.
pub const LAST_SEASON: u32 = 9_999;

const SEASON_FACTOR: u64 = 1_000_000;
const TYPE_FACTOR: u64 = 10_000;
const MAX_GAME_NUMBER: u32 = 9_999;

/// Game id errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameIdError {
    /// Shift data is not available before [`FIRST_SHIFT_SEASON`].
    #[error("season {0} is before 2010; shift data is not available")]
    SeasonTooEarly(u32),
    /// The season does not fit in four digits.
    #[error("season {0} is after 9999")]
    SeasonTooLate(u32),
    /// The two-digit game type is not a known code.
    #[error("unknown game type code: {0:02}")]
    UnknownGameType(u8),
    /// The game number does not fit in four digits.
    #[error("game number {0} out of range (1-9999)")]
    NumberOutOfRange(u32),
    /// The string is not an integer game id.
    #[error("invalid game id: {0:?}")]
    Invalid(String),
}

/// Kind of game encoded in a game id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Preseason,
    Regular,
    Playoffs,
    AllStar,
}

impl GameType {
    pub const fn code(self) -> u8 {
        match self {
            Self::Preseason => 1,
            Self::Regular => 2,
            Self::Playoffs => 3,
            Self::AllStar => 4,
        }
    }

    pub const fn from_code(code: u8) -> Result<Self, GameIdError> {
        match code {
            1 => Ok(Self::Preseason),
            2 => Ok(Self::Regular),
            3 => Ok(Self::Playoffs),
            4 => Ok(Self::AllStar),
            other => Err(GameIdError::UnknownGameType(other)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preseason => "preseason",
            Self::Regular => "regular",
            Self::Playoffs => "playoffs",
            Self::AllStar => "all_star",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider game id. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Builds an id from its components.
    pub fn new(season: u32, game_type: GameType, number: u32) -> Result<Self, GameIdError> {
        validate_season(season)?;
        if number == 0 || number > MAX_GAME_NUMBER {
            return Err(GameIdError::NumberOutOfRange(number));
        }
        Ok(Self(
            u64::from(season) * SEASON_FACTOR
                + u64::from(game_type.code()) * TYPE_FACTOR
                + u64::from(number),
        ))
    }

    /// Starting year of the season, e.g. `2013` for 2013-2014.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn season(self) -> u32 {
        (self.0 / SEASON_FACTOR) as u32
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn game_type(self) -> Result<GameType, GameIdError> {
        GameType::from_code(((self.0 / TYPE_FACTOR) % 100) as u8)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn number(self) -> u32 {
        (self.0 % TYPE_FACTOR) as u32
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = GameIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| GameIdError::Invalid(s.to_string()))
    }
}

/// Checks that `season` has published shift charts and fits a game id.
pub const fn validate_season(season: u32) -> Result<(), GameIdError> {
    if season < FIRST_SHIFT_SEASON {
        return Err(GameIdError::SeasonTooEarly(season));
    }
    if season > LAST_SEASON {
        return Err(GameIdError::SeasonTooLate(season));
    }
    Ok(())
}

/// All regular-season game ids for a season, numbered `1..=count`.
pub fn season_game_ids(season: u32, count: u32) -> Result<Vec<GameId>, GameIdError> {
    validate_season(season)?;
    (1..=count)
        .map(|number| GameId::new(season, GameType::Regular, number))
        .collect()
}
