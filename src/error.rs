use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Reasons a [`GameConfig`](crate::GameConfig) cannot host a game.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board is {height}x{width}, needs at least {min_height}x{min_width}")]
    BoardTooSmall {
        height: i32,
        width: i32,
        min_height: i32,
        min_width: i32,
    },

    #[error("{requested} cells requested but the board interior only has {available}")]
    TooManyEntities { requested: usize, available: usize },

    #[error("food value pool is empty")]
    EmptyFoodPool,

    #[error("food value {0} is not a single digit between 1 and 9")]
    BadFoodValue(u8),

    #[error("direction switch probability {0} is outside [0, 1]")]
    BadSwitchProbability(f64),

    #[error("speedup factor {0} is outside (0, 1]")]
    BadSpeedupFactor(f64),

    #[error("placement attempt limit must be positive")]
    NoPlacementAttempts,

    #[error("gave up placing {entity} after {attempts} attempts")]
    PlacementExhausted { entity: &'static str, attempts: u32 },
}
