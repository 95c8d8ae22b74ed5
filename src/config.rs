use crate::error::ConfigError;
use crate::GridInt;

/// Smallest grid that still fits the perimeter, the starting snake and a
/// non-empty placement range for obstacles and bad guys.
pub const MIN_HEIGHT: GridInt = 5;
pub const MIN_WIDTH: GridInt = 5;

pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Legend used to draw the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbols {
    pub wall: char,
    pub snake: char,
    pub dead_snake: char,
    pub bad_guy: char,
    /// Food values are drawn uniformly from this pool, so repeats act as weights.
    pub food: Vec<u8>,
}

impl Default for Symbols {
    fn default() -> Self {
        Symbols {
            wall: '#',
            snake: 'O',
            dead_snake: 'X',
            bad_guy: 'W',
            food: vec![1, 1, 1, 2, 2, 3, 5, 9],
        }
    }
}

impl Symbols {
    pub fn food_char(value: u8) -> char {
        std::char::from_digit(u32::from(value), 10).unwrap_or('?')
    }
}

/// Parameters of a single game. The world keeps its own copy, so two games
/// never share state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Grid rows, perimeter walls included.
    pub height: GridInt,
    /// Grid columns, perimeter walls included.
    pub width: GridInt,
    /// Initial delay between ticks, in milliseconds.
    pub game_speed: u64,
    pub max_food: usize,
    pub max_obstacles: usize,
    pub max_bad_guys: usize,
    pub badguy_switch_direction_prob: f64,
    /// Applied to `game_speed` every time food is eaten.
    pub speedup_factor: f64,
    /// Rejection sampling budget for each placed entity.
    pub max_placement_attempts: u32,
    pub symbols: Symbols,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            height: 19,
            width: 49,
            game_speed: 350,
            max_food: 30,
            max_obstacles: 12,
            max_bad_guys: 12,
            badguy_switch_direction_prob: 0.03,
            speedup_factor: 0.96,
            max_placement_attempts: 10_000,
            symbols: Symbols::default(),
        }
    }
}

impl GameConfig {
    pub fn new(height: GridInt, width: GridInt) -> Self {
        GameConfig { height, width, ..Default::default() }
    }

    pub fn with_speed(mut self, game_speed: u64) -> Self {
        self.game_speed = game_speed;
        self
    }

    pub fn with_food(mut self, max_food: usize) -> Self {
        self.max_food = max_food;
        self
    }

    pub fn with_obstacles(mut self, max_obstacles: usize) -> Self {
        self.max_obstacles = max_obstacles;
        self
    }

    pub fn with_bad_guys(mut self, max_bad_guys: usize) -> Self {
        self.max_bad_guys = max_bad_guys;
        self
    }

    pub fn with_switch_probability(mut self, prob: f64) -> Self {
        self.badguy_switch_direction_prob = prob;
        self
    }

    /// Number of cells inside the perimeter walls.
    pub fn interior_cells(&self) -> usize {
        let rows = (self.height - 2).max(0) as usize;
        let cols = (self.width - 2).max(0) as usize;
        rows * cols
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height < MIN_HEIGHT || self.width < MIN_WIDTH {
            return Err(ConfigError::BoardTooSmall {
                height: self.height,
                width: self.width,
                min_height: MIN_HEIGHT,
                min_width: MIN_WIDTH,
            });
        }

        let requested =
            self.max_food + self.max_obstacles + self.max_bad_guys + INITIAL_SNAKE_LENGTH;
        let available = self.interior_cells();
        if requested > available {
            return Err(ConfigError::TooManyEntities { requested, available });
        }

        if self.symbols.food.is_empty() {
            return Err(ConfigError::EmptyFoodPool);
        }
        if let Some(&bad) = self.symbols.food.iter().find(|v| !(1..=9).contains(*v)) {
            return Err(ConfigError::BadFoodValue(bad));
        }

        if !(0.0..=1.0).contains(&self.badguy_switch_direction_prob) {
            return Err(ConfigError::BadSwitchProbability(self.badguy_switch_direction_prob));
        }
        if !(self.speedup_factor > 0.0 && self.speedup_factor <= 1.0) {
            return Err(ConfigError::BadSpeedupFactor(self.speedup_factor));
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::NoPlacementAttempts);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.game_speed, 350);
        assert_eq!(config.symbols.food, vec![1, 1, 1, 2, 2, 3, 5, 9]);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_tiny_board() {
        let err = GameConfig::new(4, 40).validate().unwrap_err();
        assert!(matches!(err, ConfigError::BoardTooSmall { height: 4, .. }));
    }

    #[test]
    fn rejects_more_entities_than_interior_cells() {
        // 3x3 interior holds the snake and six more cells
        let config = GameConfig::new(5, 5).with_food(4).with_obstacles(2).with_bad_guys(1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyEntities { requested: 10, available: 9 })
        );

        let fits = GameConfig::new(5, 5).with_food(0).with_obstacles(0).with_bad_guys(6);
        assert_eq!(fits.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_food_pool() {
        let mut config = GameConfig::default();
        config.symbols.food.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyFoodPool));

        config.symbols.food = vec![1, 0];
        assert_eq!(config.validate(), Err(ConfigError::BadFoodValue(0)));

        config.symbols.food = vec![10];
        assert_eq!(config.validate(), Err(ConfigError::BadFoodValue(10)));
    }

    #[test]
    fn rejects_out_of_range_factors() {
        let config = GameConfig::default().with_switch_probability(1.5);
        assert_eq!(config.validate(), Err(ConfigError::BadSwitchProbability(1.5)));

        let mut config = GameConfig::default();
        config.speedup_factor = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::BadSpeedupFactor(0.0)));

        let mut config = GameConfig::default();
        config.max_placement_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoPlacementAttempts));
    }

    #[test]
    fn food_chars_are_digits() {
        assert_eq!(Symbols::food_char(1), '1');
        assert_eq!(Symbols::food_char(9), '9');
    }
}
