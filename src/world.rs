use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{GameConfig, Symbols, INITIAL_SNAKE_LENGTH};
use crate::error::{ConfigError, Result};
use crate::snake::{Direction, Snake};
use crate::{offset, Coords, GridInt, Vector, STATIONARY};

/// Compass and diagonal moves, in the order they are considered.
const ALL_VECTORS: [Vector; 8] = [
    (0, -1), (0, 1), (-1, 0), (1, 0),
    (-1, -1), (1, 1), (-1, 1), (1, -1),
];

/// Static content of a grid cell. Snake and bad guys are tracked separately.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Food(u8),
}

impl Cell {
    /// Empty or food: somewhere a bad guy may walk.
    pub fn is_free(self) -> bool {
        matches!(self, Cell::Empty | Cell::Food(_))
    }
}

/// What the renderer should draw at a position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Wall,
    Food(u8),
    SnakeBody,
    SnakeHead,
    BadGuy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BadGuy {
    pub pos: Coords,
    pub vector: Vector,
}

#[derive(Clone, Debug)]
pub struct GridWorld {
    pub(crate) config: GameConfig,
    pub(crate) grid: Vec<Vec<Cell>>,
    pub(crate) snake: Snake,
    pub(crate) bad_guys: Vec<BadGuy>,
    pub(crate) food_count: usize,
    pub(crate) obstacles: usize,
    pub(crate) score: u32,
    pub(crate) game_speed: u64,
    pub(crate) dirty: Vec<Coords>,
}

impl GridWorld {
    /// Builds a fresh board: perimeter walls, a centered snake heading right,
    /// then obstacles, food and bad guys placed by rejection sampling.
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let (height, width) = (config.height, config.width);
        let mut grid = vec![vec![Cell::Empty; width as usize]; height as usize];
        let mut dirty = Vec::with_capacity(height as usize * width as usize);

        for y in 0..height {
            for x in 0..width {
                dirty.push((y, x)); // first frame redraws everything

                if y == 0 || y == height - 1 || x == 0 || x == width - 1 {
                    grid[y as usize][x as usize] = Cell::Wall;
                }
            }
        }

        let snake = Snake::new((height / 2, width / 2), INITIAL_SNAKE_LENGTH, Direction::Right);
        let game_speed = config.game_speed;

        let mut world = GridWorld {
            config,
            grid,
            snake,
            bad_guys: vec![],
            food_count: 0,
            obstacles: 0,
            score: 0,
            game_speed,
            dirty,
        };

        world.place_obstacles(rng)?;
        world.place_food(rng)?;
        world.place_bad_guys(rng)?;

        debug!(
            height,
            width,
            obstacles = world.obstacles,
            food = world.food_count,
            bad_guys = world.bad_guys.len(),
            "board generated"
        );

        Ok(world)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn symbols(&self) -> &Symbols {
        &self.config.symbols
    }

    pub fn height(&self) -> GridInt {
        self.config.height
    }

    pub fn width(&self) -> GridInt {
        self.config.width
    }

    /// Grid content at `pos`, or `None` off the board.
    pub fn cell(&self, pos: Coords) -> Option<Cell> {
        let (y, x) = pos;
        if y < 0 || x < 0 {
            return None;
        }
        self.grid.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    /// Can a bad guy move into this position?
    pub fn is_free(&self, pos: Coords) -> bool {
        self.cell(pos).map_or(false, Cell::is_free)
    }

    /// True when `pos` and all eight of its neighbours are empty.
    pub fn is_empty_area(&self, pos: Coords) -> bool {
        (-1..=1).all(|dy| (-1..=1).all(|dx| self.cell(offset(pos, (dy, dx))) == Some(Cell::Empty)))
    }

    pub fn bad_guy_at(&self, pos: Coords) -> bool {
        self.bad_guys.iter().any(|b| b.pos == pos)
    }

    /// Uniform choice among the moves from `pos` that land on a free cell,
    /// or [`STATIONARY`] when boxed in.
    pub fn pick_random_vector<R: Rng + ?Sized>(&self, pos: Coords, rng: &mut R) -> Vector {
        let targets: Vec<Vector> = ALL_VECTORS.iter()
            .copied()
            .filter(|v| self.is_free(offset(pos, *v)))
            .collect();

        targets.choose(rng).copied().unwrap_or(STATIONARY)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn snake_vector(&self) -> Vector {
        self.snake.vector()
    }

    pub fn target_size(&self) -> usize {
        self.snake.target_size()
    }

    pub fn bad_guys(&self) -> &[BadGuy] {
        &self.bad_guys
    }

    pub fn bad_guy_positions(&self) -> Vec<Coords> {
        self.bad_guys.iter().map(|b| b.pos).collect()
    }

    /// Cells whose content changed during the last tick (the whole board
    /// right after construction).
    pub fn dirty(&self) -> &[Coords] {
        &self.dirty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food_count(&self) -> usize {
        self.food_count
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles
    }

    /// Current delay between ticks in milliseconds.
    pub fn game_speed(&self) -> u64 {
        self.game_speed
    }

    /// Topmost thing at `pos`: bad guys over the snake head over its body over the grid.
    pub fn glyph_at(&self, pos: Coords) -> Option<Glyph> {
        let cell = self.cell(pos)?;

        let glyph = if self.bad_guy_at(pos) {
            Glyph::BadGuy
        } else if self.snake.head() == pos {
            Glyph::SnakeHead
        } else if self.snake.contains(pos) {
            Glyph::SnakeBody
        } else {
            match cell {
                Cell::Empty => Glyph::Empty,
                Cell::Wall => Glyph::Wall,
                Cell::Food(value) => Glyph::Food(value),
            }
        };

        Some(glyph)
    }

    pub fn glyph_char(&self, glyph: Glyph) -> char {
        let symbols = self.symbols();
        match glyph {
            Glyph::Empty => ' ',
            Glyph::Wall => symbols.wall,
            Glyph::Food(value) => Symbols::food_char(value),
            Glyph::SnakeBody => symbols.snake,
            Glyph::SnakeHead => self.snake.head_char(),
            Glyph::BadGuy => symbols.bad_guy,
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn place_obstacles<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let (rows, cols) = self.inset_range(2);

        while self.obstacles < self.config.max_obstacles {
            let pos = self.sample(rng, &rows, &cols, "obstacle", |w, pos| w.is_isolated_spot(pos))?;
            self.set_cell(pos, Cell::Wall);
            self.obstacles += 1;
        }

        Ok(())
    }

    fn place_food<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let (rows, cols) = self.inset_range(1);

        while self.food_count < self.config.max_food {
            let pos = self.sample(rng, &rows, &cols, "food", |w, pos| w.is_isolated_spot(pos))?;
            let value = self.config.symbols.food.choose(rng).copied().unwrap_or(1);
            self.set_cell(pos, Cell::Food(value));
            self.food_count += 1;
        }

        Ok(())
    }

    fn place_bad_guys<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let (rows, cols) = self.inset_range(2);

        while self.bad_guys.len() < self.config.max_bad_guys {
            let pos = self.sample(rng, &rows, &cols, "bad guy", |w, pos| {
                w.cell(pos) == Some(Cell::Empty) && !w.snake.contains(pos) && !w.bad_guy_at(pos)
            })?;
            let vector = self.pick_random_vector(pos, rng);
            self.bad_guys.push(BadGuy { pos, vector });
        }

        Ok(())
    }

    /// Obstacles and food need an empty cell off the snake with nothing around it,
    /// so they never clump into dead ends.
    fn is_isolated_spot(&self, pos: Coords) -> bool {
        self.cell(pos) == Some(Cell::Empty) && !self.snake.contains(pos) && self.is_empty_area(pos)
    }

    /// Rows and columns at least `margin` cells in from the board edge.
    fn inset_range(&self, margin: GridInt) -> (RangeInclusive<GridInt>, RangeInclusive<GridInt>) {
        (margin..=self.height() - 1 - margin, margin..=self.width() - 1 - margin)
    }

    fn sample<R, F>(
        &self,
        rng: &mut R,
        rows: &RangeInclusive<GridInt>,
        cols: &RangeInclusive<GridInt>,
        entity: &'static str,
        accept: F,
    ) -> Result<Coords>
    where
        R: Rng + ?Sized,
        F: Fn(&Self, Coords) -> bool,
    {
        let attempts = self.config.max_placement_attempts;

        for _ in 0..attempts {
            let pos = (rng.gen_range(rows.clone()), rng.gen_range(cols.clone()));
            if accept(self, pos) {
                return Ok(pos);
            }
        }

        debug!(entity, attempts, "ran out of placement attempts");
        Err(ConfigError::PlacementExhausted { entity, attempts }.into())
    }

    pub(crate) fn set_cell(&mut self, pos: Coords, cell: Cell) {
        self.grid[pos.0 as usize][pos.1 as usize] = cell;
    }
}

#[cfg(test)]
impl GridWorld {
    /// Walled board with only the snake on it. Tests place the rest by hand.
    pub(crate) fn bare(height: GridInt, width: GridInt) -> Self {
        use rand::SeedableRng;

        let config = GameConfig::new(height, width)
            .with_food(0)
            .with_obstacles(0)
            .with_bad_guys(0)
            .with_switch_probability(0.0);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
        GridWorld::new(config, &mut rng).expect("bare board")
    }

    pub(crate) fn put_food(&mut self, pos: Coords, value: u8) {
        self.set_cell(pos, Cell::Food(value));
        self.food_count += 1;
    }

    pub(crate) fn put_bad_guy(&mut self, pos: Coords, vector: Vector) {
        self.bad_guys.push(BadGuy { pos, vector });
    }
}
