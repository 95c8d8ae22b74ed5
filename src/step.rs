use rand::Rng;
use tracing::{info, trace};

use crate::snake::Direction;
use crate::world::{Cell, GridWorld};
use crate::{offset, Coords};

/// What the snake head ran into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
    BadGuy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    Won,
    Lost(Collision),
}

impl StepOutcome {
    pub fn game_over(self) -> bool {
        !matches!(self, StepOutcome::Running)
    }

    pub fn win(self) -> bool {
        matches!(self, StepOutcome::Won)
    }
}

impl GridWorld {
    /// Advances the world by one tick: bad guys first, then the snake.
    ///
    /// `input` is the direction the player asked for this tick, if any. A
    /// request to reverse onto the neck is ignored. After the call,
    /// [`dirty`](GridWorld::dirty) lists the cells vacated this tick; the
    /// renderer redraws those plus the snake and the bad guys.
    pub fn step<R: Rng + ?Sized>(&mut self, input: Option<Direction>, rng: &mut R) -> StepOutcome {
        self.dirty.clear();

        self.move_bad_guys(rng);

        if let Some(dir) = input {
            self.snake.set_direction(dir);
        }

        let outcome = self.advance_snake();
        trace!(
            head = ?self.snake.head(),
            len = self.snake.len(),
            score = self.score,
            food = self.food_count,
            ?outcome,
            "tick"
        );
        outcome
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Each bad guy only looks at its own vector and at the snake and grid as
    /// they were before this tick. Two bad guys may still pick the same cell.
    fn move_bad_guys<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.bad_guys.len() {
            let pos = self.bad_guys[i].pos;
            let target = offset(pos, self.bad_guys[i].vector);

            if rng.gen::<f64>() < self.config.badguy_switch_direction_prob {
                self.bad_guys[i].vector = self.pick_random_vector(pos, rng);
            } else if self.is_free(target) && !self.snake.contains(target) {
                self.bad_guys[i].pos = target;
                self.dirty.push(pos);
            } else {
                self.bad_guys[i].vector = self.pick_random_vector(pos, rng);
            }
        }
    }

    fn advance_snake(&mut self) -> StepOutcome {
        let new_head = self.snake.next_head();
        // Perimeter walls keep the head on the board, so off-grid means a wall too
        let cell = self.cell(new_head).unwrap_or(Cell::Wall);

        if let Some(collision) = self.collision_at(new_head, cell) {
            info!(?collision, score = self.score, "snake crashed");
            return StepOutcome::Lost(collision);
        }

        if let Cell::Food(value) = cell {
            self.eat(new_head, value);
        }

        if let Some(old_tail) = self.snake.advance(new_head) {
            self.dirty.push(old_tail);
        }

        if self.food_count == 0 {
            info!(score = self.score, "all food eaten");
            return StepOutcome::Won;
        }

        StepOutcome::Running
    }

    fn collision_at(&self, pos: Coords, cell: Cell) -> Option<Collision> {
        if cell == Cell::Wall {
            Some(Collision::Wall)
        } else if self.snake.contains(pos) {
            Some(Collision::SelfBite)
        } else if self.bad_guy_at(pos) {
            Some(Collision::BadGuy)
        } else {
            None
        }
    }

    fn eat(&mut self, pos: Coords, value: u8) {
        self.set_cell(pos, Cell::Empty);
        self.food_count -= 1;
        self.score += u32::from(value);
        self.snake.grow(usize::from(value));
        // Shorter delay, faster game
        self.game_speed = (self.game_speed as f64 * self.config.speedup_factor) as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use crate::STATIONARY;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn body(world: &GridWorld) -> Vec<Coords> {
        world.snake().body().iter().copied().collect()
    }

    /// 9x11 board, snake on row 4 at columns 4..=6 heading right, plus one
    /// far away food so the game does not end on the first tick.
    fn board() -> GridWorld {
        let mut world = GridWorld::bare(9, 11);
        world.put_food((7, 1), 1);
        world
    }

    #[test]
    fn reversal_is_ignored() {
        let mut world = board();
        let outcome = world.step(Some(Left), &mut rng());

        assert_eq!(outcome, StepOutcome::Running);
        assert_eq!(world.snake_vector(), (0, 1));
        assert_eq!(world.snake().head(), (4, 7));
    }

    #[test]
    fn turn_is_taken_and_no_input_keeps_heading() {
        let mut world = board();
        let mut rng = rng();

        world.step(Some(Up), &mut rng);
        assert_eq!(world.snake().head(), (3, 6));
        world.step(None, &mut rng);
        assert_eq!(world.snake().head(), (2, 6));
        assert_eq!(world.snake_vector(), (-1, 0));
    }

    #[test]
    fn plain_move_trims_and_marks_tail() {
        let mut world = board();
        world.step(None, &mut rng());

        assert_eq!(body(&world), vec![(4, 5), (4, 6), (4, 7)]);
        assert_eq!(world.dirty(), &[(4, 4)]);
    }

    #[test]
    fn eating_grows_scores_and_speeds_up() {
        let mut world = board();
        world.put_food((4, 7), 5);
        let mut rng = rng();

        let outcome = world.step(None, &mut rng);
        assert_eq!(outcome, StepOutcome::Running);
        assert_eq!(world.score(), 5);
        assert_eq!(world.target_size(), 8);
        assert_eq!(world.food_count(), 1);
        assert_eq!(world.cell((4, 7)), Some(Cell::Empty));
        assert_eq!(world.game_speed(), 336);
        // one cell per tick, no tail removed
        assert_eq!(world.snake().len(), 4);
        assert!(world.dirty().is_empty());

        world.step(None, &mut rng);
        assert_eq!(world.snake().len(), 5);
        assert_eq!(world.game_speed(), 336);
    }

    #[test]
    fn last_food_wins() {
        let mut world = GridWorld::bare(9, 11);
        world.put_food((4, 7), 2);

        let outcome = world.step(None, &mut rng());
        assert_eq!(outcome, StepOutcome::Won);
        assert!(outcome.game_over() && outcome.win());
        assert_eq!(world.food_count(), 0);
        assert_eq!(world.score(), 2);
    }

    #[test]
    fn wall_ends_the_game_without_moving() {
        let mut world = board();
        let mut rng = rng();
        world.step(None, &mut rng);
        world.step(None, &mut rng);
        world.step(None, &mut rng);
        assert_eq!(world.snake().head(), (4, 9));

        let before = body(&world);
        let outcome = world.step(None, &mut rng);
        assert_eq!(outcome, StepOutcome::Lost(Collision::Wall));
        assert!(outcome.game_over() && !outcome.win());
        assert_eq!(body(&world), before);
    }

    #[test]
    fn obstacle_counts_as_wall() {
        let mut world = board();
        world.set_cell((4, 7), Cell::Wall);

        assert_eq!(world.step(None, &mut rng()), StepOutcome::Lost(Collision::Wall));
        assert_eq!(world.snake().len(), 3);
    }

    #[test]
    fn biting_own_body_is_fatal() {
        let mut world = board();
        world.put_food((4, 7), 2);
        let mut rng = rng();

        // grow to five cells, then curl back into the body
        world.step(None, &mut rng);
        world.step(None, &mut rng);
        world.step(Some(Down), &mut rng);
        world.step(Some(Left), &mut rng);
        assert_eq!(world.snake().len(), 5);

        let before = body(&world);
        let outcome = world.step(Some(Up), &mut rng);
        assert_eq!(outcome, StepOutcome::Lost(Collision::SelfBite));
        assert_eq!(body(&world), before);
    }

    #[test]
    fn running_into_bad_guy_is_fatal() {
        let mut world = board();
        // boxed in by the snake ahead of it, so it stays put
        world.put_bad_guy((4, 7), (0, -1));

        let outcome = world.step(None, &mut rng());
        assert_eq!(outcome, StepOutcome::Lost(Collision::BadGuy));
        assert_eq!(world.snake().len(), 3);
        assert_eq!(world.bad_guys()[0].pos, (4, 7));
    }

    #[test]
    fn fatal_tick_leaves_food_alone() {
        let mut world = board();
        world.put_food((4, 7), 3);
        world.put_bad_guy((4, 7), STATIONARY);

        let outcome = world.step(None, &mut rng());
        assert_eq!(outcome, StepOutcome::Lost(Collision::BadGuy));
        assert_eq!(world.cell((4, 7)), Some(Cell::Food(3)));
        assert_eq!(world.score(), 0);
        assert_eq!(world.food_count(), 2);
    }

    #[test]
    fn bad_guy_walks_its_vector_and_marks_old_cell() {
        let mut world = board();
        world.put_bad_guy((2, 2), (1, 1));

        world.step(None, &mut rng());
        assert_eq!(world.bad_guys()[0].pos, (3, 3));
        assert_eq!(world.bad_guys()[0].vector, (1, 1));
        assert!(world.dirty().contains(&(2, 2)));
    }

    #[test]
    fn bad_guy_can_walk_over_food() {
        let mut world = board();
        world.put_food((2, 3), 9);
        world.put_bad_guy((2, 2), (0, 1));

        world.step(None, &mut rng());
        assert_eq!(world.bad_guys()[0].pos, (2, 3));
        assert_eq!(world.cell((2, 3)), Some(Cell::Food(9)));
    }

    #[test]
    fn blocked_bad_guy_stays_and_picks_new_vector() {
        let mut world = board();
        world.put_bad_guy((1, 1), (-1, 0));

        world.step(None, &mut rng());
        let bad_guy = world.bad_guys()[0];
        assert_eq!(bad_guy.pos, (1, 1));
        assert!([(0, 1), (1, 0), (1, 1)].contains(&bad_guy.vector));
        assert!(!world.dirty().contains(&(1, 1)));
    }

    #[test]
    fn bad_guy_will_not_step_onto_snake() {
        let mut world = board();
        world.put_bad_guy((3, 5), (1, 0));

        world.step(None, &mut rng());
        assert_eq!(world.bad_guys()[0].pos, (3, 5));
        assert!(!world.dirty().contains(&(3, 5)));
    }

    #[test]
    fn switch_roll_rerolls_without_moving() {
        let mut world = board();
        world.config.badguy_switch_direction_prob = 1.0;
        world.put_bad_guy((2, 2), (0, 1));

        for _ in 0..10 {
            world.step(None, &mut rng());
            assert_eq!(world.bad_guys()[0].pos, (2, 2));
        }
    }

    #[test]
    fn outcome_flags() {
        assert_eq!((StepOutcome::Running.game_over(), StepOutcome::Running.win()), (false, false));
        assert_eq!((StepOutcome::Won.game_over(), StepOutcome::Won.win()), (true, true));
        let lost = StepOutcome::Lost(Collision::Wall);
        assert_eq!((lost.game_over(), lost.win()), (true, false));
    }
}
