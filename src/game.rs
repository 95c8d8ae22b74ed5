use std::{thread::sleep, time::Duration};

use anyhow::{bail, Context, Result};
use numsnake::{Coords, Direction::{*, self}, GameConfig, Glyph, GridWorld, StepOutcome};
use rand::rngs::ThreadRng;
use tracing::info;

use crate::term::{ScreenCoords, TermInt, TermManager, Tint};

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};

const MIN_TERM_WIDTH: TermInt = 50;
const MIN_TERM_HEIGHT: TermInt = 20;

const PAUSE_POLL_MS: u64 = 20;
const GAME_OVER_GRACE_MS: u64 = 600;

/// Whether the player wants another round.
pub enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame {
    paused: bool,
    term: TermManager,
    config: GameConfig,
    rng: ThreadRng,
}

impl SnakeGame {
    pub fn new() -> Result<Self> {
        let term = TermManager::new().context("failed to read terminal size")?;
        Ok(SnakeGame { paused: false, term, config: GameConfig::default(), rng: rand::thread_rng() })
    }

    pub fn initialize(&mut self) -> Result<()> {
        let (w, h) = self.term.get_terminal_size();
        if w < MIN_TERM_WIDTH || h < MIN_TERM_HEIGHT {
            bail!("window too small: {}x{}, needs at least {}x{}", w, h, MIN_TERM_WIDTH, MIN_TERM_HEIGHT);
        }

        // Top row holds the status line, the last column stays blank
        self.config = GameConfig::new(h as i32 - 1, w as i32 - 1);
        self.config.validate().context("terminal does not fit a board")?;

        self.term.setup().context("failed to set up terminal")?;
        info!(height = self.config.height, width = self.config.width, "terminal ready");
        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Eat the numbers, dodge the bad guys",
            "Esc to pause",
            "q or CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines, Tint::Plain)?;

        if is_quit(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    pub fn play(&mut self) -> Result<Flow> {
        let mut world = GridWorld::new(self.config.clone(), &mut self.rng)
            .context("failed to build the board")?;
        let mut dir_change: Option<Direction> = None;

        info!(food = world.food_count(), bad_guys = world.bad_guys().len(), "game started");
        self.term.clear()?;
        self.draw(&world)?;

        loop {
            for key_ev in self.term.read_key_events_queue()? {
                match &key_ev {
                    ev if is_quit(ev) => return Ok(Flow::Quit),
                    KeyEvent { code, modifiers: _ } => match code {
                        KeyCode::Char('w') | KeyCode::Up => dir_change = Some(Up),
                        KeyCode::Char('a') | KeyCode::Left => dir_change = Some(Left),
                        KeyCode::Char('s') | KeyCode::Down => dir_change = Some(Down),
                        KeyCode::Char('d') | KeyCode::Right => dir_change = Some(Right),
                        KeyCode::Esc => self.toggle_pause()?,
                        _ => {}
                    }
                }
            }

            if self.paused {
                sleep(Duration::from_millis(PAUSE_POLL_MS));
                continue;
            }

            let outcome = world.step(dir_change.take(), &mut self.rng);
            self.draw(&world)?;

            if outcome.game_over() {
                return self.game_over(&world, outcome);
            }

            sleep(Duration::from_millis(world.game_speed()));
        }
    }

    /// Leaves the terminal the way we found it.
    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore().context("failed to restore terminal")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, world: &GridWorld, outcome: StepOutcome) -> Result<Flow> {
        let banner = if outcome.win() {" Y O U   W I N ! "} else {" G A M E   O V E R "};
        let tint = if outcome.win() {Tint::Win} else {Tint::Loss};

        if !outcome.win() {
            let dead = world.symbols().dead_snake;
            for pos in world.snake().body() {
                self.term.print_at(to_screen(*pos), dead, Tint::Loss)?;
            }
        }

        self.term.show_message(&[
            banner,
            &*format!("Score: {}", world.score()),
            "",
            "Press any key to play again,",
            "or q to quit."
        ], tint)?;

        // Swallow keys still held from the last moves
        sleep(Duration::from_millis(GAME_OVER_GRACE_MS));
        self.term.read_key_events_queue()?;

        if is_quit(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    fn draw(&mut self, world: &GridWorld) -> Result<()> {
        self.term.print_str_at((0, 0), &format!("Food left:{} ", world.food_count()))?;
        self.term.print_str_at((15, 0), &format!("Score:{} ", world.score()))?;
        self.term.print_str_at((27, 0), "Use Arrow keys, eat numbers (q to quit)")?;

        for pos in world.dirty() {
            self.draw_cell(world, *pos)?;
        }
        for pos in world.snake().body() {
            self.draw_cell(world, *pos)?;
        }
        for pos in world.bad_guy_positions() {
            self.draw_cell(world, pos)?;
        }

        self.term.flush()?;
        Ok(())
    }

    fn draw_cell(&mut self, world: &GridWorld, pos: Coords) -> Result<()> {
        if let Some(glyph) = world.glyph_at(pos) {
            let tint = match glyph {
                Glyph::Food(_) => Tint::Food,
                Glyph::BadGuy => Tint::BadGuy,
                Glyph::SnakeHead => Tint::SnakeHead,
                _ => Tint::Plain,
            };
            self.term.print_at(to_screen(pos), world.glyph_char(glyph), tint)?;
        }
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"], Tint::Plain)?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// Grid rows sit one line below the status line.
fn to_screen(pos: Coords) -> ScreenCoords {
    (pos.1 as TermInt, pos.0 as TermInt + 1)
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
        || matches!(ev, KeyEvent { code: KeyCode::Char('q'), .. })
}
