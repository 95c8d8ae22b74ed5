mod game;
mod term;

use anyhow::Result;
use game::{Flow, SnakeGame};
use tracing::error;

fn main() -> Result<()> {
    init_tracing();

    let mut game = SnakeGame::new()?;
    let result = run(&mut game);

    if let Err(err) = game.shutdown() {
        error!(?err, "failed to restore terminal");
    }
    result
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(game: &mut SnakeGame) -> Result<()> {
    game.initialize()?;

    if let Flow::Quit = game.show_intro()? {
        return Ok(());
    }

    // Each round ends on win or loss; the player picks whether to go again
    while let Flow::Continue = game.play()? {}

    Ok(())
}
