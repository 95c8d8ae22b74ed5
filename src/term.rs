use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal, Result};
use crossterm::style::{Attribute, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type TermInt = u16;
/// Screen position as `(x, y)`.
pub type ScreenCoords = (TermInt, TermInt);

/// Color scheme for a printed cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tint {
    Plain,
    Food,
    BadGuy,
    SnakeHead,
    Win,
    Loss,
}

impl Tint {
    fn colors(self) -> Option<(Color, Color, bool)> {
        match self {
            Tint::Plain => None,
            Tint::Food => Some((Color::Green, Color::Reset, true)),
            Tint::BadGuy => Some((Color::Red, Color::Reset, true)),
            Tint::SnakeHead => Some((Color::Cyan, Color::Reset, true)),
            Tint::Win => Some((Color::Black, Color::Green, false)),
            Tint::Loss => Some((Color::Black, Color::Red, false)),
        }
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<(char, Tint)>,
    current_msg: Option<Message>,
    active: bool,
}

struct Message {
    top_left: ScreenCoords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![(' ', Tint::Plain); width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None, active: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    /// Undoes [`setup`](Self::setup). Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> ScreenCoords {
        (self.width, self.height)
    }

    pub fn show_message(&mut self, lines: &[&str], tint: Tint) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Blank padding rows above and below the text
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ', tint)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch, tint)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Put back whatever the message covered
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                let saved = self.screen.get(self.index((x, y))).copied();
                if let Some((ch, tint)) = saved {
                    self.print_at_no_save((x, y), ch, tint)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: ScreenCoords, ch: char, tint: Tint) -> Result<()> {
        self.print_at_no_save(pos, ch, tint)?;
        let idx = self.index(pos);
        if let Some(slot) = self.screen.get_mut(idx) {
            *slot = (ch, tint);
        }
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: ScreenCoords, text: &str) -> Result<()> {
        for (x_diff, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + x_diff as TermInt, pos.1), ch, Tint::Plain)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.current_msg = None;
        self.screen = vec![(' ', Tint::Plain); self.width as usize * self.height as usize];
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: ScreenCoords) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }

    fn print_at_no_save(&mut self, pos: ScreenCoords, ch: char, tint: Tint) -> Result<()> {
        // Messages print through here so the screen buffer keeps what lies underneath
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1))?;

        match tint.colors() {
            None => queue!(self.stdout, style::Print(ch)),
            Some((fg, bg, bold)) => {
                queue!(self.stdout, style::SetForegroundColor(fg), style::SetBackgroundColor(bg))?;
                if bold {
                    queue!(self.stdout, style::SetAttribute(Attribute::Bold))?;
                }
                queue!(
                    self.stdout,
                    style::Print(ch),
                    style::SetAttribute(Attribute::Reset),
                    style::ResetColor
                )
            }
        }
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: ScreenCoords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> ScreenCoords {
        self.top_left
    }
}
