use crate::{
    config::{Difficulty, Mode},
    events::{Event, Events, Input},
    game::Game,
    layout::Metrics,
    surface::{Face, Rect, Surface, Visual},
};
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, trace, warn};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect as Area},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use typed_builder::TypedBuilder;

const NUMBERS: [&str; 9] = ["", "1", "2", "3", "4", "5", "6", "7", "8"];
const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

#[derive(Debug, TypedBuilder)]
pub(crate) struct Ui {
    mode: Mode,
    difficulty: Difficulty,
    cell_width: u16,
    cell_height: u16,
    #[builder(default)]
    seed: Option<u64>,
}

/// Raw mode, the alternate screen and mouse capture, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen) {
            warn!("failed to leave the alternate screen: {err}");
        }
        if let Err(err) = disable_raw_mode() {
            warn!("failed to disable raw mode: {err}");
        }
    }
}

enum Action {
    Quit,
    Reset,
    Ignore,
}

fn key_action(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('r') => Action::Reset,
        _ => Action::Ignore,
    }
}

impl Ui {
    pub(crate) fn run(self) -> Result<()> {
        let metrics = Metrics::terminal(self.cell_width, self.cell_height);
        let mut game = match self.seed {
            Some(seed) => Game::seeded(self.mode, self.difficulty, metrics, seed),
            None => Game::new(self.mode, self.difficulty, metrics),
        }?;

        let guard = TerminalGuard::enter().context("failed to set up the terminal")?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.hide_cursor()?;

        let events = Events::new();
        ctrlc::set_handler(events.quit_handle()).context("failed to install the Ctrl-C handler")?;

        let window = game.layout().window();
        let size = terminal.size()?;
        if i32::from(size.width) < window.width || i32::from(size.height) < window.height {
            warn!(
                "terminal is {}x{} but the board needs {}x{}",
                size.width, size.height, window.width, window.height
            );
        }

        loop {
            terminal.draw(|frame| game.render(&mut FrameSurface { frame }))?;

            match events.next()? {
                Event::Input(Input::Click(click)) => game.on_click(click),
                Event::Input(Input::Key(key)) => match key_action(key) {
                    Action::Quit => break,
                    Action::Reset => game.reset(),
                    Action::Ignore => {}
                },
                Event::Tick => {}
                Event::Quit => break,
            }
        }

        info!("leaving with the game {:?}", game.state());
        terminal.show_cursor()?;
        drop(guard);
        Ok(())
    }
}

/// Draws visuals as ratatui widgets on a frame.
struct FrameSurface<'a, 'b> {
    frame: &'a mut Frame<'b>,
}

impl FrameSurface<'_, '_> {
    fn clip(&self, rect: Rect) -> Option<Area> {
        let area = Area::new(
            u16::try_from(rect.x).ok()?,
            u16::try_from(rect.y).ok()?,
            u16::try_from(rect.width).ok()?,
            u16::try_from(rect.height).ok()?,
        )
        .intersection(self.frame.size());
        (area.width > 0 && area.height > 0).then_some(area)
    }
}

/// Vertically centers a single line of text in `height` rows.
fn centered(text: &'static str, height: u16) -> Text<'static> {
    let mut lines = vec![Line::default(); usize::from(height.saturating_sub(1) / 2)];
    lines.push(Line::from(text));
    Text::from(lines)
}

fn number_color(n: u8) -> Color {
    match n {
        1 => Color::LightBlue,
        2 => Color::Green,
        3 => Color::LightRed,
        4 => Color::Blue,
        5 => Color::Red,
        6 => Color::Cyan,
        7 => Color::Magenta,
        _ => Color::Gray,
    }
}

impl Surface for FrameSurface<'_, '_> {
    fn render(&mut self, visual: Visual, rect: Rect) {
        let Some(area) = self.clip(rect) else {
            trace!("{} at {rect:?} is off screen", visual.key());
            return;
        };
        let bordered = area.width >= 3 && area.height >= 3;
        let raised = |text: &'static str, style: Style| {
            let (block, height) = if bordered {
                (Block::default().borders(Borders::ALL), area.height - 2)
            } else {
                (Block::default(), area.height)
            };
            Paragraph::new(centered(text, height))
                .alignment(Alignment::Center)
                .style(style)
                .block(block)
        };

        match visual {
            Visual::Background(mode) => {
                let title = match mode {
                    Mode::Beginner => " Beginner ",
                    Mode::Intermediate => " Intermediate ",
                    Mode::Expert => " Expert ",
                };
                self.frame.render_widget(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .style(Style::default().fg(Color::Gray)),
                    area,
                );
            }
            Visual::DigitPanel => self.frame.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::DarkGray).bg(Color::Black)),
                area,
            ),
            Visual::Digit(d) => self.frame.render_widget(
                Paragraph::new(DIGITS[usize::from(d % 10)]).style(
                    Style::default()
                        .fg(Color::Red)
                        .bg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
                area,
            ),
            Visual::Face(face) => {
                let text = match face {
                    Face::Playing => ":)",
                    Face::Won => "B)",
                    Face::Lost => ":(",
                };
                self.frame.render_widget(
                    raised(text, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    area,
                );
            }
            Visual::TileHidden => self.frame.render_widget(
                raised("", Style::default().fg(Color::White).bg(Color::DarkGray)),
                area,
            ),
            Visual::TileFlag => self.frame.render_widget(
                raised(
                    "F",
                    Style::default()
                        .fg(Color::LightRed)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
                area,
            ),
            Visual::TileMine => self.frame.render_widget(
                Paragraph::new(centered("*", area.height))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Black).bg(Color::Red)),
                area,
            ),
            Visual::Tile(n) => self.frame.render_widget(
                Paragraph::new(centered(NUMBERS[usize::from(n.min(8))], area.height))
                    .alignment(Alignment::Center)
                    .style(
                        Style::default()
                            .fg(number_color(n))
                            .bg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    ),
                area,
            ),
        }
    }
}
