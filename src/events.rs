use crate::surface::{Click, MouseButton};
use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind, MouseEventKind};
use log::warn;
use std::{io, sync::mpsc, thread, time::Duration};

pub(crate) enum Event<I> {
    Input(I),
    Tick,
    Quit,
}

/// Terminal input the game loop cares about.
pub(crate) enum Input {
    Click(Click),
    Key(KeyEvent),
}

/// A small event handler that wraps crossterm input and tick events. Each
/// event type is produced on its own thread and delivered to a common
/// `Receiver`.
pub(crate) struct Events {
    tx: mpsc::Sender<Event<Input>>,
    rx: mpsc::Receiver<Event<Input>>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Config {
    tick_rate: Duration,
}

impl Config {
    fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }
}

fn translate(event: CEvent) -> Option<Input> {
    match event {
        CEvent::Mouse(mouse) => {
            let button = match mouse.kind {
                MouseEventKind::Down(event::MouseButton::Left) => MouseButton::Left,
                MouseEventKind::Down(event::MouseButton::Right) => MouseButton::Right,
                _ => return None,
            };
            Some(Input::Click(Click {
                x: i32::from(mouse.column),
                y: i32::from(mouse.row),
                button,
            }))
        }
        CEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Input::Key(key)),
        _ => None,
    }
}

/// Sends translated input until the receiver hangs up or reading fails. A
/// read failure asks the loop to quit.
fn forward<R>(mut read: R, tx: &mpsc::Sender<Event<Input>>)
where
    R: FnMut() -> io::Result<CEvent>,
{
    loop {
        match read() {
            Ok(event) => {
                if let Some(input) = translate(event) {
                    if tx.send(Event::Input(input)).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                warn!("stopped reading terminal events: {err}");
                let _ = tx.send(Event::Quit);
                return;
            }
        }
    }
}

impl Events {
    pub(crate) fn new() -> Self {
        Self::with_config(Config::new())
    }

    pub(crate) fn with_config(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            _input_handle: {
                let tx = tx.clone();
                thread::spawn(move || forward(event::read, &tx))
            },
            _tick_handle: {
                let tx = tx.clone();
                thread::spawn(move || loop {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    thread::sleep(config.tick_rate);
                })
            },
            tx,
            rx,
        }
    }

    /// A handle that can ask the loop to stop from outside it.
    pub(crate) fn quit_handle(&self) -> impl Fn() + Send + 'static {
        let tx = self.tx.clone();
        move || {
            let _ = tx.send(Event::Quit);
        }
    }

    pub(crate) fn next(&self) -> Result<Event<Input>, mpsc::RecvError> {
        self.rx.recv()
    }
}
