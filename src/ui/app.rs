//! Main TUI application state and event loop

use crate::constants::{MAX_SPEED, MIN_SPEED};
use crate::controller::{Algorithm, SelectParams, Visualizer};
use crate::playback::PlaybackEvent;
use crate::snapshot::Step;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Oldest log lines are dropped past this
const LOG_CAPACITY: usize = 5_000;

/// Speed change per +/- press
const SPEED_STEP: u32 = 5;

/// Which pane receives Up/Down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Algorithms,
    Log,
}

impl FocusedPane {
    pub fn toggle(self) -> Self {
        match self {
            FocusedPane::Algorithms => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Algorithms,
        }
    }
}

/// The main application state
pub struct App {
    pub visualizer: Visualizer,

    /// Step currently on the canvas
    pub current: Option<Step>,

    /// Lines shown in the log pane
    pub log: Vec<String>,

    /// Highlighted row in the algorithm list
    pub cursor: usize,

    pub focused_pane: FocusedPane,

    /// `usize::MAX` follows the newest line
    pub log_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(visualizer: Visualizer) -> Self {
        App {
            visualizer,
            current: None,
            log: Vec::new(),
            cursor: 0,
            focused_pane: FocusedPane::Algorithms,
            log_scroll: usize::MAX,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.apply_events();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.visualizer.poll(Instant::now()) && !self.visualizer.playback().is_playing() {
                self.status_message = "Playback complete".to_string();
            }

            // Wake often enough for the fastest speed setting
            let timeout = self
                .visualizer
                .playback()
                .interval()
                .min(Duration::from_millis(50));
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Run `algorithm` and move the list cursor onto it
    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        if let Some(row) = Algorithm::ALL.iter().position(|a| *a == algorithm) {
            self.cursor = row;
        }
        match self
            .visualizer
            .select_algorithm(algorithm, SelectParams::default())
        {
            Ok(()) => {
                self.status_message = format!(
                    "{}: {} steps",
                    algorithm,
                    self.visualizer.playback().len()
                );
            }
            Err(e) => {
                tracing::error!(%algorithm, error = %e, "selection failed");
                self.status_message = format!("Error: {}", e);
            }
        }
        self.log_scroll = usize::MAX;
    }

    /// Move queued playback output into the canvas and log
    fn apply_events(&mut self) {
        for event in self.visualizer.drain_events() {
            match event {
                PlaybackEvent::Redraw(step) => self.current = Some(step),
                PlaybackEvent::Log(line) => {
                    self.log.push(line);
                    self.log_scroll = usize::MAX;
                }
            }
        }
        if self.log.len() > LOG_CAPACITY {
            let excess = self.log.len() - LOG_CAPACITY;
            self.log.drain(..excess);
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Canvas (left) | list and log (right)
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Algorithm::ALL.len() as u16 + 2),
                Constraint::Min(3),
            ])
            .split(columns[1]);

        let config = self.visualizer.config();
        let title = self
            .visualizer
            .selected()
            .map_or("Canvas", |a| a.name());
        super::panes::render_canvas_pane(
            frame,
            columns[0],
            self.current.as_ref(),
            title,
            (config.canvas_width, config.canvas_height),
        );

        super::panes::render_algorithm_pane(
            frame,
            right_rows[0],
            self.cursor,
            self.visualizer.selected(),
            self.focused_pane == FocusedPane::Algorithms,
        );

        super::panes::render_log_pane(
            frame,
            right_rows[1],
            &self.log,
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );

        let playback = self.visualizer.playback();
        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            super::panes::StatusRenderData {
                message: &self.status_message,
                position: playback.position(),
                total: playback.len(),
                speed: playback.speed(),
                is_playing: playback.is_playing(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.toggle();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Algorithms => {
                    self.cursor = self.cursor.saturating_sub(1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Algorithms => {
                    self.cursor = (self.cursor + 1).min(Algorithm::ALL.len() - 1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_add(1);
                }
            },
            KeyCode::Enter => {
                if let Some(&algorithm) = Algorithm::ALL.get(self.cursor) {
                    self.select_algorithm(algorithm);
                }
            }
            KeyCode::Char(' ') => {
                // Debounce key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    if self.visualizer.playback().is_playing() {
                        self.visualizer.pause();
                        self.status_message = "Paused".to_string();
                    } else {
                        self.visualizer.start(Instant::now());
                        self.status_message = if self.visualizer.playback().is_playing() {
                            "Playing...".to_string()
                        } else {
                            "Nothing to play".to_string()
                        };
                    }
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.visualizer.stop();
                self.status_message = "Stopped".to_string();
            }
            KeyCode::Left => {
                self.visualizer.previous();
                self.status_message = "Stepped backward".to_string();
            }
            KeyCode::Right => {
                self.visualizer.next();
                self.status_message = "Stepped forward".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = (self.visualizer.playback().speed() + SPEED_STEP).min(MAX_SPEED);
                self.change_speed(speed);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                let speed = self
                    .visualizer
                    .playback()
                    .speed()
                    .saturating_sub(SPEED_STEP)
                    .max(MIN_SPEED);
                self.change_speed(speed);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.visualizer.reshuffle_input();
                self.status_message = "New random input; press Enter to run".to_string();
            }
            _ => {}
        }
    }

    fn change_speed(&mut self, speed: u32) {
        self.status_message = match self.visualizer.set_speed(speed) {
            Ok(()) => format!(
                "Speed {} ({} ms per step)",
                speed,
                self.visualizer.playback().interval().as_millis()
            ),
            Err(e) => format!("Error: {}", e),
        };
    }
}
