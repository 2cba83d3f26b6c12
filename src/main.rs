// algoviz: step-through algorithm visualizer

use std::fs::File;
use std::io;
use std::sync::Mutex;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use algoviz::config::{VisualizerConfig, USAGE};
use algoviz::controller::Visualizer;
use algoviz::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match VisualizerConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if config.show_help {
        println!("{}", USAGE);
        return Ok(());
    }

    // The terminal belongs to the TUI, so tracing only goes to a file
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "algoviz=info".into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }

    tracing::info!(seed = ?config.seed, speed = config.speed, "starting algoviz");

    let initial = config.initial_algorithm;
    let visualizer = Visualizer::new(config)?;
    let mut app = App::new(visualizer);
    if let Some(algorithm) = initial {
        app.select_algorithm(algorithm);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "event loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
