use std::path::PathBuf;

use clap::Parser as _;
use color_eyre::eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
};
use snowfall_config::Preferences;
use snowfall_core::FRAME_INTERVAL;
use snowfall_sim::{SnowfallField, Sprite};

mod canvas;
mod cli_args;
mod frame_clock;
mod logging;

use canvas::Canvas;
use cli_args::CliArgs;
use frame_clock::FrameClock;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli_args = CliArgs::parse();
    let config_path = match &cli_args.config {
        Some(path) => path.clone(),
        None => Preferences::default_path()?,
    };
    let preferences = Preferences::load(&config_path)?;
    logging::setup(&cli_args, &preferences)?;

    let app = App::new(preferences, config_path, &cli_args)?;
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Persisted user preferences.
    preferences: Preferences,
    /// Where the preferences are saved when toggled.
    config_path: PathBuf,
    /// Particle count from the command line, not persisted.
    count_override: Option<usize>,
    /// Seed from the command line.
    seed: Option<u64>,
    /// The snowflakes.
    field: SnowfallField,
    /// Pixels the snowflakes are composited into.
    canvas: Canvas,
    /// Terminal size the field was last populated for.
    last_size: Option<(u16, u16)>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        preferences: Preferences,
        config_path: PathBuf,
        cli_args: &CliArgs,
    ) -> Result<Self> {
        let canvas = Canvas::new(0, 0, preferences.units_per_pixel, preferences.theme);
        Ok(Self {
            running: false,
            field: build_field(&preferences, cli_args.count, cli_args.seed)?,
            preferences,
            config_path,
            count_override: cli_args.count,
            seed: cli_args.seed,
            canvas,
            last_size: None,
        })
    }

    /// Run the application's main loop.
    ///
    /// The loop owns frame scheduling: it draws, then waits for input until the next
    /// frame is due.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        let mut clock = FrameClock::new(FRAME_INTERVAL);
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            clock.schedule_next();
            self.handle_crossterm_events(&clock)?;
        }
        Ok(())
    }

    /// Renders one frame of snowfall.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if self.last_size != Some((area.width, area.height)) {
            self.on_resize(area.width, area.height);
        }

        self.canvas.clear();
        self.field.render_frame(&mut self.canvas);
        frame.render_widget(&self.canvas, area);

        if area.height > 0 {
            let help_area = Rect {
                y: area.bottom() - 1,
                height: 1,
                ..area
            };
            frame.render_widget(self.help_line(), help_area);
        }
    }

    /// Repopulate the field for a new terminal size.
    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.canvas.resize(cols, rows);
        let viewport = self.canvas.viewport();
        self.field.on_viewport_resized(viewport.width, viewport.height);
        self.last_size = Some((cols, rows));
        tracing::debug!("Terminal resized to {cols}x{rows}");
    }

    fn help_line(&self) -> Line<'static> {
        let [r, g, b] = self.preferences.theme.flake_tint();
        let accent = Color::Rgb(r, g, b);
        let dim = Style::new().fg(Color::DarkGray);
        Line::from(vec![
            "q".bold().fg(accent),
            Span::styled(" quit  ", dim),
            "t".bold().fg(accent),
            Span::styled(" toggle theme  ", dim),
            "s".bold().fg(accent),
            Span::styled(
                format!(" sprite: {}", self.preferences.sprite.label()),
                dim,
            ),
        ])
        .centered()
    }

    /// Reads the crossterm events until the next frame is due.
    fn handle_crossterm_events(&mut self, clock: &FrameClock) -> Result<()> {
        while let Some(timeout) = clock.remaining() {
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key)?,
                // Picked up by `render()` comparing the frame area
                Event::Resize(_, _) => {}
                _ => {}
            }
            if !self.running {
                break;
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.toggle_theme(),
            (_, KeyCode::Char('s')) => self.toggle_sprite()?,
            _ => {}
        }
        Ok(())
    }

    /// Switch between the dark and light theme.
    fn toggle_theme(&mut self) {
        let theme = self.preferences.toggle_theme();
        self.canvas.set_theme(theme);
        self.save_preferences();
    }

    /// Switch sprite source and start a fresh snowfall with it.
    fn toggle_sprite(&mut self) -> Result<()> {
        self.preferences.toggle_sprite();
        self.field = build_field(&self.preferences, self.count_override, self.seed)?;
        self.last_size = None;
        self.save_preferences();
        Ok(())
    }

    fn save_preferences(&self) {
        if let Err(error) = self.preferences.save(&self.config_path) {
            tracing::warn!("Couldn't save preferences: {error:?}");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Build an unpopulated field with the sprite and tuning from the preferences.
fn build_field(
    preferences: &Preferences,
    count_override: Option<usize>,
    seed: Option<u64>,
) -> Result<SnowfallField> {
    let mut config = preferences.field;
    if let Some(count) = count_override {
        config.particle_count = count;
    }
    let sprite = Sprite::from_source(preferences.sprite, &config)?;
    tracing::debug!(
        "Built {:?} sprite ({}x{})",
        preferences.sprite,
        sprite.width(),
        sprite.height()
    );

    Ok(match seed {
        Some(seed) => SnowfallField::with_seed(config, sprite, seed),
        None => SnowfallField::new(config, sprite),
    })
}
