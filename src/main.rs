//! Tilesmith - Entry Point
//!
//! A terminal viewer: walk a marker around generated worlds, build walls,
//! dig, zoom, switch worlds and save.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame, Terminal,
};

use tilesmith::data::{export_default_data, DataManager, DATA_DIR};
use tilesmith::render::{TileRenderer, DEFAULT_ZOOM_STEP};
use tilesmith::world::{Placement, Position, TILE_SIZE};
use tilesmith::{BuildParams, GameContext, WorldKind};

/// Target frames per second for the viewer loop
const TARGET_FPS: u64 = 30;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);
const SAVE_SLOT: u8 = 0;

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--export-data") {
        export_default_data(Path::new(DATA_DIR))?;
        println!("Default data written to {}", DATA_DIR);
        return Ok(());
    }
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);

    log::info!("Starting Tilesmith v{} with seed {}", env!("CARGO_PKG_VERSION"), seed);

    let mut viewer = Viewer::new(GameContext::new(seed, DataManager::new()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut viewer);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Viewer exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Tilesmith shut down cleanly");
    result
}

/// Log to a file so the terminal UI stays clean
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Ok(file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("tilesmith.log")
    {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, viewer: &mut Viewer) -> Result<()> {
    let mut last_frame = Instant::now();

    while !viewer.quit {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    viewer.handle_key(key);
                }
            }
        }

        if let Some(env) = viewer.game.current_mut() {
            env.clock.update(delta);
        }

        terminal.draw(|frame| viewer.render(frame))?;

        let frame_time = frame_start.elapsed();
        if frame_time < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - frame_time);
        }
    }
    Ok(())
}

struct Viewer {
    game: GameContext,
    player: Position,
    facing: (i32, i32),
    /// Map area in camera pixels
    screen: (f32, f32),
    status: String,
    quit: bool,
}

impl Viewer {
    fn new(game: GameContext) -> Result<Self> {
        let mut viewer = Self {
            game,
            player: Position::new(0, 0),
            facing: (0, 1),
            screen: (0.0, 0.0),
            status: String::new(),
            quit: false,
        };
        viewer.enter(WorldKind::Home, 0);
        if viewer.game.current().is_none() {
            anyhow::bail!("could not build the home world: {}", viewer.status);
        }
        viewer.status = String::from("arrows move, b build, x dig, +/- zoom, n descend, h/o/g worlds, s/l save/load, q quit");
        Ok(viewer)
    }

    fn enter(&mut self, kind: WorldKind, level: u32) {
        let screen = self.screen;
        match self.game.enter(kind, level) {
            Ok(env) => {
                self.player = env.start;
                env.reset_camera(screen.0, screen.1, BuildParams::for_kind(env.kind, env.level).fixed_camera);
                env.check_tile(env.start.x, env.start.y, true);
                self.status = format!("Entered {}", env.name);
            }
            Err(e) => self.status = format!("Build failed: {}", e),
        }
    }

    fn descend(&mut self) {
        let screen = self.screen;
        match self.game.descend() {
            Ok(env) => {
                self.player = env.start;
                env.reset_camera(screen.0, screen.1, false);
                env.check_tile(env.start.x, env.start.y, true);
                self.status = format!("Descended to {}", env.name);
            }
            Err(e) => self.status = format!("Build failed: {}", e),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up => self.step(0, -1),
            KeyCode::Down => self.step(0, 1),
            KeyCode::Left => self.step(-1, 0),
            KeyCode::Right => self.step(1, 0),
            KeyCode::Char('b') => self.build(),
            KeyCode::Char('x') => self.dig(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(DEFAULT_ZOOM_STEP),
            KeyCode::Char('-') => self.zoom(-DEFAULT_ZOOM_STEP),
            KeyCode::Char('n') => self.descend(),
            KeyCode::Char('h') => self.enter(WorldKind::Home, 0),
            KeyCode::Char('o') => self.enter(WorldKind::Overworld, 0),
            KeyCode::Char('g') => self.enter(WorldKind::Garden, 0),
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('l') => self.load(),
            _ => {}
        }
    }

    fn facing_tile(&self) -> Position {
        self.player.offset(self.facing.0, self.facing.1)
    }

    fn step(&mut self, dx: i32, dy: i32) {
        self.facing = (dx, dy);
        let target = self.player.offset(dx, dy);
        let Some(env) = self.game.current_mut() else {
            return;
        };
        if env.grid.is_blocked(target.x, target.y) {
            return;
        }
        self.player = target;
        env.check_tile(target.x, target.y, false);
        env.camera.follow(target);
    }

    fn build(&mut self) {
        let at = self.facing_tile();
        let Some(env) = self.game.current_mut() else {
            return;
        };
        self.status = match env.place_tile(at.x, at.y) {
            Placement::Refused => format!("Cannot build at ({}, {})", at.x, at.y),
            Placement::Marker => format!("Built at ({}, {})", at.x, at.y),
            Placement::Enclosed(id) => {
                let size = env.room(id).map_or(0, |r| r.tiles.len());
                format!("Enclosed a room of {} tiles", size)
            }
        };
    }

    fn dig(&mut self) {
        let at = self.facing_tile();
        let Some(env) = self.game.current_mut() else {
            return;
        };
        self.status = if env.create_tunnel(at.x, at.y) {
            format!("Dug ({}, {})", at.x, at.y)
        } else {
            format!("Nothing to dig at ({}, {})", at.x, at.y)
        };
    }

    fn zoom(&mut self, step: f32) {
        if let Some(env) = self.game.current_mut() {
            if step > 0.0 {
                env.camera.zoom_in(step);
            } else {
                env.camera.zoom_out(-step);
            }
        }
    }

    fn save(&mut self) {
        let Some(env) = self.game.current() else {
            return;
        };
        self.status = match tilesmith::save::save_world(SAVE_SLOT, env, self.player) {
            Ok(()) => format!("Saved {}", env.name),
            Err(e) => format!("Save failed: {}", e),
        };
    }

    fn load(&mut self) {
        match tilesmith::save::load_world(SAVE_SLOT, self.screen.0, self.screen.1) {
            Ok(snapshot) => {
                self.player = snapshot.player;
                let env = self.game.restore(snapshot.environment, snapshot.player);
                self.status = format!("Loaded {}", env.name);
            }
            Err(e) => self.status = format!("Load failed: {}", e),
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());
        let (map_area, status_area) = (chunks[0], chunks[1]);

        let screen = (map_area.width as f32 * TILE_SIZE, map_area.height as f32 * TILE_SIZE);
        let player = self.player;
        let Some(env) = self.game.current_mut() else {
            return;
        };
        if screen != self.screen {
            env.camera.resize(screen.0, screen.1);
            env.camera.follow(player);
        }
        self.screen = screen;

        frame.render_widget(TileRenderer::new(env).with_player(player), map_area);

        let clock = &env.clock;
        let line = format!(
            "{} ({}, {}) day {} {:02}:{:02} zoom {:.2} | {}",
            env.name,
            player.x,
            player.y,
            clock.day(),
            clock.hour(),
            clock.minute() % 60,
            env.camera.zoom,
            self.status
        );
        frame.render_widget(
            Paragraph::new(line).style(Style::default().fg(Color::Rgb(200, 200, 210))),
            status_area,
        );
    }
}
