// src/main.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Timelike};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing_subscriber::EnvFilter;

use ambient_modules::calendar::{major_season_for, micro_season_for};
use ambient_modules::config::MAX_SECONDS;
use ambient_modules::scene::{scene_info, select_scene_now, SoundPresence};
use ambient_modules::session::export::render_to_wav;
use ambient_modules::weather::condition_for;
use ambient_modules::{AudioEngine, CpalBackend, EngineConfig, FileAssetSource, HeadlessBackend, OutputFormat, SceneId};

const FRAME: Duration = Duration::from_millis(50);
const RESELECT_EVERY: Duration = Duration::from_secs(60);
const VOLUME_STEP: f32 = 0.05;

#[derive(Parser, Debug)]
#[command(author, version, about = "Seasonal ambient soundscape for the desk", long_about = None)]
struct Cli {
    /// Directory containing the `sounds/` folder.
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// JSON engine configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never open an audio device; `run` then refuses to start.
    #[arg(long, global = true)]
    headless: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the soundscape with keyboard controls (default).
    Run {
        /// WMO weather code reported by the weather service.
        #[arg(long, default_value_t = 0)]
        weather: u16,
        /// Pin a scene instead of selecting from weather and clock.
        #[arg(long)]
        scene: Option<SceneId>,
        #[arg(long)]
        volume: Option<f32>,
    },
    /// Show the major and micro season for a date (today by default).
    Season {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Explain which scene would be selected.
    Scene {
        #[arg(long, default_value_t = 0)]
        weather: u16,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        hour: Option<u32>,
    },
    /// List the available scenes.
    Scenes,
    /// Render a scene to a WAV file without an audio device.
    Render {
        #[arg(long)]
        scene: SceneId,
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
        #[arg(long)]
        output: PathBuf,
        /// Mix the fireplace overlay in.
        #[arg(long)]
        overlay: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Run { weather: 0, scene: None, volume: None }) {
        Commands::Run { weather, scene, volume } => {
            ensure_audible(cli.headless)?;
            let engine = build_engine(config, false)?;
            if let Some(v) = volume {
                engine.set_volume(v);
            }
            run_interactive(engine, weather, scene).await
        }
        Commands::Season { date } => {
            print_season(date.unwrap_or_else(|| Local::now().date_naive()));
            Ok(())
        }
        Commands::Scene { weather, month, hour } => {
            let now = Local::now();
            let decision = scene_info(weather, month.unwrap_or(now.month()), hour.unwrap_or(now.hour()));
            let condition = condition_for(weather);
            println!("weather: {} ({:?})", condition.description, condition.theme);
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(())
        }
        Commands::Scenes => {
            let engine = build_engine(config, true)?;
            for id in engine.available_scenes() {
                match engine.catalog().definition(*id) {
                    Some(def) => println!("{id:<15} {} (+{} secondary)", def.base.asset, def.secondary.len()),
                    None => println!("{id:<15} -"),
                }
                if let Some(p) = SoundPresence::for_scene(*id) {
                    println!(
                        "{:<15} presence {:.2} +/-{:.2}, density {:.1}",
                        "", p.base_volume, p.fluctuation, p.density
                    );
                }
            }
            Ok(())
        }
        Commands::Render { scene, seconds, output, overlay } => {
            render_scene(config, scene, seconds, output, overlay).await
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from_disk(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(root) = &cli.assets {
        config.asset_root = root.clone();
    }
    Ok(config)
}

/// Interactive playback only makes sense with a device pulling the graph;
/// headless graphs are rendered by `render` instead.
fn ensure_audible(headless: bool) -> Result<()> {
    if headless {
        anyhow::bail!("`run` needs an audio device; use `render` for headless output");
    }
    Ok(())
}

fn render_length(seconds: f32) -> Result<Duration> {
    Duration::try_from_secs_f32(seconds)
        .ok()
        .filter(|d| d.as_secs_f32() <= MAX_SECONDS)
        .with_context(|| format!("--seconds must be within 0..={MAX_SECONDS}, got {seconds}"))
}

fn build_engine(config: EngineConfig, headless: bool) -> Result<AudioEngine> {
    let source = Arc::new(FileAssetSource::new(config.asset_root.clone()));
    let engine = if headless {
        let format = OutputFormat {
            sample_rate: config.headless_sample_rate,
            channels: config.headless_channels,
        };
        AudioEngine::new(config, HeadlessBackend::new(format), source)?
    } else {
        AudioEngine::new(config, CpalBackend, source)?
    };
    Ok(engine)
}

fn print_season(date: NaiveDate) {
    let major = major_season_for(&date);
    let micro = micro_season_for(&date);
    println!("{date}");
    println!("  {} ({}) - {}", major.name, major.reading, major.english);
    println!("  {} ({}) - {}", micro.name, micro.reading, micro.description);
}

async fn render_scene(config: EngineConfig, scene: SceneId, seconds: f32, output: PathBuf, overlay: bool) -> Result<()> {
    let length = render_length(seconds)?;
    let engine = build_engine(config, true)?;
    engine.initialize().await?;
    engine.set_scene(scene).await;
    engine.play().await;
    if overlay {
        engine.enable_overlay().await;
    }

    let graph = engine.graph().context("output graph was not created")?;
    let summary = render_to_wav(&graph, length, &output)?;
    engine.stop();

    println!(
        "wrote {} ({} frames, {} Hz, {} ch, peak {:.3})",
        output.display(),
        summary.frames,
        summary.sample_rate,
        summary.channels,
        summary.peak
    );
    Ok(())
}

struct Driver {
    engine: AudioEngine,
    weather: u16,
    auto: bool,
    /// Fireplace wanted by the user; survives stop/play.
    fire_requested: bool,
    last_check: Instant,
}

impl Driver {
    async fn reselect(&mut self) {
        self.last_check = Instant::now();
        let now = Local::now();
        let scene = select_scene_now(self.weather, &now);
        if scene != self.engine.scene() {
            self.engine.set_scene(scene).await;
            self.status(&format!("auto: {}", scene_info(self.weather, now.month(), now.hour()).reason));
        }
    }

    /// Returns false when the user asked to quit.
    async fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char(' ') => {
                let playing = self.engine.toggle().await;
                if playing && self.fire_requested && !self.engine.overlay_active() {
                    self.engine.enable_overlay().await;
                }
                self.status(if playing { "playing" } else { "stopped" });
            }
            KeyCode::Char('f') => {
                if self.fire_requested || self.engine.overlay_active() {
                    self.fire_requested = false;
                    self.engine.disable_overlay();
                    self.status("fireplace off");
                } else if self.engine.scene() == SceneId::Fire {
                    // The fire scene already is the fireplace.
                    self.status("fireplace is the current scene");
                } else {
                    self.fire_requested = true;
                    if self.engine.is_playing() {
                        self.engine.enable_overlay().await;
                        self.status("fireplace on");
                    } else {
                        self.status("fireplace on when playing");
                    }
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.engine.set_volume(self.engine.volume() + VOLUME_STEP);
                self.status("volume up");
            }
            KeyCode::Char('-') => {
                self.engine.set_volume(self.engine.volume() - VOLUME_STEP);
                self.status("volume down");
            }
            KeyCode::Char('n') => {
                self.auto = false;
                let next = self.engine.scene().next();
                self.engine.set_scene(next).await;
                self.status("manual scene");
            }
            KeyCode::Char('a') => {
                self.auto = true;
                self.reselect().await;
                self.status("auto scene");
            }
            KeyCode::Char('s') => {
                let snapshot = self.engine.snapshot();
                print!("{}\r\n", serde_json::to_string(&snapshot).unwrap_or_default());
            }
            _ => {}
        }
        true
    }

    fn status(&self, note: &str) {
        let state = self.engine.get_state();
        print!(
            "[{}] scene={} playing={} volume={:.2} fireplace={}\r\n",
            note, state.scene, state.is_playing, state.volume, state.overlay_active
        );
    }
}

async fn run_interactive(engine: AudioEngine, weather: u16, pinned: Option<SceneId>) -> Result<()> {
    let mut driver = Driver {
        engine,
        weather,
        auto: pinned.is_none(),
        fire_requested: false,
        last_check: Instant::now(),
    };

    match pinned {
        Some(scene) => driver.engine.set_scene(scene).await,
        None => driver.reselect().await,
    }
    driver.engine.play().await;

    println!("[SPACE] Play/Stop | [F] Fireplace | [+/-] Volume | [N] Next scene | [A] Auto | [S] Snapshot | [Q] Quit");
    driver.status("ready");

    enable_raw_mode()?;
    let result = key_loop(&mut driver).await;
    disable_raw_mode()?;

    driver.engine.stop();
    println!("\nbye");
    result
}

async fn key_loop(driver: &mut Driver) -> Result<()> {
    loop {
        let ready = tokio::task::block_in_place(|| event::poll(FRAME))?;
        if ready {
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Press && !driver.handle_key(ev.code, ev.modifiers).await {
                    return Ok(());
                }
            }
        }

        if driver.auto && driver.last_check.elapsed() >= RESELECT_EVERY {
            driver.reselect().await;
        }
    }
}
