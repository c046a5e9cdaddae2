use anyhow::{Context, Result};
use cgmath::vec2;
use clap::Parser;
use eframe::egui;
use particle_field::config::Config;
use particle_field::{
    DrawSurface, FrameLoop, FrameStatus, NullSurface, ParticleField, Rgba, StopHandle,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

/// Pointer-reactive particle background
#[derive(Parser, Debug)]
#[command(name = "particle-field", version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Population cap (overrides config)
    #[arg(long)]
    capacity: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Hide the stats panel
    #[arg(long)]
    no_panel: bool,

    /// Step the field without opening a window
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,

    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,
}

/// Draws into an egui painter clipped to the field's rect.
struct EguiSurface {
    painter: egui::Painter,
    origin: egui::Pos2,
    background: egui::Color32,
}

impl DrawSurface for EguiSurface {
    fn clear(&mut self) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, self.background);
    }

    fn fill_circle(&mut self, center: cgmath::Vector2<f32>, radius: f32, color: Rgba, opacity: f32) {
        // The canvas clamps; the field does not.
        let alpha = color.a * opacity.clamp(0.0, 1.0) * 255.0;
        let fill = egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha as u8);
        self.painter.circle_filled(
            self.origin + egui::vec2(center.x, center.y),
            radius,
            fill,
        );
    }
}

struct FieldApp {
    driver: FrameLoop<StdRng>,
    stop: StopHandle,
    show_panel: bool,
    surface_size: Option<egui::Vec2>,
    last_frame_time: Instant,
}

impl FieldApp {
    fn new(driver: FrameLoop<StdRng>, show_panel: bool) -> Self {
        let stop = driver.stop_handle();
        Self {
            driver,
            stop,
            show_panel,
            surface_size: None,
            last_frame_time: Instant::now(),
        }
    }

    fn render_ui_panel(&mut self, ui: &mut egui::Ui, frame_time: f32) {
        ui.label(format!("FPS: {:.3}", 1.0 / frame_time));
        ui.label(format!("Frame Time: {:.3}ms", frame_time * 1000.0));
        ui.label(format!(
            "Particles: {} / {}",
            self.driver.field().len(),
            self.driver.field().config().capacity
        ));
        ui.label(format!("Frames: {}", self.driver.frames()));

        match self.driver.field().pointer() {
            Some(pointer) => ui.label(format!("Pointer: {:.0}, {:.0}", pointer.x, pointer.y)),
            None => ui.label("Pointer: -"),
        };

        ui.separator();
        if self.driver.is_stopped() {
            ui.label("Stopped");
        } else if ui.button("Stop").clicked() {
            self.stop.stop();
        }
    }
}

impl eframe::App for FieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = Instant::now();
        let frame_time = current_time.duration_since(self.last_frame_time);
        self.last_frame_time = current_time;

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.stop.stop();
        }

        if self.show_panel {
            egui::SidePanel::left("Stats Panel").show(ctx, |ui| {
                self.render_ui_panel(ui, frame_time.as_secs_f32());
            });
        }

        let background = ctx.style().visuals.panel_fill;
        let status = egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(background))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

                let size = rect.size();
                if self.surface_size != Some(size) {
                    self.driver.resize(size.x as f64, size.y as f64);
                    self.surface_size = Some(size);
                }

                let pointer = response
                    .hover_pos()
                    .map(|pos| vec2((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64));
                self.driver.set_pointer(pointer);

                let mut surface = EguiSurface {
                    painter: ui.painter_at(rect),
                    origin: rect.min,
                    background,
                };
                self.driver.frame(&mut surface)
            })
            .inner;

        if status == FrameStatus::Running {
            ctx.request_repaint();
        }
    }
}

fn run_headless(mut driver: FrameLoop<StdRng>, frames: u64, width: f64, height: f64) {
    driver.resize(width, height);

    let started = Instant::now();
    let ran = driver.run_for(frames, &mut NullSurface);
    let elapsed = started.elapsed();

    log::info!("ran {ran} frames in {:.3}ms", elapsed.as_secs_f64() * 1000.0);
    println!(
        "frames: {ran}, particles: {} / {}",
        driver.field().len(),
        driver.field().config().capacity
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load()?,
    };
    if let Some(capacity) = cli.capacity {
        config.field.capacity = capacity;
    }
    if cli.no_panel {
        config.window.show_panel = false;
    }
    config.validate()?;
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("effective config:\n{}", config.to_toml()?);
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let driver = FrameLoop::new(ParticleField::new(config.field), rng);

    if let Some(frames) = cli.headless {
        run_headless(
            driver,
            frames,
            config.window.width as f64,
            config.window.height as f64,
        );
        return Ok(());
    }

    let show_panel = config.window.show_panel;
    eframe::run_native(
        &config.window.title,
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(config.window.width, config.window.height)),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(FieldApp::new(driver, show_panel))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
