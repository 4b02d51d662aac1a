// ui.rs - Window, controls and mouse editor
// Every grid access goes through the shared Guard; the window never holds the
// lock beyond one call.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use eframe::egui;
use egui::{Color32, Rect, Vec2};
use tracing::{debug, warn};

use life_core::config::{MAX_DELAY_MS, MIN_DELAY_MS};
use life_core::{ALIVE, DEAD, GridState, Guard, PATTERNS, SimConfig, TickLoop, TickState, codec};

pub struct LifeApp {
    guard: Guard,
    tick: TickLoop,
    pub delay_ms: u64,
    pub cell_size: f32,
    pub cell_gap: f32,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub selected_pattern: usize,
    pub new_width: i32,
    pub new_height: i32,
    pub path: String,
    pub status: String,

    // Grid waiting for the tick loop to go idle before it is installed
    pending_grid: Option<GridState>,

    // Keeps the tick loop's runtime alive for as long as the window
    _runtime: tokio::runtime::Runtime,
}

impl LifeApp {
    pub fn new(guard: Guard, config: SimConfig, runtime: tokio::runtime::Runtime) -> Self {
        let delay = config.tick_delay();
        let tick = TickLoop::new(guard.clone(), delay, runtime.handle().clone());
        let (width, height) = (guard.width() as i32, guard.height() as i32);

        Self {
            guard,
            tick,
            delay_ms: delay.as_millis() as u64,
            cell_size: config.cell_size,
            cell_gap: config.cell_gap,
            live_color: Color32::from_rgb(0x00, 0xFF, 0x2E),
            dead_color: Color32::from_rgb(0x69, 0x69, 0x69),
            selected_pattern: 0,
            new_width: width,
            new_height: height,
            path: String::from("life.glconf"),
            status: String::new(),
            pending_grid: None,
            _runtime: runtime,
        }
    }

    /// Stops the loop and queues `grid`; it is installed once no step can
    /// still be running on the old one.
    fn install_when_idle(&mut self, grid: GridState) {
        self.tick.stop();
        self.new_width = grid.width() as i32;
        self.new_height = grid.height() as i32;
        self.pending_grid = Some(grid);
        self.install_pending();
    }

    fn install_pending(&mut self) {
        if self.tick.is_running() {
            return;
        }
        if let Some(grid) = self.pending_grid.take() {
            self.guard.replace(grid);
            self.status = format!("Grid is {}x{}", self.new_width, self.new_height);
        }
    }

    fn resize(&mut self) {
        match GridState::new(self.new_width, self.new_height) {
            Ok(grid) => self.install_when_idle(grid),
            Err(e) => self.status = e.to_string(),
        }
    }

    fn open(&mut self) {
        match codec::load_file(&PathBuf::from(self.path.trim())) {
            Ok(grid) => self.install_when_idle(grid),
            Err(e) => {
                warn!(error = %e, "open failed");
                self.status = e.to_string();
            }
        }
    }

    fn save(&mut self) {
        if self.tick.is_running() {
            self.status = String::from("Please, stop simulation!");
            return;
        }
        match self.guard.save_file(&PathBuf::from(self.path.trim())) {
            Ok(written) => {
                self.path = written.display().to_string();
                self.status = format!("Saved {}", self.path);
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.status = e.to_string();
            }
        }
    }

    fn random_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let state = self.tick.state();
        let running = state == TickState::Running;

        ui.horizontal(|ui| {
            let button_text = if running { "⏸ Stop" } else { "▶ Start" };
            let can_toggle = self.pending_grid.is_none();
            if ui.add_enabled(can_toggle, egui::Button::new(button_text)).clicked() {
                if running {
                    self.tick.stop();
                } else {
                    self.tick.start();
                }
            }

            let idle = state == TickState::Idle;
            if ui.add_enabled(idle, egui::Button::new("One step")).clicked() {
                self.guard.step();
            }

            ui.separator();

            if ui.button("Clear field").clicked() {
                self.guard.clear();
            }

            if ui.button("🎲 Random").clicked() {
                self.guard.seed_random(Self::random_seed());
            }

            ui.separator();

            ui.label("Pattern:");
            egui::ComboBox::from_id_source("pattern_selector")
                .selected_text(PATTERNS[self.selected_pattern].name)
                .show_ui(ui, |ui| {
                    for (i, pattern) in PATTERNS.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                    }
                });

            if ui.button("Apply Pattern").clicked() {
                self.guard.seed_pattern(&PATTERNS[self.selected_pattern]);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Fast");
            let slider = egui::Slider::new(&mut self.delay_ms, MIN_DELAY_MS..=MAX_DELAY_MS)
                .suffix(" ms");
            if ui.add(slider).changed() {
                self.tick.set_delay(Duration::from_millis(self.delay_ms));
            }
            ui.label("Slow");

            ui.separator();

            ui.label("Live:");
            ui.color_edit_button_srgba(&mut self.live_color);
            ui.label("Dead:");
            ui.color_edit_button_srgba(&mut self.dead_color);
        });

        ui.horizontal(|ui| {
            ui.label("Size:");
            ui.add(egui::DragValue::new(&mut self.new_width).clamp_range(1..=1000));
            ui.label("x");
            ui.add(egui::DragValue::new(&mut self.new_height).clamp_range(1..=1000));
            if ui.button("Resize").clicked() {
                self.resize();
            }

            ui.separator();

            ui.label("File:");
            ui.text_edit_singleline(&mut self.path);
            if ui.button("Open").clicked() {
                self.open();
            }
            if ui.button("Save").clicked() {
                self.save();
            }
        });
    }

    /// Draws the grid and applies mouse edits: left button paints, right
    /// button erases, dragging keeps painting.
    fn board(&mut self, ui: &mut egui::Ui) {
        let pitch = self.cell_size + self.cell_gap;
        let (width, height) = self.guard.with_grid(|g| (g.width(), g.height()));
        let total_size = Vec2::new(
            pitch * width as f32 + self.cell_gap,
            pitch * height as f32 + self.cell_gap,
        );

        let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        let brush = ui.input(|i| {
            if i.pointer.primary_down() {
                Some(ALIVE)
            } else if i.pointer.secondary_down() {
                Some(DEAD)
            } else {
                None
            }
        });
        if let Some(value) = brush.filter(|_| response.is_pointer_button_down_on()) {
            if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                let x = ((pos.x - origin.x) / pitch).floor() as i32;
                let y = ((pos.y - origin.y) / pitch).floor() as i32;
                // Pointer can wander past the board while dragging
                if self.guard.set_cell(x, y, value).is_ok() {
                    debug!(x, y, value, "edited cell");
                }
            }
        }

        painter.rect_filled(response.rect, 0.0, Color32::BLACK);

        let (live, dead) = (self.live_color, self.dead_color);
        let cell = Vec2::splat(self.cell_size);
        let gap = self.cell_gap;
        self.guard.with_grid(|g| {
            for (i, &c) in g.cells().iter().enumerate() {
                let (x, y) = (i % g.width(), i / g.width());
                let min = origin + Vec2::new(gap + x as f32 * pitch, gap + y as f32 * pitch);
                let fill = if c == ALIVE { live } else { dead };
                painter.rect_filled(Rect::from_min_size(min, cell), 0.0, fill);
            }
        });
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.install_pending();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");
            self.controls(ui);

            ui.separator();

            egui::ScrollArea::both().show(ui, |ui| {
                self.board(ui);
            });

            ui.separator();

            let (generation, live, total) =
                self.guard.with_grid(|g| (g.generation(), g.live_count(), g.cells().len()));
            ui.horizontal(|ui| {
                ui.label(format!("Generation: {}", generation));
                ui.label(format!("Live cells: {}", live));
                ui.label(format!("Population: {:.1}%", live as f32 / total as f32 * 100.0));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(self.status.as_str());
                }
            });
        });

        // Keep redrawing while the loop runs or a grid is waiting to go in
        if self.tick.is_running() || self.pending_grid.is_some() {
            ctx.request_repaint();
        }
    }
}
