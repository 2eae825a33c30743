#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Nuclear Synthesis.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::{Color as MacroquadColor, WHITE},
    input::{is_key_pressed, KeyCode},
};
use nuclear_synthesis_core::Direction;
use nuclear_synthesis_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, TilePresentation, TEXT_COLOR,
};
use std::time::Duration;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `H` toggles the frame timing printout.
    toggle_fps: bool,
    /// `R` restarts the current game.
    restart: bool,
    /// Arrow key pressed this frame, if any.
    direction: Option<Direction>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let toggle_fps = is_key_pressed(KeyCode::H);
        let restart = is_key_pressed(KeyCode::R);
        let direction = if is_key_pressed(KeyCode::Left) {
            Some(Direction::Left)
        } else if is_key_pressed(KeyCode::Up) {
            Some(Direction::Up)
        } else if is_key_pressed(KeyCode::Right) {
            Some(Direction::Right)
        } else if is_key_pressed(KeyCode::Down) {
            Some(Direction::Down)
        } else {
            None
        };

        Self {
            quit_requested,
            toggle_fps,
            restart,
            direction,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display
    /// refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second average once one
    /// second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = if seconds <= f32::EPSILON {
            None
        } else {
            Some(self.frames as f32 / seconds)
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        per_second
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut show_fps = show_fps;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }
                if keyboard.toggle_fps {
                    show_fps = !show_fps;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    direction: keyboard.direction,
                    restart: keyboard.restart,
                };

                update_scene(frame_dt, frame_input, &mut scene);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                draw_board(&scene, &metrics);
                for tile in &scene.tiles {
                    draw_tile(tile, &metrics);
                }
                if scene.game_over {
                    draw_game_over_overlay(screen_width, screen_height);
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space layout derived from the scene and the window dimensions.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    offset_x: f32,
    offset_y: f32,
    span: f32,
    tile_step: f32,
    cell_stride: f32,
    padding: f32,
}

impl SceneMetrics {
    /// Fraction of the shorter screen axis the board may occupy.
    const FILL_RATIO: f32 = 0.85;

    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let grid = scene.grid;
        let span = grid.span();
        let scale = if span <= f32::EPSILON {
            1.0
        } else {
            screen_width.min(screen_height) * Self::FILL_RATIO / span
        };

        let scaled_span = span * scale;
        Self {
            offset_x: (screen_width - scaled_span) * 0.5,
            offset_y: (screen_height - scaled_span) * 0.5,
            span: scaled_span,
            tile_step: grid.tile_length * scale,
            cell_stride: grid.cell_stride() * scale,
            padding: grid.padding() * scale,
        }
    }

    /// Screen-space origin of a cell-unit position.
    fn cell_origin(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.cell_stride,
            self.offset_y + position.y * self.cell_stride,
        )
    }
}

fn draw_board(scene: &Scene, metrics: &SceneMetrics) {
    let grid = scene.grid;
    let frame = metrics.padding;
    macroquad::shapes::draw_rectangle(
        metrics.offset_x - frame,
        metrics.offset_y - frame,
        metrics.span + 2.0 * frame,
        metrics.span + 2.0 * frame,
        to_macroquad_color(grid.board_color),
    );

    let empty = to_macroquad_color(grid.empty_cell_color);
    for row in 0..grid.size {
        for column in 0..grid.size {
            let origin = metrics.cell_origin(Vec2::new(column as f32, row as f32));
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                metrics.tile_step,
                metrics.tile_step,
                empty,
            );
        }
    }
}

fn draw_tile(tile: &TilePresentation, metrics: &SceneMetrics) {
    let origin = metrics.cell_origin(tile.position);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        metrics.tile_step,
        metrics.tile_step,
        to_macroquad_color(tile.color),
    );

    let text_color = to_macroquad_color(TEXT_COLOR);
    let symbol_size = metrics.tile_step * 0.5;
    let dimensions = macroquad::text::measure_text(tile.symbol, None, symbol_size as u16, 1.0);
    macroquad::text::draw_text(
        tile.symbol,
        origin.x + (metrics.tile_step - dimensions.width) * 0.5,
        origin.y + (metrics.tile_step + dimensions.height) * 0.5,
        symbol_size,
        text_color,
    );

    let mass_label = tile.mass_number.to_string();
    let mass_size = metrics.tile_step * 0.22;
    macroquad::text::draw_text(
        &mass_label,
        origin.x + metrics.tile_step * 0.1,
        origin.y + metrics.tile_step * 0.1 + mass_size * 0.8,
        mass_size,
        text_color,
    );
}

fn draw_game_over_overlay(screen_width: f32, screen_height: f32) {
    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        screen_width,
        screen_height,
        MacroquadColor::new(0.0, 0.0, 0.0, 0.35),
    );

    let message = "Game over - press R to restart";
    let size = 48.0;
    let dimensions = macroquad::text::measure_text(message, None, size as u16, 1.0);
    macroquad::text::draw_text(
        message,
        (screen_width - dimensions.width) * 0.5,
        screen_height * 0.5,
        size,
        WHITE,
    );
}

fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuclear_synthesis_rendering::GridPresentation;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert_eq!(counter.record_frame(Duration::from_millis(16)), None);
        }
        let per_second = counter
            .record_frame(Duration::from_millis(64))
            .expect("one second elapsed");
        assert!(per_second > 0.0);
    }

    #[test]
    fn scene_metrics_center_the_board() {
        let grid = GridPresentation::new(4, 32.0).expect("valid grid");
        let scene = Scene::new(grid, Vec::new(), false);
        let metrics = SceneMetrics::from_scene(&scene, 1280.0, 720.0);

        assert!((metrics.span - 720.0 * SceneMetrics::FILL_RATIO).abs() < 1e-3);
        assert!((metrics.offset_x - (1280.0 - metrics.span) * 0.5).abs() < 1e-3);
        assert!((metrics.offset_y - (720.0 - metrics.span) * 0.5).abs() < 1e-3);

        let origin = metrics.cell_origin(Vec2::new(1.0, 2.0));
        assert!((origin.x - metrics.offset_x - metrics.cell_stride).abs() < 1e-3);
        assert!((origin.y - metrics.offset_y - 2.0 * metrics.cell_stride).abs() < 1e-3);
    }
}
