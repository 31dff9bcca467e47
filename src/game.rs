// The application loop: poll input, run fixed-rate logic, render one frame.
//
// State is two independent switches plus an exit request:
// - `lights_on`: background at full brightness or dimmed (toggle key).
// - `circle_on`: spotlight visible; set on primary press, re-derived every
//   tick from whether the primary button is still held.
// - `exit_requested`: set by window close or the exit key; the next tick
//   closes the surface and the loop ends.

use std::time::Duration;

use image::RgbaImage;
use log::{debug, info};

use crate::config::Config;
use crate::draw::{clear, draw_image_tinted};
use crate::error::Error;
use crate::input::{Button, Event};
use crate::spotlight::Spotlight;
use crate::surface::Surface;
use crate::text::TextOverlay;
use crate::timing::{Clock, FixedStep};
use crate::types::{Color, FrameBuffer};

pub struct Game<S: Surface, C: Clock> {
    config: Config,
    surface: S,
    clock: C,
    step: FixedStep,
    frame: FrameBuffer,

    background: RgbaImage,
    spotlight: Spotlight,
    text: TextOverlay,

    lights_on: bool,
    circle_on: bool,
    exit_requested: bool,

    ticks: u64,
    frames: u64,
    stats_elapsed: Duration,
    stats_frames: u64,
    stats_ticks: u64,
}

impl<S: Surface, C: Clock> Game<S, C> {
    pub fn new(config: Config, surface: S, clock: C, background: RgbaImage, text: TextOverlay) -> Self {
        let frame = FrameBuffer::new(config.window_width, config.window_height);
        Self {
            step: FixedStep::new(config.tick_rate),
            spotlight: Spotlight::new(config.spotlight_radius),
            config,
            surface,
            clock,
            frame,
            background,
            text,
            lights_on: true,
            circle_on: false,
            exit_requested: false,
            ticks: 0,
            frames: 0,
            stats_elapsed: Duration::ZERO,
            stats_frames: 0,
            stats_ticks: 0,
        }
    }

    /// Blocks until the surface closes.
    pub fn run(&mut self) -> Result<(), Error> {
        info!(
            "game loop started ({}x{}, tick {:?})",
            self.config.window_width,
            self.config.window_height,
            self.step.tick()
        );
        while self.surface.is_open() {
            self.run_frame()?;
        }
        info!("game loop finished after {} frames, {} ticks", self.frames, self.ticks);
        Ok(())
    }

    /// One outer iteration: events, as many ticks as are due, one render.
    pub fn run_frame(&mut self) -> Result<(), Error> {
        self.process_events();
        let elapsed = self.clock.restart();
        self.stats_elapsed += elapsed;
        self.step.advance(elapsed);
        while self.step.try_step() {
            self.process_events();
            self.update();
        }
        self.render()?;
        self.log_stats();
        Ok(())
    }

    fn process_events(&mut self) {
        while let Some(event) = self.surface.poll_event() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Closed => self.exit_requested = true,
            Event::KeyPressed(key) => {
                if key == self.config.exit_key {
                    self.exit_requested = true;
                }
                if key == self.config.toggle_lights_key {
                    self.lights_on = !self.lights_on;
                }
            }
            Event::MouseButtonPressed { button: Button::Primary, x, y } => {
                self.circle_on = true;
                self.spotlight.track(x, y);
            }
            Event::MouseButtonPressed { .. } => {}
            Event::MouseMoved { x, y } => {
                if self.surface.primary_button_held() && self.circle_on {
                    self.spotlight.track(x, y);
                }
            }
        }
    }

    /// One fixed logic step.
    fn update(&mut self) {
        self.ticks += 1;
        if self.exit_requested {
            self.surface.close();
        }
        self.circle_on = self.surface.primary_button_held();
    }

    fn render(&mut self) -> Result<(), Error> {
        clear(&mut self.frame, Color::BLACK);
        let tint = self.background_tint();
        draw_image_tinted(&mut self.frame, &self.background, 0, 0, tint);
        if self.circle_on {
            self.spotlight.draw(&mut self.frame, &self.background);
        }
        self.text.draw(&mut self.frame);
        self.surface.present(&self.frame)?;
        self.frames += 1;
        Ok(())
    }

    pub fn background_tint(&self) -> Color {
        if self.lights_on { Color::WHITE } else { self.config.dim_color }
    }

    /// Frames and ticks over the last second of game clock, at debug level.
    fn log_stats(&mut self) {
        if self.stats_elapsed >= Duration::from_secs(1) {
            let secs = self.stats_elapsed.as_secs_f32();
            debug!(
                "FPS: {:.1}, ticks/s: {:.1}",
                (self.frames - self.stats_frames) as f32 / secs,
                (self.ticks - self.stats_ticks) as f32 / secs
            );
            self.stats_elapsed = Duration::ZERO;
            self.stats_frames = self.frames;
            self.stats_ticks = self.ticks;
        }
    }
}

// Read-only views used by the tests below.
#[cfg(test)]
impl<S: Surface, C: Clock> Game<S, C> {
    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    pub fn circle_on(&self) -> bool {
        self.circle_on
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn spotlight(&self) -> &Spotlight {
        &self.spotlight
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
