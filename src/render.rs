//! Canvas 2D renderer
//!
//! Placeholder art: flat shapes in the alley palette. The renderer only
//! reads the run state and the events it publishes; it never mutates either.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::Settings;
use crate::consts::*;
use crate::sim::{GameEvent, ObstacleKind, Pose, Prompt, RunState};

/// Palette
mod color {
    pub const SKY_TOP: &str = "#1a1a2e";
    pub const SKY_BOTTOM: &str = "#16213e";
    pub const SKYLINE: [&str; 3] = ["#20203a", "#2a2a48", "#34345a"];
    pub const SIDEWALK_A: &str = "#4a4a4a";
    pub const SIDEWALK_B: &str = "#5a5a5a";
    pub const GROUND: &str = "#353b48";
    pub const CAT: &str = "#ff6b6b";
    pub const CAT_HIT: &str = "#ff5555";
    pub const CAN_BODY: &str = "#8c7ae6";
    pub const CAN_BAND: &str = "#353b48";
    pub const FISH: &str = "#00a8ff";
    pub const BURST: &str = "#00bfff";
    pub const DUST: &str = "rgba(200,200,200,0.6)";
    pub const TEXT: &str = "#ffffff";
}

/// Sidewalk tile width
const TILE_W: f32 = 100.0;
/// Dust puff lifetime (seconds)
const DUST_LIFE: f32 = 0.4;
/// Collect ring lifetime (seconds)
const BURST_LIFE: f32 = 0.6;
const BURST_RADIUS: f32 = 60.0;

#[derive(Debug, Clone)]
struct Puff {
    pos: Vec2,
    vel: Vec2,
    age: f32,
}

#[derive(Debug, Clone)]
struct Burst {
    pos: Vec2,
    age: f32,
}

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dust: Vec<Puff>,
    bursts: Vec<Burst>,
    score: u32,
    prompt: Prompt,
    /// Visual jitter only; never touches the run's RNG
    rng: Pcg32,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            dust: Vec::new(),
            bursts: Vec::new(),
            score: 0,
            prompt: Prompt::Start,
            rng: Pcg32::seed_from_u64(0x5eed),
        })
    }

    /// Match the backing store to the displayed size
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// React to a run event
    pub fn handle(&mut self, event: &GameEvent, state: &RunState, settings: &Settings) {
        match event {
            GameEvent::Dust { count } => self.emit_dust(*count, state, settings.max_dust()),
            GameEvent::Collected { pos, .. } if settings.effective_collect_burst() => {
                self.bursts.push(Burst { pos: *pos, age: 0.0 });
            }
            GameEvent::ScoreChanged(score) => self.score = *score,
            GameEvent::Prompt(prompt) => self.prompt = *prompt,
            GameEvent::RunStarted { .. } => {
                self.dust.clear();
                self.bursts.clear();
            }
            _ => {}
        }
    }

    fn emit_dust(&mut self, count: u32, state: &RunState, cap: usize) {
        let player = &state.player;
        let feet = Vec2::new(
            player.pos.x - player.half_extents().x,
            player.pos.y + player.half_extents().y,
        );
        for _ in 0..count {
            if self.dust.len() >= cap {
                break;
            }
            let vel = Vec2::new(
                self.rng.random_range(-160.0..-40.0),
                self.rng.random_range(-60.0..0.0),
            );
            self.dust.push(Puff {
                pos: feet,
                vel,
                age: 0.0,
            });
        }
    }

    /// Age effects by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        for puff in &mut self.dust {
            puff.pos += puff.vel * dt;
            puff.age += dt;
        }
        self.dust.retain(|p| p.age < DUST_LIFE);

        for burst in &mut self.bursts {
            burst.age += dt;
        }
        self.bursts.retain(|b| b.age < BURST_LIFE);
    }

    pub fn draw(&self, state: &RunState, settings: &Settings) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let sx = self.canvas.width() as f64 / FIELD_WIDTH as f64;
        let sy = self.canvas.height() as f64 / FIELD_HEIGHT as f64;
        ctx.set_transform(sx, 0.0, 0.0, sy, 0.0, 0.0)?;

        self.draw_background(state, settings);
        self.draw_sidewalk(state);
        self.draw_obstacles(state)?;
        self.draw_player(state);
        self.draw_effects()?;
        self.draw_hud()?;
        Ok(())
    }

    fn draw_background(&self, state: &RunState, settings: &Settings) {
        let ctx = &self.ctx;
        let w = FIELD_WIDTH as f64;
        let half = (GROUND_TOP / 2.0) as f64;
        ctx.set_fill_style_str(color::SKY_TOP);
        ctx.fill_rect(0.0, 0.0, w, half);
        ctx.set_fill_style_str(color::SKY_BOTTOM);
        ctx.fill_rect(0.0, half, w, GROUND_TOP as f64 - half);

        let layers = settings.quality.skyline_layers().min(3);
        for layer in 0..layers {
            let offset = if settings.effective_parallax() {
                state.parallax.layers[layer]
            } else {
                0.0
            };
            self.draw_skyline(layer, offset);
        }
    }

    /// One row of buildings, tiled twice so the wrap is seamless
    fn draw_skyline(&self, layer: usize, offset: f32) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color::SKYLINE[layer]);
        let spacing = 160.0 + layer as f32 * 60.0;
        let count = (FIELD_WIDTH / spacing).ceil() as usize + 1;
        for copy in 0..2 {
            let base_x = copy as f32 * FIELD_WIDTH - offset;
            for i in 0..count {
                let x = base_x + i as f32 * spacing;
                if x > FIELD_WIDTH || x + spacing < 0.0 {
                    continue;
                }
                // Fixed height pattern per slot
                let h = 180.0 + ((i * 37 + layer * 53) % 5) as f32 * 70.0 + layer as f32 * 40.0;
                ctx.fill_rect(
                    x as f64,
                    (GROUND_TOP - h) as f64,
                    (spacing * 0.8) as f64,
                    h as f64,
                );
            }
        }
    }

    fn draw_sidewalk(&self, state: &RunState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color::GROUND);
        ctx.fill_rect(
            0.0,
            GROUND_TOP as f64,
            FIELD_WIDTH as f64,
            GROUND_HEIGHT as f64,
        );

        let shift = state.parallax.ground.rem_euclid(TILE_W * 2.0);
        let tiles = (FIELD_WIDTH / TILE_W) as usize + 3;
        for i in 0..tiles {
            let x = i as f32 * TILE_W - shift;
            ctx.set_fill_style_str(if i % 2 == 0 {
                color::SIDEWALK_A
            } else {
                color::SIDEWALK_B
            });
            ctx.fill_rect(x as f64, GROUND_TOP as f64, TILE_W as f64, 20.0);
        }
    }

    fn draw_obstacles(&self, state: &RunState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for obstacle in state.obstacles.iter() {
            let p = obstacle.pos;
            let h = obstacle.half_extents;
            match obstacle.kind {
                ObstacleKind::Hazard => {
                    ctx.set_fill_style_str(color::CAN_BODY);
                    ctx.fill_rect(
                        (p.x - h.x) as f64,
                        (p.y - h.y) as f64,
                        (h.x * 2.0) as f64,
                        (h.y * 2.0) as f64,
                    );
                    ctx.set_fill_style_str(color::CAN_BAND);
                    ctx.fill_rect(
                        (p.x - h.x - 4.0) as f64,
                        (p.y - h.y) as f64,
                        (h.x * 2.0 + 8.0) as f64,
                        10.0,
                    );
                }
                ObstacleKind::Collectible => {
                    ctx.set_fill_style_str(color::FISH);
                    ctx.begin_path();
                    ctx.ellipse(
                        p.x as f64,
                        p.y as f64,
                        (h.x * 0.8) as f64,
                        h.y as f64,
                        0.0,
                        0.0,
                        std::f64::consts::TAU,
                    )?;
                    // Tail
                    ctx.move_to((p.x + h.x * 0.6) as f64, p.y as f64);
                    ctx.line_to((p.x + h.x) as f64, (p.y - h.y) as f64);
                    ctx.line_to((p.x + h.x) as f64, (p.y + h.y) as f64);
                    ctx.fill();
                }
            }
        }
        Ok(())
    }

    fn draw_player(&self, state: &RunState) {
        let ctx = &self.ctx;
        let player = &state.player;
        let h = player.half_extents();
        let p = player.pos;
        ctx.set_fill_style_str(if player.hit {
            color::CAT_HIT
        } else {
            color::CAT
        });
        ctx.fill_rect(
            (p.x - h.x) as f64,
            (p.y - h.y) as f64,
            (h.x * 2.0) as f64,
            (h.y * 2.0) as f64,
        );

        // Ears, flattened while squatting
        let ear = if player.pose == Pose::Squatting {
            6.0
        } else {
            14.0
        };
        let head_x = p.x + h.x - 18.0;
        ctx.fill_rect(
            (head_x - 12.0) as f64,
            (p.y - h.y - ear) as f64,
            8.0,
            ear as f64,
        );
        ctx.fill_rect(head_x as f64, (p.y - h.y - ear) as f64, 8.0, ear as f64);
    }

    fn draw_effects(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color::DUST);
        for puff in &self.dust {
            let size = 8.0 * (1.0 - puff.age / DUST_LIFE);
            ctx.fill_rect(
                (puff.pos.x - size / 2.0) as f64,
                (puff.pos.y - size / 2.0) as f64,
                size as f64,
                size as f64,
            );
        }

        ctx.set_stroke_style_str(color::BURST);
        ctx.set_line_width(4.0);
        for burst in &self.bursts {
            let t = burst.age / BURST_LIFE;
            ctx.set_global_alpha((1.0 - t) as f64);
            ctx.begin_path();
            ctx.arc(
                burst.pos.x as f64,
                burst.pos.y as f64,
                (BURST_RADIUS * (0.3 + t)) as f64,
                0.0,
                std::f64::consts::TAU,
            )?;
            ctx.stroke();
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_hud(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let cx = (FIELD_WIDTH / 2.0) as f64;
        let cy = (FIELD_HEIGHT / 2.0) as f64;

        ctx.set_fill_style_str(color::TEXT);
        ctx.set_font("bold 40px monospace");
        ctx.set_text_align("right");
        ctx.fill_text(
            &format!("FISH: {}", self.score),
            (FIELD_WIDTH - 40.0) as f64,
            70.0,
        )?;

        ctx.set_text_align("center");
        match self.prompt {
            Prompt::Hidden => {}
            Prompt::Start => {
                ctx.set_font("bold 64px monospace");
                ctx.fill_text("CLICK TO START", cx, cy)?;
            }
            Prompt::GameOver => {
                ctx.set_fill_style_str("rgba(0,0,0,0.55)");
                ctx.fill_rect(0.0, cy - 110.0, FIELD_WIDTH as f64, 200.0);
                ctx.set_fill_style_str(color::TEXT);
                ctx.set_font("bold 72px monospace");
                ctx.fill_text("GAME OVER", cx, cy - 20.0)?;
                ctx.set_font("32px monospace");
                ctx.fill_text("Click to restart", cx, cy + 40.0)?;
            }
        }
        Ok(())
    }
}
