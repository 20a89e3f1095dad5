/// Render step: game state + frame timestamp → drawing commands.
///
/// Pure. It never mutates state and nothing in gameplay depends on it; the
/// timestamp only drives the food pulse. Coordinates are board pixels
/// (`BOARD_PIXELS` square), converted from cells here.

use crate::domain::grid::{Cell, Direction, BOARD_PIXELS, CELL_PIXELS};
use crate::sim::state::GameState;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Rgba { a, ..self }
    }
}

pub const BACKGROUND: Rgba = Rgba::rgb(0x34, 0x49, 0x5e);
pub const HEAD: Rgba = Rgba::rgb(0x2e, 0xcc, 0x71);
pub const BODY: Rgba = Rgba::rgb(0x27, 0xae, 0x60);
pub const FOOD: Rgba = Rgba::rgb(0xe7, 0x4c, 0x3c);
pub const EYE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
pub const PUPIL: Rgba = Rgba::rgb(0x00, 0x00, 0x00);

// ── Food pulse ──

const PULSE_AMPLITUDE: f32 = 0.15;
/// Radians per millisecond.
const PULSE_SPEED: f64 = 0.004;
const GLOW_SCALE: f32 = 1.8;
const GLOW_INNER_SCALE: f32 = 0.2;
const GLOW_ALPHA: f32 = 0.8;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DrawCmd {
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Rgba },
    FillCircle { cx: f32, cy: f32, r: f32, color: Rgba },
    /// Disc of radius `outer`: `from` inside `inner`, linear fade to `to` at `outer`.
    RadialGlow { cx: f32, cy: f32, inner: f32, outer: f32, from: Rgba, to: Rgba },
}

pub fn segment_radius() -> f32 {
    CELL_PIXELS as f32 / 2.0 - 1.0
}

/// Food radius at a given frame time: base × (1 + A·sin(t·ω)).
pub fn food_radius(timestamp_ms: f64) -> f32 {
    let base = CELL_PIXELS as f32 / 2.0 - 3.0;
    let phase = (timestamp_ms * PULSE_SPEED).sin() as f32;
    base * (1.0 + PULSE_AMPLITUDE * phase)
}

pub fn draw(state: &GameState, timestamp_ms: f64) -> Vec<DrawCmd> {
    let side = BOARD_PIXELS as f32;
    let mut cmds = Vec::with_capacity(state.len() + 8);
    cmds.push(DrawCmd::FillRect { x: 0.0, y: 0.0, w: side, h: side, color: BACKGROUND });

    for (i, seg) in state.snake.iter().enumerate() {
        let (cx, cy) = seg.pixel_center();
        let color = if i == 0 { HEAD } else { BODY };
        cmds.push(DrawCmd::FillCircle { cx, cy, r: segment_radius(), color });
    }
    push_eyes(&mut cmds, state.head(), state.direction);

    // After a board-full finish the food cell is under the head; skip it.
    if !state.snake.contains(&state.food) {
        push_food(&mut cmds, state.food, timestamp_ms);
    }
    cmds
}

fn push_eyes(cmds: &mut Vec<DrawCmd>, head: Cell, dir: Direction) {
    let (hx, hy) = head.pixel_center();
    let grid = CELL_PIXELS as f32;

    if dir.is_none() {
        for side in [-1.0_f32, 1.0] {
            let (ex, ey) = (hx + 4.0 * side, hy - 3.0);
            cmds.push(DrawCmd::FillCircle { cx: ex, cy: ey, r: 2.0, color: EYE });
            cmds.push(DrawCmd::FillCircle { cx: ex, cy: ey, r: 1.0, color: PUPIL });
        }
        return;
    }

    let (dx, dy) = (dir.dx as f32, dir.dy as f32);
    let (fx, fy) = (grid * 0.25 * dx, grid * 0.25 * dy);
    // Perpendicular to the heading, for eye separation.
    let (px, py) = (-dy * grid * 0.20, dx * grid * 0.20);
    for side in [1.0_f32, -1.0] {
        let (ex, ey) = (hx + fx + px * side, hy + fy + py * side);
        cmds.push(DrawCmd::FillCircle { cx: ex, cy: ey, r: 2.5, color: EYE });
        cmds.push(DrawCmd::FillCircle { cx: ex + dx * 0.8, cy: ey + dy * 0.8, r: 1.0, color: PUPIL });
    }
}

fn push_food(cmds: &mut Vec<DrawCmd>, food: Cell, timestamp_ms: f64) {
    let (cx, cy) = food.pixel_center();
    let r = food_radius(timestamp_ms);
    cmds.push(DrawCmd::RadialGlow {
        cx,
        cy,
        inner: r * GLOW_INNER_SCALE,
        outer: r * GLOW_SCALE,
        from: FOOD.with_alpha(GLOW_ALPHA),
        to: FOOD.with_alpha(0.0),
    });
    cmds.push(DrawCmd::FillCircle { cx, cy, r, color: FOOD });
}
