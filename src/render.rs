//! Canvas 2D presenter drawing (wasm only)
//!
//! The sprite image loads fire-and-forget; until it is ready (or if it never
//! decodes) balls render as procedural shapes. The simulation never waits on
//! assets.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::sim::{Ball, BallKind, GameState};

/// A lazily-loading ball sprite with a readiness flag
pub struct Sprite {
    image: HtmlImageElement,
    ready: Rc<Cell<bool>>,
}

impl Sprite {
    /// Start loading the image at `src`. Returns `None` if the element itself
    /// cannot be created; load failure later just leaves the fallback active.
    pub fn load(src: &str) -> Option<Self> {
        let image = HtmlImageElement::new().ok()?;
        let ready = Rc::new(Cell::new(false));

        let flag = ready.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            flag.set(true);
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        image.set_src(src);
        Some(Self { image, ready })
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }
}

/// Clear the playfield and draw every live ball, oldest first so the most
/// recently spawned ends up on top.
pub fn draw_frame(ctx: &CanvasRenderingContext2d, state: &GameState, sprite: Option<&Sprite>) {
    let (w, h) = (state.config.width as f64, state.config.height as f64);
    ctx.clear_rect(0.0, 0.0, w, h);

    ctx.set_fill_style_str("#10141c");
    ctx.fill_rect(0.0, 0.0, w, h);

    for ball in &state.balls {
        draw_ball(ctx, ball, sprite);
    }
}

fn draw_ball(ctx: &CanvasRenderingContext2d, ball: &Ball, sprite: Option<&Sprite>) {
    let (x, y, r) = (ball.pos.x as f64, ball.pos.y as f64, ball.radius as f64);

    match ball.kind {
        BallKind::Bonus => {
            // wrapped pickup: squat rounded slab
            ctx.set_fill_style_str("#8d5a2a");
            ctx.set_stroke_style_str("#3d2916");
            ctx.set_line_width(2.0);
            ctx.fill_rect(x - r, y - r / 2.0, r * 2.0, r);
            ctx.stroke_rect(x - r, y - r / 2.0, r * 2.0, r);
        }
        BallKind::Primary => {
            if let Some(sprite) = sprite.filter(|s| s.is_ready()) {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &sprite.image,
                    x - r,
                    y - r,
                    r * 2.0,
                    r * 2.0,
                );
            } else {
                // fallback disc while the sprite loads (or if it never does)
                ctx.set_fill_style_str("#b24a00");
                ctx.set_stroke_style_str("rgba(255,180,110,0.8)");
                ctx.set_line_width(6.0);
                ctx.begin_path();
                let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
                ctx.fill();
                ctx.stroke();
            }
        }
    }
}
