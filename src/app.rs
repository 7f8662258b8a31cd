//! Window shell and the fixed-tick frame driver
//!
//! The simulation runs at a fixed 60 Hz behind a tick accumulator; the
//! window redraws whenever the loop wakes. Rendering goes through a
//! logical 288x512 framebuffer that gets nearest-scaled onto whatever
//! surface size the platform hands us.

use std::error::Error;
use std::mem;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::Rect;
use crate::assets::{Sprite, SpriteBank};
use crate::audio::{SoundSink, cue_for};
use crate::consts::*;
use crate::persistence::ScoreStore;
use crate::render::{self, DrawCmd, SpriteId};
use crate::sim::{GameEvent, GameSession, RoundPhase, TickInput, tick};

const TICK: Duration = Duration::from_micros(1_000_000 / TICK_RATE as u64);
/// Drop ticks instead of spiralling when the loop stalls this far behind
const MAX_CATCHUP: u32 = 8;

const WINDOW_TITLE: &str = "Pipe Dash";
const SECRET_TITLE: &str = "Pigeon Dash";

/// Start the window shell and run until the user closes it
pub fn run(
    sprites: SpriteBank,
    audio: Box<dyn SoundSink>,
    store: ScoreStore,
    seed: u64,
) -> Result<(), Box<dyn Error>> {
    let saved_best = store.load();
    log::info!("starting round with best score {saved_best}, seed {seed:#x}");

    let mut app = App {
        frontend: None,
        sprites,
        audio,
        store,
        session: GameSession::new(seed, saved_best),
        saved_best,
        pending: TickInput::default(),
        cursor: Vec2::ZERO,
        button_held: false,
        next_tick: Instant::now(),
        framebuffer: vec![0; (SCREEN_W * SCREEN_H) as usize],
    };

    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}

struct Frontend {
    window: Arc<Window>,
    _context: softbuffer::Context<Arc<Window>>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
}

struct App {
    frontend: Option<Frontend>,
    sprites: SpriteBank,
    audio: Box<dyn SoundSink>,
    store: ScoreStore,
    session: GameSession,
    /// What the store last confirmed, so the quit flush can skip a no-op write
    saved_best: u32,
    /// Input gathered since the last tick
    pending: TickInput,
    cursor: Vec2,
    button_held: bool,
    next_tick: Instant,
    framebuffer: Vec<u32>,
}

impl App {
    fn init_frontend(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(SCREEN_W, SCREEN_H))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;
        self.frontend = Some(Frontend {
            window,
            _context: context,
            surface,
        });
        self.next_tick = Instant::now() + TICK;
        Ok(())
    }

    /// Run one simulation tick and route its events
    fn step(&mut self) {
        let input = mem::take(&mut self.pending);
        let events = tick(&mut self.session, &input);
        for event in &events {
            if let GameEvent::NewBest(score) = event {
                self.store.save(*score);
                self.saved_best = *score;
            }
            if let Some(cue) = cue_for(event) {
                self.audio.play(cue);
            }
        }
        if !self.restart_armed() {
            self.button_held = false;
        }
    }

    fn restart_armed(&self) -> bool {
        matches!(
            self.session.phase,
            RoundPhase::Results {
                restart_armed: true,
                ..
            }
        )
    }

    fn play_button_rect(&self) -> Rect {
        let button = self.sprites.get(SpriteId::PlayButton);
        Rect::new(
            PLAY_BUTTON_POS.0 as f32,
            PLAY_BUTTON_POS.1 as f32,
            button.w as f32,
            button.h as f32,
        )
    }

    fn flush_best_score(&mut self) {
        if self.session.best_score > self.saved_best {
            self.store.save(self.session.best_score);
            self.saved_best = self.session.best_score;
        }
    }

    fn rasterize(&mut self) {
        let cmds = render::compose(&self.session, self.button_held);
        let fb = &mut self.framebuffer;
        fb.fill(0);
        for cmd in &cmds {
            match cmd {
                DrawCmd::Sprite { id, pos, rotation } => {
                    let sprite = self.sprites.get(*id);
                    if *rotation == 0.0 {
                        blit(fb, sprite, pos.x as i32, pos.y as i32);
                    } else {
                        blit_rotated(fb, sprite, *pos, *rotation);
                    }
                }
                DrawCmd::Fill { color, alpha } => {
                    for pixel in fb.iter_mut() {
                        *pixel = blend(*pixel, *color, *alpha);
                    }
                }
            }
        }
    }

    /// Nearest-scale the logical framebuffer onto the surface and present
    fn present(&mut self) -> Result<(), Box<dyn Error>> {
        let Some(frontend) = &mut self.frontend else {
            return Ok(());
        };
        let size = frontend.window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(());
        };
        frontend.surface.resize(w, h)?;
        let mut buffer = frontend.surface.buffer_mut()?;
        for y in 0..size.height {
            let sy = (y * SCREEN_H / size.height).min(SCREEN_H - 1);
            let src_row = (sy * SCREEN_W) as usize;
            let dst_row = (y * size.width) as usize;
            for x in 0..size.width {
                let sx = (x * SCREEN_W / size.width).min(SCREEN_W - 1);
                buffer[dst_row + x as usize] = self.framebuffer[src_row + sx as usize];
            }
        }
        buffer.present()?;
        Ok(())
    }

    fn handle_key(&mut self, event: winit::event::KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        if code == KeyCode::KeyG {
            if let Some(frontend) = &self.frontend {
                let title = if pressed { SECRET_TITLE } else { WINDOW_TITLE };
                frontend.window.set_title(title);
            }
            return;
        }
        apply_key(&mut self.pending, code, pressed, event.repeat);
    }

    fn handle_mouse(&mut self, state: ElementState) {
        let over_button = self.restart_armed() && self.play_button_rect().contains(self.cursor);
        match state {
            ElementState::Pressed => {
                if over_button {
                    self.button_held = true;
                } else {
                    self.pending.flap = true;
                }
            }
            ElementState::Released => {
                if self.button_held && over_button {
                    self.pending.restart = true;
                }
                self.button_held = false;
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.frontend.is_none()
            && let Err(err) = self.init_frontend(event_loop)
        {
            log::error!("cannot open window: {err}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(frontend) = &self.frontend else {
            return;
        };
        if window_id != frontend.window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.flush_best_score();
                log::info!("close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event),
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(frontend.window.scale_factor());
                self.cursor = Vec2::new(logical.x, logical.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.handle_mouse(state),
            WindowEvent::RedrawRequested => {
                self.rasterize();
                if let Err(err) = self.present() {
                    log::error!("present failed: {err}");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let mut ran = 0;
        while now >= self.next_tick {
            self.step();
            self.next_tick += TICK;
            ran += 1;
            if ran > MAX_CATCHUP {
                log::warn!("tick loop fell behind, resyncing");
                self.next_tick = now + TICK;
                break;
            }
        }
        if ran > 0
            && let Some(frontend) = &self.frontend
        {
            frontend.window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.flush_best_score();
    }
}

/// Keyboard mapping for the tick input. The jump keys only flap; the
/// restart control is pointer-only, like the on-screen button it is.
fn apply_key(pending: &mut TickInput, code: KeyCode, pressed: bool, repeat: bool) {
    if matches!(code, KeyCode::Space | KeyCode::ArrowUp) && pressed && !repeat {
        pending.flap = true;
    }
}

fn pack(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Source-over blend of an RGB color at `alpha` onto a packed pixel
fn blend(dst: u32, [r, g, b]: [u8; 3], alpha: u8) -> u32 {
    match alpha {
        0 => dst,
        255 => pack(r, g, b),
        a => {
            let a = u32::from(a);
            let mix = |s: u8, d: u32| ((u32::from(s) * a + d * (255 - a)) / 255) as u8;
            pack(
                mix(r, (dst >> 16) & 0xff),
                mix(g, (dst >> 8) & 0xff),
                mix(b, dst & 0xff),
            )
        }
    }
}

fn blit(fb: &mut [u32], sprite: &Sprite, x0: i32, y0: i32) {
    for sy in 0..sprite.h as i32 {
        let y = y0 + sy;
        if y < 0 || y >= SCREEN_H as i32 {
            continue;
        }
        let row = (sy as u32 * sprite.w * 4) as usize;
        for sx in 0..sprite.w as i32 {
            let x = x0 + sx;
            if x < 0 || x >= SCREEN_W as i32 {
                continue;
            }
            let i = row + sx as usize * 4;
            let dst = &mut fb[(y as u32 * SCREEN_W) as usize + x as usize];
            *dst = blend(
                *dst,
                [sprite.data[i], sprite.data[i + 1], sprite.data[i + 2]],
                sprite.data[i + 3],
            );
        }
    }
}

/// Rotate about the sprite center by `degrees` counter-clockwise, sampling
/// nearest-neighbour with inverse mapping
fn blit_rotated(fb: &mut [u32], sprite: &Sprite, pos: Vec2, degrees: f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let half_w = sprite.w as f32 / 2.0;
    let half_h = sprite.h as f32 / 2.0;
    let center = pos + Vec2::new(half_w, half_h);
    let radius = (half_w * half_w + half_h * half_h).sqrt().ceil() as i32;

    let cx = center.x as i32;
    let cy = center.y as i32;
    for dy in -radius..=radius {
        let y = cy + dy;
        if y < 0 || y >= SCREEN_H as i32 {
            continue;
        }
        for dx in -radius..=radius {
            let x = cx + dx;
            if x < 0 || x >= SCREEN_W as i32 {
                continue;
            }
            let vx = x as f32 + 0.5 - center.x;
            let vy = y as f32 + 0.5 - center.y;
            let sx = cos * vx - sin * vy + half_w;
            let sy = sin * vx + cos * vy + half_h;
            if sx < 0.0 || sy < 0.0 {
                continue;
            }
            let (sx, sy) = (sx as u32, sy as u32);
            if sx >= sprite.w || sy >= sprite.h {
                continue;
            }
            let i = ((sy * sprite.w + sx) * 4) as usize;
            let dst = &mut fb[(y as u32 * SCREEN_W) as usize + x as usize];
            *dst = blend(
                *dst,
                [sprite.data[i], sprite.data[i + 1], sprite.data[i + 2]],
                sprite.data[i + 3],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_keys_flap_but_never_restart() {
        for code in [KeyCode::Space, KeyCode::ArrowUp] {
            let mut pending = TickInput::default();
            apply_key(&mut pending, code, true, false);
            assert!(pending.flap);
            assert!(!pending.restart, "restart stays pointer-only");
        }
    }

    #[test]
    fn key_repeats_and_releases_are_ignored() {
        let mut pending = TickInput::default();
        apply_key(&mut pending, KeyCode::Space, true, true);
        assert!(!pending.flap);
        apply_key(&mut pending, KeyCode::Space, false, false);
        assert!(!pending.flap);
        apply_key(&mut pending, KeyCode::KeyQ, true, false);
        assert!(!pending.flap);
    }

    #[test]
    fn blend_endpoints_and_midpoint() {
        let white = [255, 255, 255];
        assert_eq!(blend(0x000000, white, 0), 0x000000);
        assert_eq!(blend(0x000000, white, 255), 0xffffff);
        let mid = blend(0x000000, white, 128);
        let r = (mid >> 16) & 0xff;
        assert!((127..=129).contains(&r));
    }

    #[test]
    fn blit_clips_at_the_edges() {
        let sprite = Sprite {
            w: 2,
            h: 2,
            data: vec![255; 16],
        };
        let mut fb = vec![0u32; (SCREEN_W * SCREEN_H) as usize];
        // half off the top-left corner; must not panic or wrap
        blit(&mut fb, &sprite, -1, -1);
        assert_eq!(fb[0], 0xffffff);
        assert_eq!(fb[1], 0);
        assert_eq!(fb[SCREEN_W as usize], 0);
    }

    #[test]
    fn zero_rotation_matches_plain_blit() {
        let sprite = Sprite {
            w: 4,
            h: 4,
            data: vec![255; 64],
        };
        let mut plain = vec![0u32; (SCREEN_W * SCREEN_H) as usize];
        let mut rotated = vec![0u32; (SCREEN_W * SCREEN_H) as usize];
        blit(&mut plain, &sprite, 100, 100);
        blit_rotated(&mut rotated, &sprite, Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(plain, rotated);
    }
}
