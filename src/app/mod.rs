//! Browser glue.
//!
//! Builds the canvas and overlays, wires DOM events into the sequencer and
//! the world, and runs the animation-frame loop. All state lives in one
//! thread-local [`App`]; listeners borrow it for the duration of a callback.

mod overlay;
mod render;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Window, window};

use crate::audio::{AudioCues, SoundCue};
use crate::error::{Result, ValentineError};
use crate::game::{GameEvent, TargetImage, World};
use crate::music::{MUSIC_SRC, MediaMusic};
use crate::scene::{Camera, TimeOfDay};
use crate::sequencer::{Effect, Screen, Sequencer};

use overlay::Overlays;
use render::Sprites;

pub(crate) struct App {
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    overlays: Overlays,
    sprites: Sprites,
    sequencer: Sequencer<MediaMusic>,
    world: World,
    camera: Camera,
    time: TimeOfDay,
    cues: Option<AudioCues>,
    constellation_done: bool,
    last_score: Option<u32>,
    last_time_label: &'static str,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

fn now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Attach `handler` to `target` for the lifetime of the page.
fn listen<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(ValentineError::dom)?;
    closure.forget();
    Ok(())
}

fn load_sprite(image: TargetImage) -> Result<HtmlImageElement> {
    let img = HtmlImageElement::new().map_err(ValentineError::dom)?;
    listen(&img, "error", move |_: web_sys::Event| {
        with_app(|app| app.world.targets.mark_unavailable(image));
    })?;
    img.set_src(image.path());
    Ok(img)
}

pub(crate) fn start() -> Result<()> {
    let win = window().ok_or(ValentineError::NoWindow)?;
    let doc = win.document().ok_or(ValentineError::NoDocument)?;
    let body = doc.body().ok_or(ValentineError::MissingElement("body"))?;

    let canvas: HtmlCanvasElement = match doc.get_element_by_id("vq-canvas") {
        Some(el) => el
            .dyn_into()
            .map_err(|_| ValentineError::Dom("#vq-canvas is not a canvas".into()))?,
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")
                .map_err(ValentineError::dom)?
                .dyn_into()
                .map_err(|_| ValentineError::Dom("canvas element".into()))?;
            c.set_id("vq-canvas");
            c.set_attribute("style", "position:fixed; inset:0; width:100vw; height:100vh; display:block;")
                .ok();
            body.append_child(&c).map_err(ValentineError::dom)?;
            c
        }
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(ValentineError::dom)?
        .ok_or(ValentineError::MissingElement("2d context"))?
        .dyn_into()
        .map_err(|_| ValentineError::Dom("2d context".into()))?;

    let overlays = Overlays::build(&doc)?;
    let sprites = Sprites { bullseye: load_sprite(TargetImage::Bullseye)?, cookie: load_sprite(TargetImage::Cookie)? };
    let cues = match AudioCues::new() {
        Ok(c) => Some(c),
        Err(err) => {
            log::warn!("sound cues disabled: {err}");
            None
        }
    };

    let app = App {
        window: win.clone(),
        document: doc.clone(),
        canvas: canvas.clone(),
        ctx,
        overlays,
        sprites,
        sequencer: Sequencer::new(MediaMusic::new(MUSIC_SRC)?),
        world: World::new(),
        camera: Camera::default(),
        time: TimeOfDay::default(),
        cues,
        constellation_done: false,
        last_score: None,
        last_time_label: "",
    };
    install_listeners(&app)?;
    APP.with(|cell| cell.replace(Some(app)));
    log::info!("valentine quest started");
    start_loop();
    Ok(())
}

fn install_listeners(app: &App) -> Result<()> {
    listen(&app.document, "keydown", |evt: web_sys::KeyboardEvent| {
        with_app(|app| {
            if app.time.apply_key(&evt.key()) {
                evt.prevent_default();
            }
        });
    })?;

    listen(&app.document, "mousemove", |evt: web_sys::MouseEvent| {
        with_app(|app| {
            if app.pointer_locked() {
                app.camera.look(evt.movement_x() as f64, evt.movement_y() as f64);
            }
        });
    })?;

    listen(&app.overlays.start, "mousemove", |evt: web_sys::MouseEvent| {
        with_app(|app| app.on_start_screen_pointer(evt.client_x() as f64, evt.client_y() as f64));
    })?;

    listen(&app.overlays.yes, "click", |_: web_sys::MouseEvent| {
        with_app(|app| app.sequencer.confirm_valentine());
    })?;

    listen(&app.overlays.go, "click", |_: web_sys::MouseEvent| {
        with_app(|app| {
            app.sequencer.begin_adventure();
            app.canvas.request_pointer_lock();
        });
    })?;

    listen(&app.overlays.replay, "click", |_: web_sys::MouseEvent| {
        with_app(|app| app.sequencer.replay());
    })?;

    listen(&app.canvas, "click", |_: web_sys::MouseEvent| {
        with_app(|app| app.on_canvas_click());
    })?;
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(win: &Window, f: &FrameCallback) {
    if let Some(cb) = f.borrow().as_ref() {
        let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| app.frame(ts));
        if let Some(w) = window() {
            request_frame(&w, &f);
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        request_frame(&w, &g);
    }
}

impl App {
    fn pointer_locked(&self) -> bool {
        self.document.pointer_lock_element().is_some()
    }

    fn play(&self, cue: SoundCue) {
        if let Some(cues) = &self.cues {
            cues.play(cue);
        }
    }

    fn viewport(&self) -> (f64, f64) {
        let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (dim(self.window.inner_width()), dim(self.window.inner_height()))
    }

    /// Targets and the mega-heart only exist in play, outside milestone cards.
    fn targets_visible(&self) -> bool {
        self.sequencer.screen() == Screen::Playing && !self.sequencer.overlay_active()
    }

    fn on_start_screen_pointer(&mut self, x: f64, y: f64) {
        let rect = self.overlays.no_button_rect();
        let viewport = self.viewport();
        if self.sequencer.pointer_moved((x, y), rect, viewport) {
            self.overlays.set_no_offset(self.sequencer.flee_button().offset());
        }
    }

    fn on_canvas_click(&mut self) {
        if matches!(self.sequencer.screen(), Screen::Start | Screen::Adventure | Screen::Won(_)) {
            return;
        }
        if !self.pointer_locked() {
            // First click only captures the mouse.
            self.sequencer.game_clicked();
            self.canvas.request_pointer_lock();
            return;
        }
        self.sequencer.game_clicked();
        let t = now(&self.window);
        let events = self.world.shoot(&self.camera, self.targets_visible(), self.time, t);
        for event in events {
            match event {
                GameEvent::Cue(cue) => self.play(cue),
                GameEvent::TargetHit(id) => {
                    let before = self.sequencer.score();
                    self.sequencer.on_score_update(t);
                    self.world.resolve_target_hit(id, before, t);
                }
                GameEvent::HeartBroken => self.sequencer.on_win(t),
                GameEvent::ConstellationComplete => self.constellation_done = true,
            }
        }
    }

    fn apply_effects(&mut self) {
        for effect in self.sequencer.drain_effects() {
            match effect {
                Effect::ReleasePointerLock => self.document.exit_pointer_lock(),
                Effect::ResetWorld => {
                    self.world = World::new();
                    self.camera = Camera::default();
                    self.constellation_done = false;
                    self.last_score = None;
                    self.document.exit_pointer_lock();
                }
            }
        }
    }

    fn resize(&mut self) {
        let (w, h) = self.viewport();
        let (w, h) = (w.max(1.0) as u32, h.max(1.0) as u32);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
    }

    fn frame(&mut self, ts: f64) {
        self.sequencer.tick(ts);
        self.apply_effects();
        self.world.sync_overlay(self.sequencer.overlay_active());

        for cue in self.world.update(ts, self.time) {
            self.play(cue);
        }

        self.overlays.apply(self.sequencer.overlay());
        let score = self.sequencer.score();
        if self.last_score != Some(score) {
            self.overlays.set_score(score);
            self.last_score = Some(score);
        }
        let label = self.time.label();
        if self.last_time_label != label {
            self.overlays.set_time_label(label);
            self.last_time_label = label;
        }
        self.overlays.set_aiming(self.sequencer.is_aiming(), self.sequencer.overlay_active());
        self.overlays.show_constellation_message(self.constellation_done && self.time.is_night());

        self.resize();
        render::draw(
            &self.ctx,
            (self.canvas.width() as f64, self.canvas.height() as f64),
            &self.camera,
            &self.world,
            &self.sprites,
            self.time,
            self.targets_visible(),
            ts,
        );
    }
}
