mod stylus;

use macroquad::miniquad::window::set_mouse_cursor;
use macroquad::miniquad::CursorIcon;
use macroquad::prelude::*;
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use sketchpad::{Bitmap, BrushMode, Engine, Path, Segment, Stroke, StrokeStyle};
use std::sync::mpsc;
use stylus::{read_input, StylusEvent};
use tracing::warn;

const PRESSURE_MAX: f32 = 60000.0;
const PRESSURE_THRESHOLD: f32 = 0.05;

#[derive(Serialize, Deserialize)]
enum SegmentData {
    Move([f32; 2]),
    Line([f32; 2]),
    Quad([f32; 2], [f32; 2]),
}

#[derive(Serialize, Deserialize)]
struct StrokeData {
    erase: bool,
    color: u32,
    width: f32,
    segments: Vec<SegmentData>,
}

#[derive(Serialize, Deserialize)]
struct DocumentData {
    strokes: Vec<StrokeData>,
}

impl From<&Stroke> for StrokeData {
    fn from(stroke: &Stroke) -> Self {
        let segments = stroke
            .path
            .segments()
            .iter()
            .map(|seg| match *seg {
                Segment::MoveTo(p) => SegmentData::Move([p.x, p.y]),
                Segment::LineTo(p) => SegmentData::Line([p.x, p.y]),
                Segment::QuadTo { ctrl, to } => SegmentData::Quad([ctrl.x, ctrl.y], [to.x, to.y]),
            })
            .collect();
        StrokeData {
            erase: stroke.mode == BrushMode::Erase,
            color: stroke.style.color,
            width: stroke.style.width,
            segments,
        }
    }
}

impl StrokeData {
    fn to_stroke(&self) -> Stroke {
        let segments = self
            .segments
            .iter()
            .map(|seg| match *seg {
                SegmentData::Move(p) => Segment::MoveTo(vec2(p[0], p[1])),
                SegmentData::Line(p) => Segment::LineTo(vec2(p[0], p[1])),
                SegmentData::Quad(c, p) => Segment::QuadTo {
                    ctrl: vec2(c[0], c[1]),
                    to: vec2(p[0], p[1]),
                },
            })
            .collect();
        Stroke {
            mode: if self.erase {
                BrushMode::Erase
            } else {
                BrushMode::Paint
            },
            style: StrokeStyle {
                color: self.color,
                width: self.width,
                ..StrokeStyle::default()
            },
            path: Path::from_segments(segments),
        }
    }
}

fn bitmap_to_image(bitmap: &Bitmap) -> Image {
    let mut bytes = Vec::with_capacity(bitmap.pixels().len() * 4);
    for &argb in bitmap.pixels() {
        bytes.push((argb >> 16 & 0xFF) as u8);
        bytes.push((argb >> 8 & 0xFF) as u8);
        bytes.push((argb & 0xFF) as u8);
        bytes.push((argb >> 24) as u8);
    }
    Image {
        bytes,
        width: bitmap.width() as u16,
        height: bitmap.height() as u16,
    }
}

fn update_cursor_icon(mode: BrushMode) {
    match mode {
        BrushMode::Paint => set_mouse_cursor(CursorIcon::Crosshair),
        BrushMode::Erase => set_mouse_cursor(CursorIcon::NotAllowed),
    }
}

fn save_to_json(engine: &Engine) {
    let data = DocumentData {
        strokes: engine.strokes().iter().map(StrokeData::from).collect(),
    };
    if let Some(path) = FileDialog::new().add_filter("json", &["json"]).save_file() {
        match serde_json::to_string_pretty(&data) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&path, json) {
                    warn!(%err, "could not write document");
                }
            }
            Err(err) => warn!(%err, "could not serialize document"),
        }
    }
}

fn load_from_json(engine: &mut Engine) {
    if let Some(path) = FileDialog::new().add_filter("json", &["json"]).pick_file() {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(%err, "could not read document");
                return;
            }
        };
        match serde_json::from_str::<DocumentData>(&contents) {
            Ok(data) => {
                engine.load_strokes(data.strokes.iter().map(StrokeData::to_stroke).collect())
            }
            Err(err) => warn!(%err, "could not parse document"),
        }
    }
}

#[macroquad::main("Sketchpad")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (sender, receiver) = mpsc::channel();
    if let Ok(device_path) = std::env::var("SKETCHPAD_STYLUS") {
        read_input(device_path, sender);
    }

    let mut engine = Engine::new();
    let mut surface_size = (screen_width() as u32, screen_height() as u32);
    engine.surface_created(surface_size.0, surface_size.1);
    update_cursor_icon(engine.mode());

    let mut stylus_pressure = 0.0_f32;
    let mut drawing = false;
    let mut paint_width = 20.0_f32;
    let mut eraser_width = 20.0_f32;

    loop {
        let size = (screen_width() as u32, screen_height() as u32);
        if size != surface_size {
            surface_size = size;
            engine.surface_changed(size.0, size.1);
        }

        while let Ok(event) = receiver.try_recv() {
            if let StylusEvent::Pressure { value } = event {
                stylus_pressure = value as f32 / PRESSURE_MAX;
            }
        }

        let (x, y) = mouse_position();
        let pointer_active =
            is_mouse_button_down(MouseButton::Left) || stylus_pressure > PRESSURE_THRESHOLD;
        if pointer_active && !drawing {
            engine.pointer_down(x, y);
            drawing = true;
        } else if pointer_active {
            engine.pointer_move(x, y);
        } else if drawing {
            engine.pointer_up();
            drawing = false;
        }

        if is_key_pressed(KeyCode::P) {
            engine.set_mode(BrushMode::Paint);
            update_cursor_icon(BrushMode::Paint);
        }
        if is_key_pressed(KeyCode::E) {
            engine.set_mode(BrushMode::Erase);
            update_cursor_icon(BrushMode::Erase);
        }
        if is_key_pressed(KeyCode::C) {
            engine.clear();
        }
        if is_key_pressed(KeyCode::Key1) {
            engine.set_color(0xFFFF_FFFF);
        }
        if is_key_pressed(KeyCode::Key2) {
            engine.set_color(0xFF00_0000);
        }
        if is_key_pressed(KeyCode::Key3) {
            engine.set_color(0xFFFF_0000);
        }
        if is_key_pressed(KeyCode::Key4) {
            engine.set_color(0xFF00_00FF);
        }
        if is_key_pressed(KeyCode::LeftBracket) || is_key_pressed(KeyCode::RightBracket) {
            let delta = if is_key_pressed(KeyCode::LeftBracket) {
                -2.0
            } else {
                2.0
            };
            match engine.mode() {
                BrushMode::Paint => {
                    paint_width = (paint_width + delta).clamp(2.0, 120.0);
                    engine.set_paint_width(paint_width);
                }
                BrushMode::Erase => {
                    eraser_width = (eraser_width + delta).clamp(2.0, 120.0);
                    engine.set_eraser_width(eraser_width);
                }
            }
        }
        if is_key_down(KeyCode::LeftControl) && is_key_pressed(KeyCode::Z) {
            engine.undo();
        }
        if is_key_down(KeyCode::LeftControl) && is_key_pressed(KeyCode::R) {
            engine.redo();
        }
        if is_key_down(KeyCode::LeftControl) && is_key_pressed(KeyCode::S) {
            save_to_json(&engine);
        }
        if is_key_down(KeyCode::LeftControl) && is_key_pressed(KeyCode::O) {
            load_from_json(&mut engine);
        }

        clear_background(WHITE);
        if let Some(bitmap) = engine.snapshot() {
            let texture = Texture2D::from_image(&bitmap_to_image(&bitmap));
            draw_texture(&texture, 0.0, 0.0, WHITE);
        }

        next_frame().await;
    }
}
