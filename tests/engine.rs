use sketchpad::{BrushMode, Engine};

const BLACK: u32 = 0xFF00_0000;

fn engine_with_surface() -> Engine {
    let mut engine = Engine::new();
    engine.surface_created(64, 64);
    engine
}

fn gesture(engine: &mut Engine, points: &[(f32, f32)]) {
    let mut iter = points.iter();
    let &(x, y) = iter.next().unwrap();
    engine.pointer_down(x, y);
    for &(x, y) in iter {
        engine.pointer_move(x, y);
    }
    engine.pointer_up();
}

#[test]
fn commit_undo_redo_round_trip() {
    let mut engine = engine_with_surface();
    gesture(&mut engine, &[(10.0, 10.0), (20.0, 20.0)]);

    let committed = engine.strokes();
    assert_eq!(committed.len(), 1);
    assert!(engine.can_undo());
    assert!(!engine.can_redo());

    assert!(engine.undo());
    assert!(engine.strokes().is_empty());
    assert!(engine.can_redo());

    assert!(engine.redo());
    assert_eq!(engine.strokes(), committed);
    assert!(!engine.can_redo());
}

#[test]
fn clear_discards_pending_redo_without_error() {
    let mut engine = engine_with_surface();
    gesture(&mut engine, &[(10.0, 10.0), (20.0, 10.0)]);
    gesture(&mut engine, &[(10.0, 20.0), (20.0, 20.0)]);
    gesture(&mut engine, &[(10.0, 30.0), (20.0, 30.0)]);

    assert!(engine.undo());
    assert!(engine.undo());
    engine.clear();

    assert!(engine.strokes().is_empty());
    assert!(!engine.can_redo());
    assert!(!engine.undo());
    assert!(!engine.redo());
}

#[test]
fn tap_renders_a_dot_of_the_current_width() {
    let mut engine = engine_with_surface();
    gesture(&mut engine, &[(32.0, 32.0)]);

    let stroke = &engine.strokes()[0];
    assert!(stroke.path.is_dot());

    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.pixel(32, 32), BLACK);
    // default width 20 covers radius 10 around the tap
    assert_eq!(snap.pixel(40, 32), BLACK);
    assert_eq!(snap.pixel(5, 5), 0);
}

#[test]
fn narrow_width_applies_to_the_next_snapshot() {
    let mut engine = engine_with_surface();
    engine.set_paint_width(6.0);
    gesture(&mut engine, &[(10.0, 10.0)]);

    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.pixel(10, 10), BLACK);
    assert_eq!(snap.pixel(10, 15), 0);
}

#[test]
fn erase_stroke_clears_overlap_with_earlier_paint() {
    let mut engine = engine_with_surface();
    gesture(&mut engine, &[(10.0, 32.0), (32.0, 32.0), (54.0, 32.0)]);

    engine.set_mode(BrushMode::Erase);
    gesture(&mut engine, &[(32.0, 10.0), (32.0, 32.0), (32.0, 54.0)]);

    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.pixel(32, 32) >> 24, 0);
    // away from the eraser path the paint stroke survives
    assert_eq!(snap.pixel(14, 32), BLACK);
}

#[test]
fn undoing_the_erase_restores_the_paint() {
    let mut engine = engine_with_surface();
    gesture(&mut engine, &[(10.0, 32.0), (32.0, 32.0), (54.0, 32.0)]);
    engine.set_mode(BrushMode::Erase);
    gesture(&mut engine, &[(32.0, 10.0), (32.0, 32.0), (32.0, 54.0)]);

    assert!(engine.undo());
    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.pixel(32, 32), BLACK);
}

#[test]
fn mode_switch_mid_gesture_applies_to_the_whole_stroke() {
    let mut engine = engine_with_surface();
    engine.pointer_down(10.0, 10.0);
    engine.pointer_move(20.0, 20.0);
    engine.set_mode(BrushMode::Erase);
    engine.pointer_move(30.0, 30.0);
    engine.pointer_up();

    let strokes = engine.strokes();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].mode, BrushMode::Erase);
}

#[test]
fn committed_strokes_keep_their_style_snapshot() {
    let mut engine = engine_with_surface();
    gesture(&mut engine, &[(10.0, 10.0), (20.0, 10.0)]);

    engine.set_color(0xFFFF_0000);
    engine.set_paint_width(4.0);

    let strokes = engine.strokes();
    assert_eq!(strokes[0].style.color, BLACK);
    assert_eq!(strokes[0].style.width, 20.0);

    gesture(&mut engine, &[(10.0, 30.0), (20.0, 30.0)]);
    let strokes = engine.strokes();
    assert_eq!(strokes[1].style.color, 0xFFFF_0000);
    assert_eq!(strokes[1].style.width, 4.0);
}

#[test]
fn gestures_without_a_surface_do_not_panic() {
    let mut engine = Engine::new();
    gesture(&mut engine, &[(10.0, 10.0), (20.0, 20.0)]);
    assert_eq!(engine.strokes().len(), 1);
    assert!(engine.snapshot().is_none());
    assert!(engine.undo());
    assert!(engine.redo());
}

#[test]
fn zero_sized_surface_is_not_drawn_into() {
    let mut engine = Engine::new();
    engine.surface_created(0, 0);
    gesture(&mut engine, &[(10.0, 10.0)]);
    assert!(engine.snapshot().is_none());
}

#[test]
fn rapid_gesture_sequences_restart_the_render_loop_cleanly() {
    let mut engine = engine_with_surface();
    for i in 0..5 {
        let y = 10.0 + i as f32 * 8.0;
        gesture(&mut engine, &[(10.0, y), (50.0, y)]);
    }
    assert_eq!(engine.strokes().len(), 5);
    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.pixel(20, 10), BLACK);
    assert_eq!(snap.pixel(20, 42), BLACK);
}

#[test]
fn engines_are_independent() {
    let mut a = engine_with_surface();
    let mut b = engine_with_surface();
    gesture(&mut a, &[(32.0, 32.0)]);
    gesture(&mut b, &[(10.0, 10.0)]);

    assert_eq!(a.strokes().len(), 1);
    assert_eq!(b.strokes().len(), 1);
    assert_eq!(a.snapshot().unwrap().pixel(32, 32), BLACK);
    assert_eq!(b.snapshot().unwrap().pixel(32, 32), 0);
}

#[test]
fn surface_teardown_keeps_the_snapshot_available() {
    let mut engine = engine_with_surface();
    gesture(&mut engine, &[(32.0, 32.0)]);
    engine.surface_destroyed();

    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.pixel(32, 32), BLACK);

    // drawing continues into the cache while no display is bound
    gesture(&mut engine, &[(10.0, 10.0)]);
    assert_eq!(engine.snapshot().unwrap().pixel(10, 10), BLACK);
}
