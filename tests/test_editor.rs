use image_cropper::CropRect;
use image_cropper::editor::{
    Command, EditorEvent, EditorOutput, Phase, PointerButton, SelectionEditor, SelectionMode,
};
use image_cropper::geometry::Point;

fn press(ed: &mut SelectionEditor, button: PointerButton, x: i32, y: i32) -> Option<EditorOutput> {
    ed.handle(EditorEvent::Press {
        button,
        pos: Point::new(x, y),
    })
}

fn move_to(ed: &mut SelectionEditor, x: i32, y: i32) -> Option<EditorOutput> {
    ed.handle(EditorEvent::Motion {
        pos: Point::new(x, y),
    })
}

#[test]
fn square_mode_draw() {
    let mut ed = SelectionEditor::new(SelectionMode::Square);
    press(&mut ed, PointerButton::Primary, 50, 50);
    move_to(&mut ed, 90, 60);
    move_to(&mut ed, 120, 80);

    assert_eq!(
        ed.handle(EditorEvent::Release),
        Some(EditorOutput::Drawn(CropRect::new(50, 50, 70, 70)))
    );
}

#[test]
fn free_mode_draw() {
    let mut ed = SelectionEditor::new(SelectionMode::Free);
    press(&mut ed, PointerButton::Primary, 50, 50);
    move_to(&mut ed, 120, 80);

    assert_eq!(
        ed.handle(EditorEvent::Release),
        Some(EditorOutput::Drawn(CropRect::new(50, 50, 70, 30)))
    );
}

#[test]
fn move_accumulates_frame_deltas() {
    let mut ed = SelectionEditor::new(SelectionMode::Free);
    press(&mut ed, PointerButton::Primary, 10, 20);
    move_to(&mut ed, 40, 60);
    ed.handle(EditorEvent::Release);

    press(&mut ed, PointerButton::Secondary, 100, 100);
    assert!(matches!(ed.phase(), Phase::Moving { .. }));

    let deltas = [(3, -2), (10, 0), (-4, 7), (0, 0), (25, 15)];
    let (mut px, mut py) = (100, 100);
    for (dx, dy) in deltas {
        px += dx;
        py += dy;
        move_to(&mut ed, px, py);
    }

    let (sx, sy) = deltas
        .iter()
        .fold((0, 0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
    assert_eq!(
        ed.handle(EditorEvent::Release),
        Some(EditorOutput::Moved(CropRect::new(10 + sx, 20 + sy, 30, 40)))
    );
    assert_eq!(ed.phase(), Phase::Idle);
}

#[test]
fn move_keeps_drag_direction_of_reversed_rect() {
    let mut ed = SelectionEditor::new(SelectionMode::Free);
    press(&mut ed, PointerButton::Primary, 80, 80);
    move_to(&mut ed, 60, 50);
    ed.handle(EditorEvent::Release);

    press(&mut ed, PointerButton::Secondary, 5, 5);
    move_to(&mut ed, 15, 10);
    assert_eq!(
        ed.handle(EditorEvent::Release),
        Some(EditorOutput::Moved(CropRect::new(70, 55, 20, 30)))
    );
}

#[test]
fn new_draw_replaces_old_rect() {
    let mut ed = SelectionEditor::new(SelectionMode::Free);
    press(&mut ed, PointerButton::Primary, 0, 0);
    move_to(&mut ed, 10, 10);
    ed.handle(EditorEvent::Release);

    press(&mut ed, PointerButton::Primary, 100, 100);
    let sel = ed.selection().unwrap();
    assert_eq!(sel.anchor, Point::new(100, 100));
    assert_eq!(sel.far, Point::new(100, 100));
}

#[test]
fn full_session() {
    let mut ed = SelectionEditor::default();
    assert_eq!(ed.mode(), SelectionMode::Square);

    assert_eq!(
        ed.handle(EditorEvent::Key(Command::ToggleMode)),
        Some(EditorOutput::ModeChanged(SelectionMode::Free))
    );
    press(&mut ed, PointerButton::Primary, 30, 40);
    move_to(&mut ed, 70, 45);
    ed.handle(EditorEvent::Release);

    press(&mut ed, PointerButton::Secondary, 50, 50);
    move_to(&mut ed, 52, 51);
    ed.handle(EditorEvent::Release);

    assert_eq!(
        ed.handle(EditorEvent::Key(Command::Crop)),
        Some(EditorOutput::Crop(CropRect::new(32, 41, 40, 5)))
    );

    ed.handle(EditorEvent::Key(Command::Reset));
    assert_eq!(ed.handle(EditorEvent::Key(Command::Crop)), None);

    assert_eq!(ed.handle(EditorEvent::Key(Command::Quit)), Some(EditorOutput::Quit));
    assert_eq!(press(&mut ed, PointerButton::Primary, 1, 1), None);
    assert_eq!(ed.selection(), None);
}
