//! Selection rectangle editing logic of the interactive cropper.
//!
//! [`SelectionEditor`] knows nothing about windows or painting. The GUI translates pointer and key
//! input into [`EditorEvent`]s and acts on the returned [`EditorOutput`]s.

use std::fmt;

use log::debug;

use crate::geometry::{CropRect, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // draw
    Secondary, // move
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Reset,
    ToggleMode,
    Crop,
    Quit,
}

// positions are image pixels, the GUI does not forward presses and motions outside the image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    Press { button: PointerButton, pos: Point },
    Motion { pos: Point },
    Release,
    Key(Command),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Square,
    Free,
}

impl SelectionMode {
    pub fn toggled(self) -> Self {
        match self {
            SelectionMode::Square => SelectionMode::Free,
            SelectionMode::Free => SelectionMode::Square,
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Square => write!(f, "Square"),
            SelectionMode::Free => write!(f, "Free"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorOutput {
    Drawn(CropRect),
    Moved(CropRect),
    Crop(CropRect),
    ModeChanged(SelectionMode),
    Reset,
    Quit,
}

impl fmt::Display for EditorOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorOutput::Drawn(r) => write!(f, "Rectangle: {}", r),
            EditorOutput::Moved(r) => write!(f, "Moved rectangle: {}", r),
            EditorOutput::Crop(r) => write!(f, "Cropping: {}", r),
            EditorOutput::ModeChanged(m) => write!(f, "Mode: {}", m),
            EditorOutput::Reset => write!(f, "Selection reset"),
            EditorOutput::Quit => write!(f, "Quit"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub far: Point,
}

impl Selection {
    pub fn rect(&self) -> CropRect {
        CropRect::new(
            self.anchor.x,
            self.anchor.y,
            self.far.x - self.anchor.x,
            self.far.y - self.anchor.y,
        )
    }

    pub fn normalized(&self) -> CropRect {
        CropRect::from_corners(self.anchor, self.far)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Drawing,
    Moving {
        last: Point,
        width: i32,
        height: i32,
    },
}

#[derive(Debug, Default)]
pub struct SelectionEditor {
    mode: SelectionMode,
    phase: Phase,
    selection: Option<Selection>,
    terminated: bool,
}

impl SelectionEditor {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn handle(&mut self, event: EditorEvent) -> Option<EditorOutput> {
        if self.terminated {
            return None;
        }

        match event {
            EditorEvent::Press { button: PointerButton::Primary, pos } => {
                self.start_drawing(pos);
                None
            }
            EditorEvent::Press { button: PointerButton::Secondary, pos } => {
                self.start_moving(pos);
                None
            }
            EditorEvent::Motion { pos } => {
                self.track(pos);
                None
            }
            EditorEvent::Release => self.finish(),
            EditorEvent::Key(cmd) => self.command(cmd),
        }
    }

    fn start_drawing(&mut self, pos: Point) {
        debug!("start drawing at {:?}", pos);
        self.phase = Phase::Drawing;
        self.selection = Some(Selection {
            anchor: pos,
            far: pos,
        });
    }

    fn start_moving(&mut self, pos: Point) {
        if self.phase == Phase::Drawing {
            return;
        }
        if let Some(sel) = self.selection {
            let r = sel.rect();
            debug!("start moving {:?} at {:?}", r, pos);
            self.phase = Phase::Moving {
                last: pos,
                width: r.width,
                height: r.height,
            };
        }
    }

    fn track(&mut self, pos: Point) {
        let Some(sel) = self.selection.as_mut() else {
            return;
        };

        match &mut self.phase {
            Phase::Drawing => {
                sel.far = match self.mode {
                    SelectionMode::Square => square_corner(sel.anchor, sel.far, pos),
                    SelectionMode::Free => pos,
                };
            }
            Phase::Moving {
                last,
                width,
                height,
            } => {
                sel.anchor.x += pos.x - last.x;
                sel.anchor.y += pos.y - last.y;
                sel.far = Point::new(sel.anchor.x + *width, sel.anchor.y + *height);
                *last = pos;
            }
            Phase::Idle => {}
        }
    }

    fn finish(&mut self) -> Option<EditorOutput> {
        let phase = std::mem::take(&mut self.phase);
        let rect = self.selection?.normalized();
        match phase {
            Phase::Drawing => Some(EditorOutput::Drawn(rect)),
            Phase::Moving { .. } => Some(EditorOutput::Moved(rect)),
            Phase::Idle => None,
        }
    }

    fn command(&mut self, cmd: Command) -> Option<EditorOutput> {
        match cmd {
            Command::Reset => {
                self.selection = None;
                self.phase = Phase::Idle;
                Some(EditorOutput::Reset)
            }
            Command::ToggleMode => {
                self.mode = self.mode.toggled();
                Some(EditorOutput::ModeChanged(self.mode))
            }
            Command::Crop => self.selection.map(|sel| EditorOutput::Crop(sel.normalized())),
            Command::Quit => {
                self.terminated = true;
                self.phase = Phase::Idle;
                Some(EditorOutput::Quit)
            }
        }
    }
}

/// Far corner of a square drag from `anchor` towards `pos`. Each direction follows the pointer,
/// or the previous far corner if the pointer is level with the anchor on that axis.
pub fn square_corner(anchor: Point, prev: Point, pos: Point) -> Point {
    let side = (pos.x - anchor.x).abs().max((pos.y - anchor.y).abs());
    let dir = |a: i32, prev: i32, p: i32| -> i32 {
        match p.cmp(&a) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => {
                if prev > a {
                    1
                } else {
                    -1
                }
            }
        }
    };
    Point::new(
        anchor.x + dir(anchor.x, prev.x, pos.x) * side,
        anchor.y + dir(anchor.y, prev.y, pos.y) * side,
    )
}
