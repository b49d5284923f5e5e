use std::path::{Path, PathBuf};

use eframe::egui;
use image::DynamicImage;
use log::{error, info};

use crate::config::EditorConfig;
use crate::editor::{
    Command, EditorEvent, EditorOutput, PointerButton, SelectionEditor, SelectionMode,
};
use crate::geometry::{CropRect, ImageViewport};
use crate::imaging::{crop, save_png};

const HELP: &str = "Left click: Draw, Right click: Move, C: Crop, R: Reset, A: Square/Free, Q: Quit";

/// Output file for a cropped selection of `source`: `cropped_<stem>.png` in `dir`
pub fn cropped_output_path(dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("cropped_{stem}.png"))
}

/// Translate a raw egui input event into an editor event.
/// Presses and motions outside the image return `None`.
pub fn editor_event(event: &egui::Event, viewport: &ImageViewport) -> Option<EditorEvent> {
    match event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            ..
        } => {
            let button = match button {
                egui::PointerButton::Primary => PointerButton::Primary,
                egui::PointerButton::Secondary => PointerButton::Secondary,
                _ => return None,
            };
            let pos = viewport.to_image(*pos)?;
            Some(EditorEvent::Press { button, pos })
        }
        egui::Event::PointerButton { pressed: false, .. } => Some(EditorEvent::Release),
        egui::Event::PointerMoved(pos) => {
            let pos = viewport.to_image(*pos)?;
            Some(EditorEvent::Motion { pos })
        }
        egui::Event::Key {
            key,
            pressed: true,
            repeat: false,
            ..
        } => {
            let cmd = match key {
                egui::Key::R => Command::Reset,
                egui::Key::A => Command::ToggleMode,
                egui::Key::C => Command::Crop,
                egui::Key::Q | egui::Key::Escape => Command::Quit,
                _ => return None,
            };
            Some(EditorEvent::Key(cmd))
        }
        _ => None,
    }
}

/// Whether `event` is a button press that lands on `blocked` (a window above the image)
pub fn press_blocked(event: &egui::Event, blocked: Option<egui::Rect>) -> bool {
    match (event, blocked) {
        (
            egui::Event::PointerButton {
                pos, pressed: true, ..
            },
            Some(rect),
        ) => rect.contains(*pos),
        _ => false,
    }
}

struct CropResult {
    texture: egui::TextureHandle,
    saved_as: Option<PathBuf>,
}

pub struct CropperApp {
    image: DynamicImage,
    source: PathBuf,
    texture: egui::TextureHandle,
    editor: SelectionEditor,
    config: EditorConfig,
    result: Option<CropResult>,
    // screen area of the result window in the last frame
    result_rect: Option<egui::Rect>,
}

impl CropperApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        image: DynamicImage,
        source: PathBuf,
        config: EditorConfig,
    ) -> Self {
        Self::with_context(&cc.egui_ctx, image, source, config)
    }

    pub fn with_context(
        ctx: &egui::Context,
        image: DynamicImage,
        source: PathBuf,
        config: EditorConfig,
    ) -> Self {
        let texture = load_texture(ctx, "image", &image);
        let mode = if config.square_mode {
            SelectionMode::Square
        } else {
            SelectionMode::Free
        };
        Self {
            image,
            source,
            texture,
            editor: SelectionEditor::new(mode),
            config,
            result: None,
            result_rect: None,
        }
    }

    fn process(&mut self, ctx: &egui::Context, output: EditorOutput) {
        match output {
            EditorOutput::Drawn(_) | EditorOutput::Moved(_) => println!("{}", output),
            EditorOutput::Crop(rect) => {
                println!("{}", output);
                self.crop_and_save(ctx, rect);
            }
            EditorOutput::ModeChanged(mode) => info!("selection mode: {}", mode),
            EditorOutput::Reset => info!("selection reset"),
            EditorOutput::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn crop_and_save(&mut self, ctx: &egui::Context, rect: CropRect) {
        let cropped = match crop(&self.image, rect) {
            Ok(img) => img,
            Err(e) => {
                error!("cannot crop: {}", e);
                return;
            }
        };

        let path = cropped_output_path(&self.config.output_dir, &self.source);
        let saved_as = match save_png(&cropped, &path) {
            Ok(()) => {
                println!("Cropped image saved as: {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("failed to save {}: {}", path.display(), e);
                None
            }
        };

        self.result = Some(CropResult {
            texture: load_texture(ctx, "cropped", &cropped),
            saved_as,
        });
    }

    fn show_result(&mut self, ctx: &egui::Context) {
        let Some(result) = &self.result else {
            self.result_rect = None;
            return;
        };

        let mut open = true;
        let response = egui::Window::new("Cropped Result")
            .open(&mut open)
            .show(ctx, |ui| {
                match &result.saved_as {
                    Some(path) => ui.label(format!("saved as {}", path.display())),
                    None => ui.label("not saved"),
                };
                let texture = egui::load::SizedTexture::from_handle(&result.texture);
                ui.add(egui::Image::from_texture(texture).max_size(egui::vec2(512.0, 512.0)));
            });
        self.result_rect = response.map(|r| r.response.rect);

        if !open {
            self.result = None;
            self.result_rect = None;
        }
    }
}

fn load_texture(ctx: &egui::Context, name: &str, image: &DynamicImage) -> egui::TextureHandle {
    let size = [image.width() as _, image.height() as _];
    let image_buffer = image.to_rgba8();
    let pixels = image_buffer.as_flat_samples();
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.label(format!("Mode: {} - {}", self.editor.mode(), HELP));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            const PADDING: f32 = 20.0;
            let available_size = ui.available_size();
            let max_size = available_size - egui::vec2(PADDING * 2.0, PADDING * 2.0);
            let image_size = self.texture.size_vec2();

            // fit into available space, keeping the aspect ratio
            let scale = (max_size.x / image_size.x).min(max_size.y / image_size.y);
            let display_size = image_size * scale;
            let total_display_size = display_size + egui::vec2(PADDING * 2.0, PADDING * 2.0);

            let x_offset = (available_size.x - total_display_size.x) / 2.0;
            let y_offset = (available_size.y - total_display_size.y) / 2.0;
            let start_pos = ui.cursor().min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));
            let target_rect = egui::Rect::from_min_size(start_pos, total_display_size);

            ui.allocate_rect(target_rect, egui::Sense::hover());
            let painter = ui.painter_at(target_rect);

            let image_rect = egui::Rect::from_min_size(
                target_rect.min + egui::vec2(PADDING, PADDING),
                display_size,
            );
            let viewport =
                ImageViewport::new(image_rect, self.image.width(), self.image.height());

            let events = ctx.input(|i| i.events.clone());
            for event in &events {
                if press_blocked(event, self.result_rect) {
                    continue;
                }
                if let Some(output) =
                    editor_event(event, &viewport).and_then(|e| self.editor.handle(e))
                {
                    self.process(ctx, output);
                }
            }

            painter.image(
                self.texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            if let Some(selection) = self.editor.selection() {
                let sel_rect = viewport.rect_to_screen(selection.rect());
                let overlay_color = egui::Color32::from_black_alpha(100);

                // dim everything outside the selection
                let clipped = sel_rect.intersect(image_rect);
                if clipped.is_positive() {
                    for dim in [
                        egui::Rect::from_min_max(
                            image_rect.min,
                            egui::pos2(image_rect.max.x, clipped.min.y),
                        ),
                        egui::Rect::from_min_max(
                            egui::pos2(image_rect.min.x, clipped.max.y),
                            image_rect.max,
                        ),
                        egui::Rect::from_min_max(
                            egui::pos2(image_rect.min.x, clipped.min.y),
                            egui::pos2(clipped.min.x, clipped.max.y),
                        ),
                        egui::Rect::from_min_max(
                            egui::pos2(clipped.max.x, clipped.min.y),
                            egui::pos2(image_rect.max.x, clipped.max.y),
                        ),
                    ] {
                        painter.rect_filled(dim, 0.0, overlay_color);
                    }
                }

                let [r, g, b] = self.config.edge_color;
                painter.rect_stroke(
                    sel_rect,
                    0.0,
                    egui::Stroke::new(self.config.line_width, egui::Color32::from_rgb(r, g, b)),
                );
            }
        });

        self.show_result(ctx);
    }
}
