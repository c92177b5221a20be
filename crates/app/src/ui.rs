//! Overlay window using egui

use crate::config::Config;
use crate::state::{AppState, StateMachine};
use crate::worker::CaptureRequest;
use capture::{Point, Rect, ScreenGrabber};
use eframe::egui;
use eframe::egui::viewport::ResizeDirection;
use overlay::{CursorShape, DragSession, Edge, FrameLayout, Size, Zone};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for capture requests
pub type CaptureCallback = Arc<dyn Fn(CaptureRequest) + Send + Sync>;

/// Nearly invisible fill; fully transparent pixels let clicks fall through
const HIT_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 1);
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(18, 20, 26, 215);
const DISABLED_FILL: egui::Color32 = egui::Color32::from_rgb(108, 117, 125);

/// UI State shared between threads
pub struct UiState {
    pub state_machine: StateMachine,
    pub status_text: String,
    /// Lets worker-side threads wake the UI
    pub repaint: Option<egui::Context>,
    pub on_capture: Option<CaptureCallback>,
}

impl UiState {
    pub fn new() -> Self {
        let state_machine = StateMachine::new();
        Self {
            status_text: state_machine.state().display_text().to_string(),
            state_machine,
            repaint: None,
            on_capture: None,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Frameless capture overlay
pub struct OverlayApp {
    state: Arc<Mutex<UiState>>,
    layout: FrameLayout,
    border_color: egui::Color32,
    clamp_to_screen: bool,
    grabber: Box<dyn ScreenGrabber>,
    /// Window geometry in logical points
    geometry: Rect,
    /// False when the platform does not report window positions (Wayland)
    position_known: bool,
    drag: Option<DragSession>,
    note: String,
}

impl OverlayApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        state: Arc<Mutex<UiState>>,
        config: &Config,
        grabber: Box<dyn ScreenGrabber>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        state.lock().repaint = Some(cc.egui_ctx.clone());

        let [r, g, b] = config.frame.border_color;
        Self {
            state,
            layout: config.frame_layout(),
            border_color: egui::Color32::from_rgb(r, g, b),
            clamp_to_screen: config.window.clamp_to_screen,
            grabber,
            geometry: config.initial_geometry(),
            position_known: true,
            drag: None,
            note: String::new(),
        }
    }

    fn window_size(ctx: &egui::Context) -> Size {
        let size = ctx.screen_rect().size();
        Size::new(size.x.round().max(0.0) as u32, size.y.round().max(0.0) as u32)
    }

    fn sync_geometry(&mut self, ctx: &egui::Context) {
        let outer = ctx.input(|i| i.viewport().outer_rect);
        self.position_known = outer.is_some();
        if let Some(outer) = outer {
            self.geometry = rect_from_egui(outer);
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context) {
        let (pos, pressed, down, released) = ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
            )
        });

        if let Some(session) = self.drag {
            if released || !down {
                log::trace!("Drag session ended at {:?}", self.geometry);
                self.drag = None;
            } else if let Some(pos) = pos {
                let pointer = self.geometry.origin() + point_from_egui(pos);
                let next = session.update(pointer, self.layout.min_size);
                self.apply_geometry(ctx, next);
            }
            ctx.set_cursor_icon(cursor_icon(CursorShape::for_edge(session.edge)));
            return;
        }

        let Some(pos) = pos else {
            return;
        };

        let local = point_from_egui(pos);
        let edge = match self.layout.hit_test(local, Self::window_size(ctx)) {
            // Widgets pick their own cursor and take the click
            Zone::Panel => return,
            Zone::Move => None,
            Zone::Resize(edge) => Some(edge),
        };

        ctx.set_cursor_icon(cursor_icon(CursorShape::for_edge(edge)));

        if pressed {
            self.begin_drag(ctx, local, edge);
        }
    }

    fn begin_drag(&mut self, ctx: &egui::Context, local: Point, edge: Option<Edge>) {
        if !self.position_known {
            // Compositor owns the window position; let it run the interaction
            let command = match edge {
                None => egui::ViewportCommand::StartDrag,
                Some(edge) => egui::ViewportCommand::BeginResize(resize_direction(edge)),
            };
            ctx.send_viewport_cmd(command);
            return;
        }

        let bounds = if self.clamp_to_screen {
            self.screen_bounds(ctx)
        } else {
            None
        };

        self.drag = Some(DragSession::begin(
            self.geometry.origin() + local,
            self.geometry,
            edge,
            bounds,
        ));
    }

    /// Bounding box of all monitor work areas in logical points
    fn screen_bounds(&self, ctx: &egui::Context) -> Option<Rect> {
        let ppp = ctx.pixels_per_point();

        match self.grabber.desktop_bounds() {
            Ok(bounds) => Some(bounds.scale(1.0 / ppp)),
            Err(e) => {
                log::warn!("Screen bounds unavailable, not clamping: {}", e);
                None
            }
        }
    }

    fn apply_geometry(&mut self, ctx: &egui::Context, next: Rect) {
        if next.origin() != self.geometry.origin() {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                next.x as f32,
                next.y as f32,
            )));
        }
        if (next.width, next.height) != (self.geometry.width, self.geometry.height) {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                next.width as f32,
                next.height as f32,
            )));
        }
        self.geometry = next;
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        let typing = ctx.memory(|m| m.focused().is_some());
        if escape && !typing {
            log::info!("Escape pressed, closing overlay");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn paint_frame(&self, ui: &egui::Ui) {
        let rect = ui.ctx().screen_rect();
        let painter = ui.painter();

        painter.rect_filled(rect, 0.0, HIT_FILL);

        let width = self.layout.border_width as f32;
        painter.rect_stroke(
            rect.shrink(width / 2.0),
            0.0,
            egui::Stroke::new(width, self.border_color),
        );
    }

    /// Draw the panel; true when the user asked for a capture
    fn control_panel(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &AppState,
        status_text: &str,
        last_saved: Option<&Path>,
    ) -> bool {
        let panel = rect_to_egui(self.layout.panel_rect(Self::window_size(ui.ctx())));
        ui.painter().rect_filled(panel, 4.0, PANEL_FILL);

        let can_capture = app_state.can_capture();
        let mut requested = false;

        ui.allocate_ui_at_rect(panel.shrink(6.0), |ui| {
            ui.horizontal_centered(|ui| {
                let button = egui::Button::new(
                    egui::RichText::new("Capture")
                        .size(14.0)
                        .color(egui::Color32::BLACK),
                )
                .fill(if can_capture {
                    self.border_color
                } else {
                    DISABLED_FILL
                })
                .min_size(egui::vec2(88.0, 24.0))
                .rounding(6.0);

                if ui.add_enabled(can_capture, button).clicked() {
                    requested = true;
                }

                let status_width = 170.0;
                let input_width = (ui.available_width() - status_width).max(60.0);
                let input = ui.add_sized(
                    [input_width, 24.0],
                    egui::TextEdit::singleline(&mut self.note).hint_text("Ask about this region..."),
                );
                if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && can_capture {
                    requested = true;
                }

                let status_color = match app_state {
                    AppState::Capturing => egui::Color32::from_rgb(255, 193, 7),
                    AppState::Idle => egui::Color32::from_rgb(200, 200, 200),
                };
                let label = ui.label(egui::RichText::new(status_text).size(12.0).color(status_color));
                if let Some(path) = last_saved {
                    label.on_hover_text(path.display().to_string());
                }
            });
        });

        requested
    }

    fn capture_request(&self, ctx: &egui::Context) -> Option<CaptureRequest> {
        let region = self.layout.capture_region(self.geometry)?;
        Some(CaptureRequest {
            region: region.scale(ctx.pixels_per_point()),
            note: self.note.trim().to_string(),
            destination: None,
        })
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_geometry(ctx);
        self.handle_pointer(ctx);
        self.handle_keys(ctx);

        // Clone necessary data to avoid holding lock during UI rendering
        let (app_state, status_text, last_saved, on_capture) = {
            let state = self.state.lock();
            (
                state.state_machine.state().clone(),
                state.status_text.clone(),
                state.state_machine.last_saved().map(|s| s.image_path.clone()),
                state.on_capture.clone(),
            )
        };

        let mut requested = false;
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.paint_frame(ui);
                requested =
                    self.control_panel(ui, &app_state, &status_text, last_saved.as_deref());
            });

        if requested {
            match (self.capture_request(ctx), on_capture) {
                (Some(request), Some(callback)) => callback(request),
                (None, _) => {
                    self.state.lock().status_text = "Window too small to capture".to_string();
                }
                (Some(_), None) => log::warn!("Capture requested but no handler is installed"),
            }
        }

        if matches!(app_state, AppState::Capturing) {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }
}

fn point_from_egui(pos: egui::Pos2) -> Point {
    Point::new(pos.x.round() as i32, pos.y.round() as i32)
}

fn rect_from_egui(rect: egui::Rect) -> Rect {
    Rect::new(
        rect.min.x.round() as i32,
        rect.min.y.round() as i32,
        rect.width().round().max(0.0) as u32,
        rect.height().round().max(0.0) as u32,
    )
}

fn rect_to_egui(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

fn cursor_icon(shape: CursorShape) -> egui::CursorIcon {
    match shape {
        CursorShape::Move => egui::CursorIcon::Move,
        CursorShape::Horizontal => egui::CursorIcon::ResizeHorizontal,
        CursorShape::Vertical => egui::CursorIcon::ResizeVertical,
        CursorShape::DiagonalNwSe => egui::CursorIcon::ResizeNwSe,
        CursorShape::DiagonalNeSw => egui::CursorIcon::ResizeNeSw,
    }
}

fn resize_direction(edge: Edge) -> ResizeDirection {
    match edge {
        Edge::Top => ResizeDirection::North,
        Edge::Bottom => ResizeDirection::South,
        Edge::Left => ResizeDirection::West,
        Edge::Right => ResizeDirection::East,
        Edge::TopLeft => ResizeDirection::NorthWest,
        Edge::TopRight => ResizeDirection::NorthEast,
        Edge::BottomLeft => ResizeDirection::SouthWest,
        Edge::BottomRight => ResizeDirection::SouthEast,
    }
}
