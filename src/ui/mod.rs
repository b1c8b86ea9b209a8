use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use softbuffer::Surface;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{Key, NamedKey};
use winit::window::{CursorIcon, Window, WindowId};

use crate::cli::ViewerConfig;
use crate::collection::CycleDirection;
use crate::controller::ViewportController;
use crate::error::{Result, ViewerError};
use crate::files::IMAGE_EXTENSIONS;
use crate::input::MoveKey;
use crate::loader::ImageDecoder;
use crate::report::DialogReporter;
use crate::ui::pacing::FramePacer;
use crate::ui::render::{FrameCanvas, Renderer};

pub mod pacing;
pub mod render;

/// Wheel units per notch, matching the Win32 WHEEL_DELTA the zoom curve is tuned for.
const WHEEL_DELTA: f32 = 120.0;
const TITLE: &str = "Dafi";

pub type Viewer = ViewportController<ImageDecoder, DialogReporter>;

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

pub struct App {
    controller: Viewer,
    window_size: (u32, u32),
    pacer: FramePacer,
    window: Option<Arc<Window>>,
    context: Option<softbuffer::Context<Arc<Window>>>,
    surface: Option<Surface<Arc<Window>, Arc<Window>>>,
    surface_size: (u32, u32),
    cursor: (f32, f32),
    dropped: Vec<PathBuf>,
    open_requested: bool,
    shown_title: Option<(usize, usize)>,
    fatal: Option<ViewerError>,
}

impl App {
    pub fn new(controller: Viewer, config: &ViewerConfig) -> Self {
        Self {
            controller,
            window_size: config.window_size,
            pacer: FramePacer::new(config.fps, Instant::now()),
            window: None,
            context: None,
            surface: None,
            surface_size: (1, 1),
            cursor: (0.0, 0.0),
            dropped: Vec::new(),
            open_requested: false,
            shown_title: None,
            fatal: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn into_result(self) -> Result<()> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{}", err);
        self.fatal.get_or_insert(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(self.window_size.0, self.window_size.1));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = softbuffer::Context::new(Arc::clone(&window))?;
        let surface = Surface::new(&context, Arc::clone(&window))?;

        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);

        let size = self.window.as_ref().map(|w| w.inner_size()).unwrap_or_default();
        self.resize(size)?;
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        let w = size.width.max(1);
        let h = size.height.max(1);
        if let (Some(surface), Some(nw), Some(nh)) =
            (self.surface.as_mut(), NonZeroU32::new(w), NonZeroU32::new(h))
        {
            surface.resize(nw, nh)?;
            self.surface_size = (w, h);
        }
        self.controller.on_resize(w, h);
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let (fb_w, fb_h) = self.surface_size;
        let mut buffer = surface.buffer_mut()?;
        {
            let mut canvas = FrameCanvas::new(&mut buffer, fb_w, fb_h);
            canvas.begin_frame();
            canvas.clear();
            if let Some(frame) = self.controller.current_frame_state() {
                canvas.apply_scale_transform(frame.zoom, frame.zoom, 0.0, 0.0);
                canvas.draw_bitmap(frame.draw_x, frame.draw_y, frame.bitmap);
            }
        }
        buffer.present()?;
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let pressed = event.state == ElementState::Pressed;
        if let Some(key) = move_key(&event.logical_key) {
            self.controller.on_key(key, pressed);
            return;
        }
        // Everything else fires once per physical press.
        if !pressed || event.repeat {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::ArrowLeft) => self.controller.on_cycle(CycleDirection::Prev),
            Key::Named(NamedKey::ArrowRight) => self.controller.on_cycle(CycleDirection::Next),
            Key::Named(NamedKey::Delete) => self.controller.close_current(),
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Character(s) if s.eq_ignore_ascii_case("o") => self.open_requested = true,
            _ => {}
        }
    }

    fn open_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Open")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_files();
        match picked {
            // rfd already splits the selection into paths; load them like a drop.
            Some(paths) => {
                self.controller.on_files_dropped(paths);
            }
            None => log::debug!("[open] dialog cancelled"),
        }
    }

    fn update_title(&mut self) {
        let images = self.controller.images();
        let state = images.current_index().map(|i| (i + 1, images.len()));
        if state == self.shown_title {
            return;
        }
        self.shown_title = state;
        if let Some(ref window) = self.window {
            match state {
                Some((n, total)) => window.set_title(&format!("{} [{}/{}]", TITLE, n, total)),
                None => window.set_title(TITLE),
            }
        }
    }
}

fn move_key(key: &Key) -> Option<MoveKey> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(MoveKey::Up),
        Key::Named(NamedKey::ArrowDown) => Some(MoveKey::Down),
        Key::Character(s) => match s.to_ascii_lowercase().as_str() {
            "w" => Some(MoveKey::Up),
            "a" => Some(MoveKey::Left),
            "s" => Some(MoveKey::Down),
            "d" => Some(MoveKey::Right),
            _ => None,
        },
        _ => None,
    }
}

fn wheel_units(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => (y * WHEEL_DELTA).round() as i32,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y.round() as i32,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Err(e) = self.resize(size) {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    let (x, y) = self.cursor;
                    if state == ElementState::Pressed {
                        self.controller.on_pointer_down(x, y);
                    } else {
                        self.controller.on_pointer_up(x, y);
                    }
                    let icon = if self.controller.is_dragging() {
                        CursorIcon::Move
                    } else {
                        CursorIcon::Default
                    };
                    if let Some(ref window) = self.window {
                        window.set_cursor(icon);
                    }
                }
            }

            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.cursor = (x as f32, y as f32);
                self.controller.on_pointer_move(x as f32, y as f32);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.on_wheel(wheel_units(delta));
            }

            WindowEvent::DroppedFile(path) => {
                self.dropped.push(path);
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // winit reports a multi-file drop as one event per file.
        if !self.dropped.is_empty() {
            let paths = std::mem::take(&mut self.dropped);
            self.controller.on_files_dropped(paths);
        }
        if std::mem::take(&mut self.open_requested) {
            self.open_dialog();
        }

        let now = Instant::now();
        if self.pacer.is_due(now) {
            let elapsed = self.pacer.tick(now);
            self.controller.on_tick(elapsed);
            self.update_title();
            if let Some(ref window) = self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.deadline()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_notches_use_win32_units() {
        assert_eq!(wheel_units(MouseScrollDelta::LineDelta(0.0, 1.0)), 120);
        assert_eq!(wheel_units(MouseScrollDelta::LineDelta(0.0, -2.0)), -240);
        assert_eq!(wheel_units(MouseScrollDelta::LineDelta(0.0, 0.5)), 60);
        assert_eq!(
            wheel_units(MouseScrollDelta::PixelDelta(PhysicalPosition::new(3.0, -37.6))),
            -38
        );
    }

    #[test]
    fn movement_keys_map_wasd_and_vertical_arrows() {
        assert_eq!(move_key(&Key::Character("w".into())), Some(MoveKey::Up));
        assert_eq!(move_key(&Key::Character("A".into())), Some(MoveKey::Left));
        assert_eq!(move_key(&Key::Character("s".into())), Some(MoveKey::Down));
        assert_eq!(move_key(&Key::Character("d".into())), Some(MoveKey::Right));
        assert_eq!(move_key(&Key::Named(NamedKey::ArrowUp)), Some(MoveKey::Up));
        assert_eq!(move_key(&Key::Named(NamedKey::ArrowDown)), Some(MoveKey::Down));
        assert_eq!(move_key(&Key::Named(NamedKey::ArrowLeft)), None);
        assert_eq!(move_key(&Key::Character("o".into())), None);
    }
}
