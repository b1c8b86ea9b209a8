use std::path::PathBuf;

use crate::batch::BatchSelection;
use crate::cli::ViewerConfig;
use crate::collection::{CycleDirection, ImageCollection};
use crate::input::{InputState, MoveKey};
use crate::loader::BitmapLoader;
use crate::report::Reporter;
use crate::view::{screen_anchor, zoom_factor};

// ---------------------------------------------------------------------------
// The single interactive viewport
// ---------------------------------------------------------------------------

const OPEN_FAILED: &str = "Failed to open image.";
const DECODE_FAILED: &str = "Unable to open image.";

/// What the renderer needs to draw the current image: draw it at
/// `(draw_x, draw_y)` under a `(zoom, zoom)` scale about the origin.
#[derive(Debug)]
pub struct FrameState<'a, B> {
    pub bitmap: &'a B,
    pub draw_x: f32,
    pub draw_y: f32,
    pub zoom: f32,
}

/// Where newly loaded images leave the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    /// Each new image becomes current as it arrives.
    Newest,
    /// Only select if nothing is selected yet.
    KeepCurrent,
}

pub struct ViewportController<L: BitmapLoader, R: Reporter> {
    images: ImageCollection<L::Bitmap>,
    input: InputState,
    loader: L,
    reporter: R,
    config: ViewerConfig,
    viewport: (f32, f32),
}

impl<L: BitmapLoader, R: Reporter> ViewportController<L, R> {
    pub fn new(loader: L, reporter: R, config: ViewerConfig) -> Self {
        let viewport = (config.window_size.0 as f32, config.window_size.1 as f32);
        Self {
            images: ImageCollection::new(),
            input: InputState::new(),
            loader,
            reporter,
            config,
            viewport,
        }
    }

    pub fn images(&self) -> &ImageCollection<L::Bitmap> {
        &self.images
    }

    #[cfg(test)]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    // -----------------------------------------------------------------------
    // Event side
    // -----------------------------------------------------------------------

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.input.pointer_down(x, y);
    }

    pub fn on_pointer_up(&mut self, x: f32, y: f32) {
        self.input.pointer_up(x, y);
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer_move(x, y);
    }

    pub fn on_wheel(&mut self, delta: i32) {
        self.input.wheel(delta);
    }

    pub fn on_key(&mut self, key: MoveKey, down: bool) {
        self.input.set_key(key, down);
    }

    pub fn on_cycle(&mut self, direction: CycleDirection) {
        self.input.request_cycle(direction);
    }

    /// Drop the current image and its bitmap.
    pub fn close_current(&mut self) {
        if let Some(idx) = self.images.current_index() {
            self.images.remove(idx);
            log::info!("Closed image {} ({} left)", idx, self.images.len());
        }
    }

    /// Command-line paths. The first image that loads stays current.
    pub fn load_initial(&mut self, paths: &[PathBuf]) -> usize {
        let paths = self.expand(paths);
        self.load_batch(&paths, Focus::KeepCurrent)
    }

    pub fn on_files_dropped(&mut self, paths: Vec<PathBuf>) -> usize {
        let paths = self.expand(&paths);
        self.load_batch(&paths, Focus::Newest)
    }

    /// Directories become their image files; listing failures are reported.
    fn expand(&mut self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let expanded = self.loader.expand_paths(paths, self.config.recursive);
        for e in &expanded.errors {
            self.reporter.warn(OPEN_FAILED, &e.to_string());
        }
        expanded.paths
    }

    /// Load the selection encoded in a native open-dialog result buffer.
    pub fn on_open_dialog_result(&mut self, buffer: &[u16], name_offset: usize) -> usize {
        match BatchSelection::parse(buffer, name_offset) {
            Ok(selection) => {
                log::debug!(
                    "[open] {} name(s), directory {:?}",
                    selection.names().len(),
                    selection.directory()
                );
                if selection.is_empty() {
                    return 0;
                }
                let paths: Vec<PathBuf> = selection.into_paths().collect();
                self.load_batch(&paths, Focus::Newest)
            }
            Err(e) => {
                self.reporter.warn(OPEN_FAILED, &e.to_string());
                0
            }
        }
    }

    /// Each path is loaded on its own: a failure is reported and the rest
    /// of the batch still loads. Returns the number of images added.
    fn load_batch(&mut self, paths: &[PathBuf], focus: Focus) -> usize {
        if paths.is_empty() {
            return 0;
        }
        let mut added = 0;
        for result in self.loader.create_bitmaps(paths) {
            match result {
                Ok(loaded) => {
                    match focus {
                        Focus::Newest => self.images.append(loaded.bitmap, loaded.width, loaded.height),
                        Focus::KeepCurrent => {
                            self.images.push_back(loaded.bitmap, loaded.width, loaded.height)
                        }
                    };
                    added += 1;
                }
                Err(e) => self.reporter.warn(DECODE_FAILED, &e.to_string()),
            }
        }
        log::info!(
            "Opened {}/{} images ({} total)",
            added,
            paths.len(),
            self.images.len()
        );
        added
    }

    // -----------------------------------------------------------------------
    // Tick side
    // -----------------------------------------------------------------------

    /// Apply everything accumulated since the last tick. `elapsed` is in seconds.
    pub fn on_tick(&mut self, elapsed: f32) {
        let wheel = self.input.take_wheel();
        let drag = self.input.take_drag_delta();

        if let Some(entry) = self.images.current_mut() {
            let anchor = screen_anchor(self.viewport, entry.size());
            let transform = &mut entry.transform;

            transform.zoom_by(
                zoom_factor(wheel, self.config.zoom_divisor),
                self.input.pointer(),
                anchor,
            );

            if let Some((dx, dy)) = drag {
                transform.pan_by(dx, dy);
            }

            let step = self.config.pan_speed * elapsed;
            for key in self.input.keys_down() {
                let (ux, uy) = key.pan_direction();
                transform.pan_by(ux * step, uy * step);
            }
        }

        for direction in self.input.take_cycles() {
            self.images.cycle(direction);
        }
    }

    /// Draw parameters for the current image, if any.
    pub fn current_frame_state(&self) -> Option<FrameState<'_, L::Bitmap>> {
        let entry = self.images.current()?;
        let anchor = screen_anchor(self.viewport, entry.size());
        let (draw_x, draw_y) = entry.transform.draw_origin(anchor);
        Some(FrameState {
            bitmap: entry.bitmap(),
            draw_x,
            draw_y,
            zoom: entry.transform.zoom(),
        })
    }
}
