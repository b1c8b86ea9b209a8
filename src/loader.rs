use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::DecodeError;
use crate::files::{self, Expanded};

pub type LoadResult<B> = Result<Loaded<B>, DecodeError>;

// ---------------------------------------------------------------------------
// Decoded image data (CPU side, blitted into the framebuffer)
// ---------------------------------------------------------------------------

pub struct DecodedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// A freshly created bitmap and its pixel dimensions.
#[derive(Debug)]
pub struct Loaded<B> {
    pub bitmap: B,
    pub width: u32,
    pub height: u32,
}

/// Turns files into bitmaps the renderer can draw.
pub trait BitmapLoader {
    type Bitmap;

    fn create_bitmap(&self, path: &Path) -> LoadResult<Self::Bitmap>;

    /// The files a list of command-line or dropped paths stands for.
    fn expand_paths(&self, paths: &[PathBuf], recursive: bool) -> Expanded {
        files::expand_paths(paths, recursive)
    }

    /// Load every path, one result per path in input order.
    fn create_bitmaps(&self, paths: &[PathBuf]) -> Vec<LoadResult<Self::Bitmap>> {
        paths.iter().map(|p| self.create_bitmap(p)).collect()
    }
}

/// Decodes with the `image` crate into RGBA8.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl BitmapLoader for ImageDecoder {
    type Bitmap = DecodedImage;

    fn create_bitmap(&self, path: &Path) -> LoadResult<DecodedImage> {
        let img = image::open(path).map_err(|source| DecodeError {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!("Loaded {} ({}x{})", path.display(), width, height);

        Ok(Loaded {
            bitmap: DecodedImage {
                rgba_bytes: rgba.into_raw(),
                width,
                height,
            },
            width,
            height,
        })
    }

    // Decode in parallel; `collect` keeps the input order.
    fn create_bitmaps(&self, paths: &[PathBuf]) -> Vec<LoadResult<DecodedImage>> {
        paths.par_iter().map(|p| self.create_bitmap(p)).collect()
    }
}
