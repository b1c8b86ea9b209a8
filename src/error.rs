use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// A single file that could not be turned into a bitmap.
#[derive(Error, Debug)]
#[error("Unable to open image: {}: {source}", .path.display())]
pub struct DecodeError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// A directory whose contents could not be listed.
#[derive(Error, Debug)]
#[error("Cannot read directory {}: {source}", .dir.display())]
pub struct ScanError {
    pub dir: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Memory error: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Surface error: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
