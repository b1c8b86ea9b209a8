use clap::Parser;
use std::path::PathBuf;

use crate::view::DEFAULT_ZOOM_DIVISOR;

pub const HELP_KEYS: &str = "\
Controls:
  Drag (left)       : Pan
  Wheel             : Zoom around the cursor
  W / A / S / D     : Pan (also Up / Down)
  Left / Right      : Previous / next image
  O                 : Open files
  Delete            : Close current image
  Esc               : Quit
  Drop files        : Open them
";

#[derive(Parser, Debug)]
#[command(name = "dafi", about = "A pan-and-zoom image viewer", after_help = HELP_KEYS)]
pub struct Cli {
    /// Images or directories to open
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories of directory arguments and drops
    #[arg(short, long)]
    pub recursive: bool,

    /// Target frame rate
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub fps: u32,

    /// Keyboard pan speed in screen pixels per second
    #[arg(long, default_value = "400", value_parser = parse_non_negative)]
    pub pan_speed: f32,

    /// Wheel units per e-fold of zoom (larger = slower zoom)
    #[arg(long, default_value_t = DEFAULT_ZOOM_DIVISOR, value_parser = parse_positive)]
    pub zoom_divisor: f32,

    /// Initial window width
    #[arg(long, default_value = "500")]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value = "500")]
    pub height: u32,
}

fn parse_finite(s: &str) -> Result<f32, String> {
    let v: f32 = s.trim().parse().map_err(|e| format!("{}", e))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("must be a finite number, got {}", v))
    }
}

fn parse_positive(s: &str) -> Result<f32, String> {
    let v = parse_finite(s)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(format!("must be a positive number, got {}", v))
    }
}

/// Zero is allowed: it turns keyboard panning off.
fn parse_non_negative(s: &str) -> Result<f32, String> {
    let v = parse_finite(s)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(format!("must not be negative, got {}", v))
    }
}

/// Runtime settings shared by the controller and the frame driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub recursive: bool,
    pub fps: u32,
    pub pan_speed: f32,
    pub zoom_divisor: f32,
    pub window_size: (u32, u32),
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            fps: 60,
            pan_speed: 400.0,
            zoom_divisor: DEFAULT_ZOOM_DIVISOR,
            window_size: (500, 500),
        }
    }
}

impl Cli {
    pub fn config(&self) -> ViewerConfig {
        ViewerConfig {
            recursive: self.recursive,
            fps: self.fps,
            pan_speed: self.pan_speed,
            zoom_divisor: self.zoom_divisor,
            window_size: (self.width.max(1), self.height.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let cli = Cli::try_parse_from(["dafi"]).unwrap();
        assert!(cli.paths.is_empty());
        assert_eq!(cli.config(), ViewerConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "dafi", "-r", "--fps", "30", "--pan-speed", "250", "--zoom-divisor", "240",
            "--width", "800", "--height", "0", "a.png", "dir",
        ])
        .unwrap();
        let config = cli.config();
        assert!(config.recursive);
        assert_eq!(config.fps, 30);
        assert_eq!(config.pan_speed, 250.0);
        assert_eq!(config.zoom_divisor, 240.0);
        assert_eq!(config.window_size, (800, 1));
        assert_eq!(cli.paths, vec![PathBuf::from("a.png"), PathBuf::from("dir")]);
    }

    #[test]
    fn rejects_bad_tuning() {
        assert!(Cli::try_parse_from(["dafi", "--fps", "0"]).is_err());
        assert!(Cli::try_parse_from(["dafi", "--zoom-divisor", "0"]).is_err());
        assert!(Cli::try_parse_from(["dafi", "--zoom-divisor", "-3"]).is_err());
        assert!(Cli::try_parse_from(["dafi", "--zoom-divisor", "inf"]).is_err());
    }

    #[test]
    fn pan_speed_must_be_finite() {
        for bad in ["NaN", "inf", "-inf", "-5"] {
            assert!(
                Cli::try_parse_from(["dafi", "--pan-speed", bad]).is_err(),
                "accepted --pan-speed {}",
                bad
            );
        }
        let cli = Cli::try_parse_from(["dafi", "--pan-speed", "0"]).unwrap();
        assert_eq!(cli.config().pan_speed, 0.0);
    }
}
