use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScanError;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tga", "tiff", "tif", "webp", "ico", "pnm", "pbm",
    "pgm", "ppm", "pam", "dds", "hdr", "exr", "ff", "qoi",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Files to load, plus the directories that could not be (fully) listed.
#[derive(Debug, Default)]
pub struct Expanded {
    pub paths: Vec<PathBuf>,
    pub errors: Vec<ScanError>,
}

/// Replace directories with the image files inside them (sorted per directory).
/// Anything else is passed through untouched so that load failures get reported.
pub fn expand_paths(paths: &[PathBuf], recursive: bool) -> Expanded {
    let mut out = Expanded {
        paths: Vec::with_capacity(paths.len()),
        errors: Vec::new(),
    };
    for path in paths {
        if path.is_dir() {
            scan_dir(path, recursive, &mut out);
        } else {
            out.paths.push(path.clone());
        }
    }
    out
}

fn scan_dir(dir: &Path, recursive: bool, dest: &mut Expanded) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            dest.errors.push(ScanError {
                dir: dir.to_path_buf(),
                source,
            });
            return;
        }
    };
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries {
        let p = match entry {
            Ok(entry) => entry.path(),
            Err(source) => {
                dest.errors.push(ScanError {
                    dir: dir.to_path_buf(),
                    source,
                });
                continue;
            }
        };
        if p.is_file() && is_image_file(&p) {
            files.push(p);
        } else if recursive && p.is_dir() {
            subdirs.push(p);
        }
    }

    files.sort();
    log::info!("Scanning {:?}... ({} images)", dir, files.len());
    dest.paths.extend(files);

    if recursive {
        subdirs.sort();
        for sub in subdirs {
            scan_dir(&sub, true, dest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn recognises_extensions_case_insensitively() {
        assert!(is_image_file(Path::new("a/b.PNG")));
        assert!(is_image_file(Path::new("photo.jpeg")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn directories_expand_sorted_and_files_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("readme.txt"));
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub").join("c.gif"));

        let explicit = dir.path().join("readme.txt");
        let flat = expand_paths(&[dir.path().to_path_buf(), explicit.clone()], false);
        assert!(flat.errors.is_empty());
        assert_eq!(
            flat.paths,
            vec![dir.path().join("a.jpg"), dir.path().join("b.png"), explicit]
        );

        let deep = expand_paths(&[dir.path().to_path_buf()], true);
        assert_eq!(
            deep.paths,
            vec![
                dir.path().join("a.jpg"),
                dir.path().join("b.png"),
                dir.path().join("sub").join("c.gif"),
            ]
        );
    }

    #[test]
    fn missing_paths_are_kept() {
        let missing = PathBuf::from("/definitely/not/here.png");
        let expanded = expand_paths(&[missing.clone()], true);
        assert_eq!(expanded.paths, vec![missing]);
        assert!(expanded.errors.is_empty());
    }

    #[test]
    fn unreadable_directory_is_collected() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("plain.png");
        touch(&not_a_dir);

        let mut out = Expanded::default();
        scan_dir(&not_a_dir, false, &mut out);
        assert!(out.paths.is_empty());
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].dir, not_a_dir);
        assert!(out.errors[0].to_string().contains("plain.png"));
    }
}
