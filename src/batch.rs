use std::path::PathBuf;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Native open-dialog result buffer
// ---------------------------------------------------------------------------
//
// Single selection:  "C:\dir\a.png\0"                 name_offset = 7
// Multi selection:   "C:\dir\0a.png\0b.png\0\0"       name_offset = 7
//
// The two are told apart by whether a terminator shows up before
// `name_offset`. A "multi" buffer with no names after the directory is a
// single path whose offset overshot its terminator.

const TERMINATOR: u16 = 0;

/// A decoded file selection: an optional shared directory plus file names.
/// With no directory each name is already a full path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSelection {
    directory: Option<String>,
    names: Vec<String>,
}

impl BatchSelection {
    /// Decode a UTF-16 result buffer whose first file name starts at `name_offset`.
    pub fn parse(buffer: &[u16], name_offset: usize) -> Result<Self> {
        let scan_end = name_offset.min(buffer.len());
        let mut directory: Vec<u16> = Vec::new();
        directory.try_reserve_exact(scan_end)?;

        let mut multi_select = false;
        for &unit in &buffer[..scan_end] {
            if unit == TERMINATOR {
                multi_select = true;
                break;
            }
            directory.push(unit);
        }

        if !multi_select {
            return Ok(Self::single(until_terminator(buffer)));
        }

        let mut names = Vec::new();
        let mut rest = buffer.get(name_offset..).unwrap_or(&[]);
        loop {
            let name = until_terminator(rest);
            if name.is_empty() {
                break;
            }
            names.push(String::from_utf16_lossy(name));
            rest = rest.get(name.len() + 1..).unwrap_or(&[]);
        }

        if names.is_empty() {
            return Ok(Self::single(&directory));
        }
        Ok(Self {
            directory: Some(String::from_utf16_lossy(&directory)),
            names,
        })
    }

    fn single(path: &[u16]) -> Self {
        let names = if path.is_empty() {
            Vec::new()
        } else {
            vec![String::from_utf16_lossy(path)]
        };
        Self {
            directory: None,
            names,
        }
    }

    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Full paths in selection order.
    pub fn into_paths(self) -> impl Iterator<Item = PathBuf> {
        let directory = self.directory;
        self.names.into_iter().map(move |name| match &directory {
            Some(dir) => PathBuf::from(join(dir, &name)),
            None => PathBuf::from(name),
        })
    }
}

fn until_terminator(units: &[u16]) -> &[u16] {
    let end = units
        .iter()
        .position(|&u| u == TERMINATOR)
        .unwrap_or(units.len());
    &units[..end]
}

fn join(dir: &str, name: &str) -> String {
    if dir.ends_with(['\\', '/']) {
        format!("{}{}", dir, name)
    } else {
        format!("{}{}{}", dir, std::path::MAIN_SEPARATOR, name)
    }
}
