use crate::view::ViewTransform;

// ---------------------------------------------------------------------------
// Loaded images and the current selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Prev,
    Next,
}

/// One loaded image. Owns its bitmap; dropping the entry releases it.
#[derive(Debug)]
pub struct ImageEntry<B> {
    bitmap: B,
    width: u32,
    height: u32,
    pub transform: ViewTransform,
}

impl<B> ImageEntry<B> {
    pub fn bitmap(&self) -> &B {
        &self.bitmap
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Images in load order. `current` is `Some` exactly when `entries` is non-empty.
#[derive(Debug)]
pub struct ImageCollection<B> {
    entries: Vec<ImageEntry<B>>,
    current: Option<usize>,
}

impl<B> Default for ImageCollection<B> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            current: None,
        }
    }
}

impl<B> ImageCollection<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&ImageEntry<B>> {
        self.current.and_then(|i| self.entries.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut ImageEntry<B>> {
        self.current.and_then(|i| self.entries.get_mut(i))
    }

    /// Add an image with an identity transform and make it current.
    pub fn append(&mut self, bitmap: B, width: u32, height: u32) -> usize {
        let idx = self.push(bitmap, width, height);
        self.current = Some(idx);
        idx
    }

    /// Add an image without moving the selection, unless nothing was selected.
    pub fn push_back(&mut self, bitmap: B, width: u32, height: u32) -> usize {
        let idx = self.push(bitmap, width, height);
        self.current.get_or_insert(idx);
        idx
    }

    fn push(&mut self, bitmap: B, width: u32, height: u32) -> usize {
        self.entries.push(ImageEntry {
            bitmap,
            width,
            height,
            transform: ViewTransform::default(),
        });
        self.entries.len() - 1
    }

    /// Move the selection one step, wrapping at both ends. No-op when empty.
    pub fn cycle(&mut self, direction: CycleDirection) {
        let len = self.entries.len();
        let Some(cur) = self.current else { return };
        let next = match direction {
            CycleDirection::Prev => (cur + len - 1) % len,
            CycleDirection::Next => (cur + 1) % len,
        };
        log::debug!("[nav] {:?}: {} -> {} of {}", direction, cur, next, len);
        self.current = Some(next);
    }

    /// Remove an entry, handing it (and its bitmap) back to the caller.
    /// The selection stays on the same image if it survives; otherwise the
    /// image that slid into the removed slot (or the new last one) becomes current.
    pub fn remove(&mut self, idx: usize) -> Option<ImageEntry<B>> {
        if idx >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(idx);
        self.current = match self.current {
            _ if self.entries.is_empty() => None,
            Some(cur) if cur > idx => Some(cur - 1),
            Some(cur) => Some(cur.min(self.entries.len() - 1)),
            None => Some(0),
        };
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> ImageCollection<usize> {
        let mut c = ImageCollection::new();
        for i in 0..n {
            c.append(i, 10, 10);
        }
        c
    }

    #[test]
    fn append_selects_new_entry() {
        let mut c = ImageCollection::new();
        assert_eq!(c.current_index(), None);
        assert!(c.current().is_none());

        assert_eq!(c.append("a", 4, 3), 0);
        assert_eq!(c.append("b", 8, 6), 1);
        assert_eq!(c.current_index(), Some(1));

        let cur = c.current().unwrap();
        assert_eq!(*cur.bitmap(), "b");
        assert_eq!(cur.size(), (8, 6));
        assert_eq!(cur.transform, ViewTransform::default());
    }

    #[test]
    fn push_back_keeps_first_selection() {
        let mut c = ImageCollection::new();
        c.push_back('x', 1, 1);
        c.push_back('y', 1, 1);
        c.push_back('z', 1, 1);
        assert_eq!(c.len(), 3);
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn cycle_wraps_both_directions() {
        let mut c = filled(4);
        c.cycle(CycleDirection::Next);
        assert_eq!(c.current_index(), Some(0));
        for _ in 0..4 {
            c.cycle(CycleDirection::Next);
        }
        assert_eq!(c.current_index(), Some(0));
        c.cycle(CycleDirection::Prev);
        assert_eq!(c.current_index(), Some(3));
        c.cycle(CycleDirection::Prev);
        assert_eq!(c.current_index(), Some(2));
    }

    #[test]
    fn cycle_single_entry_stays() {
        let mut c = filled(1);
        c.cycle(CycleDirection::Prev);
        assert_eq!(c.current_index(), Some(0));
        c.cycle(CycleDirection::Next);
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn empty_cycle_is_noop() {
        let mut c: ImageCollection<()> = ImageCollection::new();
        c.cycle(CycleDirection::Next);
        c.cycle(CycleDirection::Prev);
        assert!(c.is_empty());
        assert_eq!(c.current_index(), None);
        assert!(c.current_mut().is_none());
    }

    #[test]
    fn transforms_are_independent() {
        let mut c = filled(2);
        c.current_mut().unwrap().transform.pan_by(10.0, 0.0);
        c.cycle(CycleDirection::Prev);
        assert_eq!(c.current().unwrap().transform, ViewTransform::default());
        c.cycle(CycleDirection::Next);
        assert_eq!(c.current().unwrap().transform.offset_x, 10.0);
    }

    #[test]
    fn remove_revalidates_selection() {
        let mut c = filled(4);
        c.cycle(CycleDirection::Prev); // 2
        assert_eq!(*c.remove(0).unwrap().bitmap(), 0);
        assert_eq!(*c.current().unwrap().bitmap(), 2);

        // removing the current entry moves to its successor
        c.remove(1);
        assert_eq!(*c.current().unwrap().bitmap(), 3);

        // removing the last entry clamps
        c.remove(1);
        assert_eq!(*c.current().unwrap().bitmap(), 1);

        assert!(c.remove(5).is_none());
        c.remove(0);
        assert!(c.is_empty());
        assert_eq!(c.current_index(), None);
    }
}
