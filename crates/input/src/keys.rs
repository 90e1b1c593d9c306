use std::collections::BTreeSet;

/// The eight keys the demo binds. Everything else is ignored at the window
/// layer and never reaches this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Currently-held bound keys, fed by window press/release events.
#[derive(Debug, Default, Clone)]
pub struct HeldKeys {
    held: BTreeSet<Key>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            tracing::trace!(?key, "key down");
        }
    }

    pub fn release(&mut self, key: Key) {
        if self.held.remove(&key) {
            tracing::trace!(?key, "key up");
        }
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_roundtrip() {
        let mut held = HeldKeys::new();
        assert!(!held.pressed(Key::KeyW));
        held.press(Key::KeyW);
        assert!(held.pressed(Key::KeyW));
        held.release(Key::KeyW);
        assert!(!held.pressed(Key::KeyW));
        assert!(held.is_empty());
    }

    #[test]
    fn repeat_presses_are_idempotent() {
        let mut held = HeldKeys::new();
        held.press(Key::ArrowLeft);
        held.press(Key::ArrowLeft);
        held.release(Key::ArrowLeft);
        assert!(!held.pressed(Key::ArrowLeft));
    }

    #[test]
    fn clear_drops_everything() {
        let mut held = HeldKeys::new();
        held.press(Key::KeyW);
        held.press(Key::ArrowRight);
        held.clear();
        assert!(held.is_empty());
    }
}
