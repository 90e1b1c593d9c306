use crate::keys::{HeldKeys, Key};

/// One frame's worth of intent, in the order it was sampled. Order matters:
/// the motion resolver applies tokens first to last, and the last one to
/// touch the rotation lock wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionToken {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

/// Tokens pending for the current frame. Filled by [`sample_into`], drained
/// by the motion resolver at the end of the frame.
#[derive(Debug, Default, Clone)]
pub struct InputQueue {
    tokens: Vec<DirectionToken>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: DirectionToken) {
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[DirectionToken] {
        &self.tokens
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Append one token per held direction. Either binding counts, both bindings
/// held still produce a single token.
pub fn sample_into(held: &HeldKeys, queue: &mut InputQueue) {
    if held.pressed(Key::KeyW) || held.pressed(Key::ArrowUp) {
        queue.push(DirectionToken::Forward);
    }
    if held.pressed(Key::KeyS) || held.pressed(Key::ArrowDown) {
        queue.push(DirectionToken::Backward);
    }
    if held.pressed(Key::KeyA) || held.pressed(Key::ArrowLeft) {
        queue.push(DirectionToken::TurnLeft);
    }
    if held.pressed(Key::KeyD) || held.pressed(Key::ArrowRight) {
        queue.push(DirectionToken::TurnRight);
    }
}
