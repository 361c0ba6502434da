use crate::core::{InputHandler, InputSource};

use super::frame::InputFrame;
use super::state::InputState;
use super::types::Key;

/// Keyboard snapshot refreshed once per loop iteration.
///
/// Between two `update` calls the snapshot does not change, no matter how
/// many platform events arrive in the meantime.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    state: InputState,
    frame: InputFrame,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held at the time of the last update.
    pub fn key_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    /// Went down since the previous update.
    pub fn pressed(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    /// Went up since the previous update.
    pub fn released(&self, key: Key) -> bool {
        self.frame.keys_released.contains(&key)
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn frame(&self) -> &InputFrame {
        &self.frame
    }
}

impl<W: InputSource> InputHandler<W> for KeyboardInput {
    fn update(&mut self, windows: &mut W, window: &W::Handle) {
        self.frame.clear();
        windows.sample_input(window, &mut self.state, &mut self.frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FakeWindows;
    use crate::core::WindowSystem;
    use crate::input::KeyState;

    #[test]
    fn snapshot_only_changes_at_update() {
        let mut windows = FakeWindows::closing_after(usize::MAX)
            .queue_keys(&[(Key::W, KeyState::Pressed)])
            .queue_keys(&[(Key::W, KeyState::Released)]);
        let mut input = KeyboardInput::new();
        let mut held = Vec::new();
        let mut released = false;

        for _ in 0..3 {
            input.update(&mut windows, &0);
            let snapshot = input.key_down(Key::W);
            held.push(snapshot);
            released |= input.released(Key::W);

            // Polling alone must not touch the snapshot.
            windows.poll_events();
            assert_eq!(input.key_down(Key::W), snapshot);
        }

        assert_eq!(held, vec![false, true, false]);
        assert!(released);
    }

    #[test]
    fn transitions_last_one_update() {
        let mut windows = FakeWindows::closing_after(usize::MAX)
            .queue_keys(&[(Key::Space, KeyState::Pressed)]);
        let mut input = KeyboardInput::new();

        windows.poll_events();
        input.update(&mut windows, &0);
        assert!(input.pressed(Key::Space));
        assert_eq!(input.frame().events.len(), 1);

        windows.poll_events();
        input.update(&mut windows, &0);
        assert!(!input.pressed(Key::Space));
        assert!(input.key_down(Key::Space));
        assert!(input.frame().events.is_empty());
    }
}
