use std::collections::HashSet;

use super::types::{InputEvent, Key};

/// Input transitions between two snapshots.
///
/// `InputState` answers "is it held"; `InputFrame` answers "did it change
/// since the loop last looked".
#[derive(Debug, Default, Clone)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,

    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
