use bevy_ecs::prelude::*;

use crate::time_resource::TimeResource;

/// Key buttons the player controller reacts to.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct KeyButtons {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl KeyButtons {
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// One held input, active from `start` (inclusive) to `end` (exclusive) tick.
#[derive(Copy, Clone, Debug)]
struct ScriptStep {
    start: u64,
    end: u64,
    keys: KeyButtons,
}

/// Replays a fixed sequence of key presses, standing in for a keyboard in
/// the headless demo.
#[derive(Resource, Clone, Debug, Default)]
pub struct InputState {
    pub keys: KeyButtons,
    script: Vec<ScriptStep>,
}

impl InputState {
    pub fn hold(mut self, start: u64, end: u64, keys: KeyButtons) -> Self {
        self.script.push(ScriptStep { start, end, keys });
        self
    }

    /// Updates `keys` for the given tick. Overlapping steps combine.
    pub fn update(&mut self, tick: u64) {
        let mut keys = KeyButtons::default();
        for step in self.script.iter().filter(|s| (s.start..s.end).contains(&tick)) {
            keys.left |= step.keys.left;
            keys.right |= step.keys.right;
            keys.jump |= step.keys.jump;
        }
        self.keys = keys;
    }
}

/// Updates the shared input state for the current tick.
pub fn update_input_state(time: Res<TimeResource>, mut input_state: ResMut<InputState>) {
    input_state.update(time.tick_count());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_steps_combine() {
        let right = KeyButtons { right: true, ..Default::default() };
        let jump = KeyButtons { jump: true, ..Default::default() };
        let mut input = InputState::default().hold(0, 10, right).hold(5, 6, jump);

        input.update(5);
        assert_eq!(input.keys, KeyButtons { right: true, jump: true, left: false });
        assert_eq!(input.keys.horizontal(), 1.0);

        input.update(6);
        assert!(!input.keys.jump);

        input.update(10);
        assert_eq!(input.keys, KeyButtons::default());
        assert_eq!(input.keys.horizontal(), 0.0);
    }
}
