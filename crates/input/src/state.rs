use crate::action::Intent;

/// Input folded from one tick's worth of window events.
///
/// Key flags are level-triggered and persist across ticks until released.
/// Pointer motion accumulates until [`InputState::end_tick`] clears it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Modifier: movement runs at the controller's fast multiplier.
    pub fast: bool,
    pub pointer_dx: f32,
    pub pointer_dy: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate relative pointer motion.
    pub fn add_pointer_motion(&mut self, dx: f32, dy: f32) {
        self.pointer_dx += dx;
        self.pointer_dy += dy;
    }

    /// Release every key and drop pending motion, e.g. when focus is lost.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop accumulated pointer motion. Key state is kept.
    pub fn end_tick(&mut self) {
        self.pointer_dx = 0.0;
        self.pointer_dy = 0.0;
    }

    /// Intents for this tick: movement first, then look.
    pub fn intents(&self) -> Vec<Intent> {
        let held = [
            (self.forward, Intent::MoveForward),
            (self.back, Intent::MoveBack),
            (self.left, Intent::StrafeLeft),
            (self.right, Intent::StrafeRight),
            (self.up, Intent::MoveUp),
            (self.down, Intent::MoveDown),
        ];
        let mut intents: Vec<Intent> = held
            .into_iter()
            .filter_map(|(on, intent)| on.then_some(intent))
            .collect();
        if self.pointer_dx != 0.0 {
            intents.push(Intent::LookDeltaX(self.pointer_dx));
        }
        if self.pointer_dy != 0.0 {
            intents.push(Intent::LookDeltaY(self.pointer_dy));
        }
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_input_has_no_intents() {
        assert!(InputState::new().intents().is_empty());
    }

    #[test]
    fn intents_in_fixed_order() {
        let mut input = InputState {
            down: true,
            forward: true,
            right: true,
            ..InputState::default()
        };
        input.add_pointer_motion(2.0, -1.0);
        assert_eq!(
            input.intents(),
            vec![
                Intent::MoveForward,
                Intent::StrafeRight,
                Intent::MoveDown,
                Intent::LookDeltaX(2.0),
                Intent::LookDeltaY(-1.0),
            ]
        );
    }

    #[test]
    fn pointer_motion_accumulates_until_end_of_tick() {
        let mut input = InputState::new();
        input.add_pointer_motion(1.0, 2.0);
        input.add_pointer_motion(3.0, -5.0);
        assert_eq!((input.pointer_dx, input.pointer_dy), (4.0, -3.0));

        input.forward = true;
        input.end_tick();
        assert_eq!((input.pointer_dx, input.pointer_dy), (0.0, 0.0));
        assert!(input.forward);
    }

    #[test]
    fn clear_releases_keys() {
        let mut input = InputState {
            fast: true,
            up: true,
            ..InputState::default()
        };
        input.clear();
        assert_eq!(input, InputState::default());
    }
}
