/// A discrete camera intent produced from one tick of input.
///
/// The controller consumes intents, never raw input events, so any frontend
/// (window, CLI script, test) drives the camera the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Move along the view direction.
    MoveForward,
    /// Move against the view direction.
    MoveBack,
    /// Move against the camera's right vector.
    StrafeLeft,
    /// Move along the camera's right vector.
    StrafeRight,
    /// Move along world +Y.
    MoveUp,
    /// Move along world -Y.
    MoveDown,
    /// Horizontal pointer motion; turns yaw.
    LookDeltaX(f32),
    /// Vertical pointer motion; tilts pitch (positive looks down).
    LookDeltaY(f32),
}

impl Intent {
    pub fn is_look(&self) -> bool {
        matches!(self, Self::LookDeltaX(_) | Self::LookDeltaY(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_intents_carry_deltas() {
        let a = Intent::LookDeltaX(3.0);
        assert!(matches!(a, Intent::LookDeltaX(dx) if dx == 3.0));
        assert!(a.is_look());
        assert!(Intent::LookDeltaY(-1.0).is_look());
    }

    #[test]
    fn movement_intents_are_not_look() {
        for intent in [
            Intent::MoveForward,
            Intent::MoveBack,
            Intent::StrafeLeft,
            Intent::StrafeRight,
            Intent::MoveUp,
            Intent::MoveDown,
        ] {
            assert!(!intent.is_look());
        }
    }
}
