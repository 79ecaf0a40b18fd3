//! Keyboard state
//!
//! Maps `KeyboardEvent.code` strings to held directions and one-shot
//! shortcuts. The simulation only ever sees the derived `horizontal()` intent.

/// Held movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Hold(Direction),
    /// Start, restart or continue depending on the current screen
    Confirm,
    ToggleMute,
}

pub fn action_for(code: &str) -> Option<KeyAction> {
    let action = match code {
        "ArrowLeft" | "KeyA" => KeyAction::Hold(Direction::Left),
        "ArrowRight" | "KeyD" => KeyAction::Hold(Direction::Right),
        "ArrowUp" | "KeyW" => KeyAction::Hold(Direction::Up),
        "ArrowDown" | "KeyS" => KeyAction::Hold(Direction::Down),
        "Space" => KeyAction::Confirm,
        "KeyM" => KeyAction::ToggleMute,
        _ => return None,
    };
    Some(action)
}

/// Currently held directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl KeyState {
    fn slot(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        *self.slot(direction) = held;
    }

    /// Apply a keydown/keyup; returns true if the key is a movement key
    /// (the caller should then suppress the browser default)
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        match action_for(code) {
            Some(KeyAction::Hold(direction)) => {
                self.set(direction, pressed);
                true
            }
            _ => false,
        }
    }

    pub fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Release everything (window lost focus)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// -1 left, 1 right, 0 for neither or both
    pub fn horizontal(&self) -> i8 {
        self.right as i8 - self.left as i8
    }

    /// -1 up, 1 down
    pub fn vertical(&self) -> i8 {
        self.down as i8 - self.up as i8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_intent() {
        let mut keys = KeyState::default();
        assert_eq!(keys.horizontal(), 0);
        assert!(keys.handle_key("ArrowLeft", true));
        assert_eq!(keys.horizontal(), -1);
        keys.handle_key("KeyD", true);
        assert_eq!(keys.horizontal(), 0);
        keys.handle_key("ArrowLeft", false);
        assert_eq!(keys.horizontal(), 1);
    }

    #[test]
    fn test_reset_releases_all() {
        let mut keys = KeyState::default();
        keys.handle_key("KeyA", true);
        keys.handle_key("KeyW", true);
        keys.reset();
        assert_eq!(keys, KeyState::default());
        assert_eq!(keys.vertical(), 0);
    }

    #[test]
    fn test_shortcuts_are_not_held() {
        let mut keys = KeyState::default();
        assert!(!keys.handle_key("Space", true));
        assert!(!keys.handle_key("KeyQ", true));
        assert_eq!(action_for("KeyM"), Some(KeyAction::ToggleMute));
        assert_eq!(action_for("Space"), Some(KeyAction::Confirm));
        assert_eq!(keys, KeyState::default());
    }
}
