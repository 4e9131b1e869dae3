/// Actions that stay active while their key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Quit,
}

const ACTION_COUNT: usize = 5;

/// Keys that fire once per press; holding them never retriggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    Jump,
    Dash,
    ToggleGrid,
    AutoTile,
    Save,
}

pub(crate) const EDGE_KEY_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Quit => 4,
        }
    }
}

impl EdgeKey {
    pub(crate) const fn index(self) -> usize {
        match self {
            EdgeKey::Jump => 0,
            EdgeKey::Dash => 1,
            EdgeKey::ToggleGrid => 2,
            EdgeKey::AutoTile => 3,
            EdgeKey::Save => 4,
        }
    }
}

/// Input state handed to a session for one simulation tick. Cursor positions
/// are in display-buffer pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    pressed: [bool; EDGE_KEY_COUNT],
    cursor_position_px: Option<(i32, i32)>,
    left_mouse_down: bool,
    left_click_pressed: bool,
    right_mouse_down: bool,
    right_click_pressed: bool,
    scroll_steps: i32,
    shift_down: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn pressed(&self, key: EdgeKey) -> bool {
        self.pressed[key.index()]
    }

    pub fn cursor_position_px(&self) -> Option<(i32, i32)> {
        self.cursor_position_px
    }

    pub fn left_mouse_down(&self) -> bool {
        self.left_mouse_down
    }

    pub fn left_click_pressed(&self) -> bool {
        self.left_click_pressed
    }

    pub fn right_mouse_down(&self) -> bool {
        self.right_mouse_down
    }

    pub fn right_click_pressed(&self) -> bool {
        self.right_click_pressed
    }

    /// Wheel steps since the previous tick; positive is wheel up.
    pub fn scroll_steps(&self) -> i32 {
        self.scroll_steps
    }

    pub fn shift_down(&self) -> bool {
        self.shift_down
    }

    pub fn with_quit_requested(mut self) -> Self {
        self.quit_requested = true;
        self
    }

    pub fn with_action(mut self, action: InputAction) -> Self {
        self.actions.set(action, true);
        self
    }

    pub fn with_pressed(mut self, key: EdgeKey) -> Self {
        self.pressed[key.index()] = true;
        self
    }

    pub fn with_cursor(mut self, x: i32, y: i32) -> Self {
        self.cursor_position_px = Some((x, y));
        self
    }

    pub fn with_left_mouse(mut self, down: bool, pressed: bool) -> Self {
        self.left_mouse_down = down;
        self.left_click_pressed = pressed;
        self
    }

    pub fn with_right_mouse(mut self, down: bool, pressed: bool) -> Self {
        self.right_mouse_down = down;
        self.right_click_pressed = pressed;
        self
    }

    pub fn with_scroll(mut self, steps: i32) -> Self {
        self.scroll_steps = steps;
        self
    }

    pub fn with_shift(mut self, down: bool) -> Self {
        self.shift_down = down;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_idle() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.quit_requested());
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.pressed(EdgeKey::Save));
        assert_eq!(snapshot.cursor_position_px(), None);
        assert_eq!(snapshot.scroll_steps(), 0);
    }

    #[test]
    fn builders_set_only_their_field() {
        let snapshot = InputSnapshot::empty()
            .with_action(InputAction::MoveRight)
            .with_pressed(EdgeKey::AutoTile)
            .with_left_mouse(true, false);

        assert!(snapshot.is_down(InputAction::MoveRight));
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(snapshot.pressed(EdgeKey::AutoTile));
        assert!(!snapshot.pressed(EdgeKey::ToggleGrid));
        assert!(snapshot.left_mouse_down());
        assert!(!snapshot.left_click_pressed());
    }
}
