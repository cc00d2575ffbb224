use crate::geometry::{Vec2, VEC2_ZERO};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Attack,
    Quit,
}

const ACTION_COUNT: usize = 6;

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
            InputAction::Attack => 4,
            InputAction::Quit => 5,
        }
    }
}

/// Immutable per-tick view of the UI collaborator's input state: held
/// movement actions, an attack edge, and a quit request.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    attack_pressed: bool,
    quit_requested: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_attack_pressed(mut self, attack_pressed: bool) -> Self {
        self.attack_pressed = attack_pressed;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn attack_pressed(&self) -> bool {
        self.attack_pressed
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Unit direction derived from the held movement actions; zero when idle
    /// or when opposing actions cancel out.
    pub fn movement_direction(&self) -> Vec2 {
        let mut direction = VEC2_ZERO;
        if self.is_down(InputAction::MoveRight) {
            direction.x += 1.0;
        }
        if self.is_down(InputAction::MoveLeft) {
            direction.x -= 1.0;
        }
        if self.is_down(InputAction::MoveDown) {
            direction.y += 1.0;
        }
        if self.is_down(InputAction::MoveUp) {
            direction.y -= 1.0;
        }
        direction.normalized()
    }
}
