//! Input system with action-based mapping
//!
//! Raw window events are folded into an [`InputState`]. Systems receive a
//! snapshot of that state once per frame and compare it against the
//! snapshot they kept from the previous frame to detect key presses.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Strafe left (A by default)
    MoveLeft,
    /// Strafe right (D by default)
    MoveRight,
    /// Step zoom in (E by default)
    ZoomIn,
    /// Step zoom out (Q by default)
    ZoomOut,
    /// Mouse free-look while held (middle mouse button by default)
    FreeLook,
    /// Pause/unpause (Escape by default)
    Pause,
}

/// Input state for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Cursor position in window pixels (y grows downward)
    pub mouse_position: Vec2,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action went down between `previous` and this state
    pub fn pressed_since(&self, previous: &InputState, action: InputAction) -> bool {
        self.is_held(action) && !previous.is_held(action)
    }

    /// Cursor movement between `previous` and this state
    pub fn mouse_delta_since(&self, previous: &InputState) -> Vec2 {
        self.mouse_position - previous.mouse_position
    }

    /// Release every held action
    pub fn clear_all(&mut self) {
        self.held.clear();
    }
}

/// Binding of a physical key to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for InputBinding {
    fn from(button: MouseButton) -> Self {
        let button_id = match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        };
        Self::Mouse(button_id)
    }
}

/// Maps physical inputs to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key/button to action mappings
    bindings: HashMap<InputBinding, InputAction>,
    /// Reverse lookup: action to all bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();

        // Default WASD bindings
        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);

        bindings.bind(KeyCode::KeyE, InputAction::ZoomIn);
        bindings.bind(KeyCode::KeyQ, InputAction::ZoomOut);
        bindings.bind(KeyCode::Escape, InputAction::Pause);
        bindings.bind_mouse(2, InputAction::FreeLook); // Middle mouse button

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create bindings with nothing bound
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.insert(InputBinding::Key(key), action);
    }

    /// Bind a mouse button to an action
    pub fn bind_mouse(&mut self, button: u32, action: InputAction) {
        self.insert(InputBinding::Mouse(button), action);
    }

    fn insert(&mut self, binding: InputBinding, action: InputAction) {
        if let Some(old) = self.bindings.insert(binding, action) {
            if let Some(bindings) = self.reverse.get_mut(&old) {
                bindings.retain(|b| *b != binding);
            }
        }
        self.reverse.entry(action).or_default().push(binding);
    }

    /// Unbind a key
    pub fn unbind(&mut self, key: KeyCode) {
        let binding = InputBinding::Key(key);
        if let Some(action) = self.bindings.remove(&binding) {
            if let Some(bindings) = self.reverse.get_mut(&action) {
                bindings.retain(|b| *b != binding);
            }
        }
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<InputAction> {
        self.bindings.get(binding).copied()
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.get_action(&InputBinding::Key(key))
    }

    /// All bindings that trigger an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Input handler that processes raw events and updates state
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::with_bindings(InputBindings::default())
    }

    /// Create an input handler with custom bindings
    pub fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            state: InputState::new(),
            bindings,
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            self.apply(InputBinding::Key(key_code), element_state);
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, element_state: ElementState) {
        self.apply(InputBinding::from(button), element_state);
    }

    /// Handle cursor movement, in window pixels
    pub fn handle_cursor_moved(&mut self, position: (f64, f64)) {
        self.state.mouse_position = Vec2::new(position.0 as f32, position.1 as f32);
    }

    /// Copy of the current state for this frame's update
    pub fn snapshot(&self) -> InputState {
        self.state.clone()
    }

    /// Release everything, e.g. when the window loses focus and key-up
    /// events will never arrive
    pub fn release_all(&mut self) {
        self.state.clear_all();
    }

    fn apply(&mut self, binding: InputBinding, element_state: ElementState) {
        let Some(action) = self.bindings.get_action(&binding) else {
            return;
        };
        match element_state {
            ElementState::Pressed => {
                self.state.held.insert(action);
            }
            ElementState::Released => {
                self.state.held.remove(&action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = InputBindings::default();
        assert_eq!(
            bindings.get_key_action(KeyCode::KeyW),
            Some(InputAction::MoveForward)
        );
        assert_eq!(
            bindings.get_key_action(KeyCode::KeyE),
            Some(InputAction::ZoomIn)
        );
        assert_eq!(
            bindings.get_action(&InputBinding::from(MouseButton::Middle)),
            Some(InputAction::FreeLook)
        );
        assert_eq!(bindings.bindings_for(InputAction::MoveLeft).len(), 2);
    }

    #[test]
    fn test_rebind_replaces_old_action() {
        let mut bindings = InputBindings::default();
        bindings.bind(KeyCode::KeyE, InputAction::ZoomOut);

        assert_eq!(
            bindings.get_key_action(KeyCode::KeyE),
            Some(InputAction::ZoomOut)
        );
        assert!(bindings.bindings_for(InputAction::ZoomIn).is_empty());
        assert_eq!(bindings.bindings_for(InputAction::ZoomOut).len(), 2);

        bindings.unbind(KeyCode::KeyE);
        assert_eq!(bindings.get_key_action(KeyCode::KeyE), None);
        assert_eq!(bindings.bindings_for(InputAction::ZoomOut).len(), 1);
    }

    #[test]
    fn test_edges_against_previous_snapshot() {
        let previous = InputState::new();
        let mut current = InputState::new();
        current.held.insert(InputAction::ZoomIn);

        assert!(current.pressed_since(&previous, InputAction::ZoomIn));
        assert!(!current.pressed_since(&current.clone(), InputAction::ZoomIn));
        assert!(!previous.pressed_since(&current, InputAction::ZoomIn));
        assert!(!current.pressed_since(&previous, InputAction::ZoomOut));
    }

    #[test]
    fn test_handler_tracks_keys_and_cursor() {
        let mut handler = InputHandler::new();
        handler.handle_keyboard(PhysicalKey::Code(KeyCode::KeyA), ElementState::Pressed);
        handler.handle_mouse_button(MouseButton::Middle, ElementState::Pressed);
        handler.handle_cursor_moved((10.0, 20.0));

        let before = handler.snapshot();
        assert!(before.is_held(InputAction::MoveLeft));
        assert!(before.is_held(InputAction::FreeLook));

        handler.handle_keyboard(PhysicalKey::Code(KeyCode::KeyA), ElementState::Released);
        handler.handle_cursor_moved((15.0, 12.0));
        // Unbound keys are ignored
        handler.handle_keyboard(PhysicalKey::Code(KeyCode::KeyZ), ElementState::Pressed);

        let after = handler.snapshot();
        assert!(before.is_held(InputAction::MoveLeft) && !after.is_held(InputAction::MoveLeft));
        assert_eq!(after.mouse_delta_since(&before), Vec2::new(5.0, -8.0));
        assert_eq!(after.held.len(), 1);

        handler.release_all();
        assert!(handler.snapshot().held.is_empty());
    }
}
