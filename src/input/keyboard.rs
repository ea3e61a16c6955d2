// Keyboard input mapping for the window shell
//
// Default layout, player one: Z = A, X = B, Shift = Select,
// Enter = Start, arrows = D-pad. Player two sits on IJKL/TGFH-style keys
// so two players can share one keyboard.

use super::Controller;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Controller buttons in shift-register order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

/// Player selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

/// Tracks held keys and translates them to controller state
pub struct KeyboardHandler {
    controller1: Controller,
    controller2: Controller,
}

impl KeyboardHandler {
    pub fn new() -> Self {
        Self {
            controller1: Controller::new(),
            controller2: Controller::new(),
        }
    }

    /// Map a physical key to a player/button pair
    fn map_key(key: PhysicalKey) -> Option<(Player, Button)> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        match code {
            // Player one
            KeyCode::KeyZ => Some((Player::One, Button::A)),
            KeyCode::KeyX => Some((Player::One, Button::B)),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some((Player::One, Button::Select)),
            KeyCode::Enter => Some((Player::One, Button::Start)),
            KeyCode::ArrowUp => Some((Player::One, Button::Up)),
            KeyCode::ArrowDown => Some((Player::One, Button::Down)),
            KeyCode::ArrowLeft => Some((Player::One, Button::Left)),
            KeyCode::ArrowRight => Some((Player::One, Button::Right)),

            // Player two
            KeyCode::KeyN => Some((Player::Two, Button::A)),
            KeyCode::KeyM => Some((Player::Two, Button::B)),
            KeyCode::KeyV => Some((Player::Two, Button::Select)),
            KeyCode::KeyB => Some((Player::Two, Button::Start)),
            KeyCode::KeyI => Some((Player::Two, Button::Up)),
            KeyCode::KeyK => Some((Player::Two, Button::Down)),
            KeyCode::KeyJ => Some((Player::Two, Button::Left)),
            KeyCode::KeyL => Some((Player::Two, Button::Right)),

            _ => None,
        }
    }

    fn controller_mut(&mut self, player: Player) -> &mut Controller {
        match player {
            Player::One => &mut self.controller1,
            Player::Two => &mut self.controller2,
        }
    }

    fn set_button(&mut self, player: Player, button: Button, pressed: bool) {
        let controller = self.controller_mut(player);
        match button {
            Button::A => controller.button_a = pressed,
            Button::B => controller.button_b = pressed,
            Button::Select => controller.select = pressed,
            Button::Start => controller.start = pressed,
            Button::Up => controller.up = pressed,
            Button::Down => controller.down = pressed,
            Button::Left => controller.left = pressed,
            Button::Right => controller.right = pressed,
        }
    }

    /// Handle a key-down event
    pub fn handle_key_press(&mut self, key: PhysicalKey) {
        if let Some((player, button)) = Self::map_key(key) {
            self.set_button(player, button, true);
        }
    }

    /// Handle a key-up event
    pub fn handle_key_release(&mut self, key: PhysicalKey) {
        if let Some((player, button)) = Self::map_key(key) {
            self.set_button(player, button, false);
        }
    }

    /// Current controller state for a player
    pub fn controller_state(&self, player: Player) -> Controller {
        match player {
            Player::One => self.controller1,
            Player::Two => self.controller2,
        }
    }
}

impl Default for KeyboardHandler {
    fn default() -> Self {
        Self::new()
    }
}
