use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Pixels of trackpad scroll that count as one wheel notch
const PIXELS_PER_SCROLL_STEP: f32 = 50.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Buttons that went down since the last reset
    just_pressed: HashSet<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
    /// Cursor movement while the left button is held, since last reset
    drag_delta: (f32, f32),
    /// Wheel notches since last reset, positive = towards the scene
    scroll_steps: f32,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        match event.state {
                            ElementState::Pressed if !event.repeat => self.press(button),
                            ElementState::Pressed => {}
                            ElementState::Released => self.release(button),
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    match state {
                        ElementState::Pressed => self.press(btn),
                        ElementState::Released => self.release(btn),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_SCROLL_STEP,
                };
                self.scroll(steps);
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered to an unfocused window
                self.pressed_keys.clear();
                self.pressed_vec.clear();
            }
            _ => {}
        }
    }

    pub fn press(&mut self, button: Button) {
        if self.pressed_keys.insert(button) {
            self.pressed_vec.push(button);
            self.just_pressed.insert(button);
        }
    }

    pub fn release(&mut self, button: Button) {
        if self.pressed_keys.remove(&button) {
            self.pressed_vec.retain(|&b| b != button);
        }
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if let Some(old) = self.mouse_position {
            if self.is_down(Button::MouseLeft) {
                self.drag_delta.0 += x - old.0;
                self.drag_delta.1 += y - old.1;
            }
        }
        self.mouse_position = Some((x, y));
    }

    pub fn scroll(&mut self, steps: f32) {
        self.scroll_steps += steps;
    }

    /// Reset per-frame state (drag, scroll and press edges)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.drag_delta = (0.0, 0.0);
        self.scroll_steps = 0.0;
        self.just_pressed.clear();
    }

    /// Get current mouse position (if available)
    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    /// Get accumulated drag since last reset
    pub fn drag_delta(&self) -> (f32, f32) {
        self.drag_delta
    }

    pub fn scroll_steps(&self) -> f32 {
        self.scroll_steps
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::Escape => Some(Button::Escape),
            KeyCode::KeyP => Some(Button::KeyP),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn was_pressed(&self, button: Button) -> bool {
        self.just_pressed.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit events carry private fields, so these drive the controller
    // through the same methods process_event dispatches to

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(!controller.is_down(Button::MouseLeft));
        assert_eq!(controller.get_down_keys().len(), 0);
        assert_eq!(controller.mouse_position(), None);
        assert_eq!(controller.drag_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_drag_only_accumulates_while_held() {
        let mut controller = WinitController::new();
        controller.cursor_moved(10.0, 10.0);
        controller.cursor_moved(20.0, 15.0);
        assert_eq!(controller.drag_delta(), (0.0, 0.0));

        controller.press(Button::MouseLeft);
        controller.cursor_moved(25.0, 5.0);
        controller.cursor_moved(27.0, 6.0);
        assert_eq!(controller.drag_delta(), (7.0, -9.0));

        controller.release(Button::MouseLeft);
        controller.cursor_moved(100.0, 100.0);
        assert_eq!(controller.drag_delta(), (7.0, -9.0));
    }

    #[test]
    fn test_press_edges_clear_on_reset() {
        let mut controller = WinitController::new();
        controller.press(Button::KeyP);
        controller.press(Button::KeyP);
        assert!(controller.was_pressed(Button::KeyP));
        assert_eq!(controller.get_down_keys(), &[Button::KeyP]);

        controller.scroll(2.0);
        controller.reset_deltas();
        assert!(!controller.was_pressed(Button::KeyP));
        assert!(controller.is_down(Button::KeyP));
        assert_eq!(controller.scroll_steps(), 0.0);
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut controller = WinitController::new();
        controller.scroll(1.0);
        controller.scroll(-0.5);
        assert_eq!(controller.scroll_steps(), 0.5);
    }
}
