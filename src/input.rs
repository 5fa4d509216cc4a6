//! Keyboard shortcuts for tool switching, matching the toolbar bindings:
//! `H` pan, `V` select, `A` arrow, `L` line, `P` pen, `T` text, `E` eraser
//! and `M` cycling rectangle, diamond, circle on repeated presses.

use egui::{Context, Key};

use crate::controller::Tool;

/// How long repeated `M` presses keep cycling before the count resets.
const M_CYCLE_WINDOW_SECS: f64 = 1.0;

/// What a handled shortcut asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SetTool(Tool),
    DeleteSelection,
}

/// Converts raw egui key input into [`ShortcutAction`]s, tracking the
/// repeat state of the `M` shape-cycling key.
#[derive(Debug, Default)]
pub struct ShortcutHandler {
    m_press_count: u8,
    last_m_press: f64,
}

impl ShortcutHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's input. Shortcuts are suppressed while a text
    /// field has focus and when a modifier is held.
    pub fn process(&mut self, ctx: &Context) -> Option<ShortcutAction> {
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input(|input| {
            if input.modifiers.ctrl || input.modifiers.alt || input.modifiers.command {
                return None;
            }
            const KEYS: [Key; 10] = [
                Key::H,
                Key::V,
                Key::A,
                Key::L,
                Key::P,
                Key::T,
                Key::E,
                Key::M,
                Key::Delete,
                Key::Backspace,
            ];
            KEYS.into_iter()
                .find(|key| input.key_pressed(*key))
                .and_then(|key| self.handle_key(key, input.time))
        })
    }

    /// Handle a single key press at the given time (seconds, monotonic).
    /// Public so the cycling logic is testable without a UI context.
    pub fn handle_key(&mut self, key: Key, now: f64) -> Option<ShortcutAction> {
        if key != Key::M {
            self.m_press_count = 0;
        }

        let tool = match key {
            Key::H => Tool::Pan,
            Key::V => Tool::Select,
            Key::A => Tool::Arrow,
            Key::L => Tool::Line,
            Key::P => Tool::Pen,
            Key::T => Tool::Text,
            Key::E => Tool::Eraser,
            Key::Delete | Key::Backspace => return Some(ShortcutAction::DeleteSelection),
            Key::M => {
                if now - self.last_m_press > M_CYCLE_WINDOW_SECS {
                    self.m_press_count = 0;
                }
                self.last_m_press = now;
                self.m_press_count += 1;
                match self.m_press_count {
                    1 => Tool::Rectangle,
                    2 => Tool::Diamond,
                    _ => {
                        self.m_press_count = 0;
                        Tool::Circle
                    }
                }
            }
            _ => return None,
        };
        Some(ShortcutAction::SetTool(tool))
    }
}
