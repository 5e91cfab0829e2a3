use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap;
use crate::viewport::ViewportState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Vertical scrolling keys for page-like content.
///
/// Pages only scroll on the y axis; horizontal overflow is wrapped or clipped by the components.
#[derive(Clone, Debug)]
pub struct ScrollBindings {
    pub line_step: i32,
    pub wheel_step: i32,
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
    pub page_up: Vec<KeyEvent>,
    pub page_down: Vec<KeyEvent>,
    pub top: Vec<KeyEvent>,
    pub bottom: Vec<KeyEvent>,
}

impl Default for ScrollBindings {
    fn default() -> Self {
        Self {
            line_step: 1,
            wheel_step: 3,
            up: vec![KeyEvent::new(KeyCode::Up), keymap::key_char('k')],
            down: vec![KeyEvent::new(KeyCode::Down), keymap::key_char('j')],
            page_up: vec![KeyEvent::new(KeyCode::PageUp), keymap::key_ctrl('u')],
            page_down: vec![
                KeyEvent::new(KeyCode::PageDown),
                keymap::key_ctrl('d'),
                keymap::key_char(' '),
            ],
            top: vec![KeyEvent::new(KeyCode::Home), keymap::key_char('g')],
            bottom: vec![KeyEvent::new(KeyCode::End), keymap::key_char('G')],
        }
    }
}

impl ScrollBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<ScrollAction> {
        let table = [
            (&self.up, ScrollAction::Up),
            (&self.down, ScrollAction::Down),
            (&self.page_up, ScrollAction::PageUp),
            (&self.page_down, ScrollAction::PageDown),
            (&self.top, ScrollAction::Top),
            (&self.bottom, ScrollAction::Bottom),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keymap::matches_any(keys, key))
            .map(|(_, action)| action)
    }

    pub fn apply(&self, state: &mut ViewportState, action: ScrollAction) {
        match action {
            ScrollAction::Up => state.scroll_y_by(-self.line_step),
            ScrollAction::Down => state.scroll_y_by(self.line_step),
            ScrollAction::PageUp => state.page_up(),
            ScrollAction::PageDown => state.page_down(),
            ScrollAction::Top => state.to_top(),
            ScrollAction::Bottom => state.to_bottom(),
        }
    }

    /// Applies a wheel event. Returns `true` if the event was a wheel event.
    pub fn apply_mouse(&self, state: &mut ViewportState, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::ScrollUp => state.scroll_y_by(-self.wheel_step),
            MouseEventKind::ScrollDown => state.scroll_y_by(self.wheel_step),
            _ => return false,
        }
        true
    }
}
