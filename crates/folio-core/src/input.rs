use ratatui::layout::Position;
use ratatui::layout::Rect;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Tab,
    BackTab,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::none(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Input delivered by the host to a component.
///
/// Terminal resizes are not events here: components re-derive their layout from the `area`
/// passed to `render_ref` / `handle_event_in_area`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl InputEvent {
    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    pub fn click(x: u16, y: u16) -> Self {
        Self::Mouse(MouseEvent {
            x,
            y,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: KeyModifiers::none(),
        })
    }

    pub fn wheel(x: u16, y: u16, down: bool) -> Self {
        let kind = if down {
            MouseEventKind::ScrollDown
        } else {
            MouseEventKind::ScrollUp
        };
        Self::Mouse(MouseEvent {
            x,
            y,
            kind,
            modifiers: KeyModifiers::none(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub kind: MouseEventKind,
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    pub fn is_left_click(&self) -> bool {
        self.kind == MouseEventKind::Down(MouseButton::Left)
    }

    pub fn is_wheel(&self) -> bool {
        matches!(self.kind, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown)
    }

    /// Returns `true` if the pointer is inside `area`.
    pub fn is_within(&self, area: Rect) -> bool {
        area.contains(Position::new(self.x, self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_hit_test_excludes_far_edges() {
        let area = Rect::new(2, 2, 4, 2);
        let InputEvent::Mouse(inside) = InputEvent::click(5, 3) else {
            unreachable!()
        };
        let InputEvent::Mouse(outside) = InputEvent::click(6, 3) else {
            unreachable!()
        };
        assert!(inside.is_left_click());
        assert!(inside.is_within(area));
        assert!(!outside.is_within(area));
    }
}
