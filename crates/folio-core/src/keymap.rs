use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        matches_any(&self.keys, event)
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    if pattern.code != event.code {
        return false;
    }
    let (p, e) = (pattern.modifiers, event.modifiers);
    // Shifted characters and BackTab already carry the shift in the code itself.
    let shift_ok =
        p.shift == e.shift || matches!(pattern.code, KeyCode::Char(_) | KeyCode::BackTab);
    shift_ok && p.ctrl == e.ctrl && p.alt == e.alt
}

pub fn matches_any(patterns: &[KeyEvent], event: &KeyEvent) -> bool {
    patterns.iter().any(|p| key_event_matches(p, event))
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    })
}

/// Bindings shared by every overlay (sidebar, lightbox, project modal).
#[derive(Clone, Debug)]
pub struct OverlayBindings {
    pub close: Vec<KeyEvent>,
    pub activate: Vec<KeyEvent>,
    pub next: Vec<KeyEvent>,
    pub prev: Vec<KeyEvent>,
}

impl Default for OverlayBindings {
    fn default() -> Self {
        Self {
            close: vec![key(KeyCode::Esc)],
            activate: vec![key(KeyCode::Enter), key_char(' ')],
            next: vec![key(KeyCode::Down), key(KeyCode::Tab), key_char('j')],
            prev: vec![key(KeyCode::Up), key(KeyCode::BackTab), key_char('k')],
        }
    }
}

impl OverlayBindings {
    pub fn is_close(&self, event: &KeyEvent) -> bool {
        matches_any(&self.close, event)
    }

    pub fn is_activate(&self, event: &KeyEvent) -> bool {
        matches_any(&self.activate, event)
    }

    pub fn is_next(&self, event: &KeyEvent) -> bool {
        matches_any(&self.next, event)
    }

    pub fn is_prev(&self, event: &KeyEvent) -> bool {
        matches_any(&self.prev, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_matches_exact_modifiers() {
        let b = Binding::new("q", "quit", vec![key_char('q')]);
        assert!(b.matches(&key_char('q')));
        assert!(!b.matches(&key_ctrl('q')));
    }

    #[test]
    fn uppercase_char_matches_with_terminal_shift_flag() {
        let shifted = key_char('G').with_modifiers(KeyModifiers {
            shift: true,
            ctrl: false,
            alt: false,
        });
        assert!(key_event_matches(&key_char('G'), &shifted));
    }

    #[test]
    fn overlay_closes_on_escape_only() {
        let b = OverlayBindings::default();
        assert!(b.is_close(&key(KeyCode::Esc)));
        assert!(!b.is_close(&key_char('q')));
        assert!(b.is_activate(&key(KeyCode::Enter)));
    }
}
