use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ldbv_core::{Focus, NavEvent};

use super::action::Action;
use super::state::SPLIT_STEP;

/// Keys that act on the UI rather than the session. Printable shortcuts only
/// apply outside the search box so they can still be typed there.
pub fn map_global_key(key: KeyEvent, focus: Focus) -> Option<Action> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q') | KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
        (KeyCode::F(1), _) => Some(Action::ToggleHelp),
        (KeyCode::Left, KeyModifiers::CONTROL) => Some(Action::AdjustSplit(-SPLIT_STEP)),
        (KeyCode::Right, KeyModifiers::CONTROL) => Some(Action::AdjustSplit(SPLIT_STEP)),
        _ if focus == Focus::Search => None,
        (KeyCode::Char('q'), KeyModifiers::NONE) if focus == Focus::List => Some(Action::Quit),
        (KeyCode::Char('?'), _) => Some(Action::ToggleHelp),
        (KeyCode::Char('['), KeyModifiers::NONE) => Some(Action::AdjustSplit(-SPLIT_STEP)),
        (KeyCode::Char(']'), KeyModifiers::NONE) => Some(Action::AdjustSplit(SPLIT_STEP)),
        _ => None,
    }
}

pub fn map_nav_key(key: KeyEvent, focus: Focus) -> Option<NavEvent> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Some(NavEvent::FocusSearch),
        (KeyCode::Up, _) => Some(NavEvent::Up),
        (KeyCode::Down, _) => Some(NavEvent::Down),
        (KeyCode::PageUp, _) => Some(NavEvent::PageUp),
        (KeyCode::PageDown, _) => Some(NavEvent::PageDown),
        (KeyCode::Home, _) => Some(NavEvent::Home),
        (KeyCode::Enter, _) => Some(NavEvent::Enter),
        (KeyCode::Esc, _) => Some(NavEvent::Back),
        (KeyCode::Backspace, _) if focus == Focus::Search => Some(NavEvent::Backspace),
        (KeyCode::Backspace, _) => Some(NavEvent::Back),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) if focus == Focus::Search => {
            Some(NavEvent::Char(c))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ldbv_core::{Focus, NavEvent};

    use crate::app::action::Action;

    use super::{map_global_key, map_nav_key};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn quit_keys_depend_on_focus() {
        let ctrl_q = key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_q = key(KeyCode::Char('q'), KeyModifiers::NONE);

        for focus in [Focus::List, Focus::Value, Focus::Search] {
            assert_eq!(map_global_key(ctrl_q, focus), Some(Action::Quit));
            assert_eq!(map_global_key(ctrl_c, focus), Some(Action::Quit));
        }
        assert_eq!(map_global_key(plain_q, Focus::List), Some(Action::Quit));
        assert_eq!(map_global_key(plain_q, Focus::Value), None);
        assert_eq!(map_global_key(plain_q, Focus::Search), None);
    }

    #[test]
    fn help_and_split_shortcuts() {
        assert_eq!(
            map_global_key(key(KeyCode::F(1), KeyModifiers::NONE), Focus::Search),
            Some(Action::ToggleHelp)
        );
        assert_eq!(
            map_global_key(key(KeyCode::Char('?'), KeyModifiers::SHIFT), Focus::List),
            Some(Action::ToggleHelp)
        );
        assert_eq!(
            map_global_key(key(KeyCode::Char('?'), KeyModifiers::SHIFT), Focus::Search),
            None
        );
        assert_eq!(
            map_global_key(key(KeyCode::Char(']'), KeyModifiers::NONE), Focus::Value),
            Some(Action::AdjustSplit(5))
        );
        assert_eq!(
            map_global_key(key(KeyCode::Left, KeyModifiers::CONTROL), Focus::Search),
            Some(Action::AdjustSplit(-5))
        );
    }

    #[test]
    fn navigation_keys_map_to_events() {
        assert_eq!(
            map_nav_key(key(KeyCode::Down, KeyModifiers::NONE), Focus::List),
            Some(NavEvent::Down)
        );
        assert_eq!(
            map_nav_key(key(KeyCode::PageUp, KeyModifiers::NONE), Focus::Value),
            Some(NavEvent::PageUp)
        );
        assert_eq!(
            map_nav_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL), Focus::List),
            Some(NavEvent::FocusSearch)
        );
        assert_eq!(
            map_nav_key(key(KeyCode::Esc, KeyModifiers::NONE), Focus::Search),
            Some(NavEvent::Back)
        );
    }

    #[test]
    fn backspace_and_chars_follow_focus() {
        let backspace = key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(map_nav_key(backspace, Focus::Search), Some(NavEvent::Backspace));
        assert_eq!(map_nav_key(backspace, Focus::Value), Some(NavEvent::Back));

        let upper = key(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(map_nav_key(upper, Focus::Search), Some(NavEvent::Char('A')));
        assert_eq!(map_nav_key(upper, Focus::List), None);
        assert_eq!(
            map_nav_key(key(KeyCode::Char('x'), KeyModifiers::ALT), Focus::Search),
            None
        );
    }
}
