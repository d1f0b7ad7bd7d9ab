//! Keyboard input dispatch: help overlay first, then chart keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::AppState;

/// Handle a key event. Every handled key ends with a scene refresh.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') | KeyCode::Char('h') => app.show_help = true,

        KeyCode::Tab => app.controller.cycle_kind(),
        KeyCode::Char('w') => app.toggle_timeframe(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('t') => app.controller.cycle_trail_length(),
        KeyCode::Char('m') => app.controller.cycle_selection_mode(),
        KeyCode::Char('[') => step_industry(app, false),
        KeyCode::Char(']') => step_industry(app, true),

        KeyCode::Char('+') | KeyCode::Char('=') => app.controller.zoom_in(),
        KeyCode::Char('-') => app.controller.zoom_out(),
        KeyCode::Char('0') => app.controller.reset_zoom(),

        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Enter => app.select_at_cursor(),
        KeyCode::Esc => app.clear_pointer(),
        _ => return,
    }

    app.refresh();
}

fn step_industry(app: &mut AppState, forward: bool) {
    let industries = app
        .repository
        .list_industries(app.timeframe)
        .unwrap_or_default();
    if !app.controller.step_membership(&industries, forward) {
        app.set_warning("Industry filter applies to symbols (Tab to switch)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::StatusLevel;
    use crate::test_helpers::loaded_app as loaded;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use rrglab_core::{EntityKind, SelectionMode, TrailLength};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_quit() {
        let (mut app, _rx) = loaded();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_release_ignored() {
        let (mut app, _rx) = loaded();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (mut app, _rx) = loaded();
        handle_key(&mut app, press(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_trail_and_zoom_keys() {
        let (mut app, _rx) = loaded();
        handle_key(&mut app, press(KeyCode::Char('t')));
        assert_eq!(app.controller.state().trail_length, TrailLength::TwentyOne);
        handle_key(&mut app, press(KeyCode::Char('+')));
        handle_key(&mut app, press(KeyCode::Char('+')));
        assert_eq!(app.controller.state().zoom.get(), 2.25);
        handle_key(&mut app, press(KeyCode::Char('-')));
        assert_eq!(app.controller.state().zoom.get(), 1.5);
        handle_key(&mut app, press(KeyCode::Char('0')));
        assert_eq!(app.controller.state().zoom.get(), 1.0);
    }

    #[test]
    fn test_kind_and_industry_cycle() {
        let (mut app, _rx) = loaded();
        handle_key(&mut app, press(KeyCode::Char(']')));
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));

        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.controller.state().kind, EntityKind::Symbol);
        assert_eq!(app.scene.markers[0].label, "VCB");

        handle_key(&mut app, press(KeyCode::Char(']')));
        assert_eq!(
            app.controller.state().selection_mode,
            SelectionMode::ByMembership(vec!["STEEL".into()])
        );
        assert_eq!(app.scene.markers[0].label, "HPG");
    }

    #[test]
    fn test_mode_cycle_ranks() {
        let (mut app, _rx) = loaded();
        handle_key(&mut app, press(KeyCode::Char('m')));
        assert_eq!(app.controller.state().selection_mode, SelectionMode::TopNByRatio(10));
        assert_eq!(app.scene.markers[0].label, "Banks");
    }

    #[test]
    fn test_rerank_drops_stale_cursor() {
        let (mut app, _rx) = loaded();
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.cursor, Some(1));
        handle_key(&mut app, press(KeyCode::Char('m')));
        assert_eq!(app.cursor, None);
        assert!(app.controller.state().hovered.is_none());

        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.controller.state().selected.is_none());
    }

    #[test]
    fn test_cursor_select_and_escape() {
        let (mut app, _rx) = loaded();
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.controller.state().selected.as_ref().unwrap().as_str(), "STEEL");
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.controller.state().selected.is_none());
        assert_eq!(app.cursor, None);
    }
}
