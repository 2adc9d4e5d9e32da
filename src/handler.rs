use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {} // Next render re-clamps the scroll
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Enter => app.submit(),

        // Draft editing
        KeyCode::Backspace => app.conversation.backspace(),
        KeyCode::Delete => app.conversation.delete(),
        KeyCode::Left => app.conversation.cursor_left(),
        KeyCode::Right => app.conversation.cursor_right(),
        KeyCode::Home => app.conversation.cursor_home(),
        KeyCode::End => app.conversation.cursor_end(),
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                app.conversation.insert_char(c);
            }
        }

        // Chat scrolling
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => app.scroll_page_up(),
        KeyCode::PageDown => app.scroll_page_down(),

        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(),
        MouseEventKind::ScrollDown => app.scroll_down(),
        _ => {}
    }
}
