use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Search term confirmed with Enter (trimmed, never empty)
  Submitted(String),
  Cancelled,
}

/// `/`-activated prompt rendered as an overlay on top of the owning view.
#[derive(Debug, Clone)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
  title: &'static str,
}

impl SearchInput {
  pub fn new(title: &'static str) -> Self {
    Self {
      input: TextInput::new(),
      active: false,
      title,
    }
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open the prompt prefilled with the last term.
  pub fn activate(&mut self, current: &str) {
    self.active = true;
    self.input.set(current);
  }

  /// Call regardless of active state; `/` opens the prompt.
  pub fn handle_key(&mut self, key: KeyEvent, current: &str) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate(current);
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        let term = value.trim();
        if term.is_empty() {
          // Keep the prompt open until there is something to search for
          return KeyResult::Handled;
        }
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted(term.to_string()))
      }
      InputResult::Cancelled => {
        self.active = false;
        KeyResult::Event(SearchEvent::Cancelled)
      }
      // Swallow everything else while the prompt is open
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30.min(area.width), 60);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, 3).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let line = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    let cursor_x = inner.x + 1 + self.input.cursor_position() as u16;
    if cursor_x < inner.right() {
      frame.set_cursor_position((cursor_x, inner.y));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_ignores_keys() {
    let mut search = SearchInput::new("Buscar");
    assert_eq!(
      search.handle_key(key(KeyCode::Char('j')), ""),
      KeyResult::NotHandled
    );
  }

  #[test]
  fn test_submit_trims() {
    let mut search = SearchInput::new("Buscar");
    search.handle_key(key(KeyCode::Char('/')), "");
    assert!(search.is_active());
    for c in " acme ".chars() {
      search.handle_key(key(KeyCode::Char(c)), "");
    }
    assert_eq!(
      search.handle_key(key(KeyCode::Enter), ""),
      KeyResult::Event(SearchEvent::Submitted("acme".into()))
    );
    assert!(!search.is_active());
  }

  #[test]
  fn test_blank_submit_stays_open() {
    let mut search = SearchInput::new("Buscar");
    search.handle_key(key(KeyCode::Char('/')), "");
    assert_eq!(search.handle_key(key(KeyCode::Enter), ""), KeyResult::Handled);
    assert!(search.is_active());
  }

  #[test]
  fn test_prefilled_with_current_term() {
    let mut search = SearchInput::new("Buscar");
    search.handle_key(key(KeyCode::Char('/')), "acme");
    assert_eq!(
      search.handle_key(key(KeyCode::Enter), ""),
      KeyResult::Event(SearchEvent::Submitted("acme".into()))
    );
  }

  #[test]
  fn test_cancel() {
    let mut search = SearchInput::new("Buscar");
    search.handle_key(key(KeyCode::Char('/')), "");
    assert_eq!(
      search.handle_key(key(KeyCode::Esc), ""),
      KeyResult::Event(SearchEvent::Cancelled)
    );
    assert!(!search.is_active());
  }
}
