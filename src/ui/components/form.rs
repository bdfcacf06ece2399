use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
  /// Enter pressed; one value per field, in field order
  Submitted(Vec<String>),
  Cancelled,
}

/// Modal form of labelled single-line inputs.
#[derive(Debug, Clone)]
pub struct Form {
  title: String,
  labels: &'static [&'static str],
  inputs: Vec<TextInput>,
  focus: usize,
  error: Option<String>,
}

impl Form {
  /// Fields start with `values`, or empty where none is given.
  pub fn new(title: impl Into<String>, labels: &'static [&'static str], values: &[String]) -> Self {
    let inputs = labels
      .iter()
      .enumerate()
      .map(|(i, _)| {
        let mut input = TextInput::new();
        if let Some(value) = values.get(i) {
          input.set(value);
        }
        input
      })
      .collect();

    Self {
      title: title.into(),
      labels,
      inputs,
      focus: 0,
      error: None,
    }
  }

  /// Show a message under the fields, for instance a rejected value.
  pub fn set_error(&mut self, message: impl Into<String>) {
    self.error = Some(message.into());
  }

  pub fn values(&self) -> Vec<String> {
    self.inputs.iter().map(|i| i.value().to_string()).collect()
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    let count = self.inputs.len();
    match key.code {
      KeyCode::Tab | KeyCode::Down if count > 0 => {
        self.focus = (self.focus + 1) % count;
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up if count > 0 => {
        self.focus = (self.focus + count - 1) % count;
        return KeyResult::Handled;
      }
      _ => {}
    }

    let Some(input) = self.inputs.get_mut(self.focus) else {
      return KeyResult::NotHandled;
    };
    match input.handle_key(key) {
      InputResult::Submitted(_) => KeyResult::Event(FormEvent::Submitted(self.values())),
      InputResult::Cancelled => KeyResult::Event(FormEvent::Cancelled),
      InputResult::Consumed => {
        self.error = None;
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let label_width = self.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 2;
    let width = (area.width * 70 / 100).clamp(40.min(area.width), 80);
    let height = self.inputs.len() as u16 + 4;
    let popup = Rect::new(
      area.x + area.width.saturating_sub(width) / 2,
      area.y + area.height.saturating_sub(height) / 2,
      width,
      height,
    )
    .intersection(area);

    frame.render_widget(Clear, popup);
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title))
      .title_bottom(Line::from(" Tab: next field  Enter: save  Esc: cancel ").centered());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = self
      .labels
      .iter()
      .zip(&self.inputs)
      .enumerate()
      .map(|(i, (label, input))| {
        let label_style = if i == self.focus {
          Style::default().fg(Color::Cyan).bold()
        } else {
          Style::default().fg(Color::DarkGray)
        };
        Line::from(vec![
          Span::styled(format!("{:<w$}", label, w = label_width as usize), label_style),
          Span::raw(input.value().to_string()),
        ])
      })
      .collect();

    lines.push(Line::raw(""));
    if let Some(error) = &self.error {
      lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    if let Some(input) = self.inputs.get(self.focus) {
      let x = inner.x + label_width + input.cursor_position() as u16;
      let y = inner.y + self.focus as u16;
      if x < inner.right() && y < inner.bottom() {
        frame.set_cursor_position((x, y));
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  const LABELS: &[&str] = &["nombre", "correo"];

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_prefilled_values() {
    let form = Form::new("Editar", LABELS, &["Acme".into()]);
    assert_eq!(form.values(), vec!["Acme".to_string(), String::new()]);
  }

  #[test]
  fn test_tab_moves_between_fields() {
    let mut form = Form::new("Nueva", LABELS, &[]);
    form.handle_key(key(KeyCode::Char('a')));
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Char('b')));
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Char('c')));
    assert_eq!(form.values(), vec!["ac".to_string(), "b".to_string()]);
  }

  #[test]
  fn test_enter_submits_all_fields() {
    let mut form = Form::new("Nueva", LABELS, &["Acme".into(), "a@acme.com".into()]);
    assert_eq!(
      form.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(FormEvent::Submitted(vec![
        "Acme".into(),
        "a@acme.com".into()
      ]))
    );
  }

  #[test]
  fn test_typing_clears_error() {
    let mut form = Form::new("Nueva", LABELS, &[]);
    form.set_error("correo: invalid");
    form.handle_key(key(KeyCode::Char('x')));
    assert!(form.error.is_none());
  }

  #[test]
  fn test_escape_cancels() {
    let mut form = Form::new("Nueva", LABELS, &[]);
    assert_eq!(
      form.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(FormEvent::Cancelled)
    );
  }
}
