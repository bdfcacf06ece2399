pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;

/// Header, current screen, footer; the command palette floats on top.
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Screen
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let breadcrumb = app.screen().breadcrumb();
  let screen_label = breadcrumb.first().cloned().unwrap_or_default();
  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    &screen_label,
    &app.screen().shortcuts(),
  );

  app.screen_mut().render(frame, chunks[1]);
  if app.palette().is_active() {
    app.palette().render_overlay(frame, chunks[1]);
  }

  renderfns::draw_footer(frame, chunks[2], &breadcrumb, app.status());
}

/// Keep a selection inside `0..len`, selecting the first row when there
/// is one and nothing is selected.
pub fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
  if len == 0 {
    return None;
  }
  Some(selected.unwrap_or(0).min(len - 1))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_clamp_selection() {
    assert_eq!(clamp_selection(None, 0), None);
    assert_eq!(clamp_selection(Some(3), 0), None);
    assert_eq!(clamp_selection(None, 4), Some(0));
    assert_eq!(clamp_selection(Some(9), 4), Some(3));
    assert_eq!(clamp_selection(Some(2), 4), Some(2));
  }
}
