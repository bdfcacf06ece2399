use crate::ui::renderfns::StatusKind;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// What a view asks the app to do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
  None,
  /// Leave this screen; on the root screen this quits
  Exit,
}

/// A root screen. Drill-down inside a screen is the screen's own business
/// (see `Navigator`); the app only swaps root screens.
///
/// Views that load data asynchronously hold a `Query<T>` or an entity hook
/// and pick up results in `tick()`.
pub trait View {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Path shown in the footer, root first
  fn breadcrumb(&self) -> Vec<String>;

  /// Called on each tick to allow views to poll async work
  fn tick(&mut self) {}

  /// Latest message for the footer
  fn status(&self) -> Option<(StatusKind, &str)> {
    None
  }

  /// True while a prompt or form inside the view owns the keyboard
  fn captures_input(&self) -> bool {
    false
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
