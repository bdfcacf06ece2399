use std::future::Future;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc;

use crate::cache::CacheSource;
use crate::hook::validate::Validate;
use crate::hook::{EntityHook, HookState};
use crate::ui::clamp_selection;
use crate::ui::components::{Form, FormEvent, KeyResult, SearchEvent, SearchInput};
use crate::ui::renderfns::{format_age, truncate, StatusKind};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::records::Record;

type Outcome = Option<(StatusKind, String)>;

/// Form being edited; `id` is `None` for a new record
struct Editor {
  form: Form,
  id: Option<String>,
}

/// Table over one entity hook with create, edit and delete.
pub struct EntityListView<E: Record> {
  hook: EntityHook<E>,
  table_state: TableState,
  search: SearchInput,
  filter: String,
  editor: Option<Editor>,
  pending_delete: Option<String>,
  status: Outcome,
  outcome_tx: mpsc::UnboundedSender<Outcome>,
  outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl<E: Record> EntityListView<E> {
  pub fn new(hook: EntityHook<E>) -> Self {
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let mut view = Self {
      hook,
      table_state: TableState::default(),
      search: SearchInput::new("Filter"),
      filter: String::new(),
      editor: None,
      pending_delete: None,
      status: None,
      outcome_tx,
      outcome_rx,
    };
    view.refetch();
    view
  }

  fn visible(&self, state: &HookState<E>) -> Vec<E> {
    state
      .items
      .iter()
      .filter(|item| self.filter.is_empty() || item.matches(&self.filter))
      .cloned()
      .collect()
  }

  fn selected(&self) -> Option<E> {
    let state = self.hook.snapshot();
    let index = self.table_state.selected()?;
    self.visible(&state).into_iter().nth(index)
  }

  /// Run hook work off the UI thread and report back through `tick`.
  fn spawn<F>(&self, work: F)
  where
    F: Future<Output = Outcome> + Send + 'static,
  {
    let tx = self.outcome_tx.clone();
    tokio::spawn(async move {
      let _ = tx.send(work.await);
    });
  }

  fn refetch(&mut self) {
    let hook = self.hook.clone();
    self.spawn(async move {
      hook
        .refetch()
        .await
        .err()
        .map(|e| (StatusKind::Error, e.to_string()))
    });
  }

  fn open_editor(&mut self, target: Option<E>) {
    let (title, values, id) = match target {
      Some(item) => (
        format!("Edit {} {}", E::LABEL, item.id()),
        item.form_values(),
        Some(item.id().to_string()),
      ),
      None => (format!("New {}", E::LABEL), Vec::new(), None),
    };
    self.editor = Some(Editor {
      form: Form::new(title, E::FIELDS, &values),
      id,
    });
  }

  fn handle_editor_key(&mut self, key: KeyEvent) {
    let Some(editor) = self.editor.as_mut() else {
      return;
    };
    match editor.form.handle_key(key) {
      KeyResult::Event(FormEvent::Cancelled) => self.editor = None,
      KeyResult::Event(FormEvent::Submitted(values)) => {
        let draft = match E::draft(&values) {
          Ok(draft) => draft,
          Err(e) => return editor.form.set_error(e.to_string()),
        };
        // Keep the form open on a rejected draft
        if let Err(e) = draft.validate() {
          return editor.form.set_error(e.to_string());
        }

        let id = editor.id.clone();
        self.editor = None;
        let hook = self.hook.clone();
        self.spawn(async move {
          let saved = match &id {
            Some(id) => hook.update(id, draft).await,
            None => hook.create(draft).await,
          };
          Some(match saved {
            Ok(Some(item)) => (StatusKind::Info, format!("saved {} {}", E::LABEL, item.id())),
            Ok(None) => (StatusKind::Info, format!("saved {}", E::LABEL)),
            Err(e) => (StatusKind::Error, e.to_string()),
          })
        });
      }
      KeyResult::Handled | KeyResult::NotHandled => {}
    }
  }

  fn confirm_delete(&mut self, id: String) {
    let hook = self.hook.clone();
    self.status = Some((StatusKind::Info, format!("deleting {} {}...", E::LABEL, id)));
    self.spawn(async move {
      Some(match hook.delete(&id).await {
        Ok(()) => (StatusKind::Info, format!("deleted {} {}", E::LABEL, id)),
        Err(e) => (StatusKind::Error, e.to_string()),
      })
    });
  }

  fn title(&self, state: &HookState<E>, shown: usize, now: DateTime<Utc>) -> String {
    let mut title = format!(" {} [{}]", E::TITLE, shown);
    if !self.filter.is_empty() {
      title.push_str(&format!(" /{}", self.filter));
    }
    if state.loading {
      title.push_str(" (loading...)");
    } else if let (Some(CacheSource::Cache), Some(at)) = (state.source, state.cached_at) {
      title.push_str(&format!(" (cached {} ago)", format_age(now - at)));
    }
    title.push(' ');
    title
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let state = self.hook.snapshot();
    let items = self.visible(&state);
    let selected = clamp_selection(self.table_state.selected(), items.len());
    self.table_state.select(selected);

    let border = if state.error.is_some() {
      Color::Red
    } else {
      Color::Blue
    };
    let block = Block::default()
      .title(self.title(&state, items.len(), Utc::now()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));

    if items.is_empty() {
      let content = match (&state.error, state.loading) {
        (Some(e), _) => format!("{}\nPress 'r' to retry.", e),
        (None, true) => "Loading...".to_string(),
        (None, false) if !self.filter.is_empty() => "Nothing matches the filter.".to_string(),
        (None, false) => "No records. Press 'n' to create one.".to_string(),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let header = Row::new(E::HEADERS.iter().map(|h| Cell::from(*h)))
      .style(Style::default().fg(Color::Yellow).bold());

    let rows = items.iter().map(|item| {
      let accent = item.accent();
      Row::new(item.columns().into_iter().enumerate().map(|(i, value)| {
        let cell = Cell::from(truncate(&value, 60));
        match accent {
          Some((col, color)) if col == i => cell.style(Style::default().fg(color)),
          _ => cell,
        }
      }))
    });

    let table = Table::new(rows, E::WIDTHS.to_vec())
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }
}

impl<E: Record> View for EntityListView<E> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.editor.is_some() {
      self.handle_editor_key(key);
      return ViewAction::None;
    }

    if let Some(id) = self.pending_delete.take() {
      if key.code == KeyCode::Char('y') {
        self.confirm_delete(id);
      } else {
        self.status = None;
      }
      return ViewAction::None;
    }

    match self.search.handle_key(key, &self.filter) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(SearchEvent::Submitted(term)) => {
        self.filter = term;
        self.table_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cancelled) => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.table_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.table_state.select_last(),
      KeyCode::Char('r') => self.refetch(),
      KeyCode::Char('n') => self.open_editor(None),
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(item) = self.selected() {
          self.open_editor(Some(item));
        }
      }
      KeyCode::Char('D') => {
        if let Some(item) = self.selected() {
          self.status = Some((
            StatusKind::Error,
            format!("delete {} {}? (y/N)", E::LABEL, item.id()),
          ));
          self.pending_delete = Some(item.id().to_string());
        }
      }
      KeyCode::Esc if !self.filter.is_empty() => self.filter.clear(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Exit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_table(frame, area);
    self.search.render_overlay(frame, area);
    if let Some(editor) = &self.editor {
      editor.form.render(frame, area);
    }
  }

  fn breadcrumb(&self) -> Vec<String> {
    vec![E::TITLE.to_string()]
  }

  fn tick(&mut self) {
    while let Ok(outcome) = self.outcome_rx.try_recv() {
      if let Some(outcome) = outcome {
        self.status = Some(outcome);
      }
    }
    let len = self.visible(&self.hook.snapshot()).len();
    let selected = clamp_selection(self.table_state.selected(), len);
    self.table_state.select(selected);
  }

  fn status(&self) -> Option<(StatusKind, &str)> {
    self
      .status
      .as_ref()
      .map(|(kind, message)| (*kind, message.as_str()))
  }

  fn captures_input(&self) -> bool {
    self.editor.is_some() || self.search.is_active() || self.pending_delete.is_some()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "filter").with_priority(20),
      ShortcutInfo::new("n", "new").with_priority(30),
      ShortcutInfo::new("e", "edit").with_priority(40),
      ShortcutInfo::new("D", "delete").with_priority(50),
      ShortcutInfo::new("r", "reload").with_priority(60),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{CacheLayer, ResponseCache};
  use crate::domain::Empresa;
  use crate::graphql::envelope::GraphQlResponse;
  use crate::graphql::testing::MockGateway;
  use crossterm::event::KeyModifiers;
  use serde_json::{json, Value};
  use std::sync::{Arc, Mutex};
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  /// Gateway holding a mutable list of companies
  fn gateway() -> Arc<MockGateway> {
    let rows = Arc::new(Mutex::new(vec![
      json!({"id": "1", "nombre": "Acme", "correo": "a@acme.com", "rubro": "retail"}),
      json!({"id": "2", "nombre": "Globex", "correo": "g@globex.com", "rubro": "energia"}),
    ]));
    MockGateway::new(move |request| {
      let mut rows = rows.lock().unwrap();
      let data = match request.operation_name.as_str() {
        "empresas" => json!({ "empresas": rows.clone() }),
        "deleteEmpresa" => {
          let id = request.variables["id"].clone();
          rows.retain(|row| row["id"] != id);
          json!({ "deleteEmpresa": true })
        }
        "createEmpresa" => {
          let mut row = request.variables["input"].clone();
          row["id"] = json!("3");
          rows.push(row.clone());
          json!({ "createEmpresa": row })
        }
        _ => Value::Null,
      };
      Ok(GraphQlResponse::ok(data))
    })
  }

  fn view(gateway: &Arc<MockGateway>) -> EntityListView<Empresa> {
    let cache = Arc::new(ResponseCache::new(chrono::Duration::minutes(5)));
    EntityListView::new(EntityHook::new(gateway.executor(), CacheLayer::new(cache)))
  }

  async fn settle(view: &mut EntityListView<Empresa>) {
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.tick();
  }

  #[tokio::test]
  async fn test_loads_on_open() {
    let gateway = gateway();
    let mut view = view(&gateway);
    settle(&mut view).await;
    assert_eq!(view.hook.items().len(), 2);
    assert_eq!(view.table_state.selected(), Some(0));
  }

  #[tokio::test]
  async fn test_delete_needs_confirmation() {
    let gateway = gateway();
    let mut view = view(&gateway);
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('D')));
    assert!(view.captures_input());
    view.handle_key(key(KeyCode::Char('n')));
    settle(&mut view).await;
    assert_eq!(gateway.call_count("deleteEmpresa"), 0);
    assert!(view.editor.is_none());

    view.handle_key(key(KeyCode::Char('j')));
    view.handle_key(key(KeyCode::Char('D')));
    view.handle_key(key(KeyCode::Char('y')));
    settle(&mut view).await;

    assert_eq!(gateway.call_count("deleteEmpresa"), 1);
    let names: Vec<String> = view.hook.items().into_iter().map(|e| e.nombre).collect();
    assert_eq!(names, vec!["Acme"]);
    assert_eq!(view.status(), Some((StatusKind::Info, "deleted empresa 2")));
  }

  #[tokio::test]
  async fn test_invalid_form_stays_open() {
    let gateway = gateway();
    let mut view = view(&gateway);
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('n')));
    for c in "Initech".chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
    view.handle_key(key(KeyCode::Tab));
    for c in "not-an-email".chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
    view.handle_key(key(KeyCode::Enter));
    settle(&mut view).await;

    assert!(view.editor.is_some());
    assert_eq!(gateway.call_count("createEmpresa"), 0);
  }

  #[tokio::test]
  async fn test_create_from_form() {
    let gateway = gateway();
    let mut view = view(&gateway);
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('n')));
    for (i, value) in ["Initech", "hola@initech.com", "software"].iter().enumerate() {
      if i > 0 {
        view.handle_key(key(KeyCode::Tab));
      }
      for c in value.chars() {
        view.handle_key(key(KeyCode::Char(c)));
      }
    }
    view.handle_key(key(KeyCode::Enter));
    assert!(view.editor.is_none());
    settle(&mut view).await;

    assert_eq!(gateway.call_count("createEmpresa"), 1);
    assert_eq!(view.hook.items().len(), 3);
    assert_eq!(view.status(), Some((StatusKind::Info, "saved empresa 3")));
  }

  #[tokio::test]
  async fn test_filter_narrows_rows() {
    let gateway = gateway();
    let mut view = view(&gateway);
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('/')));
    for c in "globex".chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
    view.handle_key(key(KeyCode::Enter));
    assert_eq!(view.selected().map(|e| e.id), Some("2".to_string()));

    // Esc clears the filter before leaving the screen
    assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::None);
    assert!(view.filter.is_empty());
    assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::Exit);
  }

  #[tokio::test]
  async fn test_title_shows_cache_age() {
    let gateway = gateway();
    let view = view(&gateway);
    let now = Utc::now();

    let cached = HookState::<Empresa> {
      source: Some(CacheSource::Cache),
      cached_at: Some(now - chrono::Duration::seconds(150)),
      ..HookState::default()
    };
    assert_eq!(view.title(&cached, 2, now), " Empresas [2] (cached 2m ago) ");

    let fresh = HookState::<Empresa> {
      source: Some(CacheSource::Network),
      ..HookState::default()
    };
    assert_eq!(view.title(&fresh, 2, now), " Empresas [2] ");
  }
}
