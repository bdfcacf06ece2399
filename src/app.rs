use crate::commands::Action;
use crate::config::Config;
use crate::domain::{Empresa, Entrevista, Evaluacion, OfertaTrabajo, Postulacion, Visita};
use crate::event::{Event, EventHandler};
use crate::session::Session;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::{gateway_host, StatusKind};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{ClusterExplorerView, EntityListView, KpiExplorerView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
  session: Session,
  /// Header title: configured, else the gateway host
  title: String,
  /// Root screen, replaced through the command palette
  screen: Box<dyn View>,
  palette: CommandInput,
  /// App-level message; wins over the screen's own until the next key
  message: Option<(StatusKind, String)>,
  should_quit: bool,
}

impl App {
  /// Must be called inside the tokio runtime; the first screen starts
  /// loading right away.
  pub fn new(config: &Config, session: Session) -> Self {
    let title = config
      .title
      .clone()
      .unwrap_or_else(|| gateway_host(&config.gateway.url));
    let screen = open(Action::Empresas, &session);

    Self {
      session,
      title,
      screen,
      palette: CommandInput::new(),
      message: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let outcome = self.event_loop().await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    outcome
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.screen.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }
    self.message = None;

    if !self.screen.captures_input() {
      match self.palette.handle_key(key) {
        KeyResult::Handled | KeyResult::Event(CommandEvent::Cancelled) => return,
        KeyResult::Event(CommandEvent::Run(action)) => return self.run_action(action),
        KeyResult::Event(CommandEvent::Unknown(input)) => {
          self.message = Some((StatusKind::Error, format!("unknown command: {}", input)));
          return;
        }
        KeyResult::NotHandled => {}
      }
    }

    if self.screen.handle_key(key) == ViewAction::Exit {
      self.should_quit = true;
    }
  }

  fn run_action(&mut self, action: Action) {
    match action {
      Action::Quit => self.should_quit = true,
      Action::Logout => {
        self.session.logout();
        self.message = Some((StatusKind::Info, "cache cleared".to_string()));
      }
      screen => {
        info!(?screen, "switching screen");
        self.screen = open(screen, &self.session);
      }
    }
  }

  pub fn screen(&self) -> &dyn View {
    self.screen.as_ref()
  }

  pub fn screen_mut(&mut self) -> &mut dyn View {
    self.screen.as_mut()
  }

  pub fn palette(&self) -> &CommandInput {
    &self.palette
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn status(&self) -> Option<(StatusKind, &str)> {
    match &self.message {
      Some((kind, message)) => Some((*kind, message.as_str())),
      None => self.screen.status(),
    }
  }
}

/// Build the root screen for a palette action.
fn open(action: Action, session: &Session) -> Box<dyn View> {
  match action {
    Action::Ofertas => Box::new(EntityListView::new(session.hook::<OfertaTrabajo>())),
    Action::Postulaciones => Box::new(EntityListView::new(session.hook::<Postulacion>())),
    Action::Entrevistas => Box::new(EntityListView::new(session.hook::<Entrevista>())),
    Action::Evaluaciones => Box::new(EntityListView::new(session.hook::<Evaluacion>())),
    Action::Visitas => Box::new(EntityListView::new(session.hook::<Visita>())),
    Action::Clusters => Box::new(ClusterExplorerView::new(session.analytics())),
    Action::Kpis => Box::new(KpiExplorerView::new(session.analytics())),
    Action::Empresas | Action::Logout | Action::Quit => {
      Box::new(EntityListView::new(session.hook::<Empresa>()))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::ResponseCache;
  use crate::graphql::envelope::GraphQlResponse;
  use crate::graphql::testing::MockGateway;
  use serde_json::{json, Value};
  use std::sync::Arc;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn app() -> (App, Arc<MockGateway>) {
    let gateway = MockGateway::new(|request| {
      let data = match request.operation_name.as_str() {
        "clusters" => json!({"clusters": []}),
        name => json!({ name: [] }),
      };
      Ok(GraphQlResponse::ok(data))
    });
    let session = Session::new(
      gateway.executor(),
      Arc::new(ResponseCache::new(chrono::Duration::minutes(5))),
    );
    let config =
      Config::default().with_gateway_override(Some("http://localhost:4000/graphql".into()));
    (App::new(&config, session), gateway)
  }

  fn command(app: &mut App, name: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in name.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_starts_on_empresas() {
    let (app, _) = app();
    assert_eq!(app.screen().breadcrumb(), vec!["Empresas"]);
    assert_eq!(app.title(), "localhost:4000");
  }

  #[tokio::test]
  async fn test_palette_switches_screen() {
    let (mut app, _) = app();
    command(&mut app, "clusters");
    assert_eq!(app.screen().breadcrumb(), vec!["Clusters"]);

    command(&mut app, "of");
    assert_eq!(app.screen().breadcrumb(), vec!["Ofertas"]);
  }

  #[tokio::test]
  async fn test_unknown_command_reports() {
    let (mut app, _) = app();
    command(&mut app, "zzz");
    assert_eq!(app.status(), Some((StatusKind::Error, "unknown command: zzz")));
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_logout_clears_cache() {
    let (mut app, gateway) = app();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(gateway.call_count("empresas"), 1);
    assert!(!app.session.cache().is_empty());

    command(&mut app, "logout");
    assert!(app.session.cache().is_empty());
    assert_eq!(app.status(), Some((StatusKind::Info, "cache cleared")));
  }

  #[tokio::test]
  async fn test_quit_from_root_screen() {
    let (mut app, _) = app();
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_ctrl_c_quits() {
    let (mut app, _) = app();
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_open_covers_every_screen() {
    let gateway = MockGateway::new(|_| Ok(GraphQlResponse::ok(Value::Null)));
    let session = Session::new(
      gateway.executor(),
      Arc::new(ResponseCache::new(chrono::Duration::minutes(5))),
    );
    for action in [
      Action::Postulaciones,
      Action::Entrevistas,
      Action::Evaluaciones,
      Action::Visitas,
      Action::Kpis,
    ] {
      assert_eq!(open(action, &session).breadcrumb().len(), 1);
    }
  }
}
