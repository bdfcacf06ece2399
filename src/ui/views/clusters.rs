use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::domain::analytics::{
  CandidateDetail, Cluster, ClusterCandidate, CANDIDATE_DETAIL, CLUSTERS, CLUSTER_CANDIDATES,
};
use crate::domain::AnalyticsClient;
use crate::navigator::{ClusterView, Navigator};
use crate::query::{Query, QueryState};
use crate::ui::clamp_selection;
use crate::ui::renderfns::{optional, score_color, truncate, StatusKind};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

/// Data behind whichever level is showing
#[derive(Debug, Clone)]
pub enum ClusterPanel {
  Clusters(Vec<Cluster>),
  Candidates(Vec<ClusterCandidate>),
  Candidate(Option<CandidateDetail>),
}

impl ClusterPanel {
  fn rows(&self) -> usize {
    match self {
      ClusterPanel::Clusters(c) => c.len(),
      ClusterPanel::Candidates(c) => c.len(),
      ClusterPanel::Candidate(_) => 0,
    }
  }
}

/// Clusters, then the candidates of one cluster, then one candidate.
pub struct ClusterExplorerView {
  analytics: AnalyticsClient,
  nav: Navigator<ClusterView>,
  query: Query<ClusterPanel>,
  table_state: TableState,
}

impl ClusterExplorerView {
  pub fn new(analytics: AnalyticsClient) -> Self {
    let nav = Navigator::new(ClusterView::Overview);
    let mut query = panel_query(analytics.clone(), nav.current().clone());
    query.fetch();
    Self {
      analytics,
      nav,
      query,
      table_state: TableState::default(),
    }
  }

  /// Replace the panel query after a transition.
  fn reload(&mut self) {
    self.query = panel_query(self.analytics.clone(), self.nav.current().clone());
    self.query.fetch();
    self.table_state.select(Some(0));
  }

  fn drill_down(&mut self) {
    let Some(index) = self.table_state.selected() else {
      return;
    };
    let next = match self.query.data() {
      Some(ClusterPanel::Clusters(clusters)) => clusters
        .get(index)
        .map(|c| ClusterView::Candidates { cluster_id: c.id }),
      Some(ClusterPanel::Candidates(candidates)) => {
        candidates
          .get(index)
          .map(|c| ClusterView::CandidateDetail {
            candidate_id: c.id.clone(),
          })
      }
      _ => None,
    };
    if let Some(view) = next {
      self.nav.navigate_to(view);
      self.reload();
    }
  }

  /// Drop the current level's cached result and load it again.
  fn refresh(&mut self) {
    let doc = match self.nav.current() {
      ClusterView::Overview => CLUSTERS,
      ClusterView::Candidates { .. } => CLUSTER_CANDIDATES,
      ClusterView::CandidateDetail { .. } => CANDIDATE_DETAIL,
    };
    self.analytics.invalidate(doc);
    self.query.refetch();
  }

  fn title(&self) -> String {
    let label = view_label(self.nav.current());
    match self.query.state() {
      QueryState::Loading => format!(" {} (loading...) ", label),
      QueryState::Success(panel) if panel.rows() > 0 => format!(" {} [{}] ", label, panel.rows()),
      _ => format!(" {} ", label),
    }
  }

  fn render_clusters(&mut self, frame: &mut Frame, area: Rect, block: Block, clusters: &[Cluster]) {
    let header = Row::new(["ID", "NOMBRE", "CANDIDATOS", "SILUETA", "HABILIDADES"])
      .style(Style::default().fg(Color::Yellow).bold());
    let rows = clusters.iter().map(|c| {
      Row::new(vec![
        Cell::from(c.id.to_string()),
        Cell::from(c.nombre.clone()).style(Style::default().fg(Color::Cyan)),
        Cell::from(c.total_candidatos.to_string()),
        Cell::from(c.silueta.map(|s| format!("{:.3}", s)).unwrap_or_else(|| "-".into())),
        Cell::from(truncate(&c.habilidades_clave.join(", "), 60)),
      ])
    });
    let widths = [
      Constraint::Length(6),
      Constraint::Percentage(25),
      Constraint::Length(11),
      Constraint::Length(9),
      Constraint::Fill(1),
    ];
    self.render_table(frame, area, block, header, rows.collect(), &widths);
  }

  fn render_candidates(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    block: Block,
    candidates: &[ClusterCandidate],
  ) {
    let header =
      Row::new(["ID", "NOMBRE", "PUNTAJE"]).style(Style::default().fg(Color::Yellow).bold());
    let rows = candidates.iter().map(|c| {
      let score = match c.puntaje {
        Some(p) => Cell::from(format!("{:.2}", p)).style(Style::default().fg(score_color(p))),
        None => Cell::from("-"),
      };
      Row::new(vec![Cell::from(c.id.clone()), Cell::from(c.nombre.clone()), score])
    });
    let widths = [Constraint::Length(10), Constraint::Fill(1), Constraint::Length(10)];
    self.render_table(frame, area, block, header, rows.collect(), &widths);
  }

  fn render_table(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    block: Block,
    header: Row,
    rows: Vec<Row>,
    widths: &[Constraint],
  ) {
    if rows.is_empty() {
      let paragraph = Paragraph::new("Nothing to show.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }
    let table = Table::new(rows, widths.to_vec())
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

impl View for ClusterExplorerView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Enter => self.drill_down(),
      KeyCode::Char('o') => {
        self.nav.reset();
        self.reload();
      }
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
        if !self.nav.go_back() {
          return ViewAction::Exit;
        }
        self.reload();
      }
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let rows = self.query.data().map(ClusterPanel::rows).unwrap_or(0);
    let selected = clamp_selection(self.table_state.selected(), rows);
    self.table_state.select(selected);

    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    // Clone out of the query so the table state can be borrowed mutably
    let panel = match self.query.state() {
      QueryState::Success(panel) => panel.clone(),
      QueryState::Error(e) => {
        let paragraph = Paragraph::new(format!("{}\nPress 'r' to retry.", e))
          .block(block.border_style(Style::default().fg(Color::Red)))
          .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
        return;
      }
      QueryState::Idle | QueryState::Loading => {
        let paragraph = Paragraph::new("Loading...")
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
      }
    };

    match panel {
      ClusterPanel::Clusters(clusters) => self.render_clusters(frame, area, block, &clusters),
      ClusterPanel::Candidates(candidates) => {
        self.render_candidates(frame, area, block, &candidates)
      }
      ClusterPanel::Candidate(detail) => {
        let paragraph = Paragraph::new(candidate_lines(detail.as_ref()))
          .block(block)
          .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
      }
    }
  }

  fn breadcrumb(&self) -> Vec<String> {
    self
      .nav
      .history()
      .iter()
      .chain(std::iter::once(self.nav.current()))
      .map(view_label)
      .collect()
  }

  fn tick(&mut self) {
    if self.query.poll() {
      let rows = self.query.data().map(ClusterPanel::rows).unwrap_or(0);
      let selected = clamp_selection(self.table_state.selected(), rows);
      self.table_state.select(selected);
    }
  }

  fn status(&self) -> Option<(StatusKind, &str)> {
    if self.query.is_loading() {
      return Some((StatusKind::Info, "loading..."));
    }
    self.query.error().map(|e| (StatusKind::Error, e))
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let esc = if self.nav.can_go_back() { "back" } else { "quit" };
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("enter", "open").with_priority(20),
      ShortcutInfo::new("o", "overview").with_priority(30),
      ShortcutInfo::new("r", "reload").with_priority(40),
      ShortcutInfo::new("esc", esc).with_priority(90),
    ]
  }
}

fn panel_query(analytics: AnalyticsClient, view: ClusterView) -> Query<ClusterPanel> {
  Query::new(move || {
    let analytics = analytics.clone();
    let view = view.clone();
    async move {
      match view {
        ClusterView::Overview => analytics.clusters().await.map(ClusterPanel::Clusters),
        ClusterView::Candidates { cluster_id } => analytics
          .cluster_candidates(cluster_id)
          .await
          .map(ClusterPanel::Candidates),
        ClusterView::CandidateDetail { candidate_id } => analytics
          .candidate(&candidate_id)
          .await
          .map(ClusterPanel::Candidate),
      }
    }
  })
}

fn view_label(view: &ClusterView) -> String {
  match view {
    ClusterView::Overview => "Clusters".to_string(),
    ClusterView::Candidates { cluster_id } => format!("Cluster {}", cluster_id),
    ClusterView::CandidateDetail { candidate_id } => format!("Candidato {}", candidate_id),
  }
}

pub(super) fn candidate_lines(detail: Option<&CandidateDetail>) -> Vec<Line<'static>> {
  let Some(c) = detail else {
    return vec![Line::styled(
      "Candidate not found.",
      Style::default().fg(Color::DarkGray),
    )];
  };

  let field = |label: &str, value: String| {
    Line::from(vec![
      Span::styled(format!("{:<22}", label), Style::default().fg(Color::DarkGray)),
      Span::raw(value),
    ])
  };

  vec![
    Line::styled(c.nombre.clone(), Style::default().fg(Color::Cyan).bold()),
    Line::raw(""),
    field("ID", c.id.clone()),
    field("Correo", optional(c.correo.as_deref())),
    field(
      "Cluster",
      c.cluster_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
    ),
    field("Postulaciones", c.postulaciones.to_string()),
    field("Entrevistas", c.entrevistas.to_string()),
    field(
      "Promedio evaluacion",
      c.promedio_evaluacion
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| "-".into()),
    ),
    field("Habilidades", c.habilidades.join(", ")),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{CacheLayer, ResponseCache};
  use crate::graphql::envelope::GraphQlResponse;
  use crate::graphql::DataError;
  use crate::graphql::testing::MockGateway;
  use crossterm::event::KeyModifiers;
  use serde_json::{json, Value};
  use std::sync::Arc;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn gateway() -> Arc<MockGateway> {
    MockGateway::new(|request| {
      let data = match request.operation_name.as_str() {
        "clusters" => json!({"clusters": [
          {"id": 0, "nombre": "Backend", "totalCandidatos": 2},
          {"id": 1, "nombre": "Datos", "totalCandidatos": 1}
        ]}),
        "candidatosCluster" => {
          let id = request.variables["clusterId"].as_i64().unwrap_or(-1);
          json!({"candidatosCluster": [
            {"id": format!("c{}", id), "nombre": "Ana", "puntaje": 0.8}
          ]})
        }
        "candidatoDetalle" => {
          json!({"candidatoDetalle": {"id": request.variables["id"], "nombre": "Ana"}})
        }
        _ => Value::Null,
      };
      Ok(GraphQlResponse::ok(data))
    })
  }

  fn explorer(gateway: &Arc<MockGateway>) -> ClusterExplorerView {
    let cache = Arc::new(ResponseCache::new(chrono::Duration::minutes(5)));
    ClusterExplorerView::new(AnalyticsClient::new(gateway.executor(), CacheLayer::new(cache)))
  }

  async fn settle(view: &mut ClusterExplorerView) {
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.tick();
  }

  #[tokio::test]
  async fn test_drill_down_and_back() {
    let gateway = gateway();
    let mut view = explorer(&gateway);
    settle(&mut view).await;

    view.table_state.select(Some(1));
    view.handle_key(key(KeyCode::Enter));
    assert_eq!(view.nav.current(), &ClusterView::Candidates { cluster_id: 1 });
    settle(&mut view).await;
    assert!(matches!(view.query.data(), Some(ClusterPanel::Candidates(c)) if c[0].id == "c1"));

    view.handle_key(key(KeyCode::Enter));
    assert_eq!(
      view.nav.current(),
      &ClusterView::CandidateDetail {
        candidate_id: "c1".into()
      }
    );
    settle(&mut view).await;
    assert_eq!(view.breadcrumb(), vec!["Cluster 1", "Candidato c1"]);

    // One level of history: back once, then the screen closes
    assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::None);
    assert_eq!(view.nav.current(), &ClusterView::Candidates { cluster_id: 1 });
    assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::Exit);
  }

  #[tokio::test]
  async fn test_back_reuses_cache() {
    let gateway = gateway();
    let mut view = explorer(&gateway);
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Enter));
    settle(&mut view).await;
    view.handle_key(key(KeyCode::Esc));
    settle(&mut view).await;

    assert!(matches!(view.query.data(), Some(ClusterPanel::Clusters(_))));
    assert_eq!(gateway.call_count("clusters"), 1);
  }

  #[tokio::test]
  async fn test_overview_resets() {
    let gateway = gateway();
    let mut view = explorer(&gateway);
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Enter));
    view.handle_key(key(KeyCode::Char('o')));
    assert_eq!(view.nav.current(), &ClusterView::Overview);
    assert!(view.nav.history().is_empty());
  }

  #[tokio::test]
  async fn test_refresh_bypasses_cache() {
    let gateway = gateway();
    let mut view = explorer(&gateway);
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('r')));
    settle(&mut view).await;
    assert_eq!(gateway.call_count("clusters"), 2);
  }

  fn esc_label(view: &ClusterExplorerView) -> Option<&'static str> {
    view.shortcuts().iter().find(|s| s.key == "esc").map(|s| s.label)
  }

  #[tokio::test]
  async fn test_status_follows_query() {
    let gateway = MockGateway::new(|_| Err(DataError::Network("down".into())));
    let mut view = explorer(&gateway);
    assert_eq!(view.status(), Some((StatusKind::Info, "loading...")));

    settle(&mut view).await;
    assert_eq!(
      view.status(),
      Some((StatusKind::Error, "could not reach the gateway: down"))
    );
  }

  #[tokio::test]
  async fn test_escape_label_tracks_history() {
    let gateway = gateway();
    let mut view = explorer(&gateway);
    settle(&mut view).await;
    assert_eq!(esc_label(&view), Some("quit"));
    assert_eq!(view.status(), None);

    view.handle_key(key(KeyCode::Enter));
    assert_eq!(esc_label(&view), Some("back"));
  }
}
