use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::domain::analytics::{
  CandidateDetail, InterviewerDetail, KpiReport, PersonRef, CANDIDATE_DETAIL, ENTREPRENEUR_KPIS,
  INTERVIEWER_DETAIL,
};
use crate::domain::AnalyticsClient;
use crate::navigator::{KpiView, Navigator};
use crate::query::{Query, QueryState};
use crate::ui::clamp_selection;
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::renderfns::{optional, score_color, StatusKind};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::clusters::candidate_lines;

#[derive(Debug, Clone)]
pub enum KpiPanel {
  Report(Option<KpiReport>),
  Candidate(Option<CandidateDetail>),
  Interviewer(Option<InterviewerDetail>),
}

/// A drill-down target listed in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
  Candidate,
  Interviewer,
}

/// People of a report in display order: candidates, then interviewers.
fn people(report: &KpiReport) -> Vec<(Role, &PersonRef)> {
  report
    .candidatos
    .iter()
    .map(|p| (Role::Candidate, p))
    .chain(report.entrevistadores.iter().map(|p| (Role::Interviewer, p)))
    .collect()
}

/// KPIs of one entrepreneur's company, then a candidate or interviewer.
pub struct KpiExplorerView {
  analytics: AnalyticsClient,
  nav: Navigator<KpiView>,
  search: SearchInput,
  term: String,
  /// `None` until a company has been searched for
  query: Option<Query<KpiPanel>>,
  table_state: TableState,
}

impl KpiExplorerView {
  pub fn new(analytics: AnalyticsClient) -> Self {
    Self {
      analytics,
      nav: Navigator::new(KpiView::Overview),
      search: SearchInput::new("Company"),
      term: String::new(),
      query: None,
      table_state: TableState::default(),
    }
  }

  fn reload(&mut self) {
    self.table_state.select(Some(0));
    if self.term.is_empty() && *self.nav.current() == KpiView::Overview {
      self.query = None;
      return;
    }
    let mut query = panel_query(
      self.analytics.clone(),
      self.nav.current().clone(),
      self.term.clone(),
    );
    query.fetch();
    self.query = Some(query);
  }

  fn panel(&self) -> Option<&KpiPanel> {
    self.query.as_ref().and_then(Query::data)
  }

  fn drill_down(&mut self) {
    let Some(index) = self.table_state.selected() else {
      return;
    };
    let next = match self.panel() {
      Some(KpiPanel::Report(Some(report))) => {
        people(report)
          .get(index)
          .map(|(role, person)| match role {
            Role::Candidate => KpiView::Candidate {
              candidate_id: person.id.clone(),
            },
            Role::Interviewer => KpiView::Interviewer {
              interviewer_id: person.id.clone(),
            },
          })
      }
      _ => None,
    };
    if let Some(view) = next {
      self.nav.navigate_to(view);
      self.reload();
    }
  }

  fn refresh(&mut self) {
    let doc = match self.nav.current() {
      KpiView::Overview => ENTREPRENEUR_KPIS,
      KpiView::Candidate { .. } => CANDIDATE_DETAIL,
      KpiView::Interviewer { .. } => INTERVIEWER_DETAIL,
    };
    if let Some(query) = self.query.as_mut() {
      self.analytics.invalidate(doc);
      query.refetch();
    }
  }

  fn label(&self, view: &KpiView) -> String {
    match view {
      KpiView::Overview if self.term.is_empty() => "KPIs".to_string(),
      KpiView::Overview => format!("KPIs [{}]", self.term),
      KpiView::Candidate { candidate_id } => format!("Candidato {}", candidate_id),
      KpiView::Interviewer { interviewer_id } => format!("Entrevistador {}", interviewer_id),
    }
  }

  fn render_report(&mut self, frame: &mut Frame, area: Rect, block: Block, report: &KpiReport) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(3), Constraint::Min(0)])
      .split(inner);

    let stat = |label: &'static str, value: String| {
      vec![
        Span::styled(format!("{} ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White).bold()),
        Span::raw("   "),
      ]
    };
    let summary = vec![
      Line::styled(report.empresa.clone(), Style::default().fg(Color::Cyan).bold()),
      Line::from(
        [
          stat("Ofertas activas", report.ofertas_activas.to_string()),
          stat("Postulaciones", report.postulaciones.to_string()),
          stat("Entrevistas", report.entrevistas.to_string()),
          stat("Conversion", format!("{:.1}%", report.tasa_conversion * 100.0)),
        ]
        .concat(),
      ),
    ];
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let rows: Vec<Row> = people(report)
      .into_iter()
      .map(|(role, person)| {
        let kind = match role {
          Role::Candidate => Cell::from("candidato").style(Style::default().fg(Color::Green)),
          Role::Interviewer => {
            Cell::from("entrevistador").style(Style::default().fg(Color::Magenta))
          }
        };
        Row::new(vec![
          kind,
          Cell::from(person.id.clone()),
          Cell::from(person.nombre.clone()),
          Cell::from(optional(person.detalle.as_deref())),
        ])
      })
      .collect();

    if rows.is_empty() {
      let empty = Paragraph::new("No people listed for this company.")
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(empty, chunks[1]);
      return;
    }

    let header = Row::new(["ROL", "ID", "NOMBRE", "DETALLE"])
      .style(Style::default().fg(Color::Yellow).bold());
    let table = Table::new(
      rows,
      [
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Percentage(40),
        Constraint::Fill(1),
      ],
    )
    .header(header)
    .row_highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");
    frame.render_stateful_widget(table, chunks[1], &mut self.table_state);
  }

  fn selectable_rows(&self) -> usize {
    match self.panel() {
      Some(KpiPanel::Report(Some(report))) => {
        report.candidatos.len() + report.entrevistadores.len()
      }
      _ => 0,
    }
  }
}

impl View for KpiExplorerView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.search.handle_key(key, &self.term) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(SearchEvent::Submitted(term)) => {
        self.term = term;
        self.nav.reset();
        self.reload();
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cancelled) => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

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
    let selected = clamp_selection(self.table_state.selected(), self.selectable_rows());
    self.table_state.select(selected);

    let loading = self.query.as_ref().is_some_and(Query::is_loading);
    let mut title = format!(" {} ", self.label(self.nav.current()));
    if loading {
      title.push_str("(loading...) ");
    }
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let state = self.query.as_ref().map(|q| q.state().clone());
    match state {
      None => {
        let hint = Paragraph::new("Press / and type a company name to load its KPIs.")
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, area);
      }
      Some(QueryState::Idle) | Some(QueryState::Loading) => {
        let paragraph = Paragraph::new("Loading...")
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
      }
      Some(QueryState::Error(e)) => {
        let paragraph = Paragraph::new(format!("{}\nPress 'r' to retry.", e))
          .block(block.border_style(Style::default().fg(Color::Red)))
          .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
      }
      Some(QueryState::Success(KpiPanel::Report(Some(report)))) => {
        self.render_report(frame, area, block, &report)
      }
      Some(QueryState::Success(KpiPanel::Report(None))) => {
        let paragraph = Paragraph::new(format!("No company matches '{}'.", self.term))
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
      }
      Some(QueryState::Success(KpiPanel::Candidate(detail))) => {
        let paragraph = Paragraph::new(candidate_lines(detail.as_ref()))
          .block(block)
          .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
      }
      Some(QueryState::Success(KpiPanel::Interviewer(detail))) => {
        let paragraph = Paragraph::new(interviewer_lines(detail.as_ref()))
          .block(block)
          .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
      }
    }

    self.search.render_overlay(frame, area);
  }

  fn breadcrumb(&self) -> Vec<String> {
    self
      .nav
      .history()
      .iter()
      .chain(std::iter::once(self.nav.current()))
      .map(|view| self.label(view))
      .collect()
  }

  fn tick(&mut self) {
    let changed = self.query.as_mut().is_some_and(Query::poll);
    if changed {
      let selected = clamp_selection(self.table_state.selected(), self.selectable_rows());
      self.table_state.select(selected);
    }
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn status(&self) -> Option<(StatusKind, &str)> {
    self.query.as_ref()?.error().map(|e| (StatusKind::Error, e))
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let esc = if self.nav.can_go_back() { "back" } else { "quit" };
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "company").with_priority(20),
      ShortcutInfo::new("enter", "open").with_priority(30),
      ShortcutInfo::new("o", "overview").with_priority(40),
      ShortcutInfo::new("r", "reload").with_priority(50),
      ShortcutInfo::new("esc", esc).with_priority(90),
    ]
  }
}

fn panel_query(analytics: AnalyticsClient, view: KpiView, term: String) -> Query<KpiPanel> {
  Query::new(move || {
    let analytics = analytics.clone();
    let view = view.clone();
    let term = term.clone();
    async move {
      match view {
        KpiView::Overview => analytics
          .entrepreneur_kpis(&term)
          .await
          .map(KpiPanel::Report),
        KpiView::Candidate { candidate_id } => analytics
          .candidate(&candidate_id)
          .await
          .map(KpiPanel::Candidate),
        KpiView::Interviewer { interviewer_id } => analytics
          .interviewer(&interviewer_id)
          .await
          .map(KpiPanel::Interviewer),
      }
    }
  })
}

fn interviewer_lines(detail: Option<&InterviewerDetail>) -> Vec<Line<'static>> {
  let Some(i) = detail else {
    return vec![Line::styled(
      "Interviewer not found.",
      Style::default().fg(Color::DarkGray),
    )];
  };

  let rating = match i.promedio_calificacion {
    Some(p) => Span::styled(format!("{:.2}", p), Style::default().fg(score_color(p))),
    None => Span::raw("-"),
  };
  let label = |text: &str| {
    Span::styled(format!("{:<24}", text), Style::default().fg(Color::DarkGray))
  };

  vec![
    Line::styled(i.nombre.clone(), Style::default().fg(Color::Cyan).bold()),
    Line::raw(""),
    Line::from(vec![label("ID"), Span::raw(i.id.clone())]),
    Line::from(vec![
      label("Entrevistas realizadas"),
      Span::raw(i.entrevistas_realizadas.to_string()),
    ]),
    Line::from(vec![label("Promedio calificacion"), rating]),
    Line::from(vec![label("Empresas"), Span::raw(i.empresas.join(", "))]),
  ]
}
