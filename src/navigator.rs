//! Drill-down navigation for the analytics screens.
//!
//! A [`Navigator`] tracks which view of a multi-level screen is showing and
//! remembers a bounded number of previous views. Each screen declares its
//! own closed set of views as an enum, so an unknown view cannot exist.

/// Default history depth: one step back.
pub const DEFAULT_MAX_DEPTH: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator<V> {
  root: V,
  current: V,
  history: Vec<V>,
  max_depth: usize,
}

impl<V: Clone> Navigator<V> {
  /// Start at `root` with a one-level history.
  pub fn new(root: V) -> Self {
    Self::with_max_depth(root, DEFAULT_MAX_DEPTH)
  }

  /// Start at `root` remembering up to `max_depth` previous views (at least 1).
  pub fn with_max_depth(root: V, max_depth: usize) -> Self {
    Self {
      current: root.clone(),
      root,
      history: Vec::new(),
      max_depth: max_depth.max(1),
    }
  }

  pub fn current(&self) -> &V {
    &self.current
  }

  /// Previous views, oldest first.
  pub fn history(&self) -> &[V] {
    &self.history
  }

  pub fn can_go_back(&self) -> bool {
    !self.history.is_empty()
  }

  /// Show `view`, remembering the current one. Any view is reachable from
  /// any other.
  pub fn navigate_to(&mut self, view: V) {
    let previous = std::mem::replace(&mut self.current, view);
    self.history.push(previous);
    if self.history.len() > self.max_depth {
      self.history.remove(0);
    }
  }

  /// Return to the previous view. `false` (and no change) when there is none.
  pub fn go_back(&mut self) -> bool {
    match self.history.pop() {
      Some(previous) => {
        self.current = previous;
        true
      }
      None => false,
    }
  }

  /// Back to the root view with an empty history.
  pub fn reset(&mut self) {
    self.current = self.root.clone();
    self.history.clear();
  }
}

impl<V: Clone + Default> Default for Navigator<V> {
  fn default() -> Self {
    Self::new(V::default())
  }
}

/// Views of the cluster explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClusterView {
  #[default]
  Overview,
  Candidates {
    cluster_id: i64,
  },
  CandidateDetail {
    candidate_id: String,
  },
}

/// Views of the entrepreneur KPI explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KpiView {
  #[default]
  Overview,
  Candidate {
    candidate_id: String,
  },
  Interviewer {
    interviewer_id: String,
  },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_starts_at_overview() {
    let nav: Navigator<ClusterView> = Navigator::default();
    assert_eq!(nav.current(), &ClusterView::Overview);
    assert!(!nav.can_go_back());
  }

  #[test]
  fn test_back_on_fresh_navigator_is_noop() {
    let mut nav: Navigator<ClusterView> = Navigator::default();
    assert!(!nav.go_back());
    assert_eq!(nav.current(), &ClusterView::Overview);
  }

  #[test]
  fn test_round_trip() {
    let a = ClusterView::Candidates { cluster_id: 2 };
    let b = ClusterView::CandidateDetail {
      candidate_id: "17".into(),
    };

    let mut nav = Navigator::new(ClusterView::Overview);
    nav.navigate_to(a.clone());
    nav.navigate_to(b.clone());
    assert_eq!(nav.current(), &b);

    assert!(nav.go_back());
    assert_eq!(nav.current(), &a);
  }

  #[test]
  fn test_default_depth_keeps_one_level() {
    let mut nav = Navigator::new(KpiView::Overview);
    nav.navigate_to(KpiView::Candidate {
      candidate_id: "1".into(),
    });
    nav.navigate_to(KpiView::Interviewer {
      interviewer_id: "e1".into(),
    });
    assert_eq!(nav.history().len(), 1);

    assert!(nav.go_back());
    assert!(matches!(nav.current(), KpiView::Candidate { .. }));
    assert!(!nav.go_back());
    assert!(matches!(nav.current(), KpiView::Candidate { .. }));
  }

  #[test]
  fn test_deeper_stack() {
    let mut nav = Navigator::with_max_depth(ClusterView::Overview, 3);
    nav.navigate_to(ClusterView::Candidates { cluster_id: 1 });
    nav.navigate_to(ClusterView::CandidateDetail {
      candidate_id: "9".into(),
    });

    assert!(nav.go_back());
    assert!(nav.go_back());
    assert_eq!(nav.current(), &ClusterView::Overview);
  }

  #[test]
  fn test_zero_depth_is_clamped() {
    let mut nav = Navigator::with_max_depth(ClusterView::Overview, 0);
    nav.navigate_to(ClusterView::Candidates { cluster_id: 4 });
    assert!(nav.go_back());
  }

  #[test]
  fn test_reset() {
    let mut nav = Navigator::new(ClusterView::Overview);
    nav.navigate_to(ClusterView::Candidates { cluster_id: 1 });
    nav.reset();
    assert_eq!(nav.current(), &ClusterView::Overview);
    assert!(nav.history().is_empty());
  }
}
