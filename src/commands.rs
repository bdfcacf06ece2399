//! Command palette entries and their fuzzy lookup.

/// Screen or action reachable from the `:` palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Empresas,
  Ofertas,
  Postulaciones,
  Entrevistas,
  Evaluaciones,
  Visitas,
  Clusters,
  Kpis,
  Logout,
  Quit,
}

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  pub action: Action,
}

pub const COMMANDS: &[Command] = &[
  Command {
    name: "empresas",
    aliases: &["emp", "companies"],
    description: "Registered companies",
    action: Action::Empresas,
  },
  Command {
    name: "ofertas",
    aliases: &["of", "jobs"],
    description: "Job offers",
    action: Action::Ofertas,
  },
  Command {
    name: "postulaciones",
    aliases: &["po", "applications"],
    description: "Applications to offers",
    action: Action::Postulaciones,
  },
  Command {
    name: "entrevistas",
    aliases: &["en", "interviews"],
    description: "Scheduled interviews",
    action: Action::Entrevistas,
  },
  Command {
    name: "evaluaciones",
    aliases: &["ev", "scores"],
    description: "Interview evaluations",
    action: Action::Evaluaciones,
  },
  Command {
    name: "visitas",
    aliases: &["vi", "visits"],
    description: "Page visit log",
    action: Action::Visitas,
  },
  Command {
    name: "clusters",
    aliases: &["cl", "ml"],
    description: "Candidate clusters (drill down)",
    action: Action::Clusters,
  },
  Command {
    name: "kpis",
    aliases: &["k", "bi"],
    description: "Entrepreneur KPIs (drill down)",
    action: Action::Kpis,
  },
  Command {
    name: "logout",
    aliases: &["clear"],
    description: "Drop every cached response",
    action: Action::Logout,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit erp9s",
    action: Action::Quit,
  },
];

/// Exact name or alias, case-insensitive.
pub fn find(input: &str) -> Option<&'static Command> {
  let input = input.trim().to_lowercase();
  COMMANDS
    .iter()
    .find(|cmd| cmd.name == input || cmd.aliases.contains(&input.as_str()))
}

/// Commands matching `input`, best match first.
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| rank(cmd, &input_lower).map(|priority| (cmd, priority)))
    .collect();

  // Stable, so ties keep palette order
  matches.sort_by_key(|(_, priority)| *priority);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

fn rank(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    Some(0)
  } else if cmd.aliases.contains(&input) {
    Some(1)
  } else if cmd.name.starts_with(input) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    Some(3)
  } else if cmd.name.contains(input) {
    Some(4)
  } else if cmd.aliases.iter().any(|a| a.contains(input)) {
    Some(5)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    assert_eq!(get_suggestions("").len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_name_first() {
    let suggestions = get_suggestions("kpis");
    assert_eq!(suggestions[0].action, Action::Kpis);
  }

  #[test]
  fn test_alias_beats_prefix() {
    // "en" is an alias of entrevistas and a prefix of nothing else's name
    let suggestions = get_suggestions("en");
    assert_eq!(suggestions[0].name, "entrevistas");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("post");
    assert_eq!(suggestions[0].name, "postulaciones");
  }

  #[test]
  fn test_substring_match() {
    let suggestions = get_suggestions("uacion");
    assert_eq!(suggestions[0].name, "evaluaciones");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zzz").is_empty());
  }

  #[test]
  fn test_find_is_exact() {
    assert_eq!(find("Clusters").map(|c| c.action), Some(Action::Clusters));
    assert_eq!(find(" jobs ").map(|c| c.action), Some(Action::Ofertas));
    assert!(find("clus").is_none());
  }
}
