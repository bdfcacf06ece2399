use chrono::Duration;
use ratatui::prelude::Color;

/// Truncate to `max_len` characters, ending in "..." when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Colour for an application or offer state as the gateway spells it.
pub fn estado_color(estado: &str) -> Color {
  match estado.to_lowercase().as_str() {
    "aceptada" | "aceptado" | "contratado" | "activa" | "abierta" => Color::Green,
    "rechazada" | "rechazado" | "cerrada" | "cancelada" => Color::Red,
    "en revision" | "en revisión" | "entrevista" | "pendiente" => Color::Yellow,
    _ => Color::White,
  }
}

/// Score out of ten, coloured by band.
pub fn score_color(score: f64) -> Color {
  if score >= 7.0 {
    Color::Green
  } else if score >= 4.0 {
    Color::Yellow
  } else {
    Color::Red
  }
}

/// `None` renders as a dash.
pub fn optional(value: Option<&str>) -> String {
  value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

/// Compact age such as `45s`, `2m` or `1h`.
pub fn format_age(age: Duration) -> String {
  let secs = age.num_seconds().max(0);
  if secs < 60 {
    format!("{}s", secs)
  } else if secs < 3600 {
    format!("{}m", secs / 60)
  } else {
    format!("{}h", secs / 3600)
  }
}
