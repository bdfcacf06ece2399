use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Logo, gateway host or configured title, current screen, then shortcuts.
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  screen: &str,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(" erp9s ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", screen), Style::default().fg(Color::Yellow).bold()),
    Span::raw(" "),
  ];

  let mut sorted: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  sorted.sort_by_key(|s| s.priority);
  for shortcut in sorted {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Host (and port) of the gateway URL, for the header.
pub fn gateway_host(url: &str) -> String {
  match url::Url::parse(url) {
    Ok(parsed) => match (parsed.host_str(), parsed.port()) {
      (Some(host), Some(port)) => format!("{}:{}", host, port),
      (Some(host), None) => host.to_string(),
      _ => url.to_string(),
    },
    Err(_) => url.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_gateway_host() {
    assert_eq!(
      gateway_host("https://gateway.example.com/graphql"),
      "gateway.example.com"
    );
    assert_eq!(gateway_host("http://localhost:4000/graphql"), "localhost:4000");
    assert_eq!(gateway_host("not a url"), "not a url");
  }
}
