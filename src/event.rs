use crossterm::event::{self, Event as TerminalEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Input to the main loop
#[derive(Debug)]
pub enum Event {
  Key(KeyEvent),
  /// Redraw and poll view queries
  Tick,
  Resize,
}

/// Reads terminal input on a blocking thread and emits a tick whenever no
/// input arrived within `tick_rate`.
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
      let next = match event::poll(tick_rate) {
        Ok(true) => match event::read() {
          // Windows reports releases as well
          Ok(TerminalEvent::Key(key)) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
          Ok(TerminalEvent::Resize(..)) => Some(Event::Resize),
          Ok(_) => None,
          Err(e) => {
            tracing::warn!(error = %e, "failed to read terminal event");
            None
          }
        },
        Ok(false) => Some(Event::Tick),
        Err(_) => Some(Event::Tick),
      };

      if let Some(event) = next {
        if tx.send(event).is_err() {
          break;
        }
      }
    });

    Self { rx }
  }

  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
