use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
}

/// Чтение событий терминала в отдельном потоке
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match crossterm::event::poll(timeout) {
                    Ok(true) => {
                        let event = match crossterm::event::read() {
                            // Только нажатия, без повторов и отпусканий
                            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                                Some(TuiEvent::Key(key))
                            }
                            Ok(Event::Resize(width, height)) => {
                                Some(TuiEvent::Resize(width, height))
                            }
                            Ok(_) => None,
                            Err(e) => {
                                warn!("Failed to read terminal event: {e}");
                                break;
                            }
                        };
                        if let Some(event) = event {
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Failed to poll terminal events: {e}");
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.send(TuiEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        EventHandler { receiver }
    }

    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.receiver.recv().await
    }
}

pub fn should_quit(key: &KeyEvent) -> bool {
    matches!(
        (key.code, key.modifiers),
        (KeyCode::Char('q'), KeyModifiers::NONE)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Esc, _)
    )
}
