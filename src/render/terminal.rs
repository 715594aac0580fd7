//! Line-oriented terminal renderer.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use super::{Renderer, SenderLabels};
use crate::message::Message;

struct Output {
    writer: Box<dyn Write + Send>,
    messages: usize,
    indicators: usize,
}

/// Prints messages as `[HH:MM] Label: text` lines.
///
/// Terminal output cannot be taken back, so hiding the typing indicator and
/// clearing the list only update bookkeeping (clearing also prints a rule).
pub struct TerminalRenderer {
    labels: SenderLabels,
    output: Mutex<Output>,
}

impl fmt::Debug for TerminalRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self.output();
        f.debug_struct("TerminalRenderer")
            .field("labels", &self.labels)
            .field("messages", &output.messages)
            .field("indicators", &output.indicators)
            .finish_non_exhaustive()
    }
}

impl TerminalRenderer {
    /// Render to standard output.
    #[must_use]
    pub fn stdout(labels: SenderLabels) -> Self {
        Self::new(labels, io::stdout())
    }

    /// Render to an arbitrary writer.
    pub fn new(labels: SenderLabels, writer: impl Write + Send + 'static) -> Self {
        Self {
            labels,
            output: Mutex::new(Output {
                writer: Box::new(writer),
                messages: 0,
                indicators: 0,
            }),
        }
    }

    fn output(&self) -> MutexGuard<'_, Output> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(output: &mut Output, line: &str) {
        if let Err(e) = writeln!(output.writer, "{line}").and_then(|()| output.writer.flush()) {
            warn!(name: "render.terminal.write_failed", error = %e, "Failed to write to terminal");
        }
    }
}

impl Renderer for TerminalRenderer {
    fn append_message(&self, message: &Message) {
        let line = format!(
            "[{}] {}: {}",
            message.timestamp,
            self.labels.label(message.sender),
            message.text
        );
        let mut output = self.output();
        output.messages += 1;
        Self::write_line(&mut output, &line);
    }

    fn show_typing_indicator(&self) {
        let line = format!("{} is typing...", self.labels.bot);
        let mut output = self.output();
        output.indicators += 1;
        Self::write_line(&mut output, &line);
    }

    fn hide_typing_indicator(&self) {
        self.output().indicators = 0;
    }

    fn clear_messages(&self) {
        let mut output = self.output();
        output.messages = 0;
        output.indicators = 0;
        Self::write_line(&mut output, "----------------------------------------");
    }

    fn is_empty(&self) -> bool {
        let output = self.output();
        output.messages == 0 && output.indicators == 0
    }

    fn scroll_to_bottom(&self) {}

    fn clear_input(&self) {}

    fn focus_input(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::FixedClock;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn prints_messages_and_indicator() {
        let buf = SharedBuf::default();
        let renderer = TerminalRenderer::new(SenderLabels::default(), buf.clone());
        assert!(renderer.is_empty());

        renderer.append_message(&Message::user("Hello", &FixedClock::at(10, 30)));
        renderer.show_typing_indicator();
        renderer.hide_typing_indicator();
        renderer.append_message(&Message::bot("Hi there!", &FixedClock::at(10, 31)));

        assert_eq!(
            buf.text(),
            "[10:30] You: Hello\nPoBot is typing...\n[10:31] PoBot: Hi there!\n"
        );
        assert!(!renderer.is_empty());
    }

    #[test]
    fn clear_resets_bookkeeping() {
        let buf = SharedBuf::default();
        let renderer = TerminalRenderer::new(SenderLabels::default(), buf);
        renderer.append_message(&Message::bot("one", &FixedClock::at(10, 30)));

        renderer.clear_messages();
        assert!(renderer.is_empty());
    }
}
