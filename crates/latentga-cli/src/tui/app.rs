use crossterm::event::Event;
use ratatui::Frame;

/// A screen driven by [`Tui::run`](super::Tui::run).
pub trait App {
    /// Checked before every event; `true` ends the run.
    fn should_exit(&self) -> bool;

    /// Reacts to a key press, resize or other terminal event.
    fn handle_event(&mut self, event: &Event);

    /// Renders the whole screen into `frame`.
    fn draw(&self, frame: &mut Frame);
}
