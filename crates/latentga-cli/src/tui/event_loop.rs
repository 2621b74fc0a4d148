use std::io;

use crossterm::event::{self, Event};

/// Event produced by [`EventLoop::next`].
#[derive(Debug, Clone, derive_more::IsVariant)]
pub(super) enum TuiEvent {
    /// The screen must be redrawn.
    Render,
    /// Terminal event such as key input or resize.
    Crossterm(Event),
}

/// Render-on-change event loop.
///
/// A render is requested once at startup and after every terminal event;
/// otherwise the loop blocks until the terminal reports something.
#[derive(Debug)]
pub(super) struct EventLoop {
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self { dirty: true }
    }
}

impl EventLoop {
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        if self.dirty {
            self.dirty = false;
            return Ok(TuiEvent::Render);
        }
        let event = event::read()?;
        self.dirty = true;
        Ok(TuiEvent::Crossterm(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_render() {
        let mut events = EventLoop::default();
        assert!(events.next().unwrap().is_render());
    }
}
