use chrono::{DateTime, Utc};
use shared::{
    domain::{Mode, Phase, SessionId},
    protocol::{RevealedResult, SessionView},
};

use crate::{
    collection::Collection,
    draw::{draw, ensure_drawable},
    error::PickError,
    item::Item,
    random::{RandomSource, RngSource},
};

/// The outcome of a draw while it waits for "keep" or "remove".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub mode: Mode,
    pub index: usize,
    pub item: Item,
    pub revealed_at: DateTime<Utc>,
}

impl From<&Reveal> for RevealedResult {
    fn from(reveal: &Reveal) -> Self {
        Self {
            mode: reveal.mode,
            item: reveal.item.as_str().to_string(),
            index: reveal.index,
            revealed_at: reveal.revealed_at,
        }
    }
}

#[derive(Debug, Clone)]
enum Stage {
    Idle,
    Drawing { mode: Mode },
    Showing(Reveal),
}

/// One user's jar, wheel and pending result.
///
/// Transitions: `Idle -> Drawing -> Showing -> Idle`. Nothing leaves
/// `Drawing` except [`PickerSession::complete_draw`], and the pools cannot be
/// edited while a draw is pending.
pub struct PickerSession {
    mode: Mode,
    jar: Collection,
    wheel: Collection,
    stage: Stage,
    source: Box<dyn RandomSource>,
}

impl Default for PickerSession {
    fn default() -> Self {
        Self::new(Box::new(RngSource::from_os()))
    }
}

impl std::fmt::Debug for PickerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerSession")
            .field("mode", &self.mode)
            .field("jar", &self.jar)
            .field("wheel", &self.wheel)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl PickerSession {
    pub fn new(source: Box<dyn RandomSource>) -> Self {
        Self {
            mode: Mode::default(),
            jar: Collection::new(),
            wheel: Collection::new(),
            stage: Stage::Idle,
            source,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Idle => Phase::Idle,
            Stage::Drawing { .. } => Phase::Drawing,
            Stage::Showing(_) => Phase::Showing,
        }
    }

    pub fn collection(&self, mode: Mode) -> &Collection {
        match mode {
            Mode::Jar => &self.jar,
            Mode::Wheel => &self.wheel,
        }
    }

    pub fn active(&self) -> &Collection {
        self.collection(self.mode)
    }

    pub fn result(&self) -> Option<&Reveal> {
        match &self.stage {
            Stage::Showing(reveal) => Some(reveal),
            _ => None,
        }
    }

    /// Switches the active pool. Leaving the wheel discards its options.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), PickError> {
        match self.stage {
            Stage::Drawing { .. } => return Err(PickError::DrawInProgress),
            Stage::Showing(_) => return Err(PickError::ResultPending),
            Stage::Idle => {}
        }
        if self.mode == Mode::Wheel && mode != Mode::Wheel {
            self.wheel.clear();
        }
        self.mode = mode;
        Ok(())
    }

    pub fn add(&mut self, raw: &str) -> Result<bool, PickError> {
        Ok(self.active_mut()?.add(raw))
    }

    pub fn add_lines(&mut self, raw: &str) -> Result<usize, PickError> {
        Ok(self.active_mut()?.add_lines(raw))
    }

    pub fn replace_lines(&mut self, raw: &str) -> Result<usize, PickError> {
        Ok(self.active_mut()?.replace_lines(raw))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Item, PickError> {
        self.active_mut()?.remove_at(index)
    }

    pub fn remove_value(&mut self, value: &str) -> Result<bool, PickError> {
        Ok(self.active_mut()?.remove_value(value))
    }

    pub fn clear(&mut self) -> Result<(), PickError> {
        self.active_mut()?.clear();
        Ok(())
    }

    pub fn can_draw(&self) -> bool {
        matches!(self.stage, Stage::Idle) && ensure_drawable(self.active(), self.mode).is_ok()
    }

    /// User-facing refusal shown instead of the draw action.
    pub fn draw_warning(&self) -> Option<String> {
        if ensure_drawable(self.active(), self.mode).is_ok() {
            return None;
        }
        Some(match self.mode {
            Mode::Jar => "Please add at least one item to the jar!".to_string(),
            Mode::Wheel => "Please add at least two items to the wheel!".to_string(),
        })
    }

    /// `Idle -> Drawing`. Checks the precondition up front so a refused draw
    /// never changes the session.
    pub fn begin_draw(&mut self) -> Result<Mode, PickError> {
        match self.stage {
            Stage::Drawing { .. } => return Err(PickError::DrawInProgress),
            Stage::Showing(_) => return Err(PickError::ResultPending),
            Stage::Idle => {}
        }
        ensure_drawable(self.active(), self.mode)?;
        self.stage = Stage::Drawing { mode: self.mode };
        Ok(self.mode)
    }

    /// `Drawing -> Showing`. The item is chosen here, after the pause.
    pub fn complete_draw(&mut self) -> Result<Reveal, PickError> {
        let Stage::Drawing { mode } = self.stage else {
            return Err(PickError::NotDrawing);
        };
        let collection = match mode {
            Mode::Jar => &self.jar,
            Mode::Wheel => &self.wheel,
        };
        let drawn = match draw(collection, mode, self.source.as_mut()) {
            Ok(drawn) => drawn,
            Err(err) => {
                self.stage = Stage::Idle;
                return Err(err);
            }
        };
        let reveal = Reveal {
            mode,
            index: drawn.index,
            item: drawn.item,
            revealed_at: Utc::now(),
        };
        self.stage = Stage::Showing(reveal.clone());
        Ok(reveal)
    }

    /// Both halves of a draw with no pause in between.
    pub fn draw_now(&mut self) -> Result<Reveal, PickError> {
        self.begin_draw()?;
        self.complete_draw()
    }

    /// `Showing -> Idle`, leaving the pools as they are.
    pub fn keep(&mut self) -> Result<Reveal, PickError> {
        self.take_reveal()
    }

    /// `Showing -> Idle`, removing one occurrence of the drawn value from the
    /// pool it was drawn from.
    pub fn remove_result(&mut self) -> Result<Reveal, PickError> {
        let reveal = self.take_reveal()?;
        let collection = match reveal.mode {
            Mode::Jar => &mut self.jar,
            Mode::Wheel => &mut self.wheel,
        };
        collection.remove_value(reveal.item.as_str());
        Ok(reveal)
    }

    pub fn view(&self, session_id: SessionId) -> SessionView {
        SessionView {
            session_id,
            mode: self.mode,
            jar: self.jar.to_strings(),
            wheel: self.wheel.to_strings(),
            phase: self.phase(),
            result: self.result().map(RevealedResult::from),
            can_draw: self.can_draw(),
            draw_warning: self.draw_warning(),
        }
    }

    fn take_reveal(&mut self) -> Result<Reveal, PickError> {
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Showing(reveal) => Ok(reveal),
            other => {
                self.stage = other;
                Err(PickError::NoResult)
            }
        }
    }

    fn active_mut(&mut self) -> Result<&mut Collection, PickError> {
        if matches!(self.stage, Stage::Drawing { .. }) {
            return Err(PickError::DrawInProgress);
        }
        Ok(match self.mode {
            Mode::Jar => &mut self.jar,
            Mode::Wheel => &mut self.wheel,
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
