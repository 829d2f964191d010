//! Collaborators the scanner reports to.
//!
//! The voice engine turns key transitions into sounding notes, the bellows
//! sensor tells how hard the instrument is being played. Both live outside
//! this crate; the scanner only needs the narrow interfaces below.

use crate::matrix::KeyPos;

/// Raw expression reading taken from the bellows sensor.
pub type Expression = u16;

/// Receiver of key transitions.
///
/// Calls are fire-and-forget: the scanner does not look at the outcome and
/// never retries. Not finding a free voice is the engine's own business.
pub trait VoiceEngine {
    /// A key became held.
    fn press(&mut self, row: u8, col: u8, expression: Expression);

    /// A held key was let go.
    fn release(&mut self, row: u8, col: u8);
}

impl<T: VoiceEngine + ?Sized> VoiceEngine for &mut T {
    fn press(&mut self, row: u8, col: u8, expression: Expression) {
        (**self).press(row, col, expression)
    }

    fn release(&mut self, row: u8, col: u8) {
        (**self).release(row, col)
    }
}

/// Source of the expression value attached to every press.
pub trait ExpressionSensor {
    fn read_expression(&mut self) -> Expression;
}

impl<T: ExpressionSensor + ?Sized> ExpressionSensor for &mut T {
    fn read_expression(&mut self) -> Expression {
        (**self).read_expression()
    }
}

/// Voice engine used when the audio side is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVoice;

impl VoiceEngine for NoVoice {
    fn press(&mut self, _row: u8, _col: u8, _expression: Expression) {}

    fn release(&mut self, _row: u8, _col: u8) {}
}

/// Expression sensor that always reads the same value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedExpression(pub Expression);

impl ExpressionSensor for FixedExpression {
    fn read_expression(&mut self) -> Expression {
        self.0
    }
}

/// A detected key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Press { pos: KeyPos, expression: Expression },
    Release { pos: KeyPos },
}

impl KeyEvent {
    pub fn pos(&self) -> KeyPos {
        match self {
            KeyEvent::Press { pos, .. } | KeyEvent::Release { pos } => *pos,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, KeyEvent::Press { .. })
    }

    /// Forward the event to a voice engine.
    pub fn dispatch<V: VoiceEngine + ?Sized>(self, voice: &mut V) {
        match self {
            KeyEvent::Press { pos, expression } => voice.press(pos.row, pos.col, expression),
            KeyEvent::Release { pos } => voice.release(pos.row, pos.col),
        }
    }
}
