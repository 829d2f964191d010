//! Key matrix scanner.
//!
//! Each sweep addresses the 8 columns one after another through the column
//! decoder and samples the 6 row lines for every column. The fresh matrix is
//! then compared with the committed one in two passes: every release in the
//! whole matrix is reported before any press, so voices freed by lifted keys
//! are back in the pool when new notes ask for one.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::address::{ADDRESS_LINES, ColumnAddress};
use crate::config::ScanConfig;
use crate::matrix::{KeyMatrix, KeyPos, ROWS};
use crate::timer::ScanTimer;
use crate::voice::{ExpressionSensor, KeyEvent, VoiceEngine};

/// Scanner of the instrument's 6x8 key switch matrix.
///
/// Create exactly one and hand it to the loop that polls [`MatrixScanner::scan`].
pub struct MatrixScanner<In, Out, Diag, D, V, E> {
    /// Row input lines, pulled up. A closed switch pulls its line low.
    row_pins: [In; ROWS],
    /// Column decoder address lines A, B and C
    address_pins: [Out; ADDRESS_LINES],
    /// High while the rows of a column are sampled
    diagnostic_pin: Diag,
    /// Settle delay provider
    delay: D,
    voice: V,
    expression: E,
    config: ScanConfig,
    timer: ScanTimer,
    /// Matrix read by the latest sweep
    current: KeyMatrix,
    /// Last committed matrix
    previous: KeyMatrix,
}

impl<In, Out, Diag, D, V, E> MatrixScanner<In, Out, Diag, D, V, E>
where
    In: InputPin,
    Out: OutputPin,
    Diag: OutputPin,
    D: DelayNs,
    V: VoiceEngine,
    E: ExpressionSensor,
{
    /// Create a scanner. All keys are assumed released and the scan timer
    /// starts counting now.
    pub fn new(
        row_pins: [In; ROWS],
        address_pins: [Out; ADDRESS_LINES],
        diagnostic_pin: Diag,
        delay: D,
        voice: V,
        expression: E,
        config: ScanConfig,
    ) -> Self {
        info!(
            "Key matrix scanner created, interval: {}ms, settle time: {}us",
            config.scan_interval.as_millis(),
            config.settle_time_us
        );
        Self {
            row_pins,
            address_pins,
            diagnostic_pin,
            delay,
            voice,
            expression,
            config,
            timer: ScanTimer::new(config.scan_interval),
            current: KeyMatrix::new(),
            previous: KeyMatrix::new(),
        }
    }

    /// Scan the matrix if a scan is due, reporting every key change to the
    /// voice engine. Call it from the main loop as often as convenient.
    pub fn scan(&mut self) {
        self.scan_at(Instant::now());
    }

    /// Same as [`MatrixScanner::scan`] with the current time given
    /// explicitly. Returns `true` if a sweep was performed.
    pub fn scan_at(&mut self, now: Instant) -> bool {
        if !self.timer.is_due_at(now) {
            trace!("Scan not due yet");
            return false;
        }

        self.sweep();

        let released = self.commit_releases();
        let pressed = self.commit_presses();
        if released + pressed > 0 {
            debug!("Key matrix changed, {} released, {} pressed", released, pressed);
            self.log_matrix();
        }

        self.timer.consume();
        true
    }

    /// Read every switch into the sampled matrix without comparing or
    /// reporting anything.
    pub fn sweep(&mut self) -> &KeyMatrix {
        for addr in ColumnAddress::all() {
            self.select_column(addr);

            self.diagnostic_pin.set_high().ok();
            for (row, pin) in self.row_pins.iter_mut().enumerate() {
                // Rows are active low, a failed read counts as open
                let closed = pin.is_low().ok().unwrap_or_default();
                self.current.set(row, addr.col() as usize, closed);
            }
            self.diagnostic_pin.set_low().ok();
        }
        &self.current
    }

    /// Put the column address on the decoder lines, waiting for the lines
    /// to settle after each bit.
    fn select_column(&mut self, addr: ColumnAddress) {
        for (line, pin) in self.address_pins.iter_mut().enumerate() {
            if addr.bit(line) {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
            self.delay.delay_us(self.config.settle_time_us);
        }
    }

    /// First pass: report and commit every key that was let go.
    fn commit_releases(&mut self) -> usize {
        let mut released = 0;
        for (row, col, closed) in self.current.iter_column_major() {
            if closed || self.previous.get(row, col) != Some(true) {
                continue;
            }
            let pos = KeyPos {
                row: row as u8,
                col: col as u8,
            };
            debug!("Key released: {:?}", pos);
            KeyEvent::Release { pos }.dispatch(&mut self.voice);
            self.previous.set(row, col, false);
            released += 1;
        }
        released
    }

    /// Second pass: report and commit every newly held key, each with a
    /// fresh expression reading.
    fn commit_presses(&mut self) -> usize {
        let mut pressed = 0;
        for (row, col, closed) in self.current.iter_column_major() {
            if !closed || self.previous.get(row, col) != Some(false) {
                continue;
            }
            let pos = KeyPos {
                row: row as u8,
                col: col as u8,
            };
            let expression = self.expression.read_expression();
            debug!("Key pressed: {:?}, expression: {}", pos, expression);
            KeyEvent::Press { pos, expression }.dispatch(&mut self.voice);
            self.previous.set(row, col, true);
            pressed += 1;
        }
        pressed
    }

    fn log_matrix(&self) {
        for row in 0..ROWS {
            debug!("row {}: {:?}", row, self.previous.row_bits(row));
        }
    }

    /// Committed key states.
    pub fn key_states(&self) -> &KeyMatrix {
        &self.previous
    }

    /// Matrix read by the latest sweep.
    pub fn sampled(&self) -> &KeyMatrix {
        &self.current
    }

    pub fn is_pressed(&self, pos: KeyPos) -> bool {
        self.previous.get(pos.row as usize, pos.col as usize).unwrap_or_default()
    }

    pub fn pressed_count(&self) -> usize {
        self.previous.closed_count()
    }

    pub fn timer(&self) -> &ScanTimer {
        &self.timer
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn voice(&self) -> &V {
        &self.voice
    }

    pub fn voice_mut(&mut self) -> &mut V {
        &mut self.voice
    }
}
