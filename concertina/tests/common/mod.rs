#![allow(dead_code)]

use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;

use concertina::{
    ADDRESS_LINES, COLS, Expression, ExpressionSensor, KeyEvent, KeyPos, MatrixScanner, ROWS, ScanConfig,
    VoiceEngine,
};
use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Something observable that happened on the simulated board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Address { line: usize, high: bool },
    Settle { ns: u32 },
    Diagnostic { high: bool },
    RowRead { row: usize, col: usize, low: bool },
    Expression,
    Voice(KeyEvent),
}

/// Simulated switch matrix behind a 3 to 8 column decoder.
#[derive(Default)]
pub struct Board {
    /// Physical switch positions, `[row][col]`, `true` means closed
    pub switches: [[bool; COLS]; ROWS],
    pub address: [bool; ADDRESS_LINES],
    pub diagnostic: bool,
    pub trace: Vec<Signal>,
    pub expression: Expression,
}

impl Board {
    /// Column currently selected by the address lines
    pub fn selected_column(&self) -> usize {
        self.address
            .iter()
            .enumerate()
            .map(|(line, high)| (*high as usize) << line)
            .sum()
    }

    pub fn voice_events(&self) -> Vec<KeyEvent> {
        self.trace
            .iter()
            .filter_map(|s| match s {
                Signal::Voice(e) => Some(*e),
                _ => None,
            })
            .collect()
    }

    pub fn address_writes(&self) -> usize {
        self.trace.iter().filter(|s| matches!(s, Signal::Address { .. })).count()
    }

    pub fn row_reads(&self) -> usize {
        self.trace.iter().filter(|s| matches!(s, Signal::RowRead { .. })).count()
    }
}

pub type SharedBoard = Rc<RefCell<Board>>;

pub struct RowPin {
    board: SharedBoard,
    row: usize,
}

impl ErrorType for RowPin {
    type Error = Infallible;
}

impl InputPin for RowPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let mut board = self.board.borrow_mut();
        let col = board.selected_column();
        // Pulled up unless the switch at the selected column is closed
        let low = board.switches[self.row][col];
        board.trace.push(Signal::RowRead { row: self.row, col, low });
        Ok(low)
    }
}

pub struct AddressPin {
    board: SharedBoard,
    line: usize,
}

impl ErrorType for AddressPin {
    type Error = Infallible;
}

impl OutputPin for AddressPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut board = self.board.borrow_mut();
        board.address[self.line] = false;
        board.trace.push(Signal::Address {
            line: self.line,
            high: false,
        });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut board = self.board.borrow_mut();
        board.address[self.line] = true;
        board.trace.push(Signal::Address {
            line: self.line,
            high: true,
        });
        Ok(())
    }
}

pub struct DiagnosticPin {
    board: SharedBoard,
}

impl ErrorType for DiagnosticPin {
    type Error = Infallible;
}

impl OutputPin for DiagnosticPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut board = self.board.borrow_mut();
        board.diagnostic = false;
        board.trace.push(Signal::Diagnostic { high: false });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut board = self.board.borrow_mut();
        board.diagnostic = true;
        board.trace.push(Signal::Diagnostic { high: true });
        Ok(())
    }
}

pub struct SettleDelay {
    board: SharedBoard,
}

impl DelayNs for SettleDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.board.borrow_mut().trace.push(Signal::Settle { ns });
    }
}

/// Voice engine and bellows sensor writing into the board trace.
pub struct Synth {
    board: SharedBoard,
}

impl VoiceEngine for Synth {
    fn press(&mut self, row: u8, col: u8, expression: Expression) {
        self.board.borrow_mut().trace.push(Signal::Voice(KeyEvent::Press {
            pos: KeyPos::new(row, col).unwrap(),
            expression,
        }));
    }

    fn release(&mut self, row: u8, col: u8) {
        self.board
            .borrow_mut()
            .trace
            .push(Signal::Voice(KeyEvent::Release { pos: KeyPos::new(row, col).unwrap() }));
    }
}

pub struct Bellows {
    board: SharedBoard,
}

impl ExpressionSensor for Bellows {
    fn read_expression(&mut self) -> Expression {
        let mut board = self.board.borrow_mut();
        board.trace.push(Signal::Expression);
        let value = board.expression;
        // Every reading differs so tests can tell them apart
        board.expression = board.expression.wrapping_add(1);
        value
    }
}

pub type TestScanner = MatrixScanner<RowPin, AddressPin, DiagnosticPin, SettleDelay, Synth, Bellows>;

pub const TEST_INTERVAL: Duration = Duration::from_millis(10);

pub fn test_config() -> ScanConfig {
    ScanConfig::default().with_scan_interval(TEST_INTERVAL)
}

pub type BoardPins = ([RowPin; ROWS], [AddressPin; ADDRESS_LINES], DiagnosticPin, SettleDelay);

/// Pins and settle delay wired to `board`.
pub fn board_pins(board: &SharedBoard) -> BoardPins {
    let row_pins = core::array::from_fn(|row| RowPin {
        board: board.clone(),
        row,
    });
    let address_pins = core::array::from_fn(|line| AddressPin {
        board: board.clone(),
        line,
    });
    (
        row_pins,
        address_pins,
        DiagnosticPin { board: board.clone() },
        SettleDelay { board: board.clone() },
    )
}

pub fn create_test_scanner(config: ScanConfig) -> (TestScanner, SharedBoard) {
    let board: SharedBoard = Rc::new(RefCell::new(Board::default()));
    let (row_pins, address_pins, diagnostic_pin, delay) = board_pins(&board);
    let scanner = MatrixScanner::new(
        row_pins,
        address_pins,
        diagnostic_pin,
        delay,
        Synth { board: board.clone() },
        Bellows { board: board.clone() },
        config,
    );
    (scanner, board)
}

/// First instant at which the `n`th scan after the scanner's creation is due.
pub fn due_time(scanner: &TestScanner, n: u32) -> Instant {
    scanner.timer().origin() + scanner.config().scan_interval * n + Duration::from_millis(1)
}

pub fn pos(row: u8, col: u8) -> KeyPos {
    KeyPos::new(row, col).unwrap()
}

pub fn press(row: u8, col: u8, expression: Expression) -> KeyEvent {
    KeyEvent::Press {
        pos: pos(row, col),
        expression,
    }
}

pub fn release(row: u8, col: u8) -> KeyEvent {
    KeyEvent::Release { pos: pos(row, col) }
}
