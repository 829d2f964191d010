//! Key switch matrix scanner for a bellows-driven keyboard instrument.
//!
//! The instrument's keys form a 6 row by 8 column switch matrix. The
//! [`MatrixScanner`] sweeps it through a 3 line column decoder, detects which
//! keys changed since the previous sweep and reports them to a
//! [`VoiceEngine`], releases first, presses second.
//!
//! ```ignore
//! let mut scanner = MatrixScanner::new(
//!     row_pins,
//!     address_pins,
//!     diagnostic_pin,
//!     embassy_time::Delay,
//!     synth,
//!     bellows,
//!     ScanConfig::default(),
//! );
//! loop {
//!     scanner.scan();
//! }
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod address;
pub mod config;
pub mod matrix;
pub mod scanner;
pub mod timer;
pub mod voice;

pub use address::{ADDRESS_LINES, ColumnAddress};
pub use config::ScanConfig;
pub use matrix::{COLS, Hand, KeyMatrix, KeyPos, ROWS, SwitchMatrix, Tier};
pub use scanner::MatrixScanner;
pub use timer::ScanTimer;
pub use voice::{Expression, ExpressionSensor, FixedExpression, KeyEvent, NoVoice, VoiceEngine};
