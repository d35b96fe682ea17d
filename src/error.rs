//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level pin or register errors
//!
//! With the default configuration the only way an operation fails is an
//! interface error: a controller that never clears its busy flag blocks the
//! caller forever. [`Error::BusyTimeout`] only appears once a poll limit is
//! configured with [`Builder::busy_poll_limit`](crate::config::Builder::busy_poll_limit).
//!
//! ## Example
//!
//! ```
//! use hd44780_parallel::{Builder, BuilderError};
//!
//! // Line two must start inside DDRAM
//! let result = Builder::new().line_two_address(0x80).build();
//! assert!(matches!(result, Err(BuilderError::InvalidLineAddress(0x80))));
//! ```

use crate::command::ADDRESS_MASK;
use crate::interface::LcdInterface;

/// Number of user-definable CGRAM glyphs
pub const GLYPH_SLOTS: u8 = 8;

/// Errors that can occur when driving the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: LcdInterface> {
    /// Interface error (GPIO/port register)
    ///
    /// Wraps the underlying hardware error from the [`LcdInterface`] implementation.
    Interface(I::Error),
    /// The controller still reported busy after the configured number of polls
    BusyTimeout {
        /// Number of status reads that came back busy
        polls: u32,
    },
    /// Glyph slot outside `0..GLYPH_SLOTS`
    InvalidGlyphSlot(u8),
}

impl<I: LcdInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::BusyTimeout { polls } => {
                write!(f, "Controller still busy after {polls} status reads")
            }
            Self::InvalidGlyphSlot(slot) => {
                write!(f, "Invalid glyph slot {slot} (max {})", GLYPH_SLOTS - 1)
            }
        }
    }
}

impl<I: LcdInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Line two start address does not fit the 7-bit DDRAM address
    InvalidLineAddress(u8),
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLineAddress(address) => write!(
                f,
                "Invalid line address {address:#04x} (max {ADDRESS_MASK:#04x})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
