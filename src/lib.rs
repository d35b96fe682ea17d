//! HD44780 Character LCD Driver
//!
//! A driver for HD44780-compatible character displays on a 4-bit parallel bus.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - Pin-mapped wiring (seven independent GPIO lines) or port-mapped wiring
//!   (all seven lines on one 8-bit I/O port)
//! - Busy-flag polling before every transfer; only clear and home add a
//!   fixed settle delay
//! - Read back of displayed characters and the cursor address
//! - `core::fmt::Write`, so `write!` prints to the display
//! - Memory-mapped port registers (with `mmio` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use core::fmt::Write;
//! use embedded_hal::delay::DelayNs;
//! use hd44780_parallel::{
//!     Builder, DirectionPolarity, Lcd, LcdType, PortInterface, PortLayout, PortRegisters,
//! };
//!
//! # #[derive(Default)]
//! # struct MockPort { latch: u8, direction: u8 }
//! # impl PortRegisters for MockPort {
//! #     type Error = Infallible;
//! #     fn read_input(&mut self) -> Result<u8, Self::Error> { Ok(0) }
//! #     fn read_latch(&mut self) -> Result<u8, Self::Error> { Ok(self.latch) }
//! #     fn write_latch(&mut self, value: u8) -> Result<(), Self::Error> { self.latch = value; Ok(()) }
//! #     fn read_direction(&mut self) -> Result<u8, Self::Error> { Ok(self.direction) }
//! #     fn write_direction(&mut self, value: u8) -> Result<(), Self::Error> { self.direction = value; Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let port = MockPort::default();
//! let interface = PortInterface::new(port, PortLayout::DataHigh, DirectionPolarity::SetIsInput);
//! let config = match Builder::new().lcd_type(LcdType::TwoLine).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut lcd = Lcd::new(interface, MockDelay, config);
//! let _ = lcd.initialize();
//! let _ = write!(lcd, "\x0CTemp {:>3}C\nFan on", 21);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// HD44780 instruction set and bus timing
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Pin-mapped wiring over embedded-hal GPIO
pub mod pin;
/// Port-mapped wiring over 8-bit I/O port registers
pub mod port;
/// Nibble transport and byte protocol
pub mod protocol;

#[cfg(test)]
mod sim;

pub use config::{Builder, Config, DEFAULT_LINE_TWO_ADDRESS, LINE_ONE_ADDRESS, LcdType};
pub use display::{Lcd, ShiftDirection, ShiftTarget};
pub use error::{BuilderError, Error, GLYPH_SLOTS};
pub use interface::{Direction, InterfaceError, LcdInterface, Signal};
pub use pin::{DataPin, OpenDrain, PinInterface};
pub use port::{DirectionPolarity, PortInterface, PortLayout, PortRegisters};
pub use protocol::Protocol;

#[cfg(feature = "mmio")]
pub use port::MmioPort;
