//! Hardware interface abstraction
//!
//! This module provides the [`LcdInterface`] trait, the seam between the bus
//! protocol and the physical wiring. Two implementations ship with the crate:
//!
//! - [`PinInterface`](crate::pin::PinInterface): every signal on its own
//!   `embedded-hal` pin
//! - [`PortInterface`](crate::port::PortInterface): all seven signals on one
//!   8-bit I/O port with a data-direction register
//!
//! ## Signals
//!
//! The 4-bit HD44780 bus needs seven lines:
//! - **E**: Enable strobe (output)
//! - **RS**: Register select, low=instruction, high=data (output)
//! - **RW**: Read/write, low=write, high=read (output)
//! - **D4..D7**: Data, bidirectional. Called data 0..3 by this crate.
//!
//! Both implementations must leave the same levels on the same lines for the
//! same sequence of calls.

use core::fmt::Debug;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Control line of the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Enable strobe
    Enable,
    /// Register select (low=instruction, high=data)
    RegisterSelect,
    /// Read/write select (low=write, high=read)
    ReadWrite,
}

/// Direction of the four data lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Driven by the host
    #[default]
    Output,
    /// Released, driven by the controller
    Input,
}

/// Trait for the signal layer of an HD44780 bus
///
/// The bus protocol in [`Protocol`](crate::protocol::Protocol) only talks to
/// the hardware through this trait.
///
/// ## Implementing
///
/// Use [`PinInterface`](crate::pin::PinInterface) or
/// [`PortInterface`](crate::port::PortInterface) where possible. A custom
/// implementation must keep control lines as outputs at all times and only
/// ever change the direction of the data lines.
pub trait LcdInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Put every line into its idle direction
    ///
    /// Control lines and data lines become outputs. Called once at the start
    /// of initialization.
    fn configure(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Drive one control line
    fn set_signal(&mut self, signal: Signal, high: bool) -> InterfaceResult<(), Self::Error>;

    /// Switch all four data lines to `direction` at once
    fn set_data_direction(&mut self, direction: Direction) -> InterfaceResult<(), Self::Error>;

    /// Direction most recently applied to the data lines
    fn data_direction(&self) -> Direction;

    /// Drive the data lines with the low 4 bits of `nibble`
    ///
    /// Bit 0 goes to data line 0 (D4 on the controller).
    fn write_data(&mut self, nibble: u8) -> InterfaceResult<(), Self::Error>;

    /// Sample the data lines
    ///
    /// Returns a value in `0..=0x0F`, data line 0 in bit 0.
    fn read_data(&mut self) -> InterfaceResult<u8, Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over the GPIO or register error type.
#[derive(Debug)]
pub enum InterfaceError<E> {
    /// GPIO pin error
    Pin(E),
    /// Port register access error
    Register(E),
}

impl<E: Debug> core::fmt::Display for InterfaceError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Register(e) => write!(f, "Register error: {e:?}"),
        }
    }
}

impl<E: Debug> core::error::Error for InterfaceError<E> {}
