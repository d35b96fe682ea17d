//! Nibble transport and byte protocol
//!
//! [`Protocol`] owns the [`LcdInterface`] and the delay provider and turns
//! them into the HD44780 4-bit bus:
//!
//! - a **nibble** is four data bits latched by one Enable pulse
//! - a **byte** is two nibbles, high nibble first
//! - every byte write is preceded by polling the busy flag, which is itself
//!   a full two-nibble status read
//!
//! Writes are latched by the controller on the falling edge of Enable. Reads
//! are driven by the controller while Enable is high, so the data lines are
//! released before the first read strobe and taken back before returning.

use embedded_hal::delay::DelayNs;
use log::{trace, warn};

use crate::command::{ADDRESS_MASK, BUSY_FLAG, ENABLE_PULSE_US, READ_ACCESS_US, SETUP_DELAY_NS};
use crate::error::Error;
use crate::interface::{Direction, LcdInterface, Signal};

type ProtocolResult<T, I> = core::result::Result<T, Error<I>>;

/// HD44780 4-bit bus protocol over an [`LcdInterface`]
#[derive(Debug)]
pub struct Protocol<I, D> {
    interface: I,
    delay: D,
    /// Busy polls before giving up, 0 polls forever
    busy_poll_limit: u32,
}

impl<I, D> Protocol<I, D>
where
    I: LcdInterface,
    D: DelayNs,
{
    /// Create a new protocol driver
    ///
    /// `busy_poll_limit` of 0 waits for the busy flag forever.
    pub fn new(interface: I, delay: D, busy_poll_limit: u32) -> Self {
        Self {
            interface,
            delay,
            busy_poll_limit,
        }
    }

    /// Give back the interface and the delay provider
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    /// Put every line into its idle direction
    pub fn configure(&mut self) -> ProtocolResult<(), I> {
        self.interface.configure().map_err(Error::Interface)
    }

    /// Drive one control line
    pub fn set_signal(&mut self, signal: Signal, high: bool) -> ProtocolResult<(), I> {
        self.interface
            .set_signal(signal, high)
            .map_err(Error::Interface)
    }

    /// Block for `ms` milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Direction the data lines are currently in
    pub fn data_direction(&self) -> Direction {
        self.interface.data_direction()
    }

    // Nibble transport

    /// Write the low 4 bits of `value` with one Enable pulse
    pub fn send_nibble(&mut self, value: u8) -> ProtocolResult<(), I> {
        self.interface
            .write_data(value & 0x0F)
            .map_err(Error::Interface)?;
        self.delay.delay_ns(SETUP_DELAY_NS);
        self.set_signal(Signal::Enable, true)?;
        self.delay.delay_us(ENABLE_PULSE_US);
        self.set_signal(Signal::Enable, false)
    }

    /// Sample the data lines, releasing them first if needed
    ///
    /// Does not touch Enable; the caller frames the read.
    pub fn read_nibble(&mut self) -> ProtocolResult<u8, I> {
        if self.interface.data_direction() != Direction::Input {
            self.interface
                .set_data_direction(Direction::Input)
                .map_err(Error::Interface)?;
        }
        self.interface.read_data().map_err(Error::Interface)
    }

    // Byte protocol

    /// Read one byte from the register selected by RS
    ///
    /// Enable is low and the data lines are back to outputs when this
    /// returns, error or not.
    pub fn read_byte(&mut self) -> ProtocolResult<u8, I> {
        let result = self.read_nibbles();
        let released = if result.is_err() {
            self.set_signal(Signal::Enable, false)
        } else {
            Ok(())
        };
        let restored = self
            .interface
            .set_data_direction(Direction::Output)
            .map_err(Error::Interface);
        let value = result?;
        released?;
        restored?;
        trace!("read {:#04x}", value);
        Ok(value)
    }

    fn read_nibbles(&mut self) -> ProtocolResult<u8, I> {
        self.interface
            .set_data_direction(Direction::Input)
            .map_err(Error::Interface)?;

        self.set_signal(Signal::ReadWrite, true)?;
        self.delay.delay_ns(SETUP_DELAY_NS);
        self.set_signal(Signal::Enable, true)?;
        self.delay.delay_ns(SETUP_DELAY_NS);
        let high = self.read_nibble()?;

        self.set_signal(Signal::Enable, false)?;
        self.delay.delay_ns(SETUP_DELAY_NS);
        self.set_signal(Signal::Enable, true)?;
        self.delay.delay_us(READ_ACCESS_US);
        let low = self.read_nibble()?;

        self.set_signal(Signal::Enable, false)?;

        Ok((high << 4) | low)
    }

    /// One status read, split into the busy flag and the address counter
    ///
    /// Expects RS low.
    pub fn read_status(&mut self) -> ProtocolResult<(bool, u8), I> {
        let status = self.read_byte()?;
        Ok((status & BUSY_FLAG != 0, status & ADDRESS_MASK))
    }

    /// Poll the status register until the busy flag clears
    ///
    /// Leaves RS low. Returns the address counter from the final status read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BusyTimeout`] if a poll limit is set and the
    /// controller is still busy after that many reads.
    pub fn wait_ready(&mut self) -> ProtocolResult<u8, I> {
        self.set_signal(Signal::RegisterSelect, false)?;

        let mut polls = 0u32;
        loop {
            let (busy, address) = self.read_status()?;
            if !busy {
                return Ok(address);
            }

            polls = polls.saturating_add(1);
            if self.busy_poll_limit > 0 && polls >= self.busy_poll_limit {
                warn!("controller still busy after {} polls", polls);
                return Err(Error::BusyTimeout { polls });
            }
        }
    }

    /// Write one byte once the controller is ready
    ///
    /// * `is_data` - true writes a character code (RS high), false an instruction
    pub fn write_byte(&mut self, is_data: bool, value: u8) -> ProtocolResult<(), I> {
        self.wait_ready()?;

        self.set_signal(Signal::RegisterSelect, is_data)?;
        self.delay.delay_ns(SETUP_DELAY_NS);
        self.set_signal(Signal::ReadWrite, false)?;
        self.delay.delay_ns(SETUP_DELAY_NS);
        self.set_signal(Signal::Enable, false)?;

        self.send_nibble(value >> 4)?;
        self.send_nibble(value & 0x0F)?;

        trace!(
            "wrote {} {:#04x}",
            if is_data { "data" } else { "instruction" },
            value
        );
        Ok(())
    }
}
