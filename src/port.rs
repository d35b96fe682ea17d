//! Port-mapped wiring
//!
//! All seven bus signals sit on one 8-bit I/O port. The port is accessed
//! through three registers, abstracted by [`PortRegisters`]:
//!
//! - **input**: the levels currently on the pins
//! - **latch**: the levels the port drives on its output pins
//! - **direction**: which pins are inputs and which are outputs
//!
//! Every signal write is a read-modify-write of the latch, so the unused bit
//! (and any other peripheral sharing the port) keeps its value. The four data
//! lines always change direction together in one direction-register write.
//!
//! ## Layouts
//!
//! Two bit orders are supported, see [`PortLayout`]:
//!
//! | bit        | 7  | 6  | 5  | 4  | 3  | 2  | 1  | 0  |
//! |------------|----|----|----|----|----|----|----|----|
//! | `DataLow`  | -  | RW | RS | E  | D7 | D6 | D5 | D4 |
//! | `DataHigh` | D7 | D6 | D5 | D4 | -  | RW | RS | E  |

use crate::interface::{Direction, InterfaceError, LcdInterface, Signal};

type PortResult<T, E> = core::result::Result<T, E>;

/// Bit order of the bus signals within the port
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PortLayout {
    /// Data on bits 0..3, E on bit 4, RS on bit 5, RW on bit 6
    #[default]
    DataLow,
    /// E on bit 0, RS on bit 1, RW on bit 2, data on bits 4..7
    ///
    /// The layout used by older drivers that overlay a bit-field struct on
    /// the port register.
    DataHigh,
}

impl PortLayout {
    /// Position of data line 0 within the port
    pub const fn data_shift(self) -> u8 {
        match self {
            Self::DataLow => 0,
            Self::DataHigh => 4,
        }
    }

    /// Mask covering the four data lines
    pub const fn data_mask(self) -> u8 {
        0x0F << self.data_shift()
    }

    /// Mask of a single control line
    pub const fn signal_mask(self, signal: Signal) -> u8 {
        let bit = match (self, signal) {
            (Self::DataLow, Signal::Enable) => 4,
            (Self::DataLow, Signal::RegisterSelect) => 5,
            (Self::DataLow, Signal::ReadWrite) => 6,
            (Self::DataHigh, Signal::Enable) => 0,
            (Self::DataHigh, Signal::RegisterSelect) => 1,
            (Self::DataHigh, Signal::ReadWrite) => 2,
        };
        1 << bit
    }

    /// Mask covering E, RS and RW
    pub const fn control_mask(self) -> u8 {
        self.signal_mask(Signal::Enable)
            | self.signal_mask(Signal::RegisterSelect)
            | self.signal_mask(Signal::ReadWrite)
    }
}

/// Meaning of a set bit in the direction register
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionPolarity {
    /// Set bit makes the pin an input (PIC `TRIS` style)
    #[default]
    SetIsInput,
    /// Set bit makes the pin an output (AVR `DDR` style)
    SetIsOutput,
}

/// Register access for one 8-bit I/O port
///
/// Implement this on your PAC's port type, or use `MmioPort` (feature
/// `mmio`) with raw register addresses.
pub trait PortRegisters {
    /// Error type for register access
    type Error: core::fmt::Debug;

    /// Read the pin levels
    fn read_input(&mut self) -> PortResult<u8, Self::Error>;

    /// Read back the output latch
    fn read_latch(&mut self) -> PortResult<u8, Self::Error>;

    /// Write the output latch
    fn write_latch(&mut self, value: u8) -> PortResult<(), Self::Error>;

    /// Read the direction register
    fn read_direction(&mut self) -> PortResult<u8, Self::Error>;

    /// Write the direction register
    fn write_direction(&mut self, value: u8) -> PortResult<(), Self::Error>;
}

/// Port-mapped [`LcdInterface`]
///
/// ## Example
///
/// ```
/// use core::convert::Infallible;
/// use hd44780_parallel::{
///     DirectionPolarity, LcdInterface, PortInterface, PortLayout, PortRegisters, Signal,
/// };
///
/// #[derive(Default)]
/// struct Regs { latch: u8, tris: u8 }
/// impl PortRegisters for Regs {
///     type Error = Infallible;
///     fn read_input(&mut self) -> Result<u8, Infallible> { Ok(self.latch) }
///     fn read_latch(&mut self) -> Result<u8, Infallible> { Ok(self.latch) }
///     fn write_latch(&mut self, v: u8) -> Result<(), Infallible> { self.latch = v; Ok(()) }
///     fn read_direction(&mut self) -> Result<u8, Infallible> { Ok(self.tris) }
///     fn write_direction(&mut self, v: u8) -> Result<(), Infallible> { self.tris = v; Ok(()) }
/// }
///
/// let mut port = PortInterface::new(Regs::default(), PortLayout::DataHigh, DirectionPolarity::SetIsInput);
/// let _ = port.set_signal(Signal::RegisterSelect, true);
/// let _ = port.write_data(0x0A);
/// assert_eq!(port.release().latch, 0b1010_0010);
/// ```
#[derive(Debug)]
pub struct PortInterface<P> {
    port: P,
    layout: PortLayout,
    polarity: DirectionPolarity,
    direction: Direction,
}

impl<P> PortInterface<P>
where
    P: PortRegisters,
{
    /// Create a new port-mapped interface
    ///
    /// # Arguments
    ///
    /// * `port` - register access for the port carrying all seven lines
    /// * `layout` - bit order of the lines within the port
    /// * `polarity` - meaning of a set bit in the direction register
    pub fn new(port: P, layout: PortLayout, polarity: DirectionPolarity) -> Self {
        Self {
            port,
            layout,
            polarity,
            direction: Direction::Output,
        }
    }

    /// Bit layout in use
    pub fn layout(&self) -> PortLayout {
        self.layout
    }

    /// Give the port back
    pub fn release(self) -> P {
        self.port
    }

    /// Replace the bits under `mask` in the latch with `value`
    fn modify_latch(&mut self, mask: u8, value: u8) -> PortResult<(), InterfaceError<P::Error>> {
        let latch = self.port.read_latch().map_err(InterfaceError::Register)?;
        self.port
            .write_latch((latch & !mask) | (value & mask))
            .map_err(InterfaceError::Register)
    }

    /// Make the pins under `mask` inputs or outputs
    fn modify_direction(
        &mut self,
        mask: u8,
        direction: Direction,
    ) -> PortResult<(), InterfaceError<P::Error>> {
        let current = self
            .port
            .read_direction()
            .map_err(InterfaceError::Register)?;
        let set = match (self.polarity, direction) {
            (DirectionPolarity::SetIsInput, Direction::Input)
            | (DirectionPolarity::SetIsOutput, Direction::Output) => true,
            (DirectionPolarity::SetIsInput, Direction::Output)
            | (DirectionPolarity::SetIsOutput, Direction::Input) => false,
        };
        let updated = if set { current | mask } else { current & !mask };
        self.port
            .write_direction(updated)
            .map_err(InterfaceError::Register)
    }
}

impl<P> LcdInterface for PortInterface<P>
where
    P: PortRegisters,
{
    type Error = InterfaceError<P::Error>;

    fn configure(&mut self) -> PortResult<(), Self::Error> {
        let mask = self.layout.control_mask() | self.layout.data_mask();
        self.modify_direction(mask, Direction::Output)?;
        self.direction = Direction::Output;
        Ok(())
    }

    fn set_signal(&mut self, signal: Signal, high: bool) -> PortResult<(), Self::Error> {
        let mask = self.layout.signal_mask(signal);
        self.modify_latch(mask, if high { mask } else { 0 })
    }

    fn set_data_direction(&mut self, direction: Direction) -> PortResult<(), Self::Error> {
        self.modify_direction(self.layout.data_mask(), direction)?;
        self.direction = direction;
        Ok(())
    }

    fn data_direction(&self) -> Direction {
        self.direction
    }

    fn write_data(&mut self, nibble: u8) -> PortResult<(), Self::Error> {
        let value = (nibble & 0x0F) << self.layout.data_shift();
        self.modify_latch(self.layout.data_mask(), value)
    }

    fn read_data(&mut self) -> PortResult<u8, Self::Error> {
        let input = self.port.read_input().map_err(InterfaceError::Register)?;
        Ok((input >> self.layout.data_shift()) & 0x0F)
    }
}

/// [`PortRegisters`] over memory-mapped registers
///
/// Requires the `mmio` feature.
#[cfg(feature = "mmio")]
#[derive(Debug)]
pub struct MmioPort {
    input: *const u8,
    latch: *mut u8,
    direction: *mut u8,
}

#[cfg(feature = "mmio")]
#[allow(unsafe_code)]
impl MmioPort {
    /// Create a port handle from register addresses
    ///
    /// # Safety
    ///
    /// Each address must be a valid, readable (and for `latch` and
    /// `direction` writable) 8-bit register of the same I/O port, and no
    /// other code may access those registers while this handle lives.
    pub unsafe fn new(input: usize, latch: usize, direction: usize) -> Self {
        Self {
            input: input as *const u8,
            latch: latch as *mut u8,
            direction: direction as *mut u8,
        }
    }
}

#[cfg(feature = "mmio")]
#[allow(unsafe_code)]
impl PortRegisters for MmioPort {
    type Error = core::convert::Infallible;

    fn read_input(&mut self) -> PortResult<u8, Self::Error> {
        // SAFETY: address validity and exclusivity are guaranteed by `new`'s caller.
        Ok(unsafe { self.input.read_volatile() })
    }

    fn read_latch(&mut self) -> PortResult<u8, Self::Error> {
        // SAFETY: see `new`
        Ok(unsafe { self.latch.read_volatile() })
    }

    fn write_latch(&mut self, value: u8) -> PortResult<(), Self::Error> {
        // SAFETY: see `new`
        unsafe { self.latch.write_volatile(value) };
        Ok(())
    }

    fn read_direction(&mut self) -> PortResult<u8, Self::Error> {
        // SAFETY: see `new`
        Ok(unsafe { self.direction.read_volatile() })
    }

    fn write_direction(&mut self, value: u8) -> PortResult<(), Self::Error> {
        // SAFETY: see `new`
        unsafe { self.direction.write_volatile(value) };
        Ok(())
    }
}
