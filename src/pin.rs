//! Pin-mapped wiring
//!
//! Every bus signal sits on its own GPIO, so the seven lines may be spread
//! over any number of ports. Control lines are plain [`OutputPin`]s. Data
//! lines must be able to both drive and sample the bus, see [`DataPin`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use hd44780_parallel::{Config, Lcd, OpenDrain, PinInterface};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! let interface = PinInterface::new(
//!     MockPin, // E
//!     MockPin, // RS
//!     MockPin, // RW
//!     [
//!         OpenDrain(MockPin), // D4
//!         OpenDrain(MockPin), // D5
//!         OpenDrain(MockPin), // D6
//!         OpenDrain(MockPin), // D7
//!     ],
//! );
//! let mut lcd = Lcd::new(interface, MockDelay, Config::default());
//! let _ = lcd.initialize();
//! ```

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::interface::{Direction, InterfaceError, LcdInterface, Signal};

type PinResult<T, E> = core::result::Result<T, E>;

/// A bidirectional data line
///
/// The default methods suit open-drain outputs with a pull-up: releasing the
/// line means driving it high, after which the controller can pull it low.
/// HALs with runtime-switchable pins should override both methods to change
/// the pin mode instead.
pub trait DataPin: OutputPin + InputPin {
    /// Stop driving the line so the controller can
    fn set_as_input(&mut self) -> PinResult<(), Self::Error> {
        self.set_high()
    }

    /// Resume driving the line
    fn set_as_output(&mut self) -> PinResult<(), Self::Error> {
        Ok(())
    }
}

/// Adapter that turns an open-drain `OutputPin + InputPin` into a [`DataPin`]
#[derive(Debug)]
pub struct OpenDrain<P>(pub P);

impl<P: ErrorType> ErrorType for OpenDrain<P> {
    type Error = P::Error;
}

impl<P: OutputPin> OutputPin for OpenDrain<P> {
    fn set_low(&mut self) -> PinResult<(), Self::Error> {
        self.0.set_low()
    }

    fn set_high(&mut self) -> PinResult<(), Self::Error> {
        self.0.set_high()
    }
}

impl<P: InputPin> InputPin for OpenDrain<P> {
    fn is_high(&mut self) -> PinResult<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> PinResult<bool, Self::Error> {
        self.0.is_low()
    }
}

impl<P: OutputPin + InputPin> DataPin for OpenDrain<P> {}

/// Pin-mapped [`LcdInterface`]
///
/// ## Type Parameters
///
/// * `EN` - Enable pin implementing [`OutputPin`]
/// * `RS` - Register select pin implementing [`OutputPin`]
/// * `RW` - Read/write pin implementing [`OutputPin`]
/// * `D` - Data pin implementing [`DataPin`], usually a type-erased HAL pin
///
/// All pins must share one error type.
#[derive(Debug)]
pub struct PinInterface<EN, RS, RW, D> {
    enable: EN,
    register_select: RS,
    read_write: RW,
    /// Data lines 0..3, wired to D4..D7 on the controller
    data: [D; 4],
    direction: Direction,
}

impl<EN, RS, RW, D> PinInterface<EN, RS, RW, D> {
    /// Create a new pin-mapped interface
    ///
    /// # Arguments
    ///
    /// * `enable` - E pin
    /// * `register_select` - RS pin
    /// * `read_write` - RW pin
    /// * `data` - data pins in bit order, `data[0]` on D4
    pub fn new(enable: EN, register_select: RS, read_write: RW, data: [D; 4]) -> Self {
        Self {
            enable,
            register_select,
            read_write,
            data,
            direction: Direction::Output,
        }
    }

    /// Give the pins back
    pub fn release(self) -> (EN, RS, RW, [D; 4]) {
        (self.enable, self.register_select, self.read_write, self.data)
    }
}

impl<EN, RS, RW, D, PinErr> LcdInterface for PinInterface<EN, RS, RW, D>
where
    EN: OutputPin<Error = PinErr>,
    RS: OutputPin<Error = PinErr>,
    RW: OutputPin<Error = PinErr>,
    D: DataPin<Error = PinErr>,
    PinErr: core::fmt::Debug,
{
    type Error = InterfaceError<PinErr>;

    fn configure(&mut self) -> PinResult<(), Self::Error> {
        self.set_data_direction(Direction::Output)
    }

    fn set_signal(&mut self, signal: Signal, high: bool) -> PinResult<(), Self::Error> {
        let state = PinState::from(high);
        match signal {
            Signal::Enable => self.enable.set_state(state),
            Signal::RegisterSelect => self.register_select.set_state(state),
            Signal::ReadWrite => self.read_write.set_state(state),
        }
        .map_err(InterfaceError::Pin)
    }

    fn set_data_direction(&mut self, direction: Direction) -> PinResult<(), Self::Error> {
        for pin in &mut self.data {
            match direction {
                Direction::Input => pin.set_as_input(),
                Direction::Output => pin.set_as_output(),
            }
            .map_err(InterfaceError::Pin)?;
        }
        self.direction = direction;
        Ok(())
    }

    fn data_direction(&self) -> Direction {
        self.direction
    }

    fn write_data(&mut self, nibble: u8) -> PinResult<(), Self::Error> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(PinState::from(nibble & (1 << bit) != 0))
                .map_err(InterfaceError::Pin)?;
        }
        Ok(())
    }

    fn read_data(&mut self) -> PinResult<u8, Self::Error> {
        let mut nibble = 0;
        for (bit, pin) in self.data.iter_mut().enumerate() {
            if pin.is_high().map_err(InterfaceError::Pin)? {
                nibble |= 1 << bit;
            }
        }
        Ok(nibble)
    }
}
