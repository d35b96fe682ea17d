//! Core display operations

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::command::{
    CLEAR_DISPLAY, CLEAR_SETTLE_MS, CONTROL_BACKSPACE, CONTROL_CLEAR, CONTROL_LINE_FEED,
    CURSOR_LEFT, CURSOR_SHIFT, INIT_FOUR_BIT_NIBBLE, INIT_RESET_NIBBLE, POWER_ON_DELAY_MS,
    RESET_NIBBLE_DELAY_MS, RETURN_HOME, SET_CGRAM_ADDRESS, SET_DDRAM_ADDRESS, SHIFT_DISPLAY,
    SHIFT_RIGHT,
};
use crate::config::{Config, display_control};
use crate::error::{Error, GLYPH_SLOTS};
use crate::interface::{LcdInterface, Signal};
use crate::protocol::Protocol;

type DisplayResult<T, I> = core::result::Result<T, Error<I>>;

/// What a shift instruction moves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShiftTarget {
    /// Move the cursor, display contents stay put
    #[default]
    Cursor,
    /// Scroll the whole display
    Display,
}

/// Direction of a shift instruction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Towards lower addresses
    #[default]
    Left,
    /// Towards higher addresses
    Right,
}

/// HD44780 character display driver
///
/// Owns the wiring and the delay provider for its whole lifetime. Call
/// [`initialize`](Self::initialize) exactly once before anything else.
///
/// ## Example
///
/// ```rust,no_run
/// use core::fmt::Write;
/// use hd44780_parallel::{Builder, Lcd, OpenDrain, PinInterface};
/// # use core::convert::Infallible;
/// # use embedded_hal::delay::DelayNs;
/// # use embedded_hal::digital::{InputPin, OutputPin};
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl InputPin for MockPin {
/// #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
/// #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
/// # }
/// # struct MockDelay;
/// # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
/// let interface = PinInterface::new(
///     MockPin,
///     MockPin,
///     MockPin,
///     [OpenDrain(MockPin), OpenDrain(MockPin), OpenDrain(MockPin), OpenDrain(MockPin)],
/// );
/// let config = match Builder::new().build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let mut lcd = Lcd::new(interface, MockDelay, config);
/// let _ = lcd.initialize();
///
/// let _ = lcd.goto(1, 1);
/// let _ = write!(lcd, "Scan card");
/// let _ = write!(lcd, "\nDoor locked");
/// let _first = lcd.get_char(1, 1);
/// ```
#[derive(Debug)]
pub struct Lcd<I, D> {
    /// Bus protocol (owns interface and delay)
    protocol: Protocol<I, D>,
    /// Display configuration
    config: Config,
}

impl<I, D> Lcd<I, D>
where
    I: LcdInterface,
    D: DelayNs,
{
    /// Create a new driver
    ///
    /// Nothing is sent to the display until [`initialize`](Self::initialize).
    pub fn new(interface: I, delay: D, config: Config) -> Self {
        let busy_poll_limit = config.busy_poll_limit;
        Self {
            protocol: Protocol::new(interface, delay, busy_poll_limit),
            config,
        }
    }

    /// Create a new driver with the default configuration
    pub fn with_defaults(interface: I, delay: D) -> Self {
        Self::new(interface, delay, Config::default())
    }

    /// Bring the controller from power-on into 4-bit mode and configure it
    ///
    /// The reset nibbles work from any state the controller may be in,
    /// including a half-finished 4-bit transfer, but only when the sequence
    /// runs from the start.
    pub fn initialize(&mut self) -> DisplayResult<(), I> {
        debug!(
            "initializing, function set {:#04x}, line two at {:#04x}",
            self.config.lcd_type.function_set(),
            self.config.line_two_address
        );

        self.protocol.configure()?;
        self.protocol.set_signal(Signal::RegisterSelect, false)?;
        self.protocol.set_signal(Signal::ReadWrite, false)?;
        self.protocol.set_signal(Signal::Enable, false)?;

        self.protocol.delay_ms(POWER_ON_DELAY_MS);
        for _ in 0..3 {
            self.protocol.send_nibble(INIT_RESET_NIBBLE)?;
            self.protocol.delay_ms(RESET_NIBBLE_DELAY_MS);
        }
        self.protocol.send_nibble(INIT_FOUR_BIT_NIBBLE)?;

        for byte in self.config.init_sequence() {
            self.protocol.write_byte(false, byte)?;
        }

        debug!("display ready");
        Ok(())
    }

    /// Move the cursor to the 1-based position (x, y)
    ///
    /// `y` of 1 is the first line, anything else the second. `x` is not
    /// checked against the line width.
    pub fn goto(&mut self, x: u8, y: u8) -> DisplayResult<(), I> {
        let address = self.config.address(x, y);
        self.protocol.write_byte(false, SET_DDRAM_ADDRESS | address)
    }

    /// Write one character code at the cursor
    ///
    /// Three codes are control characters:
    /// - form feed (`\x0C`) clears the display
    /// - `\n` moves to the start of line two
    /// - `\b` (0x08) moves the cursor one position left
    ///
    /// Every other code is written as-is.
    pub fn put_char(&mut self, c: u8) -> DisplayResult<(), I> {
        match c {
            CONTROL_CLEAR => {
                self.protocol.write_byte(false, CLEAR_DISPLAY)?;
                self.protocol.delay_ms(CLEAR_SETTLE_MS);
                Ok(())
            }
            CONTROL_LINE_FEED => self.goto(1, 2),
            CONTROL_BACKSPACE => self.protocol.write_byte(false, CURSOR_LEFT),
            _ => self.protocol.write_byte(true, c),
        }
    }

    /// Write every byte through [`put_char`](Self::put_char)
    pub fn write_bytes(&mut self, bytes: &[u8]) -> DisplayResult<(), I> {
        for &byte in bytes {
            self.put_char(byte)?;
        }
        Ok(())
    }

    /// Read the character code stored at the 1-based position (x, y)
    ///
    /// Leaves the address counter one past (x, y), as a write there would.
    pub fn get_char(&mut self, x: u8, y: u8) -> DisplayResult<u8, I> {
        self.goto(x, y)?;
        self.protocol.wait_ready()?;

        self.protocol.set_signal(Signal::RegisterSelect, true)?;
        let value = self.protocol.read_byte();
        let deasserted = self.protocol.set_signal(Signal::RegisterSelect, false);
        let value = value?;
        deasserted?;
        Ok(value)
    }

    /// Clear the display and move the cursor home
    pub fn clear(&mut self) -> DisplayResult<(), I> {
        self.put_char(CONTROL_CLEAR)
    }

    /// Move the cursor home and undo any display shift
    pub fn home(&mut self) -> DisplayResult<(), I> {
        self.protocol.write_byte(false, RETURN_HOME)?;
        self.protocol.delay_ms(CLEAR_SETTLE_MS);
        Ok(())
    }

    /// Turn the display, the underline cursor and the blinking cursor on or off
    pub fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> DisplayResult<(), I> {
        self.protocol
            .write_byte(false, display_control(display_on, cursor_on, blink_on))
    }

    /// Move the cursor or scroll the display by one position
    pub fn shift(&mut self, target: ShiftTarget, direction: ShiftDirection) -> DisplayResult<(), I> {
        let mut command = CURSOR_SHIFT;
        if target == ShiftTarget::Display {
            command |= SHIFT_DISPLAY;
        }
        if direction == ShiftDirection::Right {
            command |= SHIFT_RIGHT;
        }
        self.protocol.write_byte(false, command)
    }

    /// Current DDRAM address of the cursor, read back from the controller
    pub fn cursor_address(&mut self) -> DisplayResult<u8, I> {
        self.protocol.wait_ready()
    }

    /// Program one of the eight user-definable glyphs
    ///
    /// Character codes `slot` and `slot + 8` then display the glyph. Each
    /// row uses its low 5 bits, top row first. The cursor position is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGlyphSlot`] if `slot` is 8 or more.
    pub fn define_glyph(&mut self, slot: u8, rows: &[u8; 8]) -> DisplayResult<(), I> {
        if slot >= GLYPH_SLOTS {
            return Err(Error::InvalidGlyphSlot(slot));
        }

        let address = self.cursor_address()?;
        self.protocol
            .write_byte(false, SET_CGRAM_ADDRESS | (slot << 3))?;
        for &row in rows {
            self.protocol.write_byte(true, row & 0x1F)?;
        }
        self.protocol
            .write_byte(false, SET_DDRAM_ADDRESS | address)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the interface and the delay provider
    pub fn release(self) -> (I, D) {
        self.protocol.release()
    }
}

impl<I, D> core::fmt::Write for Lcd<I, D>
where
    I: LcdInterface,
    D: DelayNs,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}
