//! Display configuration types and builder

use crate::command::{
    ADDRESS_MASK, BLINK_ON, CURSOR_ON, DISPLAY_CONTROL, DISPLAY_ON, ENTRY_INCREMENT,
    ENTRY_MODE_SET, ENTRY_SHIFT, FUNCTION_SET,
};
pub use crate::error::BuilderError;

/// DDRAM address of the first character of line one
pub const LINE_ONE_ADDRESS: u8 = 0x00;

/// Default DDRAM address of the first character of line two
pub const DEFAULT_LINE_TWO_ADDRESS: u8 = 0x40;

/// Controller mode selected by the function-set instruction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum LcdType {
    /// One line, 5x7 font
    Font5x7 = 0,
    /// One line, 5x10 font
    Font5x10 = 1,
    /// Two lines, 5x7 font
    #[default]
    TwoLine = 2,
}

impl LcdType {
    /// Function-set byte for this mode on a 4-bit bus
    pub const fn function_set(self) -> u8 {
        FUNCTION_SET | ((self as u8) << 2)
    }
}

/// Display configuration
///
/// Fixed for the lifetime of the driver. Use [`Builder`] to create a Config,
/// or [`Config::default()`] for a 16x2 style module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Controller mode (font and line count)
    pub lcd_type: LcdType,
    /// DDRAM address of the first character of line two
    pub line_two_address: u8,
    /// Display control byte sent during initialization
    pub display_control: u8,
    /// Entry mode byte sent during initialization
    pub entry_mode: u8,
    /// Busy polls before giving up, 0 polls forever
    pub busy_poll_limit: u32,
}

/// Display control instruction for the given display, cursor and blink state
pub const fn display_control(display_on: bool, cursor_on: bool, blink_on: bool) -> u8 {
    let mut control = DISPLAY_CONTROL;
    if display_on {
        control |= DISPLAY_ON;
    }
    if cursor_on {
        control |= CURSOR_ON;
    }
    if blink_on {
        control |= BLINK_ON;
    }
    control
}

impl Config {
    /// DDRAM address of the 1-based position (x, y)
    ///
    /// Any `y` other than 1 selects line two. No bounds check is done: an `x`
    /// past the end of the line wraps within the controller's RAM.
    pub const fn address(&self, x: u8, y: u8) -> u8 {
        let line = if y == 1 {
            LINE_ONE_ADDRESS
        } else {
            self.line_two_address
        };
        line.wrapping_add(x.wrapping_sub(1))
    }

    /// The four instruction bytes that follow the 4-bit switch during
    /// initialization, in order
    pub const fn init_sequence(&self) -> [u8; 4] {
        [
            self.lcd_type.function_set(),
            self.display_control,
            crate::command::CLEAR_DISPLAY,
            self.entry_mode,
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        let builder = Builder::new();
        Self {
            lcd_type: builder.lcd_type,
            line_two_address: builder.line_two_address,
            display_control: builder.display_control,
            entry_mode: builder.entry_mode,
            busy_poll_limit: builder.busy_poll_limit,
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use hd44780_parallel::{Builder, LcdType};
///
/// let config = match Builder::new()
///     .lcd_type(LcdType::TwoLine)
///     .line_two_address(0x40)
///     .display_control(true, false, false)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.init_sequence(), [0x28, 0x0C, 0x01, 0x06]);
/// ```
#[must_use]
pub struct Builder {
    /// Controller mode
    lcd_type: LcdType,
    /// Line two start address
    line_two_address: u8,
    /// Display control byte
    display_control: u8,
    /// Entry mode byte
    entry_mode: u8,
    /// Busy polls before giving up, 0 polls forever
    busy_poll_limit: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            lcd_type: LcdType::TwoLine,
            line_two_address: DEFAULT_LINE_TWO_ADDRESS,
            // Display on, cursor and blink off
            display_control: DISPLAY_CONTROL | DISPLAY_ON,
            // Cursor moves right, display does not shift
            entry_mode: ENTRY_MODE_SET | ENTRY_INCREMENT,
            busy_poll_limit: 0,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the controller mode
    pub fn lcd_type(mut self, lcd_type: LcdType) -> Self {
        self.lcd_type = lcd_type;
        self
    }

    /// Set the DDRAM address where line two starts
    ///
    /// 0x40 for nearly every two-line module. Must be at most 0x7F.
    pub fn line_two_address(mut self, address: u8) -> Self {
        self.line_two_address = address;
        self
    }

    /// Set the display, cursor and blink state applied at initialization
    pub fn display_control(mut self, display_on: bool, cursor_on: bool, blink_on: bool) -> Self {
        self.display_control = display_control(display_on, cursor_on, blink_on);
        self
    }

    /// Set the entry mode applied at initialization
    ///
    /// * `increment` - cursor moves right after each character
    /// * `shift` - the display scrolls instead of the cursor moving
    pub fn entry_mode(mut self, increment: bool, shift: bool) -> Self {
        let mut mode = ENTRY_MODE_SET;
        if increment {
            mode |= ENTRY_INCREMENT;
        }
        if shift {
            mode |= ENTRY_SHIFT;
        }
        self.entry_mode = mode;
        self
    }

    /// Give up waiting for the busy flag after `polls` status reads
    ///
    /// Default is 0, which waits forever. A non-zero limit turns a missing or
    /// miswired display into [`Error::BusyTimeout`](crate::Error::BusyTimeout)
    /// instead of a hang.
    pub fn busy_poll_limit(mut self, polls: u32) -> Self {
        self.busy_poll_limit = polls;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidLineAddress` if the line two address
    /// does not fit in 7 bits
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.line_two_address > ADDRESS_MASK {
            return Err(BuilderError::InvalidLineAddress(self.line_two_address));
        }
        Ok(Config {
            lcd_type: self.lcd_type,
            line_two_address: self.line_two_address,
            display_control: self.display_control,
            entry_mode: self.entry_mode,
            busy_poll_limit: self.busy_poll_limit,
        })
    }
}
