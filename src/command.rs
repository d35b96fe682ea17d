//! HD44780 instruction set
//!
//! Instruction bytes are written with RS low, character codes with RS high.
//! Most instructions are a single opcode bit OR'ed with option flags, so the
//! flag constants below are meant to be combined with their opcode.
//!
//! ## Example
//!
//! ```
//! use hd44780_parallel::command;
//!
//! // Display on, cursor off, blink off
//! let control = command::DISPLAY_CONTROL | command::DISPLAY_ON;
//! assert_eq!(control, 0x0C);
//!
//! // Jump to the start of the second line
//! assert_eq!(command::SET_DDRAM_ADDRESS | 0x40, 0xC0);
//! ```

// Instructions

/// Clear display command (0x01)
///
/// Fills DDRAM with spaces and resets the address counter. Slow (~1.5ms).
pub const CLEAR_DISPLAY: u8 = 0x01;

/// Return home command (0x02)
///
/// Resets the address counter and any display shift. Slow (~1.5ms).
pub const RETURN_HOME: u8 = 0x02;

/// Entry mode set command (0x04)
///
/// Combine with [`ENTRY_INCREMENT`] and [`ENTRY_SHIFT`].
pub const ENTRY_MODE_SET: u8 = 0x04;

/// Display on/off control command (0x08)
///
/// Combine with [`DISPLAY_ON`], [`CURSOR_ON`] and [`BLINK_ON`].
pub const DISPLAY_CONTROL: u8 = 0x08;

/// Cursor or display shift command (0x10)
///
/// With no flags set this moves the cursor one position to the left.
pub const CURSOR_SHIFT: u8 = 0x10;

/// Function set command (0x20)
///
/// Bit 4 selects the 8-bit bus, bit 3 two-line mode and bit 2 the 5x10 font.
/// This driver always runs the bus in 4-bit mode.
pub const FUNCTION_SET: u8 = 0x20;

/// Set CGRAM address command (0x40)
///
/// Lower 6 bits carry the address.
pub const SET_CGRAM_ADDRESS: u8 = 0x40;

/// Set DDRAM address command (0x80)
///
/// Lower 7 bits carry the address.
pub const SET_DDRAM_ADDRESS: u8 = 0x80;

// Option flags

/// Entry mode: move the cursor right after each access
pub const ENTRY_INCREMENT: u8 = 0x02;
/// Entry mode: shift the display along with the cursor
pub const ENTRY_SHIFT: u8 = 0x01;

/// Display control: display on
pub const DISPLAY_ON: u8 = 0x04;
/// Display control: underline cursor visible
pub const CURSOR_ON: u8 = 0x02;
/// Display control: blinking block cursor
pub const BLINK_ON: u8 = 0x01;

/// Cursor shift: move the whole display instead of the cursor
pub const SHIFT_DISPLAY: u8 = 0x08;
/// Cursor shift: move right instead of left
pub const SHIFT_RIGHT: u8 = 0x04;

/// Cursor left, the instruction sent for a backspace (0x10)
pub const CURSOR_LEFT: u8 = CURSOR_SHIFT;

// Status byte

/// Busy flag, bit 7 of the status byte
pub const BUSY_FLAG: u8 = 0x80;
/// Address counter, lower 7 bits of the status byte
pub const ADDRESS_MASK: u8 = 0x7F;

// Bring-up nibbles

/// Nibble sent three times to force a known 8-bit state after power-on
pub const INIT_RESET_NIBBLE: u8 = 0b0011;
/// Nibble that switches the controller to the 4-bit bus
pub const INIT_FOUR_BIT_NIBBLE: u8 = 0b0010;

// Control codes understood by `Lcd::put_char`

/// Form feed, clears the display
pub const CONTROL_CLEAR: u8 = 0x0C;
/// Line feed, moves to the start of line two
pub const CONTROL_LINE_FEED: u8 = b'\n';
/// Backspace, moves the cursor one position left
pub const CONTROL_BACKSPACE: u8 = 0x08;

// Timing

/// Wait after power is applied before the first nibble, in milliseconds
pub const POWER_ON_DELAY_MS: u32 = 15;
/// Wait after each reset nibble, in milliseconds
pub const RESET_NIBBLE_DELAY_MS: u32 = 5;
/// Settle time after clear and return-home, in milliseconds
pub const CLEAR_SETTLE_MS: u32 = 2;
/// Enable pulse width for writes, in microseconds
pub const ENABLE_PULSE_US: u32 = 2;
/// Enable high time before sampling the second nibble of a read, in microseconds
pub const READ_ACCESS_US: u32 = 1;
/// Address/data setup time around Enable edges, in nanoseconds
pub const SETUP_DELAY_NS: u32 = 200;
