//! Test doubles: a simulated HD44780 and line probes for both wirings

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::command::{ADDRESS_MASK, BUSY_FLAG, SHIFT_DISPLAY, SHIFT_RIGHT};
use crate::interface::{Direction, LcdInterface, Signal};
use crate::pin::{DataPin, PinInterface};
use crate::port::{DirectionPolarity, PortInterface, PortLayout, PortRegisters};

/// Something the simulated controller observed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Nibble latched while the controller was still on the 8-bit bus
    Nibble(u8),
    /// Byte written, `data` is the RS level
    Write { data: bool, value: u8 },
    /// Byte read, `data` is the RS level
    Read { data: bool, value: u8 },
    /// Delay requested by the driver, in nanoseconds
    Delay(u64),
}

/// Bus protocol rule broken by the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    ControlChangedWhileEnabled(Signal),
    WriteWhileBusy(u8),
    WriteWhileInput,
    ReadWhileOutput,
}

#[derive(Debug)]
pub struct State {
    pub events: Vec<Event>,
    pub violations: Vec<Violation>,
    pub ddram: [u8; 128],
    pub cgram: [u8; 64],
    pub address: u8,
    pub cgram_mode: bool,
    pub increment: bool,
    pub display_control: u8,
    pub function_set: u8,
    /// Status reads that report busy after every completed write
    pub busy_polls: u32,
    /// Report busy forever
    pub stuck_busy: bool,
    busy_remaining: u32,
    enable: bool,
    register_select: bool,
    read_write: bool,
    direction: Direction,
    bus: u8,
    four_bit: bool,
    pending: Option<u8>,
    read_value: u8,
    read_low: bool,
}

impl State {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            violations: Vec::new(),
            ddram: [b' '; 128],
            cgram: [0; 64],
            address: 0,
            cgram_mode: false,
            increment: true,
            display_control: 0,
            function_set: 0,
            busy_polls: 0,
            stuck_busy: false,
            busy_remaining: 0,
            enable: false,
            register_select: false,
            read_write: false,
            direction: Direction::Output,
            bus: 0,
            four_bit: false,
            pending: None,
            read_value: 0,
            read_low: false,
        }
    }

    fn busy(&self) -> bool {
        self.stuck_busy || self.busy_remaining > 0
    }

    fn advance(&mut self, forward: bool) {
        let mask = if self.cgram_mode { 0x3F } else { ADDRESS_MASK };
        self.address = if forward {
            self.address.wrapping_add(1)
        } else {
            self.address.wrapping_sub(1)
        } & mask;
    }

    fn execute(&mut self, value: u8) {
        if value & 0x80 != 0 {
            self.address = value & ADDRESS_MASK;
            self.cgram_mode = false;
        } else if value & 0x40 != 0 {
            self.address = value & 0x3F;
            self.cgram_mode = true;
        } else if value & 0x20 != 0 {
            self.function_set = value;
        } else if value & 0x10 != 0 {
            if value & SHIFT_DISPLAY == 0 {
                self.advance(value & SHIFT_RIGHT != 0);
            }
        } else if value & 0x08 != 0 {
            self.display_control = value;
        } else if value & 0x04 != 0 {
            self.increment = value & 0x02 != 0;
        } else if value & 0x02 != 0 {
            self.address = 0;
            self.cgram_mode = false;
        } else if value == 0x01 {
            self.ddram = [b' '; 128];
            self.address = 0;
            self.cgram_mode = false;
            self.increment = true;
        }
    }

    fn latch_write(&mut self) {
        let nibble = self.bus;
        if !self.four_bit {
            self.events.push(Event::Nibble(nibble));
            if nibble == 0x2 {
                self.four_bit = true;
                self.pending = None;
            }
            return;
        }
        let Some(high) = self.pending.take() else {
            self.pending = Some(nibble);
            return;
        };
        let value = (high << 4) | nibble;
        if self.busy() {
            self.violations.push(Violation::WriteWhileBusy(value));
        }
        self.events.push(Event::Write {
            data: self.register_select,
            value,
        });
        if self.register_select {
            if self.cgram_mode {
                self.cgram[self.address as usize] = value;
            } else {
                self.ddram[self.address as usize] = value;
            }
            self.advance(self.increment);
        } else {
            self.execute(value);
        }
        self.busy_remaining = self.busy_polls;
    }

    fn start_read(&mut self) {
        self.read_value = if self.register_select {
            if self.cgram_mode {
                self.cgram[self.address as usize]
            } else {
                self.ddram[self.address as usize]
            }
        } else {
            let flag = if self.busy() { BUSY_FLAG } else { 0 };
            flag | self.address
        };
    }

    fn finish_read(&mut self) {
        self.events.push(Event::Read {
            data: self.register_select,
            value: self.read_value,
        });
        if self.register_select {
            self.advance(self.increment);
        } else if self.busy_remaining > 0 {
            self.busy_remaining -= 1;
        }
    }
}

/// Simulated controller, wired straight to the driver as an [`LcdInterface`]
#[derive(Clone, Debug)]
pub struct Controller(Rc<RefCell<State>>);

impl Controller {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(State::new())))
    }

    /// Controller that stays busy for `polls` status reads after every write
    pub fn with_busy_polls(polls: u32) -> Self {
        let controller = Self::new();
        controller.0.borrow_mut().busy_polls = polls;
        controller
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.0.clone())
    }

    pub fn state(&self) -> Ref<'_, State> {
        self.0.borrow()
    }

    pub fn set_stuck_busy(&self, stuck: bool) {
        self.0.borrow_mut().stuck_busy = stuck;
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    /// Events without the delays
    pub fn transfers(&self) -> Vec<Event> {
        self.0
            .borrow()
            .events
            .iter()
            .copied()
            .filter(|event| !matches!(event, Event::Delay(_)))
            .collect()
    }

    /// Bytes written, as (rs, value)
    pub fn writes(&self) -> Vec<(bool, u8)> {
        self.0
            .borrow()
            .events
            .iter()
            .filter_map(|event| match *event {
                Event::Write { data, value } => Some((data, value)),
                _ => None,
            })
            .collect()
    }

    pub fn current_direction(&self) -> Direction {
        self.0.borrow().direction
    }

    pub fn register_select(&self) -> bool {
        self.0.borrow().register_select
    }
}

impl LcdInterface for Controller {
    type Error = Infallible;

    fn configure(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().direction = Direction::Output;
        Ok(())
    }

    fn set_signal(&mut self, signal: Signal, high: bool) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        match signal {
            Signal::Enable => {
                let was = state.enable;
                state.enable = high;
                if !was && high && state.read_write && state.four_bit && !state.read_low {
                    state.start_read();
                }
                if was && !high {
                    if state.read_write {
                        if state.read_low {
                            state.read_low = false;
                            state.finish_read();
                        } else {
                            state.read_low = true;
                        }
                    } else {
                        state.latch_write();
                    }
                }
            }
            Signal::RegisterSelect | Signal::ReadWrite => {
                let current = if signal == Signal::RegisterSelect {
                    &mut state.register_select
                } else {
                    &mut state.read_write
                };
                let changed = *current != high;
                *current = high;
                if changed && state.enable {
                    state
                        .violations
                        .push(Violation::ControlChangedWhileEnabled(signal));
                }
            }
        }
        Ok(())
    }

    fn set_data_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        self.0.borrow_mut().direction = direction;
        Ok(())
    }

    fn data_direction(&self) -> Direction {
        self.0.borrow().direction
    }

    fn write_data(&mut self, nibble: u8) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.direction == Direction::Input {
            state.violations.push(Violation::WriteWhileInput);
        }
        state.bus = nibble & 0x0F;
        Ok(())
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.direction == Direction::Output {
            state.violations.push(Violation::ReadWhileOutput);
        }
        if !(state.enable && state.read_write) {
            return Ok(0);
        }
        Ok(if state.read_low {
            state.read_value & 0x0F
        } else {
            state.read_value >> 4
        })
    }
}

/// Delay that records into the controller's event log instead of waiting
#[derive(Debug)]
pub struct SimDelay(Rc<RefCell<State>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::Delay(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.0
            .borrow_mut()
            .events
            .push(Event::Delay(u64::from(us) * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0
            .borrow_mut()
            .events
            .push(Event::Delay(u64::from(ms) * 1_000_000));
    }
}

/// Delay that does nothing
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// Line probes

/// Logical state of the seven lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lines {
    pub enable: bool,
    pub register_select: bool,
    pub read_write: bool,
    /// Host-driven data nibble
    pub data: u8,
    /// Data lines released to the controller
    pub inputs: u8,
}

/// Shared line state, snapshotted every time a control line changes
#[derive(Debug, Default)]
pub struct Probe {
    lines: Lines,
    pub trace: Vec<Lines>,
    /// Level the far end drives on released data lines
    pub drive: u8,
}

impl Probe {
    fn update(&mut self, apply: impl FnOnce(&mut Lines)) {
        let before = self.lines;
        apply(&mut self.lines);
        let after = self.lines;
        if (before.enable, before.register_select, before.read_write)
            != (after.enable, after.register_select, after.read_write)
        {
            self.trace.push(after);
        }
    }

    fn sampled_data(&self) -> u8 {
        ((self.lines.data & !self.lines.inputs) | (self.drive & self.lines.inputs)) & 0x0F
    }
}

pub type ProbeHandle = Rc<RefCell<Probe>>;

#[derive(Clone, Copy, Debug)]
pub enum Line {
    Enable,
    RegisterSelect,
    ReadWrite,
    Data(u8),
}

/// GPIO pin feeding a [`Probe`]
#[derive(Debug)]
pub struct ProbePin {
    probe: ProbeHandle,
    line: Line,
}

impl ErrorType for ProbePin {
    type Error = Infallible;
}

impl ProbePin {
    fn drive(&self, high: bool) {
        self.probe.borrow_mut().update(|lines| match self.line {
            Line::Enable => lines.enable = high,
            Line::RegisterSelect => lines.register_select = high,
            Line::ReadWrite => lines.read_write = high,
            Line::Data(bit) => {
                if high {
                    lines.data |= 1 << bit;
                } else {
                    lines.data &= !(1 << bit);
                }
            }
        });
    }
}

impl OutputPin for ProbePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

impl InputPin for ProbePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let probe = self.probe.borrow();
        Ok(match self.line {
            Line::Enable => probe.lines.enable,
            Line::RegisterSelect => probe.lines.register_select,
            Line::ReadWrite => probe.lines.read_write,
            Line::Data(bit) => probe.sampled_data() & (1 << bit) != 0,
        })
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl DataPin for ProbePin {
    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        if let Line::Data(bit) = self.line {
            self.probe.borrow_mut().update(|lines| lines.inputs |= 1 << bit);
        }
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        if let Line::Data(bit) = self.line {
            self.probe
                .borrow_mut()
                .update(|lines| lines.inputs &= !(1 << bit));
        }
        Ok(())
    }
}

pub type ProbePinInterface = PinInterface<ProbePin, ProbePin, ProbePin, ProbePin>;

pub fn probe_pin_interface(probe: &ProbeHandle) -> ProbePinInterface {
    let pin = |line| ProbePin {
        probe: probe.clone(),
        line,
    };
    PinInterface::new(
        pin(Line::Enable),
        pin(Line::RegisterSelect),
        pin(Line::ReadWrite),
        [
            pin(Line::Data(0)),
            pin(Line::Data(1)),
            pin(Line::Data(2)),
            pin(Line::Data(3)),
        ],
    )
}

/// I/O port registers feeding a [`Probe`]
#[derive(Debug)]
pub struct ProbePort {
    probe: ProbeHandle,
    layout: PortLayout,
    polarity: DirectionPolarity,
    latch: u8,
    direction: u8,
}

impl PortRegisters for ProbePort {
    type Error = Infallible;

    fn read_input(&mut self) -> Result<u8, Self::Error> {
        let data = self.probe.borrow().sampled_data();
        let shift = self.layout.data_shift();
        Ok((self.latch & !self.layout.data_mask()) | (data << shift))
    }

    fn read_latch(&mut self) -> Result<u8, Self::Error> {
        Ok(self.latch)
    }

    fn write_latch(&mut self, value: u8) -> Result<(), Self::Error> {
        self.latch = value;
        let layout = self.layout;
        self.probe.borrow_mut().update(|lines| {
            lines.enable = value & layout.signal_mask(Signal::Enable) != 0;
            lines.register_select = value & layout.signal_mask(Signal::RegisterSelect) != 0;
            lines.read_write = value & layout.signal_mask(Signal::ReadWrite) != 0;
            lines.data = (value >> layout.data_shift()) & 0x0F;
        });
        Ok(())
    }

    fn read_direction(&mut self) -> Result<u8, Self::Error> {
        Ok(self.direction)
    }

    fn write_direction(&mut self, value: u8) -> Result<(), Self::Error> {
        self.direction = value;
        let set = (value >> self.layout.data_shift()) & 0x0F;
        let inputs = match self.polarity {
            DirectionPolarity::SetIsInput => set,
            DirectionPolarity::SetIsOutput => !set & 0x0F,
        };
        self.probe.borrow_mut().update(|lines| lines.inputs = inputs);
        Ok(())
    }
}

pub fn probe_port_interface(
    probe: &ProbeHandle,
    layout: PortLayout,
    polarity: DirectionPolarity,
) -> PortInterface<ProbePort> {
    let port = ProbePort {
        probe: probe.clone(),
        layout,
        polarity,
        latch: 0,
        direction: match polarity {
            DirectionPolarity::SetIsInput => 0xFF,
            DirectionPolarity::SetIsOutput => 0x00,
        },
    };
    PortInterface::new(port, layout, polarity)
}
