//! HD44780 character LCD, 4-bit parallel interface
//!
//! Write-only wiring (R/W tied to ground): RS, EN and D4..D7. Every byte is
//! sent as two nibbles, high first, latched on the falling edge of EN.
//! Timing uses the datasheet worst cases so no busy flag is needed.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use panel_display::{DisplayBackend, DisplayError, RawLine};
use panel_protocol::{Bitmap, GLYPH_SLOTS};

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_CGRAM: u8 = 0x40;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the second line
const LINE_TWO_ADDR: u8 = 0x40;

const POWER_ON_DELAY_US: u32 = 50_000;
const CLEAR_DELAY_US: u32 = 2_000;
const COMMAND_DELAY_US: u32 = 50;

/// HD44780 driver
pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    /// D4, D5, D6, D7
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Take the pins and run the 4-bit initialisation sequence
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Result<Self, DisplayError> {
        let mut lcd = Self {
            rs,
            en,
            data,
            delay,
        };
        lcd.init()?;
        Ok(lcd)
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_us(POWER_ON_DELAY_US);
        self.rs.set_low().map_err(|_| DisplayError::Communication)?;

        // Three times 8-bit mode, then switch to 4-bit
        self.write_nibble(0x03)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x03)?;
        self.write_nibble(0x02)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_DELAY_US);
        self.command(CMD_ENTRY_MODE_INCREMENT)
    }

    /// Send an instruction byte
    pub fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.rs.set_low().map_err(|_| DisplayError::Communication)?;
        self.write_byte(byte)
    }

    /// Send a data byte to the current RAM address
    pub fn data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.rs.set_high().map_err(|_| DisplayError::Communication)?;
        self.write_byte(byte)
    }

    /// Give the pins back
    pub fn release(self) -> (P, P, [P; 4], D) {
        (self.rs, self.en, self.data, self.delay)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            let result = if nibble & (1 << bit) != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            result.map_err(|_| DisplayError::Communication)?;
        }
        self.en.set_high().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_us(1);
        self.en.set_low().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_us(COMMAND_DELAY_US);
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> DisplayBackend for Hd44780<P, D> {
    fn program_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), DisplayError> {
        if slot as usize >= GLYPH_SLOTS {
            return Err(DisplayError::InvalidSlot);
        }
        self.command(CMD_SET_CGRAM | slot << 3)?;
        for row in bitmap {
            self.data(*row)?;
        }
        Ok(())
    }

    fn write(&mut self, line_one: &RawLine, line_two: &RawLine) -> Result<(), DisplayError> {
        for (addr, line) in [(0, line_one), (LINE_TWO_ADDR, line_two)] {
            self.command(CMD_SET_DDRAM | addr)?;
            for byte in line {
                self.data(*byte)?;
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_DELAY_US);
        Ok(())
    }
}
