//! 4x4 matrix keypad
//!
//! Columns are driven low one at a time while the rows, pulled up, are read
//! back; a low row means the key at that crossing is down. A change has to
//! show up in two consecutive scans before it is reported, so callers should
//! poll every few tens of milliseconds (50 ms covers typical switch bounce).
//!
//! The host runtime reads keys from stdin; this driver is for boards with a
//! real matrix wired to GPIO.

use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Vec;
use panel_protocol::{ButtonLabel, KeyEvent, BUTTON_COUNT};

/// Rows and columns of the matrix
pub const MATRIX_SIZE: usize = 4;

/// Keypad errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadError {
    /// A row or column pin failed
    Pin,
}

/// Matrix keypad scanner
pub struct MatrixKeypad<R, C> {
    rows: [R; MATRIX_SIZE],
    cols: [C; MATRIX_SIZE],
    /// Debounced state, bit `row * 4 + col` set while pressed
    state: u16,
    /// Last raw scan
    raw: u16,
}

impl<R: InputPin, C: OutputPin> MatrixKeypad<R, C> {
    /// Create a scanner with every column released (high)
    pub fn new(rows: [R; MATRIX_SIZE], mut cols: [C; MATRIX_SIZE]) -> Result<Self, KeypadError> {
        for col in cols.iter_mut() {
            col.set_high().map_err(|_| KeypadError::Pin)?;
        }
        Ok(Self {
            rows,
            cols,
            state: 0,
            raw: 0,
        })
    }

    /// Read the whole matrix once
    pub fn scan(&mut self) -> Result<u16, KeypadError> {
        let mut pressed = 0u16;
        for (c, col) in self.cols.iter_mut().enumerate() {
            col.set_low().map_err(|_| KeypadError::Pin)?;
            for (r, row) in self.rows.iter_mut().enumerate() {
                if row.is_low().map_err(|_| KeypadError::Pin)? {
                    pressed |= 1 << (r * MATRIX_SIZE + c);
                }
            }
            col.set_high().map_err(|_| KeypadError::Pin)?;
        }
        Ok(pressed)
    }

    /// Scan and return every debounced edge, in matrix order
    pub fn poll(&mut self) -> Result<Vec<KeyEvent, BUTTON_COUNT>, KeypadError> {
        let raw = self.scan()?;
        let stable = raw & self.raw | !raw & !self.raw;
        self.raw = raw;

        // Only bits that agree with the previous scan may change
        let next = (self.state & !stable) | (raw & stable);
        let changed = next ^ self.state;
        self.state = next;

        let mut events = Vec::new();
        for index in 0..BUTTON_COUNT as u8 {
            if changed & (1 << index) == 0 {
                continue;
            }
            if let Some(label) = ButtonLabel::from_index(index) {
                let pressed = next & (1 << index) != 0;
                // At most one event per button
                let _ = events.push(KeyEvent { label, pressed });
            }
        }
        Ok(events)
    }

    /// Whether `label` is currently held (debounced)
    pub fn is_pressed(&self, label: ButtonLabel) -> bool {
        self.state & (1 << label.index()) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Shared wiring: which column is driven low, which keys are held
    #[derive(Default)]
    struct Matrix {
        active_col: Cell<Option<usize>>,
        held: Cell<u16>,
    }

    struct ColPin {
        index: usize,
        matrix: Rc<Matrix>,
    }

    struct RowPin {
        index: usize,
        matrix: Rc<Matrix>,
    }

    impl ErrorType for ColPin {
        type Error = Infallible;
    }

    impl OutputPin for ColPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.matrix.active_col.set(Some(self.index));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.matrix.active_col.get() == Some(self.index) {
                self.matrix.active_col.set(None);
            }
            Ok(())
        }
    }

    impl ErrorType for RowPin {
        type Error = Infallible;
    }

    impl InputPin for RowPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            let Some(col) = self.matrix.active_col.get() else {
                return Ok(false);
            };
            let bit = self.index * MATRIX_SIZE + col;
            Ok(self.matrix.held.get() & (1 << bit) != 0)
        }
    }

    fn keypad() -> (Rc<Matrix>, MatrixKeypad<RowPin, ColPin>) {
        let matrix = Rc::new(Matrix::default());
        let rows = core::array::from_fn(|index| RowPin {
            index,
            matrix: matrix.clone(),
        });
        let cols = core::array::from_fn(|index| ColPin {
            index,
            matrix: matrix.clone(),
        });
        (matrix.clone(), MatrixKeypad::new(rows, cols).unwrap())
    }

    fn hold(matrix: &Matrix, label: ButtonLabel) {
        matrix.held.set(matrix.held.get() | 1 << label.index());
    }

    fn release(matrix: &Matrix, label: ButtonLabel) {
        matrix.held.set(matrix.held.get() & !(1 << label.index()));
    }

    #[test]
    fn test_scan_maps_row_major() {
        let (matrix, mut keypad) = keypad();
        hold(&matrix, ButtonLabel::B);
        hold(&matrix, ButtonLabel::STAR);
        let raw = keypad.scan().unwrap();
        assert_eq!(raw, 1 << 7 | 1 << 12);
    }

    #[test]
    fn test_press_needs_two_scans() {
        let (matrix, mut keypad) = keypad();
        hold(&matrix, ButtonLabel::FIVE);
        assert!(keypad.poll().unwrap().is_empty());
        let events = keypad.poll().unwrap();
        assert_eq!(events.as_slice(), &[KeyEvent::press(ButtonLabel::FIVE)]);
        assert!(keypad.is_pressed(ButtonLabel::FIVE));
        // Holding produces no further events
        assert!(keypad.poll().unwrap().is_empty());
    }

    #[test]
    fn test_release_edge() {
        let (matrix, mut keypad) = keypad();
        hold(&matrix, ButtonLabel::HASH);
        keypad.poll().unwrap();
        keypad.poll().unwrap();
        release(&matrix, ButtonLabel::HASH);
        keypad.poll().unwrap();
        let events = keypad.poll().unwrap();
        assert_eq!(events.as_slice(), &[KeyEvent::release(ButtonLabel::HASH)]);
    }

    #[test]
    fn test_bounce_is_ignored() {
        let (matrix, mut keypad) = keypad();
        hold(&matrix, ButtonLabel::ONE);
        keypad.poll().unwrap();
        release(&matrix, ButtonLabel::ONE);
        assert!(keypad.poll().unwrap().is_empty());
        assert!(keypad.poll().unwrap().is_empty());
        assert!(!keypad.is_pressed(ButtonLabel::ONE));
    }

    #[test]
    fn test_columns_released_after_scan() {
        let (matrix, mut keypad) = keypad();
        keypad.scan().unwrap();
        assert_eq!(matrix.active_col.get(), None);
    }
}
