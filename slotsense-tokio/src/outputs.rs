//! Console output devices
//!
//! Host-side stand-ins for the four output peripherals; each one reports
//! through the `log` facade instead of driving hardware.

use log::{debug, info};
use slotsense_core::{Buzzer, DisplayLine, Indicator, IndicatorColor, Rgb, SlotMatrix, StatusDisplay};

/// Summary indicator that logs color changes
#[derive(Debug, Default)]
pub struct ConsoleIndicator {
    color: Option<IndicatorColor>,
}

impl ConsoleIndicator {
    pub fn color(&self) -> Option<IndicatorColor> {
        self.color
    }
}

impl Indicator for ConsoleIndicator {
    fn set_color(&mut self, color: IndicatorColor) {
        if self.color != Some(color) {
            info!("Indicator -> {:?}", color);
        }
        self.color = Some(color);
    }
}

/// Matrix that stages cells and logs on flush
#[derive(Debug, Default)]
pub struct ConsoleMatrix {
    cells: Vec<Rgb>,
}

impl ConsoleMatrix {
    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }
}

impl SlotMatrix for ConsoleMatrix {
    fn set_cell(&mut self, index: usize, color: Rgb) {
        if self.cells.len() <= index {
            self.cells.resize(index + 1, Rgb::OFF);
        }
        self.cells[index] = color;
    }

    fn flush(&mut self) {
        debug!("Matrix frame: {:?}", self.cells);
    }
}

/// Text display that logs each rendered line
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    lines: Vec<String>,
}

impl ConsoleDisplay {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl StatusDisplay for ConsoleDisplay {
    fn render(&mut self, lines: &[DisplayLine]) {
        self.lines = lines.iter().map(|l| l.as_str().to_owned()).collect();
        for line in &self.lines {
            info!("Display | {}", line);
        }
    }
}

/// Buzzer that logs requested tones
#[derive(Debug, Default)]
pub struct ConsoleBuzzer {
    last_tone: Option<(u16, u16)>,
}

impl ConsoleBuzzer {
    pub fn last_tone(&self) -> Option<(u16, u16)> {
        self.last_tone
    }
}

impl Buzzer for ConsoleBuzzer {
    fn tone(&mut self, pitch_hz: u16, duration_ms: u16) {
        debug!("Buzzer {} Hz for {} ms", pitch_hz, duration_ms);
        self.last_tone = Some((pitch_hz, duration_ms));
    }
}
