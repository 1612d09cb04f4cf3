//! Output projection
//!
//! Derives every local output (indicator color, matrix cells, display text,
//! buzzer cues) from a slot registry snapshot. Pure except for the per-slot
//! previous-status memory that drives the buzzer.

use core::fmt::Write;

use crate::slots::SlotStatus;
use crate::traits::{
    Buzzer, DisplayLine, Indicator, IndicatorColor, Rgb, SlotMatrix, StatusDisplay,
};

/// Matrix cell color for a Free slot
pub const CELL_FREE: Rgb = Rgb::new(0, 8, 0);
/// Matrix cell color for an Occupied slot
pub const CELL_OCCUPIED: Rgb = Rgb::new(8, 0, 0);
/// Matrix cell color for a Reserved slot (red + green reads as amber)
pub const CELL_RESERVED: Rgb = Rgb::new(4, 8, 0);

/// Buzzer pitch announcing a slot becoming Free
pub const TONE_FREE_HZ: u16 = 2000;
/// Buzzer pitch announcing a slot becoming Occupied
pub const TONE_OCCUPIED_HZ: u16 = 300;
/// Buzzer pitch announcing a slot becoming Reserved
pub const TONE_RESERVED_HZ: u16 = 900;
/// Duration every status-change tone is held
pub const TONE_DURATION_MS: u16 = 250;

/// Upper bound on display lines (header, subheader, one line per slot)
pub const MAX_DISPLAY_LINES: usize = 16;

const HEADER: &str = "Parking";
const SUBHEADER: &str = "Slots:";

/// Summary indicator color from the free-slot count
///
/// No free slots is Red; more than half free is Green; anything between is
/// Yellow.
pub fn indicator_color(free: usize, total: usize) -> IndicatorColor {
    if free == 0 {
        IndicatorColor::Red
    } else if free > total / 2 {
        IndicatorColor::Green
    } else {
        IndicatorColor::Yellow
    }
}

const fn cell_color(status: SlotStatus) -> Rgb {
    match status {
        SlotStatus::Free => CELL_FREE,
        SlotStatus::Occupied => CELL_OCCUPIED,
        SlotStatus::Reserved => CELL_RESERVED,
    }
}

const fn tone_for(status: SlotStatus) -> u16 {
    match status {
        SlotStatus::Free => TONE_FREE_HZ,
        SlotStatus::Occupied => TONE_OCCUPIED_HZ,
        SlotStatus::Reserved => TONE_RESERVED_HZ,
    }
}

/// Projects a slot snapshot onto the output devices
///
/// Runs once per mutation batch and once at startup. The last-rendered
/// status per slot is retained across calls so the buzzer only sounds on an
/// actual change; it starts out all-Free, matching a freshly initialized
/// registry, so the startup render is silent.
#[derive(Debug)]
pub struct OutputProjector<const N: usize> {
    last_rendered: [SlotStatus; N],
}

impl<const N: usize> Default for OutputProjector<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> OutputProjector<N> {
    pub fn new() -> Self {
        Self {
            last_rendered: [SlotStatus::Free; N],
        }
    }

    /// Render a snapshot to all four output devices
    pub fn render<I, M, D, B>(
        &mut self,
        snapshot: &[SlotStatus; N],
        indicator: &mut I,
        matrix: &mut M,
        display: &mut D,
        buzzer: &mut B,
    ) where
        I: Indicator,
        M: SlotMatrix,
        D: StatusDisplay,
        B: Buzzer,
    {
        let free = snapshot.iter().filter(|s| **s == SlotStatus::Free).count();
        indicator.set_color(indicator_color(free, N));

        for (index, status) in snapshot.iter().enumerate() {
            matrix.set_cell(index, cell_color(*status));
        }
        matrix.flush();

        display.render(&Self::display_lines(snapshot));

        for (index, status) in snapshot.iter().enumerate() {
            if *status != self.last_rendered[index] {
                self.last_rendered[index] = *status;
                buzzer.tone(tone_for(*status), TONE_DURATION_MS);
            }
        }

        log::info!("Outputs updated, {} of {} slots free", free, N);
    }

    fn display_lines(snapshot: &[SlotStatus; N]) -> heapless::Vec<DisplayLine, MAX_DISPLAY_LINES> {
        let mut lines = heapless::Vec::new();
        let _ = lines.push(DisplayLine::try_from(HEADER).unwrap_or_default());
        let _ = lines.push(DisplayLine::try_from(SUBHEADER).unwrap_or_default());
        for (index, status) in snapshot.iter().enumerate() {
            let mut line = DisplayLine::new();
            let _ = write!(line, "{}: {}", index + 1, status.label());
            let _ = lines.push(line);
        }
        lines
    }
}
