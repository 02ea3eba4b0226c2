//! Plain-text rendering of grid snapshots.

use life_core::StepReport;
use std::fmt::Write;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const ALIVE: char = '#';
const DEAD: char = '.';

/// Draw a snapshot as rows of `#`/`.`, followed by the step line when present
pub fn render_frame(snapshot: &[Vec<u8>], report: Option<&StepReport>) -> String {
    let cols = snapshot.first().map(Vec::len).unwrap_or(0);
    let mut frame = String::with_capacity((cols + 1) * snapshot.len() + 64);

    for row in snapshot {
        frame.extend(row.iter().map(|&v| if v == 1 { ALIVE } else { DEAD }));
        frame.push('\n');
    }

    if let Some(report) = report {
        let _ = writeln!(frame, "{}", report);
    }

    frame
}

/// Frame prefixed with the ANSI sequence that clears the terminal
pub fn render_screen(snapshot: &[Vec<u8>], report: Option<&StepReport>) -> String {
    format!("{}{}", CLEAR_SCREEN, render_frame(snapshot, report))
}
