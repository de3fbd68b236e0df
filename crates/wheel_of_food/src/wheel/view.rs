use super::LABEL_MAX_CHARS;
use super::model::{Wheel, WheelSlice};
use super::theme::{self, ANSI_RESET};

const BELL: char = '\x07';

/// Shortens long names to fit a slice: 16 characters followed by `...`.
pub fn label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let kept: String = name.chars().take(LABEL_MAX_CHARS - 2).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

fn swatch(slice: &WheelSlice, text: &str) -> String {
    format!(
        "{}{} {:<width$} {}",
        theme::ansi_background(slice.color),
        theme::ansi_foreground(theme::text_color(slice.color)),
        text,
        ANSI_RESET,
        width = LABEL_MAX_CHARS + 1,
    )
}

/// One line per slice, in wheel order.
pub fn legend(wheel: &Wheel) -> String {
    if wheel.is_empty() {
        return "No restaurants".to_string();
    }
    wheel
        .slices()
        .iter()
        .enumerate()
        .map(|(i, slice)| format!("{:>2} {}", i + 1, swatch(slice, &label(&slice.restaurant.name))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the slice under the pointer as a single, self-overwriting terminal line.
///
/// With sound enabled each change of slice rings the terminal bell, like the tick of a real
/// wheel passing its pointer.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    sound: bool,
    last_pointer: Option<usize>,
}

impl FrameRenderer {
    pub fn new(sound: bool) -> Self {
        Self {
            sound,
            last_pointer: None,
        }
    }

    pub fn render(&mut self, wheel: &Wheel) -> String {
        let Some(slice) = wheel.slice_under_pointer() else {
            return "\r  No restaurants".to_string();
        };

        let pointer = wheel.pointer_index();
        let ticked = self.last_pointer.is_some() && self.last_pointer != pointer;
        self.last_pointer = pointer;

        let mut line = format!("\r  ▼ {}", swatch(slice, &label(&slice.restaurant.name)));
        if ticked && self.sound {
            line.push(BELL);
        }
        line
    }
}
