use palette::Srgb;

pub const WHEEL_COLORS: [(u8, u8, u8); 10] = [
    (0xFF, 0x6B, 0x6B),
    (0xFF, 0xA9, 0x4D),
    (0xFF, 0xD4, 0x3B),
    (0x69, 0xDB, 0x7C),
    (0x4D, 0xAB, 0xF7),
    (0x97, 0x75, 0xFA),
    (0xF0, 0x65, 0x95),
    (0x38, 0xD9, 0xA9),
    (0xFF, 0x92, 0x2B),
    (0xA9, 0xE3, 0x4B),
];

pub fn slice_color(index: usize) -> Srgb<u8> {
    let (r, g, b) = WHEEL_COLORS[index % WHEEL_COLORS.len()];
    Srgb::new(r, g, b)
}

pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

/// Black or white, whichever reads better on `background`.
pub fn text_color(background: Srgb<u8>) -> Srgb<u8> {
    let c = background.into_format::<f64>();
    let luma = 0.2126 * c.red + 0.7152 * c.green + 0.0722 * c.blue;
    if luma > 0.6 {
        Srgb::new(0, 0, 0)
    } else {
        Srgb::new(255, 255, 255)
    }
}

pub fn ansi_background(color: Srgb<u8>) -> String {
    format!("\x1b[48;2;{};{};{}m", color.red, color.green, color.blue)
}

pub fn ansi_foreground(color: Srgb<u8>) -> String {
    format!("\x1b[38;2;{};{};{}m", color.red, color.green, color.blue)
}

pub const ANSI_RESET: &str = "\x1b[0m";
