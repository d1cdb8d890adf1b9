//! `#RRGGBB` color strings.
//!
//! Colors travel between rule attributes and host attributes as 7-character
//! hex strings. Parsing is strict: anything that is not exactly `#` followed
//! by six hex digits yields black.

use glam::Vec3;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn channel_to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Formats a `0.0..=1.0` RGB triple as `#RRGGBB`.
#[must_use]
pub fn color_string(color: Vec3) -> String {
    let mut s = String::with_capacity(7);
    s.push('#');
    for c in color.to_array() {
        let b = channel_to_byte(c);
        s.push(HEX_DIGITS[(b >> 4) as usize] as char);
        s.push(HEX_DIGITS[(b & 0xF) as usize] as char);
    }
    s
}

/// Parses `#RRGGBB` into a `0.0..=1.0` RGB triple. Malformed input yields black.
#[must_use]
pub fn parse_color(s: &str) -> Vec3 {
    try_parse_color(s).unwrap_or_else(|| {
        log::debug!("Malformed color string '{s}', using black");
        Vec3::ZERO
    })
}

fn try_parse_color(s: &str) -> Option<Vec3> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(|v| f32::from(v) / 255.0);
    Some(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(color_string(Vec3::new(1.0, 0.0, 0.5)), "#FF0080");
        assert_eq!(color_string(Vec3::ZERO), "#000000");
    }

    #[test]
    fn test_parse_lowercase() {
        let c = parse_color("#ff8000");
        assert!((c.x - 1.0).abs() < 1e-6);
        assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
        assert!(c.z.abs() < 1e-6);
    }

    #[test]
    fn test_malformed_is_black() {
        assert_eq!(parse_color("not-a-color"), Vec3::ZERO);
        assert_eq!(parse_color("#12345"), Vec3::ZERO);
        assert_eq!(parse_color("#1234567"), Vec3::ZERO);
        assert_eq!(parse_color("#GG0000"), Vec3::ZERO);
        assert_eq!(parse_color(""), Vec3::ZERO);
    }
}
