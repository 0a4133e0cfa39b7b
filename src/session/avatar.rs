//! Stable avatar identity derived from the display name alone.

/// Avatar palette as `0xRRGGBB`, shared with the chart segments.
pub const PALETTE: [u32; 8] = [
    0x8B5CF6, 0x06B6D4, 0x10B981, 0xF59E0B, 0xEF4444, 0xEC4899, 0x6366F1, 0x84CC16,
];

/// Index into [`PALETTE`]: sum of the name's character codes modulo the
/// palette size. The empty name maps to index 0.
pub fn palette_index(username: &str) -> usize {
    let sum = username
        .chars()
        .fold(0u64, |acc, ch| acc.wrapping_add(u64::from(ch)));
    (sum % PALETTE.len() as u64) as usize
}

pub fn color_for(username: &str) -> u32 {
    PALETTE[palette_index(username)]
}

/// `#rrggbb` form of [`color_for`].
pub fn css_color_for(username: &str) -> String {
    format!("#{:06x}", color_for(username))
}

pub fn rgb(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Uppercased first character of the name, `?` when empty.
pub fn initial_for(username: &str) -> String {
    match username.chars().next() {
        Some(ch) => ch.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_gets_first_color() {
        assert_eq!(palette_index(""), 0);
        assert_eq!(color_for(""), PALETTE[0]);
    }

    #[test]
    fn color_is_deterministic_and_from_palette() {
        for name in ["", "Alice", "Bob", "Ünïcødé", "System"] {
            let first = color_for(name);
            assert_eq!(first, color_for(name));
            assert!(PALETTE.contains(&first));
        }
    }

    #[test]
    fn index_is_char_sum_modulo_palette() {
        // 'A'(65) + 'l'(108) + 'i'(105) + 'c'(99) + 'e'(101) = 478; 478 % 8 = 6
        assert_eq!(palette_index("Alice"), 6);
        assert_eq!(css_color_for("Alice"), "#6366f1");
    }

    #[test]
    fn rgb_splits_channels() {
        assert_eq!(rgb(0x8B5CF6), [0x8B, 0x5C, 0xF6]);
    }

    #[test]
    fn initial_is_uppercased_or_placeholder() {
        assert_eq!(initial_for("alice"), "A");
        assert_eq!(initial_for(""), "?");
        assert_eq!(initial_for("émile"), "É");
    }
}
