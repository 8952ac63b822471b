// src/color.rs
//
// Interval -> display color lookup for finger dots.

/// Color shared by the root ("1"/"R") and by any interval label without an
/// entry of its own.
pub const ROOT_COLOR: &str = "#635bff";

/// Display color for an interval label.
///
/// Total function: labels outside the table resolve to [`ROOT_COLOR`].
pub fn interval_color(interval: &str) -> &'static str {
    match interval {
        "1" | "R" => ROOT_COLOR,
        "3" => "#10b981",
        "b3" => "#f59e0b",
        "5" => "#6b7280",
        "#5" | "b5" => "#ef4444",
        "7" => "#a259ff",
        "b7" => "#ec4899",
        "bb7" => "#f97316",
        "9" | "2" => "#06b6d4",
        "b9" => "#dc2626",
        "#9" => "#d97706",
        "11" | "4" => "#84cc16",
        "#11" => "#65a30d",
        "13" | "6" => "#14b8a6",
        "b13" => "#b45309",
        _ => ROOT_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_aliases_share_a_color() {
        assert_eq!(interval_color("1"), interval_color("R"));
        assert_eq!(interval_color("1"), ROOT_COLOR);
    }

    #[test]
    fn test_unknown_interval_falls_back_to_root_color() {
        for label in ["#13", "b11", "sus", "", "weird"] {
            assert_eq!(interval_color(label), interval_color("1"));
        }
    }

    #[test]
    fn test_altered_fifths_match() {
        assert_eq!(interval_color("#5"), interval_color("b5"));
        assert_ne!(interval_color("5"), interval_color("b5"));
    }
}
