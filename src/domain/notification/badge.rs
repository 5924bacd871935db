/// Counts above this render as `"99+"`.
pub const BADGE_CEILING: usize = 99;

/// Text for the bell badge, or `None` when there is nothing unread.
pub fn badge_label(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        n if n > BADGE_CEILING => Some(format!("{}+", BADGE_CEILING)),
        n => Some(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_badge_when_nothing_unread() {
        assert_eq!(badge_label(0), None);
    }

    #[test]
    fn shows_exact_count_up_to_ceiling() {
        assert_eq!(badge_label(42).as_deref(), Some("42"));
        assert_eq!(badge_label(99).as_deref(), Some("99"));
    }

    #[test]
    fn caps_above_ceiling() {
        assert_eq!(badge_label(100).as_deref(), Some("99+"));
        assert_eq!(badge_label(150).as_deref(), Some("99+"));
    }
}
