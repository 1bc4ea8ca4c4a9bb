//! Address text normalization.

/// Characters treated as word separators in addresses.
const SEPARATORS: [char; 4] = [',', '.', '-', '_'];

/// Canonical comparable form of a raw address.
///
/// Lowercases, turns `,` `.` `-` `_` into spaces, collapses every run of
/// whitespace to a single ASCII space and trims both ends. Absent input
/// normalizes to the empty string. Idempotent.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() || SEPARATORS.contains(&ch) {
            pending_space = true;
            continue;
        }
        // Spaces are only emitted between two kept characters,
        // which trims both ends for free.
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_blank() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("")), "");
        assert_eq!(normalize(Some("   \t\n")), "");
        assert_eq!(normalize(Some(",.-_")), "");
    }

    #[test]
    fn lowercases_and_replaces_separators() {
        assert_eq!(
            normalize(Some("Rue de la Paix 123, 1000 Brussels")),
            "rue de la paix 123 1000 brussels"
        );
        assert_eq!(normalize(Some("St.-Jans_Plein")), "st jans plein");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize(Some("  Avenue \t Louise\n\n456  ")), "avenue louise 456");
        assert_eq!(normalize(Some("a , b")), "a b");
    }

    #[test]
    fn trailing_separator_is_trimmed() {
        assert_eq!(normalize(Some("Kerkstraat 1,")), "kerkstraat 1");
        assert_eq!(normalize(Some("-Kerkstraat 1")), "kerkstraat 1");
    }

    #[test]
    fn keeps_other_punctuation_and_accents() {
        assert_eq!(normalize(Some("Chaussée de Wavre 789/B")), "chaussée de wavre 789/b");
        assert_eq!(normalize(Some("O'Brien (bis)")), "o'brien (bis)");
    }

    #[test]
    fn idempotent_on_samples() {
        for raw in ["A--B", " x. y ", "Boulevard Anspach 789, 1000 Bruxelles", "É_É"] {
            let once = normalize(Some(raw));
            assert_eq!(normalize(Some(&once)), once);
        }
    }
}
