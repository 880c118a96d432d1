//! Finds a target duration written into the instruction ("30-second", "2 minutes", "1:30").

use once_cell::sync::Lazy;
use regex::Regex;

static UNIT_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*-?\s*(minutes?|mins?|m|seconds?|secs?|s)\b")
        .expect("valid duration regex")
});

static CLOCK_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2}):([0-5]\d)\b").expect("valid clock regex")
});

/// Words that turn a bare `80s` into a decade.
const ERA_WORDS: [&str; 10] = [
    "style", "retro", "vibe", "vibes", "era", "aesthetic", "look", "music", "fashion", "throwback",
];

/// Seconds from the first duration mention, or `None`. Zero durations and decades ("80s retro
/// style", "1990s", "90s-style") are skipped.
pub fn parse_duration_hint(instruction: &str) -> Option<f64> {
    for caps in UNIT_DURATION.captures_iter(instruction) {
        let end = caps.get(0)?.end();
        let number = &caps[1];
        let unit = caps[2].to_ascii_lowercase();
        if unit == "s" && is_decade(number, &instruction[end..]) {
            continue;
        }
        let Ok(value) = number.parse::<f64>() else {
            continue;
        };
        let seconds = if unit.starts_with('m') {
            value * 60.0
        } else {
            value
        };
        if seconds > 0.0 {
            return Some(seconds);
        }
    }
    let caps = CLOCK_DURATION.captures(instruction)?;
    let minutes: f64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    let total = minutes * 60.0 + seconds;
    (total > 0.0).then_some(total)
}

/// `number` followed by a bare `s` names a decade when it is a year ("1980s"), or a round
/// tens value followed by an apostrophe, a `-style` suffix or an era word.
fn is_decade(number: &str, rest: &str) -> bool {
    let Ok(n) = number.parse::<u32>() else {
        return false;
    };
    if (1000..=2990).contains(&n) && n % 10 == 0 {
        return true;
    }
    if n % 10 != 0 || n > 90 {
        return false;
    }
    let rest = rest.trim_start();
    if rest.starts_with(['\'', '\u{2019}']) || rest.starts_with('-') {
        return true;
    }
    let next = rest
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    ERA_WORDS.contains(&next.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_seconds() {
        assert_eq!(parse_duration_hint("Create a 30-second highlight reel"), Some(30.0));
    }

    #[test]
    fn spelled_units() {
        assert_eq!(parse_duration_hint("about 45 seconds long"), Some(45.0));
        assert_eq!(parse_duration_hint("a 2 minutes recap"), Some(120.0));
        assert_eq!(parse_duration_hint("1.5 min montage"), Some(90.0));
        assert_eq!(parse_duration_hint("quick 15s teaser"), Some(15.0));
        assert_eq!(parse_duration_hint("3 Mins"), Some(180.0));
    }

    #[test]
    fn clock_form() {
        assert_eq!(parse_duration_hint("cut it down to 1:30"), Some(90.0));
    }

    #[test]
    fn decades_are_not_durations() {
        assert_eq!(parse_duration_hint("Make a recap in 80s retro style"), None);
        assert_eq!(parse_duration_hint("a 90s-style montage"), None);
        assert_eq!(parse_duration_hint("1980s vibes only"), None);
        assert_eq!(parse_duration_hint("70s music, keep it 45 seconds"), Some(45.0));
        assert_eq!(parse_duration_hint("a 20s teaser"), Some(20.0));
    }

    #[test]
    fn no_hint() {
        assert_eq!(parse_duration_hint("make the best moments from 3 videos"), None);
        assert_eq!(parse_duration_hint("0 seconds"), None);
        assert_eq!(parse_duration_hint("the sessions recap"), None);
    }
}
