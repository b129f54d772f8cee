use std::time::Duration;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use reports_core::formatting::format_count;
///
/// assert_eq!(format_count(5), "5");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format elapsed wall-clock time as seconds rounded to two decimals.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use reports_core::formatting::format_seconds;
///
/// assert_eq!(format_seconds(Duration::from_millis(1234)), "1.23");
/// assert_eq!(format_seconds(Duration::ZERO), "0.00");
/// ```
pub fn format_seconds(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}

/// The timing line logged after every report run.
///
/// `includes_output` tells whether writing the report file was part of the
/// measured span.
pub fn timing_message(elapsed: Duration, includes_output: bool) -> String {
    let note = if includes_output {
        "(Including the time it took to generate the report file.)"
    } else {
        "(NOT including the time it took to generate a report file.)"
    };
    format!("Took {} seconds. {}", format_seconds(elapsed), note)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
