//! Alert message template.

use std::fmt::Write as _;

use super::FilteredEvent;

/// Timestamp layout used in alerts, always rendered in UTC.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the Markdown alert message for one filtered event.
///
/// The layout is fixed: one labelled field per line, in the order
/// magnitude, location, distance, depth, time, type, status, significance,
/// felt reports, tsunami, PAGER alert, id. Feed-supplied text is passed
/// through [`escape_markdown`]; the labels are not.
#[must_use]
pub fn format_notification(event: &FilteredEvent) -> String {
    let mut msg = String::from("🌍 *Earthquake Alert!*\n");
    // Writing to a String cannot fail.
    let _ = writeln!(
        msg,
        "Magnitude: {:.1} ({})",
        event.magnitude,
        escape_markdown(&event.mag_type)
    );
    let _ = writeln!(msg, "Location: {}", escape_markdown(&event.place));
    let _ = writeln!(msg, "Distance: {:.1} km from reference point", event.distance_km);
    let _ = writeln!(
        msg,
        "Depth: {:.1} km ({})",
        event.depth_km, event.depth_category
    );
    let _ = writeln!(
        msg,
        "Time: {} UTC ({})",
        event.time.format(TIME_FORMAT),
        event.time_ago
    );
    let _ = writeln!(msg, "Type: {}", escape_markdown(&event.event_type));
    let _ = writeln!(msg, "Status: {}", escape_markdown(&event.status));
    let _ = writeln!(msg, "Significance: {}", event.significance);
    let _ = writeln!(msg, "Felt reports: {}", event.felt);
    let _ = writeln!(msg, "Tsunami: {}", event.tsunami_label());
    let _ = writeln!(msg, "PAGER alert: {}", escape_markdown(&event.alert));
    let _ = write!(msg, "ID: {}", escape_markdown(&event.id));
    msg
}

/// Backslash-escapes the entity markers of Telegram's legacy Markdown
/// (`_`, `*`, `` ` ``, `[`) so feed text renders literally.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DepthCategory, GeoPoint};
    use chrono::{TimeZone, Utc};

    fn event() -> FilteredEvent {
        FilteredEvent {
            id: "us7000q1ab".to_string(),
            feed_id: Some("us7000q1ab".to_string()),
            magnitude: 5.2,
            mag_type: "mww".to_string(),
            place: "45 km SSW of Jurm, Afghanistan".to_string(),
            epicentre: GeoPoint::new(36.45, 70.7),
            depth_km: 212.34,
            depth_category: DepthCategory::Intermediate,
            distance_km: 345.678,
            time: Utc
                .with_ymd_and_hms(2025, 6, 19, 19, 34, 10)
                .single()
                .unwrap_or_default(),
            updated: None,
            time_ago: "2 hours ago".to_string(),
            event_type: "earthquake".to_string(),
            status: "reviewed".to_string(),
            net: "us".to_string(),
            significance: 416,
            felt: 3,
            tsunami: false,
            alert: "green".to_string(),
            cdi: Some(3.4),
            mmi: None,
            nst: None,
            gap: Some(31.0),
            rms: Some(0.72),
            dmin: None,
            title: None,
            url: None,
            notification_text: String::new(),
        }
    }

    #[test]
    fn golden_output() {
        let expected = "🌍 *Earthquake Alert!*\n\
                        Magnitude: 5.2 (mww)\n\
                        Location: 45 km SSW of Jurm, Afghanistan\n\
                        Distance: 345.7 km from reference point\n\
                        Depth: 212.3 km (Intermediate)\n\
                        Time: 2025-06-19 19:34:10 UTC (2 hours ago)\n\
                        Type: earthquake\n\
                        Status: reviewed\n\
                        Significance: 416\n\
                        Felt reports: 3\n\
                        Tsunami: No\n\
                        PAGER alert: green\n\
                        ID: us7000q1ab";
        assert_eq!(format_notification(&event()), expected);
    }

    #[test]
    fn contains_magnitude_place_and_id() {
        let e = event();
        let text = format_notification(&e);
        assert!(text.contains("5.2"));
        assert!(text.contains(&e.place));
        assert!(text.contains(&e.id));
    }

    #[test]
    fn whole_magnitude_keeps_one_decimal() {
        let e = FilteredEvent {
            magnitude: 4.0,
            tsunami: true,
            ..event()
        };
        let text = format_notification(&e);
        assert!(text.contains("Magnitude: 4.0 (mww)"));
        assert!(text.contains("Tsunami: Yes"));
    }

    #[test]
    fn feed_text_is_escaped() {
        let e = FilteredEvent {
            mag_type: "mb_lg".to_string(),
            place: "Kuril_sk *area* [x] `y`".to_string(),
            id: "us_1".to_string(),
            ..event()
        };
        let text = format_notification(&e);
        assert!(text.contains("Magnitude: 5.2 (mb\\_lg)"));
        assert!(text.contains("Location: Kuril\\_sk \\*area\\* \\[x] \\`y\\`"));
        assert!(text.contains("ID: us\\_1"));
        // Only the title's bold markers stay unescaped.
        assert!(text.starts_with("🌍 *Earthquake Alert!*\n"));
        assert_eq!(text.matches("\\_").count(), text.matches('_').count());
    }

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_markdown("45 km SSW of Jurm"), "45 km SSW of Jurm");
        assert_eq!(escape_markdown("a_b"), "a\\_b");
    }
}
