//! Telegram messages for detected records (legacy Markdown parse mode).

use chrono::{DateTime, Utc};
use std::fmt::Write;

use extraction::Record;

const FOOTER: &str = "🤖 *Auto-detected by Launch Monitor*";

/// Backslash-escape the characters legacy Markdown treats as markup.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render one record as a notification.
pub fn format_record(record: &Record, detected_at: DateTime<Utc>) -> String {
    let glyph = record.status.glyph();
    let mut message = format!("{} *{}* {}\n\n", glyph, record.status.label(), glyph);

    // `write!` into a String cannot fail
    let _ = writeln!(message, "*Token:* {}", escape_markdown(&record.name));
    let _ = writeln!(message, "*Symbol:* `{}`", record.symbol);
    if let Some(address) = &record.address {
        let _ = writeln!(message, "*Address:* `{}`", address);
    }
    let _ = writeln!(message, "*Confidence:* {}%", record.confidence);

    let excerpt = record.raw_excerpt.trim();
    if !excerpt.is_empty() {
        let _ = write!(message, "\n*Info:*\n{}\n", escape_markdown(excerpt));
    }

    if !record.links.is_empty() {
        message.push_str("\n*Links:*\n");
        for (i, link) in record.links.iter().enumerate() {
            let _ = writeln!(message, "{}. {}", i + 1, escape_markdown(link));
        }
    }

    let _ = writeln!(
        message,
        "\n⏰ *Detected:* {}",
        detected_at.format("%H:%M:%S UTC")
    );
    let _ = writeln!(
        message,
        "🔍 *Source:* {}",
        escape_markdown(&record.source.to_string())
    );
    let _ = writeln!(message, "📅 *Date:* {}", detected_at.format("%Y-%m-%d"));
    let _ = write!(message, "\n{}", FOOTER);

    message
}

/// Digest sent by a manual check.
pub fn format_manual_summary(records: &[Record], at: DateTime<Utc>) -> String {
    let mut message = format!(
        "🔄 *Manual Check Result*\n\nFound {} tokens:\n",
        records.len()
    );
    for record in records {
        let _ = writeln!(message, "• {}: {}", record.symbol, record.status);
    }
    let _ = write!(message, "\n⏰ *Checked:* {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use extraction::{testing::sample_record, RecordSource, RecordStatus};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("FPM_PUMP *hot*"), "FPM\\_PUMP \\*hot\\*");
        assert_eq!(escape_markdown("[x](y) `z`"), "\\[x](y) \\`z\\`");
        assert_eq!(escape_markdown("plain"), "plain");
    }

    #[test]
    fn test_full_record() {
        let record = sample_record("FPM", Some("F45yyX..."))
            .with_name("Funny Pants-Man")
            .with_status(RecordStatus::Pumping, true)
            .with_excerpt("FPM Funny Pants-Man FPM_PUMP")
            .with_links(["https://x.com/fpm", "https://t.me/fpm_chat"]);

        let message = format_record(&record, at());

        assert!(message.starts_with("🚀 *PUMPING* 🚀"));
        assert!(message.contains("*Token:* Funny Pants-Man\n"));
        assert!(message.contains("*Symbol:* `FPM`\n"));
        assert!(message.contains("*Address:* `F45yyX...`\n"));
        assert!(message.contains(&format!("*Confidence:* {}%", record.confidence)));
        assert!(message.contains("FPM Funny Pants-Man FPM\\_PUMP"));
        assert!(message.contains("1. https://x.com/fpm\n2. https://t.me/fpm\\_chat\n"));
        assert!(message.contains("*Detected:* 14:05:07 UTC"));
        assert!(message.contains("*Source:* line\\_pattern"));
        assert!(message.contains("*Date:* 2024-03-09"));
        assert!(message.ends_with(FOOTER));
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let record = Record::new("ABC", RecordSource::Structural).unwrap();
        let message = format_record(&record, at());

        assert!(message.starts_with("🆕 *NEW* 🆕"));
        assert!(!message.contains("*Address:*"));
        assert!(!message.contains("*Links:*"));
        assert!(!message.contains("*Info:*"));
        assert!(message.contains("*Token:* Unknown"));
    }

    #[test]
    fn test_manual_summary_lists_records() {
        let records = vec![
            sample_record("AAA", None).with_status(RecordStatus::Pumping, true),
            sample_record("BBB", None),
        ];
        let message = format_manual_summary(&records, at());

        assert!(message.contains("Found 2 tokens:"));
        assert!(message.contains("• AAA: 🚀 PUMPING\n"));
        assert!(message.contains("• BBB: 🆕 NEW\n"));
        assert!(message.ends_with("2024-03-09 14:05:07 UTC"));
    }
}
