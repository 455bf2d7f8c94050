//! Reshape raw scanner findings into the public report schema.
//!
//! License matches keep their field names and drop everything outside
//! `key, score, name, text_url, start_line, matched_text`. Copyrights,
//! holders, emails and urls collapse to `{value, start}`. Fields missing from
//! a raw record stay missing; nothing is defaulted. Record order is kept and
//! nothing is deduplicated.

use crate::models::{LicenseRecord, RawFileScan, ValueRecord};

/// Project the `licenses` category. An absent category yields no records.
pub fn project_licenses(raw: &RawFileScan) -> Vec<LicenseRecord> {
    raw.licenses
        .iter()
        .flatten()
        .map(|m| LicenseRecord {
            key: m.key.clone(),
            score: m.score.clone(),
            name: m.name.clone(),
            text_url: m.text_url.clone(),
            start_line: m.start_line,
            matched_text: m.matched_text.clone(),
        })
        .collect()
}

/// Project the `copyrights` and `holders` categories, returned in that order.
pub fn project_copyrights(raw: &RawFileScan) -> (Vec<ValueRecord>, Vec<ValueRecord>) {
    let copyrights = raw
        .copyrights
        .iter()
        .flatten()
        .map(|c| value_record(&c.copyright, c.start_line))
        .collect();

    let holders = raw
        .holders
        .iter()
        .flatten()
        .map(|h| value_record(&h.holder, h.start_line))
        .collect();

    (copyrights, holders)
}

pub fn project_emails(raw: &RawFileScan) -> Vec<ValueRecord> {
    raw.emails
        .iter()
        .flatten()
        .map(|e| value_record(&e.email, e.start_line))
        .collect()
}

pub fn project_urls(raw: &RawFileScan) -> Vec<ValueRecord> {
    raw.urls
        .iter()
        .flatten()
        .map(|u| value_record(&u.url, u.start_line))
        .collect()
}

fn value_record(value: &Option<String>, start_line: Option<u64>) -> ValueRecord {
    ValueRecord {
        value: value.clone(),
        start: start_line,
    }
}
