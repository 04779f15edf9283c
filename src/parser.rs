//! CSV parser for parliamentary speech records.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::record::SpeechRecord;

/// Formats accepted for the `Date` column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

const DATE_COL: &str = "Date";
const SPEAKER_COL: &str = "Speaker";
const TOPIC_COL: &str = "Topic";
const WORDS_COL: &str = "Words";

/// Parses raw CSV text into speech records.
///
/// The header row defines column names; names and field values are trimmed
/// of surrounding whitespace before use. Rows whose `Date` or `Words` value
/// does not parse, or whose `Speaker` is empty, are dropped with a warning
/// (a malformed word count is never coerced to zero). Columns beyond the
/// four required ones are carried on the record untouched.
///
/// Returns `None`, with a warning and never an error, when the header
/// cannot be read, a required column is missing, or no row survives
/// validation.
pub fn parse_records(content: &str) -> Option<Vec<SpeechRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => {
            warn!(%error, "unreadable CSV header");
            return None;
        }
    };

    let column = |name: &str| headers.iter().position(|header| header == name);
    let (Some(date_col), Some(speaker_col), Some(topic_col), Some(words_col)) = (
        column(DATE_COL),
        column(SPEAKER_COL),
        column(TOPIC_COL),
        column(WORDS_COL),
    ) else {
        warn!(headers = ?headers, "CSV is missing a required column");
        return None;
    };

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // Header is line 1, the first data row line 2.
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(error) => {
                warn!(line, %error, "skipping unreadable CSV row");
                continue;
            }
        };
        if row.iter().all(str::is_empty) {
            continue;
        }

        match to_record(&headers, &row, [date_col, speaker_col, topic_col, words_col]) {
            Some(record) => records.push(record),
            None => warn!(line, "dropping row with unusable date, speaker, or word count"),
        }
    }

    if records.is_empty() {
        warn!("no usable rows after parsing");
        return None;
    }

    debug!(record_count = records.len(), "parsed speech records");
    Some(records)
}

/// Validates one CSV row into a typed record, or rejects it.
fn to_record(
    headers: &StringRecord,
    row: &StringRecord,
    columns: [usize; 4],
) -> Option<SpeechRecord> {
    let [date_col, speaker_col, topic_col, words_col] = columns;

    let date = parse_date(row.get(date_col)?)?;
    let speaker = row.get(speaker_col).filter(|s| !s.is_empty())?.to_string();
    let topic = row.get(topic_col).unwrap_or_default().to_string();
    let word_count = row.get(words_col)?.parse().ok()?;

    let extra = row
        .iter()
        .enumerate()
        .filter(|(i, _)| !columns.contains(i))
        .filter_map(|(i, value)| Some((headers.get(i)?.to_string(), value.to_string())))
        .collect::<HashMap<_, _>>();

    Some(SpeechRecord {
        date,
        speaker,
        topic,
        word_count,
        extra,
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SAMPLE: &str = "\
Speaker, Topic, Date, Words
Alexander Abel, Education Policy, 2012-10-30, 5310
Bernhard Belling, Coal Subsidies, 2012-11-05, 1210
Caesare Collins, Coal Subsidies, 2012-11-06, 1119
Alexander Abel, Internal Security, 2012-12-11, 911
";

    #[test]
    fn round_trips_one_data_row() {
        let records =
            parse_records("Date,Speaker,Topic,Words\n2013-01-02,Maria Mills,Internal Security,42\n")
                .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.speaker, "Maria Mills");
        assert_eq!(record.topic, "Internal Security");
        assert_eq!(record.word_count, 42);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2013, 1, 2).unwrap());
        assert_eq!(record.date.year(), 2013);
    }

    #[test]
    fn trims_header_names_and_field_values() {
        let records = parse_records(SAMPLE).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].speaker, "Alexander Abel");
        assert_eq!(records[0].topic, "Education Policy");
        assert_eq!(records[0].word_count, 5310);
        assert_eq!(records[3].topic, "Internal Security");
    }

    #[test]
    fn column_order_follows_the_header() {
        let records =
            parse_records("Words,Topic,Speaker,Date\n10,Budget,Ann Arden,2013-05-06\n").unwrap();

        assert_eq!(records[0].speaker, "Ann Arden");
        assert_eq!(records[0].word_count, 10);
    }

    #[test]
    fn skips_empty_lines() {
        let content = "Date,Speaker,Topic,Words\n\n2013-01-02,Ann Arden,Budget,10\n\n\n2013-01-03,Ben Brandt,Budget,20\n";
        let records = parse_records(content).unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn drops_row_with_malformed_word_count_instead_of_zeroing_it() {
        let content = "Date,Speaker,Topic,Words\n2013-01-02,Ann Arden,Budget,many\n2013-01-03,Ben Brandt,Budget,20\n";
        let records = parse_records(content).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records.iter().all(|r| r.speaker != "Ann Arden"));
        assert_eq!(records[0].word_count, 20);
    }

    #[test]
    fn drops_row_with_malformed_date() {
        let content = "Date,Speaker,Topic,Words\nyesterday,Ann Arden,Budget,10\n2013-01-03,Ben Brandt,Budget,20\n";
        let records = parse_records(content).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker, "Ben Brandt");
    }

    #[test]
    fn drops_row_with_blank_speaker() {
        let content = "Date,Speaker,Topic,Words\n2013-01-02,   ,Budget,10\n2013-01-03,Ben Brandt,Budget,20\n";
        let records = parse_records(content).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker, "Ben Brandt");
    }

    #[test]
    fn missing_required_column_yields_none() {
        assert_eq!(
            parse_records("Date,Speaker,Topic\n2013-01-02,Ann Arden,Budget\n"),
            None
        );
    }

    #[test]
    fn content_without_usable_rows_yields_none() {
        assert_eq!(
            parse_records("Date,Speaker,Topic,Words\nnot-a-date,Ann Arden,Budget,ten\n"),
            None
        );
    }

    #[test]
    fn unstructured_content_yields_none() {
        assert_eq!(parse_records("this is not a csv document"), None);
        assert_eq!(parse_records(""), None);
    }

    #[test]
    fn extra_columns_are_carried_untouched() {
        let content =
            "Date,Speaker,Topic,Words,Party\n2013-01-02,Ann Arden,Budget,10,Greens\n";
        let records = parse_records(content).unwrap();

        assert_eq!(records[0].extra.len(), 1);
        assert_eq!(records[0].extra.get("Party").map(String::as_str), Some("Greens"));
    }

    #[test]
    fn accepts_dotted_and_slashed_date_formats() {
        let content = "Date,Speaker,Topic,Words\n30.10.2012,Ann Arden,Budget,10\n10/30/2012,Ben Brandt,Budget,20\n";
        let records = parse_records(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2012, 10, 30).unwrap());
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2012, 10, 30).unwrap());
    }
}
