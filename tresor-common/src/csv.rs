//! CSV export
//!
//! RFC 4180 style output shared by the report endpoints and the translation
//! report:
//! - fields separated by `,`, records terminated by `\r\n`
//! - a field is quoted iff it contains `,` `"` `\r` `\n` or has
//!   leading/trailing spaces
//! - quotes inside a quoted field are doubled
//! - the header row comes first and fixes the column order

use std::borrow::Cow;

/// Rows that know how to lay themselves out as CSV records
pub trait CsvRecord {
    /// Column names, in output order
    fn headers() -> &'static [&'static str];

    /// Field values, in the same order as `headers()`
    fn fields(&self) -> Vec<String>;
}

/// Quote a single field if it needs quoting
pub fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field.contains([',', '"', '\r', '\n'])
        || field.starts_with(' ')
        || field.ends_with(' ');

    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Incremental CSV builder
#[derive(Debug, Default)]
pub struct CsvWriter {
    buffer: String,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record
    pub fn write_record<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                self.buffer.push(',');
            }
            first = false;
            self.buffer.push_str(&escape_field(field.as_ref()));
        }
        self.buffer.push_str("\r\n");
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Render a header row followed by one record per item
pub fn to_csv<R: CsvRecord>(records: &[R]) -> String {
    let mut writer = CsvWriter::new();
    writer.write_record(R::headers().iter().copied());
    for record in records {
        writer.write_record(record.fields());
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        key: &'static str,
        text: &'static str,
        count: i64,
    }

    impl CsvRecord for Row {
        fn headers() -> &'static [&'static str] {
            &["key", "text", "count"]
        }

        fn fields(&self) -> Vec<String> {
            vec![self.key.to_string(), self.text.to_string(), self.count.to_string()]
        }
    }

    #[test]
    fn test_plain_field_unquoted() {
        assert_eq!(escape_field("symbole"), "symbole");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_comma_and_quote_escaping() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("le \"trésor\""), "\"le \"\"trésor\"\"\"");
        assert_eq!(escape_field("ligne\nsuivante"), "\"ligne\nsuivante\"");
        assert_eq!(escape_field(" padded"), "\" padded\"");
    }

    #[test]
    fn test_exact_document_output() {
        let rows = vec![
            Row { key: "home.title", text: "Bienvenue", count: 3 },
            Row { key: "quest.clue", text: "Indice, \"caché\"", count: 0 },
        ];

        let csv = to_csv(&rows);
        assert_eq!(
            csv,
            "key,text,count\r\nhome.title,Bienvenue,3\r\nquest.clue,\"Indice, \"\"caché\"\"\",0\r\n"
        );
    }

    #[test]
    fn test_empty_input_has_header_only() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(to_csv(&rows), "key,text,count\r\n");
    }
}
