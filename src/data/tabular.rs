use std::mem::take;

// ---------------------------------------------------------------------------
// Delimited text scanner
// ---------------------------------------------------------------------------

/// Split comma-separated text into rows of cells.
///
/// Dialect (fixed):
/// * `"` opens and closes a quoted field; inside quotes `""` is a literal quote
///   and commas / newlines are kept as data.
/// * `\n` ends a record, `\r` outside quotes is dropped.
/// * A trailing record without a final newline is kept if it has any content.
///
/// Blank lines come back as a single empty cell; callers decide whether to
/// skip them.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(take(&mut field)),
            '\n' => {
                row.push(take(&mut field));
                rows.push(take(&mut row));
            }
            '\r' => {}
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// True when every cell is empty or whitespace.
pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cells(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn splits_plain_records() {
        let rows = parse("district,school\nNorthside ISD,Maple Elementary\n");
        assert_eq!(
            rows,
            cells(&[&["district", "school"], &["Northside ISD", "Maple Elementary"]])
        );
    }

    #[test]
    fn quoted_fields_keep_commas_and_newlines() {
        let rows = parse("a,\"b, c\",\"line1\nline2\"\n");
        assert_eq!(rows, cells(&[&["a", "b, c", "line1\nline2"]]));
    }

    #[test]
    fn doubled_quote_is_literal() {
        let rows = parse("\"She said \"\"hi\"\"\",x");
        assert_eq!(rows, cells(&[&["She said \"hi\"", "x"]]));
    }

    #[test]
    fn carriage_returns_outside_quotes_are_ignored() {
        let rows = parse("a,b\r\nc,d\r\n");
        assert_eq!(rows, cells(&[&["a", "b"], &["c", "d"]]));
        // inside quotes they are data
        let rows = parse("\"x\r\ny\"\n");
        assert_eq!(rows, cells(&[&["x\r\ny"]]));
    }

    #[test]
    fn trailing_record_is_flushed() {
        assert_eq!(parse("a,b\nc"), cells(&[&["a", "b"], &["c"]]));
        assert_eq!(parse("a,b\nc,"), cells(&[&["a", "b"], &["c", ""]]));
        assert!(parse("").is_empty());
        assert_eq!(parse("a\n"), cells(&[&["a"]]));
    }

    #[test]
    fn blank_lines_surface_as_blank_rows() {
        let rows = parse("a\n\nb\n");
        assert_eq!(rows.len(), 3);
        assert!(is_blank(&rows[1]));
        assert!(!is_blank(&rows[0]));
    }

    fn write_line(values: &[String]) -> String {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        wtr.write_record(values).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    proptest! {
        #[test]
        fn plain_values_survive_a_written_line(values in prop::collection::vec("[A-Za-z0-9 .:;'/-]{1,16}", 1..6)) {
            let line = write_line(&values);
            let rows = parse(&line);
            prop_assert_eq!(rows, vec![values]);
        }

        #[test]
        fn quoted_values_survive_a_written_line(value in "[A-Za-z \"]{0,12}\"[A-Za-z ,\"]{0,12}") {
            let line = format!("\"{}\"\n", value.replace('"', "\"\""));
            let rows = parse(&line);
            prop_assert_eq!(rows, vec![vec![value]]);
        }
    }
}
