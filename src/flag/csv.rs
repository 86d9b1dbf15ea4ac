//! Single-record CSV reading and writing for slice flags.

use super::FlagError;

/// Reads the first CSV record of `input`.
///
/// Blank leading lines are skipped and an empty input yields no fields.
/// Quoted fields follow the usual rules: `""` inside quotes is a literal quote,
/// and the closing quote must be followed by a comma or the end of the record.
pub(crate) fn read_record(input: &str) -> Result<Vec<String>, FlagError> {
    let fail = |reason: &str| FlagError::Csv {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let record = input.trim_start_matches(|c| c == '\r' || c == '\n');
    if record.is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut chars = record.chars().peekable();

    'fields: loop {
        let mut field = String::new();

        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => match chars.peek() {
                        Some('"') => {
                            chars.next();
                            field.push('"');
                        }
                        Some(',') => {
                            chars.next();
                            fields.push(field);
                            continue 'fields;
                        }
                        None | Some('\n') | Some('\r') => {
                            fields.push(field);
                            break 'fields;
                        }
                        Some(_) => return Err(fail("extraneous or missing \" in quoted field")),
                    },
                    Some(c) => field.push(c),
                    None => return Err(fail("extraneous or missing \" in quoted field")),
                }
            }
        }

        loop {
            match chars.next() {
                Some(',') => {
                    fields.push(field);
                    continue 'fields;
                }
                None | Some('\n') => {
                    fields.push(field);
                    break 'fields;
                }
                Some('\r') if matches!(chars.peek(), None | Some('\n')) => {
                    fields.push(field);
                    break 'fields;
                }
                Some('"') => return Err(fail("bare \" in non-quoted field")),
                Some(c) => field.push(c),
            }
        }
    }

    Ok(fields)
}

/// Writes `fields` as one CSV record, without a line terminator.
pub(crate) fn write_record(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| {
            if needs_quotes(field) {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                field.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn needs_quotes(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    if field == r"\." || field.contains(|c| matches!(c, ',' | '"' | '\r' | '\n')) {
        return true;
    }
    field.starts_with(char::is_whitespace)
}
