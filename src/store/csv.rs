//! Flat-text table codec for score records.
//!
//! Layout: a `round,player,score` header row followed by one record per line.
//! Fields holding a comma, quote or newline are wrapped in double quotes with
//! inner quotes doubled.

use anyhow::{bail, Context, Result};

use super::types::ScoreRecord;

pub const HEADER: [&str; 3] = ["round", "player", "score"];

/// Serialize records into table text, header included.
pub fn encode(records: &[ScoreRecord]) -> String {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for record in records {
        out.push_str(&record.round.to_string());
        out.push(',');
        out.push_str(&quote_field(&record.player));
        out.push(',');
        out.push_str(&record.score.to_string());
        out.push('\n');
    }
    out
}

/// Parse table text back into records.
///
/// Empty input and a header-only table both decode to an empty list.
pub fn decode(content: &str) -> Result<Vec<ScoreRecord>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rows = split_rows(content)?;
    let mut rows = rows.into_iter().filter(|(_, fields)| !is_blank(fields));

    let Some((line, header)) = rows.next() else {
        return Ok(Vec::new());
    };
    let header_ok = header.len() == HEADER.len()
        && header
            .iter()
            .zip(HEADER.iter())
            .all(|(got, want)| got.trim().eq_ignore_ascii_case(want));
    if !header_ok {
        bail!(
            "line {}: expected header '{}', found '{}'",
            line,
            HEADER.join(","),
            header.join(",")
        );
    }

    let mut records = Vec::new();
    for (line, fields) in rows {
        if fields.len() != HEADER.len() {
            bail!(
                "line {}: expected {} columns, found {}",
                line,
                HEADER.len(),
                fields.len()
            );
        }
        let round: u32 = fields[0]
            .trim()
            .parse()
            .with_context(|| format!("line {}: invalid round '{}'", line, fields[0]))?;
        let score: i64 = fields[2]
            .trim()
            .parse()
            .with_context(|| format!("line {}: invalid score '{}'", line, fields[2]))?;
        records.push(ScoreRecord {
            round,
            player: fields[1].clone(),
            score,
        });
    }

    Ok(records)
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn is_blank(fields: &[String]) -> bool {
    fields.len() == 1 && fields[0].trim().is_empty()
}

/// Split text into rows of fields, tracking the 1-based line each row starts on.
fn split_rows(content: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                rows.push((row_start, std::mem::take(&mut fields)));
                line += 1;
                row_start = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        bail!("line {}: unterminated quoted field", row_start);
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push((row_start, fields));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_decodes_to_nothing() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("round,player,score\n").unwrap().is_empty());
    }

    #[test]
    fn test_encode_writes_header_for_empty_table() {
        assert_eq!(encode(&[]), "round,player,score\n");
    }

    #[test]
    fn test_decode_records() {
        let text = "round,player,score\n1,Masi,5\n1,Ripa,3\n2,Masi,8\n";
        let records = decode(text).unwrap();
        assert_eq!(
            records,
            vec![
                ScoreRecord::new(1, "Masi", 5),
                ScoreRecord::new(1, "Ripa", 3),
                ScoreRecord::new(2, "Masi", 8),
            ]
        );
    }

    #[test]
    fn test_decode_tolerates_crlf_and_blank_lines() {
        let text = "round,player,score\r\n\r\n3,Tony,7\r\n";
        let records = decode(text).unwrap();
        assert_eq!(records, vec![ScoreRecord::new(3, "Tony", 7)]);
    }

    #[test]
    fn test_quoted_player_names_survive() {
        let records = vec![
            ScoreRecord::new(1, "Inte, Luca", 4),
            ScoreRecord::new(1, "The \"Ste\"", 2),
        ];
        let text = encode(&records);
        assert!(text.contains("\"Inte, Luca\""));
        assert!(text.contains("\"The \"\"Ste\"\"\""));
        assert_eq!(decode(&text).unwrap(), records);
    }

    #[test]
    fn test_bad_header_is_rejected() {
        let err = decode("a,b,c\n1,Masi,5\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_bad_score_names_line() {
        let err = decode("round,player,score\n1,Masi,5\n2,Ripa,lots\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "got: {}", err);
    }

    #[test]
    fn test_wrong_column_count() {
        let err = decode("round,player,score\n1,Masi\n").unwrap_err();
        assert!(err.to_string().contains("expected 3 columns"));
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(decode("round,player,score\n1,\"Masi,5\n").is_err());
    }
}
