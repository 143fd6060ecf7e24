// src/output.rs

use crate::model::{AuthorStat, OutputFormat};
use serde::Serialize;
use std::io::{self, Write};

const HEADER: [&str; 4] = ["Name", "Lines", "Commits", "Files"];

#[derive(Debug, Serialize)]
struct AuthorRow<'a> {
    name: &'a str,
    lines: u64,
    commits: usize,
    files: u64,
}

impl<'a> From<&'a AuthorStat> for AuthorRow<'a> {
    fn from(stat: &'a AuthorStat) -> Self {
        AuthorRow {
            name: &stat.name,
            lines: stat.lines,
            commits: stat.commits(),
            files: stat.files,
        }
    }
}

fn cells(stat: &AuthorStat) -> [String; 4] {
    [
        stat.name.clone(),
        stat.lines.to_string(),
        stat.commits().to_string(),
        stat.files.to_string(),
    ]
}

pub fn write_authors<W: Write>(
    out: &mut W,
    authors: &[AuthorStat],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Tabular => write_tabular(out, authors),
        OutputFormat::Csv => write_csv(out, authors),
        OutputFormat::Json => {
            let rows: Vec<AuthorRow> = authors.iter().map(AuthorRow::from).collect();
            serde_json::to_writer(&mut *out, &rows)?;
            writeln!(out)
        }
        OutputFormat::JsonLines => {
            for author in authors {
                serde_json::to_writer(&mut *out, &AuthorRow::from(author))?;
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

/// Left-aligned columns, every column but the last padded to its widest cell
/// plus one space.
fn write_tabular<W: Write>(out: &mut W, authors: &[AuthorStat]) -> io::Result<()> {
    let rows: Vec<[String; 4]> = std::iter::once(HEADER.map(String::from))
        .chain(authors.iter().map(cells))
        .collect();
    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    for row in &rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] - cell.chars().count() + 1;
                line.extend(std::iter::repeat(' ').take(pad));
            }
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn csv_field(field: &str) -> String {
    let needs_quotes = field.starts_with(char::is_whitespace)
        || field.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n'));
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_csv<W: Write>(out: &mut W, authors: &[AuthorStat]) -> io::Result<()> {
    writeln!(out, "{}", HEADER.join(","))?;
    for author in authors {
        let fields: Vec<String> = cells(author).iter().map(|f| csv_field(f)).collect();
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str, lines: u64, commits: &[&str], files: u64) -> AuthorStat {
        let mut stat = AuthorStat::new(name);
        stat.lines = lines;
        stat.files = files;
        stat.commit_set = commits.iter().map(|c| c.to_string()).collect();
        stat
    }

    fn render(authors: &[AuthorStat], format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_authors(&mut out, authors, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Vec<AuthorStat> {
        vec![
            author("Alexander", 120, &["a", "b", "c"], 7),
            author("Bo, Jr.", 3, &["d"], 1),
        ]
    }

    #[test]
    fn tabular_pads_columns() {
        let expected = "\
Name      Lines Commits Files
Alexander 120   3       7
Bo, Jr.   3     1       1
";
        assert_eq!(render(&sample(), OutputFormat::Tabular), expected);
    }

    #[test]
    fn csv_quotes_when_needed() {
        let expected = "Name,Lines,Commits,Files\nAlexander,120,3,7\n\"Bo, Jr.\",3,1,1\n";
        assert_eq!(render(&sample(), OutputFormat::Csv), expected);
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_quotes_leading_whitespace() {
        assert_eq!(csv_field(" Ann"), "\" Ann\"");
        assert_eq!(csv_field("\tAnn"), "\"\tAnn\"");
        assert_eq!(csv_field("\u{3000}Ann"), "\"\u{3000}Ann\"");
        assert_eq!(csv_field("Ann "), "Ann ");
    }

    #[test]
    fn json_is_single_array() {
        let expected = "[{\"name\":\"Alexander\",\"lines\":120,\"commits\":3,\"files\":7},\
{\"name\":\"Bo, Jr.\",\"lines\":3,\"commits\":1,\"files\":1}]\n";
        assert_eq!(render(&sample(), OutputFormat::Json), expected);
        assert_eq!(render(&[], OutputFormat::Json), "[]\n");
    }

    #[test]
    fn json_lines_writes_one_object_per_author() {
        let output = render(&sample(), OutputFormat::JsonLines);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "Alexander");
        assert_eq!(first["commits"], 3);
    }
}
