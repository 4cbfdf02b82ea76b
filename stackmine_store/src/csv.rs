//! Minimal CSV writer: quote fields containing separators, quotes or line
//! breaks, double embedded quotes, end rows with CRLF.

use std::io::Write;

use stackmine_core::BundleDescription;

const HEADER: [&str; 4] = ["name", "items", "summary", "use_cases"];

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n'])
}

pub fn write_csv_row<W: Write, S: AsRef<str>>(
    writer: &mut W,
    fields: &[S],
) -> std::io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        let field = field.as_ref();
        if needs_quotes(field) {
            write!(writer, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            writer.write_all(field.as_bytes())?;
        }
    }
    writer.write_all(b"\r\n")
}

/// Header plus one row per bundle: items joined by `", "`, use cases by `"; "`.
pub fn write_bundles_csv<W: Write>(
    writer: &mut W,
    descriptions: &[BundleDescription],
) -> std::io::Result<()> {
    write_csv_row(writer, &HEADER)?;
    for description in descriptions {
        let items = description
            .items
            .iter()
            .map(stackmine_core::Item::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write_csv_row(
            writer,
            &[
                description.name.as_str(),
                items.as_str(),
                description.summary.as_str(),
                description.use_cases.join("; ").as_str(),
            ],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> String {
        let mut out = Vec::new();
        assert!(write_csv_row(&mut out, fields).is_ok());
        String::from_utf8(out).unwrap_or_default()
    }

    #[test]
    fn plain_fields_are_unquoted() {
        assert_eq!(row(&["a", "b c", ""]), "a,b c,\r\n");
    }

    #[test]
    fn special_fields_are_quoted() {
        assert_eq!(row(&["a,b"]), "\"a,b\"\r\n");
        assert_eq!(row(&["say \"hi\""]), "\"say \"\"hi\"\"\"\r\n");
        assert_eq!(row(&["two\nlines"]), "\"two\nlines\"\r\n");
    }
}
