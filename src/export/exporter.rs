use crate::foundation::database::ArtistRecord;

const HEADER: &str = "Name,Spotify ID,Genres,Created At";
const GENRE_SEPARATOR: &str = "; ";

/// Serializes the full roster to CSV bytes.
///
/// One header row, then one row per record. Fields containing the field or
/// row separator (or a quote) are double-quote escaped so no field content
/// can misalign a row. An empty roster yields just the header.
///
/// # Examples
///
/// ```
/// use talentbook::export::export_roster;
///
/// let bytes = export_roster(&[]);
/// assert_eq!(bytes, b"Name,Spotify ID,Genres,Created At\n");
/// ```
pub fn export_roster(records: &[ArtistRecord]) -> Vec<u8> {
    let mut out = String::with_capacity(64 * (records.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for record in records {
        let row = [
            escape_field(&record.display_name),
            escape_field(record.identity.as_str()),
            escape_field(&record.genres.join(GENRE_SEPARATOR)),
            record.created_at.format("%Y-%m-%d").to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out.into_bytes()
}

/// Quotes a field when it contains a comma, quote or line break, doubling
/// any embedded quotes.
fn escape_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
