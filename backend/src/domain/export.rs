//! Spreadsheet export of sign-up records.
//!
//! Produces the `signups.csv` payload: UTF-8 byte-order mark, a Persian
//! header row, then one row per record with display labels and a
//! `YYYY-MM-DD HH:MM` registration date. The BOM keeps Excel from
//! misreading the Persian text.

use super::signup::SignUp;

/// UTF-8 byte-order mark prefixed to the export.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Localised header row, matching the console's column order.
pub const CSV_HEADER: [&str; 7] = [
    "نام کامل",
    "شماره تماس",
    "ایمیل",
    "شهر",
    "هدف",
    "نقش",
    "تاریخ ثبت‌نام",
];

/// Attachment filename for the export response.
pub const CSV_FILENAME: &str = "signups.csv";

/// Quote a field when it contains a separator, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn csv_row(fields: &[String]) -> String {
    let mut row = fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
    row.push_str("\r\n");
    row
}

/// Render the selected records as a complete CSV document.
pub fn sign_ups_csv(records: &[SignUp]) -> Vec<u8> {
    let mut out = Vec::with_capacity(UTF8_BOM.len() + 64 * (records.len() + 1));
    out.extend_from_slice(UTF8_BOM);

    let header: Vec<String> = CSV_HEADER.iter().map(|&h| h.to_owned()).collect();
    out.extend_from_slice(csv_row(&header).as_bytes());

    for record in records {
        let fields = vec![
            record.full_name.clone(),
            record.phone_number.as_str().to_owned(),
            record.email.clone().unwrap_or_default(),
            record.city.label().to_owned(),
            record.fitness_goal.label().to_owned(),
            record.role.label().to_owned(),
            record.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ];
        out.extend_from_slice(csv_row(&fields).as_bytes());
    }

    out
}
