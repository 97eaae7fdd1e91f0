//! Tabular export of monthly results

mod table;
mod workbook;

pub use table::{write_csv, csv_bytes, CSV_HEADER};
pub use workbook::{
    NamedResults, SheetRow, WORKBOOK_HEADER,
    one_month_spreads, sheet_rows, sanitize_sheet_name, sheet_names, column_widths,
    render_workbook, workbook_available,
};
