/// Generate the default DDL for a view that selects the given columns.
///
/// The output is the seed shown in the editor when a view is first derived
/// from a selected source table.
pub fn view_ddl(view_name: &str, table: &str, columns: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("CREATE VIEW {} AS\n  SELECT ", view_name));
    if columns.is_empty() {
        out.push('*');
    } else {
        out.push_str(&columns.join(", "));
    }
    out.push_str(&format!("\n  FROM {};\n", table));
    out
}

/// Default name for a view derived from a table.
pub fn default_view_name(table: &str) -> String {
    format!("{}_view", table)
}
