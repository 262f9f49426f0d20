use anyhow::{bail, Result};

/// Staged columns and their SQL types, in staged-file order.
pub const COLUMNS: &[(&str, &str)] = &[
    ("survived", "INTEGER"),
    ("pclass", "INTEGER"),
    ("sex", "TEXT"),
    ("age", "FLOAT"),
    ("sibsp", "INTEGER"),
    ("parch", "INTEGER"),
    ("fare", "FLOAT"),
    ("embarked", "TEXT"),
    ("class", "TEXT"),
    ("who", "TEXT"),
    ("adult_male", "BOOLEAN"),
    ("deck", "TEXT"),
    ("embark_town", "TEXT"),
    ("alive", "TEXT"),
    ("alone", "BOOLEAN"),
    ("is_child", "INTEGER"),
    ("family_size", "INTEGER"),
];

/// Table names are interpolated into SQL and URLs, so keep them to plain identifiers.
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !ok {
        bail!("invalid table name {:?}", table);
    }
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS` for the passenger table, with a surrogate key.
pub fn create_table_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;

    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n    id BIGSERIAL PRIMARY KEY", table);
    for (name, ty) in COLUMNS {
        sql.push_str(&format!(",\n    {} {}", name, ty));
    }
    sql.push_str("\n);");
    Ok(sql)
}
