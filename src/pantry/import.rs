use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

const NAME_COL: &str = "name";
const QUANTITY_COL: &str = "quantity";

/// Reads pantry entries from a CSV file with a `name` column and an optional
/// `quantity` column. Each row becomes `"<name> <quantity>"`.
pub fn load_pantry_csv(csv_path: &Path) -> Result<Vec<String>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Pantry CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open pantry CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(file);

    let headers = rdr.headers()?.clone();
    let name_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(NAME_COL))
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", NAME_COL))?;
    let quantity_idx = headers.iter().position(|h| h.eq_ignore_ascii_case(QUANTITY_COL));

    let mut entries = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let name = record.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let quantity = quantity_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("");

        if quantity.is_empty() {
            entries.push(name.to_string());
        } else {
            entries.push(format!("{} {}", name, quantity));
        }
    }

    if entries.is_empty() {
        return Err(anyhow::anyhow!("No pantry entries loaded from {:?}", csv_path));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_pantry_csv_success() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "name,quantity")?;
        writeln!(file, "яйца,3 шт")?;
        writeln!(file, "лук,")?;
        writeln!(file, ",200г")?; // empty name
        writeln!(file, " рис , 150г ")?;
        file.flush()?;

        let entries = load_pantry_csv(file.path())?;
        assert_eq!(entries, vec!["яйца 3 шт", "лук", "рис 150г"]);
        Ok(())
    }

    #[test]
    fn test_load_pantry_csv_without_quantity_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Name")?;
        writeln!(file, "помидоры")?;
        file.flush()?;

        assert_eq!(load_pantry_csv(file.path())?, vec!["помидоры"]);
        Ok(())
    }

    #[test]
    fn test_load_pantry_csv_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "item,quantity")?;
        writeln!(file, "яйца,3 шт")?;
        file.flush()?;

        let result = load_pantry_csv(file.path());
        assert!(result.unwrap_err().to_string().contains("Column 'name' not found"));
        Ok(())
    }

    #[test]
    fn test_load_pantry_csv_only_headers() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "name,quantity")?;
        file.flush()?;

        let result = load_pantry_csv(file.path());
        assert!(result.unwrap_err().to_string().contains("No pantry entries loaded"));
        Ok(())
    }

    #[test]
    fn test_load_pantry_csv_file_not_found() {
        let result = load_pantry_csv(Path::new("this_pantry_does_not_exist.csv"));
        assert!(result.unwrap_err().to_string().contains("Pantry CSV file not found"));
    }
}
