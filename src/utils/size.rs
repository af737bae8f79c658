/// Human-readable byte sizes

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count as `512B`, `1.5KB`, `3.2GB`; `?` when unknown
pub fn format_size(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return "?".to_string();
    };

    let mut value = bytes as f64;
    for (i, unit) in UNITS.iter().enumerate() {
        if value < 1024.0 || i == UNITS.len() - 1 {
            return if i == 0 {
                format!("{}{}", bytes, unit)
            } else {
                format!("{:.1}{}", value, unit)
            };
        }
        value /= 1024.0;
    }

    format!("{}B", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(None), "?");
        assert_eq!(format_size(Some(0)), "0B");
        assert_eq!(format_size(Some(1023)), "1023B");
        assert_eq!(format_size(Some(1536)), "1.5KB");
        assert_eq!(format_size(Some(10 * 1024 * 1024)), "10.0MB");
        assert_eq!(format_size(Some(3 * 1024u64.pow(5))), "3072.0TB");
    }
}
