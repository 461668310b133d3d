use airskill_core::table_cell;

/// Lowercase prefix of the line that opens every skill document.
pub const SUMMARY_HEADER: &str = "system prompt";

/// Return the first non-blank line after the `System Prompt:` header line,
/// made safe for a table cell. Empty when there is no header or nothing
/// follows it.
pub fn extract_summary(text: &str) -> String {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    while let Some(line) = lines.next() {
        if line.to_lowercase().starts_with(SUMMARY_HEADER) {
            return lines.next().map(table_cell).unwrap_or_default();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_after_header() {
        let text = "System Prompt:\nYou are an expert on caching.\n\nMore body.";
        assert_eq!(extract_summary(text), "You are an expert on caching.");
    }

    #[test]
    fn header_is_case_insensitive_and_skips_blank_lines() {
        let text = "\n\n  SYSTEM PROMPT:  \n\n\n   Handles retries.  \n";
        assert_eq!(extract_summary(text), "Handles retries.");
    }

    #[test]
    fn pipes_are_replaced() {
        let text = "System Prompt:\nRead | write | delete";
        assert_eq!(extract_summary(text), "Read / write / delete");
    }

    #[test]
    fn missing_header_is_empty() {
        assert_eq!(extract_summary("# Title\nSome text"), "");
    }

    #[test]
    fn header_on_last_line_is_empty() {
        assert_eq!(extract_summary("intro\nSystem Prompt:\n\n"), "");
    }

    #[test]
    fn lines_before_header_are_ignored() {
        let text = "# Caching\nNot this.\nSystem prompt:\nThis one.";
        assert_eq!(extract_summary(text), "This one.");
    }
}
