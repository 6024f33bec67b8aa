//! Line helpers for the multi-line aware formatting templates.

/// Split text on `\n`, keeping empty lines (including a trailing one).
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Prefix every line with `prefix` and terminate each with `\n`.
pub fn prefix_lines(lines: &[&str], prefix: &str) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(prefix);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Number every line `1. `, `2. `, ... and terminate each with `\n`.
pub fn number_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_empty_lines() {
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b", ""]);
        assert_eq!(split_lines("single"), vec!["single"]);
    }

    #[test]
    fn test_prefix_and_number() {
        let lines = ["x", "y"];
        assert_eq!(prefix_lines(&lines, "> "), "> x\n> y\n");
        assert_eq!(number_lines(&lines), "1. x\n2. y\n");
    }
}
