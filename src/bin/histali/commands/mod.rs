pub mod clean;
pub mod extract;
pub mod merge;
pub mod validate;

use std::path::Path;

/// Print the missing-input message the way the other outputs are printed.
pub(crate) fn report_missing(what: &str, path: &Path, hint: &str) {
    println!("Error: {what} not found: {}", path.display());
    println!("{hint}");
}

/// `1234567` as `1,234,567`.
pub(crate) fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
