use colored::Colorize;

use crate::core::models::log_entry::AuditAction;

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Color an audit action for listings.
pub fn action(action: AuditAction) -> String {
    let label = action.as_str();
    match action {
        AuditAction::Add => label.green().to_string(),
        AuditAction::Edit | AuditAction::BulkEdit => label.yellow().to_string(),
        AuditAction::Delete => label.red().to_string(),
        AuditAction::Import => label.blue().to_string(),
        AuditAction::Loan => label.cyan().to_string(),
        AuditAction::Restore | AuditAction::RestoreDelete => label.magenta().to_string(),
    }
}

/// Truncate a string to `max_len` characters, appending "..." if needed.
/// Uses char boundaries to avoid panic on multibyte UTF-8 sequences.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let limit = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(limit).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate("green", 10), "green");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("two-person tent", 8), "two-p...");
    }

    #[test]
    fn truncate_unicode_safe() {
        assert_eq!(truncate("żółty namiot", 8), "żółty...");
    }

    #[test]
    fn truncate_max_len_zero() {
        assert_eq!(truncate("tent", 0), "...");
    }
}
