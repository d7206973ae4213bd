//! Escaping rules for systemd unit values.
//!
//! systemd expands `%` specifiers in most settings and `$` variables in
//! `ExecStart=`; a raw newline would start a new directive. Values are
//! checked and escaped here so that a path or user name can never change
//! the meaning of the unit.

use crate::error::{ProvisionError, Result};

/// Reject values that cannot be represented on a single unit line.
///
/// A trailing backslash would continue the line into the next directive.
pub fn check_value(key: &str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| c.is_control()) {
        return Err(ProvisionError::UnitValidation {
            key: key.to_string(),
            message: format!("contains control character {:?}", c),
        });
    }
    if value.ends_with('\\') {
        return Err(ProvisionError::UnitValidation {
            key: key.to_string(),
            message: "must not end with a backslash".to_string(),
        });
    }
    Ok(())
}

/// Escape `%` specifiers in a plain setting value.
pub fn escape_specifiers(value: &str) -> String {
    value.replace('%', "%%")
}

/// Render one `ExecStart=` word.
///
/// Specifiers and variables are escaped; words containing whitespace,
/// quotes or backslashes (and the empty word, and a lone `;`) are
/// double-quoted with C-style escapes.
pub fn quote_exec_word(word: &str) -> String {
    let escaped = word.replace('%', "%%").replace('$', "$$");

    let needs_quotes = escaped.is_empty()
        || escaped == ";"
        || escaped
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));

    if !needs_quotes {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + 2);
    out.push('"');
    for c in escaped.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass() {
        assert!(check_value("User", "alice").is_ok());
        assert!(check_value("Description", "Cupom API (vision)").is_ok());
    }

    #[test]
    fn newline_is_rejected() {
        let err = check_value("Description", "x\nExecStartPre=/bin/sh").unwrap_err();
        assert!(matches!(err, ProvisionError::UnitValidation { .. }));
        assert!(err.to_string().contains("Description="));
    }

    #[test]
    fn trailing_backslash_is_rejected() {
        let err = check_value("Description", "Cupom API \\").unwrap_err();
        assert!(matches!(err, ProvisionError::UnitValidation { .. }));
        assert!(err.to_string().contains("backslash"));
        assert!(check_value("WorkingDirectory", r"C:\app\x").is_ok());
    }

    #[test]
    fn nul_is_rejected() {
        assert!(check_value("User", "al\0ice").is_err());
    }

    #[test]
    fn specifiers_are_doubled() {
        assert_eq!(escape_specifiers("/srv/100%/app"), "/srv/100%%/app");
    }

    #[test]
    fn simple_exec_word_is_untouched() {
        assert_eq!(quote_exec_word("main:app"), "main:app");
        assert_eq!(quote_exec_word("--port"), "--port");
    }

    #[test]
    fn exec_word_with_space_is_quoted() {
        assert_eq!(
            quote_exec_word("/opt/my app/venv/bin/uvicorn"),
            "\"/opt/my app/venv/bin/uvicorn\""
        );
    }

    #[test]
    fn exec_word_escapes_quotes_and_backslashes() {
        assert_eq!(quote_exec_word(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn exec_word_escapes_variables_and_specifiers() {
        assert_eq!(quote_exec_word("$HOME%h"), "$$HOME%%h");
    }

    #[test]
    fn empty_and_separator_words_are_quoted() {
        assert_eq!(quote_exec_word(""), "\"\"");
        assert_eq!(quote_exec_word(";"), "\";\"");
    }
}
