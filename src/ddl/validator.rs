/// DDL validator: produces editor diagnostics from a source string.
///
/// Checks performed in order:
/// 1. Empty source
/// 2. Unterminated string literals (single quotes, `''` escapes)
/// 3. Unbalanced / mismatched parentheses
/// 4. Per-statement shape: every statement must be `CREATE VIEW <name> AS SELECT ...`

// ─── Diagnostic ───────────────────────────────────────────────────────────────

/// An editor-friendly diagnostic produced during DDL validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

// ─── Public entry point ───────────────────────────────────────────────────────

/// Validate DDL source and return all diagnostics.
///
/// An empty result means the source is valid.
pub fn validate(src: &str) -> Vec<Diagnostic> {
    let mut diags: Vec<Diagnostic> = Vec::new();

    if src.trim().is_empty() {
        diags.push(Diagnostic {
            message: "DDL is empty".to_string(),
            line: 1,
            column: 1,
        });
        return diags;
    }

    check_unterminated_string(src, &mut diags);
    if !diags.is_empty() {
        // Unterminated string makes all further checks unreliable.
        return diags;
    }

    check_balanced_parens(src, &mut diags);
    check_statements(src, &mut diags);

    diags.sort_by_key(|d| (d.line, d.column));
    diags
}

// ─── Checks ───────────────────────────────────────────────────────────────────

fn check_unterminated_string(src: &str, diags: &mut Vec<Diagnostic>) {
    let mut in_string = false;
    let mut string_start: Option<usize> = None;
    let mut chars = src.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '\'' {
            continue;
        }
        if !in_string {
            in_string = true;
            string_start = Some(i);
        } else if matches!(chars.peek(), Some((_, '\''))) {
            // '' inside a string is an escaped quote, not a terminator.
            chars.next();
        } else {
            in_string = false;
            string_start = None;
        }
    }

    if in_string {
        if let Some(pos) = string_start {
            let (ln, col) = byte_to_line_col(src, pos);
            diags.push(Diagnostic {
                message: "Unterminated string literal".to_string(),
                line: ln,
                column: col,
            });
        }
    }
}

fn check_balanced_parens(src: &str, diags: &mut Vec<Diagnostic>) {
    let mut stack: Vec<usize> = Vec::new();
    let mut in_string = false;

    for (i, ch) in src.char_indices() {
        if ch == '\'' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        match ch {
            '(' => stack.push(i),
            ')' => {
                if stack.pop().is_none() {
                    let (ln, col) = byte_to_line_col(src, i);
                    diags.push(Diagnostic {
                        message: "Unmatched ')'".to_string(),
                        line: ln,
                        column: col,
                    });
                }
            }
            _ => {}
        }
    }

    for pos in stack {
        let (ln, col) = byte_to_line_col(src, pos);
        diags.push(Diagnostic {
            message: "Unclosed '('".to_string(),
            line: ln,
            column: col,
        });
    }
}

fn check_statements(src: &str, diags: &mut Vec<Diagnostic>) {
    for (start, stmt) in split_statements(src) {
        let trimmed = stmt.trim();
        if trimmed.is_empty() {
            continue;
        }

        let offset = start + leading_ws(stmt);
        let (ln, col) = byte_to_line_col(src, offset);
        let upper = trimmed.to_ascii_uppercase();
        let mut words = upper.split_whitespace();

        if words.next() != Some("CREATE") || words.next() != Some("VIEW") {
            diags.push(Diagnostic {
                message: "Statement must start with CREATE VIEW".to_string(),
                line: ln,
                column: col,
            });
            continue;
        }
        if words.next().is_none() {
            diags.push(Diagnostic {
                message: "CREATE VIEW is missing a view name".to_string(),
                line: ln,
                column: col,
            });
            continue;
        }
        if words.next() != Some("AS") || words.next() != Some("SELECT") {
            diags.push(Diagnostic {
                message: "CREATE VIEW must be followed by AS SELECT".to_string(),
                line: ln,
                column: col,
            });
        }
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Split on top-level `;`, skipping separators inside strings and comments.
/// Yields (byte offset, statement text) pairs.
fn split_statements(src: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut stmt_start = 0;
    let mut in_string = false;
    let mut in_comment = false;
    let mut prev: Option<char> = None;

    for (i, ch) in src.char_indices() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
        } else if ch == '\'' {
            in_string = !in_string;
        } else if !in_string && ch == '-' && prev == Some('-') {
            in_comment = true;
        } else if !in_string && ch == ';' {
            out.push((stmt_start, &src[stmt_start..i]));
            stmt_start = i + 1;
        }
        prev = Some(ch);
    }
    if stmt_start < src.len() {
        out.push((stmt_start, &src[stmt_start..]));
    }
    out
}

fn leading_ws(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Convert a byte offset into 1-based (line, column).
fn byte_to_line_col(src: &str, byte_pos: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in src.char_indices() {
        if i >= byte_pos {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ddl_has_no_diagnostics() {
        let src = "CREATE VIEW v AS SELECT name FROM users;\n\
                   CREATE VIEW w AS\n  SELECT population FROM countries;";
        assert!(validate(src).is_empty());
    }

    #[test]
    fn empty_source_is_reported() {
        let diags = validate("   \n  ");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "DDL is empty");
        assert_eq!((diags[0].line, diags[0].column), (1, 1));
    }

    #[test]
    fn unterminated_string_wins_over_other_checks() {
        let diags = validate("CREATE VIEW v AS SELECT 'oops FROM users");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Unterminated string literal");
        assert_eq!(diags[0].line, 1);
        assert_eq!(diags[0].column, 25);
    }

    #[test]
    fn escaped_quote_is_not_a_terminator() {
        let src = "CREATE VIEW v AS SELECT 'it''s fine' FROM users";
        assert!(validate(src).is_empty());
    }

    #[test]
    fn unclosed_paren_is_reported_at_its_position() {
        let diags = validate("CREATE VIEW v AS SELECT count( FROM users");
        assert!(diags
            .iter()
            .any(|d| d.message == "Unclosed '('" && d.line == 1 && d.column == 30));
    }

    #[test]
    fn statement_shape_is_enforced_per_statement() {
        let src = "CREATE VIEW v AS SELECT name FROM users;\nDROP TABLE users;";
        let diags = validate(src);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Statement must start with CREATE VIEW");
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].column, 1);
    }

    #[test]
    fn missing_as_select_is_reported() {
        let diags = validate("CREATE VIEW v FROM users");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "CREATE VIEW must be followed by AS SELECT");
    }

    #[test]
    fn diagnostics_are_ordered_by_position() {
        let src = "SELECT 1;\n(;\nDROP x;";
        let diags = validate(src);
        let positions: Vec<(usize, usize)> = diags.iter().map(|d| (d.line, d.column)).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }
}
