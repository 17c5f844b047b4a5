use eframe::egui;

use super::hints::TableHints;

/// Keywords recognized by the highlighter and offered by autocomplete.
pub(crate) const SQL_KEYWORDS: &[&str] = &[
    "CREATE", "VIEW", "AS", "SELECT", "FROM", "WHERE", "AND", "OR", "NOT",
    "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "ON", "GROUP", "BY", "ORDER",
    "HAVING", "LIMIT", "DISTINCT", "UNION", "ALL", "NULL", "IS", "IN",
    "BETWEEN", "LIKE", "CASE", "WHEN", "THEN", "ELSE", "END",
];

/// Syntax-highlight DDL source into a `LayoutJob` for the editor's custom
/// layouter. Tokenizes by character: comments (`-- ...`), single-quoted
/// strings, numbers, rainbow-matched brackets, keywords and catalog names.
pub fn highlight_sql(job: &mut egui::text::LayoutJob, code: &str, hints: &TableHints) {
    let font_id = egui::FontId::monospace(14.0);

    let mut chars = code.char_indices().peekable();
    let mut last_idx = 0;

    // Bracket depth drives the rainbow matching colors.
    let rainbow_colors = [
        egui::Color32::from_rgb(255, 200, 0),
        egui::Color32::from_rgb(200, 100, 255),
        egui::Color32::from_rgb(50, 200, 255),
        egui::Color32::from_rgb(50, 255, 50),
    ];
    let mut bracket_depth: usize = 0;

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() {
            if idx > last_idx {
                append_text(job, &code[last_idx..idx], &font_id, egui::Color32::LIGHT_GRAY);
            }
            let end = idx + c.len_utf8();
            append_text(job, &code[idx..end], &font_id, egui::Color32::LIGHT_GRAY);
            last_idx = end;
            continue;
        }

        // Comments (-- ...)
        if c == '-' {
            if let Some((_, '-')) = chars.peek() {
                chars.next();
                let start = idx;
                let mut end = idx + 2;
                while let Some((i, next_c)) = chars.peek() {
                    if *next_c == '\n' {
                        break;
                    }
                    end = *i + next_c.len_utf8();
                    chars.next();
                }
                append_text(job, &code[last_idx..start], &font_id, egui::Color32::LIGHT_GRAY);
                append_text(
                    job,
                    &code[start..end],
                    &font_id,
                    egui::Color32::from_rgb(90, 120, 90),
                );
                last_idx = end;
                continue;
            }
        }

        // Strings ('...')
        if c == '\'' {
            append_text(job, &code[last_idx..idx], &font_id, egui::Color32::LIGHT_GRAY);

            let start = idx;
            let mut end = idx + 1;
            for (i, next_c) in chars.by_ref() {
                end = i + next_c.len_utf8();
                if next_c == '\'' {
                    break;
                }
            }
            append_text(
                job,
                &code[start..end],
                &font_id,
                egui::Color32::from_rgb(206, 145, 120),
            );
            last_idx = end;
            continue;
        }

        // Brackets
        if "()[]".contains(c) {
            append_text(job, &code[last_idx..idx], &font_id, egui::Color32::LIGHT_GRAY);

            let color_idx = if ")]".contains(c) {
                if bracket_depth > 0 {
                    bracket_depth -= 1;
                }
                bracket_depth
            } else {
                let d = bracket_depth;
                bracket_depth += 1;
                d
            };

            let color = rainbow_colors[color_idx % rainbow_colors.len()];
            append_text(job, &code[idx..idx + 1], &font_id, color);
            last_idx = idx + 1;
            continue;
        }

        // Keywords and identifiers
        if c.is_alphabetic() || c == '_' {
            if idx > last_idx {
                append_text(job, &code[last_idx..idx], &font_id, egui::Color32::LIGHT_GRAY);
            }

            let start = idx;
            let mut end = idx + c.len_utf8();
            while let Some((i, next_c)) = chars.peek() {
                if next_c.is_alphanumeric() || *next_c == '_' {
                    end = *i + next_c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let word = &code[start..end];
            append_text(job, word, &font_id, word_color(word, hints));
            last_idx = end;
            continue;
        }

        // Numbers
        if c.is_ascii_digit() {
            if idx > last_idx {
                append_text(job, &code[last_idx..idx], &font_id, egui::Color32::LIGHT_GRAY);
            }
            let start = idx;
            let mut end = idx + 1;
            while let Some((i, next_c)) = chars.peek() {
                if next_c.is_ascii_digit() || *next_c == '.' {
                    end = *i + 1;
                    chars.next();
                } else {
                    break;
                }
            }
            append_text(
                job,
                &code[start..end],
                &font_id,
                egui::Color32::from_rgb(181, 206, 168),
            );
            last_idx = end;
            continue;
        }

        // Operators and separators
        if "=<>*,.;".contains(c) {
            append_text(job, &code[last_idx..idx], &font_id, egui::Color32::LIGHT_GRAY);
            append_text(
                job,
                &code[idx..idx + 1],
                &font_id,
                egui::Color32::from_rgb(212, 212, 212),
            );
            last_idx = idx + 1;
            continue;
        }
    }

    if last_idx < code.len() {
        append_text(job, &code[last_idx..], &font_id, egui::Color32::LIGHT_GRAY);
    }
}

/// Color for a bare word: keyword blue, known table teal, known column
/// light blue, anything else plain.
fn word_color(word: &str, hints: &TableHints) -> egui::Color32 {
    if SQL_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word)) {
        egui::Color32::from_rgb(86, 156, 214)
    } else if hints.contains_table(word) {
        egui::Color32::from_rgb(78, 201, 176)
    } else if hints.contains_column(word) {
        egui::Color32::from_rgb(156, 220, 254)
    } else {
        egui::Color32::LIGHT_GRAY
    }
}

fn append_text(
    job: &mut egui::text::LayoutJob,
    text: &str,
    font_id: &egui::FontId,
    color: egui::Color32,
) {
    if text.is_empty() {
        return;
    }
    job.append(
        text,
        0.0,
        egui::text::TextFormat {
            font_id: font_id.clone(),
            color,
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl_editor::hints::DEFAULT_HINTS;

    #[test]
    fn keywords_match_any_case() {
        let kw = egui::Color32::from_rgb(86, 156, 214);
        assert_eq!(word_color("SELECT", &DEFAULT_HINTS), kw);
        assert_eq!(word_color("select", &DEFAULT_HINTS), kw);
        assert_eq!(word_color("Create", &DEFAULT_HINTS), kw);
    }

    #[test]
    fn catalog_names_get_their_own_colors() {
        let table = egui::Color32::from_rgb(78, 201, 176);
        let column = egui::Color32::from_rgb(156, 220, 254);
        assert_eq!(word_color("users", &DEFAULT_HINTS), table);
        assert_eq!(word_color("population", &DEFAULT_HINTS), column);
        assert_eq!(word_color("unknown_thing", &DEFAULT_HINTS), egui::Color32::LIGHT_GRAY);
    }

    #[test]
    fn highlighting_covers_the_whole_source() {
        let src = "CREATE VIEW v AS\n  SELECT name, 42 FROM users; -- done\n";
        let mut job = egui::text::LayoutJob::default();
        highlight_sql(&mut job, src, &DEFAULT_HINTS);
        assert_eq!(job.text, src);
    }
}
