//! Final assembly of the generated C document.

use crate::runtime::CRuntime;

/// The four sections of a generated program, filled during lowering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedProgram {
    pub headers: String,
    /// One forward declaration per lowered function.
    pub declarations: Vec<String>,
    /// One definition per lowered function.
    pub definitions: Vec<String>,
    /// Top-level statements, in source order.
    pub entry: Vec<String>,
}

impl GeneratedProgram {
    /// A program whose headers declare the C runtime.
    pub fn new() -> Self {
        let mut headers = String::new();
        CRuntime::emit_headers(&mut headers);
        GeneratedProgram {
            headers,
            ..Self::default()
        }
    }

    pub fn assemble(&self) -> String {
        assemble(
            &self.headers,
            &self.declarations,
            &self.definitions,
            &self.entry,
        )
    }
}

const SEPARATOR: &str = "/* ------------------------------------------------------------ */";

/// Concatenate the sections in fixed order and indent the result by block
/// depth. Entry statements become the body of `main`, bracketed by runtime
/// creation and release. The value handles a statement allocates are
/// released once it has run.
pub fn assemble(
    headers: &str,
    declarations: &[String],
    definitions: &[String],
    entry: &[String],
) -> String {
    let mut doc = String::with_capacity(headers.len() + 256);
    doc.push_str(headers.trim_end());
    doc.push_str("\n\n");

    section(&mut doc, "forward declarations");
    for declaration in declarations {
        doc.push_str(declaration.trim_end());
        doc.push('\n');
    }

    doc.push('\n');
    section(&mut doc, "definitions");
    for definition in definitions {
        doc.push_str(definition.trim_end());
        doc.push_str("\n\n");
    }

    section(&mut doc, "entry point");
    doc.push_str("int main(void) {\n");
    doc.push_str("ml_runtime_t* rt = ml_runtime_new();\n");
    doc.push_str("ml_scope_t scope = ml_scope_global(rt);\n");
    doc.push_str("const size_t mark = ml_arena_mark(rt);\n");
    for statement in entry {
        doc.push_str(statement.trim_end());
        doc.push_str(";\n");
        doc.push_str("ml_arena_reset(rt, mark);\n");
    }
    doc.push_str("ml_runtime_free(rt);\n");
    doc.push_str("return 0;\n");
    doc.push_str("}\n");

    reindent(&doc)
}

fn section(doc: &mut String, title: &str) {
    doc.push_str(SEPARATOR);
    doc.push('\n');
    doc.push_str("/* ");
    doc.push_str(title);
    doc.push_str(" */\n");
}

/// Re-indent C text by brace nesting, four spaces per level, ignoring the
/// existing leading whitespace. Braces in string literals and comments do
/// not count. A line starting with a closing brace sits at the depth of
/// the block it closes.
pub fn reindent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut depth = 0usize;
    let mut in_comment = false;
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            out.push('\n');
            continue;
        }
        let (opens, closes, leading_closes, still_in_comment) = scan(line, in_comment);
        in_comment = still_in_comment;
        let indent = depth.saturating_sub(leading_closes.min(closes));
        for _ in 0..indent {
            out.push_str("    ");
        }
        out.push_str(line);
        out.push('\n');
        depth = (depth + opens).saturating_sub(closes);
    }
    out
}

/// Count `{` and `}` outside literals and comments. Also reports how many
/// closing braces precede the first other significant character.
fn scan(line: &str, mut in_comment: bool) -> (usize, usize, usize, bool) {
    let (mut opens, mut closes, mut leading) = (0, 0, 0);
    let mut leading_done = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
            }
            continue;
        }
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_comment = true;
            }
            '/' if chars.peek() == Some(&'/') => break,
            '{' => opens += 1,
            '}' => {
                closes += 1;
                if !leading_done {
                    leading += 1;
                }
            }
            _ => {}
        }
        if c != '}' && !c.is_whitespace() {
            leading_done = true;
        }
    }
    (opens, closes, leading, in_comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sections_come_in_fixed_order() {
        let doc = assemble(
            "/* headers */",
            &["static int f(void);".to_owned()],
            &["static int f(void) {\nreturn 1;\n}".to_owned()],
            &["f()".to_owned()],
        );
        let headers = doc.find("/* headers */").unwrap_or(usize::MAX);
        let declarations = doc.find("/* forward declarations */").unwrap_or(0);
        let definitions = doc.find("/* definitions */").unwrap_or(0);
        let entry = doc.find("int main(void) {").unwrap_or(0);
        assert!(headers < declarations);
        assert!(declarations < definitions);
        assert!(definitions < entry);
        assert!(doc.contains("static int f(void) {\n    return 1;\n}\n"));
        assert!(doc.contains("    f();\n    ml_arena_reset(rt, mark);\n    ml_runtime_free(rt);\n"));
    }

    #[test]
    fn reindent_follows_brace_depth() {
        let text = "a {\n  b ({\nc;\n      }) + d;\n} else {\ne;\n}\n";
        assert_eq!(
            reindent(text),
            "a {\n    b ({\n        c;\n    }) + d;\n} else {\n    e;\n}\n"
        );
    }

    #[test]
    fn reindent_ignores_braces_in_literals_and_comments() {
        let text = "f(\"{\", '}');\n/* { */\ng {\nh;\n}\n";
        assert_eq!(reindent(text), "f(\"{\", '}');\n/* { */\ng {\n    h;\n}\n");
    }

    #[test]
    fn reindent_handles_one_line_compound_literals() {
        let text = "x {\nml_call(rt, f, (const ml_value_t*[]){a, b}, 2);\n}\n";
        assert_eq!(
            reindent(text),
            "x {\n    ml_call(rt, f, (const ml_value_t*[]){a, b}, 2);\n}\n"
        );
    }
}
