//! Lowering state that is not scope-related.

use ml_ir::StringInterner;

/// Fresh-name supply and name resolution for one lowering run.
///
/// Every temporary, scope variable and function in the generated program
/// gets a numeric suffix from one counter, so flattened nested scopes and
/// same-named functions never collide.
pub struct LoweringContext<'a> {
    pub interner: &'a StringInterner,
    counter: u32,
}

impl<'a> LoweringContext<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        LoweringContext {
            interner,
            counter: 0,
        }
    }

    fn next(&mut self) -> u32 {
        let n = self.counter;
        self.counter += 1;
        n
    }

    /// Temporary holding a value: `t0`, `t1`, ...
    pub fn fresh_temp(&mut self) -> String {
        format!("t{}", self.next())
    }

    /// Variable holding a runtime scope: `s0`, `s1`, ...
    pub fn fresh_scope(&mut self) -> String {
        format!("s{}", self.next())
    }

    /// Variable holding a value arena mark: `m0`, `m1`, ...
    pub fn fresh_mark(&mut self) -> String {
        format!("m{}", self.next())
    }

    /// C function name for a lowered function literal.
    pub fn fresh_function(&mut self, name: &str) -> String {
        let mut result = String::with_capacity(name.len() + 10);
        result.push_str("ml_fn_");
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                result.push(c);
            } else {
                result.push('_');
            }
        }
        result.push('_');
        result.push_str(&self.next().to_string());
        result
    }
}

/// C string literal with the same bytes as `s`.
pub fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for byte in s.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            // Octal keeps a following digit from joining the escape.
            0x20..=0x7e if byte != b'?' => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out.push('"');
    out
}

/// C literal for a double, round-tripping exactly.
pub fn c_double(n: f64) -> String {
    format!("{n:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_names_share_one_counter() {
        let interner = StringInterner::new();
        let mut ctx = LoweringContext::new(&interner);
        assert_eq!(ctx.fresh_temp(), "t0");
        assert_eq!(ctx.fresh_scope(), "s1");
        assert_eq!(ctx.fresh_function("sum"), "ml_fn_sum_2");
        assert_eq!(ctx.fresh_function("sum"), "ml_fn_sum_3");
        assert_eq!(ctx.fresh_mark(), "m4");
    }

    #[test]
    fn function_names_are_mangled() {
        let interner = StringInterner::new();
        let mut ctx = LoweringContext::new(&interner);
        assert_eq!(ctx.fresh_function("my-fn"), "ml_fn_my_fn_0");
    }

    #[test]
    fn string_literals_are_escaped() {
        assert_eq!(c_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(c_string("é"), r#""\303\251""#);
        assert_eq!(c_string("??="), r#""\077\077=""#);
    }

    #[test]
    fn doubles_keep_a_fraction_or_exponent() {
        assert_eq!(c_double(1.0), "1.0");
        assert_eq!(c_double(0.1), "0.1");
        assert_eq!(c_double(1e300), "1e300");
    }
}
