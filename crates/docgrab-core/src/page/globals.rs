//! Global-scope bindings reflected from a page.
//!
//! A browser host can enumerate `window` directly. Outside a browser the
//! closest equivalent is reading `var NAME = ...` declarations and
//! `window.NAME = ...` style assignments out of the inline scripts.

use regex::Regex;
use std::sync::OnceLock;

/// Value of one reflected binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingValue {
    Str(String),
    /// Present but not a string (number, object, expression).
    Other,
    /// The host saw the binding but could not read its value.
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalBinding {
    pub name: String,
    pub value: BindingValue,
}

/// Ordered set of global bindings. Reassigning a name updates its value in
/// place; enumeration order is the order names were first seen.
#[derive(Debug, Clone, Default)]
pub struct GlobalScope {
    bindings: Vec<GlobalBinding>,
}

impl GlobalScope {
    pub fn insert(&mut self, name: impl Into<String>, value: BindingValue) {
        let name = name.into();
        match self.bindings.iter_mut().find(|b| b.name == name) {
            Some(existing) => existing.value = value,
            None => self.bindings.push(GlobalBinding { name, value }),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlobalBinding> {
        self.bindings.iter()
    }

    /// Readable string bindings as `(name, value)`, in enumeration order.
    pub fn strings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().filter_map(|b| match &b.value {
            BindingValue::Str(s) => Some((b.name.as_str(), s.as_str())),
            BindingValue::Other | BindingValue::Unreadable => None,
        })
    }

    /// Builds a scope from script sources, in document order.
    pub fn reflect_scripts<'a>(scripts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scope = Self::default();
        for script in scripts {
            for caps in binding_re().captures_iter(script) {
                let name = &caps["name"];
                let value = if let Some(lit) = caps.name("dq").or_else(|| caps.name("sq")) {
                    match unescape_js(lit.as_str()) {
                        Some(s) => BindingValue::Str(s),
                        None => BindingValue::Unreadable,
                    }
                } else {
                    BindingValue::Other
                };
                scope.insert(name, value);
            }
        }
        scope
    }
}

impl FromIterator<(String, BindingValue)> for GlobalScope {
    fn from_iter<I: IntoIterator<Item = (String, BindingValue)>>(iter: I) -> Self {
        let mut scope = Self::default();
        for (name, value) in iter {
            scope.insert(name, value);
        }
        scope
    }
}

static BINDING_RE: OnceLock<Regex> = OnceLock::new();

fn binding_re() -> &'static Regex {
    BINDING_RE.get_or_init(|| {
        Regex::new(
            r#"(?m)\b(?:var[ \t]+|(?:window|globalThis|self)\.)(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)[ \t]*=[ \t]*(?:"(?P<dq>(?:[^"\\\n]|\\.)*)"[ \t]*\r?(?:;|$)|'(?P<sq>(?:[^'\\\n]|\\.)*)'[ \t]*\r?(?:;|$)|[^;\n=][^;\n]*)"#,
        )
        .expect("binding regex")
    })
}

/// Decodes a JavaScript string literal body. `None` for malformed escapes
/// or lone surrogates, which a host would fail to read.
fn unescape_js(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let hi = chars.next()?.to_digit(16)?;
                let lo = chars.next()?.to_digit(16)?;
                out.push(char::from_u32(hi << 4 | lo)?);
            }
            'u' => {
                let unit = read_unicode_escape(&mut chars)?;
                if (0xD800..0xDC00).contains(&unit) {
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = read_unicode_escape(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return None;
                    }
                    let cp = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(cp)?);
                } else {
                    out.push(char::from_u32(unit)?);
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}

fn read_unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    if chars.peek() == Some(&'{') {
        chars.next();
        let mut value = 0u32;
        let mut digits = 0;
        loop {
            let c = chars.next()?;
            if c == '}' {
                break;
            }
            value = value.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
            digits += 1;
        }
        return (digits > 0).then_some(value);
    }
    let mut value = 0u32;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_and_window_assignments() {
        let scope = GlobalScope::reflect_scripts([
            "var docUrl = \"https://x/viewer_next/web/study?id=1\";\nwindow.other = 'b';",
        ]);
        let all: Vec<_> = scope.strings().collect();
        assert_eq!(
            all,
            [
                ("docUrl", "https://x/viewer_next/web/study?id=1"),
                ("other", "b")
            ]
        );
    }

    #[test]
    fn let_and_const_are_not_globals() {
        let scope = GlobalScope::reflect_scripts(["let a = 'x'; const b = \"y\";"]);
        assert!(scope.is_empty());
    }

    #[test]
    fn non_string_values_are_recorded_but_not_enumerated() {
        let scope = GlobalScope::reflect_scripts(["var n = 42;\nvar s = 'a' + 'b';"]);
        assert_eq!(scope.len(), 2);
        assert_eq!(scope.strings().count(), 0);
        assert!(scope.iter().all(|b| b.value == BindingValue::Other));
    }

    #[test]
    fn crlf_line_without_semicolon_is_a_string() {
        let script = "var u = \"https://studylib.net/viewer_next/web/study\"\r\nvar n = 'x'\r\n";
        let scope = GlobalScope::reflect_scripts([script]);
        let all: Vec<_> = scope.strings().collect();
        assert_eq!(
            all,
            [("u", "https://studylib.net/viewer_next/web/study"), ("n", "x")]
        );
    }

    #[test]
    fn reassignment_keeps_first_position() {
        let scope = GlobalScope::reflect_scripts(["var a = '1';", "var b = '2';", "window.a = '3';"]);
        let all: Vec<_> = scope.strings().collect();
        assert_eq!(all, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn malformed_escape_is_unreadable() {
        let scope = GlobalScope::reflect_scripts([r#"var bad = "\u12G4"; var good = "a\/b";"#]);
        let bad = scope.iter().find(|b| b.name == "bad").unwrap();
        assert_eq!(bad.value, BindingValue::Unreadable);
        let strings: Vec<_> = scope.strings().collect();
        assert_eq!(strings, [("good", "a/b")]);
    }

    #[test]
    fn unescape_variants() {
        assert_eq!(unescape_js(r"a\nb").as_deref(), Some("a\nb"));
        assert_eq!(unescape_js(r"\x41B\u{43}").as_deref(), Some("ABC"));
        assert_eq!(unescape_js(r"\uD83D\uDE00").as_deref(), Some("\u{1F600}"));
        assert_eq!(unescape_js(r"\uD83D"), None);
        assert_eq!(unescape_js(r#"\"q\'"#).as_deref(), Some("\"q'"));
    }
}
