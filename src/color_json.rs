//! Purpose: Pretty-print JSON for terminals, optionally with ANSI color.
//! Exports: `colorize_json`.
//! Role: Small, pure formatter used by CLI emission paths.
//! Invariants: When color is disabled, output equals `serde_json::to_string_pretty`.
//! Invariants: Strings holding a `#rrggbb` hex color get a truecolor sample block when color is on.
use serde_json::{Map, Value};

const INDENT: &str = "  ";

const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_LITERAL: &str = "35";
const COLOR_PLAIN: &str = "39";

pub fn colorize_json(value: &Value, use_color: bool) -> String {
    let mut painter = Painter {
        out: String::new(),
        use_color,
    };
    painter.value(value, 0);
    painter.out
}

struct Painter {
    out: String,
    use_color: bool,
}

impl Painter {
    fn value(&mut self, value: &Value, level: usize) {
        match value {
            Value::Null => self.token("null", COLOR_PLAIN),
            Value::Bool(flag) => self.token(if *flag { "true" } else { "false" }, COLOR_LITERAL),
            Value::Number(number) => self.token(&number.to_string(), COLOR_NUMBER),
            Value::String(text) => self.string(text),
            Value::Array(items) => self.array(items, level),
            Value::Object(map) => self.object(map, level),
        }
    }

    fn string(&mut self, text: &str) {
        if self.use_color {
            if let Some((r, g, b)) = hex_rgb(text) {
                self.out
                    .push_str(&format!("\u{1b}[38;2;{r};{g};{b}m\u{2588}\u{2588}\u{1b}[0m "));
            }
        }
        self.token(&quoted(text), COLOR_STRING);
    }

    fn array(&mut self, items: &[Value], level: usize) {
        if items.is_empty() {
            self.token("[]", COLOR_PLAIN);
            return;
        }
        self.token("[", COLOR_PLAIN);
        for (index, item) in items.iter().enumerate() {
            self.separator(index, level + 1);
            self.value(item, level + 1);
        }
        self.close("]", level);
    }

    fn object(&mut self, map: &Map<String, Value>, level: usize) {
        if map.is_empty() {
            self.token("{}", COLOR_PLAIN);
            return;
        }
        self.token("{", COLOR_PLAIN);
        for (index, (key, item)) in map.iter().enumerate() {
            self.separator(index, level + 1);
            self.token(&quoted(key), COLOR_KEY);
            self.token(":", COLOR_PLAIN);
            self.out.push(' ');
            self.value(item, level + 1);
        }
        self.close("}", level);
    }

    /// Comma after the previous entry (if any), then a newline and indentation.
    fn separator(&mut self, index: usize, level: usize) {
        if index > 0 {
            self.token(",", COLOR_PLAIN);
        }
        self.out.push('\n');
        self.out.push_str(&INDENT.repeat(level));
    }

    fn close(&mut self, bracket: &str, level: usize) {
        self.out.push('\n');
        self.out.push_str(&INDENT.repeat(level));
        self.token(bracket, COLOR_PLAIN);
    }

    fn token(&mut self, text: &str, color: &str) {
        if self.use_color {
            self.out.push_str(&format!("\u{1b}[{color}m{text}\u{1b}[0m"));
        } else {
            self.out.push_str(text);
        }
    }
}

fn quoted(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

fn hex_rgb(text: &str) -> Option<(u8, u8, u8)> {
    let digits = text.strip_prefix('#')?;
    if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
