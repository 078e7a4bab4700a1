//! Configuration access port trait.
//!
//! Implementors only provide raw string lookup. The typed getters return
//! `Ok(None)` for an absent or blank value and `Err` with a reason when the
//! value is present but does not parse.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String> {
        present(self.get_string(section, key))
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|_| format!("{v:?} is not an integer"))
            })
            .transpose()
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String> {
        present(self.get_string(section, key))
            .map(|v| parse_bool(&v).ok_or_else(|| format!("{v:?} is not a boolean")))
            .transpose()
    }
}

/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, case-insensitively.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
