//! Environment-variable overlay for another [`ConfigPort`].
//!
//! `[section] key` is looked up first as `TRADEDIGEST_<SECTION>_<KEY>` (upper
//! case, non-alphanumerics as `_`), then in the wrapped config. Credentials can
//! therefore live in the environment or a `.env` file instead of the INI file.

use crate::ports::config_port::ConfigPort;

pub const ENV_PREFIX: &str = "TRADEDIGEST";

type Lookup = Box<dyn Fn(&str) -> Option<String>>;

pub struct EnvConfigAdapter<C> {
    inner: C,
    lookup: Lookup,
}

impl<C: ConfigPort> EnvConfigAdapter<C> {
    pub fn new(inner: C) -> Self {
        Self::with_lookup(inner, |name| std::env::var(name).ok())
    }

    pub fn with_lookup(inner: C, lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        Self {
            inner,
            lookup: Box::new(lookup),
        }
    }

    pub fn var_name(section: &str, key: &str) -> String {
        format!("{ENV_PREFIX}_{section}_{key}")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect()
    }

    fn env(&self, section: &str, key: &str) -> Option<String> {
        (self.lookup)(&Self::var_name(section, key))
    }
}

impl<C: ConfigPort> ConfigPort for EnvConfigAdapter<C> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.env(section, key)
            .or_else(|| self.inner.get_string(section, key))
    }
}
