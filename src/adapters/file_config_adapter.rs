//! INI file configuration adapter.
//!
//! Reading the file and parsing it fail differently: an unreadable file is an
//! I/O error, a malformed one is a config parse error naming the file.

use crate::domain::error::DigestError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn load(path: &Path) -> Result<Self, DigestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&path.display().to_string(), &content)
    }

    pub fn from_string(content: &str) -> Result<Self, DigestError> {
        Self::parse("<inline>", content)
    }

    /// A config with no sections, for runs driven purely by the environment.
    pub fn empty() -> Self {
        Self { ini: Ini::new() }
    }

    fn parse(source: &str, content: &str) -> Result<Self, DigestError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| DigestError::ConfigParse {
                file: source.to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }
}
