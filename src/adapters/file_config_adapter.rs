//! INI file configuration adapter.

use crate::domain::error::QuantError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::fs;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    /// An adapter with no sections; every lookup yields its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QuantError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(content, &path.display().to_string())
    }

    pub fn from_string(content: &str) -> Result<Self, QuantError> {
        Self::parse(content.to_string(), "<string>")
    }

    fn parse(content: String, origin: &str) -> Result<Self, QuantError> {
        let mut config = Ini::new();
        config
            .read(content)
            .map_err(|reason| QuantError::ConfigParse {
                file: origin.to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const FULL: &str = r#"
[backtest]
start_cash = 25000
fee_bps = 2.5
strategy = channel_breakout

[sample]
length = 120
seed = 42

[options]
steps = 200
dividend_yield = 0.01

[data]
dir = /var/prices
"#;

    #[test]
    fn reads_every_section() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(adapter.get_double("backtest", "start_cash", 0.0), 25000.0);
        assert_eq!(adapter.get_double("backtest", "fee_bps", 0.0), 2.5);
        assert_eq!(
            adapter.get_string("backtest", "strategy"),
            Some("channel_breakout".to_string())
        );
        assert_eq!(adapter.get_int("sample", "length", 0), 120);
        assert_eq!(adapter.get_int("sample", "seed", 0), 42);
        assert_eq!(adapter.get_int("options", "steps", 0), 200);
        assert_eq!(adapter.get_double("options", "dividend_yield", 1.0), 0.01);
        assert_eq!(
            adapter.get_string("data", "dir"),
            Some("/var/prices".to_string())
        );
    }

    #[test]
    fn missing_keys_take_defaults() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nfee_bps = 1\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
        assert_eq!(adapter.get_int("sample", "length", 240), 240);
        assert_eq!(adapter.get_double("backtest", "start_cash", 10_000.0), 10_000.0);
        assert!(!adapter.has("backtest", "start_cash"));
        assert!(adapter.has("backtest", "fee_bps"));
    }

    #[test]
    fn non_numeric_values_take_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[sample]\nlength = abc\nvol = high\n").unwrap();
        assert_eq!(adapter.get_int("sample", "length", 42), 42);
        assert_eq!(adapter.get_double("sample", "vol", 0.01), 0.01);
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[flags]\na = true\nb = Yes\nc = 1\nd = off\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("flags", "a", false));
        assert!(adapter.get_bool("flags", "b", false));
        assert!(adapter.get_bool("flags", "c", false));
        assert!(!adapter.get_bool("flags", "d", true));
        assert!(!adapter.get_bool("flags", "e", true));
        assert!(!adapter.get_bool("flags", "f", true));
        assert!(adapter.get_bool("flags", "g", true));
    }

    #[test]
    fn empty_adapter_has_nothing() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("backtest", "strategy"), None);
        assert_eq!(adapter.get_double("backtest", "fee_bps", 1.0), 1.0);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(FULL);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_int("options", "steps", 0), 200);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/quantkit.ini");
        assert!(matches!(result, Err(QuantError::Io(_))));
    }
}
