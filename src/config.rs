use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShellError;
use crate::flags::Flags;

/// Startup configuration: an optional rc file whose lines are fed through
/// the normal dispatch path before the first prompt. There is no special
/// syntax; anything typable at the prompt is valid in the file.
pub struct Config {
    rc_path: PathBuf,
}

impl Config {
    pub fn new(flags: &Flags) -> Result<Self, ShellError> {
        let rc_path = match flags.get_value("config") {
            Some(path) => PathBuf::from(path),
            None => dirs::home_dir()
                .ok_or(ShellError::HomeDirNotFound)?
                .join(".venulerc"),
        };

        Ok(Config { rc_path })
    }

    pub fn rc_path(&self) -> &Path {
        &self.rc_path
    }

    /// Reads the startup file, skipping blank lines and comments. A
    /// missing file is not an error; an unreadable one is.
    pub fn startup_lines(&self) -> Result<Vec<String>, ShellError> {
        if !self.rc_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.rc_path).map_err(|e| {
            ShellError::ConfigError(self.rc_path.to_string_lossy().to_string(), e.to_string())
        })?;

        Ok(content
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn config_for(path: &Path) -> Config {
        let mut flags = Flags::new();
        flags
            .parse(&["-c".to_string(), path.to_string_lossy().to_string()])
            .expect("flags should parse");
        Config::new(&flags).expect("config should build")
    }

    #[test]
    fn test_missing_rc_file_yields_no_lines() {
        let config = config_for(Path::new("/tmp/venule_no_such_rc_file"));
        assert_eq!(config.startup_lines().expect("missing file is fine"), Vec::<String>::new());
    }

    #[test]
    fn test_comments_and_blanks_are_filtered() {
        let path = env::temp_dir().join(format!("venule_test_rc_{}", std::process::id()));
        fs::write(&path, "# startup commands\n\ncd /tmp\n   \nstatus\n# done\n")
            .expect("rc file should be writable");

        let config = config_for(&path);
        let lines = config.startup_lines().expect("rc file should read");
        assert_eq!(lines, vec!["cd /tmp".to_string(), "status".to_string()]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_config_flag_overrides_the_path() {
        let config = config_for(Path::new("/tmp/custom_rc"));
        assert_eq!(config.rc_path(), Path::new("/tmp/custom_rc"));
    }

    #[test]
    fn test_default_path_is_under_home() {
        let config = Config::new(&Flags::new()).expect("config should build");
        assert!(config.rc_path().ends_with(".venulerc"));
    }
}
