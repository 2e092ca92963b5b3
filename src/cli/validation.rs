//! CLI argument validation functions

use std::fs;
use std::path::PathBuf;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Validate one word of a chat command given on the command line
pub fn validate_command_word(word: &str) -> Result<String, String> {
    if word.trim().is_empty() {
        return Err("Command words cannot be empty".to_string());
    }
    if word.contains(['\n', '\r']) {
        return Err("Command text must be a single line".to_string());
    }
    Ok(word.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_file_path_validation() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());

        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());

        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_command_word_validation() {
        assert_eq!(validate_command_word("/add").unwrap(), "/add");
        assert_eq!(validate_command_word("  X ").unwrap(), "X");
        assert!(validate_command_word("").is_err());
        assert!(validate_command_word("   ").is_err());
        assert!(validate_command_word("a\nb").is_err());
    }
}
