use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable overriding the Codex home directory
pub const CODEX_HOME_ENV: &str = "CODEX_HOME";

/// Get the Codex home directory: `$CODEX_HOME`, or `~/.codex` when unset
pub fn get_codex_home() -> Result<PathBuf> {
    if let Some(value) = env::var_os(CODEX_HOME_ENV).filter(|v| !v.is_empty()) {
        let value = PathBuf::from(value);
        if let Ok(rest) = value.strip_prefix("~") {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            return Ok(home.join(rest));
        }
        return Ok(value);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".codex"))
}

/// Root of the rollout tree: `<codex home>/sessions`
pub fn get_sessions_root() -> Result<PathBuf> {
    Ok(get_codex_home()?.join("sessions"))
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_codex_home_resolution() {
        // Single test so the env mutations below never race each other
        let original = env::var_os(CODEX_HOME_ENV);

        // SAFETY: only this test touches CODEX_HOME, and it restores the value
        unsafe {
            env::set_var(CODEX_HOME_ENV, "/tmp/custom-codex");
        }
        assert_eq!(get_codex_home().unwrap(), PathBuf::from("/tmp/custom-codex"));
        assert_eq!(get_sessions_root().unwrap(), PathBuf::from("/tmp/custom-codex/sessions"));

        unsafe {
            env::set_var(CODEX_HOME_ENV, "~/elsewhere");
        }
        if let Some(home) = dirs::home_dir() {
            assert_eq!(get_codex_home().unwrap(), home.join("elsewhere"));
        }

        unsafe {
            env::remove_var(CODEX_HOME_ENV);
        }
        if let Some(home) = dirs::home_dir() {
            assert_eq!(get_codex_home().unwrap(), home.join(".codex"));
        }

        if let Some(value) = original {
            unsafe {
                env::set_var(CODEX_HOME_ENV, value);
            }
        }
    }
}
