//! Best-effort discovery of the Mendeley Desktop database.
//!
//! Mendeley names its database after the signed-in account, which it records
//! in its own Qt settings file. Nothing here is an error: any failure simply
//! means no database was found.

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

/// Section of `Mendeley Desktop.conf` holding the account details.
pub const ACCOUNT_SECTION: &str = "MendeleyWeb";

/// Key under [`ACCOUNT_SECTION`] holding the account email.
pub const EMAIL_KEY: &str = "userEmail";

/// Per-user locations Mendeley Desktop writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MendeleyPaths {
    /// Mendeley's INI settings file.
    pub config_file: PathBuf,
    /// Directory containing the `*.sqlite` databases.
    pub data_dir: PathBuf,
}

impl MendeleyPaths {
    /// Returns the Linux locations relative to `home`.
    pub fn under_home(home: &Path) -> Self {
        Self {
            config_file: home
                .join(".config")
                .join("Mendeley Ltd.")
                .join("Mendeley Desktop.conf"),
            data_dir: home
                .join(".local")
                .join("share")
                .join("data")
                .join("Mendeley Ltd.")
                .join("Mendeley Desktop"),
        }
    }

    /// Returns the locations for the current user, or `None` if the home
    /// directory cannot be determined.
    pub fn default_locations() -> Option<Self> {
        dirs::home_dir().map(|home| Self::under_home(&home))
    }
}

/// Returns the file name Mendeley uses for the database of `email`'s account.
pub fn database_file_name(email: &str) -> String {
    format!("{email}@www.mendeley.com.sqlite")
}

/// Reads the account email from Mendeley's settings file.
///
/// Qt stores binary settings as `@ByteArray(..)` with raw backslash
/// sequences, so values are read verbatim. The key is matched ignoring case.
pub fn read_account_email(config_file: &Path) -> Option<String> {
    let options = ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    };
    let conf = match Ini::load_from_file_opt(config_file, options) {
        Ok(conf) => conf,
        Err(e) => {
            tracing::debug!(path = %config_file.display(), error = %e, "cannot read Mendeley settings");
            return None;
        }
    };

    let email = conf
        .section(Some(ACCOUNT_SECTION))
        .and_then(|section| {
            section
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(EMAIL_KEY))
                .map(|(_, value)| value)
        })
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string);

    if email.is_none() {
        tracing::debug!(path = %config_file.display(), "no account email in Mendeley settings");
    }
    email
}

/// Locates the database of the signed-in Mendeley account.
///
/// Returns `None` if the settings file is missing or unreadable, holds no
/// account email, or the derived database file does not exist.
pub fn find_database_path(paths: &MendeleyPaths) -> Option<PathBuf> {
    if !paths.config_file.exists() {
        tracing::debug!(path = %paths.config_file.display(), "Mendeley settings not found");
        return None;
    }

    let email = read_account_email(&paths.config_file)?;
    let candidate = paths.data_dir.join(database_file_name(&email));

    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "discovered Mendeley database");
        Some(candidate)
    } else {
        tracing::debug!(path = %candidate.display(), "expected Mendeley database is missing");
        None
    }
}
