use std::time::Duration;

use log::warn;

const DEFAULT_LOGIN_PATH: &str = "/api/login";
const DEFAULT_HOME_PATH: &str = "/";
const DEFAULT_REDIRECT_DELAY_MS: u64 = 2_000;

/// Coordinator configuration: where to send the caller, and how long the
/// post-success confirmation stays on screen before the home redirect.
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    pub login_path: String,
    pub home_path: String,
    pub redirect_delay: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            home_path: DEFAULT_HOME_PATH.to_string(),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
        }
    }
}

impl CoordinatorConfig {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let redirect_delay = match std::env::var("ACCEPTANCE_REDIRECT_DELAY_MS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!("Ignoring unparsable ACCEPTANCE_REDIRECT_DELAY_MS: {}", raw);
                    defaults.redirect_delay
                }
            },
            Err(_) => defaults.redirect_delay,
        };

        Self {
            login_path: std::env::var("ACCEPTANCE_LOGIN_PATH").unwrap_or(defaults.login_path),
            home_path: std::env::var("ACCEPTANCE_HOME_PATH").unwrap_or(defaults.home_path),
            redirect_delay,
        }
    }
}
