//! Configuration read from the environment.

use crate::api::Storefront;
use crate::helpers::default_data_directory;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use chrono::NaiveTime;
use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;
const DEFAULT_CHECK_HOUR: u32 = 23;
const DEFAULT_CHECK_MINUTE: u32 = 15;
const DEFAULT_LOCALE: &str = "zh-CN";
const DEFAULT_COUNTRY: &str = "CN";
const DEFAULT_STARTUP_CHECK_DELAY_SECONDS: u64 = 8;
const DEFAULT_SEND_DELAY_SECONDS: f64 = 1.0;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN is not set")]
    MissingBotToken,
    #[error("{} is not a valid number: {}", .name, .value)]
    InvalidNumber {
        name: &'static str,
        value: String,
    },
    #[error("{:02}:{:02} is not a valid time of day", .hour, .minute)]
    InvalidCheckTime {
        hour: u32,
        minute: u32,
    },
}

/// Settings for the bot.
#[derive(Clone, PartialEq)]
pub struct Config {
    /// The bot's token from BotFather.
    pub bot_token: String,
    /// Timezone for displaying dates and scheduling the daily check.
    pub timezone: Tz,
    /// The local time of the daily check.
    pub check_time: NaiveTime,
    pub storefront: Storefront,
    /// Where `subscribers.json` and `sent_games.json` are kept.
    pub data_directory: PathBuf,
    /// Delay before the check made on startup.
    pub startup_check_delay: Duration,
    /// Pause after each offer sent.
    pub send_delay: Duration,
}

// Keeps the token out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("timezone", &self.timezone)
            .field("check_time", &self.check_time)
            .field("storefront", &self.storefront)
            .field("data_directory", &self.data_directory)
            .field("startup_check_delay", &self.startup_check_delay)
            .field("send_delay", &self.send_delay)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads the configuration using `lookup` to get variables by name. Empty values are treated
    /// as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let bot_token = var("TELEGRAM_BOT_TOKEN")
            .ok_or(ConfigError::MissingBotToken)?;
        let timezone = match var("TARGET_TIMEZONE") {
            Some(name) => Tz::from_str(&name).unwrap_or_else(|_| {
                log::error!("Unknown timezone {name}, using UTC");
                chrono_tz::UTC
            }),
            None => DEFAULT_TIMEZONE,
        };
        let hour = parse_number(&var, "CHECK_HOUR", DEFAULT_CHECK_HOUR)?;
        let minute = parse_number(&var, "CHECK_MINUTE", DEFAULT_CHECK_MINUTE)?;
        let check_time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(ConfigError::InvalidCheckTime { hour, minute })?;
        let storefront = Storefront::new(
            var("EPIC_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.into()),
            var("EPIC_COUNTRY").unwrap_or_else(|| DEFAULT_COUNTRY.into()),
        );
        let data_directory = var("DATA_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_directory);
        let startup_check_delay = Duration::from_secs(parse_number(
            &var,
            "STARTUP_CHECK_DELAY_SECONDS",
            DEFAULT_STARTUP_CHECK_DELAY_SECONDS,
        )?);
        let send_delay = parse_number(&var, "SEND_DELAY_SECONDS", DEFAULT_SEND_DELAY_SECONDS)?;
        let send_delay = Duration::try_from_secs_f64(send_delay)
            .map_err(|_error| ConfigError::InvalidNumber {
                name: "SEND_DELAY_SECONDS",
                value: send_delay.to_string(),
            })?;

        Ok(Self {
            bot_token,
            timezone,
            check_time,
            storefront,
            data_directory,
            startup_check_delay,
            send_delay,
        })
    }
}

fn parse_number<F, T>(
    var: &F,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(name) {
        Some(value) => value.parse::<T>()
            .map_err(|_error| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
