use crate::calendar::{parse_weekday, DisabledRules, MAX_WEEKS};
use crate::error::{ConfigError, DateParseError};
use crate::event::parse_date;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use time::{
    format_description::{self, OwnedFormatItem},
    macros::date,
    Date, Weekday,
};

/// Fewest weeks that always fit a whole month
pub const MIN_WEEKS: usize = 6;

pub const DEFAULT_HEADER_FORMAT: &str = "[month repr:long] [year]";

pub const DEFAULT_LAUNCHER_FORMAT: &str = "[day].[month].[year]";

/// Picker configuration as written in a TOML file.  Every key is optional.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub weeks_displayed: usize,
    pub first_day_of_week: String,
    pub header_format: String,
    pub launcher_format: String,
    pub placeholder: String,
    /// Initial committed value
    pub value: Option<String>,
    /// Month shown on opening when nothing is committed; defaults to the
    /// current month
    pub default_month: Option<String>,
    pub disabled: DisabledSettings,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            weeks_displayed: MIN_WEEKS,
            first_day_of_week: String::from("sunday"),
            header_format: String::from(DEFAULT_HEADER_FORMAT),
            launcher_format: String::from(DEFAULT_LAUNCHER_FORMAT),
            placeholder: String::new(),
            value: None,
            default_month: None,
            disabled: DisabledSettings::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisabledSettings {
    pub weekdays: Vec<String>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl Settings {
    pub fn from_toml(s: &str) -> Result<Settings, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn validate(self) -> Result<Config, ConfigError> {
        if !(MIN_WEEKS..=MAX_WEEKS).contains(&self.weeks_displayed) {
            return Err(ConfigError::Weeks {
                got: self.weeks_displayed,
                min: MIN_WEEKS,
                max: MAX_WEEKS,
            });
        }
        let first_day_of_week = parse_weekday(&self.first_day_of_week)
            .ok_or_else(|| ConfigError::Weekday(self.first_day_of_week.clone()))?;
        let weekdays = self
            .disabled
            .weekdays
            .iter()
            .map(|s| parse_weekday(s).ok_or_else(|| ConfigError::Weekday(s.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Config {
            weeks_displayed: self.weeks_displayed,
            first_day_of_week,
            header_format: DateFormat::parse(&self.header_format)?,
            launcher_format: DateFormat::parse(&self.launcher_format)?,
            placeholder: self.placeholder,
            value: optional_date("value", self.value.as_deref())?,
            default_month: optional_date("default_month", self.default_month.as_deref())?,
            disabled: DisabledRules {
                weekdays,
                before: optional_date("disabled.before", self.disabled.before.as_deref())?,
                after: optional_date("disabled.after", self.disabled.after.as_deref())?,
            },
        })
    }
}

/// Validated picker configuration, fixed once a picker is built
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub(crate) weeks_displayed: usize,
    pub(crate) first_day_of_week: Weekday,
    pub(crate) header_format: DateFormat,
    pub(crate) launcher_format: DateFormat,
    pub(crate) placeholder: String,
    pub(crate) value: Option<Date>,
    pub(crate) default_month: Option<Date>,
    pub(crate) disabled: DisabledRules,
}

impl Config {
    /// Reads and validates a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Settings::from_toml(&src)?.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn weeks_displayed(&self) -> usize {
        self.weeks_displayed
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn value(&self) -> Option<Date> {
        self.value
    }

    pub fn default_month(&self) -> Option<Date> {
        self.default_month
    }

    /// The disabled-date rules described by the configuration
    pub fn disabled_rules(&self) -> &DisabledRules {
        &self.disabled
    }

    /// Replaces the initial committed value
    pub fn with_value(mut self, value: Option<Date>) -> Config {
        self.value = value;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            weeks_displayed: MIN_WEEKS,
            first_day_of_week: Weekday::Sunday,
            header_format: DateFormat::default_for(DEFAULT_HEADER_FORMAT),
            launcher_format: DateFormat::default_for(DEFAULT_LAUNCHER_FORMAT),
            placeholder: String::new(),
            value: None,
            default_month: None,
            disabled: DisabledRules::default(),
        }
    }
}

/// A `time` format description applied to calendar dates
#[derive(Clone)]
pub struct DateFormat {
    pattern: String,
    items: OwnedFormatItem,
}

impl DateFormat {
    /// Parses `pattern` and checks that it only needs date components
    pub fn parse(pattern: &str) -> Result<DateFormat, ConfigError> {
        let items =
            format_description::parse_owned::<1>(pattern).map_err(|source| ConfigError::Format {
                pattern: pattern.to_owned(),
                source,
            })?;
        if let Err(source) = date!(2000 - 01 - 01).format(&items) {
            return Err(ConfigError::Unformattable {
                pattern: pattern.to_owned(),
                source,
            });
        }
        Ok(DateFormat {
            pattern: pattern.to_owned(),
            items,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn apply(&self, date: Date) -> String {
        date.format(&self.items).unwrap_or_else(|e| {
            tracing::error!(pattern = %self.pattern, %date, error = %e, "failed to format date");
            date.to_string()
        })
    }

    fn default_for(pattern: &str) -> DateFormat {
        DateFormat::parse(pattern).expect("built-in date formats should be valid")
    }
}

// Two formats are the same if they were written the same way
impl PartialEq for DateFormat {
    fn eq(&self, other: &DateFormat) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for DateFormat {}

impl fmt::Debug for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DateFormat").field(&self.pattern).finish()
    }
}

fn optional_date(field: &'static str, value: Option<&str>) -> Result<Option<Date>, ConfigError> {
    value
        .map(|s| {
            parse_date(s).map_err(|source: DateParseError| ConfigError::Date {
                field,
                value: s.to_owned(),
                source,
            })
        })
        .transpose()
}
