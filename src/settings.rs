//! Global scheduling defaults (settings policy).
//!
//! The policy seeds new availability stores (default weekly template,
//! default capacity and buffer) and bounds scheduler decisions (whole-day
//! booking cap, advance-booking horizon). It is an explicit value passed
//! into window creation and `can_book`, never a module-level default read
//! at arbitrary times.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::TimeRange;

/// One entry of the default weekly template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub weekday: Weekday,
    pub range: TimeRange,
}

/// Global defaults that seed new windows and bound admission decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsPolicy {
    /// Recurring windows a fresh provider calendar starts with.
    #[serde(default)]
    pub default_weekly_template: Vec<TemplateEntry>,
    /// Buffer minutes for windows created without an explicit buffer.
    #[serde(default = "default_buffer_minutes")]
    pub default_buffer_minutes: u16,
    /// Capacity for windows created without an explicit capacity.
    #[serde(default = "default_max_concurrent_bookings")]
    pub default_max_concurrent_bookings: u32,
    /// Whole-day cap across all windows, checked before window resolution.
    #[serde(default = "default_max_daily_bookings")]
    pub max_daily_bookings: u32,
    /// Requests further than this many days past `today` are rejected.
    #[serde(default = "default_advance_booking_days")]
    pub advance_booking_days: u32,
}

fn default_buffer_minutes() -> u16 {
    15
}

fn default_max_concurrent_bookings() -> u32 {
    1
}

fn default_max_daily_bookings() -> u32 {
    12
}

fn default_advance_booking_days() -> u32 {
    60
}

impl Default for SettingsPolicy {
    fn default() -> Self {
        Self {
            default_weekly_template: Vec::new(),
            default_buffer_minutes: default_buffer_minutes(),
            default_max_concurrent_bookings: default_max_concurrent_bookings(),
            max_daily_bookings: default_max_daily_bookings(),
            advance_booking_days: default_advance_booking_days(),
        }
    }
}

/// On-disk settings file shape (`slotwise.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    policy: Option<SettingsPolicy>,
}

impl SettingsPolicy {
    /// Load the policy from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!(
                "failed to read settings file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        let file: SettingsFile =
            toml::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse settings: {}", e))?;
        Ok(file.policy.unwrap_or_default())
    }

    /// Load from the default locations, falling back to built-in defaults
    /// when no `slotwise.toml` exists.
    ///
    /// Searches:
    /// 1. Current directory
    /// 2. `config/` subdirectory
    /// 3. Parent directory
    pub fn from_default_location() -> anyhow::Result<Self> {
        let search_paths = [
            PathBuf::from("slotwise.toml"),
            PathBuf::from("config/slotwise.toml"),
            PathBuf::from("../slotwise.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Standard Monday-to-Friday template helper.
    pub fn with_weekday_template(mut self, range: TimeRange) -> Self {
        self.default_weekly_template = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .map(|weekday| TemplateEntry { weekday, range })
        .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let policy = SettingsPolicy::default();
        assert!(policy.default_weekly_template.is_empty());
        assert_eq!(policy.default_buffer_minutes, 15);
        assert_eq!(policy.default_max_concurrent_bookings, 1);
        assert_eq!(policy.max_daily_bookings, 12);
        assert_eq!(policy.advance_booking_days, 60);
    }

    #[test]
    fn test_parse_full_policy() {
        let toml = r#"
[policy]
default_buffer_minutes = 30
default_max_concurrent_bookings = 2
max_daily_bookings = 8
advance_booking_days = 14

[[policy.default_weekly_template]]
weekday = "Mon"
range = { start = "09:00", end = "17:00" }

[[policy.default_weekly_template]]
weekday = "Tue"
range = { start = "10:00", end = "16:00" }
"#;

        let file: SettingsFile = toml::from_str(toml).unwrap();
        let policy = file.policy.unwrap();
        assert_eq!(policy.default_buffer_minutes, 30);
        assert_eq!(policy.default_max_concurrent_bookings, 2);
        assert_eq!(policy.max_daily_bookings, 8);
        assert_eq!(policy.advance_booking_days, 14);
        assert_eq!(policy.default_weekly_template.len(), 2);
        assert_eq!(policy.default_weekly_template[0].weekday, Weekday::Mon);
        assert_eq!(
            policy.default_weekly_template[1].range,
            TimeRange::parse("10:00", "16:00").unwrap()
        );
    }

    #[test]
    fn test_partial_policy_uses_defaults() {
        let toml = r#"
[policy]
max_daily_bookings = 5
"#;
        let file: SettingsFile = toml::from_str(toml).unwrap();
        let policy = file.policy.unwrap();
        assert_eq!(policy.max_daily_bookings, 5);
        assert_eq!(policy.default_buffer_minutes, 15);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[policy]\nadvance_booking_days = 7\n\n[[policy.default_weekly_template]]\nweekday = \"Fri\"\nrange = {{ start = \"08:00\", end = \"12:00\" }}"
        )
        .unwrap();

        let policy = SettingsPolicy::from_file(file.path()).unwrap();
        assert_eq!(policy.advance_booking_days, 7);
        assert_eq!(policy.default_weekly_template.len(), 1);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(SettingsPolicy::from_file("/nonexistent/slotwise.toml").is_err());
    }

    #[test]
    fn test_weekday_template_helper() {
        let policy = SettingsPolicy::default()
            .with_weekday_template(TimeRange::parse("09:00", "17:00").unwrap());
        assert_eq!(policy.default_weekly_template.len(), 5);
        assert!(policy
            .default_weekly_template
            .iter()
            .all(|e| e.range == TimeRange::parse("09:00", "17:00").unwrap()));
    }
}
