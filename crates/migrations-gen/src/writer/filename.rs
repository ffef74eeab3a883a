//! Migration filename templating.
//!
//! Patterns carry two tokens: `[datetime_prefix]` and `[name]`. The
//! datetime prefix orders migrations chronologically; view and foreign-key
//! artifacts are stamped one second after table artifacts so the migration
//! runner replays them only once every table exists.

use chrono::NaiveDateTime;

/// Format a datetime as a migration filename prefix.
pub fn datetime_prefix(datetime: &NaiveDateTime) -> String {
    datetime.format("%Y_%m_%d_%H%M%S").to_string()
}

/// Substitute pattern tokens.
pub fn compose(pattern: &str, prefix: &str, name: &str) -> String {
    pattern
        .replace("[datetime_prefix]", prefix)
        .replace("[name]", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_datetime_prefix_format() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap();
        assert_eq!(datetime_prefix(&dt), "2024_03_01_123045");
    }

    #[test]
    fn test_compose_replaces_tokens() {
        let name = compose(
            "[datetime_prefix]_create_[name]_table.php",
            "2024_03_01_123045",
            "users",
        );
        assert_eq!(name, "2024_03_01_123045_create_users_table.php");
    }
}
