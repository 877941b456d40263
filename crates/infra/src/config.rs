use chrono_tz::Tz;
use staffpilot_utils::create_random_secret;
use tracing::{info, warn};

const DEFAULT_REMINDER_THRESHOLDS: [i64; 4] = [0, 1, 3, 7];

#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between two dispatch passes
    pub poll_interval_secs: u64,
    /// Day-offsets at which deadline reminders fire, e.g. {0, 1, 3, 7}.
    /// Sorted descending so the furthest threshold is checked first.
    pub reminder_threshold_days: Vec<i64>,
    /// Timezone the calendar-day arithmetic is evaluated in. Deadlines are
    /// stored as millis timestamps; "3 days left" is a statement about
    /// local calendar days, not 72-hour windows.
    pub business_timezone: Tz,
    /// Endpoint of the push delivery gateway
    pub push_gateway_url: Option<String>,
    /// Key sent to the push delivery gateway on every request
    pub push_gateway_key: String,
}

impl Config {
    pub fn new() -> Self {
        let default_poll_interval = "5";
        let poll_interval = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| default_poll_interval.into());
        let poll_interval_secs = match poll_interval.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given POLL_INTERVAL_SECS: {} is not valid, falling back to the default: {}.",
                    poll_interval, default_poll_interval
                );
                default_poll_interval.parse::<u64>().unwrap()
            }
        };

        let reminder_threshold_days = match std::env::var("REMINDER_THRESHOLD_DAYS") {
            Ok(raw) => match parse_thresholds(&raw) {
                Some(thresholds) => thresholds,
                None => {
                    warn!(
                        "The given REMINDER_THRESHOLD_DAYS: {} is not valid, falling back to the default: 0,1,3,7.",
                        raw
                    );
                    DEFAULT_REMINDER_THRESHOLDS.to_vec()
                }
            },
            Err(_) => DEFAULT_REMINDER_THRESHOLDS.to_vec(),
        };
        let mut reminder_threshold_days = reminder_threshold_days;
        reminder_threshold_days.sort_unstable_by(|a, b| b.cmp(a));
        reminder_threshold_days.dedup();

        let default_timezone = "UTC";
        let timezone = std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| default_timezone.into());
        let business_timezone = match timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "The given BUSINESS_TIMEZONE: {} is not valid, falling back to the default: {}.",
                    timezone, default_timezone
                );
                chrono_tz::UTC
            }
        };

        let push_gateway_url = std::env::var("PUSH_GATEWAY_URL").ok();

        let push_gateway_key = match std::env::var("PUSH_GATEWAY_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find PUSH_GATEWAY_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("Push gateway key was generated and set to: {}", key);
                key
            }
        };

        Self {
            poll_interval_secs,
            reminder_threshold_days,
            business_timezone,
            push_gateway_url,
            push_gateway_key,
        }
    }

    /// Fixed configuration that never reads the process environment, so a
    /// developer's shell variables cannot change what the in-memory context
    /// does in tests.
    pub fn fixed() -> Self {
        Self {
            poll_interval_secs: 5,
            reminder_threshold_days: vec![7, 3, 1, 0],
            business_timezone: chrono_tz::UTC,
            push_gateway_url: None,
            push_gateway_key: "fixed-gateway-key".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_thresholds(raw: &str) -> Option<Vec<i64>> {
    let thresholds = raw
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if thresholds.is_empty() || thresholds.iter().any(|d| *d < 0) {
        return None;
    }
    Some(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_config_ignores_the_environment() {
        std::env::set_var("REMINDER_THRESHOLD_DAYS", "14,2");
        std::env::set_var("BUSINESS_TIMEZONE", "Asia/Tokyo");

        let config = Config::fixed();
        assert_eq!(config.reminder_threshold_days, vec![7, 3, 1, 0]);
        assert_eq!(config.business_timezone, chrono_tz::UTC);
        assert_eq!(config.poll_interval_secs, 5);

        std::env::remove_var("REMINDER_THRESHOLD_DAYS");
        std::env::remove_var("BUSINESS_TIMEZONE");
    }

    #[test]
    fn parses_threshold_lists() {
        assert_eq!(parse_thresholds("0,1,3,7"), Some(vec![0, 1, 3, 7]));
        assert_eq!(parse_thresholds(" 7, 3 ,1,0 "), Some(vec![7, 3, 1, 0]));
        assert_eq!(parse_thresholds("14"), Some(vec![14]));
        assert_eq!(parse_thresholds(""), None);
        assert_eq!(parse_thresholds("1,two"), None);
        assert_eq!(parse_thresholds("3,-1"), None);
    }
}
