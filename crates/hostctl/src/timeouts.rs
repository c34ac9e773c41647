//! Default deadlines for every outbound operation (spec §5).

use std::time::Duration;

pub const STATUS_TIMEOUT: Duration = Duration::from_secs(5);
pub const START_STOP_TIMEOUT: Duration = Duration::from_secs(30);
pub const SCRIPT_TIMEOUT: Duration = Duration::from_secs(60);
pub const WIFI_SURVEY_TIMEOUT: Duration = Duration::from_secs(90);
