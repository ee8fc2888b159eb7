use std::time::Duration;

use campus_engine::PortalConfig;

/// How often the app loop checks for a stale view.
pub const DIRTY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How often the remaining-time cells are recomputed without a full redraw.
pub const REMAINING_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Look-ahead windows the user can switch between, in days.
pub const LOOK_AHEAD_CHOICES: [u32; 2] = [7, 14];

/// The portal endpoints and limits the app runs against. Static by design:
/// nothing is read from the environment or from files.
pub fn portal_config() -> PortalConfig {
    PortalConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_config_is_the_static_default() {
        let config = portal_config();
        assert_eq!(config.base_url, "https://ecampus.smu.ac.kr");
        assert_eq!(config.login_path, "/login.php");
        assert_eq!(config.look_ahead_days, LOOK_AHEAD_CHOICES[0]);
    }
}
