use tracing::{debug, error};

use crate::utils::command::CommandUtils;

/// SIGTERM, delivered when the parent of appforge exits.
const PARENT_DEATH_SIGNAL: isize = 15;

impl CommandUtils {
    /// Ends appforge together with the process that started it.
    pub fn set_death_signal() {
        match prctl::set_death_signal(PARENT_DEATH_SIGNAL) {
            Ok(_) => debug!("Set death signal to {}", PARENT_DEATH_SIGNAL),
            Err(err) => error!(
                "Error setting death signal to {}, error: {}",
                PARENT_DEATH_SIGNAL, err
            ),
        }
    }
}
