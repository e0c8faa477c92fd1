//! Application configuration for the demo.

use std::path::PathBuf;

use clap::Parser;

/// Default log filter for the demo binary.
const DEFAULT_LOG_FILTER: &str = "info,markerbind_core=debug";

/// Runtime configuration for the markerbind demo.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "markerbind-demo",
    about = "Replay a scripted marker tracking session headlessly"
)]
pub struct DemoConfig {
    /// Session script to replay; the bundled pets session when unset.
    #[arg(value_name = "SESSION", env = "MARKERBIND_SESSION")]
    pub session_path: Option<PathBuf>,
    /// `tracing` filter directive handed to the log plugin.
    #[arg(long, env = "MARKERBIND_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn command_definition_is_consistent() {
        DemoConfig::command().debug_assert();
    }

    #[test]
    fn positional_argument_selects_session() {
        let config = DemoConfig::try_parse_from(["markerbind-demo", "sessions/pets.json"]).unwrap();
        assert_eq!(config.session_path, Some(PathBuf::from("sessions/pets.json")));
    }

    #[test]
    fn help_is_not_mistaken_for_a_session() {
        let err = DemoConfig::try_parse_from(["markerbind-demo", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn log_filter_flag_overrides_default() {
        let config =
            DemoConfig::try_parse_from(["markerbind-demo", "--log-filter", "warn"]).unwrap();
        assert_eq!(config.log_filter, "warn");
    }
}
