#[cfg(test)]
mod tests {
    use launcher_ping::{
        DEFAULT_PROTOCOL_VERSION, TIMEOUT_MAX_MS, TIMEOUT_MIN_MS,
        commands::settings::Settings,
        models::cli::{Cli, Command, ProbeArgs},
    };

    use std::{path::PathBuf, time::Duration};

    use clap::Parser;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "{}-{name}-{}",
            launcher_ping::CRATE_NAME,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_created() {
        let dir = scratch_dir("missing");

        let settings = Settings::init(Some(dir.as_path()));
        assert_eq!(settings, Settings::default());

        let written = std::fs::read(dir.join("settings.json")).unwrap();
        assert_eq!(serde_json::from_slice::<Settings>(&written).unwrap(), settings);
    }

    #[test]
    fn saved_values_are_loaded_and_clamped() {
        let dir = scratch_dir("saved");
        std::fs::write(
            dir.join("settings.json"),
            r#"{"host": "play.example.org", "port": 25570, "timeout_ms": 5, "poll_interval_secs": 999999}"#,
        )
        .unwrap();

        let settings = Settings::init(Some(dir.as_path()));
        assert_eq!(settings.host, "play.example.org");
        assert_eq!(settings.port, 25570);
        assert_eq!(settings.timeout_ms, TIMEOUT_MIN_MS);
        assert_eq!(settings.protocol_version, DEFAULT_PROTOCOL_VERSION);
        assert_eq!(settings.poll_interval(), Duration::from_secs(3600));

        let options = settings.probe_options();
        assert_eq!(options.host, "play.example.org");
        assert_eq!(options.timeout, Duration::from_millis(TIMEOUT_MIN_MS));
    }

    #[test]
    fn corrupt_file_is_replaced() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join("settings.json"), "{ not json").unwrap();

        assert_eq!(Settings::init(Some(dir.as_path())), Settings::default());
        let written = std::fs::read(dir.join("settings.json")).unwrap();
        assert!(serde_json::from_slice::<Settings>(&written).is_ok());
    }

    #[test]
    fn no_local_dir_uses_defaults() {
        assert_eq!(Settings::init(None), Settings::default());
    }

    #[test]
    fn cli_overrides_settings() {
        let settings = Settings {
            host: String::from("settings.host"),
            ..Default::default()
        };

        let options = ProbeArgs::default().resolve(&settings);
        assert_eq!(options.host, "settings.host");

        let cli = Cli::try_parse_from([
            "launcher_ping",
            "watch",
            "--host",
            " cli.host ",
            "-p",
            "25599",
            "--timeout",
            "250",
            "--protocol-version",
            "47",
            "--interval",
            "30",
            "--count",
            "2",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Watch {
                interval: Some(30),
                count: Some(2)
            })
        );

        let options = cli.probe.resolve(&settings);
        assert_eq!(options.host, "cli.host");
        assert_eq!(options.port, 25599);
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.protocol_version, 47);
    }

    #[test]
    fn cli_rejects_out_of_range() {
        let too_long = (TIMEOUT_MAX_MS + 1).to_string();
        assert!(Cli::try_parse_from(["launcher_ping", "--timeout", too_long.as_str()]).is_err());
        assert!(Cli::try_parse_from(["launcher_ping", "watch", "--interval", "0"]).is_err());
        assert!(Cli::try_parse_from(["launcher_ping", "watch", "--count", "0"]).is_err());

        let cli = Cli::try_parse_from(["launcher_ping", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.command, None);
    }
}
