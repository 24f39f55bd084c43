use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};
use std::path::PathBuf;

use crate::api::DEFAULT_BASE_URL;

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("ecotrack")
        .about("EcoTrack environmental monitoring dashboard client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("EcoTrack API base URL")
                .default_value(DEFAULT_BASE_URL)
                .env("ECOTRACK_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("Path of the persisted session record")
                .long_help(
                    "Path of the persisted session record. Defaults to session.json in the per-user data directory.",
                )
                .env("ECOTRACK_SESSION_FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ECOTRACK_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Authenticate and persist the session")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password")
                        .env("ECOTRACK_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the session and its persisted record"))
        .subcommand(Command::new("whoami").about("Show the current session"))
        .subcommand(
            Command::new("open")
                .about("Navigate to a dashboard route through the guards")
                .arg(
                    Arg::new("path")
                        .help("Route path, e.g. / or /users")
                        .required(true),
                ),
        )
        .subcommand(Command::new("zones").about("List zones (admin)"))
        .subcommand(Command::new("sources").about("List measurement sources (admin)"))
        .subcommand(Command::new("users").about("List users (admin)"))
        .subcommand(
            Command::new("indicators")
                .about("List environmental indicators")
                .arg(
                    Arg::new("zone-id")
                        .long("zone-id")
                        .help("Filter by zone")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new("indicator-type")
                        .long("indicator-type")
                        .help("Filter by indicator type, e.g. pm25"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .help("Page number")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("size")
                        .long("size")
                        .help("Page size")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("trend")
                .about("Indicator trend for a zone")
                .arg(
                    Arg::new("zone-id")
                        .long("zone-id")
                        .help("Zone to query")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new("indicator-type")
                        .long("indicator-type")
                        .help("Indicator type, e.g. pm25")
                        .required(true),
                )
                .arg(
                    Arg::new("period")
                        .long("period")
                        .help("Aggregation period, e.g. 7d"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "ecotrack");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("EcoTrack environmental monitoring dashboard client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars([("ECOTRACK_PASSWORD", None::<String>)], || {
            let command = new();
            let matches = command.get_matches_from(vec![
                "ecotrack",
                "--api-url",
                "http://api.example.com/api/v1",
                "login",
                "--email",
                "a@x.com",
                "--password",
                "secret",
            ]);

            assert_eq!(
                matches.get_one::<String>("api-url").map(String::as_str),
                Some("http://api.example.com/api/v1")
            );

            let (name, sub) = matches.subcommand().expect("subcommand");
            assert_eq!(name, "login");
            assert_eq!(
                sub.get_one::<String>("email").map(String::as_str),
                Some("a@x.com")
            );
            assert_eq!(
                sub.get_one::<String>("password").map(String::as_str),
                Some("secret")
            );
        });
    }

    #[test]
    fn test_api_url_defaults_to_local() {
        temp_env::with_vars([("ECOTRACK_API_URL", None::<String>)], || {
            let command = new();
            let matches = command.get_matches_from(vec!["ecotrack", "whoami"]);
            assert_eq!(
                matches.get_one::<String>("api-url").map(String::as_str),
                Some(DEFAULT_BASE_URL)
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("ECOTRACK_API_URL", Some("https://eco.example.com/api/v1")),
                ("ECOTRACK_PASSWORD", Some("from-env")),
                ("ECOTRACK_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches =
                    command.get_matches_from(vec!["ecotrack", "login", "--email", "a@x.com"]);

                assert_eq!(
                    matches.get_one::<String>("api-url").map(String::as_str),
                    Some("https://eco.example.com/api/v1")
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));

                let (_, sub) = matches.subcommand().expect("subcommand");
                assert_eq!(
                    sub.get_one::<String>("password").map(String::as_str),
                    Some("from-env")
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("ECOTRACK_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["ecotrack", "whoami"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(u8::try_from(index).expect("level"))
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for count in 0..5_usize {
            temp_env::with_vars([("ECOTRACK_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["ecotrack".to_string(), "whoami".to_string()];
                if count > 0 {
                    args.push(format!("-{}", "v".repeat(count)));
                }

                let command = new();
                let matches = command.get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(u8::try_from(count).expect("count"))
                );
            });
        }
    }

    #[test]
    fn test_trend_requires_zone_and_type() {
        let command = new();
        let result = command.try_get_matches_from(vec!["ecotrack", "trend"]);
        assert!(result.is_err());
    }
}
