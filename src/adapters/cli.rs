// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line signal reader.
//!
//! CLI invocations have no web server to set signals, so the same signals can be
//! passed as flags. Each signal name maps to a long flag with leading underscores
//! dropped and the remaining underscores turned into dashes:
//! `_plite_app` becomes `--plite-app`.

use crate::domain::{PliteError, Result, SignalNames};
use crate::ports::SignalReader;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashMap;
use std::ffi::OsString;

/// Signal reader for command-line flags.
///
/// # Priority
///
/// Command-line signals have the highest priority (3), which means they override
/// environment variables (priority 2).
///
/// # Examples
///
/// ```rust
/// use plite::adapters::CommandLineSignals;
/// use plite::ports::SignalReader;
///
/// let signals = CommandLineSignals::from_args([
///     "--plite-local-root", "/srv/apps",
///     "--plite-app=demo",
/// ]).unwrap();
///
/// assert_eq!(signals.read_signal("_plite_app").unwrap(), "demo");
/// assert_eq!(signals.read_signal("_plite_local_root").unwrap(), "/srv/apps");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineSignals {
    /// Parsed signal values, keyed by signal name
    values: HashMap<String, String>,
}

impl CommandLineSignals {
    /// Returns the long flag used for a signal name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use plite::adapters::CommandLineSignals;
    ///
    /// assert_eq!(CommandLineSignals::flag_for("_plite_url_app_regex"), "plite-url-app-regex");
    /// assert_eq!(CommandLineSignals::flag_for("REQUEST_URI"), "REQUEST-URI");
    /// ```
    pub fn flag_for(signal: &str) -> String {
        signal.trim_start_matches('_').replace('_', "-")
    }

    /// Adds one flag per signal in `names` to an existing command.
    ///
    /// Applications with their own `clap` command use this together with
    /// [`from_matches`](CommandLineSignals::from_matches).
    pub fn augment(cmd: Command, names: &SignalNames) -> Command {
        let signals = names
            .mode_signals()
            .into_iter()
            .chain(std::iter::once(names.request_path.as_str()))
            .map(str::to_string)
            .collect::<Vec<_>>();

        signals.into_iter().fold(cmd, |cmd, signal| {
            let flag = Self::flag_for(&signal);
            cmd.arg(
                Arg::new(signal.clone())
                    .long(flag)
                    .value_name("VALUE")
                    .num_args(1)
                    .action(ArgAction::Set)
                    .help(format!("Sets the '{}' signal", signal)),
            )
        })
    }

    /// Collects the signal values from matches produced by an [`augment`]ed command.
    ///
    /// [`augment`]: CommandLineSignals::augment
    pub fn from_matches(matches: &ArgMatches, names: &SignalNames) -> Self {
        let mut values = HashMap::new();
        let signals = names
            .mode_signals()
            .into_iter()
            .chain(std::iter::once(names.request_path.as_str()));
        for signal in signals {
            if let Ok(Some(value)) = matches.try_get_one::<String>(signal) {
                values.insert(signal.to_string(), value.clone());
            }
        }
        tracing::debug!("Loaded {} command-line signals", values.len());
        Self { values }
    }

    /// Parses signal flags from an argument list using the canonical signal names.
    ///
    /// The list must not include the binary name. Unknown flags are an error.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        Self::from_args_with_names(args, &SignalNames::default())
    }

    /// Parses signal flags from an argument list using custom signal names.
    pub fn from_args_with_names<I, S>(args: I, names: &SignalNames) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let cmd = Self::augment(
            Command::new("plite")
                .no_binary_name(true)
                .disable_help_flag(true)
                .disable_version_flag(true),
            names,
        );
        let matches = cmd.try_get_matches_from(args).map_err(|e| PliteError::Parse {
            message: format!("Invalid command-line signals: {}", e.kind()),
            source: Some(Box::new(e)),
        })?;
        Ok(Self::from_matches(&matches, names))
    }

    /// Parses signal flags from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name).
    pub fn from_env_args() -> Result<Self> {
        Self::from_args(std::env::args_os().skip(1))
    }
}

impl SignalReader for CommandLineSignals {
    fn name(&self) -> &str {
        "cli"
    }

    fn priority(&self) -> u8 {
        3
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
