//! Command-line mode selection
//!
//! Long selectors take one or two dashes; short ones take one.

/// What the process was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Server,
    Client,
    Help,
}

impl Mode {
    /// Parse the arguments after the program name
    ///
    /// Returns `None` unless there is exactly one recognized selector.
    pub fn parse<I>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let selector = args.next()?;
        if args.next().is_some() {
            return None;
        }

        match selector.as_str() {
            "-server" | "--server" | "-s" => Some(Mode::Server),
            "-client" | "--client" | "-c" => Some(Mode::Client),
            "-help" | "--help" | "-h" => Some(Mode::Help),
            _ => None,
        }
    }
}

/// Usage line printed for help and for bad invocations
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {} [-server || -client] (Launches Netchat in server or client mode, respectively)",
        program
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Mode> {
        Mode::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_all_spellings() {
        for arg in ["-server", "--server", "-s"] {
            assert_eq!(parse(&[arg]), Some(Mode::Server));
        }
        for arg in ["-client", "--client", "-c"] {
            assert_eq!(parse(&[arg]), Some(Mode::Client));
        }
        for arg in ["-help", "--help", "-h"] {
            assert_eq!(parse(&[arg]), Some(Mode::Help));
        }
    }

    #[test]
    fn test_rejects_missing_unknown_and_extra() {
        assert_eq!(parse(&[]), None);
        assert_eq!(parse(&["--serve"]), None);
        assert_eq!(parse(&["-s", "-c"]), None);
    }

    #[test]
    fn test_usage_names_program() {
        assert!(usage("netchat").starts_with("Usage: netchat [-server || -client]"));
    }
}
