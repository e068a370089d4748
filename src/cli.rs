/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub input: std::path::PathBuf,
    pub output: std::path::PathBuf,
    pub cache: Option<std::path::PathBuf>,
    pub threads: Option<usize>,
    pub check: bool,
    pub preview: usize,
}

impl Args {
    /// Parses command-line arguments using `clap`.
    ///
    /// # Returns
    /// * `Args` - Struct containing parsed arguments.
    ///
    /// # Errors
    /// * Exits with a usage message if arguments are missing or invalid.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Args {
            input: matches.get_one::<std::path::PathBuf>("input").cloned().unwrap_or_default(),
            output: matches.get_one::<std::path::PathBuf>("output").cloned().unwrap_or_default(),
            cache: matches.get_one::<std::path::PathBuf>("cache").cloned(),
            threads: matches.get_one::<usize>("threads").cloned(),
            check: matches.get_flag("check"),
            preview: matches.get_one::<usize>("preview").cloned().unwrap_or(5),
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("price-series")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Clean daily price series and derive statistics and weekly aggregates")
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("CSV file or directory of CSV files with daily prices")
                .required(true)
                .num_args(1)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Directory for generated CSV files")
                .required(true)
                .num_args(1)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("cache")
                .long("cache")
                .help("Keep a local copy of each input here and read from it on later runs")
                .num_args(1)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of threads to use (default: all available)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("check")
                .short('c')
                .long("check")
                .help("After writing, read each output file back and verify it")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("preview")
                .short('p')
                .long("preview")
                .help("Rows to print in each preview, 0 to disable")
                .num_args(1)
                .default_value("5")
                .value_parser(clap::value_parser!(usize)),
        )
}

/// Validates that the number of threads is a positive integer.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> Result<Args, clap::Error> {
        command()
            .try_get_matches_from(args)
            .map(|m| Args::from_matches(&m))
    }

    #[test]
    fn parses_defaults() {
        let args = parse_from(&["price-series", "-i", "data/aapl.csv", "-o", "out"]).unwrap();
        assert_eq!(args.input, std::path::PathBuf::from("data/aapl.csv"));
        assert_eq!(args.cache, None);
        assert_eq!(args.threads, None);
        assert!(!args.check);
        assert_eq!(args.preview, 5);
    }

    #[test]
    fn rejects_zero_threads() {
        assert!(parse_from(&["price-series", "-i", "a", "-o", "b", "-t", "0"]).is_err());
    }

    #[test]
    fn parses_all_flags() {
        let args = parse_from(&[
            "price-series", "-i", "a", "-o", "b", "--cache", "data", "-t", "2", "-c", "-p", "0",
        ])
        .unwrap();
        assert_eq!(args.cache, Some(std::path::PathBuf::from("data")));
        assert_eq!(args.threads, Some(2));
        assert!(args.check);
        assert_eq!(args.preview, 0);
    }
}
