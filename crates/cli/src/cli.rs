use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "adplan",
    about = "Forecast campaign delivery from historical fill-rate and inventory tables",
    version
)]
pub struct Cli {
    /// Request file (JSON). Reads stdin when omitted or `-`.
    #[arg(value_name = "REQUEST", conflicts_with = "summary")]
    pub request: Option<PathBuf>,

    /// Print the index load report and targeting options instead of forecasting.
    #[arg(long)]
    pub summary: bool,

    /// Directory holding `fill_rates.json` and `inventory.json`.
    #[arg(long = "data-dir", env = "ADPLAN_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,
}

impl Cli {
    /// Request path, or `None` for stdin.
    pub fn request_path(&self) -> Option<&PathBuf> {
        self.request.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn request_path_and_data_dir_are_parsed() {
        let cli = Cli::try_parse_from(["adplan", "--data-dir", "/srv/tables", "req.json"]).unwrap();
        assert_eq!(cli.request_path(), Some(&PathBuf::from("req.json")));
        assert_eq!(cli.data_dir, PathBuf::from("/srv/tables"));
        assert!(!cli.summary);
    }

    #[test]
    fn dash_and_missing_request_read_stdin() {
        let dash = Cli::try_parse_from(["adplan", "-"]).unwrap();
        assert_eq!(dash.request_path(), None);

        let bare = Cli::try_parse_from(["adplan"]).unwrap();
        assert_eq!(bare.request_path(), None);
    }

    #[test]
    fn summary_flag_is_recognized() {
        let cli = Cli::try_parse_from(["adplan", "--summary"]).unwrap();
        assert!(cli.summary);
    }

    #[test]
    fn misspelled_flag_is_a_usage_error() {
        let err = Cli::try_parse_from(["adplan", "--sumary"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn summary_and_request_are_exclusive() {
        let err = Cli::try_parse_from(["adplan", "--summary", "req.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
