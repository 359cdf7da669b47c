use std::path::PathBuf;

use hn_pager::RunOptions;

const HELP: &str = "hn-pager - Page through Hacker News from the terminal.

  --version, -V        Show version and exit
  --help,    -h        Show this help message
  --debug              Browse built-in sample stories instead of the live site
  --config PATH        Read configuration from PATH";

fn main() {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(message) => {
            eprintln!("error: {message}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    if let Err(err) = hn_pager::run(options) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

/// `Ok(None)` means an informational flag was handled and the program should exit.
fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<RunOptions>, String> {
    let mut options = RunOptions::default();
    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("hn-pager {}", hn_pager::VERSION);
                return Ok(None);
            }
            "--help" | "-h" => {
                println!("{HELP}");
                return Ok(None);
            }
            "--debug" => options.debug = true,
            "--config" => match args.next() {
                Some(path) => options.config_file = Some(PathBuf::from(path)),
                None => return Err("--config needs a path".to_string()),
            },
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(Some(options))
}
