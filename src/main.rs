mod debug_report;

use flatmetric::{DEFAULT_SEPARATOR, Engine, Options, decompose_verbose_with};
use std::io::{self, IsTerminal, Read};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    init_logging();

    let command = parse_args(std::env::args().skip(1), io::stdout().is_terminal(), read_stdin_lines);
    let code = match command {
        Ok(Command::Help) => {
            println!("{}", help_text());
            0
        }
        Ok(Command::Version) => {
            println!("flatmetric {}", env!("CARGO_PKG_VERSION"));
            0
        }
        Ok(Command::Run(config)) => run(&config),
        Err(err) => {
            eprintln!("{err}");
            EXIT_USAGE
        }
    };

    std::process::exit(code);
}

fn init_logging() {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "warn");
    env_logger::Builder::from_env(env).format_timestamp(None).format_module_path(false).init();
}

#[derive(Debug)]
enum Command {
    Run(CliConfig),
    Help,
    Version,
}

#[derive(Debug)]
struct CliConfig {
    options: Options,
    lines: Vec<String>,
    color: bool,
}

/// Decompose every configured line; returns the process exit code.
fn run(config: &CliConfig) -> i32 {
    let engine = match Engine::new(&config.options) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: invalid template configuration: {err}");
            return EXIT_FAILURE;
        }
    };

    debug_report::print_templates(&engine, config.color);

    let mut failed = false;
    for line in &config.lines {
        let res = decompose_verbose_with(line, &engine);
        failed |= matches!(res.outcome, Some(Err(_)));
        debug_report::print_line(&res, config.color);
    }

    if failed { EXIT_FAILURE } else { 0 }
}

fn parse_args<I, F>(args: I, color: bool, read_stdin: F) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
    F: FnOnce() -> Result<Vec<String>, String>,
{
    let mut options = Options::default();
    let mut lines: Vec<String> = Vec::new();
    let mut color = color;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-default" => options.default_template = None,
            "--template" | "-t" => {
                let value = args.next().ok_or_else(|| "error: --template expects a value".to_string())?;
                options.templates.push(value);
            }
            "--separator" => {
                options.separator = args.next().ok_or_else(|| "error: --separator expects a value".to_string())?;
            }
            "--joiner" => {
                options.joiner = Some(args.next().ok_or_else(|| "error: --joiner expects a value".to_string())?);
            }
            "--" => {
                lines.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--template=") => {
                options.templates.push(arg.trim_start_matches("--template=").to_string());
            }
            _ if arg.starts_with("--separator=") => {
                options.separator = arg.trim_start_matches("--separator=").to_string();
            }
            _ if arg.starts_with("--joiner=") => {
                options.joiner = Some(arg.trim_start_matches("--joiner=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => lines.push(arg),
        }
    }

    if lines.is_empty() {
        lines = read_stdin()?;
    }

    lines.retain(|l| !l.trim().is_empty());
    if lines.is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(Command::Run(CliConfig { options, lines, color }))
}

fn read_stdin_lines() -> Result<Vec<String>, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.lines().map(|l| l.trim().to_string()).collect())
}

fn help_text() -> String {
    format!(
        "flatmetric {version}

Decompose flat metric names into measurement, tags and field.

Usage:
  flatmetric [OPTIONS] [--] <line...>
  printf 'cpu.server01.idle\\n' | flatmetric [OPTIONS]

Options:
  -t, --template <line>      Template line '[filter] pattern [key=value,...]'.
                             May be repeated.
  --separator <sep>          Segment separator. Default: {separator}
  --joiner <sep>             Joiner for multi-segment captures.
                             Default: the separator.
  --no-default               Leave lines no template matches unparsed instead
                             of using '{default_template}'.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Logging is controlled with RUST_LOG (default: warn).

Exit codes:
  0  Success.
  1  Invalid templates, or a line failed to decompose.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        separator = DEFAULT_SEPARATOR,
        default_template = flatmetric::DEFAULT_TEMPLATE,
    )
}
