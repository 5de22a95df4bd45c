use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use qlisp::interpreter::{self, json, Value};

#[derive(Parser, Debug)]
#[command(name = "qlisp", version, about = "Evaluate S-expressions and Q-expressions")]
struct Cli {
    /// Evaluate one expression, print the result and exit
    #[arg(short, long, conflicts_with = "file")]
    expr: Option<String>,

    /// Evaluate every non-empty line of FILE
    file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log filter, used when RUST_LOG is not set
    #[arg(long, env = "QLISP_LOG", default_value = "warn")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "QLISP_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // keeps the non-blocking file writer flushing until exit
    let _guard = match init_tracing(&cli.log_level, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("{:?}", cli);

    let result = match (&cli.expr, &cli.file) {
        (Some(expr), _) => {
            println!("{}", execute_line(expr, cli.json));
            Ok(())
        }
        (None, Some(path)) => run_file(path, cli.json, &mut io::stdout().lock()),
        (None, None) => repl(cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| format!("Invalid log filter {:?}: {}", level, e))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_timer(ChronoLocal::rfc_3339());

    match log_file {
        None => {
            builder.with_writer(io::stderr).init();
            Ok(None)
        }
        Some(path) => {
            let file_name = path.file_name().ok_or_else(|| format!("Not a file path: {}", path.display()))?;
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
    }
}

fn execute_line(line: &str, as_json: bool) -> String {
    match interpreter::execute(line) {
        Ok(value) => render(&value, as_json),
        Err(e) => {
            debug!("{:?} / {}", line, e);
            e.to_string()
        }
    }
}

fn render(value: &Value, as_json: bool) -> String {
    if !as_json {
        return value.to_string();
    }
    json::serialize_value(value).unwrap_or_else(|e| format!("Error: {}", e))
}

fn run_file(path: &Path, as_json: bool, out: &mut impl Write) -> io::Result<()> {
    let src = fs::read_to_string(path)?;
    info!("running {}", path.display());
    run_lines(&src, as_json, out)
}

/// Each line is parsed and evaluated on its own; a bad line only costs its own output.
fn run_lines(src: &str, as_json: bool, out: &mut impl Write) -> io::Result<()> {
    for line in src.lines().map(str::trim).filter(|line| !line.is_empty()) {
        writeln!(out, "{}", execute_line(line, as_json))?;
    }
    Ok(())
}

fn repl(as_json: bool) -> io::Result<()> {
    println!("qlisp {}", env!("CARGO_PKG_VERSION"));
    println!("Press Ctrl+C or Ctrl+D to exit\n");

    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::new(DefaultPromptSegment::Basic("qlisp".to_string()), DefaultPromptSegment::Empty);

    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                println!("{}", execute_line(&line, as_json));
            }
            signal => {
                info!("leaving on {:?}", signal);
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test_cli {
    use super::*;

    fn run(src: &str, as_json: bool) -> String {
        let mut out = Vec::new();
        run_lines(src, as_json, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_execute_line() {
        assert_eq!(execute_line("+ 1 2", false), "3");
        assert_eq!(execute_line("list 1 (+ 1 1)", false), "{1 2}");
        assert_eq!(execute_line("(+ 1", false), "ReadError at 4: Unexpected end of input");
    }

    #[test]
    fn test_read_error_does_not_stop_later_lines() {
        let src = "+ 1 2\n(+ 1\n\n   \nfoo\n  * 2 3  \n/ 1 0\n";
        let expected = [
            "3",
            "ReadError at 4: Unexpected end of input",
            "ReadError at 0: Unknown symbol `foo`",
            "6",
            "Error: Division by zero.",
        ];
        assert_eq!(run(src, false), expected.join("\n") + "\n");
    }

    #[test]
    fn test_json_output() {
        assert_eq!(execute_line("- 10 3", true), r#"{"type":"Number","value":7}"#);
        assert_eq!(
            run("/ 1 0\n{1}", true),
            concat!(
                r#"{"type":"Error","value":{"kind":"DivisionByZero","message":"Division by zero."}}"#,
                "\n",
                r#"{"type":"Qexpr","value":[{"type":"Number","value":1}]}"#,
                "\n",
            )
        );
        // read errors are not values and print the same either way
        assert_eq!(execute_line("}", true), execute_line("}", false));
    }

    #[test]
    fn test_run_file() {
        let path = std::env::temp_dir().join(format!("qlisp-run-file-{}.ql", std::process::id()));
        fs::write(&path, "conj {1} {2}\n(\neval {- 5}\n").unwrap();
        let mut out = Vec::new();
        let result = run_file(&path, false, &mut out);
        fs::remove_file(&path).unwrap();
        result.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{1 2}\nReadError at 1: Unexpected end of input\n-5\n");

        assert!(run_file(Path::new("/nonexistent/qlisp.ql"), false, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from(["qlisp", "--json", "-e", "+ 1 2"]).unwrap();
        assert_eq!(cli.expr.as_deref(), Some("+ 1 2"));
        assert!(cli.json);
        assert!(Cli::try_parse_from(["qlisp", "-e", "1", "script.ql"]).is_err());
    }
}
