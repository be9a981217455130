use clap::{Parser as ClapParser, Subcommand};
use pathwise::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "pathwise")]
#[command(about = "pathwise - compile and run JSONPath expressions against JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a path and run it against JSON input
    Check {
        /// The JSONPath to run
        path: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print object and array results
        #[arg(short, long)]
        pretty: bool,

        /// Only compile the path, don't run it
        #[arg(long)]
        syntax_only: bool,
    },

    /// Show how a path compiles, segment by segment
    Explain {
        /// The JSONPath to compile
        path: String,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'pathwise docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            path,
            input,
            pretty,
            syntax_only,
        } => run_check(path, input, pretty, syntax_only),
        Commands::Explain { path } => cli::explain(&path).map(|text| print!("{}", text)),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => {
            cli::get_doc_category(&category).map(|content| print!("{}", content))
        }
    };

    if let Err(e) = result {
        log::debug!("command failed: {:?}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    path: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        path,
        input,
        pretty,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(Some(output)) => println!("{}", output),
        CheckResult::Success(None) => {}
    }
    Ok(())
}
