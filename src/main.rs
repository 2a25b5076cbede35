use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tql_lang::cli::{self, CliError, FilterOptions};

#[derive(ClapParser)]
#[command(name = "tql")]
#[command(about = "TQL - an embedded query language for filtering JSON documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a TQL query and report the fields it references
    Check {
        /// The TQL query to validate
        query: String,
    },

    /// Filter a JSON document with a TQL query
    Filter {
        /// The TQL query to filter with
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { query } => run_check(query),
        Commands::Filter {
            query,
            input,
            pretty,
        } => run_filter(query, input, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(query: String) -> Result<(), CliError> {
    let expr = tql_lang::parser::parse(&query)?;
    println!("Syntax is valid");
    let fields = tql_lang::analyze::field_paths(&expr);
    if !fields.is_empty() {
        println!("Fields: {}", fields.join(", "));
    }
    Ok(())
}

fn run_filter(query: String, input: Option<String>, pretty: bool) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = FilterOptions { query, input };
    let output = cli::execute_filter(&options)?;

    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .map_err(CliError::Json)?;
    println!("{}", json);
    Ok(())
}
