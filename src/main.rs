use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use wxrkit::Result;

#[derive(Parser)]
#[command(name = "wxrkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate, repair and combine WXR quiz exports", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Repair UTF-8 corruption in serialized payloads and rewrite length prefixes
    Fix {
        /// Input XML file
        input: PathBuf,

        /// Output file (default: <input>-fixed.xml)
        output: Option<PathBuf>,
    },

    /// Validate a quiz export (CDATA formatting, payloads, required fields, post type)
    Validate {
        /// XML file to validate
        file: PathBuf,

        /// Fix issues and save to <file>-fixed.xml
        #[arg(long)]
        fix: bool,
    },

    /// Run the comprehensive eight-check validation
    Check {
        /// XML file to validate
        file: PathBuf,
    },

    /// Combine the four section files into one complete test
    Combine {
        /// Directory containing the section files (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Generate a sample exercise with closed and open questions
    Generate {
        /// Output file (default: sample-closed-open-questions-<date>.xml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a payload and print it as JSON
    Inspect {
        /// XML file to inspect
        file: PathBuf,

        /// Meta key to decode (default: _ielts_cm_questions)
        #[arg(long)]
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Fix { input, output } => wxrkit::cli::fix::run(&input, output.as_deref()),

        Commands::Validate { file, fix } => wxrkit::cli::validate::run(&file, fix),

        Commands::Check { file } => wxrkit::cli::check::run(&file),

        Commands::Combine { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            wxrkit::cli::combine::run(&dir)
        }

        Commands::Generate { output } => {
            wxrkit::cli::generate::run(output.as_deref())?;
            Ok(true)
        }

        Commands::Inspect { file, key } => wxrkit::cli::inspect::run(&file, key.as_deref()),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "wxrkit", &mut io::stdout());
            Ok(true)
        }
    }
}
