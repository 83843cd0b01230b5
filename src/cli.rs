use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the flow scripting language", long_about = None)]
pub struct Args {
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    pub color: ColorChoice,

    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Only match keywords that are not followed by an identifier character
    #[arg(long = "strict-keywords", global = true)]
    pub strict_keywords: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a script
    Run {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the tokens of a script, one per line
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the parsed program back as source
    Ast {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Generate shell completions
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}
