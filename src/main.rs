use clap::Parser;
use flowlang::cli::{generate_completions, Args, Commands};
use flowlang::config::AppConfig;
use flowlang::diagnostic::DiagnosticRenderer;
use flowlang::interpreter::{self, FlowError, Interpreter};
use flowlang::lexer::tokenize_with;
use owo_colors::OwoColorize;
use std::path::Path;
use std::process;

fn main() {
    let args = Args::parse();
    let config = AppConfig::from_args(&args);

    let file = match &args.command {
        Commands::Complete { shell } => {
            generate_completions(*shell);
            return;
        }
        Commands::Run { file } | Commands::Tokens { file } | Commands::Ast { file } => file,
    };

    let source = match read_file(file) {
        Ok(s) => s,
        Err(e) => {
            error_message(&config, &e);
            process::exit(1);
        }
    };
    verbose_log(&config, &format!("Read {} bytes from {}", source.len(), file.display()));

    let result = match &args.command {
        Commands::Tokens { .. } => print_tokens(&source, &config),
        Commands::Ast { .. } => print_ast(&source, &config),
        _ => run_script(&source, &config),
    };

    if let Err(e) = result {
        let file_name = file.display().to_string();
        let renderer = DiagnosticRenderer::new(&source, &file_name, config.color_enabled);
        eprint!("{}", renderer.render(&e.to_diagnostic()));
        process::exit(1);
    }
}

fn run_script(source: &str, config: &AppConfig) -> Result<(), FlowError> {
    let tokens = tokenize_with(source, config.lex_options())?;
    verbose_log(config, &format!("Lexed {} tokens", tokens.len()));

    let program = interpreter::parse(tokens)?;
    verbose_log(config, &format!("Parsed {} statements", program.statements.len()));

    let mut interpreter = Interpreter::new();
    interpreter.execute(&program)?;
    verbose_log(config, "Execution finished");
    Ok(())
}

fn print_tokens(source: &str, config: &AppConfig) -> Result<(), FlowError> {
    let tokens = tokenize_with(source, config.lex_options())?;
    verbose_log(config, &format!("Lexed {} tokens", tokens.len()));
    for token in &tokens {
        println!("{}..{}\t{}", token.span.start, token.span.end, token);
    }
    Ok(())
}

fn print_ast(source: &str, config: &AppConfig) -> Result<(), FlowError> {
    let tokens = tokenize_with(source, config.lex_options())?;
    verbose_log(config, &format!("Lexed {} tokens", tokens.len()));
    let program = interpreter::parse(tokens)?;
    verbose_log(config, &format!("Parsed {} statements", program.statements.len()));
    print!("{}", program);
    Ok(())
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[flow:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
