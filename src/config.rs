use crate::cli::{Args, ColorChoice};
use crate::lexer::LexOptions;

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub strict_keywords: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            strict_keywords: args.strict_keywords,
        }
    }

    pub fn lex_options(&self) -> LexOptions {
        LexOptions {
            strict_keywords: self.strict_keywords,
        }
    }
}
