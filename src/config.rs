// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

use crate::derive::Features;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  glyphstorm --duration 0 --fps 60 --cell-width 8 --cell-height 16";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  glyphstorm") {
            out.push_str("  \x1b[1;34mglyphstorm\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        out.push_str(line);
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "glyphstorm", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed text; the same seed replays the same animation (random when omitted)"
    )]
    pub seed: Option<String>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "verbose",
        help_heading = "GENERAL",
        help = "Log engine events to stderr at debug level"
    )]
    pub verbose: bool,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit (TERM=...256color), else 16-color"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "cell-width",
        default_value_t = 8.0,
        help_heading = "APPEARANCE",
        help = "Canvas pixels per terminal column (min 1 max 64)"
    )]
    pub cell_width: f64,

    #[arg(
        long = "cell-height",
        default_value_t = 16.0,
        help_heading = "APPEARANCE",
        help = "Canvas pixels per terminal row (min 1 max 64)"
    )]
    pub cell_height: f64,

    #[arg(
        long = "features",
        help_heading = "HELP",
        help = "Print the feature summary of the seed and exit"
    )]
    pub features: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Label and value columns of a feature summary.
pub fn format_features(seed: &str, features: &Features) -> String {
    let width = features.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let mut out = format!("{:<width$}  {}\n", "Seed", seed, width = width);
    for (label, value) in features.iter() {
        out.push_str(&format!("{:<width$}  {}\n", label, value, width = width));
    }
    out
}

pub fn print_features(seed: &str, features: &Features) {
    let text = format_features(seed, features);
    if color_enabled_stdout() {
        println!("\x1b[1;36mFEATURES:\x1b[0m");
    } else {
        println!("FEATURES:");
    }
    print!("{}", text);
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  glyphstorm [OPTIONS]\n\nGENERAL:\n  --seed <text>\n      Seed for the run; every pattern, color and motion follows from it.\n      Example: glyphstorm --seed ooTestSeed\n\n  -s, --screensaver\n      Screensaver mode (exit on keypress).\n      Example: glyphstorm -s\n\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: glyphstorm --duration 10\n\n  --verbose\n      Log engine events to stderr.\n      Example: glyphstorm --verbose 2>glyphstorm.log\n\nAPPEARANCE:\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: glyphstorm --colormode 24\n\n  --cell-width <pixels>\n      Canvas pixels per terminal column (min 1 max 64).\n      Example: glyphstorm --cell-width 10\n\n  --cell-height <pixels>\n      Canvas pixels per terminal row (min 1 max 64).\n      Example: glyphstorm --cell-height 20\n\nPERFORMANCE:\n  -f, --fps <number>\n      Target FPS (min 1 max 240).\n      Example: glyphstorm --fps 30\n\nHELP:\n  --features\n      Print the feature summary of the seed and exit.\n      Example: glyphstorm --seed ooTestSeed --features\n\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n\nKEYS:\n  q, Esc      quit\n  p           pause and resume\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }

    let tail = "\nLIMITS / VALID RANGES:\n";
    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(tail));
    } else {
        print!("{}", tail);
    }
    println!("  --duration <seconds>     min 0.1 max 86400 (<=0 disables)");
    println!("  --fps <number>           min 1 max 240");
    println!("  --cell-width <pixels>    min 1 max 64");
    println!("  --cell-height <pixels>   min 1 max 64");
    println!("  --colormode <0|16|8|24>  allowed values only (8==256, 24==32)");
}
