//! polysign: send pages to an LED message sign from the command line

mod logging;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use polysign_core::protocol::{
    list_ports, LineGuard, PageLine, PageOptions, PageRequest, PageScript, SerialChannel, Sign,
    SignConfig, Transition,
};

use crate::logging::{init_logging, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "polysign", version, about = "Send pages to a PolyComp LED sign")]
struct Cli {
    #[command(flatten)]
    sign: SignArgs,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

/// Settings of the sign being driven
#[derive(Args, Debug)]
struct SignArgs {
    /// Serial port the sign is attached to.
    #[arg(long, env = "POLYSIGN_PORT", default_value = "/dev/ttyS0", global = true)]
    port: String,

    /// Baud rate [default: 1200].
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Visible characters per line [default: 16].
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Number of display lines [default: 2].
    #[arg(long, global = true)]
    lines: Option<u8>,

    /// Sign address, 0 for broadcast [default: 0].
    #[arg(long, global = true)]
    address: Option<u8>,

    /// Joined lines longer than this scroll [default: width / 2].
    #[arg(long, global = true)]
    joined_width: Option<usize>,
}

impl SignArgs {
    /// Apply explicit flags on top of `base`
    fn config(&self, mut base: SignConfig) -> SignConfig {
        if let Some(baud) = self.baud {
            base.baud_rate = baud;
        }
        if let Some(width) = self.width {
            base.width = width;
        }
        if let Some(lines) = self.lines {
            base.lines = lines;
        }
        if let Some(address) = self.address {
            base.address = address;
        }
        if self.joined_width.is_some() {
            base.joined_width = self.joined_width;
        }
        base
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List serial ports.
    Ports,
    /// Set the sign's clock to the local time.
    Clock,
    /// Send a single page.
    Page(PageArgs),
    /// Send the pages of a JSON page script.
    Script {
        /// Script file.
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    /// First line; `@time` or `@temp` shows live data.
    line1: String,

    /// Optional second line.
    line2: Option<String>,

    /// Center the first line.
    #[arg(long)]
    center: bool,

    /// Inverse video.
    #[arg(long)]
    invert: bool,

    /// Mark as the last page so the sign shows it right away.
    #[arg(long)]
    last: bool,

    /// Join the text into one continuous line.
    #[arg(long, conflicts_with = "no_join")]
    join: bool,

    /// Never join, even with a single line.
    #[arg(long)]
    no_join: bool,

    /// Transition effect, e.g. `wipe`, `ping-pong`, `slide`.
    #[arg(long, default_value = "auto")]
    transition: Transition,

    /// Display time in seconds (0-15).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=15))]
    duration: u8,
}

impl PageArgs {
    fn request(&self) -> PageRequest {
        let join = match (self.join, self.no_join) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        PageRequest {
            line1: parse_line(&self.line1),
            line2: self.line2.as_deref().map(parse_line),
            options: PageOptions {
                join,
                center: self.center,
                invert: self.invert,
                last: self.last,
                transition: self.transition,
                duration: self.duration,
            },
        }
    }
}

fn parse_line(text: &str) -> PageLine {
    match text {
        "@time" => PageLine::Time,
        "@temp" | "@temperature" => PageLine::Temperature,
        _ => PageLine::Text(text.to_string()),
    }
}

fn load_script(path: &Path) -> Result<PageScript> {
    let script = PageScript::load(path)
        .with_context(|| format!("failed to load page script {}", path.display()))?;
    if script.pages.is_empty() {
        bail!("page script {} has no pages", path.display());
    }
    Ok(script)
}

fn open(args: &SignArgs, config: SignConfig) -> Result<Sign<LineGuard<SerialChannel>>> {
    Sign::open(&args.port, config).with_context(|| format!("failed to open sign on {}", args.port))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ports => {
            for port in list_ports() {
                match port.product {
                    Some(product) => println!("{}\t{}", port.name, product),
                    None => println!("{}", port.name),
                }
            }
        }
        Command::Clock => {
            // Opening a session sets the clock
            open(&cli.sign, cli.sign.config(SignConfig::default()))?;
        }
        Command::Page(page) => {
            let mut sign = open(&cli.sign, cli.sign.config(SignConfig::default()))?;
            sign.page(&page.request()).context("sign rejected the page")?;
        }
        Command::Script { file } => {
            let script = load_script(&file)?;
            let config = cli.sign.config(script.sign.clone().unwrap_or_default());
            let mut sign = open(&cli.sign, config)?;
            let sent = script.run(&mut sign).context("page script failed")?;
            tracing::info!(pages = sent, "page script sent");
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_page_subcommand() {
        let cli = Cli::try_parse_from([
            "polysign",
            "--width",
            "20",
            "page",
            "HELLO",
            "WORLD",
            "--center",
            "--transition",
            "ping-pong",
            "--duration",
            "4",
        ])
        .expect("page args should parse");

        let Command::Page(page) = &cli.command else {
            panic!("expected page subcommand");
        };
        let request = page.request();
        assert_eq!(request.line1, PageLine::from("HELLO"));
        assert_eq!(request.line2, Some(PageLine::from("WORLD")));
        assert!(request.options.center);
        assert_eq!(request.options.transition, Transition::PingPong);
        assert_eq!(request.options.duration, 4);
        assert_eq!(request.options.join, None);
        assert_eq!(cli.sign.config(SignConfig::default()).width, 20);
    }

    #[test]
    fn parses_special_tokens() {
        assert_eq!(parse_line("@time"), PageLine::Time);
        assert_eq!(parse_line("@temp"), PageLine::Temperature);
        assert_eq!(parse_line("time"), PageLine::from("time"));
    }

    #[test]
    fn rejects_conflicting_join_flags() {
        let err = Cli::try_parse_from(["polysign", "page", "HI", "--join", "--no-join"])
            .expect_err("conflicting args should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_transition() {
        assert!(Cli::try_parse_from(["polysign", "page", "HI", "--transition", "spin"]).is_err());
    }

    #[test]
    fn rejects_out_of_range_duration() {
        assert!(Cli::try_parse_from(["polysign", "page", "HI", "--duration", "16"]).is_err());
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["polysign", "clock"]).unwrap();
        assert_eq!(cli.sign.config(SignConfig::default()), SignConfig::default());
    }

    #[test]
    fn flags_override_script_config() {
        let cli = Cli::try_parse_from(["polysign", "--address", "9", "ports"]).unwrap();
        let base = SignConfig {
            width: 24,
            address: 1,
            ..Default::default()
        };
        let config = cli.sign.config(base);
        assert_eq!(config.width, 24);
        assert_eq!(config.address, 9);
    }

    #[test]
    fn loads_script_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sign": {{"width": 20}}, "pages": [{{"line1": {{"text": "HI"}}}}]}}"#
        )
        .unwrap();

        let script = load_script(file.path()).unwrap();
        assert_eq!(script.pages.len(), 1);
        assert_eq!(script.sign.map(|s| s.width), Some(20));
    }

    #[test]
    fn rejects_empty_script() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pages": []}}"#).unwrap();
        assert!(load_script(file.path()).is_err());
    }
}
