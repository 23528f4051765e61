use std::collections::HashMap;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell};
use color_eyre::eyre::{Result, WrapErr};
use owo_colors::OwoColorize;
use serde::Serialize;
use snippet_lib::{Placeholder, Template};
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "snip",
    version,
    about = "Snippet template inspection and rendering"
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors (plain text output)
    #[arg(long, global = true)]
    plain: bool,

    /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE, -vvvv TRACE with file/line)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Returns the output format based on flags.
    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.plain {
            OutputFormat::Plain
        } else {
            OutputFormat::Pretty
        }
    }
}

/// Where to read the template from.
#[derive(clap::Args, Debug, Clone)]
struct InputArgs {
    /// Template text (reads from stdin if omitted or "-")
    #[arg(value_name = "TEMPLATE", conflicts_with = "file")]
    template: Option<String>,

    /// Read the template from a file
    #[arg(long, short = 'f', value_name = "PATH")]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn load(&self) -> Result<Template> {
        if let Some(path) = &self.file {
            return Template::from_path(path).wrap_err("Failed to load snippet template");
        }

        let text = match self.template.as_deref() {
            Some("-") => Some(read_stdin()?),
            Some(text) => Some(text.to_owned()),
            // nothing piped in and nothing given
            None if std::io::stdin().is_terminal() => None,
            None => Some(read_stdin()?),
        };

        Template::from_optional(text)
            .wrap_err("No template given: pass TEMPLATE, --file PATH, or pipe one on stdin")
    }
}

/// Arguments for the render command
#[derive(clap::Args, Debug, Clone)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Value for a tabstop, as INDEX=TEXT (repeatable)
    #[arg(long = "set", short = 's', value_name = "INDEX=TEXT", value_parser = parse_assignment)]
    set: Vec<(u32, String)>,

    /// Text for placeholders without a --set value
    #[arg(long, value_name = "TEXT", conflicts_with = "keep")]
    default: Option<String>,

    /// Leave placeholders without a --set value as written
    #[arg(long)]
    keep: bool,
}

/// Arguments for the completions command
#[derive(clap::Args, Debug, Clone)]
struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List the template's placeholders in tabstop order
    Placeholders(InputArgs),
    /// Render preview text (labels kept, bare tabstops removed)
    Display(InputArgs),
    /// Render with explicit tabstop values
    Render(RenderArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    /// Colored output (default when TTY)
    Pretty,
    /// Plain text without colors
    Plain,
    /// JSON output
    Json,
}

/// Configuration for output styling.
struct OutputConfig {
    use_colors: bool,
}

impl OutputConfig {
    fn new(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pretty => {
                let no_color = std::env::var("NO_COLOR").is_ok();
                let is_tty = std::io::stdout().is_terminal();
                Self {
                    use_colors: !no_color && is_tty,
                }
            }
            OutputFormat::Plain | OutputFormat::Json => Self { use_colors: false },
        }
    }
}

/// JSON payload for the display and render commands.
#[derive(Debug, Serialize)]
struct RenderOutput<'a> {
    text: &'a str,
    rendered: String,
}

/// Parses an `INDEX=TEXT` tabstop assignment.
fn parse_assignment(raw: &str) -> Result<(u32, String), String> {
    let (index, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TEXT, got `{raw}`"))?;
    let index = index
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid tabstop index `{index}`: {err}"))?;
    Ok((index, text.to_owned()))
}

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): no subscriber
/// - 1 (-v): INFO
/// - 2 (-vv): DEBUG (parse summaries, skipped markers)
/// - 3 (-vvv): TRACE (every substitution)
/// - 4+ (-vvvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    if verbose == 0 {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,snip=info,snippet_lib=info".to_string(),
            2 => "warn,snip=debug,snippet_lib=debug".to_string(),
            _ => "warn,snip=trace,snippet_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output_format = cli.output_format();
    let output_config = OutputConfig::new(output_format);

    match &cli.command {
        Command::Completions(args) => {
            print_completions(args.shell, &mut Cli::command());
        }
        Command::Placeholders(input) => {
            let template = input.load()?;
            info!(
                placeholders = template.placeholder_count(),
                "Listing placeholders"
            );
            match output_format {
                OutputFormat::Json => print_json(&template)?,
                OutputFormat::Pretty | OutputFormat::Plain => {
                    render_placeholders(&template, &output_config)
                }
            }
        }
        Command::Display(input) => {
            let template = input.load()?;
            let rendered = template.render_for_display();
            emit_rendered(&template, rendered, output_format)?;
        }
        Command::Render(args) => {
            let template = args.input.load()?;
            let rendered = render_with_args(&template, args);
            emit_rendered(&template, rendered, output_format)?;
        }
    }

    Ok(())
}

/// Renders using `--set` values, falling back to `--default` or `--keep`.
fn render_with_args(template: &Template, args: &RenderArgs) -> String {
    // later assignments for the same index win
    let values: HashMap<u32, &str> = args
        .set
        .iter()
        .map(|(index, text)| (*index, text.as_str()))
        .collect();
    debug!(assignments = values.len(), keep = args.keep, "Rendering template");

    template.render(|owner, placeholder| {
        if let Some(value) = values.get(&placeholder.index) {
            return Some((*value).to_owned());
        }
        if args.keep {
            return owner.marker_text(placeholder).map(str::to_owned);
        }
        args.default.clone()
    })
}

fn emit_rendered(template: &Template, rendered: String, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&RenderOutput {
            text: template.text(),
            rendered,
        }),
        OutputFormat::Pretty | OutputFormat::Plain => {
            if rendered.ends_with('\n') {
                print!("{rendered}");
            } else {
                println!("{rendered}");
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn render_placeholders(template: &Template, config: &OutputConfig) {
    if !template.has_placeholders() {
        println!("No placeholders");
        return;
    }

    let marker_width = template
        .placeholders()
        .iter()
        .filter_map(|placeholder| template.marker_text(placeholder))
        .map(|marker| marker.chars().count())
        .max()
        .unwrap_or(0);

    for placeholder in template.placeholders() {
        render_placeholder(template, placeholder, marker_width, config);
    }
}

fn render_placeholder(
    template: &Template,
    placeholder: &Placeholder,
    marker_width: usize,
    config: &OutputConfig,
) {
    let index = format!("{:>4}", format!("${}", placeholder.index));
    let marker = format!(
        "{:<marker_width$}",
        template.marker_text(placeholder).unwrap_or_default()
    );
    let span = placeholder.span.to_string();
    let name = placeholder.name().unwrap_or("");

    if config.use_colors {
        println!(
            "{}  {}  {}  {}",
            index.cyan().bold(),
            marker.green(),
            span.dimmed(),
            name.magenta()
        );
    } else {
        println!("{index}  {marker}  {span}  {name}");
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .wrap_err("Failed to read template from stdin")?;
    Ok(buffer)
}

/// Prints shell completions to stdout.
fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    clap_complete::generate(generator, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
}
