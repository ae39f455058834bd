//! mdtree CLI - Markdown and editor document tree conversion tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdtree::render::{to_markdown_with_stats, DiagramVisitor, HtmlRenderer};
use mdtree::{
    apply_incrementally, detect_features, parse_with_options, serialize, CoordinatorOptions,
    Document, JsonFormat, MemorySurface, ParseOptions, RenderOptions,
};

#[derive(Parser)]
#[command(name = "mdtree")]
#[command(author = "mdtree contributors")]
#[command(version)]
#[command(about = "Convert between Markdown and editor document trees", long_about = None)]
struct Cli {
    /// Prefix for relative image paths
    #[arg(long, global = true, env = "MDTREE_IMAGE_PREFIX", value_name = "PREFIX")]
    image_prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse Markdown into a JSON document tree
    Parse {
        /// Input Markdown file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render a JSON document tree
    Render {
        /// Input JSON file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Leave `mermaid` code blocks as diagram containers in HTML
        #[arg(long)]
        diagrams: bool,
    },

    /// Parse Markdown and serialize it back
    #[command(alias = "fmt")]
    Roundtrip {
        /// Input Markdown file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Only report whether the file is already in canonical form
        #[arg(long)]
        check: bool,
    },

    /// List the Markdown constructs found in a file
    Detect {
        /// Input file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Show document statistics
    Info {
        /// Input Markdown file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Convert a large file chunk by chunk with a progress bar
    Apply {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Minimum lines per chunk
        #[arg(long, default_value = "200")]
        chunk_lines: usize,

        /// Inputs larger than this many bytes stay literal text
        #[arg(long, default_value = "200000")]
        threshold: usize,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown
    Markdown,
    /// Static HTML
    Html,
    /// Plain text
    Text,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let mut parse_options = ParseOptions::new();
    if let Some(prefix) = cli.image_prefix {
        parse_options = parse_options.with_image_prefix(prefix);
    }

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            compact,
        } => cmd_parse(input.as_deref(), output.as_deref(), compact, parse_options),
        Commands::Render {
            input,
            output,
            format,
            diagrams,
        } => cmd_render(input.as_deref(), output.as_deref(), format, diagrams),
        Commands::Roundtrip { input, check } => cmd_roundtrip(input.as_deref(), check, parse_options),
        Commands::Detect { input } => cmd_detect(input.as_deref()),
        Commands::Info { input } => cmd_info(input.as_deref(), parse_options),
        Commands::Apply {
            input,
            output,
            chunk_lines,
            threshold,
        } => {
            let options = CoordinatorOptions::new()
                .with_chunk_lines(chunk_lines)
                .with_large_input_threshold(threshold)
                .with_parse_options(parse_options);
            cmd_apply(&input, output.as_deref(), options)
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match input {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_parse(
    input: Option<&Path>,
    output: Option<&Path>,
    compact: bool,
    options: ParseOptions,
) -> CliResult {
    let markdown = read_input(input)?;
    let doc = parse_with_options(&markdown, options);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = mdtree::render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_render(
    input: Option<&Path>,
    output: Option<&Path>,
    format: OutputFormat,
    diagrams: bool,
) -> CliResult {
    let json = read_input(input)?;
    let doc = mdtree::render::from_json(&json)?;
    let options = RenderOptions::default();

    let content = match format {
        OutputFormat::Markdown => mdtree::render::to_markdown(&doc, &options),
        OutputFormat::Text => mdtree::render::to_text(&doc),
        OutputFormat::Html if diagrams => HtmlRenderer::new(options)
            .with_visitor(DiagramVisitor::new("mermaid", |source: &str| {
                Some(format!("<pre class=\"mermaid\">{}</pre>", source))
            }))
            .render(&doc),
        OutputFormat::Html => mdtree::render::to_html(&doc, &options),
    };
    write_output(output, &content)
}

fn cmd_roundtrip(input: Option<&Path>, check: bool, options: ParseOptions) -> CliResult {
    let markdown = read_input(input)?;
    let canonical = serialize(&parse_with_options(&markdown, options));

    if !check {
        println!("{}", canonical);
        return Ok(());
    }

    if canonical == markdown.trim_end_matches('\n') {
        println!("{}", "Already canonical".green());
        Ok(())
    } else {
        Err("input is not in canonical form".into())
    }
}

fn cmd_detect(input: Option<&Path>) -> CliResult {
    let text = read_input(input)?;
    let features = detect_features(&text);

    if features.is_empty() {
        println!("{}", "No Markdown detected".yellow());
        return Ok(());
    }

    println!("{}", "Detected Markdown".cyan().bold());
    for feature in features {
        println!("  {} {}", "•".dimmed(), feature);
    }
    Ok(())
}

fn cmd_info(input: Option<&Path>, options: ParseOptions) -> CliResult {
    let markdown = read_input(input)?;
    let doc = parse_with_options(&markdown, options);
    let stats = to_markdown_with_stats(&doc, &RenderOptions::default()).stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if let Some(path) = input {
        println!("{}: {}", "File".bold(), path.display());
    }
    println!("{}: {}", "Bytes".bold(), markdown.len());
    println!("{}: {}", "Blocks".bold(), doc.block_count());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Lists".bold(), stats.list_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_block_count);
    println!("{}: {}", "Links".bold(), stats.link_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_apply(input: &Path, output: Option<&Path>, options: CoordinatorOptions) -> CliResult {
    let markdown = fs::read_to_string(input)?;
    let surface = MemorySurface::new();

    let pb = ProgressBar::new(markdown.split('\n').count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} lines")?
            .progress_chars("#>-"),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(apply_incrementally(&markdown, &surface, &options, |progress| {
        pb.set_position(progress.processed as u64);
    }))?;
    pb.finish_and_clear();

    let doc: Document = surface.document();
    log::info!("Applied {} blocks from {}", doc.block_count(), input.display());

    let json = mdtree::render::to_json(&doc, JsonFormat::Pretty)?;
    write_output(output, &json)
}

fn cmd_version() {
    println!("{} {}", "mdtree".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown and editor document tree converter");
    println!();
    println!("License: MIT");
}
