//! pdfsampler CLI - sample chapters from a library of PDF books

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsampler::render::{to_json, JsonFormat};
use pdfsampler::{
    resource_name, DisplayBox, ExtractOptions, Library, LoadOptions, Session,
    TextExtractionPipeline,
};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfsampler")]
#[command(version)]
#[command(about = "Watermark sample chapters and extract the text of PDF books", long_about = None)]
struct Cli {
    /// Directory holding the book PDFs
    #[arg(
        long,
        global = true,
        env = "PDFSAMPLER_LIBRARY",
        default_value = "books",
        value_name = "DIR"
    )]
    library: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bundled books and whether their PDFs are present
    Books,

    /// Print the readable text of a book
    Text {
        /// Book title or PDF file
        #[arg(value_name = "TITLE|FILE")]
        input: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Footer pattern to strip instead of the publisher footer
        #[arg(long, value_name = "REGEX")]
        footer: Option<String>,

        /// Output the extraction result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write copies of books with "SAMPLE CHAPTER" on every page
    Watermark {
        /// Book titles or PDF files
        #[arg(value_name = "TITLE|FILE", required_unless_present = "all")]
        inputs: Vec<String>,

        /// Watermark every book present in the library
        #[arg(long, conflicts_with = "inputs")]
        all: bool,

        /// Output file for a single book, output directory for several
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Page box the caption is centered in
        #[arg(long = "box", value_enum, default_value = "crop")]
        display_box: BoxKind,
    },

    /// Find text in a book (case-insensitive)
    Search {
        /// Book title or PDF file
        #[arg(value_name = "TITLE|FILE")]
        input: String,

        /// Text to find
        query: String,

        /// List every match instead of the first one
        #[arg(long)]
        all: bool,
    },

    /// Show book information
    Info {
        /// Book title or PDF file
        #[arg(value_name = "TITLE|FILE")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BoxKind {
    /// The full media box
    Media,
    /// The visible crop box (default)
    Crop,
}

impl From<BoxKind> for DisplayBox {
    fn from(kind: BoxKind) -> Self {
        match kind {
            BoxKind::Media => DisplayBox::MediaBox,
            BoxKind::Crop => DisplayBox::CropBox,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let library = Library::new(cli.library);

    let result = match cli.command {
        Commands::Books => cmd_books(&library),
        Commands::Text {
            input,
            output,
            footer,
            json,
        } => cmd_text(library, &input, output.as_deref(), footer.as_deref(), json),
        Commands::Watermark {
            inputs,
            all,
            output,
            display_box,
        } => cmd_watermark(library, inputs, all, output.as_deref(), display_box.into()),
        Commands::Search { input, query, all } => cmd_search(library, &input, &query, all),
        Commands::Info { input, json } => cmd_info(library, &input, json),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Open `input` as a file if it names one, otherwise as a library title.
fn open_book(session: &mut Session, input: &str) -> CliResult {
    let path = Path::new(input);
    if path.is_file() {
        session.load_path(path)?;
        return Ok(());
    }
    if !session.load(input) {
        return Err(format!(
            "no book '{}' in {} (expected {}.pdf)",
            input,
            session.library().root().display(),
            resource_name(input)
        )
        .into());
    }
    Ok(())
}

fn reader(library: Library) -> Session {
    Session::with_options(
        library,
        LoadOptions::new().lenient(),
        TextExtractionPipeline::default(),
    )
}

fn cmd_books(library: &Library) -> CliResult {
    let available = library.available();

    println!(
        "{} {}",
        "Books in".cyan().bold(),
        library.root().display()
    );
    println!("{}", "─".repeat(40).dimmed());

    for title in library.titles() {
        let marker = if available.contains(title) {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} {} {}",
            marker,
            title,
            format!("({}.pdf)", resource_name(title)).dimmed()
        );
    }

    println!();
    println!(
        "{}: {}/{}",
        "Available".bold(),
        available.len(),
        library.titles().len()
    );
    Ok(())
}

fn cmd_text(
    library: Library,
    input: &str,
    output: Option<&Path>,
    footer: Option<&str>,
    json: bool,
) -> CliResult {
    let mut options = ExtractOptions::new();
    if let Some(pattern) = footer {
        options = options.with_footer_pattern(pattern)?;
    }

    let mut session = Session::with_options(
        library,
        LoadOptions::new().lenient(),
        TextExtractionPipeline::new(options),
    );
    open_book(&mut session, input)?;

    let text = session
        .text()
        .ok_or_else(|| format!("no text could be extracted from '{}'", input))?;
    let rendered = if json {
        to_json(text, JsonFormat::Pretty)?
    } else {
        text.as_str().to_string()
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_watermark(
    library: Library,
    inputs: Vec<String>,
    all: bool,
    output: Option<&Path>,
    display_box: DisplayBox,
) -> CliResult {
    let inputs: Vec<String> = if all {
        library.available().into_iter().map(String::from).collect()
    } else {
        inputs
    };
    if inputs.is_empty() {
        println!("{}", "No books to watermark".yellow());
        return Ok(());
    }

    let options = LoadOptions::new()
        .lenient()
        .with_display_box(display_box)
        .with_watermark();
    let mut session = Session::with_options(library, options, TextExtractionPipeline::default());

    // A single book writes to `output` directly; several go into it as a directory.
    let single = inputs.len() == 1 && !all;
    let output_dir = if single {
        None
    } else {
        let dir = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)?;
        Some(dir)
    };

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = Vec::new();
    for input in &inputs {
        pb.set_message(input.clone());
        open_book(&mut session, input)?;

        let file_name = sample_file_name(input);
        let target = match (&output_dir, output) {
            (Some(dir), _) => dir.join(&file_name),
            (None, Some(path)) => path.to_path_buf(),
            (None, None) => PathBuf::from(&file_name),
        };
        session.render_to(&target)?;
        written.push((target, session.page_count()));
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, (path, pages)) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!(
            "  {} {} {}",
            branch.dimmed(),
            path.display(),
            format!("({} pages)", pages).dimmed()
        );
    }

    Ok(())
}

/// `book.pdf` becomes `book-sample.pdf`; a title uses its resource name.
fn sample_file_name(input: &str) -> String {
    let path = Path::new(input);
    let stem = if path.is_file() {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| resource_name(input))
    } else {
        resource_name(input)
    };
    format!("{}-sample.pdf", stem)
}

fn cmd_search(library: Library, input: &str, query: &str, all: bool) -> CliResult {
    let mut session = reader(library);
    open_book(&mut session, input)?;

    let matches = if all {
        session.find_all(query)
    } else {
        session.search(query).into_iter().collect()
    };

    if matches.is_empty() {
        println!("{} '{}'", "No match for".yellow(), query);
        return Ok(());
    }

    let document = session
        .document()
        .ok_or("book closed while searching")?;
    for selection in &matches {
        let text = document
            .page(selection.page)
            .map(|p| p.plain_text())
            .unwrap_or("");
        println!(
            "{} {}: {}",
            "page".dimmed(),
            (selection.page + 1).to_string().bold(),
            context(text, selection.range.clone())
        );
    }

    if all {
        println!();
        println!("{}: {}", "Matches".bold(), matches.len());
    }
    Ok(())
}

/// The line holding a match, with the match highlighted.
fn context(text: &str, range: std::ops::Range<usize>) -> String {
    let start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let end = text[range.end..]
        .find('\n')
        .map_or(text.len(), |i| range.end + i);
    format!(
        "{}{}{}",
        &text[start..range.start],
        text[range.clone()].red().bold(),
        &text[range.end..end]
    )
}

fn cmd_info(library: Library, input: &str, json: bool) -> CliResult {
    let mut session = reader(library);
    open_book(&mut session, input)?;

    let document = session.document().ok_or("book failed to open")?;
    let metadata = &document.metadata;
    let text = session.text();
    let words = text.map_or(0, |t| t.as_str().split_whitespace().count());
    let footers = text.map_or(0, |t| t.footers_removed);

    if json {
        let info = serde_json::json!({
            "title": session.title(),
            "metadata": metadata,
            "pages_with_text": document.text_page_count(),
            "words": words,
            "footers_removed": footers,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Book Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if let Some(title) = session.title() {
        println!("{}: {}", "Book".bold(), title);
    }
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Text Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages with text".bold(), document.text_page_count());
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Footers removed".bold(), footers);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_watermark_all() {
        let cli = Cli::try_parse_from(["pdfsampler", "--library", "/tmp/books", "watermark", "--all"])
            .unwrap();
        assert_eq!(cli.library, PathBuf::from("/tmp/books"));
        assert!(matches!(cli.command, Commands::Watermark { all: true, .. }));
    }

    #[test]
    fn test_watermark_needs_input() {
        assert!(Cli::try_parse_from(["pdfsampler", "watermark"]).is_err());
    }

    #[test]
    fn test_sample_file_name_for_title() {
        assert_eq!(sample_file_name("Pro Swift"), "pro-swift-sample.pdf");
    }

    #[test]
    fn test_context_is_the_matching_line() {
        colored::control::set_override(false);
        let text = "first line\nfind the needle here\nlast";
        let start = text.find("needle").unwrap();
        assert_eq!(
            context(text, start..start + 6),
            "find the needle here"
        );
    }
}
