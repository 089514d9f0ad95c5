//! vindaloo CLI - PDF page inspection and rasterization

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use vindaloo::{Document, OpenOptions, RenderOptions};

#[derive(Parser)]
#[command(name = "vindaloo")]
#[command(version)]
#[command(about = "Inspect PDF pages and rasterize them to PNG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every page with its size and rotation
    Pages {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Render pages to PNG
    Render {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page number to render (1-indexed)
        #[arg(short, long, default_value = "1", conflicts_with = "all")]
        page: u32,

        /// Render every page
        #[arg(long)]
        all: bool,

        /// Pixels per point (1.0 = 72 dpi)
        #[arg(short, long, default_value = "1.0", env = "VINDALOO_SCALE")]
        scale: f32,

        /// Output file, or directory with --all
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Leave the page background transparent
        #[arg(long)]
        transparent: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Pages { input } => cmd_pages(&input),
        Commands::Render {
            input,
            page,
            all,
            scale,
            output,
            transparent,
        } => {
            let render_options = if transparent {
                RenderOptions::new().transparent()
            } else {
                RenderOptions::new()
            };
            if all {
                cmd_render_all(&input, scale, output.as_deref(), render_options)
            } else {
                cmd_render(&input, page, scale, output.as_deref(), render_options)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::open(input)?;
    let metadata = doc.metadata()?;

    if json {
        println!("{}", metadata.to_json(true)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Creator", &metadata.creator),
        ("Producer", &metadata.producer),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label.bold(), value);
        }
    }
    if let Some(created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    if let Ok(size) = doc.page_size() {
        println!(
            "{}: {:.0} x {:.0} pt",
            "First page".bold(),
            size.width,
            size.height
        );
    }

    Ok(())
}

fn cmd_pages(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::open(input)?;
    if doc.page_count() == 0 {
        println!("{}", "Document has no pages".yellow());
        return Ok(());
    }

    loop {
        let page = doc.page()?;
        let size = page.size();
        println!(
            "{:>5}  {:>7.1} x {:<7.1} pt  {:>3}°",
            page.index + 1,
            size.width,
            size.height,
            page.rotation.degrees()
        );
        if !doc.next_page() {
            break;
        }
    }
    Ok(())
}

fn cmd_render(
    input: &Path,
    page: u32,
    scale: f32,
    output: Option<&Path>,
    render_options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = page.checked_sub(1).ok_or("page numbers start at 1")?;
    let options = OpenOptions::new().with_initial_page(index);
    let mut doc = Document::open_with_options(input, &options)?;
    doc.set_render_options(render_options);
    doc.set_page_by_index(index)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, page));
    save_current_page(&doc, scale, &output)?;

    println!("{} {}", "Wrote".green().bold(), output.display());
    Ok(())
}

fn cmd_render_all(
    input: &Path,
    scale: f32,
    output: Option<&Path>,
    render_options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::open(input)?;
    doc.set_render_options(render_options);

    let output_dir = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_pages", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let count = doc.page_count();
    if count == 0 {
        println!("{}", "Document has no pages".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    loop {
        let number = doc.page_index().unwrap_or(0) + 1;
        pb.set_message(format!("page {}", number));
        let target = output_dir.join(format!("page-{:04}.png", number));
        save_current_page(&doc, scale, &target)?;
        pb.inc(1);
        if !doc.next_page() {
            break;
        }
    }

    pb.finish_with_message("Done!");
    println!(
        "{} {} pages to {}",
        "Wrote".green().bold(),
        count,
        output_dir.display()
    );
    Ok(())
}

fn save_current_page(
    doc: &Document,
    scale: f32,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let pixmap = doc.render_page(scale)?;
    log::debug!(
        "rendered {}x{} pixels to {}",
        pixmap.width(),
        pixmap.height(),
        output.display()
    );
    pixmap.save_png(output)?;
    Ok(())
}

fn default_output(input: &Path, page: u32) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}-p{}.png", stem, page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("/docs/manual.pdf"), 3),
            PathBuf::from("manual-p3.png")
        );
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "vindaloo", "render", "a.pdf", "--page", "2", "--scale", "1.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                page, scale, all, ..
            } => {
                assert_eq!(page, 2);
                assert_eq!(scale, 1.5);
                assert!(!all);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_cli_rejects_page_with_all() {
        let result = Cli::try_parse_from(["vindaloo", "render", "a.pdf", "--page", "2", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_rejects_page_zero() {
        let dir = tempfile::tempdir().unwrap();
        let result = cmd_render(
            &dir.path().join("missing.pdf"),
            0,
            1.0,
            None,
            RenderOptions::default(),
        );
        assert!(result.is_err());
    }
}
