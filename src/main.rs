use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use serde::Serialize;
use url::Url;

use crawl_boilerpipe::filters::{Filter, PrintDebugFilter};
use crawl_boilerpipe::{ExtractionConfig, Extractor, PageCategory, TextDocument};

#[derive(Parser)]
#[command(name = "crawl_boilerpipe", about = "Main-text extraction for crawled HTML pages")]
struct Cli {
    /// Config file (toml, json or yaml); BOILERPIPE__* env vars override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the main content of HTML files
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Base URL of the pages (default: the file's own file:// URL)
        #[arg(short, long)]
        url: Option<String>,
        /// Print paragraph HTML instead of plain text
        #[arg(long)]
        html: bool,
        /// Include boilerplate blocks too
        #[arg(long)]
        all: bool,
        /// One JSON object per file
        #[arg(long)]
        json: bool,
    },
    /// Show every block of a page with its features and verdict
    Blocks {
        file: PathBuf,
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = ExtractionConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    let result = match cli.command {
        Commands::Extract {
            files,
            url,
            html,
            all,
            json,
        } => {
            let mut extractor = Extractor::new(config);
            if all {
                extractor = extractor.keep_boilerplate();
            }
            let opts = OutputOptions { html, all, json };
            let failed = extract_files(&extractor, &files, url.as_deref(), &opts)?;
            if failed > 0 {
                eprintln!("{} of {} files failed.", failed, files.len());
            }
            Ok(())
        }
        Commands::Blocks { file, url } => {
            let extractor = Extractor::new(config).keep_boilerplate();
            let mut doc = extract_file(&extractor, &file, url.as_deref())?;
            PrintDebugFilter.process(&mut doc)?;
            println!(
                "{} blocks, {} content | category: {} | title: {}",
                doc.blocks.len(),
                doc.content_blocks().count(),
                doc.page_category,
                doc.page_title.as_deref().unwrap_or("-"),
            );
            Ok(())
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct OutputOptions {
    html: bool,
    all: bool,
    json: bool,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    file: &'a Path,
    url: &'a str,
    category: PageCategory,
    page_title: Option<&'a str>,
    content_title: Option<&'a str>,
    publish_time: Option<NaiveDateTime>,
    modified_time: Option<NaiveDateTime>,
    fields: &'a std::collections::BTreeMap<String, String>,
    content: String,
}

/// Extracts all files in parallel, printing results in input order.
/// Returns how many files failed.
fn extract_files(
    extractor: &Extractor,
    files: &[PathBuf],
    url: Option<&str>,
    opts: &OutputOptions,
) -> anyhow::Result<usize> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut failed = 0;
    for chunk in files.chunks(500) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|file| extract_file(extractor, file, url))
            .collect();
        pb.inc(chunk.len() as u64);

        for (file, result) in chunk.iter().zip(results) {
            match result {
                Ok(doc) => pb.suspend(|| print_document(file, &doc, opts))?,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(file = %file.display(), error = %format!("{:#}", e), "extraction failed");
                }
            }
        }
    }

    pb.finish_and_clear();
    Ok(failed)
}

fn extract_file(extractor: &Extractor, file: &Path, url: Option<&str>) -> anyhow::Result<TextDocument> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let base_url = match url {
        Some(u) => u.to_string(),
        None => file_url(file).unwrap_or_default(),
    };
    let doc = extractor
        .extract_html(&html, Some(&base_url))
        .with_context(|| format!("failed to extract {}", file.display()))?;
    Ok(doc)
}

fn file_url(file: &Path) -> Option<String> {
    let abs = std::fs::canonicalize(file).ok()?;
    Url::from_file_path(abs).ok().map(String::from)
}

fn print_document(file: &Path, doc: &TextDocument, opts: &OutputOptions) -> anyhow::Result<()> {
    let include_non_content = opts.all;
    let content = if opts.html {
        doc.html_content(true, include_non_content)
    } else {
        doc.text_content(true, include_non_content)
    };

    if opts.json {
        let out = ExtractOutput {
            file,
            url: &doc.base_url,
            category: doc.page_category,
            page_title: doc.page_title.as_deref(),
            content_title: doc.content_title.as_deref(),
            publish_time: doc.publish_time,
            modified_time: doc.modified_time,
            fields: &doc.fields,
            content,
        };
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("== {} [{}] ==", file.display(), doc.page_category);
        if let Some(title) = doc.content_title.as_deref().or(doc.page_title.as_deref()) {
            println!("# {}", title);
        }
        println!("{}\n", content);
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
