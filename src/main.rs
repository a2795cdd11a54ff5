//! Command-line front end for the `bibnorm` library.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use bibnorm::{CitationSet, DedupAdvisor, Normalizer, Report, Severity, citefilter};

/// BibTeX normalization tool.
///
/// Reads one or more bibliography files, normalizes every entry into one
/// canonical form, and writes the result to stdout, to a file, or back in
/// place.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Bibliography files to read
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Print all titles after processing
    #[arg(short, long)]
    titles: bool,

    /// Print months in three letters
    #[arg(short, long)]
    short: bool,

    /// Warn about entries with near-duplicate titles
    #[arg(short = 'w', long)]
    warn_dups: bool,

    /// Edit the bib file in place, keeping the original as FILE.bak
    #[arg(short, long, conflicts_with = "output")]
    inplace: bool,

    /// Keep only entries cited by this citation-list file; the rest go to
    /// a secondary .notcited file
    #[arg(short, long, value_name = "CITEFILE")]
    citations: Option<PathBuf>,

    /// Output to file instead of stdout
    #[arg(short, long, value_name = "NEWFILE")]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.inplace && args.files.len() != 1 {
        bail!("in-place editing requires exactly one input file");
    }
    if let Some(output) = &args.output {
        if args.files.iter().any(|file| file == output) {
            bail!("output file {} collides with an input file", output.display());
        }
    }

    let mut source = String::new();
    for file in &args.files {
        let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        source.push_str(&text);
        if !text.ends_with('\n') {
            source.push('\n');
        }
    }

    let citations = match &args.citations {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading citation list {}", path.display()))?;
            Some(CitationSet::parse(&text))
        }
        None => None,
    };

    let normalizer = Normalizer::new().with_short_months(args.short);
    let mut report = Report::new();
    let entries = normalizer.normalize(&source, &mut report)?;

    if args.warn_dups {
        DedupAdvisor::new().advise(&entries, &mut report);
    }

    for diagnostic in report.iter() {
        match diagnostic.severity {
            Severity::Info => info!("{diagnostic}"),
            Severity::Warning => warn!("{diagnostic}"),
        }
    }

    let (cited, not_cited) = citefilter::partition(entries, citations.as_ref());

    // Nothing is renamed or written until the whole pipeline has succeeded.
    let primary: Option<&Path> = if args.inplace {
        Some(args.files[0].as_path())
    } else {
        args.output.as_deref()
    };
    if args.inplace {
        let backup = append_suffix(&args.files[0], ".bak");
        fs::rename(&args.files[0], &backup)
            .with_context(|| format!("renaming original to {}", backup.display()))?;
    }

    let rendered = normalizer.render_all(&cited);
    match primary {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("writing {}", path.display()))?
        }
        None => print!("{rendered}"),
    }

    if !not_cited.is_empty() {
        let path = match primary {
            Some(path) => append_suffix(path, ".notcited"),
            None => PathBuf::from("notcited.bib"),
        };
        fs::write(&path, normalizer.render_all(&not_cited))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            "{} entries not cited, written to {}",
            not_cited.len(),
            path.display()
        );
    }

    info!("{} entries processed.", cited.len() + not_cited.len());

    if args.titles {
        println!("\n#### Print All Titles ####");
        for entry in cited.iter().chain(not_cited.iter()) {
            if let Some(title) = entry.title() {
                println!("{title}");
            }
        }
    }

    Ok(())
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
