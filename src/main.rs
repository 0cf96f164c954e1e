use clap::Parser;
use scrub::{RcLoader, RemovalEngine, RichDocument};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "scrub",
    version,
    about = "Remove hidden text and bracketed fragments from a document"
)]
struct Args {
    /// Document to process; `<hidden>...</hidden>` marks hidden text
    #[arg(required_unless_present = "sample_config")]
    file: Option<PathBuf>,

    /// Add a selection to the scope, as START:END character offsets.
    /// Without any, the whole document is processed.
    #[arg(short, long = "select", value_parser = parse_span)]
    select: Vec<(usize, usize)>,

    /// Fragment delimiters, exactly two characters (e.g. "[]")
    #[arg(long)]
    delims: Option<String>,

    /// Keep hidden text
    #[arg(long)]
    no_hidden: bool,

    /// Keep bracketed fragments
    #[arg(long)]
    no_fragments: bool,

    #[arg(long)]
    max_iterations: Option<usize>,

    /// Settings file to use instead of .scrubrc
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a sample .scrubrc and exit
    #[arg(long)]
    sample_config: bool,
}

fn parse_span(value: &str) -> Result<(usize, usize), String> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got '{value}'"))?;
    let start = start.trim().parse::<usize>().map_err(|e| format!("bad start offset: {e}"))?;
    let end = end.trim().parse::<usize>().map_err(|e| format!("bad end offset: {e}"))?;
    Ok((start, end))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.sample_config {
        print!("{}", RcLoader::generate_sample_rc());
        return Ok(());
    }
    let Some(path) = args.file.as_ref() else {
        return Err("no input file".into());
    };

    let mut config = match &args.config {
        Some(rc_path) => RcLoader::load_from(rc_path),
        None => RcLoader::load_config(),
    };
    if let Some(delims) = &args.delims {
        config.delimiters = delims.clone();
    }
    if args.no_hidden {
        config.remove_hidden = false;
    }
    if args.no_fragments {
        config.remove_fragments = false;
    }
    if let Some(max) = args.max_iterations {
        config.max_iterations = max;
    }

    let mut engine = RemovalEngine::from_config(&config)?;
    let mut document = RichDocument::from_markup(&fs::read_to_string(path)?);

    if args.select.is_empty() {
        document.select(0, document.len());
        engine.notify_selection_changed(&mut document);
    }
    for &(start, end) in &args.select {
        document.select(start, end);
        engine.notify_selection_changed(&mut document);
    }

    match engine.process_text(&mut document) {
        Ok(result) => eprintln!("{result}"),
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }

    match &args.output {
        Some(out_path) => fs::write(out_path, document.to_markup())?,
        None => print!("{}", document.to_markup()),
    }

    Ok(())
}
