//! CLI logic for the voko extraction tools.
//!
//! Three subcommands walk a directory of dictionary XML files with a shared
//! grammar resolver: `senses` aggregates headword-to-senses records,
//! `headwords` and `roots` map their texts to the source file name. A unit
//! that fails to parse is logged and skipped; a missing grammar resource
//! aborts the whole batch, since every unit shares the grammar.

mod args;
mod config;
mod resolver;

pub use args::{Args, Command, CommonArgs};
pub use resolver::FsResolver;

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;

use voko::{
    ArticleExtractor, EntityResolver, ParseError, SenseRecord, VokoError, export,
};

/// Run the voko CLI application
///
/// # Errors
///
/// Returns `VokoError` for configuration problems, missing input, missing
/// grammar resources, and output I/O failures. Per-unit parse and
/// extraction errors are logged and skipped instead.
pub fn run(args: &Args) -> Result<(), VokoError> {
    let common = args.command.common();
    let cli_config = config::load_config(common.config.as_ref())?;

    let input = common
        .path
        .clone()
        .or(cli_config.revo_path)
        .ok_or_else(|| {
            VokoError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no input path given and no dictionary path configured",
            ))
        })?;
    let files = discover(&input)?;
    info!(count = files.len(), input = input.display().to_string(); "Processing units");

    let grammar_base = common
        .grammar
        .clone()
        .or(cli_config.grammar_path)
        .unwrap_or_else(|| default_grammar_base(&input));
    let resolver = FsResolver::new(grammar_base);
    let extractor = ArticleExtractor::new();

    let json = match &args.command {
        Command::Senses(_) => {
            render(common, &senses_batch(&extractor, &resolver, &files)?)?
        }
        Command::Headwords(_) => {
            render(common, &headwords_batch(&extractor, &resolver, &files)?)?
        }
        Command::Roots(_) => render(common, &roots_batch(&extractor, &resolver, &files)?)?,
    };

    match &common.output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output = path.display().to_string(); "Results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Aggregates headword-to-senses records across units. Later units win on
/// headword collisions, matching insertion-order update semantics.
pub fn senses_batch(
    extractor: &ArticleExtractor,
    resolver: &dyn EntityResolver,
    files: &[PathBuf],
) -> Result<IndexMap<String, Vec<SenseRecord>>, VokoError> {
    let mut all = IndexMap::new();
    for file in files {
        let Some(tree) = parse_unit(extractor, resolver, file)? else {
            continue;
        };
        match extractor.extract(&tree) {
            Ok(record) => all.extend(record),
            Err(err) => warn!(unit = unit_name(file); "skipping unit: {err}"),
        }
    }
    Ok(all)
}

/// Maps every headword to the name of the unit that defines it.
pub fn headwords_batch(
    extractor: &ArticleExtractor,
    resolver: &dyn EntityResolver,
    files: &[PathBuf],
) -> Result<IndexMap<String, String>, VokoError> {
    let mut all = IndexMap::new();
    for file in files {
        let Some(tree) = parse_unit(extractor, resolver, file)? else {
            continue;
        };
        match extractor.headwords(&tree) {
            Ok(words) => {
                for word in words {
                    all.insert(word, unit_name(file));
                }
            }
            Err(err) => warn!(unit = unit_name(file); "skipping unit: {err}"),
        }
    }
    Ok(all)
}

/// Maps every root text (variants included) to the name of its unit.
pub fn roots_batch(
    extractor: &ArticleExtractor,
    resolver: &dyn EntityResolver,
    files: &[PathBuf],
) -> Result<IndexMap<String, String>, VokoError> {
    let mut all = IndexMap::new();
    for file in files {
        let Some(tree) = parse_unit(extractor, resolver, file)? else {
            continue;
        };
        let roots = extractor.roots(&tree);
        if roots.is_empty() {
            warn!(unit = unit_name(file); "unit has no root element");
        }
        for root in roots {
            all.insert(root, unit_name(file));
        }
    }
    Ok(all)
}

/// Parses one unit, skipping (with a log entry) on per-unit errors. A
/// missing grammar resource is returned as a fatal error instead.
fn parse_unit(
    extractor: &ArticleExtractor,
    resolver: &dyn EntityResolver,
    file: &Path,
) -> Result<Option<voko::Element>, VokoError> {
    let reader = match File::open(file) {
        Ok(handle) => BufReader::new(handle),
        Err(err) => {
            warn!(unit = unit_name(file); "skipping unreadable unit: {err}");
            return Ok(None);
        }
    };
    match extractor.parse_reader(reader, resolver) {
        Ok(tree) => Ok(Some(tree)),
        Err(err @ VokoError::Parse(ParseError::Resource(_))) => Err(err),
        Err(err) => {
            warn!(unit = unit_name(file); "skipping unit: {err}");
            Ok(None)
        }
    }
}

/// The XML files to process: a single file as-is, or every `*.xml` in a
/// directory, sorted by name for stable output.
pub fn discover(input: &Path) -> Result<Vec<PathBuf>, VokoError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(VokoError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is neither a file nor a directory", input.display()),
        )));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "xml")
        })
        .collect();
    files.sort();
    if files.is_empty() {
        warn!(input = input.display().to_string(); "no XML files found");
    }
    Ok(files)
}

fn unit_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

/// The grammar layout sits next to the directory of XML files.
fn default_grammar_base(input: &Path) -> PathBuf {
    let xml_dir = if input.is_dir() {
        input
    } else {
        input.parent().unwrap_or(input)
    };
    xml_dir.parent().unwrap_or(xml_dir).to_path_buf()
}

fn render<T: Serialize>(common: &CommonArgs, record: &T) -> Result<String, VokoError> {
    if common.output.is_some() {
        export::to_json_pretty(record)
    } else {
        export::to_json(record)
    }
}
