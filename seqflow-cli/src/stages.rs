//! Pipeline stages selectable from the command line
//!
//! The stages always run in the same order, whatever order the flags were given:
//!
//! trim -> grep -> exclude -> upper -> distinct -> sort -> skip -> take ->
//! drop-right -> chunk | count
//!
//! Line terminators are stripped before any stage runs.

use regex::Regex;
use seqflow::{ParallelExecutor, Pipeline, PipelineError};
use seqflow_config::OutputFormat;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

/// Stage selection built from the command line.
#[derive(Debug, Default)]
pub struct Stages {
    pub trim: bool,
    pub grep: Option<Regex>,
    pub exclude: Option<Regex>,
    pub upper: bool,
    pub distinct: bool,
    pub sort: bool,
    pub reverse: bool,
    pub skip: usize,
    pub take: Option<usize>,
    pub drop_right: usize,
    pub chunk: Option<usize>,
    pub count: bool,
}

/// Result of running the stages.
#[derive(Debug, PartialEq)]
pub enum Output {
    Count(usize),
    Lines(Vec<String>),
    Chunks(Vec<Vec<String>>),
}

/// Holds the first read error hit while streaming lines.
pub type ReadFailure = Rc<RefCell<Option<io::Error>>>;

/// Strip terminators and stop at the first read error, remembering it.
pub fn checked_lines(
    source: Pipeline<'static, io::Result<String>>,
) -> (Pipeline<'static, String>, ReadFailure) {
    let failure: ReadFailure = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&failure);
    let lines = source.into_iter().map_while(move |line| match line {
        Ok(line) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        Err(e) => {
            *slot.borrow_mut() = Some(e);
            None
        }
    });
    (Pipeline::of(lines), failure)
}

/// Apply the selected stages. `executor` runs the `upper` stage in parallel.
pub fn run(
    lines: Pipeline<'static, String>,
    stages: &Stages,
    executor: Option<&ParallelExecutor>,
) -> Result<Output, PipelineError> {
    let mut lines = lines;

    if stages.trim {
        lines = lines.map(|line| line.trim().to_string());
    }
    if let Some(pattern) = stages.grep.clone() {
        lines = lines.filter(move |line| pattern.is_match(line));
    }
    if let Some(pattern) = stages.exclude.clone() {
        lines = lines.exclude(move |line| pattern.is_match(line));
    }
    if stages.upper {
        lines = match executor {
            Some(executor) => lines.par_map(executor, |line| line.to_uppercase())?,
            None => lines.map(|line| line.to_uppercase()),
        };
    }
    if stages.distinct {
        lines = lines.distinct();
    }
    if stages.sort {
        lines = lines.sort_by_key(|line| line.clone(), stages.reverse);
    }
    lines = lines.skip(count_arg(stages.skip))?;
    if let Some(n) = stages.take {
        lines = lines.take(n);
    }
    lines = lines.drop_right(count_arg(stages.drop_right));

    if stages.count {
        return Ok(Output::Count(lines.count()));
    }
    match stages.chunk {
        Some(size) => Ok(Output::Chunks(lines.chunk(size)?.to_list())),
        None => Ok(Output::Lines(lines.to_list())),
    }
}

/// Counts past `isize::MAX` already cover any source, so they saturate.
fn count_arg(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

/// Render an output in the requested format.
pub fn render(
    output: &Output,
    format: OutputFormat,
    chunk_separator: &str,
) -> Result<String, serde_json::Error> {
    let rendered = match (output, format) {
        (Output::Count(n), _) => format!("{}\n", n),
        (Output::Lines(lines), OutputFormat::Text) => {
            Pipeline::of(lines.iter()).map(|line| format!("{}\n", line)).join("")
        }
        (Output::Chunks(chunks), OutputFormat::Text) => Pipeline::of(chunks.iter())
            .map(|chunk| format!("{}\n", chunk.join(chunk_separator)))
            .join(""),
        (Output::Lines(lines), OutputFormat::Json) => {
            format!("{}\n", serde_json::to_string_pretty(lines)?)
        }
        (Output::Chunks(chunks), OutputFormat::Json) => {
            format!("{}\n", serde_json::to_string_pretty(chunks)?)
        }
    };
    Ok(rendered)
}
