use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

use clap::Parser;
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::{
        emit,
        termcolor::{ColorChoice, StandardStream},
    },
};
use log::{info, warn};
use roxmltree::{Document, Node};
use serde_json::json;

use svg2vml::{ParseError, Path, VmlConfig};

#[derive(Debug, Parser)]
#[command(name = "svg2vml", author, version, about)]
struct Opt {
    /// Scale VML coordinates by this factor and round them to integers
    #[arg(long)]
    precision: Option<f64>,
    /// Path data to convert, instead of reading a file
    #[arg(short, long)]
    data: Option<String>,
    /// A file path for an SVG or raw path data, else reads from stdin
    file: Option<PathBuf>,
    /// Output file path (overwrites old files), else writes to stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Write encodings and bounding boxes as JSON
    #[arg(long)]
    json: bool,
    /// JSON settings file, overridden by the flags above
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Path data along with a name for it in diagnostics and output
struct Source {
    name: String,
    data: String,
}

fn read_to_string(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(filename) => {
            let mut f = File::open(filename)?;
            let len = f.metadata()?.len();
            let mut input = String::with_capacity(len as usize + 1);
            f.read_to_string(&mut input)?;
            Ok(input)
        }
        None => {
            info!("Reading from standard input");
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn is_valid_node(node: &Node) -> bool {
    node.is_element()
        && !node
            .attribute("style")
            .unwrap_or_default()
            .contains("display:none")
}

/// Collects the `d` attribute of every visible `<path>`, depth first
fn svg_sources(document: &Document) -> Vec<Source> {
    let mut sources = vec![];
    let mut stack = document
        .root()
        .children()
        .rev()
        .filter(is_valid_node)
        .collect::<Vec<_>>();
    while let Some(node) = stack.pop() {
        if node.tag_name().name() == "path" {
            match node.attribute("d") {
                Some(d) => sources.push(Source {
                    name: node
                        .attribute("id")
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("path{}", sources.len())),
                    data: d.to_string(),
                }),
                None => warn!("There is a path node containing no actual path: {:?}", node),
            }
        }
        stack.extend(node.children().rev().filter(is_valid_node));
    }
    sources
}

fn emit_parse_error(name: &str, data: &str, err: &ParseError) -> io::Result<()> {
    let mut writer = StandardStream::stderr(ColorChoice::Auto);
    let config = codespan_reporting::term::Config::default();
    let diagnostic = Diagnostic::error()
        .with_message("could not parse path data")
        .with_labels(vec![Label::primary((), err.span()).with_message(err.to_string())]);
    emit(
        &mut writer,
        &config,
        &SimpleFile::new(name, data),
        &diagnostic,
    )
    .map_err(io::Error::other)
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("svg2vml=info"))
        .init();

    let opt = Opt::parse();

    let mut config = match &opt.settings {
        Some(settings) => {
            serde_json::from_str::<VmlConfig>(&read_to_string(Some(settings))?)
                .map_err(io::Error::other)?
        }
        None => VmlConfig::default(),
    };
    if let Some(precision) = opt.precision {
        config.precision = Some(precision);
    }

    let sources = match opt.data {
        Some(data) => vec![Source {
            name: "data".to_string(),
            data,
        }],
        None => {
            let input = read_to_string(opt.file.as_ref())?;
            if input.trim_start().starts_with('<') {
                let document = Document::parse(&input).map_err(io::Error::other)?;
                svg_sources(&document)
            } else {
                vec![Source {
                    name: opt
                        .file
                        .as_ref()
                        .map(|file| file.display().to_string())
                        .unwrap_or_else(|| "stdin".to_string()),
                    data: input,
                }]
            }
        }
    };
    if sources.is_empty() {
        warn!("No path data found");
    }

    let mut failed = false;
    let mut rendered = vec![];
    for source in &sources {
        match Path::parse(&source.data) {
            Ok(path) => rendered.push((source, path)),
            Err(err) => {
                emit_parse_error(&source.name, &source.data, &err)?;
                failed = true;
            }
        }
    }

    let output = if opt.json {
        let entries = rendered
            .iter()
            .map(|(source, path)| {
                json!({
                    "name": source.name,
                    "svg": path.to_svg(),
                    "vml": path.to_vml(config.precision),
                    "bounding_box": path.measure(config.precision),
                })
            })
            .collect::<Vec<_>>();
        serde_json::to_string_pretty(&entries).map_err(io::Error::other)? + "\n"
    } else {
        rendered
            .iter()
            .map(|(source, path)| {
                let b = path.measure(config.precision);
                format!(
                    "{}\n  vml: {}\n  box: left={} top={} right={} bottom={} width={} height={}\n",
                    source.name,
                    path.to_vml(config.precision),
                    b.left,
                    b.top,
                    b.right,
                    b.bottom,
                    b.width,
                    b.height
                )
            })
            .collect()
    };

    if let Some(out_path) = opt.out {
        File::create(out_path)?.write_all(output.as_bytes())?;
    } else {
        io::stdout().write_all(output.as_bytes())?;
    }

    if failed {
        std::process::exit(1)
    }
    Ok(())
}
