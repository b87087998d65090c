//! Command surface: read documents → compile → print.
use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::compiler;
use crate::ir::Assertion;
use crate::options::{Arg, CompilerOptions, HttpMethod, Pair, TransformerOptions};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// turn an expected JSON response body into a fluent request/response test
#[derive(Parser, Debug)]
#[command(name = "json2rest", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate the test source
    Test(TestOut),
    /// print the intermediate assertion list as JSON
    Assertions(AssertionsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON response body given inline
    #[arg(long, conflicts_with = "input")]
    json: Option<String>,

    /// One or more inputs. May be literal paths, quoted glob patterns, or '-' for stdin
    #[arg(long, short, num_args = 1.., required_unless_present = "json")]
    input: Vec<String>,

    /// JSON Pointer to select the body within each document (e.g. /response/body)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq filter selecting the body within each document; must yield one value
    #[arg(long)]
    jq_expr: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct PipelineSettings {
    /// JSON config file with compiler options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// keep one assertion per array element instead of a single `contains`
    #[arg(long, default_value_t = false)]
    no_simplify: bool,

    /// assert that empty objects and arrays are empty
    #[arg(long, default_value_t = false)]
    check_empty: bool,
}

#[derive(Args, Debug, Clone)]
#[group(required = false, multiple = false)]
struct Endpoint {
    /// URL of a GET request
    #[arg(long, value_name = "URL")]
    get: Option<String>,
    /// URL of a POST request
    #[arg(long, value_name = "URL")]
    post: Option<String>,
    /// URL of a PUT request
    #[arg(long, value_name = "URL")]
    put: Option<String>,
    /// URL of a DELETE request
    #[arg(long, value_name = "URL")]
    delete: Option<String>,
    /// URL of a PATCH request
    #[arg(long, value_name = "URL")]
    patch: Option<String>,
    /// URL of a HEAD request
    #[arg(long, value_name = "URL")]
    head: Option<String>,
    /// URL of an OPTIONS request
    #[arg(long, value_name = "URL")]
    options: Option<String>,
}

/// Any value may be written `$name` to reference a variable in the generated
/// code instead of a string literal.
#[derive(Args, Debug, Clone)]
struct RequestSettings {
    #[command(flatten)]
    endpoint: Endpoint,

    #[arg(long)]
    accept: Option<String>,

    #[arg(long)]
    content_type: Option<String>,

    /// request body
    #[arg(long)]
    body: Option<String>,

    #[arg(long)]
    port: Option<String>,

    #[arg(long = "header", value_name = "KEY=VALUE", value_parser = parse_pair)]
    headers: Vec<Pair>,

    #[arg(long = "cookie", value_name = "KEY=VALUE", value_parser = parse_pair)]
    cookies: Vec<Pair>,

    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_pair)]
    params: Vec<Pair>,

    #[arg(long = "query-param", value_name = "KEY=VALUE", value_parser = parse_pair)]
    query_params: Vec<Pair>,
}

#[derive(clap::Parser, Debug)]
struct TestOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    pipeline: PipelineSettings,

    #[command(flatten)]
    request: RequestSettings,

    /// expected HTTP status code
    #[arg(long)]
    status_code: Option<u16>,

    /// emit the chain on a single line
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// prepend the static imports the test needs
    #[arg(long, default_value_t = false)]
    imports: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct AssertionsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    pipeline: PipelineSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One input document, after selection.
#[derive(Debug)]
struct Document {
    label: String,
    body: Value,
}

/// Assertions of one document, as printed by `json2rest assertions`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    source: &'a str,
    assertions: Vec<Assertion>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let mut raw = Vec::<(String, String)>::new();
        if let Some(json) = &self.json {
            raw.push(("<inline>".to_string(), json.clone()));
        }
        for source in resolve_file_path_patterns(&self.input)? {
            match source {
                Source::Stdin => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("failed to read stdin")?;
                    raw.push(("<stdin>".to_string(), text));
                }
                Source::File(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read source file {}", path.display()))?;
                    raw.push((path.to_string_lossy().to_string(), text));
                }
            }
        }

        raw.into_iter()
            .map(|(label, text)| {
                let value = serde_json::from_str::<Value>(&text)
                    .with_context(|| format!("failed to parse JSON source ({label})"))?;
                let body = self
                    .select(value)
                    .with_context(|| format!("failed to select response body ({label})"))?;
                Ok(Document { label, body })
            })
            .collect()
    }

    fn select(&self, mut value: Value) -> Result<Value> {
        if let Some(pointer) = &self.json_pointer {
            value = match value.pointer(pointer) {
                Some(found) => found.clone(),
                None => bail!("JSON pointer {pointer} matched nothing"),
            };
        }
        if let Some(jq_expr) = &self.jq_expr {
            value = crate::jq_exec::select_one(jq_expr, &value)?;
        }
        Ok(value)
    }
}

impl PipelineSettings {
    /// Config file (if any), then flags. Without a config file arrays are
    /// simplified unless `--no-simplify` is given.
    fn options(&self) -> Result<CompilerOptions> {
        let mut options = match &self.config {
            Some(path) => crate::path_de::load_options(path)?,
            None => CompilerOptions {
                transformer: TransformerOptions { simplify_arrays: true, ..Default::default() },
                ..Default::default()
            },
        };
        if self.no_simplify {
            options.transformer.simplify_arrays = false;
        }
        if self.check_empty {
            options.transformer.check_empty_containers = true;
        }
        Ok(options)
    }
}

impl Endpoint {
    fn resolve(&self) -> Option<(HttpMethod, &str)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Options, &self.options),
        ]
        .into_iter()
        .find_map(|(method, url)| url.as_deref().map(|url| (method, url)))
    }
}

impl TestOut {
    fn options(&self) -> Result<CompilerOptions> {
        let mut options = self.pipeline.options()?;
        let generator = &mut options.generator;
        let request = &mut generator.request;
        let flags = &self.request;

        if let Some((method, url)) = flags.endpoint.resolve() {
            request.method = Some(method);
            request.url = Some(parse_arg(url));
        }
        if let Some(accept) = &flags.accept {
            request.accept = Some(parse_arg(accept));
        }
        if let Some(content_type) = &flags.content_type {
            request.content_type = Some(parse_arg(content_type));
        }
        if let Some(body) = &flags.body {
            request.body = Some(parse_arg(body));
        }
        if let Some(port) = &flags.port {
            request.port = Some(parse_port(port)?);
        }
        request.headers.extend(flags.headers.iter().cloned());
        request.cookies.extend(flags.cookies.iter().cloned());
        request.params.extend(flags.params.iter().cloned());
        request.query_params.extend(flags.query_params.iter().cloned());

        if self.status_code.is_some() {
            generator.status_code = self.status_code;
        }
        if self.compact {
            generator.format = false;
        }
        if self.imports {
            generator.include_dependencies = true;
        }
        Ok(options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Log to stderr so generated source on stdout stays clean.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Test(target) => {
                let options = target.options()?;
                let documents = target.input_settings.load()?;
                tracing::info!(documents = documents.len(), "compiling");

                let sources = documents
                    .par_iter()
                    .map(|doc| {
                        compiler::compile_value(&doc.body, &options)
                            .with_context(|| format!("failed to compile {}", doc.label))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let output = render_sources(&documents, &sources);
                write_output(target.out.as_ref(), &output)
            }
            Command::Assertions(target) => {
                let options = target.pipeline.options()?;
                let documents = target.input_settings.load()?;

                let reports = documents
                    .iter()
                    .map(|doc| {
                        let assertions = compiler::assertions(&doc.body, &options)
                            .with_context(|| format!("failed to analyze {}", doc.label))?;
                        Ok(Report { source: &doc.label, assertions })
                    })
                    .collect::<Result<Vec<_>>>()?;

                let rendered = render_reports(&reports)?;
                write_output(target.out.as_ref(), &rendered)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, PartialEq)]
enum Source {
    Stdin,
    File(PathBuf),
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<Source>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(Source::Stdin);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(Source::File(entry?));
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Source::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}

/// A lone document is printed as is; several are each headed by their
/// source, in input order.
fn render_sources(documents: &[Document], sources: &[String]) -> String {
    match sources {
        [single] => single.clone(),
        _ => documents
            .iter()
            .zip(sources)
            .map(|(doc, source)| format!("// {}\n{source}", doc.label))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// A lone document prints its assertion list; several print one report per
/// document, in input order. Repeated sources stay separate entries.
fn render_reports(reports: &[Report<'_>]) -> Result<String> {
    let rendered = match reports {
        [single] => serde_json::to_string_pretty(&single.assertions)?,
        _ => serde_json::to_string_pretty(reports)?,
    };
    Ok(rendered)
}

fn write_output(out: Option<&PathBuf>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

/// `$name` is a reference, anything else a literal.
fn parse_arg(raw: &str) -> Arg<String> {
    match raw.strip_prefix('$') {
        Some(name) if !name.is_empty() => Arg::Reference(name.to_string()),
        _ => Arg::Literal(raw.to_string()),
    }
}

fn parse_port(raw: &str) -> Result<Arg<u16>> {
    match parse_arg(raw) {
        Arg::Reference(name) => Ok(Arg::Reference(name)),
        Arg::Literal(text) => {
            let port = text.parse::<u16>().with_context(|| format!("invalid port: {text}"))?;
            Ok(Arg::Literal(port))
        }
    }
}

fn parse_pair(raw: &str) -> Result<Pair, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    Ok((parse_arg(key), parse_arg(value)))
}
