//! Minimal CLI: schema → (typescript | json)
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::info;
use rayon::prelude::*;
use serde_json::Value;

use crate::codegen::Codegen;
use crate::config::DeriveOptions;
use crate::derive::Deriver;
use crate::error::{Error, Result};
use crate::ty::Ty;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive the shape of data a JSON Schema describes and output either TypeScript declarations or a JSON view of the derived type
#[derive(Parser, Debug)]
#[command(name = "schema-typeof", version)]
pub struct CommandLineInterface {
    /// more logging (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// derive and emit TypeScript type declarations
    Ts(TsOut),
    /// derive and print the derived type as JSON
    Json(JsonOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the schema inside each document (e.g. /definitions/Order)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ filter applied to each document; every output is one schema
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths, quoted glob patterns, or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct DeriveSettings {
    /// JSON file with derive options (`max_depth`, `memoize`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// schema positions nested deeper than this resolve to `Value`
    #[arg(long)]
    max_depth: Option<usize>,

    /// do not cache derived types of identical sub-schemas
    #[arg(long, default_value_t = false)]
    no_memoize: bool,
}

#[derive(clap::Parser, Debug)]
struct TsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    derive_settings: DeriveSettings,

    /// top-level type name (numbered when there are several schemas)
    #[arg(long, default_value = "Root")]
    type_name: String,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct JsonOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    derive_settings: DeriveSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One schema to derive, with where it came from.
#[derive(Debug, Clone)]
struct LoadedSchema {
    origin: String,
    schema: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_schemas(&self) -> Result<Vec<LoadedSchema>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let origin = source_path.to_string_lossy().to_string();
            let source = read_source(&source_path)?;
            let document = serde_json::from_str::<Value>(&source).map_err(|source| Error::Json {
                origin: origin.clone(),
                source,
            })?;
            let document = match self.json_pointer.as_deref() {
                None => document,
                Some(pointer) => document.pointer(pointer).cloned().ok_or_else(|| {
                    Error::Pointer { pointer: pointer.to_string(), origin: origin.clone() }
                })?,
            };
            match self.jq_expr.as_deref() {
                None => out.push(LoadedSchema { origin, schema: document }),
                Some(jq_expr) => {
                    let schemas = crate::jq_exec::run_jaq(jq_expr, &document).map_err(|error| {
                        Error::Jq { origin: origin.clone(), message: format!("{error:#}") }
                    })?;
                    for (i, schema) in schemas.into_iter().enumerate() {
                        out.push(LoadedSchema { origin: format!("{origin}#{i}"), schema });
                    }
                }
            }
        }
        info!("loaded {} schema(s)", out.len());
        Ok(out)
    }
}

impl DeriveSettings {
    /// Config file first, then command line overrides.
    fn options(&self) -> Result<DeriveOptions> {
        let mut options = match self.config.as_deref() {
            Some(path) => DeriveOptions::load(path)?,
            None => DeriveOptions::default(),
        };
        if self.max_depth.is_some() {
            options.max_depth = self.max_depth;
        }
        if self.no_memoize {
            options.memoize = false;
        }
        Ok(options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Ts(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                // 1) load + derive
                let options = target.derive_settings.options()?;
                let schemas = target.input_settings.load_schemas()?;
                let tys = derive_all(&schemas, &options);

                // 2) generate declarations
                let mut cg = Codegen::new();
                for (i, ty) in tys.iter().enumerate() {
                    let name = if tys.len() == 1 {
                        target.type_name.clone()
                    } else {
                        format!("{}{}", target.type_name, i + 1)
                    };
                    cg.emit(ty, &name);
                }
                write_output(target.out.as_deref(), &cg.into_string())
            }
            Command::Json(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let options = target.derive_settings.options()?;
                let schemas = target.input_settings.load_schemas()?;
                let tys = derive_all(&schemas, &options);

                // always an array, whatever the number of inputs
                let views = schemas
                    .iter()
                    .zip(&tys)
                    .map(|(loaded, ty)| JsonView { origin: &loaded.origin, ty })
                    .collect::<Vec<_>>();
                let rendered = serde_json::to_string_pretty(&views);
                let rendered = rendered.map_err(|source| Error::Json {
                    origin: "derived type".to_string(),
                    source,
                })?;
                write_output(target.out.as_deref(), &rendered)
            }
        }
    }
}

#[derive(serde::Serialize)]
struct JsonView<'a> {
    origin: &'a str,
    #[serde(rename = "type")]
    ty: &'a Ty,
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Schemas are independent, so each gets its own deriver on the rayon pool.
fn derive_all(schemas: &[LoadedSchema], options: &DeriveOptions) -> Vec<Ty> {
    schemas
        .par_iter()
        .map(|loaded| {
            let mut deriver = Deriver::new(options.clone());
            let ty = deriver.derive(&loaded.schema);
            log::debug!("derived {} ({} cache hits)", loaded.origin, deriver.cache_hits());
            ty
        })
        .collect()
}

fn read_source(path: &Path) -> Result<String> {
    let read = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    };
    read.map_err(|source| Error::Read { path: path.to_path_buf(), source })
}

fn write_output(out: Option<&Path>, src: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{src}");
        return Ok(());
    };
    let write_error = |source| Error::Write { path: out.to_path_buf(), source };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(out, src).map_err(write_error)?;
    info!("wrote {}", out.display());
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                return Err(Error::NoMatch { pattern: pattern.to_string() });
            }
        } else {
            // literal path, or '-' for stdin
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
