use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use provenance::{GlyphSummary, InputRecord, Run};
use serde::Serialize;
use serde_json::json;
use skelform::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "skelform")]
#[command(about = "Random-but-valid point placements for constraint-described glyph skeletons")]
struct Cmd {
    /// Log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve a spec and write point maps for `count` variants
    Solve {
        #[arg(long)]
        spec: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        count: u64,
        /// Output file; stdout if omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List position constraints implied by longer chains
    Redundant {
        #[arg(long)]
        spec: PathBuf,
    },
    /// Convert outline polylines into minimized specs
    Convert {
        #[arg(long)]
        outline: PathBuf,
        /// Only convert the glyph with this name
        #[arg(long)]
        glyph: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Serialize)]
struct VariantOut {
    index: u64,
    points: BTreeMap<String, [f64; 2]>,
    unplaced: Vec<String>,
}

#[derive(Serialize)]
struct SolveOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    glyph: Option<String>,
    links: Vec<String>,
    redundant: Vec<String>,
    variants: Vec<VariantOut>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Solve {
            spec,
            seed,
            count,
            out,
        } => solve_cmd(&spec, seed, count, out.as_deref()),
        Action::Redundant { spec } => redundant_cmd(&spec),
        Action::Convert {
            outline,
            glyph,
            out,
        } => convert_cmd(&outline, glyph.as_deref(), out.as_deref()),
        Action::Report => report(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<(T, InputRecord)> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok((value, InputRecord::new(path, bytes.len())))
}

fn write_output(out: Option<&Path>, body: &[u8]) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{}", String::from_utf8_lossy(body));
            Ok(())
        }
    }
}

fn solve_cmd(spec_path: &Path, seed: u64, count: u64, out: Option<&Path>) -> Result<()> {
    let (spec, input): (Spec, _) = read_json(spec_path)?;
    let sanitized = sanitize(&spec);
    tracing::info!(
        spec = %spec_path.display(),
        nodes = sanitized.nodes.len(),
        position = sanitized.position.len(),
        side = sanitized.side.len(),
        seed,
        count,
        "solve"
    );
    let cfg = SolveCfg::default();
    let variants: Vec<VariantOut> = (0..count)
        .map(|index| {
            let mut sampler = SeededSampler::new(ReplayToken::new(seed, index));
            let sol = solve_sanitized(&sanitized, &mut sampler, &cfg);
            if !sol.unplaced.is_empty() {
                tracing::warn!(index, unplaced = ?sol.unplaced, "partial placement");
            }
            VariantOut {
                index,
                points: sol
                    .points
                    .iter()
                    .map(|(id, p)| (id.to_string(), [p.x, p.y]))
                    .collect(),
                unplaced: sol.unplaced,
            }
        })
        .collect();
    let doc = SolveOut {
        glyph: sanitized.glyph.clone(),
        links: sanitized.links.clone(),
        redundant: sanitized.redundant.iter().map(ToString::to_string).collect(),
        variants,
    };
    write_output(out, &serde_json::to_vec_pretty(&doc)?)?;
    if let Some(path) = out {
        let run = Run::Solve {
            seed,
            variants: doc.variants.iter().map(|v| v.index).collect(),
            partial: doc
                .variants
                .iter()
                .filter(|v| !v.unplaced.is_empty())
                .map(|v| v.index)
                .collect(),
            cfg,
            raw: GlyphSummary::of_spec(&spec),
            sanitized: GlyphSummary::of_sanitized(&sanitized),
            redundant: doc.redundant,
        };
        provenance::write_sidecar(path, &input, &run)?;
    }
    Ok(())
}

fn redundant_cmd(spec_path: &Path) -> Result<()> {
    let (spec, _): (Spec, _) = read_json(spec_path)?;
    let sanitized = sanitize(&spec);
    for c in &sanitized.redundant {
        println!("{c}");
    }
    Ok(())
}

fn convert_cmd(outline_path: &Path, glyph: Option<&str>, out: Option<&Path>) -> Result<()> {
    let (font, input): (Vec<Outline>, _) = read_json(outline_path)?;
    tracing::info!(outline = %outline_path.display(), glyphs = font.len(), "convert");
    let (body, specs) = match glyph {
        Some(name) => {
            let Some(outline) = font.iter().find(|o| o.name == name) else {
                bail!("glyph {name:?} not found in {}", outline_path.display());
            };
            let spec = convert(outline);
            (serde_json::to_vec_pretty(&spec)?, vec![spec])
        }
        None => {
            let specs = convert_all(&font);
            (serde_json::to_vec_pretty(&specs)?, specs)
        }
    };
    write_output(out, &body)?;
    if let Some(path) = out {
        let run = Run::Convert {
            glyphs: specs.iter().map(GlyphSummary::of_spec).collect(),
        };
        provenance::write_sidecar(path, &input, &run)?;
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::code_rev(),
        "version": skelform::VERSION,
        "cfg": SolveCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
