//! `<artifact>.provenance.json` sidecars: which input produced an artifact,
//! and the seed, variant indices, and solver settings behind it.

use anyhow::{Context, Result};
use serde::Serialize;
use skelform::prelude::{Sanitized, SolveCfg, Spec};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Input file as read by a command.
#[derive(Debug, Serialize)]
pub struct InputRecord {
    pub path: String,
    pub bytes: usize,
}

impl InputRecord {
    pub fn new(path: &Path, bytes: usize) -> Self {
        Self {
            path: path.to_string_lossy().into_owned(),
            bytes,
        }
    }
}

/// Size of one glyph spec: declared nodes, links, and constraint counts.
#[derive(Debug, PartialEq, Serialize)]
pub struct GlyphSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    pub nodes: usize,
    pub links: usize,
    pub position: usize,
    pub side: usize,
}

impl GlyphSummary {
    pub fn of_spec(spec: &Spec) -> Self {
        Self {
            glyph: spec.glyph.clone(),
            nodes: spec.nodes.len(),
            links: spec.links.len(),
            position: spec.constraints.position.len(),
            side: spec.constraints.side.len(),
        }
    }

    /// Counts after sanitizing; `position` is the closed set.
    pub fn of_sanitized(s: &Sanitized) -> Self {
        Self {
            glyph: s.glyph.clone(),
            nodes: s.nodes.len(),
            links: s.links.len(),
            position: s.position.len(),
            side: s.side.len(),
        }
    }
}

/// What a command did to produce its artifact.
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Run {
    Solve {
        seed: u64,
        variants: Vec<u64>,
        /// Variants cut short by the iteration cap.
        partial: Vec<u64>,
        cfg: SolveCfg,
        raw: GlyphSummary,
        sanitized: GlyphSummary,
        redundant: Vec<String>,
    },
    Convert {
        glyphs: Vec<GlyphSummary>,
    },
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    version: &'static str,
    callsite: Callsite,
    input: &'a InputRecord,
    run: &'a Run,
    output: String,
}

/// Write the sidecar next to `artifact`; returns its path.
#[track_caller]
pub fn write_sidecar(artifact: &Path, input: &InputRecord, run: &Run) -> Result<PathBuf> {
    let path = sidecar_path(artifact);
    let callsite = Location::caller();
    let doc = Sidecar {
        code_rev: code_rev(),
        version: skelform::VERSION,
        callsite: Callsite {
            file: callsite.file(),
            line: callsite.line(),
        },
        input,
        run,
        output: artifact.to_string_lossy().into_owned(),
    };
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `points.json` → `points.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// `GIT_COMMIT` if set, else `git rev-parse HEAD`, else `"unknown"`.
pub fn code_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use skelform::prelude::{sanitize, ConstraintTokens};
    use tempfile::tempdir;

    fn chain_spec() -> Spec {
        Spec {
            glyph: Some("I".into()),
            nodes: vec!["a".into(), "b".into(), "c".into()],
            links: vec!["a,b,c".into(), "a,q".into()],
            constraints: ConstraintTokens {
                position: vec!["a>b".into(), "b>c".into(), "a>c".into(), "a>q".into()],
                side: vec![],
            },
        }
    }

    #[test]
    fn sidecar_path_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/output/points.json")),
            Path::new("/tmp/output/points.provenance.json")
        );
        assert_eq!(sidecar_path(Path::new("points")), Path::new("points.provenance.json"));
    }

    #[test]
    fn summaries_count_raw_and_closed_sets() {
        let spec = chain_spec();
        let raw = GlyphSummary::of_spec(&spec);
        assert_eq!((raw.nodes, raw.links, raw.position), (3, 2, 4));
        let kept = GlyphSummary::of_sanitized(&sanitize(&spec));
        // `a>q` is dropped and `a,q` shrinks to `a`; the closure of a>b>c has 3 pairs.
        assert_eq!((kept.links, kept.position), (2, 3));
    }

    #[test]
    fn solve_sidecar_records_seed_cfg_and_input() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("points.json");
        fs::write(&artifact, "{}").unwrap();
        let spec = chain_spec();
        let sanitized = sanitize(&spec);
        let run = Run::Solve {
            seed: 9,
            variants: vec![0, 1],
            partial: vec![],
            cfg: SolveCfg::default(),
            raw: GlyphSummary::of_spec(&spec),
            sanitized: GlyphSummary::of_sanitized(&sanitized),
            redundant: sanitized.redundant.iter().map(ToString::to_string).collect(),
        };
        let input = InputRecord::new(Path::new("glyph.json"), 120);
        let path = write_sidecar(&artifact, &input, &run).unwrap();

        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["run"]["command"], "solve");
        assert_eq!(doc["run"]["seed"], 9);
        assert_eq!(doc["run"]["variants"][1], 1);
        assert_eq!(doc["run"]["cfg"]["max_iterations"], 1000);
        assert_eq!(doc["run"]["redundant"][0], "a>c");
        assert_eq!(doc["run"]["raw"]["glyph"], "I");
        assert_eq!(doc["input"]["bytes"], 120);
        assert_eq!(doc["output"], artifact.to_string_lossy().as_ref());
        assert!(doc["callsite"]["file"].as_str().unwrap().ends_with("provenance.rs"));
    }
}
