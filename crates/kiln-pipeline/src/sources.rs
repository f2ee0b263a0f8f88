//! Glob expansion into assets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use kiln_config::Config;

use crate::asset::Asset;
use crate::error::{PipelineError, Result};

/// Matching rules shared by stages and watch bindings: `*` stays inside one
/// directory and dotfiles only match when named explicitly.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Literal directory prefix of a glob pattern.
///
/// Matched files keep their path relative to this base, so
/// `src/styles/**/*` maps `src/styles/a/b.styl` to `a/b.styl` and a literal
/// `index.html` maps to `index.html`.
pub fn glob_base(pattern: &str) -> PathBuf {
    let components: Vec<&str> = pattern.split('/').collect();
    let literal = components
        .iter()
        .take_while(|c| !is_wildcard(c))
        .count();

    // A fully literal pattern names a file: its base is the parent.
    let take = if literal == components.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };

    let mut base = PathBuf::new();
    if pattern.starts_with('/') {
        base.push("/");
    }
    for component in &components[..take] {
        if component.is_empty() || *component == "." {
            continue;
        }
        base.push(component);
    }
    base
}

fn is_wildcard(component: &str) -> bool {
    component.contains(['*', '?', '['])
}

/// Expand project-relative patterns into matched files.
///
/// Returns `(absolute path, path relative to its glob base)` pairs, sorted by
/// absolute path and deduplicated across patterns. Directories are skipped.
pub fn expand(config: &Config, patterns: &[String]) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut matched = BTreeMap::new();

    for pattern in patterns {
        let base = config.resolve(glob_base(pattern));
        let entries = glob::glob_with(&config.resolve_glob(pattern), MATCH_OPTIONS).map_err(|e| {
            PipelineError::Pattern {
                pattern: pattern.clone(),
                message: e.msg.to_string(),
            }
        })?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable path");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let relative = path
                .strip_prefix(&base)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.file_name().map(PathBuf::from).unwrap_or_default());
            matched.entry(path).or_insert(relative);
        }
    }

    Ok(matched.into_iter().collect())
}

/// Expand patterns and read every matched file.
pub async fn collect(config: &Config, patterns: &[String]) -> Result<Vec<Asset>> {
    let mut assets = Vec::new();
    for (path, relative) in expand(config, patterns)? {
        let contents = tokio::fs::read(&path)
            .await
            .map_err(|e| PipelineError::io(&path, e))?;
        assets.push(Asset::new(relative, contents));
    }
    Ok(assets)
}
