//! Collection expansion: one shared path or one path per element

use std::collections::HashSet;

use super::path::PathResolver;
use crate::error::RenderError;
use crate::value::Value;

/// How the elements of a collection map onto partial paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Every element resolves to the same path
    Homogeneous { path: String },
    /// Elements resolve to differing paths (or there are none), in order
    Heterogeneous { paths: Vec<String> },
}

/// Resolve every element's path; a resolution failure aborts the expansion
pub fn expand(collection: &[Value], resolver: &PathResolver<'_>) -> Result<Expansion, RenderError> {
    let paths = collection
        .iter()
        .map(|element| resolver.resolve(element))
        .collect::<Result<Vec<_>, _>>()?;

    let distinct: HashSet<&str> = paths.iter().map(String::as_str).collect();
    if distinct.len() == 1 {
        let path = paths.into_iter().next().unwrap_or_default();
        return Ok(Expansion::Homogeneous { path });
    }
    Ok(Expansion::Heterogeneous { paths })
}
