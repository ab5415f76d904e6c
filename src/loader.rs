//! Reading graphs from disk.
//!
//! Two plain-text formats are understood:
//!
//! * Edge lists: one edge per line, the two endpoints separated by a comma or by whitespace.
//!   Blank lines and lines starting with `#` or `%` are ignored.
//! * Pajek networks (`.net`): a `*Vertices n` header followed by `id "label"` lines, then
//!   `*Edges` or `*Arcs` sections of `source target [weight]` lines. Weights are ignored and arcs
//!   are treated as undirected edges.
//!
//! Both produce an undirected [`Graph`] with self-loops rejected and repeated edges merged.

use std::path::Path;

use log::debug;

use crate::error::SisError;
use crate::graph::Graph;

/// Reads the graph at `path`, choosing the format from the file extension: `.net` files are
/// read as Pajek, everything else as an edge list.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn load_graph(path: &Path) -> Result<Graph, SisError> {
    let data = std::fs::read_to_string(path)?;
    let graph = match path.extension().and_then(|extension| extension.to_str()) {
        Some("net") => parse_pajek(&data)?,
        _ => parse_edge_list(&data)?,
    };
    debug!(
        "loaded {} ({} nodes, mean degree {:.2})",
        path.display(),
        graph.node_count(),
        graph.mean_degree()
    );
    Ok(graph)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('%')
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect()
}

/// Parses an edge list.
///
/// # Errors
///
/// Returns [`SisError::ParseError`] for a line without two endpoints and
/// [`SisError::CannotMakeEdgeToSelf`] for a self-loop.
pub fn parse_edge_list(data: &str) -> Result<Graph, SisError> {
    let mut graph = Graph::new();
    for (index, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        let fields = split_fields(line);
        if fields.len() < 2 {
            return Err(SisError::ParseError {
                line: index + 1,
                message: format!("expected two endpoints, found `{line}`"),
            });
        }
        let source = graph.add_node(fields[0]);
        let target = graph.add_node(fields[1]);
        graph.add_edge(source, target)?;
    }
    Ok(graph)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PajekSection {
    Preamble,
    Vertices,
    Edges,
}

/// Parses a Pajek network. Vertices are keyed by their id and labelled with their quoted label
/// when present, so distinct vertices may share a label. Edges may refer to vertices not listed
/// in the `*Vertices` section.
///
/// # Errors
///
/// Returns [`SisError::ParseError`] for malformed lines and [`SisError::CannotMakeEdgeToSelf`]
/// for a self-loop.
pub fn parse_pajek(data: &str) -> Result<Graph, SisError> {
    let mut graph = Graph::new();
    let mut section = PajekSection::Preamble;

    for (index, line) in data.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if let Some(header) = line.strip_prefix('*') {
            let keyword = header
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase();
            section = match keyword.as_str() {
                "vertices" => PajekSection::Vertices,
                "edges" | "arcs" | "edgeslist" | "arcslist" => PajekSection::Edges,
                _ => {
                    return Err(SisError::ParseError {
                        line: line_number,
                        message: format!("unsupported section `*{header}`"),
                    })
                }
            };
            continue;
        }

        match section {
            PajekSection::Preamble => {
                return Err(SisError::ParseError {
                    line: line_number,
                    message: "data before the first section header".to_string(),
                });
            }
            PajekSection::Vertices => {
                let (id, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                let label = rest
                    .trim()
                    .strip_prefix('"')
                    .and_then(|quoted| quoted.split_once('"'))
                    .map_or(id, |(label, _)| label);
                graph.add_labelled_node(id, label);
            }
            PajekSection::Edges => {
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() < 2 {
                    return Err(SisError::ParseError {
                        line: line_number,
                        message: format!("expected two endpoints, found `{line}`"),
                    });
                }
                let source = graph.add_node(fields[0]);
                let target = graph.add_node(fields[1]);
                graph.add_edge(source, target)?;
            }
        }
    }
    Ok(graph)
}
