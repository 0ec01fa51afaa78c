use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sparrow_challenges::Graph;
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

/// Parses an adjacency matrix: a node count line, then one comma
/// separated row of weights per node.
pub fn parse_graph_csv<R: Read>(reader: R) -> Result<Graph> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or_else(|| anyhow!("Graph file is empty"))?
        .context("Failed to read node count")?;
    let num_nodes: usize = header
        .get(0)
        .ok_or_else(|| anyhow!("Missing node count"))?
        .parse()
        .with_context(|| format!("Invalid node count '{}'", &header[0]))?;

    let mut weight_matrix = Vec::with_capacity(num_nodes);
    for (row, record) in records.enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", row))?;
        if row >= num_nodes {
            return Err(anyhow!(
                "Graph file has more than {} weight rows",
                num_nodes
            ));
        }
        let weights = record
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                cell.parse::<f64>()
                    .with_context(|| format!("Invalid weight '{}' at row {}, column {}", cell, row, col))
            })
            .collect::<Result<Vec<f64>>>()?;
        if weights.len() != num_nodes {
            return Err(anyhow!(
                "Row {} has {} weights. Expected: '{}'",
                row,
                weights.len(),
                num_nodes
            ));
        }
        weight_matrix.push(weights);
    }
    if weight_matrix.len() != num_nodes {
        return Err(anyhow!(
            "Graph file has {} weight rows. Expected: '{}'",
            weight_matrix.len(),
            num_nodes
        ));
    }
    Ok(Graph::new(weight_matrix)?)
}

pub fn read_graph_csv<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_graph_csv(file).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn write_graph_csv_to<W: Write>(writer: W, graph: &Graph) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    writer.write_record([graph.num_nodes().to_string()])?;
    for row in graph.weight_matrix() {
        writer.write_record(row.iter().map(|w| w.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_graph_csv<P: AsRef<Path>>(path: P, graph: &Graph) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_graph_csv_to(file, graph)
}

#[derive(Serialize, Deserialize)]
struct CoordRow {
    node: usize,
    x: f64,
    y: f64,
}

pub fn write_coords_csv<P: AsRef<Path>>(path: P, node_positions: &[(f64, f64)]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for (node, &(x, y)) in node_positions.iter().enumerate() {
        writer.serialize(CoordRow { node, x, y })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_coords_csv<P: AsRef<Path>>(path: P) -> Result<Vec<(f64, f64)>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut node_positions = Vec::new();
    for row in reader.deserialize::<CoordRow>() {
        let row = row.with_context(|| format!("Failed to parse {}", path.display()))?;
        if row.node != node_positions.len() {
            return Err(anyhow!(
                "Coordinates out of order: got node {}, expected node {}",
                row.node,
                node_positions.len()
            ));
        }
        node_positions.push((row.x, row.y));
    }
    Ok(node_positions)
}
