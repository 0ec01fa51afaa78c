use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sparrow_algorithms::route_search::sparrow_search::SearchResult;
use statrs::statistics::Statistics;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

fn create<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn write_route<W: Write>(mut writer: W, route: &[usize]) -> Result<()> {
    for node in route {
        writeln!(writer, "{}", node)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_route<P: AsRef<Path>>(path: P, route: &[usize]) -> Result<()> {
    write_route(create(path)?, route)
}

/// One node index per line; blank lines are skipped.
pub fn parse_route<R: BufRead>(reader: R) -> Result<Vec<usize>> {
    let mut route = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let node = line
            .parse::<usize>()
            .with_context(|| format!("Invalid node index '{}' on line {}", line, line_no + 1))?;
        route.push(node);
    }
    Ok(route)
}

pub fn read_route<P: AsRef<Path>>(path: P) -> Result<Vec<usize>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_route(BufReader::new(file))
}

pub fn write_node_visits<W: Write>(mut writer: W, visit_counts: &[u64]) -> Result<()> {
    for (node, count) in visit_counts.iter().enumerate() {
        writeln!(writer, "{} {}", node, count)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_edge_visits<W: Write>(mut writer: W, result: &SearchResult) -> Result<()> {
    for row in result.edge_visits.outer_iter() {
        let line = row
            .iter()
            .map(|count| count.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RouteStats {
    pub nodes: usize,
    pub route_length: f64,
    pub iterations: usize,
    pub population: usize,
    pub most_visited_node: usize,
    pub most_visited_count: u64,
    pub least_visited_node: usize,
    pub least_visited_count: u64,
    pub mean_visits: f64,
    pub visit_std_dev: f64,
    pub visits_p25: u64,
    pub visits_median: u64,
    pub visits_p75: u64,
}

impl RouteStats {
    /// Summarises the in+out traversal tally of every node, the same counts
    /// written to the node visits file.
    pub fn from_result(result: &SearchResult) -> Self {
        Self::from_visits(result, &result.node_visit_totals())
    }

    /// Takes the route fields from `result` and the distribution fields from
    /// `visits`, one count per node. Ties go to the lowest node index and
    /// quantiles are the nearest rank below.
    pub fn from_visits(result: &SearchResult, visits: &[u64]) -> Self {
        let mut most = (0, visits.first().copied().unwrap_or(0));
        let mut least = most;
        for (node, &count) in visits.iter().enumerate().skip(1) {
            if count > most.1 {
                most = (node, count);
            }
            if count < least.1 {
                least = (node, count);
            }
        }

        let mut sorted = visits.to_vec();
        sorted.sort_unstable();
        let quantile = |q: f64| {
            sorted
                .get((sorted.len() as f64 * q) as usize)
                .copied()
                .unwrap_or(0)
        };

        let values: Vec<f64> = visits.iter().map(|&c| c as f64).collect();
        let (mean_visits, visit_std_dev) = if values.is_empty() {
            (0.0, 0.0)
        } else {
            (values.iter().mean(), values.iter().population_std_dev())
        };
        Self {
            nodes: visits.len(),
            route_length: result.best_fitness,
            iterations: result.iterations,
            population: result.population_size,
            most_visited_node: most.0,
            most_visited_count: most.1,
            least_visited_node: least.0,
            least_visited_count: least.1,
            mean_visits,
            visit_std_dev,
            visits_p25: quantile(0.25),
            visits_median: sorted.get(sorted.len() / 2).copied().unwrap_or(0),
            visits_p75: quantile(0.75),
        }
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "nodes: {}", self.nodes)?;
        writeln!(writer, "route_length: {}", self.route_length)?;
        writeln!(writer, "iterations: {}", self.iterations)?;
        writeln!(writer, "population: {}", self.population)?;
        writeln!(writer, "most_visited_node: {}", self.most_visited_node)?;
        writeln!(writer, "most_visited_count: {}", self.most_visited_count)?;
        writeln!(writer, "least_visited_node: {}", self.least_visited_node)?;
        writeln!(writer, "least_visited_count: {}", self.least_visited_count)?;
        writeln!(writer, "mean_visits: {}", self.mean_visits)?;
        writeln!(writer, "visit_std_dev: {}", self.visit_std_dev)?;
        writeln!(writer, "visits_p25: {}", self.visits_p25)?;
        writeln!(writer, "visits_median: {}", self.visits_median)?;
        writeln!(writer, "visits_p75: {}", self.visits_p75)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads back the `key: value` lines written by [`RouteStats::write`].
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut fields = serde_json::Map::new();
        for line in reader.lines() {
            let line = line?;
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value: serde_json::Value = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid value for '{}'", key.trim()))?;
            fields.insert(key.trim().to_string(), value);
        }
        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| anyhow!("Incomplete stats: {}", e))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportPaths {
    pub route: Option<PathBuf>,
    pub stats: Option<PathBuf>,
    pub node_visits: Option<PathBuf>,
    pub edge_visits: Option<PathBuf>,
}

pub fn write_report(result: &SearchResult, paths: &ReportPaths) -> Result<()> {
    if let Some(path) = &paths.route {
        save_route(path, &result.best_route)?;
    }
    if let Some(path) = &paths.stats {
        RouteStats::from_result(result).write(create(path)?)?;
    }
    if let Some(path) = &paths.node_visits {
        write_node_visits(create(path)?, &result.node_visit_totals())?;
    }
    if let Some(path) = &paths.edge_visits {
        write_edge_visits(create(path)?, result)?;
    }
    Ok(())
}
