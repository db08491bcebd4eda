//! Reading and writing graphs in the `.graph` text format.
//!
//! ```text
//! # graph file
//! 4
//! # Vert  Degree  Neighbors
//!   0       2       1   3
//!   1       2       0   2
//!   2       2       1   3
//!   3       2       2   0
//! ```
//!
//! `#` starts a comment running to the end of the line. The first number is
//! the vertex count; each vertex then gives its id, its degree and that many
//! neighbor ids. Both halves of every edge are listed.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::adjacency::{Graph, MAX_DEGREE};
use crate::error::{Error, Result};

/// Whitespace-separated tokens with the line each came from.
struct Tokens {
    tokens: std::vec::IntoIter<(usize, String)>,
    last_line: usize,
}

impl Tokens {
    fn read<B: BufRead>(reader: B) -> Result<Self> {
        let mut tokens = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let content = line.split('#').next().unwrap_or_default();
            tokens.extend(content.split_whitespace().map(|t| (i + 1, t.to_string())));
        }
        Ok(Tokens {
            tokens: tokens.into_iter(),
            last_line: 0,
        })
    }

    /// Next token parsed as a non-negative integer, with its line.
    fn next_number(&mut self, what: &str) -> Result<(usize, usize)> {
        let Some((line, token)) = self.tokens.next() else {
            return Err(Error::parse(
                self.last_line,
                format!("unexpected end of file, expected {what}"),
            ));
        };
        self.last_line = line;
        let value = token
            .parse()
            .map_err(|_| Error::parse(line, format!("invalid {what} '{token}'")))?;
        Ok((value, line))
    }

    fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

/// Parse a graph from `.graph` text.
///
/// Vertices must appear in order `0..n`, degrees may not exceed
/// [`MAX_DEGREE`], and the neighbor lists must be symmetric and free of
/// self loops and repeats.
pub fn read_graph<B: BufRead>(reader: B) -> Result<Graph> {
    let mut tokens = Tokens::read(reader)?;
    let (n, line) = tokens.next_number("vertex count")?;
    if n < 1 {
        return Err(Error::parse(line, "graph must have at least one vertex"));
    }
    // every vertex needs at least its id and degree
    if n > tokens.remaining() / 2 {
        return Err(Error::parse(
            line,
            format!(
                "{n} vertices declared but only {} numbers follow",
                tokens.remaining()
            ),
        ));
    }

    let mut lists = Vec::with_capacity(n);
    for v in 0..n {
        let (id, line) = tokens.next_number("vertex id")?;
        if id != v {
            return Err(Error::parse(
                line,
                format!("vertex {id} is out of order, expected {v}"),
            ));
        }
        let (degree, line) = tokens.next_number("vertex degree")?;
        if degree > MAX_DEGREE {
            return Err(Error::parse(
                line,
                format!("vertex {v} has degree {degree}, maximum is {MAX_DEGREE}"),
            ));
        }
        let mut nbrs = Vec::with_capacity(degree);
        for _ in 0..degree {
            let (w, line) = tokens.next_number("neighbor")?;
            if w >= n {
                return Err(Error::parse(
                    line,
                    format!("neighbor {w} of vertex {v} is out of range"),
                ));
            }
            nbrs.push(w);
        }
        lists.push(nbrs);
    }

    Graph::from_adjacency(lists)
}

pub fn read_graph_file<P: AsRef<Path>>(path: P) -> Result<Graph> {
    read_graph(BufReader::new(File::open(path)?))
}

/// Write `graph` as `.graph` text, with `comment` as an extra header line
/// when it is not empty.
pub fn write_graph<W: Write>(mut writer: W, graph: &Graph, comment: &str) -> Result<()> {
    writeln!(writer, "# graph file")?;
    if !comment.is_empty() {
        writeln!(writer, "# {comment} ")?;
    }
    writeln!(writer, "{}", graph.num_vertices())?;
    writeln!(writer, "# Vert\tDegree\tNeighbors")?;
    for v in 0..graph.num_vertices() {
        write!(writer, "{v:3}\t{:3}\t", graph.degree(v))?;
        for w in graph.neighbors(v) {
            write!(writer, "{w:3} ")?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "\n# end of graph file")?;
    writer.flush()?;
    Ok(())
}

pub fn write_graph_file<P: AsRef<Path>>(path: P, graph: &Graph, comment: &str) -> Result<()> {
    write_graph(BufWriter::new(File::create(path)?), graph, comment)
}
