//! The binary on-disk graph directory.
//!
//! A graph lives in a directory of flat little-endian files, each prefixed
//! with a `u64` record count:
//!
//! | File          | Record                                           |
//! |---------------|--------------------------------------------------|
//! | `first_out`   | `u32` edge offset (count = nodes + 1)            |
//! | `head`        | `u32` node id                                    |
//! | `weight`      | 48 bytes: `min_x`, `max_x`, tag, 3 × payload     |
//! | `coordinates` | `i32` lon, `i32` lat (fixed point 1e6)           |
//! | `heights`     | `i32` metres                                     |
//! | `charger`     | `f64` charging rate in W, 0 = no charger         |

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use watt_core::{Coordinate, NodeId};
use watt_func::{HypOrLin, HyperbolicFunction, LimitedFunction, LinearFunction};

use crate::error::{GraphError, GraphResult};
use crate::TradeoffGraph;

// ── primitives ────────────────────────────────────────────────────────────────

fn read_exact(reader: &mut impl Read, buf: &mut [u8], file: &str) -> GraphResult<()> {
    reader
        .read_exact(buf)
        .map_err(|_| GraphError::Truncated(file.to_string()))
}

fn read_count(reader: &mut impl Read, file: &str) -> GraphResult<usize> {
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf, file)?;
    Ok(u64::from_le_bytes(buf) as usize)
}

fn write_count(writer: &mut impl Write, count: usize) -> GraphResult<()> {
    writer.write_all(&(count as u64).to_le_bytes())?;
    Ok(())
}

fn read_records<T>(
    path: &Path,
    record_size: usize,
    mut parse: impl FnMut(&[u8]) -> T,
) -> GraphResult<Vec<T>> {
    let name = path.display().to_string();
    let mut reader = BufReader::new(File::open(path)?);
    let count = read_count(&mut reader, &name)?;

    let mut buf = vec![0u8; record_size];
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        read_exact(&mut reader, &mut buf, &name)?;
        records.push(parse(&buf));
    }
    Ok(records)
}

fn write_records<T>(
    path: &Path,
    records: &[T],
    mut render: impl FnMut(&T, &mut Vec<u8>),
) -> GraphResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_count(&mut writer, records.len())?;

    let mut buf = Vec::new();
    for record in records {
        buf.clear();
        render(record, &mut buf);
        writer.write_all(&buf)?;
    }
    writer.flush()?;
    Ok(())
}

fn f64_at(buf: &[u8], offset: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    f64::from_le_bytes(bytes)
}

fn i32_at(buf: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    i32::from_le_bytes(bytes)
}

// ── trade-off weight records ──────────────────────────────────────────────────

const TAG_CONSTANT: u64 = 0;
const TAG_LINEAR: u64 = 1;
const TAG_HYPERBOLIC: u64 = 2;

fn render_weight(weight: &LimitedFunction, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&weight.min_x.to_le_bytes());
    buf.extend_from_slice(&weight.max_x.to_le_bytes());
    let (tag, p0, p1, p2) = match weight.function {
        HypOrLin::Constant(c) => (TAG_CONSTANT, c, 0.0, 0.0),
        HypOrLin::Linear(lin) => (TAG_LINEAR, lin.d, lin.b, lin.c),
        HypOrLin::Hyperbolic(hyp) => (TAG_HYPERBOLIC, hyp.a, hyp.b, hyp.c),
    };
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&p0.to_le_bytes());
    buf.extend_from_slice(&p1.to_le_bytes());
    buf.extend_from_slice(&p2.to_le_bytes());
}

fn parse_weight(buf: &[u8]) -> GraphResult<LimitedFunction> {
    let min_x = f64_at(buf, 0);
    let max_x = f64_at(buf, 8);
    let mut tag_bytes = [0u8; 8];
    tag_bytes.copy_from_slice(&buf[16..24]);
    let tag = u64::from_le_bytes(tag_bytes);
    let p0 = f64_at(buf, 24);
    let p1 = f64_at(buf, 32);
    let p2 = f64_at(buf, 40);

    let function = match tag {
        TAG_CONSTANT => HypOrLin::Constant(p0),
        TAG_LINEAR => HypOrLin::Linear(LinearFunction::new(p0, p1, p2)),
        TAG_HYPERBOLIC => HypOrLin::Hyperbolic(HyperbolicFunction::new(p0, p1, p2)),
        other => return Err(GraphError::Malformed(format!("unknown weight tag {other}"))),
    };
    Ok(LimitedFunction::new(min_x, max_x, function))
}

// ── graph directory ───────────────────────────────────────────────────────────

pub fn write_graph(dir: &Path, graph: &TradeoffGraph) -> GraphResult<()> {
    let (first_out, head, weight) = graph.parts();

    write_records(&dir.join("first_out"), first_out, |v, buf| {
        buf.extend_from_slice(&v.to_le_bytes())
    })?;
    write_records(&dir.join("head"), head, |v, buf| {
        buf.extend_from_slice(&v.0.to_le_bytes())
    })?;
    write_records(&dir.join("weight"), weight, |v, buf| render_weight(v, buf))?;
    Ok(())
}

pub fn read_graph(dir: &Path) -> GraphResult<TradeoffGraph> {
    let first_out = read_records(&dir.join("first_out"), 4, |buf| i32_at(buf, 0) as u32)?;
    let head = read_records(&dir.join("head"), 4, |buf| NodeId(i32_at(buf, 0) as u32))?;
    let weight = read_records(&dir.join("weight"), 48, parse_weight)?
        .into_iter()
        .collect::<GraphResult<Vec<_>>>()?;

    TradeoffGraph::from_parts(first_out, head, weight)
}

pub fn write_coordinates(dir: &Path, coordinates: &[Coordinate]) -> GraphResult<()> {
    write_records(&dir.join("coordinates"), coordinates, |c, buf| {
        buf.extend_from_slice(&c.lon.to_le_bytes());
        buf.extend_from_slice(&c.lat.to_le_bytes());
    })
}

pub fn read_coordinates(dir: &Path) -> GraphResult<Vec<Coordinate>> {
    read_records(&dir.join("coordinates"), 8, |buf| Coordinate {
        lon: i32_at(buf, 0),
        lat: i32_at(buf, 4),
    })
}

pub fn write_heights(dir: &Path, heights: &[i32]) -> GraphResult<()> {
    write_records(&dir.join("heights"), heights, |h, buf| {
        buf.extend_from_slice(&h.to_le_bytes())
    })
}

pub fn read_heights(dir: &Path) -> GraphResult<Vec<i32>> {
    read_records(&dir.join("heights"), 4, |buf| i32_at(buf, 0))
}

/// Charging rate per node in watts; `0.0` marks "not a charger".
pub fn write_chargers(dir: &Path, rates: &[f64]) -> GraphResult<()> {
    write_records(&dir.join("charger"), rates, |r, buf| {
        buf.extend_from_slice(&r.to_le_bytes())
    })
}

pub fn read_chargers(dir: &Path) -> GraphResult<Vec<f64>> {
    read_records(&dir.join("charger"), 8, |buf| f64_at(buf, 0))
}
