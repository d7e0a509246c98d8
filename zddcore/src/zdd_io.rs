/// Textual serialization of a ZDD.
///
/// The format is one line per non-terminal node in bottom-up order,
/// `id level low high`, where the terminals are written as `B` (empty
/// family) and `T` (unit family) and node ids count up from 2. The root is
/// the node defined on the last line. A terminal root is written as a
/// single `B` or `T` line. The order is determined by a post-order walk
/// following low before high, so dumps of equal families are identical.
use std::io::{self, BufRead, Write};

use common::prelude::*;

use crate::nodes::*;
use crate::zdd::*;

pub fn dump<W: Write>(dd: &ZddManager, f: NodeId, io: &mut W) -> io::Result<()> {
    if f == dd.zero() {
        return writeln!(io, "B");
    }
    if f == dd.one() {
        return writeln!(io, "T");
    }
    let mut ids: DdHashMap<NodeId, u64> = DdHashMap::default();
    dump_impl(dd, f, io, &mut ids)?;
    Ok(())
}

fn dump_impl<W: Write>(
    dd: &ZddManager,
    f: NodeId,
    io: &mut W,
    ids: &mut DdHashMap<NodeId, u64>,
) -> io::Result<u64> {
    if let Some(&id) = ids.get(&f) {
        return Ok(id);
    }
    match dd.get_node(f).unwrap() {
        Node::Zero => Ok(0),
        Node::One => Ok(1),
        Node::Undet => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "undetermined node in dump",
        )),
        Node::NonTerminal(fnode) => {
            let (f0, f1) = (fnode[0], fnode[1]);
            let level = dd.level(f).unwrap();
            let lo = dump_impl(dd, f0, io, ids)?;
            let hi = dump_impl(dd, f1, io, ids)?;
            let id = ids.len() as u64 + 2;
            writeln!(io, "{} {} {} {}", id, level, token(lo), token(hi))?;
            ids.insert(f, id);
            Ok(id)
        }
    }
}

fn token(id: u64) -> String {
    match id {
        0 => "B".to_string(),
        1 => "T".to_string(),
        x => x.to_string(),
    }
}

/// Reads a dump back into the manager. `headers[level - 1]` names the
/// header to use for each level appearing in the input.
pub fn load<R: BufRead>(dd: &mut ZddManager, io: R, headers: &[HeaderId]) -> io::Result<NodeId> {
    let bad = |msg: &str| io::Error::new(io::ErrorKind::InvalidData, msg.to_string());
    let mut nodes: DdHashMap<u64, NodeId> = DdHashMap::default();
    let mut root = None;
    for line in io.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "B" {
            root = Some(dd.zero());
            continue;
        }
        if line == "T" {
            root = Some(dd.one());
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(bad("expected four fields"));
        }
        let id: u64 = fields[0].parse().map_err(|_| bad("bad node id"))?;
        let level: Level = fields[1].parse().map_err(|_| bad("bad level"))?;
        if level == 0 || level > headers.len() {
            return Err(bad("level out of range"));
        }
        let lo = resolve(dd, &nodes, fields[2])?;
        let hi = resolve(dd, &nodes, fields[3])?;
        if hi == dd.zero() {
            return Err(bad("high edge to the empty family"));
        }
        let node = dd.create_node(headers[level - 1], lo, hi);
        nodes.insert(id, node);
        root = Some(node);
    }
    root.ok_or_else(|| bad("empty input"))
}

fn resolve(dd: &ZddManager, nodes: &DdHashMap<u64, NodeId>, tok: &str) -> io::Result<NodeId> {
    match tok {
        "B" => Ok(dd.zero()),
        "T" => Ok(dd.one()),
        _ => {
            let id: u64 = tok
                .parse()
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "bad edge token"))?;
            nodes
                .get(&id)
                .copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "undefined node id"))
        }
    }
}
