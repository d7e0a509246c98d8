use std::hash::BuildHasherDefault;
use wyhash::WyHash;

pub type HeaderId = usize;
pub type NodeId = usize;
pub type Level = usize;

/// Identifier of one ZDD variable. Elements are numbered from 1; an
/// element's number equals the level of its header.
pub type ElemId = usize;

pub type DdHashMap<T, U> = std::collections::HashMap<T, U, BuildHasherDefault<WyHash>>;
pub type DdHashSet<T> = std::collections::HashSet<T, BuildHasherDefault<WyHash>>;
