//! Span tree construction from flat, parent-referencing span lists.
//!
//! Pass 1 indexes every span id. Pass 2 resolves parent links by index:
//! - an absent or empty parent id makes a root
//! - a parent id with no matching span makes a root (dangling reference)
//! - a self reference makes a root
//! - a parent cycle is cut at its earliest member in input order
//!
//! Duplicate ids keep the last span; earlier ones are dropped. Children keep
//! input order. Every kept span appears exactly once in the result.

use std::collections::HashMap;

use crate::data::types::TraceSpan;

/// Identity and parent reference of a raw span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLink<'a> {
    pub id: &'a str,
    pub parent_id: Option<&'a str>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Build a forest of `TraceSpan`s from raw spans.
///
/// `link` reads a raw span's id and parent id; `convert` normalizes one raw
/// span without knowledge of the hierarchy.
pub fn build_span_tree<R, L, C>(spans: &[&R], link: L, convert: C) -> Vec<TraceSpan>
where
    L: Fn(&R) -> SpanLink<'_>,
    C: Fn(&R) -> TraceSpan,
{
    let links: Vec<SpanLink<'_>> = spans.iter().map(|&span| link(span)).collect();

    // Pass 1: index by id (last wins)
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(links.len());
    for (i, l) in links.iter().enumerate() {
        if index.insert(l.id, i).is_some() {
            tracing::warn!(span_id = l.id, "Duplicate span id, keeping the later span");
        }
    }
    let alive: Vec<bool> = links
        .iter()
        .enumerate()
        .map(|(i, l)| index.get(l.id) == Some(&i))
        .collect();

    let mut nodes: Vec<Option<TraceSpan>> = spans
        .iter()
        .zip(&alive)
        .map(|(&span, &keep)| keep.then(|| convert(span)))
        .collect();

    // Pass 2: resolve parents by index
    let mut parent_of: Vec<Option<usize>> = links
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if !alive[i] {
                return None;
            }
            let parent_id = l.parent_id.filter(|p| !p.is_empty())?;
            match index.get(parent_id) {
                Some(&p) if p == i => {
                    tracing::warn!(span_id = l.id, "Span is its own parent, treating as root");
                    None
                }
                Some(&p) => Some(p),
                None => {
                    tracing::warn!(
                        span_id = l.id,
                        parent_id,
                        "Parent span not found, treating as root"
                    );
                    None
                }
            }
        })
        .collect();

    break_cycles(&links, &alive, &mut parent_of);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); links.len()];
    let mut roots = Vec::new();
    for i in (0..links.len()).filter(|&i| alive[i]) {
        match parent_of[i] {
            Some(p) => children[p].push(i),
            None => roots.push(i),
        }
    }

    // Pre-order, then attach children bottom-up by walking it in reverse
    let mut order = Vec::with_capacity(links.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev());
    }
    for &i in order.iter().rev() {
        let kids: Vec<TraceSpan> = children[i]
            .iter()
            .filter_map(|&c| nodes[c].take())
            .collect();
        if let Some(node) = nodes[i].as_mut() {
            node.children = kids;
        }
    }

    let forest: Vec<TraceSpan> = roots.iter().filter_map(|&r| nodes[r].take()).collect();
    tracing::debug!(spans = links.len(), roots = forest.len(), "Built span tree");
    forest
}

/// Cut every parent cycle by promoting its earliest member to a root.
fn break_cycles(links: &[SpanLink<'_>], alive: &[bool], parent_of: &mut [Option<usize>]) {
    let mut state = vec![Visit::Unvisited; links.len()];

    for start in 0..links.len() {
        if !alive[start] || state[start] != Visit::Unvisited {
            continue;
        }

        let mut path: Vec<usize> = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                Visit::Done => break,
                Visit::InProgress => {
                    let cycle_start = path.iter().position(|&p| p == i).unwrap_or(0);
                    if let Some(&root) = path[cycle_start..].iter().min() {
                        tracing::warn!(
                            span_id = links[root].id,
                            cycle_len = path.len() - cycle_start,
                            "Parent cycle detected, treating span as root"
                        );
                        parent_of[root] = None;
                    }
                    break;
                }
                Visit::Unvisited => {
                    state[i] = Visit::InProgress;
                    path.push(i);
                    current = parent_of[i];
                }
            }
        }

        for i in path {
            state[i] = Visit::Done;
        }
    }
}
