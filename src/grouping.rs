use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::AssignError;
use crate::model::condition::ConstraintGroup;
use crate::model::entity::{Runner, RunnerName};

type Index = usize;

/// Union-find without path compression. Elements are addressed by the order
/// they were added in.
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    index: HashMap<T, Index>,
    elems: Vec<T>,
    leader: Vec<Index>,
    // non-empty only for leaders
    members: Vec<Vec<Index>>,
}

impl<T> Default for DisjointSet<T> {
    fn default() -> Self {
        DisjointSet { index: HashMap::new(), elems: Vec::new(), leader: Vec::new(), members: Vec::new() }
    }
}

impl<T: Eq + Hash + Clone + Display> DisjointSet<T> {
    pub fn new() -> DisjointSet<T> {
        DisjointSet::default()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn add(&mut self, elem: T) {
        if self.index.contains_key(&elem) {
            return;
        }
        let idx = self.elems.len();
        self.index.insert(elem.clone(), idx);
        self.elems.push(elem);
        self.leader.push(idx);
        self.members.push(vec![idx]);
    }

    fn position(&self, elem: &T) -> Result<Index, AssignError> {
        self.index.get(elem).copied().ok_or_else(|| AssignError::UnknownRunner(elem.to_string()))
    }

    /// The larger group absorbs the smaller one.
    pub fn merge(&mut self, a: &T, b: &T) -> Result<(), AssignError> {
        let mut la = self.leader[self.position(a)?];
        let mut lb = self.leader[self.position(b)?];
        if la == lb {
            return Ok(());
        }
        if self.members[la].len() < self.members[lb].len() {
            std::mem::swap(&mut la, &mut lb);
        }
        let absorbed = std::mem::take(&mut self.members[lb]);
        for idx in &absorbed {
            self.leader[*idx] = la;
        }
        self.members[la].extend(absorbed);
        Ok(())
    }

    pub fn group(&self, elem: &T) -> Option<Vec<T>> {
        let idx = *self.index.get(elem)?;
        Some(self.collect(self.leader[idx]))
    }

    /// Groups ordered by when their leader was added; members in insertion order.
    pub fn groups(&self) -> Vec<Vec<T>> {
        (0..self.elems.len())
            .filter(|idx| self.leader[*idx] == *idx)
            .map(|leader| self.collect(leader))
            .collect()
    }

    fn collect(&self, leader: Index) -> Vec<T> {
        let mut idxs = self.members[leader].clone();
        idxs.sort_unstable();
        idxs.into_iter().map(|idx| self.elems[idx].clone()).collect()
    }
}

/// Merges overlapping constraint groups and drops the singletons, which are
/// unconstrained.
pub fn merge_constraint_groups(
    runners: &[Runner],
    groups: &[ConstraintGroup],
) -> Result<Vec<Vec<RunnerName>>, AssignError> {
    let mut set = DisjointSet::new();
    for runner in runners {
        set.add(runner.name.clone());
    }
    for ConstraintGroup(members) in groups {
        if let Some((first, rest)) = members.split_first() {
            // a lone member is never merged, so check it here
            set.position(first)?;
            for member in rest {
                set.merge(first, member)?;
            }
        }
    }
    Ok(set.groups().into_iter().filter(|group| group.len() > 1).collect())
}
