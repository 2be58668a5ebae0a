use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::dist::Dist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlanOp {
    RemoveFetched,
    Fetch,
    RemoveExtracted,
    Extract,
    Unlink,
    Link,
}

impl PlanOp {
    pub const ORDER: [PlanOp; 6] = [
        PlanOp::RemoveFetched,
        PlanOp::Fetch,
        PlanOp::RemoveExtracted,
        PlanOp::Extract,
        PlanOp::Unlink,
        PlanOp::Link,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RemoveFetched => "remove-fetched",
            Self::Fetch => "fetch",
            Self::RemoveExtracted => "remove-extracted",
            Self::Extract => "extract",
            Self::Unlink => "unlink",
            Self::Link => "link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    prefix: PathBuf,
    ops: BTreeMap<PlanOp, Vec<Dist>>,
}

impl ActionPlan {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            ops: BTreeMap::new(),
        }
    }

    pub fn link_only(prefix: impl Into<PathBuf>, dists: impl IntoIterator<Item = Dist>) -> Self {
        let mut plan = Self::new(prefix);
        for dist in dists {
            plan.push(PlanOp::Link, dist);
        }
        plan
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn push(&mut self, op: PlanOp, dist: Dist) {
        self.ops.entry(op).or_default().push(dist);
    }

    pub fn scheduled(&self, op: PlanOp) -> &[Dist] {
        self.ops.get(&op).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ops_in_order(&self) -> impl Iterator<Item = (PlanOp, &[Dist])> + '_ {
        PlanOp::ORDER
            .iter()
            .map(move |op| (*op, self.scheduled(*op)))
            .filter(|(_, dists)| !dists.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.ops.values().all(Vec::is_empty)
    }

    pub fn op_count(&self) -> usize {
        self.ops.values().map(Vec::len).sum()
    }
}
