use std::collections::{HashMap, HashSet};

/// Traversal never descends further than this below the requested root.
pub const MAX_DEPTH: usize = 512;

/// Parent → direct children for every process in one snapshot, monitored or
/// not. Built per call and dropped afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessTree {
    children: HashMap<u32, Vec<u32>>,
}

pub fn build_tree<I>(links: I) -> ProcessTree
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
    for (pid, ppid) in links {
        if pid == ppid {
            continue;
        }
        children.entry(ppid).or_default().push(pid);
    }
    ProcessTree { children }
}

impl ProcessTree {
    pub fn children_of(&self, pid: u32) -> &[u32] {
        self.children.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first pre-order below `pid`, siblings in the order they were
    /// observed. Each pid appears at most once and `pid` itself never does,
    /// even if the links contain a cycle.
    pub fn descendants_of(&self, pid: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([pid]);
        let mut stack: Vec<(u32, usize)> = self
            .children_of(pid)
            .iter()
            .rev()
            .map(|&child| (child, 1))
            .collect();

        while let Some((current, depth)) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            out.push(current);
            if depth >= MAX_DEPTH {
                continue;
            }
            stack.extend(
                self.children_of(current)
                    .iter()
                    .rev()
                    .map(|&child| (child, depth + 1)),
            );
        }
        out
    }
}
