use crate::char_map::CharMap;
use crate::mtch::PatternId;
use std::collections::VecDeque;

type StateId = u32;

const ROOT: StateId = 0;

/// Aho-Corasick automaton over a fixed set of patterns.
///
/// States live in an arena and refer to each other by index. Failure links point at the state for
/// the longest proper suffix of the current prefix that is also a prefix of some pattern.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Automaton {
    nodes: Vec<Node>,
    /// Length, in characters, of each pattern.
    lengths: Vec<u32>,
}

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Node {
    children: CharMap<StateId>,
    fail: StateId,
    /// Pattern ending exactly at this state.
    output: Option<PatternId>,
    /// Nearest state along the failure chain (excluding self) with an output.
    output_link: Option<StateId>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: CharMap::new(),
            fail: ROOT,
            output: None,
            output_link: None,
        }
    }
}

impl Automaton {
    /// Builds the automaton. The i-th pattern gets `PatternId` i. Empty patterns are assigned an id
    /// but never reported.
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ret = Self {
            nodes: vec![Node::new()],
            lengths: Vec::new(),
        };
        for pattern in patterns {
            ret.insert(pattern);
        }
        ret.link();
        ret
    }

    fn insert(&mut self, pattern: &str) {
        let id = self.lengths.len();
        let mut current = ROOT;
        let mut length = 0;
        for c in pattern.chars() {
            length += 1;
            current = match self.nodes[current as usize].children.get(c) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len() as StateId;
                    self.nodes.push(Node::new());
                    self.nodes[current as usize].children.insert(c, next);
                    next
                }
            };
        }
        self.lengths.push(length);
        if current != ROOT {
            // If the same pattern is inserted twice, the first id wins.
            self.nodes[current as usize].output.get_or_insert(id);
        }
    }

    /// Computes failure and output links, breadth first so that every suffix state is final before
    /// it is referenced.
    fn link(&mut self) {
        let mut queue = VecDeque::new();
        self.nodes[ROOT as usize]
            .children
            .for_each(|_, child| queue.push_back(child));

        let mut children = Vec::new();
        while let Some(state) = queue.pop_front() {
            children.clear();
            self.nodes[state as usize]
                .children
                .for_each(|c, child| children.push((c, child)));

            for &(c, child) in &children {
                let fail = self.step(self.nodes[state as usize].fail, c);
                let fail_node = &self.nodes[fail as usize];
                let output_link = if fail_node.output.is_some() {
                    Some(fail)
                } else {
                    fail_node.output_link
                };

                let node = &mut self.nodes[child as usize];
                node.fail = fail;
                node.output_link = output_link;
                queue.push_back(child);
            }
        }
    }

    /// Follows `c` from `state`, falling back along failure links as needed.
    fn step(&self, mut state: StateId, c: char) -> StateId {
        loop {
            if let Some(next) = self.nodes[state as usize].children.get(c) {
                return next;
            }
            if state == ROOT {
                return ROOT;
            }
            state = self.nodes[state as usize].fail;
        }
    }

    /// Scans `haystack` once, calling `f(pattern, start, end)` for every occurrence. Offsets are in
    /// characters, `end` exclusive.
    pub fn for_each_match(&self, haystack: &str, mut f: impl FnMut(PatternId, usize, usize)) {
        let mut state = ROOT;
        for (i, c) in haystack.chars().enumerate() {
            state = self.step(state, c);

            let node = &self.nodes[state as usize];
            let mut cursor = if node.output.is_some() {
                Some(state)
            } else {
                node.output_link
            };
            while let Some(matched) = cursor {
                let node = &self.nodes[matched as usize];
                if let Some(id) = node.output {
                    let end = i + 1;
                    f(id, end - self.lengths[id] as usize, end);
                }
                cursor = node.output_link;
            }
        }
    }

    /// Number of states, including the root.
    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }
}
