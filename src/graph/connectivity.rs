use bitvec::prelude::*;

use super::adjacency::Graph;

impl Graph {
    /// Counts connected components by repeated depth-first search.
    ///
    /// An isolated vertex is its own component; the empty graph has none.
    pub fn component_count(&self) -> usize {
        let n = self.num_vertices();
        let mut visited = bitvec![0; n];
        let mut stack = Vec::new();
        let mut components = 0;

        for root in 0..n {
            if visited[root] {
                continue;
            }
            components += 1;
            visited.set(root, true);
            stack.push(root);
            while let Some(v) = stack.pop() {
                for &w in self.neighbors(v) {
                    if !visited[w] {
                        visited.set(w, true);
                        stack.push(w);
                    }
                }
            }
        }
        components
    }

    /// Returns true as soon as an articulation point (cutpoint) is found.
    ///
    /// Single DFS rooted at vertex 0, computing discovery numbers and the
    /// shallowest back-edge target (`back`) of every subtree. The traversal
    /// starts at vertex 0's first neighbor; vertex 0 itself is a cutpoint iff
    /// that traversal misses one of its other neighbors.
    ///
    /// Vertices unreachable from vertex 0 are not examined, and an isolated
    /// vertex 0 reports `false`; component counting covers both cases.
    ///
    /// The DFS keeps its own frame stack, so depth is bounded by memory and
    /// not by the thread stack.
    ///
    /// # Complexity
    /// * Time: O(V + E)
    /// * Space: O(V)
    pub fn has_articulation_point(&self) -> bool {
        let n = self.num_vertices();
        if n == 0 {
            return false;
        }
        let Some(&first) = self.neighbors(0).first() else {
            return false;
        };

        let mut dfs_number = vec![0usize; n];
        let mut back = vec![0usize; n];
        dfs_number[0] = 1;
        back[0] = 1;
        let mut counter = 2;
        dfs_number[first] = counter;
        back[first] = counter;

        // (vertex, index of the next neighbor to look at)
        let mut frames = vec![(first, 0usize)];
        while let Some(frame) = frames.last_mut() {
            let v = frame.0;
            if let Some(&w) = self.neighbors(v).get(frame.1) {
                frame.1 += 1;
                if dfs_number[w] == 0 {
                    counter += 1;
                    dfs_number[w] = counter;
                    back[w] = counter;
                    frames.push((w, 0));
                } else {
                    back[v] = back[v].min(dfs_number[w]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                // no back edge from v's subtree climbs above its parent
                if back[v] >= dfs_number[parent] {
                    return true;
                }
                back[parent] = back[parent].min(back[v]);
            }
        }

        // root case
        self.neighbors(0)[1..].iter().any(|&w| dfs_number[w] == 0)
    }
}
