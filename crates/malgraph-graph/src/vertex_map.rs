//! First-seen-order renumbering of vertex identifiers.

use std::hash::Hash;

use indexmap::IndexSet;

use crate::error::GraphError;

/// Maps original vertex identifiers onto the dense range `0..len()`.
///
/// Indices are handed out in the order vertices are first encountered.
/// Inserting a vertex that is already present returns its existing index,
/// so the mapping is a bijection between the distinct vertices seen and
/// `0..len()`.
#[derive(Debug, Clone)]
pub struct VertexMap<K> {
    vertices: IndexSet<K>,
}

impl<K: Hash + Eq> Default for VertexMap<K> {
    fn default() -> Self {
        Self {
            vertices: IndexSet::new(),
        }
    }
}

impl<K: Hash + Eq> VertexMap<K> {
    /// Builds a map by walking `vertices` once, in order.
    pub fn from_vertices(
        vertices: impl IntoIterator<Item = K>,
    ) -> Result<Self, GraphError> {
        let mut map = Self::default();
        for vertex in vertices {
            map.insert(vertex)?;
        }
        Ok(map)
    }

    /// Returns the index of `vertex`, assigning the next free index if the
    /// vertex has not been seen before.
    pub fn insert(&mut self, vertex: K) -> Result<u32, GraphError> {
        let (index, _) = self.vertices.insert_full(vertex);
        u32::try_from(index).map_err(|_| GraphError::too_many_vertices())
    }

    /// Returns the index assigned to `vertex`, if any.
    pub fn index_of(&self, vertex: &K) -> Option<u32> {
        self.vertices
            .get_index_of(vertex)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Iterates over vertices in index order.
    pub fn vertices(&self) -> impl Iterator<Item = &K> {
        self.vertices.iter()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn assigns_in_first_seen_order() {
        let map =
            VertexMap::from_vertices(["0x40", "0x10", "0x40", "0x20"]).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of(&"0x40"), Some(0));
        assert_eq!(map.index_of(&"0x10"), Some(1));
        assert_eq!(map.index_of(&"0x20"), Some(2));
        assert_eq!(map.index_of(&"0x30"), None);
        assert_eq!(map.vertices().collect::<Vec<_>>(), [&"0x40", &"0x10", &"0x20"]);
    }

    #[test]
    fn empty_map() {
        let map = VertexMap::<String>::from_vertices([]).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.vertices().count(), 0);
    }

    proptest! {
        /// Every distinct vertex gets exactly one index in `0..n`.
        #[test]
        fn mapping_is_bijection(vertices in vec(0u16..64, 0..128)) {
            let map = VertexMap::from_vertices(vertices.iter().copied()).unwrap();
            let distinct: HashSet<u16> = vertices.iter().copied().collect();
            prop_assert_eq!(map.len(), distinct.len());

            let indices: HashSet<u32> = distinct
                .iter()
                .map(|v| map.index_of(v).unwrap())
                .collect();
            let expected: HashSet<u32> =
                (0..u32::try_from(map.len()).unwrap()).collect();
            prop_assert_eq!(indices, expected);

            for (i, v) in map.vertices().enumerate() {
                prop_assert_eq!(map.index_of(v), Some(u32::try_from(i).unwrap()));
            }
        }

        /// An index is smaller than every index assigned to vertices first
        /// seen after it.
        #[test]
        fn indices_follow_first_occurrence(vertices in vec(0u16..32, 1..64)) {
            let map = VertexMap::from_vertices(vertices.iter().copied()).unwrap();
            let mut first_seen = Vec::new();
            for v in &vertices {
                if !first_seen.contains(v) {
                    first_seen.push(*v);
                }
            }
            let ordered: Vec<u16> = map.vertices().copied().collect();
            prop_assert_eq!(ordered, first_seen);
        }
    }
}
