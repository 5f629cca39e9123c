use crate::content::{CategoryEdge, CategoryId, ContentId, ContentType};
use crate::store::{ContentStore, StoreError};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// An in-memory snapshot of the category forest.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    ids: Vec<CategoryId>,
    index: HashMap<CategoryId, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl CategoryTree {
    /// Build the adjacency list from (id, parent id) pairs.
    ///
    /// A parent id with no row of its own still becomes a node, so its
    /// subtree can be resolved.
    pub fn from_edges(edges: &[CategoryEdge]) -> Self {
        let mut tree = Self::default();

        for edge in edges {
            let child = tree.intern(&edge.id);
            if let Some(parent_id) = &edge.parent_id {
                let parent = tree.intern(parent_id);
                if !tree.children[parent].contains(&child) {
                    tree.children[parent].push(child);
                }
                if tree.parents[child].is_none() {
                    tree.parents[child] = Some(parent);
                }
            }
        }

        tree
    }

    fn intern(&mut self, id: &CategoryId) -> usize {
        if let Some(&index) = self.index.get(id) {
            return index;
        }
        let index = self.ids.len();
        self.ids.push(id.clone());
        self.index.insert(id.clone(), index);
        self.parents.push(None);
        self.children.push(Vec::new());
        index
    }

    /// Number of category nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is a node of the tree.
    pub fn contains(&self, id: &CategoryId) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> Vec<&CategoryId> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .map(|(index, _)| &self.ids[index])
            .collect()
    }

    /// Direct children of `id`.
    pub fn children(&self, id: &CategoryId) -> Vec<&CategoryId> {
        match self.index.get(id) {
            Some(&index) => self.children[index].iter().map(|&c| &self.ids[c]).collect(),
            None => Vec::new(),
        }
    }

    /// Every transitive child of `id`, excluding `id` itself.
    ///
    /// Unknown ids and leaves yield the empty set.
    pub fn descendants(&self, id: &CategoryId) -> HashSet<CategoryId> {
        let mut result = HashSet::new();
        let Some(&start) = self.index.get(id) else {
            return result;
        };

        let mut visited = vec![false; self.ids.len()];
        visited[start] = true;
        let mut stack: Vec<usize> = self.children[start].clone();
        let mut cycle_reported = false;

        while let Some(node) = stack.pop() {
            if visited[node] {
                if !cycle_reported {
                    warn!(
                        "Category cycle or shared child detected at '{}' while resolving '{}'",
                        self.ids[node], id
                    );
                    cycle_reported = true;
                }
                continue;
            }
            visited[node] = true;
            result.insert(self.ids[node].clone());
            stack.extend(self.children[node].iter().copied());
        }

        result
    }

    /// `id` together with all of its descendants.
    pub fn subtree(&self, id: &CategoryId) -> HashSet<CategoryId> {
        let mut result = self.descendants(id);
        result.insert(id.clone());
        result
    }

    /// Parent chain of `id`, nearest parent first, ending at a root.
    pub fn ancestors(&self, id: &CategoryId) -> Vec<CategoryId> {
        let mut result = Vec::new();
        let Some(&start) = self.index.get(id) else {
            return result;
        };

        let mut visited = vec![false; self.ids.len()];
        visited[start] = true;
        let mut current = self.parents[start];

        while let Some(node) = current {
            if visited[node] {
                warn!("Category cycle detected at '{}' while walking up from '{}'", self.ids[node], id);
                break;
            }
            visited[node] = true;
            result.push(self.ids[node].clone());
            current = self.parents[node];
        }

        result
    }
}

/// Resolves category subtrees against a content store.
pub struct CategoryResolver<S> {
    store: S,
}

impl<S: ContentStore> CategoryResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the whole category table into a [`CategoryTree`].
    ///
    /// Callers resolving several categories in one request can reuse the
    /// snapshot instead of re-reading the table for each one.
    pub fn tree(&self) -> Result<CategoryTree, StoreError> {
        let edges = self.store.list_all_category_edges()?;
        debug!("Loaded {} category edges", edges.len());
        Ok(CategoryTree::from_edges(&edges))
    }

    /// Every transitive child of `category`, excluding `category` itself.
    pub fn descendants(&self, category: &CategoryId) -> Result<HashSet<CategoryId>, StoreError> {
        Ok(self.tree()?.descendants(category))
    }

    /// `category` together with all of its descendants.
    pub fn subtree(&self, category: &CategoryId) -> Result<HashSet<CategoryId>, StoreError> {
        Ok(self.tree()?.subtree(category))
    }

    /// Items of `content_type` filed under `category` or any sub-category.
    ///
    /// Each id appears once, in the order the store first returned it.
    pub fn content_in_subtree(
        &self,
        content_type: ContentType,
        category: &CategoryId,
    ) -> Result<Vec<ContentId>, StoreError> {
        let mut categories: Vec<CategoryId> = self.subtree(category)?.into_iter().collect();
        categories.sort();

        let ids = self
            .store
            .list_content_in_categories(content_type, &categories)?;

        let mut seen = HashSet::new();
        let unique: Vec<ContentId> = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();

        debug!(
            "{} {} items under '{}' ({} categories)",
            unique.len(),
            content_type,
            category,
            categories.len()
        );
        Ok(unique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn ids(values: &[&str]) -> HashSet<CategoryId> {
        values.iter().map(|v| CategoryId::new(*v)).collect()
    }

    fn litigation_tree() -> CategoryTree {
        CategoryTree::from_edges(&[
            CategoryEdge::root("litigation"),
            CategoryEdge::new("arbitration", Some("litigation")),
            CategoryEdge::new("mediation", Some("litigation")),
            CategoryEdge::new("icc-arbitration", Some("arbitration")),
            CategoryEdge::root("tax"),
            CategoryEdge::new("vat", Some("tax")),
        ])
    }

    // ==================== Descendant Tests ====================

    #[test]
    fn test_descendants_of_litigation() {
        let tree = litigation_tree();
        assert_eq!(
            tree.descendants(&CategoryId::new("litigation")),
            ids(&["arbitration", "mediation", "icc-arbitration"])
        );
    }

    #[test]
    fn test_descendants_of_leaf_is_empty() {
        let tree = litigation_tree();
        assert!(tree.descendants(&CategoryId::new("icc-arbitration")).is_empty());
    }

    #[test]
    fn test_descendants_of_unknown_is_empty() {
        let tree = litigation_tree();
        assert!(tree.descendants(&CategoryId::new("nope")).is_empty());
    }

    #[test]
    fn test_descendants_excludes_self() {
        let tree = litigation_tree();
        let id = CategoryId::new("arbitration");
        let result = tree.descendants(&id);
        assert!(!result.contains(&id));
        assert_eq!(result, ids(&["icc-arbitration"]));
    }

    #[test]
    fn test_disjoint_roots_have_disjoint_descendants() {
        let tree = litigation_tree();
        let a = tree.descendants(&CategoryId::new("litigation"));
        let b = tree.descendants(&CategoryId::new("tax"));
        assert!(a.is_disjoint(&b));
    }

    #[test]
    fn test_subtree_includes_self() {
        let tree = litigation_tree();
        assert_eq!(
            tree.subtree(&CategoryId::new("arbitration")),
            ids(&["arbitration", "icc-arbitration"])
        );
    }

    // ==================== Cycle Guard Tests ====================

    #[test]
    fn test_two_node_cycle_terminates() {
        let tree = CategoryTree::from_edges(&[
            CategoryEdge::new("a", Some("b")),
            CategoryEdge::new("b", Some("a")),
        ]);
        assert_eq!(tree.descendants(&CategoryId::new("a")), ids(&["b"]));
        assert_eq!(tree.descendants(&CategoryId::new("b")), ids(&["a"]));
    }

    #[test]
    fn test_self_loop_terminates_and_excludes_self() {
        let tree = CategoryTree::from_edges(&[CategoryEdge::new("a", Some("a"))]);
        assert!(tree.descendants(&CategoryId::new("a")).is_empty());
    }

    #[test]
    fn test_cycle_below_start_terminates() {
        let tree = CategoryTree::from_edges(&[
            CategoryEdge::root("root"),
            CategoryEdge::new("x", Some("root")),
            CategoryEdge::new("y", Some("x")),
            CategoryEdge::new("z", Some("y")),
            // z -> x closes a loop below root
            CategoryEdge::new("x", Some("z")),
        ]);
        assert_eq!(tree.descendants(&CategoryId::new("root")), ids(&["x", "y", "z"]));
    }

    #[test]
    fn test_ancestors_with_cycle_terminates() {
        let tree = CategoryTree::from_edges(&[
            CategoryEdge::new("a", Some("b")),
            CategoryEdge::new("b", Some("c")),
            CategoryEdge::new("c", Some("a")),
        ]);
        let chain = tree.ancestors(&CategoryId::new("a"));
        assert_eq!(chain, vec![CategoryId::new("b"), CategoryId::new("c")]);
    }

    // ==================== Structure Tests ====================

    #[test]
    fn test_ancestors_nearest_first() {
        let tree = litigation_tree();
        assert_eq!(
            tree.ancestors(&CategoryId::new("icc-arbitration")),
            vec![CategoryId::new("arbitration"), CategoryId::new("litigation")]
        );
        assert!(tree.ancestors(&CategoryId::new("litigation")).is_empty());
    }

    #[test]
    fn test_roots_and_children() {
        let tree = litigation_tree();
        let mut roots: Vec<_> = tree.roots().into_iter().map(|r| r.as_str()).collect();
        roots.sort();
        assert_eq!(roots, vec!["litigation", "tax"]);

        let mut children: Vec<_> = tree
            .children(&CategoryId::new("litigation"))
            .into_iter()
            .map(|c| c.as_str())
            .collect();
        children.sort();
        assert_eq!(children, vec!["arbitration", "mediation"]);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_dangling_parent_becomes_node() {
        let tree = CategoryTree::from_edges(&[CategoryEdge::new("child", Some("missing"))]);
        assert!(tree.contains(&CategoryId::new("missing")));
        assert_eq!(tree.descendants(&CategoryId::new("missing")), ids(&["child"]));
    }

    #[test]
    fn test_empty_tree() {
        let tree = CategoryTree::from_edges(&[]);
        assert!(tree.is_empty());
        assert!(tree.descendants(&CategoryId::new("x")).is_empty());
    }

    // ==================== Resolver Tests ====================

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_category("litigation", None).expect("insert");
        store.insert_category("arbitration", Some("litigation")).expect("insert");
        store.insert_category("mediation", Some("litigation")).expect("insert");
        store.insert_category("icc-arbitration", Some("arbitration")).expect("insert");
        store.insert_category("tax", None).expect("insert");
        store
    }

    #[test]
    fn test_resolver_descendants() {
        let store = seeded_store();
        let resolver = CategoryResolver::new(&store);

        let result = resolver
            .descendants(&CategoryId::new("litigation"))
            .expect("resolve");
        assert_eq!(result, ids(&["arbitration", "mediation", "icc-arbitration"]));
    }

    #[test]
    fn test_resolver_rereads_store_each_call() {
        let store = seeded_store();
        let resolver = CategoryResolver::new(&store);

        resolver.descendants(&CategoryId::new("tax")).expect("resolve");
        store.insert_category("vat", Some("tax")).expect("insert");

        let result = resolver.descendants(&CategoryId::new("tax")).expect("resolve");
        assert_eq!(result, ids(&["vat"]));
    }

    #[test]
    fn test_resolver_propagates_store_errors() {
        let store = seeded_store();
        store.set_unavailable(true);
        let resolver = CategoryResolver::new(&store);

        let result = resolver.descendants(&CategoryId::new("litigation"));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_content_in_subtree_is_self_inclusive_and_deduplicated() {
        let store = seeded_store();
        store.assign_category(ContentType::Article, "a1", "litigation").expect("assign");
        store.assign_category(ContentType::Article, "a2", "icc-arbitration").expect("assign");
        store.assign_category(ContentType::Article, "a3", "tax").expect("assign");
        store.assign_category(ContentType::Service, "s1", "mediation").expect("assign");

        let resolver = CategoryResolver::new(&store);
        let mut articles = resolver
            .content_in_subtree(ContentType::Article, &CategoryId::new("litigation"))
            .expect("list");
        articles.sort();

        assert_eq!(articles, vec![ContentId::new("a1"), ContentId::new("a2")]);
    }
}
