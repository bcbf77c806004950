use fintrack_domain::{Category, FinanceSnapshot, NamedEntity, TransactionKind};

/// Lookup helpers for the append-only category list.
pub struct CategoryService;

impl CategoryService {
    pub fn add(snapshot: &mut FinanceSnapshot, category: Category) -> Category {
        snapshot.categories.push(category.clone());
        category
    }

    /// First category whose name equals `name` exactly.
    pub fn find<'a>(snapshot: &'a FinanceSnapshot, name: &str) -> Option<&'a Category> {
        snapshot
            .categories
            .iter()
            .find(|category| category.name() == name)
    }

    /// Categories usable for transactions of `kind`.
    pub fn for_kind(snapshot: &FinanceSnapshot, kind: TransactionKind) -> Vec<&Category> {
        snapshot
            .categories
            .iter()
            .filter(|category| category.kind.accepts(kind))
            .collect()
    }
}
