use crate::normalize::normalize_name;
use crate::registry::BackRef;
use crate::value::{CitValue, PathSegment, ValuePath};
use crate::statics;
use indexmap::IndexMap;

/// Keyword lists driving the entity scan. All entries are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Category keywords in priority order (substring match).
    pub keywords: Vec<String>,
    /// Substrings that exclude a name from every category.
    pub ignore_terms: Vec<String>,
    /// Whole words dropped by the normalizer.
    pub ignore_words: Vec<String>,
}

impl ScanConfig {
    pub fn new<K, T, W>(keywords: K, ignore_terms: T, ignore_words: W) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        fn lowered<I>(items: I) -> Vec<String>
        where
            I: IntoIterator,
            I::Item: AsRef<str>,
        {
            items
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        }

        Self {
            keywords: lowered(keywords),
            ignore_terms: lowered(ignore_terms),
            ignore_words: lowered(ignore_words),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(
            statics::DEFAULT_KEYWORDS.iter(),
            statics::DEFAULT_IGNORE_TERMS.iter(),
            statics::DEFAULT_IGNORE_WORDS.iter(),
        )
    }
}

/// keyword -> base name -> back-references, all in first-seen traversal order.
pub type ScanResult = IndexMap<String, IndexMap<String, Vec<BackRef>>>;

/// Walk every object in the tree and group named entities by category keyword and base name.
///
/// Names containing an ignore term are skipped entirely. Otherwise the first keyword
/// (in priority order) contained in the lowercased name decides the category. Entities
/// whose base name normalizes to nothing are dropped. Nodes whose `name` is missing or
/// not a string are skipped without error, but their children are still visited.
pub fn scan_entities(root: &CitValue, config: &ScanConfig) -> ScanResult {
    let mut found = ScanResult::new();
    let mut path = ValuePath::root();
    visit(root, &mut path, config, &mut found);
    found
}

fn visit(node: &CitValue, path: &mut ValuePath, config: &ScanConfig, found: &mut ScanResult) {
    match node {
        CitValue::Object(map) => {
            if let Some(name) = map.get(statics::CIT_KEY_NAME).and_then(CitValue::as_str) {
                classify(name, path, config, found);
            }
            for (key, child) in map {
                path.push(PathSegment::Key(key.clone()));
                visit(child, path, config, found);
                path.pop();
            }
        }
        CitValue::Array(values) => {
            for (idx, child) in values.iter().enumerate() {
                path.push(PathSegment::Index(idx));
                visit(child, path, config, found);
                path.pop();
            }
        }
        _ => {}
    }
}

fn classify(name: &str, path: &ValuePath, config: &ScanConfig, found: &mut ScanResult) {
    if name.is_empty() {
        return;
    }
    let lname = name.to_lowercase();
    if config.ignore_terms.iter().any(|ig| lname.contains(ig.as_str())) {
        return;
    }
    let Some(keyword) = config.keywords.iter().find(|k| lname.contains(k.as_str())) else {
        return;
    };

    let base = normalize_name(name, config.ignore_words.as_slice());
    if base.is_empty() {
        tracing::debug!(%name, %keyword, "dropping entity with empty base name");
        return;
    }

    found
        .entry(keyword.clone())
        .or_default()
        .entry(base)
        .or_default()
        .push(BackRef::name_of(path.clone(), name));
}

/// Group a flat list of entities by exact `name`, in first-occurrence order.
/// `list_path` is where `entities` sits in the document. Items that are not objects,
/// or whose name is missing, empty or not a string, are skipped.
pub fn unique_names(entities: &[CitValue], list_path: &ValuePath) -> IndexMap<String, Vec<BackRef>> {
    let mut by_name: IndexMap<String, Vec<BackRef>> = IndexMap::new();
    for (idx, entity) in entities.iter().enumerate() {
        let Some(name) = entity.get(statics::CIT_KEY_NAME).and_then(CitValue::as_str) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        by_name
            .entry(name.to_string())
            .or_default()
            .push(BackRef::name_of(list_path.child_index(idx), name));
    }
    by_name
}
