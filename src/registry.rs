use crate::error::CitError;
use crate::scan::{ScanConfig, ScanResult, scan_entities, unique_names};
use crate::statics;
use crate::value::{CitValue, ValuePath};
use indexmap::IndexMap;

/// Where a display name is stored: the owning object and the field inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackRef {
    pub owner: ValuePath,
    pub field: String,
    /// The string found in the field when the registry was built (or last saved).
    /// `None` if the field was absent or not a string.
    pub loaded: Option<String>,
}

impl BackRef {
    pub fn new(owner: ValuePath, field: &str, loaded: Option<String>) -> Self {
        Self {
            owner,
            field: field.to_string(),
            loaded,
        }
    }

    /// The `name` field of the object at `owner`, currently holding `name`.
    pub fn name_of(owner: ValuePath, name: &str) -> Self {
        Self::new(owner, statics::CIT_KEY_NAME, Some(name.to_string()))
    }

    /// Overwrite (or insert) the field with `text`.
    pub fn write(&self, root: &mut CitValue, text: &str) -> Result<(), CitError> {
        let owner = root
            .pointer_mut(&self.owner)
            .and_then(CitValue::as_object_mut)
            .ok_or_else(|| CitError::StaleReference {
                owner: self.owner.to_string(),
                field: self.field.clone(),
            })?;
        owner.insert(self.field.clone(), CitValue::String(text.to_string()));
        Ok(())
    }
}

/// One editable field. Once edited, committing writes `text` into every back-reference.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub label: String,
    /// 1-based position inside the category.
    pub ordinal: usize,
    pub text: String,
    /// Text as of the last load or successful save.
    pub saved_text: String,
    /// Set by any user edit since the last load or save, even one that restores `saved_text`.
    pub edited: bool,
    pub refs: Vec<BackRef>,
}

impl RegistryEntry {
    pub fn new(label: String, ordinal: usize, text: String, refs: Vec<BackRef>) -> Self {
        Self {
            label,
            ordinal,
            saved_text: text.clone(),
            text,
            edited: false,
            refs,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.edited = true;
    }

    pub fn is_modified(&self) -> bool {
        self.edited || self.text != self.saved_text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub label: String,
    pub entries: Vec<RegistryEntry>,
}

impl Category {
    fn from_groups(label: String, prefix: &str, groups: IndexMap<String, Vec<BackRef>>) -> Self {
        let entries = groups
            .into_iter()
            .enumerate()
            .map(|(i, (name, refs))| {
                RegistryEntry::new(format!("{prefix} {}", i + 1), i + 1, name, refs)
            })
            .collect();
        Self { label, entries }
    }
}

/// Ordered categories of editable entries, rebuilt from scratch on every load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub categories: Vec<Category>,
}

impl Registry {
    /// City, Districts and Streets first, then one category per discovered keyword.
    pub fn build(root: &CitValue, config: &ScanConfig) -> Self {
        let found = scan_entities(root, config);
        Self::build_with_scan(root, found)
    }

    pub(crate) fn build_with_scan(root: &CitValue, found: ScanResult) -> Self {
        let mut categories = Vec::with_capacity(3 + found.len());

        let city_name = root
            .get(statics::CIT_KEY_CITY_NAME)
            .and_then(CitValue::as_str)
            .map(str::to_string);
        categories.push(Category {
            label: statics::EN_CATEGORY_CITY.to_string(),
            entries: vec![RegistryEntry::new(
                statics::EN_ENTRY_CITY_NAME.to_string(),
                1,
                city_name.clone().unwrap_or_default(),
                vec![BackRef::new(
                    ValuePath::root(),
                    statics::CIT_KEY_CITY_NAME,
                    city_name,
                )],
            )],
        });

        for (key, category, prefix) in [
            (
                statics::CIT_KEY_DISTRICTS,
                statics::EN_CATEGORY_DISTRICTS,
                statics::EN_ENTRY_DISTRICT,
            ),
            (
                statics::CIT_KEY_STREETS,
                statics::EN_CATEGORY_STREETS,
                statics::EN_ENTRY_STREET,
            ),
        ] {
            let list = root.get(key).and_then(CitValue::as_array).unwrap_or(&[]);
            let groups = unique_names(list, &ValuePath::root().child_key(key));
            categories.push(Category::from_groups(category.to_string(), prefix, groups));
        }

        for (keyword, groups) in found {
            let label = capitalize(&keyword);
            categories.push(Category::from_groups(label.clone(), &label, groups));
        }

        Self { categories }
    }

    pub fn category(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn category_mut(&mut self, label: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.label == label)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    pub fn modified_count(&self) -> usize {
        self.entries().filter(|e| e.is_modified()).count()
    }

    /// Write every entry into all of its back-references and return the number of writes.
    ///
    /// An edited entry writes its text into every reference. An unedited entry writes
    /// each reference's own loaded value back, so grouping several names under one
    /// base name never rewrites them by itself. Fields that were absent at load and
    /// belong to an unedited entry are left absent.
    pub fn commit(&self, root: &mut CitValue) -> Result<usize, CitError> {
        let mut writes = 0;
        for entry in self.entries() {
            let modified = entry.is_modified();
            for r in &entry.refs {
                match (modified, r.loaded.as_deref()) {
                    (true, _) => r.write(root, &entry.text)?,
                    (false, Some(loaded)) => r.write(root, loaded)?,
                    (false, None) => continue,
                }
                writes += 1;
            }
        }
        Ok(writes)
    }

    /// Record the current texts as saved, clearing every modified flag.
    pub fn mark_saved(&mut self) {
        for category in &mut self.categories {
            for entry in &mut category.entries {
                if entry.is_modified() {
                    for r in &mut entry.refs {
                        r.loaded = Some(entry.text.clone());
                    }
                }
                entry.saved_text.clone_from(&entry.text);
                entry.edited = false;
            }
        }
    }
}

/// First character upper-cased, the rest lower-cased ("sync clinic" -> "Sync clinic").
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{BackRef, Registry, capitalize};
    use crate::scan::ScanConfig;
    use crate::statics;
    use crate::value::{CitValue, ValuePath};

    fn parse(text: &str) -> CitValue {
        CitValue::parse(text).unwrap()
    }

    #[test]
    fn capitalize_matches_keyword_labels() {
        assert_eq!(capitalize("sync clinic"), "Sync clinic");
        assert_eq!(capitalize("'s"), "'s");
        assert_eq!(capitalize("MARKET"), "Market");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn duplicate_districts_share_one_entry() {
        let root = parse(
            r#"{"cityName":"Oldtown","districts":[{"name":"Riverside"},{"name":"Riverside"}],"streets":[]}"#,
        );
        let registry = Registry::build(&root, &ScanConfig::default());

        let labels: Vec<&str> = registry.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["City", "Districts", "Streets"]);

        let city = registry.category(statics::EN_CATEGORY_CITY).unwrap();
        assert_eq!(city.entries.len(), 1);
        assert_eq!(city.entries[0].text, "Oldtown");
        assert_eq!(city.entries[0].label, "City Name");

        let districts = registry.category(statics::EN_CATEGORY_DISTRICTS).unwrap();
        assert_eq!(districts.entries.len(), 1);
        assert_eq!(districts.entries[0].label, "District 1");
        assert_eq!(districts.entries[0].text, "Riverside");
        assert_eq!(districts.entries[0].refs.len(), 2);

        assert!(registry.category(statics::EN_CATEGORY_STREETS).unwrap().entries.is_empty());
        assert_eq!(registry.entry_count(), 2);
    }

    #[test]
    fn keyword_categories_follow_fixed_ones() {
        let root = parse(
            r#"{"cityName":"X","districts":[],"streets":[{"name":"Main"}],
                "buildings":[{"name":"Ray's Diner"},{"name":"Neon Cafe"},{"name":"Ray's"}]}"#,
        );
        let cfg = ScanConfig::new(["diner", "'s", "cafe"], Vec::<&str>::new(), ["diner"]);
        let registry = Registry::build(&root, &cfg);

        let labels: Vec<&str> = registry.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["City", "Districts", "Streets", "Diner", "Cafe", "'s"]);

        let streets = registry.category("Streets").unwrap();
        assert_eq!(streets.entries[0].label, "Street 1");

        let cafe = registry.category("Cafe").unwrap();
        assert_eq!(cafe.entries[0].label, "Cafe 1");
        assert_eq!(cafe.entries[0].text, "Neon Cafe");
    }

    #[test]
    fn missing_lists_and_city_name_still_build_fixed_categories() {
        let registry = Registry::build(&parse("{}"), &ScanConfig::default());
        assert_eq!(registry.categories.len(), 3);
        assert_eq!(registry.entry_count(), 1);
        assert_eq!(registry.entries().next().unwrap().text, "");
    }

    #[test]
    fn commit_fans_out_to_every_reference() {
        let mut root = parse(r#"{"cityName":"A","districts":[{"name":"R"},{"id":1},{"name":"R"}],"streets":[]}"#);
        let mut registry = Registry::build(&root, &ScanConfig::default());
        registry.category_mut("Districts").unwrap().entries[0].text = "Harbor".to_string();
        assert_eq!(registry.modified_count(), 1);

        let writes = registry.commit(&mut root).unwrap();
        assert_eq!(writes, 3);
        let districts = root.get("districts").and_then(CitValue::as_array).unwrap();
        assert_eq!(districts[0].get("name").and_then(CitValue::as_str), Some("Harbor"));
        assert_eq!(districts[1].get("name"), None);
        assert_eq!(districts[2].get("name").and_then(CitValue::as_str), Some("Harbor"));

        registry.mark_saved();
        assert_eq!(registry.modified_count(), 0);
    }

    #[test]
    fn unedited_grouped_names_keep_their_own_text() {
        let mut root = parse(
            r#"{"cityName":"A","shops":[{"name":"Joe's Bakery"},{"name":"JOE'S BAKERY"}]}"#,
        );
        let before = root.clone();
        let mut registry = Registry::build(&root, &ScanConfig::default());
        let bakery = registry.category("Bakery").unwrap();
        assert_eq!(bakery.entries.len(), 1);
        assert_eq!(bakery.entries[0].text, "Joe's");
        assert_eq!(bakery.entries[0].refs.len(), 2);

        registry.commit(&mut root).unwrap();
        assert_eq!(root, before);

        registry.category_mut("Bakery").unwrap().entries[0].text = "Ann's".to_string();
        registry.commit(&mut root).unwrap();
        let shops = root.get("shops").and_then(CitValue::as_array).unwrap();
        for shop in shops {
            assert_eq!(shop.get("name").and_then(CitValue::as_str), Some("Ann's"));
        }

        registry.mark_saved();
        let refs = &registry.category("Bakery").unwrap().entries[0].refs;
        assert!(refs.iter().all(|r| r.loaded.as_deref() == Some("Ann's")));
    }

    #[test]
    fn edit_back_to_shown_text_still_writes_every_reference() {
        let mut root = parse(
            r#"{"cityName":"A","shops":[{"name":"Joe's Bakery"},{"name":"JOE'S BAKERY"}]}"#,
        );
        let mut registry = Registry::build(&root, &ScanConfig::default());
        let entry = &mut registry.category_mut("Bakery").unwrap().entries[0];
        entry.set_text("Joe's X");
        entry.set_text("Joe's");
        assert_eq!(entry.text, entry.saved_text);
        assert_eq!(registry.modified_count(), 1);

        assert_eq!(registry.commit(&mut root).unwrap(), 3);
        let shops = root.get("shops").and_then(CitValue::as_array).unwrap();
        for shop in shops {
            assert_eq!(shop.get("name").and_then(CitValue::as_str), Some("Joe's"));
        }

        registry.mark_saved();
        assert_eq!(registry.modified_count(), 0);
    }

    #[test]
    fn absent_city_name_is_only_written_once_edited() {
        let mut root = parse(r#"{"districts":[]}"#);
        let mut registry = Registry::build(&root, &ScanConfig::default());
        assert_eq!(registry.commit(&mut root).unwrap(), 0);
        assert!(root.get("cityName").is_none());

        registry.category_mut("City").unwrap().entries[0].text = "Newtown".to_string();
        assert_eq!(registry.commit(&mut root).unwrap(), 1);
        assert_eq!(root.get("cityName").and_then(CitValue::as_str), Some("Newtown"));
    }

    #[test]
    fn write_to_missing_owner_is_stale() {
        let mut root = parse(r#"{"a":1}"#);
        let r = BackRef::name_of(ValuePath::root().child_key("gone"), "x");
        let err = r.write(&mut root, "x").unwrap_err();
        assert!(err.to_string().contains("/gone"));
    }
}
