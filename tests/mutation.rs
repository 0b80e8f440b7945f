use cne::{CitValue, ScanConfig, Session, statics};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const CITY: &str = r#"{
  "cityName": "Oldtown",
  "districts": [
    { "name": "Riverside", "id": 1 },
    { "name": "Docks", "id": 2 },
    { "name": "Riverside", "id": 3 }
  ],
  "streets": [
    { "name": "Canal Street" }
  ],
  "buildings": [
    { "name": "Joe's Bakery", "rooms": [ { "name": "Joe's Bakery" } ] },
    { "name": "JOE'S BAKERY", "floor": 2 }
  ]
}"#;

fn open(dir: &tempfile::TempDir) -> Result<Session> {
    let path = dir.path().join("oldtown.cit");
    std::fs::write(&path, CITY)?;
    Ok(Session::open(&path, &ScanConfig::default(), |_| {})?)
}

fn reload(path: &std::path::Path) -> Result<CitValue> {
    Ok(CitValue::parse(&std::fs::read_to_string(path)?)?)
}

#[test]
fn renaming_city_changes_only_city_name() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut session = open(&dir)?;
    let original = session.city.root.clone();

    session
        .registry
        .category_mut(statics::EN_CATEGORY_CITY)
        .ok_or("no city category")?
        .entries[0]
        .text = "Newtown".to_string();

    let out = dir.path().join("newtown.cit");
    session.save_to_path(&out)?;

    let saved = reload(&out)?;
    assert_eq!(saved.get("cityName").and_then(CitValue::as_str), Some("Newtown"));

    let mut expected = original;
    *expected.get_mut("cityName").ok_or("no cityName")? = CitValue::String("Newtown".into());
    assert_eq!(saved, expected);
    Ok(())
}

#[test]
fn district_edit_fans_out_to_every_reference() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut session = open(&dir)?;

    let districts = session
        .registry
        .category_mut(statics::EN_CATEGORY_DISTRICTS)
        .ok_or("no districts")?;
    assert_eq!(districts.entries.len(), 2);
    assert_eq!(districts.entries[0].refs.len(), 2);
    districts.entries[0].text = "Harbourside".to_string();

    let out = dir.path().join("out.cit");
    session.save_to_path(&out)?;

    let saved = reload(&out)?;
    let names: Vec<&str> = saved
        .get("districts")
        .and_then(CitValue::as_array)
        .ok_or("no districts array")?
        .iter()
        .filter_map(|d| d.get("name").and_then(CitValue::as_str))
        .collect();
    assert_eq!(names, vec!["Harbourside", "Docks", "Harbourside"]);
    Ok(())
}

#[test]
fn scanned_entity_edit_reaches_every_nesting_level() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut session = open(&dir)?;

    let bakery = session.registry.category_mut("Bakery").ok_or("no bakery")?;
    assert_eq!(bakery.entries.len(), 1);
    assert_eq!(bakery.entries[0].label, "Bakery 1");
    assert_eq!(bakery.entries[0].text, "Joe's");
    assert_eq!(bakery.entries[0].refs.len(), 3);
    bakery.entries[0].text = "Ann's Bakery".to_string();

    let out = dir.path().join("out.cit");
    session.save_to_path(&out)?;
    assert_eq!(session.registry.modified_count(), 0);

    let saved = reload(&out)?;
    let buildings = saved
        .get("buildings")
        .and_then(CitValue::as_array)
        .ok_or("no buildings")?;
    let name = |v: &CitValue| v.get("name").and_then(CitValue::as_str).map(str::to_string);
    assert_eq!(name(&buildings[0]).as_deref(), Some("Ann's Bakery"));
    assert_eq!(name(&buildings[1]).as_deref(), Some("Ann's Bakery"));
    let room = &buildings[0]
        .get("rooms")
        .and_then(CitValue::as_array)
        .ok_or("no rooms")?[0];
    assert_eq!(name(room).as_deref(), Some("Ann's Bakery"));
    Ok(())
}

#[test]
fn failed_save_leaves_document_untouched_for_retry() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut session = open(&dir)?;
    let original = session.city.root.clone();

    session
        .registry
        .category_mut(statics::EN_CATEGORY_STREETS)
        .ok_or("no streets")?
        .entries[0]
        .text = "Quay Road".to_string();

    let bad = dir.path().join("missing_dir").join("out.cit");
    let err = session.save_to_path(&bad).expect_err("parent dir does not exist");
    assert!(err.is_io());
    assert_eq!(session.city.root, original);
    assert_eq!(session.registry.modified_count(), 1);

    let good = dir.path().join("out.cit");
    session.save_to_path(&good)?;
    let saved = reload(&good)?;
    let street = saved
        .get("streets")
        .and_then(CitValue::as_array)
        .and_then(|s| s.first())
        .and_then(|s| s.get("name"))
        .and_then(CitValue::as_str);
    assert_eq!(street, Some("Quay Road"));
    Ok(())
}

#[test]
fn retyping_the_shown_name_still_renames_every_reference() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut session = open(&dir)?;

    let bakery = session.registry.category_mut("Bakery").ok_or("no bakery")?;
    bakery.entries[0].set_text("Joe's X");
    bakery.entries[0].set_text("Joe's");

    let out = dir.path().join("out.cit");
    session.save_to_path(&out)?;

    let saved = reload(&out)?;
    let buildings = saved
        .get("buildings")
        .and_then(CitValue::as_array)
        .ok_or("no buildings")?;
    let names: Vec<&str> = buildings
        .iter()
        .filter_map(|b| b.get("name").and_then(CitValue::as_str))
        .collect();
    assert_eq!(names, vec!["Joe's", "Joe's"]);
    Ok(())
}
