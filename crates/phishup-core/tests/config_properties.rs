//! Property tests for config patching.
//!
//! Exercises the round-trip invariant (untouched keys survive byte-for-byte
//! and in order) and the no-partial-write guarantee against generated
//! documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use proptest::prelude::*;
use serde_json::{Map, Value};
use tempfile::TempDir;

use phishup_core::{config, Error};

/// Keys reserved by the real gophish document; generated extras avoid them.
const RESERVED: [&str; 2] = ["listen_url", "phish_server"];

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn extra_keys() -> impl Strategy<Value = BTreeMap<String, Value>> {
    proptest::collection::btree_map(
        "[a-z]{3,8}".prop_filter("reserved", |k| !RESERVED.contains(&k.as_str())),
        scalar(),
        0..6,
    )
}

/// Build the on-disk fixture: listen_url first, generated extras, then the
/// nested phish_server section.
fn write_document(dir: &Path, extras: &BTreeMap<String, Value>) -> String {
    let mut document = Map::new();
    document.insert("listen_url".to_string(), Value::String(String::new()));
    for (key, value) in extras {
        document.insert(key.clone(), value.clone());
    }
    let mut section = Map::new();
    section.insert("use_tls".to_string(), Value::Bool(false));
    section.insert("cert_path".to_string(), Value::String(String::new()));
    section.insert("key_path".to_string(), Value::String(String::new()));
    document.insert("phish_server".to_string(), Value::Object(section));

    let mut text = serde_json::to_string_pretty(&document).expect("serialize fixture");
    text.push('\n');
    fs::write(dir.join(config::CONFIG_FILE), &text).expect("write fixture");
    text
}

proptest! {
    #[test]
    fn resolving_patch_touches_only_its_keys(
        extras in extra_keys(),
        addr in "[a-z0-9.:]{1,16}",
        cert in "/[a-z/]{1,24}",
    ) {
        let dir = TempDir::new().expect("temp dir");
        write_document(dir.path(), &extras);

        config::patch(
            dir.path(),
            vec![
                ("listen_url".to_string(), Value::String(addr.clone())),
                ("phish_server.cert_path".to_string(), Value::String(cert.clone())),
            ],
        )
        .expect("patch should resolve");

        let document = config::load(dir.path()).expect("reload");

        // patched keys carry the new values
        prop_assert_eq!(&document["listen_url"], &Value::String(addr));
        prop_assert_eq!(
            &document["phish_server"]["cert_path"],
            &Value::String(cert)
        );

        // untouched keys are unchanged, nested ones included
        for (key, value) in &extras {
            prop_assert_eq!(&document[key], value);
        }
        prop_assert_eq!(&document["phish_server"]["use_tls"], &Value::Bool(false));
        prop_assert_eq!(
            &document["phish_server"]["key_path"],
            &Value::String(String::new())
        );

        // key order is exactly the fixture's order
        let keys: Vec<&String> = document.keys().collect();
        let mut expected = vec!["listen_url".to_string()];
        expected.extend(extras.keys().cloned());
        expected.push("phish_server".to_string());
        prop_assert_eq!(keys, expected.iter().collect::<Vec<_>>());
    }

    #[test]
    fn unresolvable_section_leaves_the_file_untouched(
        extras in extra_keys(),
        section in "[a-z]{9,12}",
        value in "[a-z0-9]{0,8}",
    ) {
        // generated section names are 9+ chars, extras at most 8, so the
        // section can never exist in the document
        let dir = TempDir::new().expect("temp dir");
        let before = write_document(dir.path(), &extras);

        let result = config::patch(
            dir.path(),
            vec![
                ("listen_url".to_string(), Value::String("changed".to_string())),
                (format!("{section}.subkey"), Value::String(value)),
            ],
        );

        prop_assert!(
            matches!(result, Err(Error::SectionNotFound { .. })),
            "expected SectionNotFound error"
        );

        let after = fs::read_to_string(dir.path().join(config::CONFIG_FILE))
            .expect("read back");
        prop_assert_eq!(after, before);
    }

    #[test]
    fn flat_overwrite_may_change_type(extras in extra_keys()) {
        let dir = TempDir::new().expect("temp dir");
        write_document(dir.path(), &extras);

        // listen_url starts as a string; overwrite it with a boolean
        config::patch(
            dir.path(),
            vec![("listen_url".to_string(), Value::Bool(true))],
        )
        .expect("patch should resolve");

        let document = config::load(dir.path()).expect("reload");
        prop_assert_eq!(&document["listen_url"], &Value::Bool(true));
    }
}
