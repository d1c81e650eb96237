//! Configured defaults flowing into definitions.

use crate::common::*;
use entity_doubles::{DoubleConfig, CONFIG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn defaults_flow_into_builder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "lenient = true\nmutable = true\n").unwrap();

    let factory = DoubleFactory::from_config_file(&path).unwrap();
    assert_eq!(
        factory.config(),
        &DoubleConfig {
            lenient: true,
            mutable: true
        }
    );

    let node = factory
        .create(factory.definition("node").fieldable().field("title", "a").build().unwrap())
        .unwrap();
    assert_eq!(node.call("isPublished", &[]).unwrap(), Value::Null);
    node.set_property("title", "b").unwrap();
    assert_eq!(first_value(&node, "title"), Value::from("b"));
}

#[test]
fn written_default_config_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    DoubleConfig::write_default_if_missing(&path).unwrap();

    let factory = DoubleFactory::from_config_file(&path).unwrap();
    assert_eq!(factory.config(), &DoubleConfig::default());
    let definition = factory.definition("node").build().unwrap();
    assert!(!definition.is_lenient());
    assert!(!definition.is_mutable());
}

#[test]
fn bad_config_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "lenient = \"sometimes\"").unwrap();
    assert!(matches!(
        DoubleFactory::from_config_file(&path),
        Err(DoubleError::Configuration { .. })
    ));
    assert!(matches!(
        DoubleFactory::from_config_file(&dir.path().join("missing.toml")),
        Err(DoubleError::Configuration { .. })
    ));
}

#[test]
fn ids_come_from_an_injected_sequence() {
    use entity_doubles::{IdSequence, Identifier};

    let sequence = IdSequence::new();
    let factory = factory();
    let first = factory.definition("node").next_id(&sequence).build().unwrap();
    let second = factory.definition("node").next_id(&sequence).build().unwrap();
    assert_eq!(first.id(), Some(&Identifier::Int(1)));
    assert_eq!(second.id(), Some(&Identifier::Int(2)));

    let other_run = IdSequence::new();
    let fresh = factory.definition("node").next_id(&other_run).build().unwrap();
    assert_eq!(fresh.id(), Some(&Identifier::Int(1)));
}
