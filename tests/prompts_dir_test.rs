use std::path::PathBuf;

use promptstore::command::validate::validate_dir;

fn prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts")
}

#[test]
fn test_prompts_directory_exists() {
    assert!(prompts_dir().is_dir());
}

#[test]
fn test_bundled_prompts_are_valid() {
    let required = vec![
        "agent/system.txt".to_string(),
        "agent/instructions.txt".to_string(),
    ];
    let problems = validate_dir(&prompts_dir(), &required).unwrap();
    assert!(problems.is_empty(), "{problems:#?}");
}
