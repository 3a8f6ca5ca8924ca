//! Resolver cases loaded from `tests/fixtures/resolve.toml`.

#![cfg(unix)]

use std::path::{Path, PathBuf};

use serde::Deserialize;
use vize_cadre::{AliasRule, AliasRules, PathResolver, Resolved};

#[derive(Debug, Deserialize)]
struct Alias {
    find: String,
    replacement: String,
}

/// A resolver case: exactly one of `path` / `bare` is expected.
#[derive(Debug, Deserialize)]
struct TestCase {
    name: String,
    specifier: String,
    resolve_dir: Option<PathBuf>,
    path: Option<PathBuf>,
    bare: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    base: PathBuf,
    #[serde(default)]
    aliases: Vec<Alias>,
    cases: Vec<TestCase>,
}

fn load_fixture() -> Fixture {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("resolve.toml");
    let content = std::fs::read_to_string(&path).unwrap();
    toml::from_str(&content).unwrap()
}

#[test]
fn resolve_fixture_cases() {
    let fixture = load_fixture();
    let aliases: AliasRules = fixture
        .aliases
        .iter()
        .map(|a| AliasRule::new(a.find.as_str(), a.replacement.as_str()))
        .collect();
    let resolver = PathResolver::new(fixture.base.clone(), aliases);

    assert!(!fixture.cases.is_empty());
    for case in &fixture.cases {
        let expected = match (&case.path, &case.bare) {
            (Some(path), None) => Resolved::Path(path.clone()),
            (None, Some(bare)) => Resolved::Bare(bare.clone()),
            _ => panic!("case `{}` must set exactly one of path / bare", case.name),
        };
        let actual = resolver.resolve(&case.specifier, case.resolve_dir.as_deref());
        assert_eq!(actual, expected, "case `{}`", case.name);
    }
}

#[test]
fn resolution_is_absolute_for_path_results() {
    let fixture = load_fixture();
    let resolver = PathResolver::new(fixture.base.clone(), AliasRules::default());
    for case in &fixture.cases {
        if let Resolved::Path(path) = resolver.resolve(&case.specifier, case.resolve_dir.as_deref()) {
            assert!(path.is_absolute(), "case `{}`: {}", case.name, path.display());
        }
    }
}
