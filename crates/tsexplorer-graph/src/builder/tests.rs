use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::hash::FileHash;
use crate::runtime::test_utils::{Fault, FaultyRuntime, TestRuntime, create_test_project};

fn builder(temp: &TempDir) -> GraphBuilder {
    GraphBuilder::new()
        .root(temp.path())
        .runtime(Arc::new(TestRuntime::new(temp.path().to_path_buf())))
}

fn hash_of(maps: &ParserMaps, root: &Path, relative: &str) -> FileHash {
    maps.file_by_path(&root.join(relative))
        .unwrap_or_else(|| panic!("{relative} missing from graph"))
        .hash
        .clone()
}

fn imported_paths(maps: &ParserMaps, root: &Path, relative: &str) -> Vec<PathBuf> {
    let hash = hash_of(maps, root, relative);
    let mut paths: Vec<PathBuf> = maps
        .imports_of(&hash)
        .map(|target| maps.files[target].path.clone())
        .collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_shared_import_is_parsed_once() {
    let temp = create_test_project(&[
        ("index.ts", "import './a';\nimport './b';\n"),
        ("a.ts", "import { c } from './c';\nexport const a = c;\n"),
        ("b.ts", "import { c } from './c';\nexport const b = c;\n"),
        ("c.ts", "export const c = 1;\n"),
    ]);

    let maps = builder(&temp).entry("index.ts").build().await.unwrap();

    assert_eq!(maps.files.len(), 4);
    let c = hash_of(&maps, temp.path(), "c.ts");
    assert_eq!(maps.importers_of(&c).count(), 2);
    assert_eq!(maps.statistics().import_edges, 4);
}

#[tokio::test]
async fn test_import_cycle_terminates() {
    let temp = create_test_project(&[
        ("a.ts", "import './b';\nexport const a = 1;\n"),
        ("b.ts", "import './a';\nexport const b = 2;\n"),
    ]);

    let maps = builder(&temp).entry("a.ts").build().await.unwrap();

    assert_eq!(maps.files.len(), 2);
    assert_eq!(
        imported_paths(&maps, temp.path(), "a.ts"),
        vec![temp.path().join("b.ts")]
    );
    assert_eq!(
        imported_paths(&maps, temp.path(), "b.ts"),
        vec![temp.path().join("a.ts")]
    );
}

#[tokio::test]
async fn test_self_import_records_edge_without_reparsing() {
    let temp = create_test_project(&[("a.ts", "import './a';\nexport const a = 1;\n")]);

    let maps = builder(&temp).entry("a.ts").build().await.unwrap();

    assert_eq!(maps.files.len(), 1);
    assert_eq!(
        imported_paths(&maps, temp.path(), "a.ts"),
        vec![temp.path().join("a.ts")]
    );
}

#[tokio::test]
async fn test_identical_content_at_different_paths() {
    let temp = create_test_project(&[
        ("index.ts", "import './a';\nimport './b';\n"),
        ("a.ts", "export const same = 1;\n"),
        ("b.ts", "export const same = 1;\n"),
    ]);

    let maps = builder(&temp).entry("index.ts").build().await.unwrap();

    assert_eq!(maps.files.len(), 3);
    assert_ne!(
        hash_of(&maps, temp.path(), "a.ts"),
        hash_of(&maps, temp.path(), "b.ts")
    );
}

#[tokio::test]
async fn test_types_package_collapses_onto_runtime_package() {
    let temp = create_test_project(&[
        (
            "index.ts",
            "import foo from 'foo';\nimport type { Foo } from '@types/foo';\n",
        ),
        (
            "node_modules/foo/package.json",
            r#"{ "name": "foo", "version": "1.0.0", "main": "index.js" }"#,
        ),
        ("node_modules/foo/index.js", "module.exports = {};\n"),
        (
            "node_modules/@types/foo/package.json",
            r#"{ "name": "@types/foo", "version": "1.0.3", "types": "index.d.ts" }"#,
        ),
        ("node_modules/@types/foo/index.d.ts", "export type Foo = {};\n"),
    ]);

    let maps = builder(&temp).entry("index.ts").build().await.unwrap();

    assert_eq!(maps.packages.len(), 1);
    assert_eq!(maps.packages["foo"].version, "1.0.0");

    let index = hash_of(&maps, temp.path(), "index.ts");
    assert_eq!(maps.packages_of(&index).collect::<Vec<_>>(), vec!["foo"]);
    // node_modules files are skipped by default
    assert_eq!(maps.files.len(), 1);
}

#[tokio::test]
async fn test_node_modules_files_parsed_when_not_skipped() {
    let temp = create_test_project(&[
        ("index.ts", "import foo from 'foo';\n"),
        (
            "node_modules/foo/package.json",
            r#"{ "name": "foo", "version": "3.1.4", "main": "index.js" }"#,
        ),
        ("node_modules/foo/index.js", "require('./util');\n"),
        ("node_modules/foo/util.js", "module.exports = 1;\n"),
    ]);

    let maps = builder(&temp)
        .entry("index.ts")
        .skip_node_modules(false)
        .build()
        .await
        .unwrap();

    assert_eq!(maps.files.len(), 3);
    assert!(maps.file_by_path(&temp.path().join("node_modules/foo/util.js")).is_some());
    assert_eq!(maps.packages["foo"].version, "3.1.4");
}

#[tokio::test]
async fn test_node_extraction_disabled() {
    let temp = create_test_project(&[
        ("index.ts", "import './a';\nconst x = 1;\n"),
        ("a.ts", "export function f() { return 2; }\n"),
    ]);

    let maps = builder(&temp)
        .entry("index.ts")
        .resolve_file_nodes(false)
        .build()
        .await
        .unwrap();

    assert_eq!(maps.files.len(), 2);
    assert!(maps.node_files.is_empty());
    assert!(maps.node_parents.is_empty());
    assert!(maps.file_nodes.values().all(Vec::is_empty));
}

#[tokio::test]
async fn test_node_parents_stay_within_file() {
    let temp = create_test_project(&[
        ("index.ts", "import { a } from './a';\nexport const b = a * 2;\n"),
        ("a.ts", "export const a = (() => 21)();\n"),
    ]);

    let maps = builder(&temp).entry("index.ts").build().await.unwrap();

    for (file, nodes) in &maps.file_nodes {
        let own: FxHashSet<_> = nodes.iter().map(|node| &node.hash).collect();
        for node in nodes {
            if let Some(parent) = &node.parent_hash {
                assert!(own.contains(parent));
                assert_eq!(maps.parent_of(file, &node.hash), Some(parent));
            }
        }
    }
}

#[tokio::test]
async fn test_identical_nodes_in_sibling_files() {
    let files = [
        ("index.ts", "import './x';
import './y';
"),
        ("x.ts", "f(a)"),
        ("y.ts", "g(a)"),
    ];
    let temp = create_test_project(&files);

    let mut results = Vec::new();
    for pool_size in [1, 2, 4] {
        let maps = builder(&temp)
            .entry("index.ts")
            .pool_size(pool_size)
            .build()
            .await
            .unwrap();
        results.push(maps);
    }
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));

    let maps = &results[0];
    let y = hash_of(maps, temp.path(), "y.ts");
    let call = maps
        .nodes_of(&y)
        .iter()
        .find(|node| node.kind == "CallExpression")
        .unwrap();
    assert!(
        maps.node_children(&y, &call.hash)
            .iter()
            .any(|node| node.text == "a")
    );
}

#[tokio::test]
async fn test_pool_size_does_not_change_result() {
    let files = [
        ("index.ts", "import './a';\nimport './b';\nimport './c';\n"),
        ("a.ts", "import './d';\nimport './e';\nexport const a = 1;\n"),
        ("b.ts", "import './e';\nimport './f';\nexport const b = 2;\n"),
        ("c.ts", "import './f';\nimport './index';\nexport const c = 3;\n"),
        ("d.ts", "import './g';\nexport const d = 4;\n"),
        ("e.ts", "import './g';\nimport './a';\nexport const e = 5;\n"),
        ("f.ts", "export const f = 6;\n"),
        ("g.ts", "import './missing';\nexport const g = 7;\n"),
    ];
    let temp = create_test_project(&files);

    let serial = builder(&temp)
        .entry("index.ts")
        .pool_size(1)
        .build()
        .await
        .unwrap();
    let parallel = builder(&temp)
        .entry("index.ts")
        .pool_size(4)
        .build()
        .await
        .unwrap();

    assert_eq!(serial.files.len(), 8);
    assert_eq!(serial, parallel);
}

#[tokio::test]
async fn test_dangling_import_is_dropped() {
    let temp = create_test_project(&[
        ("index.ts", "import './gone';\nimport './here';\n"),
        ("here.ts", "export {};\n"),
    ]);

    let maps = builder(&temp).entry("index.ts").build().await.unwrap();

    assert_eq!(maps.files.len(), 2);
    assert_eq!(
        imported_paths(&maps, temp.path(), "index.ts"),
        vec![temp.path().join("here.ts")]
    );
}

#[tokio::test]
async fn test_empty_import_target_is_dropped() {
    let temp = create_test_project(&[
        ("index.ts", "import './blank';\n"),
        ("blank.ts", ""),
    ]);

    let maps = builder(&temp).entry("index.ts").build().await.unwrap();

    assert_eq!(maps.files.len(), 1);
    assert_eq!(maps.statistics().import_edges, 0);
}

fn failing_project() -> TempDir {
    create_test_project(&[
        ("index.ts", "import './a';\nimport './b';\n"),
        ("a.ts", "import './poison';\nimport './c';\n"),
        ("b.ts", "import './d';\n"),
        ("c.ts", "export const c = 1;\n"),
        ("d.ts", "export const d = 1;\n"),
        ("poison.ts", "export const p = 1;\n"),
    ])
}

async fn build_with_fault(temp: &TempDir, fault: Fault) -> ParserMaps {
    let runtime = FaultyRuntime::new(temp.path().to_path_buf(), "poison.ts", fault);

    GraphBuilder::new()
        .root(temp.path())
        .entry("index.ts")
        .pool_size(2)
        .runtime(Arc::new(runtime))
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_unreadable_import_drops_only_its_edge() {
    let temp = failing_project();
    let maps = build_with_fault(&temp, Fault::Error).await;

    assert!(maps.file_by_path(&temp.path().join("poison.ts")).is_none());
    assert_eq!(
        imported_paths(&maps, temp.path(), "a.ts"),
        vec![temp.path().join("c.ts")]
    );
    assert_eq!(
        imported_paths(&maps, temp.path(), "b.ts"),
        vec![temp.path().join("d.ts")]
    );
    assert_eq!(maps.files.len(), 5);
}

#[tokio::test]
async fn test_job_panic_is_isolated() {
    let temp = failing_project();
    let maps = build_with_fault(&temp, Fault::Panic).await;

    // a.ts was discovered by index.ts, but its own job contributed nothing
    let a = hash_of(&maps, temp.path(), "a.ts");
    assert_eq!(maps.imports_of(&a).count(), 0);
    assert!(maps.file_by_path(&temp.path().join("c.ts")).is_none());
    assert!(maps.file_by_path(&temp.path().join("poison.ts")).is_none());

    // Unrelated jobs still completed
    assert_eq!(
        imported_paths(&maps, temp.path(), "b.ts"),
        vec![temp.path().join("d.ts")]
    );
    assert_eq!(maps.files.len(), 4);
}

#[tokio::test]
async fn test_no_resolvable_entries_is_fatal() {
    let temp = create_test_project(&[("other.ts", "export {};\n")]);

    let err = builder(&temp).entry("missing.ts").build().await.unwrap_err();

    assert!(matches!(err, BuildError::NoEntryFiles { requested: 1 }));
}

#[tokio::test]
async fn test_missing_entry_is_skipped_when_others_exist() {
    let temp = create_test_project(&[("index.ts", "export {};\n")]);

    let maps = builder(&temp)
        .entries(["missing.ts", "index.ts"])
        .build()
        .await
        .unwrap();

    assert_eq!(maps.files.len(), 1);
}

#[tokio::test]
async fn test_imports_not_followed_when_disabled() {
    let temp = create_test_project(&[
        ("index.ts", "import './a';\n"),
        ("second.ts", "import './a';\n"),
        ("a.ts", "export const a = 1;\n"),
    ]);

    let maps = builder(&temp)
        .entries(["index.ts", "second.ts"])
        .resolve_imported_modules(false)
        .build()
        .await
        .unwrap();

    assert_eq!(maps.files.len(), 2);
    assert!(maps.imports.is_empty());
    assert!(maps.files.values().all(|file| file.is_entrypoint));
}

#[tokio::test]
async fn test_entries_are_flagged_and_deduplicated() {
    let temp = create_test_project(&[
        ("index.ts", "import './lib';\n"),
        ("lib.ts", "export const lib = 1;\n"),
    ]);

    let maps = builder(&temp)
        .entries(["index.ts", "./index.ts", "lib.ts"])
        .build()
        .await
        .unwrap();

    assert_eq!(maps.files.len(), 2);
    assert_eq!(maps.entry_files().count(), 2);
    assert_eq!(
        imported_paths(&maps, temp.path(), "index.ts"),
        vec![temp.path().join("lib.ts")]
    );
}

#[test]
fn test_normalize_path() {
    let root = Path::new("/project");
    assert_eq!(
        normalize_path(root, Path::new("./src/../index.ts")),
        PathBuf::from("/project/index.ts")
    );
    assert_eq!(
        normalize_path(root, Path::new("/abs/./a.ts")),
        PathBuf::from("/abs/a.ts")
    );
}

#[test]
fn test_builder_collects_options() {
    let builder = GraphBuilder::new()
        .entry("src/index.ts")
        .entries(["src/cli.ts"])
        .tsconfig("tsconfig.app.json")
        .resolve_file_nodes(false)
        .skip_node_modules(false)
        .pool_size(3);

    let config = builder.config();
    assert_eq!(config.entries.len(), 2);
    assert_eq!(
        config.resolution.tsconfig,
        Some(PathBuf::from("tsconfig.app.json"))
    );
    assert!(!config.parse.resolve_file_nodes);
    assert!(!config.skip_node_modules);
    assert_eq!(config.effective_pool_size(), 3);
}
