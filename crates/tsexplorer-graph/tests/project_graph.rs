//! End-to-end indexing against the real filesystem.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tsexplorer_graph::{GraphBuilder, GraphSink, JsonSnapshotSink, NativeRuntime};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn sample_app() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(
        root,
        "tsconfig.json",
        r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@lib/*": ["src/lib/*"] } } }"#,
    );
    write(
        root,
        "src/main.tsx",
        r#"
import React from "react";
import { format } from "@lib/format";
import { App } from "./app";

export function main() {
  return <App title={format("hi")} />;
}
"#,
    );
    write(
        root,
        "src/app.tsx",
        r#"
import React from "react";
import type { Props } from "./types";

export const App = (props: Props) => <h1>{props.title}</h1>;
"#,
    );
    write(root, "src/types.ts", "export interface Props { title: string }\n");
    write(
        root,
        "src/lib/format.ts",
        "import { App } from '../app';\nexport const format = (s: string) => s.toUpperCase();\n",
    );
    write(
        root,
        "node_modules/react/package.json",
        r#"{ "name": "react", "version": "18.3.1", "main": "index.js" }"#,
    );
    write(root, "node_modules/react/index.js", "module.exports = {};\n");

    temp
}

#[tokio::test]
async fn indexes_sample_app() {
    let temp = sample_app();
    let root = temp.path();

    let maps = GraphBuilder::new()
        .root(root)
        .entry("src/main.tsx")
        .pool_size(2)
        .build()
        .await
        .unwrap();

    let stats = maps.statistics();
    assert_eq!(stats.files, 4);
    assert_eq!(stats.entry_files, 1);
    assert_eq!(stats.packages, 1);
    assert_eq!(maps.packages["react"].version, "18.3.1");
    assert!(stats.nodes > 0);

    let main = maps.file_by_path(&root.join("src/main.tsx")).unwrap();
    assert_eq!(maps.imports_of(&main.hash).count(), 2);

    let format = maps.file_by_path(&root.join("src/lib/format.ts")).unwrap();
    let app = maps.file_by_path(&root.join("src/app.tsx")).unwrap();
    assert!(maps.importers_of(&app.hash).any(|h| *h == format.hash));
}

#[tokio::test]
async fn writes_json_snapshot() {
    let temp = sample_app();
    let root = temp.path();

    let maps = GraphBuilder::new()
        .root(root)
        .entry("src/main.tsx")
        .resolve_file_nodes(false)
        .build()
        .await
        .unwrap();

    let output = root.join("graph.json");
    JsonSnapshotSink::new(std::sync::Arc::new(NativeRuntime::new()), &output)
        .persist("sample", &maps)
        .await
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["statistics"]["files"], 4);
    assert_eq!(value["statistics"]["nodes"], 0);
    assert!(value["packages"]["react"].is_object());
}
