//! End-to-end pipeline runs against a mock inference server and temp folders.

use httpmock::{Method::POST, MockServer};
use quizmerge::{
    embedding::HfEmbeddingClient,
    pipeline::{MergeService, PipelineError},
    rewrite::HfRewriteClient,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const EMBED_MODEL: &str = "test-embed";
const REWRITE_MODEL: &str = "test-gen";

fn service_for(server: &MockServer, threshold: f32) -> MergeService {
    MergeService::with_clients(
        Box::new(HfEmbeddingClient::new(
            server.base_url(),
            None,
            EMBED_MODEL.into(),
        )),
        Box::new(HfRewriteClient::new(
            server.base_url(),
            None,
            REWRITE_MODEL.into(),
        )),
        threshold,
    )
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}

#[tokio::test]
async fn identical_questions_across_files_merge_to_one() {
    let server = MockServer::start_async().await;
    let folder = TempDir::new().expect("temp dir");
    write_file(folder.path(), "cat2019.txt", "Define polymorphism (2 marks)\n");
    write_file(folder.path(), "cat2020.txt", "Define polymorphism (2 marks)\n");

    let embed_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{EMBED_MODEL}"));
            then.status(200).json_body(json!([[0.12, 0.7, 0.4]]));
        })
        .await;
    let rewrite_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{REWRITE_MODEL}"));
            then.status(200)
                .json_body(json!([{ "generated_text": "Define polymorphism. (2 marks)" }]));
        })
        .await;

    let outcome = service_for(&server, 0.8)
        .merge_folder(folder.path())
        .await
        .expect("merge run");

    assert_eq!(outcome.merged_units, vec!["Define polymorphism. (2 marks)"]);
    assert_eq!(outcome.input_units, 2);
    assert_eq!(outcome.duplicates_removed(), 1);
    assert_eq!(embed_mock.hits_async().await, 2);
    assert_eq!(rewrite_mock.hits_async().await, 1);
}

#[tokio::test]
async fn dissimilar_questions_pass_through_without_rewrites() {
    let server = MockServer::start_async().await;
    let folder = TempDir::new().expect("temp dir");
    write_file(folder.path(), "paper.txt", "Define a stack (2 marks)\nWrite a program to reverse a string\n");

    let embed_stack = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{EMBED_MODEL}"))
                .body_contains("stack");
            then.status(200).json_body(json!([[1.0, 0.0]]));
        })
        .await;
    let embed_reverse = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{EMBED_MODEL}"))
                .body_contains("reverse");
            then.status(200).json_body(json!([[0.0, 1.0]]));
        })
        .await;
    let rewrite_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{REWRITE_MODEL}"));
            then.status(200).json_body(json!([{ "generated_text": "unused" }]));
        })
        .await;

    let outcome = service_for(&server, 0.8)
        .merge_folder(folder.path())
        .await
        .expect("merge run");

    // Singletons come back byte-for-byte, in discovery order, with no rewrite calls.
    assert_eq!(
        outcome.merged_units,
        vec![
            "Define a stack (2 marks)",
            "Write a program to reverse a string",
        ]
    );
    assert_eq!(embed_stack.hits_async().await, 1);
    assert_eq!(embed_reverse.hits_async().await, 1);
    assert_eq!(rewrite_mock.hits_async().await, 0);
}

#[tokio::test]
async fn failed_rewrite_falls_back_to_first_member() {
    let server = MockServer::start_async().await;
    let folder = TempDir::new().expect("temp dir");
    write_file(
        folder.path(),
        "trio.txt",
        "Outline the OSI model (7 marks)\nOutline the seven OSI layers (7 marks)\nDescribe the OSI model layers (7 marks)\n",
    );

    server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{EMBED_MODEL}"));
            then.status(200).json_body(json!([[0.3, 0.9, 0.1]]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{REWRITE_MODEL}"));
            then.status(500).body("provider exploded");
        })
        .await;

    let outcome = service_for(&server, 0.8)
        .merge_folder(folder.path())
        .await
        .expect("merge run");

    assert_eq!(outcome.merged_units, vec!["Outline the OSI model (7 marks)"]);
    assert_eq!(outcome.fallback_merges, 1);
}

#[tokio::test]
async fn failed_embedding_degrades_to_singleton() {
    let server = MockServer::start_async().await;
    let folder = TempDir::new().expect("temp dir");
    write_file(
        folder.path(),
        "pair.txt",
        "Define a queue (2 marks)\nDefine a binary tree (2 marks)\n",
    );

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{EMBED_MODEL}"))
                .body_contains("queue");
            then.status(200).json_body(json!([[0.5, 0.5]]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{EMBED_MODEL}"))
                .body_contains("binary");
            then.status(503).body("model loading");
        })
        .await;
    let rewrite_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{REWRITE_MODEL}"));
            then.status(200).json_body(json!([{ "generated_text": "unused" }]));
        })
        .await;

    let outcome = service_for(&server, 0.0)
        .merge_folder(folder.path())
        .await
        .expect("merge run");

    // Even at threshold 0.0 the sentinel unit cannot join an existing cluster.
    assert_eq!(
        outcome.merged_units,
        vec!["Define a queue (2 marks)", "Define a binary tree (2 marks)"]
    );
    assert_eq!(outcome.failed_embeddings, 1);
    assert_eq!(rewrite_mock.hits_async().await, 0);
}

#[tokio::test]
async fn empty_folder_short_circuits_without_external_calls() {
    let server = MockServer::start_async().await;
    let folder = TempDir::new().expect("temp dir");

    let embed_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{EMBED_MODEL}"));
            then.status(200).json_body(json!([[1.0]]));
        })
        .await;

    let outcome = service_for(&server, 0.8)
        .merge_folder(folder.path())
        .await
        .expect("merge run");

    assert!(outcome.merged_units.is_empty());
    assert_eq!(outcome.input_units, 0);
    assert_eq!(embed_mock.hits_async().await, 0);
}

#[tokio::test]
async fn unsupported_and_transient_files_contribute_nothing() {
    let server = MockServer::start_async().await;
    let folder = TempDir::new().expect("temp dir");
    write_file(folder.path(), "~$paper.docx", "lock file noise");
    write_file(folder.path(), "notes.xlsx", "unsupported format");
    write_file(folder.path(), "draft.txt.tmp", "Define a heap (2 marks)");

    let embed_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{EMBED_MODEL}"));
            then.status(200).json_body(json!([[1.0]]));
        })
        .await;

    let outcome = service_for(&server, 0.8)
        .merge_folder(folder.path())
        .await
        .expect("merge run");

    assert!(outcome.merged_units.is_empty());
    assert_eq!(embed_mock.hits_async().await, 0);
}

#[tokio::test]
async fn missing_folder_is_a_hard_error() {
    let server = MockServer::start_async().await;

    let error = service_for(&server, 0.8)
        .merge_folder(Path::new("/nonexistent/uploads/folder"))
        .await
        .expect_err("missing folder");

    assert!(matches!(error, PipelineError::Folder { .. }));
}
