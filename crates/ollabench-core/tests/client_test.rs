//! OllamaClient against a mock HTTP server

use httpmock::prelude::*;
use ollabench_core::{
    BenchError, FailureKind, GenerateOptions, GenerateRequest, InferenceBackend, KeepAlive,
    OllamaClient, ProbeConfig, ProbeExecutor, ProbeResult, PullStatus, ServerConfig,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn client_for(server: &MockServer) -> OllamaClient {
    let config = ServerConfig {
        url: format!("{}/", server.base_url()),
        model: "test-model".to_string(),
        timeout_secs: 5,
    };
    OllamaClient::new(&config).unwrap()
}

fn probe_request() -> GenerateRequest {
    GenerateRequest {
        model: "test-model".to_string(),
        prompt: "What is Rust?".to_string(),
        stream: false,
        keep_alive: KeepAlive::Duration("5m".to_string()),
        options: Some(GenerateOptions {
            temperature: 0.7,
            num_predict: 300,
        }),
    }
}

#[tokio::test]
async fn test_generate_parses_metrics() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"model":"test-model","stream":false,"keep_alive":"5m"}"#);
            then.status(200).json_body(json!({
                "model": "test-model",
                "response": "A systems language.",
                "done": true,
                "eval_count": 120,
                "eval_duration": 2_000_000_000u64,
                "total_duration": 2_500_000_000u64,
                "load_duration": 1_000_000u64,
                "prompt_eval_count": 9
            }));
        })
        .await;

    let client = client_for(&server);
    let response = client.generate(&probe_request()).await.unwrap();

    mock.assert_async().await;
    assert!(response.done);
    assert_eq!(response.eval_count, 120);
    assert_eq!(response.eval_duration, 2_000_000_000);
    assert_eq!(response.total_duration, 2_500_000_000);
}

#[tokio::test]
async fn test_base_url_trailing_slash_is_trimmed() {
    let server = MockServer::start_async().await;
    let client = client_for(&server);
    assert_eq!(client.base_url(), server.base_url());
}

#[tokio::test]
async fn test_generate_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("out of memory");
        })
        .await;

    let err = client_for(&server)
        .generate(&probe_request())
        .await
        .unwrap_err();

    match &err {
        BenchError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "out of memory");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(FailureKind::classify(&err), FailureKind::Status);
}

#[tokio::test]
async fn test_generate_malformed_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).body("not json at all");
        })
        .await;

    let err = client_for(&server)
        .generate(&probe_request())
        .await
        .unwrap_err();

    assert!(matches!(err, BenchError::Parse(_)));
    assert_eq!(FailureKind::classify(&err), FailureKind::Parse);
}

#[tokio::test]
async fn test_generate_error_body_with_ok_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .json_body(json!({"error": "model requires more system memory"}));
        })
        .await;

    let err = client_for(&server)
        .generate(&probe_request())
        .await
        .unwrap_err();
    assert_eq!(FailureKind::classify(&err), FailureKind::Parse);
    assert!(err.to_string().contains("more system memory"));

    let executor = ProbeExecutor::new(
        Arc::new(client_for(&server)),
        "test-model",
        ProbeConfig::default(),
    );
    match executor.run().await {
        ProbeResult::Failure { kind, .. } => assert_eq!(kind, FailureKind::Parse),
        other => panic!("expected failed probe, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_unfinished_body_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(json!({}));
        })
        .await;

    let err = client_for(&server)
        .generate(&probe_request())
        .await
        .unwrap_err();
    assert!(matches!(err, BenchError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let config = ServerConfig {
        url: "http://127.0.0.1:1".to_string(),
        model: "test-model".to_string(),
        timeout_secs: 2,
    };
    let client = OllamaClient::new(&config).unwrap();

    let err = client.generate(&probe_request()).await.unwrap_err();
    assert_eq!(FailureKind::classify(&err), FailureKind::Transport);
}

#[tokio::test]
async fn test_list_models() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(json!({
                "models": [
                    {"name": "deepseek-r1:1.5b", "size": 1_100_000_000u64, "digest": "abc"},
                    {"name": "llama3:8b", "size": 4_700_000_000u64}
                ]
            }));
        })
        .await;

    let models = client_for(&server).list_models().await.unwrap();

    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["deepseek-r1:1.5b", "llama3:8b"]);
    assert_eq!(models[0].digest.as_deref(), Some("abc"));
    assert!(models[1].digest.is_none());
}

#[tokio::test]
async fn test_pull_streams_status_lines() {
    let server = MockServer::start_async().await;
    let body = concat!(
        "{\"status\":\"pulling manifest\"}\n",
        "\n",
        "{\"status\":\"pulling abc\",\"digest\":\"abc\",\"total\":200,\"completed\":50}\n",
        "garbage line\n",
        "{\"status\":\"verifying sha256 digest\"}\n",
        "{\"status\":\"success\"}"
    );
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/pull")
                .json_body(json!({"model": "test-model", "stream": true}));
            then.status(200)
                .header("content-type", "application/x-ndjson")
                .body(body);
        })
        .await;

    let seen: Mutex<Vec<PullStatus>> = Mutex::new(Vec::new());
    let record = |s: &PullStatus| seen.lock().unwrap().push(s.clone());

    let outcome = client_for(&server)
        .pull_model("test-model", &record)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(outcome.success);
    assert_eq!(outcome.last_status.as_deref(), Some("success"));

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[1].progress_percent(), Some(25.0));
    assert!(seen[1].is_downloading());
}

#[tokio::test]
async fn test_pull_without_success_line() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/pull");
            then.status(200).body(concat!(
                "{\"status\":\"pulling manifest\"}\n",
                "{\"error\":\"pull model manifest: file does not exist\"}\n"
            ));
        })
        .await;

    let outcome = client_for(&server)
        .pull_model("missing-model", &|_: &PullStatus| {})
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("pull model manifest: file does not exist")
    );
    assert_eq!(outcome.last_status.as_deref(), Some("pulling manifest"));
}

#[tokio::test]
async fn test_unload_sends_zero_keep_alive() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body(json!({
                    "model": "test-model",
                    "prompt": "",
                    "stream": false,
                    "keep_alive": 0
                }));
            then.status(200).json_body(json!({"model": "test-model", "done": true}));
        })
        .await;

    client_for(&server).unload_model("test-model").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unload_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(404).body("model not found");
        })
        .await;

    let err = client_for(&server)
        .unload_model("test-model")
        .await
        .unwrap_err();
    assert!(matches!(err, BenchError::Status { status: 404, .. }));
}
