//! End-to-end tests: [`ibot_cli::IssueBot`] with the real HTTP client against a mockito server.
//!
//! Hold the mock guards until the run finishes, otherwise the server answers with an empty body.

use std::sync::Arc;

use ibot_cli::IssueBot;
use ibot_core::{HandlerResponse, Sender};
use issue_client::HttpIssueClient;
use mockito::Matcher;

fn json_body(raw: &str) -> Matcher {
    Matcher::JsonString(raw.to_string())
}

fn bot_for(server: &mockito::ServerGuard) -> IssueBot {
    let client = HttpIssueClient::new(&server.url()).expect("valid mock url");
    IssueBot::new(Arc::new(client))
}

#[tokio::test]
async fn test_full_run_over_http() {
    let mut server = mockito::Server::new_async().await;
    let fetch = server
        .mock("POST", "/api/jira/fetch")
        .match_body(json_body(r#"{"key": "PROJ-123"}"#))
        .with_status(200)
        .with_body(r#"{"success": true, "data": {"description": "d"}}"#)
        .create_async()
        .await;
    let detect = server
        .mock("POST", "/api/llm/detect-tools")
        .match_body(json_body(r#"{"description": "d"}"#))
        .with_status(200)
        .with_body(r#"{"data": {"tools": ["LINT", "SCAN"]}}"#)
        .create_async()
        .await;
    let lint = server
        .mock("POST", "/api/tool/lint")
        .match_body(json_body(r#"{"key": "PROJ-123", "description": "d"}"#))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;
    let scan = server
        .mock("POST", "/api/tool/scan")
        .with_status(200)
        .with_body(r#"{"success": false, "message": "quota exceeded"}"#)
        .create_async()
        .await;

    let bot = bot_for(&server);
    let response = bot.process("Please look at PROJ-123").await.unwrap();

    fetch.assert_async().await;
    detect.assert_async().await;
    lint.assert_async().await;
    scan.assert_async().await;

    assert_eq!(
        response,
        HandlerResponse::Reply("completed PROJ-123: 2 tool(s), 1 failed".to_string())
    );
    let messages = bot.store().await.messages();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[3].content, "✅ LINT completed.");
    assert_eq!(messages[4].content, "❌ SCAN failed: quota exceeded");
    assert!(bot.transcript().await.contains("🎉 Issue processing completed!"));
}

#[tokio::test]
async fn test_server_error_becomes_system_error() {
    let mut server = mockito::Server::new_async().await;
    let _fetch = server
        .mock("POST", "/api/jira/fetch")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    let detect = server
        .mock("POST", "/api/llm/detect-tools")
        .match_body(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let bot = bot_for(&server);
    bot.process("OPS-9 is broken").await.unwrap();

    detect.assert_async().await;
    let messages = bot.store().await.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[1].content,
        "⚠️ System error: Unexpected HTTP status 500: Internal Server Error"
    );
}
