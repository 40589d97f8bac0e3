/*!
 * Tests for the DeepL client against a local stand-in server
 */

use std::time::Duration;

use lingocache::app_config::ProviderConfig;
use lingocache::errors::ProviderError;
use lingocache::providers::deepl::DeepL;
use lingocache::providers::TranslationProvider;
use crate::common::mock_deepl::{DeepLBehavior, MockDeepL};

fn client_for(server: &MockDeepL) -> DeepL {
    DeepL::new("test-key", server.endpoint.clone(), Duration::from_secs(5))
}

/// Test a successful translation and the request wire format
#[tokio::test]
async fn test_translate_withWorkingApi_shouldSendDeepLRequest() {
    let server = MockDeepL::start(DeepLBehavior::Translate).await;
    let client = client_for(&server);

    let translation = client.translate("Hello", "ES").await.unwrap();

    assert_eq!(translation, "ES:Hello");
    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].authorization.as_deref(), Some("DeepL-Auth-Key test-key"));
    assert_eq!(received[0].body, serde_json::json!({"text": ["Hello"], "target_lang": "ES"}));
}

/// Test that bare English and Portuguese targets get a regional variant
#[tokio::test]
async fn test_translate_withBareEnglish_shouldRequestRegionalVariant() {
    let server = MockDeepL::start(DeepLBehavior::Translate).await;
    let client = client_for(&server);

    assert_eq!(client.translate("Hola", "EN").await.unwrap(), "EN-US:Hola");
    assert_eq!(client.translate("Hola", "PT").await.unwrap(), "PT-PT:Hola");
}

/// Test that transient statuses are classified as unavailable
#[tokio::test]
async fn test_translate_withTransientStatus_shouldBeUnavailable() {
    for status in [429, 500, 503] {
        let server = MockDeepL::start(DeepLBehavior::Status(status, "busy".into())).await;
        let result = client_for(&server).translate("Hello", "ES").await;

        assert!(
            matches!(result, Err(ProviderError::Unavailable(_))),
            "status {} gave {:?}",
            status,
            result
        );
    }
}

/// Test that permanent statuses are classified as rejected
#[tokio::test]
async fn test_translate_withPermanentStatus_shouldBeRejected() {
    for status in [400, 403, 456] {
        let server = MockDeepL::start(DeepLBehavior::Status(status, "no".into())).await;
        let result = client_for(&server).translate("Hello", "ES").await;

        match result {
            Err(ProviderError::Rejected { status_code, .. }) => assert_eq!(status_code, Some(status)),
            other => panic!("status {} gave {:?}", status, other),
        }
    }
}

/// Test that provider error bodies are not copied into the error
#[tokio::test]
async fn test_translate_withErrorBody_shouldNotLeakBody() {
    let server = MockDeepL::start(DeepLBehavior::Status(400, "internal-detail-xyz".into())).await;
    let error = client_for(&server).translate("Hello", "ES").await.unwrap_err();

    assert!(!error.to_string().contains("internal-detail-xyz"));
}

/// Test malformed and empty responses
#[tokio::test]
async fn test_translate_withUnusableBody_shouldClassify() {
    let server = MockDeepL::start(DeepLBehavior::Malformed).await;
    let result = client_for(&server).translate("Hello", "ES").await;
    assert!(matches!(result, Err(ProviderError::Unavailable(_))));

    let server = MockDeepL::start(DeepLBehavior::Empty).await;
    let result = client_for(&server).translate("Hello", "ES").await;
    assert!(matches!(result, Err(ProviderError::Rejected { .. })));
}

/// Test that an unreachable endpoint is a transient failure
#[tokio::test]
async fn test_translate_withUnreachableEndpoint_shouldBeUnavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DeepL::new("test-key", format!("http://{}", addr), Duration::from_secs(2));
    let result = client.translate("Hello", "ES").await;

    assert!(matches!(result, Err(ProviderError::Unavailable(_))));
}

/// Test the usage endpoint
#[tokio::test]
async fn test_usage_shouldReportCharacterCounts() {
    let server = MockDeepL::start(DeepLBehavior::Translate).await;
    let usage = client_for(&server).usage().await.unwrap().unwrap();

    assert_eq!(usage.character_count, 1234);
    assert_eq!(usage.character_limit, Some(500000));
}

/// Test construction from configuration
#[tokio::test]
async fn test_fromConfig_withExplicitEndpoint_shouldUseIt() {
    let server = MockDeepL::start(DeepLBehavior::Translate).await;
    let config = ProviderConfig {
        api_key: "key:fx".to_string(),
        endpoint: format!("{}/", server.endpoint),
        ..ProviderConfig::default()
    };

    let client = DeepL::from_config(&config);
    assert_eq!(client.endpoint(), server.endpoint);
    assert_eq!(client.translate("Hello", "DE").await.unwrap(), "DE:Hello");
}
