use base64::Engine as _;
use bedrock_canvas::{
    BedrockConfig, BedrockError, GenerationRequest, ImageClient, ImageQuality, MockConnector,
    NOVA_CANVAS_MODEL_ID,
};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn client(connector: &MockConnector, config: BedrockConfig) -> ImageClient {
    ImageClient::with_connector(config, Arc::new(connector.clone()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_request_cycle_with_mock() {
    let connector = MockConnector::new();
    let config = BedrockConfig::new().with_credentials("AKIAEXAMPLE", "secret");
    let image_client = client(&connector, config);

    let image = image_client
        .create_image(
            "a lighthouse on a cliff, oil painting",
            "people, text",
            ImageQuality::Premium,
            1024,
            768,
            858993459,
        )
        .await
        .unwrap();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&image)
        .unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");

    let configs = connector.client_configs();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].region, "us-east-1");
    let credentials = configs[0].credentials.as_ref().unwrap();
    assert_eq!(credentials.access_key, "AKIAEXAMPLE");

    assert_eq!(connector.model_ids(), vec![NOVA_CANVAS_MODEL_ID.to_string()]);
    assert_eq!(
        connector.request_bodies()[0],
        json!({
            "taskType": "TEXT_IMAGE",
            "textToImageParams": {
                "text": "a lighthouse on a cliff, oil painting",
                "negativeText": "people, text"
            },
            "imageGenerationConfig": {
                "width": 1024,
                "height": 768,
                "quality": "premium",
                "cfgScale": 3,
                "seed": 858993459,
                "numberOfImages": 1
            }
        })
    );
    assert_eq!(connector.close_count(), 1);
}

#[tokio::test]
async fn test_many_concurrent_calls_each_get_their_own_client() {
    let connector = MockConnector::new().with_delay(Duration::from_millis(50));
    let image_client = client(&connector, BedrockConfig::new());

    let calls = (0..8).map(|seed| {
        image_client.generate(GenerationRequest::new(format!("variation {}", seed)).with_seed(seed))
    });
    let results = join_all(calls).await;

    assert!(results.iter().all(|result| result.is_ok()));
    assert_eq!(connector.connection_count(), 8);
    assert_eq!(connector.close_count(), 8);

    let mut seeds: Vec<i64> = connector
        .request_bodies()
        .iter()
        .map(|body| body["imageGenerationConfig"]["seed"].as_i64().unwrap())
        .collect();
    seeds.sort();
    assert_eq!(seeds, (0..8).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_mixed_outcomes_release_every_client() {
    let connector = MockConnector::new()
        .with_json(json!({ "images": ["aW1hZ2U="] }))
        .with_json(json!({}))
        .with_error(BedrockError::AwsServiceError {
            code: "ThrottlingException".into(),
            message: "Too many requests".into(),
        });
    let image_client = client(&connector, BedrockConfig::new());

    let ok = image_client.generate(GenerationRequest::new("one")).await;
    let missing = image_client.generate(GenerationRequest::new("two")).await;
    let throttled = image_client.generate(GenerationRequest::new("three")).await;

    assert_eq!(ok.unwrap(), "aW1hZ2U=");
    assert!(matches!(missing, Err(BedrockError::ResponseError(_))));
    assert!(matches!(
        throttled,
        Err(BedrockError::AwsServiceError { ref code, .. }) if code == "ThrottlingException"
    ));
    assert_eq!(connector.connection_count(), 3);
    assert_eq!(connector.close_count(), 3);
}

#[tokio::test]
async fn test_dropped_caller_still_releases_client() {
    let connector = MockConnector::new().with_delay(Duration::from_millis(100));
    let image_client = client(&connector, BedrockConfig::new());

    let abandoned = tokio::time::timeout(
        Duration::from_millis(10),
        image_client.generate(GenerationRequest::new("never awaited to completion")),
    )
    .await;
    assert!(abandoned.is_err());

    // The worker keeps running after the caller gives up.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(connector.invocation_count(), 1);
    assert_eq!(connector.close_count(), 1);
}
