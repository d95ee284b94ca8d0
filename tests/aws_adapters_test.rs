#![cfg(feature = "lambda")]

mod common;

use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use cocktail_etl::domain::ports::{CocktailSink, DescriptionSource, ModelStore};
use cocktail_etl::{
    Cocktail, CocktailLoader, DescriptionLookup, DynamoCocktailSink, DynamoDescriptionSource,
    EtlError, Ingredient, S3ModelStore,
};
use httpmock::prelude::*;

const AMZ_JSON: &str = "application/x-amz-json-1.0";

fn dynamo_client(server: &MockServer) -> aws_sdk_dynamodb::Client {
    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "static"))
        .endpoint_url(server.base_url())
        .build();
    aws_sdk_dynamodb::Client::from_conf(config)
}

fn s3_client(server: &MockServer) -> aws_sdk_s3::Client {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            "test", "test", None, None, "static",
        ))
        .endpoint_url(server.base_url())
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(config)
}

fn cocktail(name: &str) -> Cocktail {
    Cocktail {
        name: name.to_string(),
        ingredients: vec![Ingredient {
            name: "gin".to_string(),
            quantities: vec!["60ml".to_string()],
        }],
        steps: vec!["Stir with ice.".to_string()],
    }
}

#[tokio::test]
async fn test_get_description_found() {
    let server = MockServer::start();
    let get_item = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .header("x-amz-target", "DynamoDB_20120810.GetItem")
            .body_contains("\"descriptions\"")
            .body_contains("\"d1\"");
        then.status(200)
            .header("content-type", AMZ_JSON)
            .json_body(serde_json::json!({
                "Item": {
                    "id": {"S": "d1"},
                    "description": {"S": "Margarita is a cocktail.\nAdd 50ml tequila."}
                }
            }));
    });

    let source = DynamoDescriptionSource::new(dynamo_client(&server), "descriptions".to_string());
    let lookup = source.get_description("d1").await;

    get_item.assert();
    match lookup {
        DescriptionLookup::Found(description) => {
            assert_eq!(description.id, "d1");
            assert!(description.description.starts_with("Margarita"));
        }
        other => panic!("unexpected lookup result: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_description_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .header("x-amz-target", "DynamoDB_20120810.GetItem");
        then.status(200)
            .header("content-type", AMZ_JSON)
            .json_body(serde_json::json!({}));
    });

    let source = DynamoDescriptionSource::new(dynamo_client(&server), "descriptions".to_string());
    assert_eq!(source.get_description("nope").await, DescriptionLookup::NotFound);
}

#[tokio::test]
async fn test_get_description_client_error_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .header("x-amz-target", "DynamoDB_20120810.GetItem");
        then.status(400)
            .header("content-type", AMZ_JSON)
            .json_body(serde_json::json!({
                "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
                "message": "Requested resource not found"
            }));
    });

    let source = DynamoDescriptionSource::new(dynamo_client(&server), "descriptions".to_string());
    match source.get_description("d1").await {
        DescriptionLookup::Failed(message) => {
            assert!(message.contains("Requested resource not found"))
        }
        other => panic!("unexpected lookup result: {:?}", other),
    }
}

#[tokio::test]
async fn test_loader_puts_each_cocktail() {
    let server = MockServer::start();
    let martini = server.mock(|when, then| {
        when.method(POST)
            .header("x-amz-target", "DynamoDB_20120810.PutItem")
            .body_contains("\"cocktails\"")
            .body_contains("\"Martini\"");
        then.status(200)
            .header("content-type", AMZ_JSON)
            .json_body(serde_json::json!({}));
    });
    let gimlet = server.mock(|when, then| {
        when.method(POST)
            .header("x-amz-target", "DynamoDB_20120810.PutItem")
            .body_contains("\"Gimlet\"");
        then.status(200)
            .header("content-type", AMZ_JSON)
            .json_body(serde_json::json!({}));
    });

    let loader = CocktailLoader::new(DynamoCocktailSink::new(
        dynamo_client(&server),
        "cocktails".to_string(),
    ));
    let written = loader
        .load(&[cocktail("Martini"), cocktail("Gimlet")])
        .await
        .unwrap();

    assert_eq!(written, 2);
    martini.assert_hits(1);
    gimlet.assert_hits(1);
}

#[tokio::test]
async fn test_put_failure_is_store_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .header("x-amz-target", "DynamoDB_20120810.PutItem");
        then.status(400)
            .header("content-type", AMZ_JSON)
            .json_body(serde_json::json!({
                "__type": "com.amazon.coral.validate#ValidationException",
                "message": "One or more parameter values were invalid"
            }));
    });

    let sink = DynamoCocktailSink::new(dynamo_client(&server), "cocktails".to_string());
    let err = sink.put_cocktail(&cocktail("Martini")).await.unwrap_err();
    assert!(matches!(err, EtlError::StoreError { .. }));
}

#[tokio::test]
async fn test_s3_model_download() {
    let server = MockServer::start();
    let archive = common::model_archive();
    let get_object = server.mock(|when, then| {
        when.method(GET)
            .path("/cocktail-models/models/cocktail-ner.tar.gz");
        then.status(200)
            .header("content-type", "application/gzip")
            .body(archive.clone());
    });

    let store = S3ModelStore::new(s3_client(&server), "cocktail-models".to_string());
    let data = store
        .get_object("models/cocktail-ner.tar.gz")
        .await
        .unwrap();

    get_object.assert();
    assert_eq!(data, archive);
}

#[tokio::test]
async fn test_s3_missing_model_is_object_store_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(404)
            .header("content-type", "application/xml")
            .body(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message></Error>",
            );
    });

    let store = S3ModelStore::new(s3_client(&server), "cocktail-models".to_string());
    let err = store
        .get_object("models/cocktail-ner.tar.gz")
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        EtlError::ObjectStoreError { message }
            if message == "s3://cocktail-models/models/cocktail-ner.tar.gz does not exist"
    ));
}
