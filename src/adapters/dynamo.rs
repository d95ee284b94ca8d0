use crate::domain::model::{Cocktail, Description, DescriptionLookup, Ingredient};
use crate::domain::ports::{CocktailSink, DescriptionSource};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

/// Source table of free-text descriptions, keyed by `id`.
#[derive(Debug, Clone)]
pub struct DynamoDescriptionSource {
    client: DynamoClient,
    table: String,
}

impl DynamoDescriptionSource {
    pub fn new(client: DynamoClient, table: String) -> Self {
        Self { client, table }
    }
}

#[async_trait]
impl DescriptionSource for DynamoDescriptionSource {
    async fn get_description(&self, id: &str) -> DescriptionLookup {
        let response = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await;

        let output = match response {
            Ok(output) => output,
            Err(err) => {
                let message = err
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
                tracing::error!("GetItem {} on {} failed: {}", id, self.table, message);
                return DescriptionLookup::Failed(message);
            }
        };

        let Some(item) = output.item() else {
            return DescriptionLookup::NotFound;
        };

        match item.get("description") {
            Some(AttributeValue::S(text)) => {
                tracing::debug!("Fetched description {} ({} chars)", id, text.len());
                DescriptionLookup::Found(Description {
                    id: id.to_string(),
                    description: text.clone(),
                })
            }
            _ => DescriptionLookup::Failed(format!(
                "item {} in {} has no string 'description'",
                id, self.table
            )),
        }
    }
}

/// Destination table; each cocktail is written as a full item.
#[derive(Debug, Clone)]
pub struct DynamoCocktailSink {
    client: DynamoClient,
    table: String,
}

impl DynamoCocktailSink {
    pub fn new(client: DynamoClient, table: String) -> Self {
        Self { client, table }
    }
}

#[async_trait]
impl CocktailSink for DynamoCocktailSink {
    async fn put_cocktail(&self, cocktail: &Cocktail) -> Result<()> {
        tracing::info!("Loading {} into table {}", cocktail.name, self.table);

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(cocktail_item(cocktail)))
            .send()
            .await
            .map_err(|e| EtlError::StoreError {
                message: format!(
                    "Failed to put {} into {}: {}",
                    cocktail.name,
                    self.table,
                    DisplayErrorContext(&e)
                ),
            })?;

        Ok(())
    }
}

pub fn cocktail_item(cocktail: &Cocktail) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("name".to_string(), AttributeValue::S(cocktail.name.clone())),
        (
            "ingredients".to_string(),
            AttributeValue::L(cocktail.ingredients.iter().map(ingredient_value).collect()),
        ),
        ("steps".to_string(), string_list(&cocktail.steps)),
    ])
}

fn ingredient_value(ingredient: &Ingredient) -> AttributeValue {
    AttributeValue::M(HashMap::from([
        ("name".to_string(), AttributeValue::S(ingredient.name.clone())),
        ("quantities".to_string(), string_list(&ingredient.quantities)),
    ]))
}

fn string_list(values: &[String]) -> AttributeValue {
    AttributeValue::L(values.iter().cloned().map(AttributeValue::S).collect())
}
