use serde::{Deserialize, Serialize};

/// A free-text description row from the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub id: String,
    pub description: String,
}

/// Outcome of a point lookup against the description store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionLookup {
    Found(Description),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cocktail {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
}

impl Cocktail {
    /// Only complete cocktails are ever persisted.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.ingredients.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Cocktail,
    Step,
    Ingredient,
    Quantity,
    Other(String),
}

impl EntityLabel {
    pub fn from_model_label(label: &str) -> Self {
        match label {
            "COCKTAIL" => EntityLabel::Cocktail,
            "STEP" => EntityLabel::Step,
            "ING" => EntityLabel::Ingredient,
            "QUANTITY" => EntityLabel::Quantity,
            other => EntityLabel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Cocktail => "COCKTAIL",
            EntityLabel::Step => "STEP",
            EntityLabel::Ingredient => "ING",
            EntityLabel::Quantity => "QUANTITY",
            EntityLabel::Other(label) => label,
        }
    }
}

/// A labelled span returned by the model for one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
}

impl Entity {
    pub fn new(label: EntityLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }
}

/// What a handler invocation did with its batch; returned as the Lambda response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub model: String,
    pub records_seen: usize,
    pub processed: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub cocktails_loaded: usize,
}
