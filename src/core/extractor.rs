use crate::domain::model::{Cocktail, Entity, EntityLabel, Ingredient};
use crate::domain::ports::EntityRecognizer;
use crate::utils::error::Result;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: char = '\n';

// Clock times confuse the model into tagging quantities.
static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(2[0-3]|[01]?[0-9]):([0-5]?[0-9])").expect("time pattern is valid")
});

pub fn strip_times(sentence: &str) -> Cow<'_, str> {
    TIME_OF_DAY.replace_all(sentence, "")
}

/// Turns free-text descriptions into cocktails, one candidate per paragraph.
pub struct CocktailExtractor<'a, R: EntityRecognizer + ?Sized> {
    recognizer: &'a R,
}

impl<'a, R: EntityRecognizer + ?Sized> CocktailExtractor<'a, R> {
    pub fn new(recognizer: &'a R) -> Self {
        Self { recognizer }
    }

    pub fn extract(&self, description: &str) -> Result<Vec<Cocktail>> {
        let mut result = Vec::new();

        for paragraph in description.split(PARAGRAPH_SEPARATOR) {
            let cocktail = self.extract_paragraph(paragraph)?;
            if cocktail.is_complete() {
                result.push(cocktail);
            } else {
                tracing::debug!(
                    "Dropping incomplete paragraph (name: {:?}, ingredients: {})",
                    cocktail.name,
                    cocktail.ingredients.len()
                );
            }
        }

        Ok(result)
    }

    fn extract_paragraph(&self, paragraph: &str) -> Result<Cocktail> {
        let mut cocktail = Cocktail::default();

        for sentence in paragraph.split(SENTENCE_SEPARATOR) {
            let input = format!("{}.", strip_times(sentence));
            let entities = self.recognizer.recognize(&input)?;
            classify(&mut cocktail, sentence, &entities);
        }

        Ok(cocktail)
    }
}

/// Applies the label rules to one sentence. COCKTAIL (while unnamed) beats
/// STEP, which beats ING.
fn classify(cocktail: &mut Cocktail, sentence: &str, entities: &[Entity]) {
    if cocktail.name.is_empty() {
        if let Some(name) = first_text(entities, &EntityLabel::Cocktail) {
            cocktail.name = name.to_string();
            return;
        }
    }

    if first_text(entities, &EntityLabel::Step).is_some() {
        cocktail.steps.push(sentence.to_string());
        return;
    }

    if let Some(name) = first_text(entities, &EntityLabel::Ingredient) {
        let quantities = entities
            .iter()
            .filter(|e| e.label == EntityLabel::Quantity)
            .map(|e| e.text.clone())
            .collect();
        cocktail.ingredients.push(Ingredient {
            name: name.to_string(),
            quantities,
        });
    }
}

fn first_text<'e>(entities: &'e [Entity], label: &EntityLabel) -> Option<&'e str> {
    entities
        .iter()
        .find(|e| &e.label == label)
        .map(|e| e.text.as_str())
}
