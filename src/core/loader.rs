use crate::domain::model::Cocktail;
use crate::domain::ports::CocktailSink;
use crate::utils::error::Result;

/// Writes cocktails one by one; the first failed write aborts the rest.
pub struct CocktailLoader<K: CocktailSink> {
    sink: K,
}

impl<K: CocktailSink> CocktailLoader<K> {
    pub fn new(sink: K) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub async fn load(&self, cocktails: &[Cocktail]) -> Result<usize> {
        for cocktail in cocktails {
            self.sink.put_cocktail(cocktail).await?;
        }
        Ok(cocktails.len())
    }
}
