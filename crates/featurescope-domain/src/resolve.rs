//! Ordered feature id resolution
//!
//! A detected pattern id does not always match a dataset key. Lookups walk a fixed
//! chain (the id itself, each alias, then the `css-` prefixed id) and stop at the
//! first hit. Callers decide what to synthesize when nothing matches.

/// Prefix some datasets put on CSS feature keys
pub const CSS_PREFIX: &str = "css-";

/// The ordered list of keys tried when resolving an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionChain {
    candidates: Vec<String>,
}

impl ResolutionChain {
    /// Build the chain for a primary id and its aliases.
    ///
    /// Duplicates are dropped, keeping the first position.
    pub fn new<'a, I>(primary: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut candidates: Vec<String> = Vec::new();
        let mut push = |key: String| {
            if !key.is_empty() && !candidates.contains(&key) {
                candidates.push(key);
            }
        };

        push(primary.to_string());
        for alias in aliases {
            push(alias.to_string());
        }
        if !primary.starts_with(CSS_PREFIX) {
            push(format!("{CSS_PREFIX}{primary}"));
        }

        Self { candidates }
    }

    /// Keys in lookup order
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Return the first successful lookup
    pub fn resolve<T, F>(&self, mut lookup: F) -> Option<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        self.candidates.iter().find_map(|key| lookup(key))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_chain_order() {
        let chain = ResolutionChain::new("has", ["css-has", "has-selector"]);
        assert_eq!(chain.candidates(), &["has", "css-has", "has-selector"]);
    }

    #[test]
    fn test_prefixed_fallback() {
        let chain = ResolutionChain::new("is", std::iter::empty());
        assert_eq!(chain.candidates(), &["is", "css-is"]);

        let data: HashMap<&str, u32> = [("css-is", 7)].into_iter().collect();
        assert_eq!(chain.resolve(|key| data.get(key).copied()), Some(7));
    }

    #[test]
    fn test_first_hit_wins() {
        let chain = ResolutionChain::new("gap", ["flexbox-gap"]);
        let data: HashMap<&str, &str> =
            [("gap", "direct"), ("flexbox-gap", "alias")].into_iter().collect();
        assert_eq!(chain.resolve(|key| data.get(key).copied()), Some("direct"));
    }
}
