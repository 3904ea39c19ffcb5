//! Token dictionary
//!
//! An ordered collection of transformed tokens with lookup by output name and
//! by path. Iteration order is the merge order of first appearance, which is
//! the order every format emits tokens in.

use crate::source::{SourceError, TokenTree};
use crate::token::{Token, TokenPath};
use crate::transform::TransformChain;
use std::collections::HashMap;
use thiserror::Error;

/// Error building a dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Source tree could not be walked
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Two token paths map to the same output name
    #[error("Tokens '{first}' and '{second}' both produce the name '{name}'")]
    DuplicateName { name: String, first: TokenPath, second: TokenPath },
}

/// Ordered, name-unique collection of tokens.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    tokens: Vec<Token>,
    by_name: HashMap<String, usize>,
    by_path: HashMap<TokenPath, usize>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from a merged tree.
    pub fn from_tree(tree: &TokenTree, transforms: &TransformChain) -> Result<Self, DictionaryError> {
        Self::from_layered(tree, None, transforms)
    }

    /// Build a dictionary from a layered tree.
    ///
    /// Tokens present in `tree` but not in `base` are marked `theme_only`.
    pub fn from_layered(
        tree: &TokenTree,
        base: Option<&TokenTree>,
        transforms: &TransformChain,
    ) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::new();

        for (path, definition) in tree.tokens()? {
            let mut token = Token::new(path, definition);
            token.file_path = tree.origin(&token.path).map(|p| p.to_path_buf());
            token.theme_only = base.is_some_and(|b| !b.contains_token(&token.path));
            transforms.apply(&mut token);
            dictionary.insert(token)?;
        }

        Ok(dictionary)
    }

    /// Insert a token.
    ///
    /// A token with an existing path replaces it in place. A different path
    /// with an existing name is rejected.
    pub fn insert(&mut self, token: Token) -> Result<(), DictionaryError> {
        if let Some(&index) = self.by_path.get(&token.path) {
            let old_name = std::mem::take(&mut self.tokens[index].name);
            self.by_name.remove(&old_name);
            if let Some(&other) = self.by_name.get(&token.name) {
                self.by_name.insert(old_name.clone(), index);
                self.tokens[index].name = old_name;
                return Err(DictionaryError::DuplicateName {
                    name: token.name.clone(),
                    first: self.tokens[other].path.clone(),
                    second: token.path,
                });
            }
            self.by_name.insert(token.name.clone(), index);
            self.tokens[index] = token;
            return Ok(());
        }

        if let Some(&other) = self.by_name.get(&token.name) {
            return Err(DictionaryError::DuplicateName {
                name: token.name.clone(),
                first: self.tokens[other].path.clone(),
                second: token.path,
            });
        }

        let index = self.tokens.len();
        self.by_name.insert(token.name.clone(), index);
        self.by_path.insert(token.path.clone(), index);
        self.tokens.push(token);
        Ok(())
    }

    /// Look up a token by output name.
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.by_name.get(name).map(|&i| &self.tokens[i])
    }

    /// Look up a token by path.
    pub fn get_by_path(&self, path: &TokenPath) -> Option<&Token> {
        self.by_path.get(path).map(|&i| &self.tokens[i])
    }

    /// Iterate tokens in dictionary order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Tokens matching `predicate`, in dictionary order.
    pub fn filter<F>(&self, predicate: F) -> Vec<&Token>
    where
        F: Fn(&Token) -> bool,
    {
        self.tokens.iter().filter(|t| predicate(t)).collect()
    }

    /// Output names in dictionary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
