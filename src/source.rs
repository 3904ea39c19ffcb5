//! Token source files and deep merge
//!
//! Token files are JSON (or JSON5) object trees. Files are merged in order
//! into a single [`TokenTree`]: objects merge key by key, everything else is
//! replaced by the later file. Key order is the order of first appearance.

use crate::token::{is_token_object, TokenDefinition, TokenPath};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error while loading or walking token sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// File could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File is not valid JSON / JSON5
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    /// File root is not an object
    #[error("{}: token file root must be an object", .path.display())]
    NotAnObject { path: PathBuf },
    /// A token object is malformed
    #[error("Invalid token '{path}': {message}")]
    InvalidToken { path: TokenPath, message: String },
    /// Token redefined in strict mode
    #[error("Token '{path}' redefined by {}", .file.display())]
    Collision { path: TokenPath, file: PathBuf },
}

/// Check if a path has a token file extension (.json or .json5).
pub fn is_token_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("json") | Some("json5"))
}

/// Load a token file into a JSON object.
///
/// `.json5` files are parsed as JSON5, everything else as strict JSON.
pub fn load_source_file(path: &Path) -> Result<Map<String, Value>, SourceError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| SourceError::Io { path: path.to_path_buf(), source })?;
    parse_source(path, &contents)
}

/// Parse token file contents. `path` picks the syntax and names errors.
pub fn parse_source(path: &Path, contents: &str) -> Result<Map<String, Value>, SourceError> {
    let is_json5 = path.extension().and_then(|e| e.to_str()) == Some("json5");
    let value: Value = if is_json5 {
        json5::from_str(contents)
            .map_err(|e| SourceError::Parse { path: path.to_path_buf(), message: e.to_string() })?
    } else {
        serde_json::from_str(contents)
            .map_err(|e| SourceError::Parse { path: path.to_path_buf(), message: e.to_string() })?
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SourceError::NotAnObject { path: path.to_path_buf() }),
    }
}

/// Merged token source tree.
///
/// Cloning a tree gives an independent snapshot; theme layering relies on
/// this to keep the base untouched.
#[derive(Debug, Clone, Default)]
pub struct TokenTree {
    root: Map<String, Value>,
    /// Token path -> last file that defined it
    origins: HashMap<TokenPath, PathBuf>,
}

impl TokenTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The merged JSON object.
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Load and merge a file. Returns the token paths that were redefined.
    pub fn merge_file(&mut self, path: &Path) -> Result<Vec<TokenPath>, SourceError> {
        let source = load_source_file(path)?;
        Ok(self.merge(source, path))
    }

    /// Deep-merge an object into the tree, recording `origin` for every token
    /// it defines. Returns the token paths that already existed.
    pub fn merge(&mut self, source: Map<String, Value>, origin: &Path) -> Vec<TokenPath> {
        let mut defined = Vec::new();
        collect_token_paths(&source, &TokenPath::default(), &mut defined);

        let mut collisions = Vec::new();
        merge_object(&mut self.root, source, &TokenPath::default(), false, &mut collisions);

        for path in defined {
            self.origins.insert(path, origin.to_path_buf());
        }
        collisions
    }

    /// Last file that defined `path`.
    pub fn origin(&self, path: &TokenPath) -> Option<&Path> {
        self.origins.get(path).map(PathBuf::as_path)
    }

    /// Whether a token object exists at `path`.
    pub fn contains_token(&self, path: &TokenPath) -> bool {
        let mut current = &self.root;
        let segments = path.segments();
        for (i, segment) in segments.iter().enumerate() {
            match current.get(segment) {
                Some(Value::Object(obj)) if i + 1 == segments.len() => {
                    return is_token_object(obj);
                }
                Some(Value::Object(obj)) => current = obj,
                _ => return false,
            }
        }
        false
    }

    /// Walk the tree and return every token in order of first appearance.
    pub fn tokens(&self) -> Result<Vec<(TokenPath, TokenDefinition)>, SourceError> {
        let mut out = Vec::new();
        walk_tokens(&self.root, &TokenPath::default(), &mut out)?;
        Ok(out)
    }
}

fn merge_object(
    target: &mut Map<String, Value>,
    source: Map<String, Value>,
    path: &TokenPath,
    inside_token: bool,
    collisions: &mut Vec<TokenPath>,
) {
    for (key, value) in source {
        let child = path.child(&key);
        let existing_is_object = matches!(target.get(&key), Some(Value::Object(_)));
        match value {
            Value::Object(incoming) if existing_is_object => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    let is_token = inside_token || is_token_object(existing);
                    // nested `{"value": ..}` objects (dark overrides) are not tokens
                    if !inside_token && is_token && is_token_object(&incoming) {
                        collisions.push(child.clone());
                    }
                    merge_object(existing, incoming, &child, is_token, collisions);
                }
            }
            value => {
                // insert keeps the original position when the key exists
                target.insert(key, value);
            }
        }
    }
}

fn collect_token_paths(obj: &Map<String, Value>, path: &TokenPath, out: &mut Vec<TokenPath>) {
    for (key, value) in obj {
        if let Value::Object(child) = value {
            let child_path = path.child(key);
            if is_token_object(child) {
                out.push(child_path);
            } else {
                collect_token_paths(child, &child_path, out);
            }
        }
    }
}

fn walk_tokens(
    obj: &Map<String, Value>,
    path: &TokenPath,
    out: &mut Vec<(TokenPath, TokenDefinition)>,
) -> Result<(), SourceError> {
    for (key, value) in obj {
        // group-level metadata ($type, $description, ...)
        if key.starts_with('$') {
            continue;
        }
        let Value::Object(child) = value else {
            continue;
        };
        let child_path = path.child(key);
        if is_token_object(child) {
            let def = TokenDefinition::from_object(child).map_err(|message| {
                SourceError::InvalidToken { path: child_path.clone(), message }
            })?;
            out.push((child_path, def));
        } else {
            walk_tokens(child, &child_path, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    fn names(tree: &TokenTree) -> Vec<String> {
        tree.tokens().unwrap().into_iter().map(|(p, _)| p.to_string()).collect()
    }

    #[test]
    fn test_tokens_in_declaration_order() {
        let mut tree = TokenTree::new();
        tree.merge(
            obj(json!({
                "color": {
                    "zebra": {"value": "#000"},
                    "apple": {"value": "#fff"}
                },
                "size": {"base": {"value": 4}}
            })),
            Path::new("base.json"),
        );

        assert_eq!(names(&tree), vec!["color.zebra", "color.apple", "size.base"]);
    }

    #[test]
    fn test_merge_overrides_keep_position() {
        let mut tree = TokenTree::new();
        tree.merge(
            obj(json!({"color": {"a": {"value": "1"}, "b": {"value": "2"}}})),
            Path::new("one.json"),
        );
        let collisions = tree.merge(
            obj(json!({"color": {"a": {"value": "override"}, "c": {"value": "3"}}})),
            Path::new("two.json"),
        );

        assert_eq!(collisions, vec![TokenPath::parse("color.a")]);
        let tokens = tree.tokens().unwrap();
        assert_eq!(names(&tree), vec!["color.a", "color.b", "color.c"]);
        assert_eq!(tokens[0].1.value, json!("override"));
        assert_eq!(tree.origin(&TokenPath::parse("color.a")), Some(Path::new("two.json")));
        assert_eq!(tree.origin(&TokenPath::parse("color.b")), Some(Path::new("one.json")));
    }

    #[test]
    fn test_redefined_token_with_object_dark_collides_once() {
        let token = json!({"color": {"bg": {"value": "#fff", "dark": {"value": "#000"}}}});
        let mut tree = TokenTree::new();
        tree.merge(obj(token.clone()), Path::new("a.json"));
        let collisions = tree.merge(obj(token), Path::new("b.json"));

        assert_eq!(collisions, vec![TokenPath::parse("color.bg")]);
    }

    #[test]
    fn test_merge_is_deep_for_token_objects() {
        let mut tree = TokenTree::new();
        tree.merge(obj(json!({"bg": {"value": "#fff", "dark": "#000"}})), Path::new("a.json"));
        tree.merge(obj(json!({"bg": {"value": "#eee"}})), Path::new("b.json"));

        let tokens = tree.tokens().unwrap();
        assert_eq!(tokens[0].1.value, json!("#eee"));
        assert_eq!(tokens[0].1.dark, Some(json!("#000")));
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut base = TokenTree::new();
        base.merge(obj(json!({"bg": {"value": "#fff"}})), Path::new("base.json"));

        let mut themed = base.clone();
        themed.merge(obj(json!({"bg": {"value": "#123"}, "extra": {"value": 1}})), Path::new("t.json"));

        assert_eq!(base.tokens().unwrap()[0].1.value, json!("#fff"));
        assert!(!base.contains_token(&TokenPath::parse("extra")));
        assert!(themed.contains_token(&TokenPath::parse("extra")));
    }

    #[test]
    fn test_contains_token() {
        let mut tree = TokenTree::new();
        tree.merge(obj(json!({"color": {"red": {"value": "#f00"}}})), Path::new("a.json"));

        assert!(tree.contains_token(&TokenPath::parse("color.red")));
        assert!(!tree.contains_token(&TokenPath::parse("color")));
        assert!(!tree.contains_token(&TokenPath::parse("color.blue")));
        assert!(!tree.contains_token(&TokenPath::parse("color.red.value")));
    }

    #[test]
    fn test_group_metadata_skipped() {
        let mut tree = TokenTree::new();
        tree.merge(
            obj(json!({"color": {"$type": "color", "$description": "x", "red": {"$value": "#f00"}}})),
            Path::new("a.json"),
        );
        assert_eq!(names(&tree), vec!["color.red"]);
    }

    #[test]
    fn test_invalid_token_reports_path() {
        let mut tree = TokenTree::new();
        tree.merge(obj(json!({"a": {"b": {"value": 1, "type": 3}}})), Path::new("a.json"));
        let err = tree.tokens().unwrap_err();
        assert!(matches!(err, SourceError::InvalidToken { ref path, .. } if path.to_string() == "a.b"));
    }

    #[test]
    fn test_load_json_and_json5() {
        let temp = TempDir::new().unwrap();
        let json_path = temp.path().join("a.json");
        fs::write(&json_path, r#"{"x": {"value": 1}}"#).unwrap();
        let json5_path = temp.path().join("b.json5");
        let mut f = fs::File::create(&json5_path).unwrap();
        f.write_all(b"{ // comment\n y: { value: 'two', }, }").unwrap();

        let mut tree = TokenTree::new();
        tree.merge_file(&json_path).unwrap();
        tree.merge_file(&json5_path).unwrap();
        assert_eq!(names(&tree), vec!["x", "y"]);
    }

    #[test]
    fn test_load_malformed_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_source_file(&path).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_load_non_object_root() {
        let err = parse_source(Path::new("list.json"), "[1, 2]").unwrap_err();
        assert!(matches!(err, SourceError::NotAnObject { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_source_file(Path::new("/nonexistent/tokens.json")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn test_is_token_file() {
        assert!(is_token_file(Path::new("a/b.json")));
        assert!(is_token_file(Path::new("b.json5")));
        assert!(!is_token_file(Path::new("b.toml")));
        assert!(!is_token_file(Path::new("README")));
    }
}
