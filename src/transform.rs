//! Token transforms
//!
//! Transforms run once per token, in configured order, before references are
//! resolved. Value transforms apply to the `dark` override as well.

use crate::reference::contains_reference;
use crate::token::{Token, FONT_TYPE};
use serde_json::Value;
use thiserror::Error;

/// Names of the built-in transforms, in `css` group order.
pub const CSS_TRANSFORM_GROUP: &[&str] =
    &["attribute/cti", "name/kebab", "size/rem", "color/css", "fontFamily/css", "asset/url"];

/// Error building a transform chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("Unknown transform '{0}'. Available: {}", CSS_TRANSFORM_GROUP.join(", "))]
    Unknown(String),
}

/// Options shared by all transforms.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Prefix for generated names
    pub prefix: Option<String>,
}

/// A named token transform.
pub trait Transform: Send + Sync {
    /// Registry name, e.g. `name/kebab`.
    fn name(&self) -> &'static str;

    /// Whether the transform applies to `token`.
    fn matches(&self, _token: &Token) -> bool {
        true
    }

    /// Apply the transform in place.
    fn apply(&self, token: &mut Token, options: &TransformOptions);
}

/// Apply `f` to the value and the dark override. `None` leaves a value as is.
fn map_values(token: &mut Token, f: impl Fn(&Value) -> Option<Value>) {
    if let Some(v) = f(&token.value) {
        token.value = v;
    }
    if let Some(dark) = token.dark.as_ref().and_then(&f) {
        token.dark = Some(dark);
    }
}

/// `attribute/cti`: category/type/item attributes from the path.
pub struct AttributeCti;

impl Transform for AttributeCti {
    fn name(&self) -> &'static str {
        "attribute/cti"
    }

    fn apply(&self, token: &mut Token, _options: &TransformOptions) {
        let path = token.path.clone();
        let seg = |i: usize| path.segment(i).map(str::to_string);
        token.attributes.category = seg(0);
        token.attributes.kind = seg(1);
        token.attributes.item = seg(2);
        token.attributes.subitem = seg(3);
        token.attributes.state = seg(4);
    }
}

/// `name/kebab`: kebab-case name with optional prefix.
pub struct NameKebab;

impl Transform for NameKebab {
    fn name(&self) -> &'static str {
        "name/kebab"
    }

    fn apply(&self, token: &mut Token, options: &TransformOptions) {
        token.name = token.path.to_kebab(options.prefix.as_deref());
    }
}

/// `size/rem`: unitless numbers on size tokens become `rem`.
pub struct SizeRem;

impl Transform for SizeRem {
    fn name(&self) -> &'static str {
        "size/rem"
    }

    fn matches(&self, token: &Token) -> bool {
        matches!(token.effective_type(), Some("dimension") | Some("size") | Some("spacing"))
    }

    fn apply(&self, token: &mut Token, _options: &TransformOptions) {
        map_values(token, |v| match v {
            Value::Number(n) if n.as_f64() == Some(0.0) => Some(Value::String("0".to_string())),
            Value::Number(n) => Some(Value::String(format!("{}rem", n))),
            _ => None,
        });
    }
}

/// `color/css`: normalize hex colors to lowercase long form.
pub struct ColorCss;

impl ColorCss {
    fn normalize(hex: &str) -> Option<String> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let digits = digits.to_ascii_lowercase();
        match digits.len() {
            3 | 4 => Some(format!("#{}", digits.chars().flat_map(|c| [c, c]).collect::<String>())),
            6 | 8 => Some(format!("#{}", digits)),
            _ => None,
        }
    }
}

impl Transform for ColorCss {
    fn name(&self) -> &'static str {
        "color/css"
    }

    fn matches(&self, token: &Token) -> bool {
        token.effective_type() == Some("color")
    }

    fn apply(&self, token: &mut Token, _options: &TransformOptions) {
        map_values(token, |v| v.as_str().and_then(Self::normalize).map(Value::String));
    }
}

/// `fontFamily/css`: font stacks as CSS lists, quoting names with spaces.
pub struct FontFamilyCss;

impl Transform for FontFamilyCss {
    fn name(&self) -> &'static str {
        "fontFamily/css"
    }

    fn matches(&self, token: &Token) -> bool {
        matches!(token.effective_type(), Some("fontFamily") | Some("fontFamilies"))
    }

    fn apply(&self, token: &mut Token, _options: &TransformOptions) {
        map_values(token, |v| {
            let families = v.as_array()?;
            let rendered: Vec<String> = families
                .iter()
                .map(|f| match f.as_str() {
                    Some(name) if name.contains(' ') && !name.starts_with(['"', '\'']) => {
                        format!("\"{}\"", name)
                    }
                    Some(name) => name.to_string(),
                    None => f.to_string(),
                })
                .collect();
            Some(Value::String(rendered.join(", ")))
        });
    }
}

/// `asset/url`: non-font asset paths wrapped in `url("...")`.
pub struct AssetUrl;

impl Transform for AssetUrl {
    fn name(&self) -> &'static str {
        "asset/url"
    }

    fn matches(&self, token: &Token) -> bool {
        token.is_asset() && token.token_type.as_deref() != Some(FONT_TYPE)
    }

    fn apply(&self, token: &mut Token, _options: &TransformOptions) {
        map_values(token, |v| {
            let s = v.as_str()?;
            if s.starts_with("url(") || contains_reference(s) {
                return None;
            }
            Some(Value::String(format!("url(\"{}\")", s)))
        });
    }
}

/// Look up a built-in transform by name.
pub fn builtin(name: &str) -> Option<Box<dyn Transform>> {
    let transform: Box<dyn Transform> = match name {
        "attribute/cti" => Box::new(AttributeCti),
        "name/kebab" => Box::new(NameKebab),
        "size/rem" => Box::new(SizeRem),
        "color/css" => Box::new(ColorCss),
        "fontFamily/css" => Box::new(FontFamilyCss),
        "asset/url" => Box::new(AssetUrl),
        _ => return None,
    };
    Some(transform)
}

/// Ordered list of transforms applied to every token.
pub struct TransformChain {
    transforms: Vec<Box<dyn Transform>>,
    options: TransformOptions,
}

impl TransformChain {
    /// Build a chain from registry names.
    pub fn from_names<S: AsRef<str>>(
        names: &[S],
        options: TransformOptions,
    ) -> Result<Self, TransformError> {
        let transforms = names
            .iter()
            .map(|n| builtin(n.as_ref()).ok_or_else(|| TransformError::Unknown(n.as_ref().to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { transforms, options })
    }

    /// The default `css` transform group.
    pub fn css(options: TransformOptions) -> Self {
        let transforms = CSS_TRANSFORM_GROUP.iter().filter_map(|n| builtin(n)).collect();
        Self { transforms, options }
    }

    /// Names of the transforms in this chain.
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Run every matching transform on `token`.
    pub fn apply(&self, token: &mut Token) {
        for transform in &self.transforms {
            if transform.matches(token) {
                transform.apply(token, &self.options);
            }
        }
    }
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformChain")
            .field("transforms", &self.names())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenDefinition, TokenPath};
    use serde_json::{json, Map};

    fn token(path: &str, def: Value) -> Token {
        let map: Map<String, Value> = match def {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        };
        Token::new(TokenPath::parse(path), TokenDefinition::from_object(&map).unwrap())
    }

    fn css_chain() -> TransformChain {
        TransformChain::css(TransformOptions::default())
    }

    #[test]
    fn test_attribute_cti() {
        let mut t = token("color.background.button.primary.hover", json!({"value": "#fff"}));
        css_chain().apply(&mut t);
        assert_eq!(t.attributes.category.as_deref(), Some("color"));
        assert_eq!(t.attributes.kind.as_deref(), Some("background"));
        assert_eq!(t.attributes.item.as_deref(), Some("button"));
        assert_eq!(t.attributes.subitem.as_deref(), Some("primary"));
        assert_eq!(t.attributes.state.as_deref(), Some("hover"));
    }

    #[test]
    fn test_name_kebab_with_prefix() {
        let chain = TransformChain::from_names(
            &["name/kebab"],
            TransformOptions { prefix: Some("ds".to_string()) },
        )
        .unwrap();
        let mut t = token("color.textPrimary", json!({"value": "#fff"}));
        chain.apply(&mut t);
        assert_eq!(t.name, "ds-color-text-primary");
    }

    #[test]
    fn test_size_rem() {
        let mut t = token("size.padding.small", json!({"value": 0.5}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("0.5rem"));

        let mut t = token("spacing.none", json!({"value": 0}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("0"));

        let mut t = token("size.border", json!({"value": "1px"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("1px"));
    }

    #[test]
    fn test_size_rem_by_declared_type() {
        let mut t = token("layout.gutter", json!({"value": 2, "type": "dimension"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("2rem"));

        // Not a size token: numbers are left alone
        let mut t = token("opacity.disabled", json!({"value": 0.4}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!(0.4));
    }

    #[test]
    fn test_color_css_normalizes_hex_and_dark() {
        let mut t = token("color.bg", json!({"value": "#FFF", "dark": "#1A2B3C"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("#ffffff"));
        assert_eq!(t.dark, Some(json!("#1a2b3c")));
        // original keeps the authored value
        assert_eq!(t.original.value, json!("#FFF"));
    }

    #[test]
    fn test_color_css_leaves_other_values() {
        let mut t = token("color.bg", json!({"value": "{color.base.white}", "dark": "rgb(0 0 0)"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("{color.base.white}"));
        assert_eq!(t.dark, Some(json!("rgb(0 0 0)")));

        let mut t = token("color.bad", json!({"value": "#GGG"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("#GGG"));
    }

    #[test]
    fn test_font_family_css() {
        let mut t = token(
            "typography.body",
            json!({"value": ["Inter", "Helvetica Neue", "sans-serif"], "type": "fontFamily"}),
        );
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("Inter, \"Helvetica Neue\", sans-serif"));
    }

    #[test]
    fn test_asset_url() {
        let mut t = token("asset.image.logo", json!({"value": "img/logo.svg"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("url(\"img/logo.svg\")"));

        let mut t = token("asset.image.ref", json!({"value": "{asset.image.logo}"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("{asset.image.logo}"));
    }

    #[test]
    fn test_asset_url_skips_fonts() {
        let mut t = token("asset.font.inter.400.normal", json!({"value": "fonts/Inter", "type": "font"}));
        css_chain().apply(&mut t);
        assert_eq!(t.value, json!("fonts/Inter"));
    }

    #[test]
    fn test_unknown_transform() {
        let err = TransformChain::from_names(&["name/snake"], TransformOptions::default()).unwrap_err();
        assert_eq!(err, TransformError::Unknown("name/snake".to_string()));
    }

    #[test]
    fn test_chain_names() {
        assert_eq!(css_chain().names(), CSS_TRANSFORM_GROUP.to_vec());
    }
}
