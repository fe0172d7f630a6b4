//! Localized description markup: reading translated metainfo markup and
//! writing a locale map back out in either XML style or as catalog YAML.

use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashMap};

use crate::{
    context::{Context, FormatStyle},
    dom::{Element, Node},
    error::Error,
    locale::{DEFAULT_LOCALE, is_cruft_locale},
};

/// Receives one aggregated markup string per language found in a description.
pub trait DescriptionVisitor {
    fn visit(&mut self, locale: &str, markup: &str);
}

/// Language of a translatable node: its `xml:lang`, or `"C"` when untagged.
///
/// Returns `None` when the context does not read that language.
pub fn node_locale(ctx: &Context, node: &Element) -> Option<String> {
    match node.attr("xml:lang") {
        None => Some(DEFAULT_LOCALE.to_string()),
        Some(lang) if ctx.accepts_locale(lang) => Some(lang.to_string()),
        Some(_) => None,
    }
}

/// Splits a metainfo `<description>` into per-language markup.
///
/// Paragraphs and list items carry their own `xml:lang`. All text of one
/// language is accumulated in document order, lists are re-opened for each
/// language that has items in them, and `visitor` is called once per language
/// after the whole node has been read.
pub fn parse_metainfo_description<V: DescriptionVisitor + ?Sized>(
    ctx: &Context,
    node: &Element,
    visitor: &mut V,
) -> Result<(), Error> {
    let mut desc: BTreeMap<String, String> = BTreeMap::new();

    for child in node.elements() {
        match child.name() {
            "p" => {
                let Some(lang) = node_locale(ctx, child) else {
                    continue;
                };
                let content = child.inner_markup()?;
                desc.entry(lang)
                    .or_default()
                    .push_str(&format!("<p>{}</p>\n", content));
            }
            list @ ("ul" | "ol") => {
                let mut items: BTreeMap<String, String> = BTreeMap::new();
                for item in child.elements().filter(|el| el.name() == "li") {
                    let Some(lang) = node_locale(ctx, item) else {
                        continue;
                    };
                    let content = item.inner_markup()?;
                    items
                        .entry(lang)
                        .or_default()
                        .push_str(&format!("  <li>{}</li>\n", content));
                }
                for (lang, items) in items {
                    desc.entry(lang)
                        .or_default()
                        .push_str(&format!("<{list}>\n{items}</{list}>\n"));
                }
            }
            _ => {}
        }
    }

    for (lang, markup) in &desc {
        visitor.visit(lang, markup);
    }
    Ok(())
}

/// Locales of `desc` that are written out, sorted.
fn writable_locales(desc: &HashMap<String, String>) -> Vec<&String> {
    let mut locales: Vec<_> = desc.keys().filter(|l| !is_cruft_locale(l)).collect();
    locales.sort();
    locales
}

/// Writes a locale → markup map below `parent`.
///
/// Collection style gets one `<description>` per locale, tagged with
/// `xml:lang` unless it is `"C"`. Metainfo style gets a single
/// `<description>` whose translated `p` and `li` elements carry `xml:lang`.
/// Markup that does not parse is logged and left out.
pub fn write_description_nodes(ctx: &Context, parent: &mut Element, desc: &HashMap<String, String>) {
    let mut metainfo_node: Option<Element> = None;

    for locale in writable_locales(desc) {
        let markup = &desc[locale];
        let nodes = match Element::parse_fragment(markup) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::debug!(
                    "Skipping invalid description markup for locale {} in {}: {}",
                    locale,
                    ctx.source_name(),
                    e
                );
                continue;
            }
        };
        let localized = locale != DEFAULT_LOCALE;

        match ctx.style() {
            FormatStyle::Collection => {
                let mut dnode = Element::new("description");
                if localized {
                    dnode.set_attr("xml:lang", locale.as_str());
                }
                for node in nodes {
                    dnode.push(node);
                }
                parent.add_child(dnode);
            }
            FormatStyle::Metainfo => {
                let dnode = metainfo_node.get_or_insert_with(|| Element::new("description"));
                let lang = localized.then_some(locale.as_str());
                append_tagged(dnode, nodes, lang);
            }
        }
    }

    if let Some(dnode) = metainfo_node {
        parent.add_child(dnode);
    }
}

/// Copies paragraphs and lists into `dnode`, tagging `p`/`li` with `lang`.
fn append_tagged(dnode: &mut Element, nodes: Vec<Node>, lang: Option<&str>) {
    for node in nodes {
        let Node::Element(mut el) = node else {
            continue;
        };
        match el.name() {
            "p" => {
                if let Some(lang) = lang {
                    el.set_attr("xml:lang", lang);
                }
                dnode.add_child(el);
            }
            "ul" | "ol" => {
                let list = dnode.add_child(Element::new(el.name()));
                for item in el.elements().filter(|i| i.name() == "li") {
                    let item = list.add_child(item.clone());
                    if let Some(lang) = lang {
                        item.set_attr("xml:lang", lang);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Reads a catalog localized value: a `locale: text` mapping, or a plain
/// scalar taken as the untranslated text. Locales the context does not read
/// are dropped.
pub fn localized_yaml_value(ctx: &Context, value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Mapping(map) => map
            .iter()
            .filter_map(|(k, v)| Some((scalar_to_string(k)?, scalar_to_string(v)?)))
            .filter(|(locale, _)| locale == DEFAULT_LOCALE || ctx.accepts_locale(locale))
            .collect(),
        other => scalar_to_string(other)
            .map(|text| vec![(DEFAULT_LOCALE.to_string(), text)])
            .unwrap_or_default(),
    }
}

/// Builds the catalog mapping for a localized value, or `None` when nothing is writable.
pub fn yaml_localized_entry(desc: &HashMap<String, String>) -> Option<Value> {
    let mut map = Mapping::new();
    for locale in writable_locales(desc) {
        map.insert(
            Value::String(locale.clone()),
            Value::String(desc[locale].clone()),
        );
    }
    (!map.is_empty()).then_some(Value::Mapping(map))
}

/// Text of a YAML scalar; sequences, mappings and null have none.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
