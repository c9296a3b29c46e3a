//! Mapping of BoardGameGeek XML API2 payloads onto typed records.
//!
//! Only the parts of the documents we depend on are read: `<items>` root,
//! `<item id>` children, `<name type value>`, `value` attributes on the numeric
//! elements, `<description>` text and `<link type value>` entries.

use anyhow::{anyhow, Context};
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_GAME_NAME: &str = "Unknown Game";

const CATEGORY_LINK: &str = "boardgamecategory";
const MECHANIC_LINK: &str = "boardgamemechanic";
const PUBLISHER_LINK: &str = "boardgamepublisher";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub bgg_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub bgg_id: i64,
    pub name: String,
    pub year_published: Option<i32>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub playing_time: Option<i32>,
    pub min_age: Option<i32>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub mechanics: Vec<String>,
    pub publisher: Option<String>,
}

/// Parses a `/search` response. An empty or missing item list is not an error.
pub fn parse_search(body: &str) -> Result<Vec<SearchRecord>, anyhow::Error> {
    let doc = Document::parse(body).context("search response is not well-formed XML")?;
    let root = items_root(&doc)?;

    root.children()
        .filter(|n| n.has_tag_name("item"))
        .map(|item| {
            Ok(SearchRecord {
                bgg_id: item_id(&item)?,
                name: extract_name(&item),
                year_published: value_of(&item, "yearpublished"),
            })
        })
        .collect()
}

/// Parses a `/thing` response. `Ok(None)` means the provider knows no such item.
pub fn parse_details(body: &str, bgg_id: i64) -> Result<Option<DetailRecord>, anyhow::Error> {
    let doc = Document::parse(body).context("thing response is not well-formed XML")?;
    let root = items_root(&doc)?;

    let Some(item) = root.children().find(|n| n.has_tag_name("item")) else {
        return Ok(None);
    };

    Ok(Some(DetailRecord {
        bgg_id,
        name: extract_name(&item),
        year_published: value_of(&item, "yearpublished"),
        min_players: value_of(&item, "minplayers"),
        max_players: value_of(&item, "maxplayers"),
        playing_time: value_of(&item, "playingtime"),
        min_age: value_of(&item, "minage"),
        description: child(&item, "description")
            .and_then(|n| n.text())
            .map(str::to_string),
        categories: links(&item, CATEGORY_LINK),
        mechanics: links(&item, MECHANIC_LINK),
        publisher: links(&item, PUBLISHER_LINK).into_iter().next(),
    }))
}

fn items_root<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>, anyhow::Error> {
    let root = doc.root_element();
    if root.has_tag_name("items") {
        Ok(root)
    } else {
        Err(anyhow!(
            "expected <items> root element, found <{}>",
            root.tag_name().name()
        ))
    }
}

fn item_id(item: &Node) -> Result<i64, anyhow::Error> {
    let raw = item
        .attribute("id")
        .ok_or_else(|| anyhow!("<item> without id attribute"))?;
    raw.trim()
        .parse()
        .with_context(|| format!("<item> id '{}' is not an integer", raw))
}

/// Primary name if one is flagged, otherwise the first, otherwise the sentinel.
pub(crate) fn extract_name(item: &Node) -> String {
    let names: Vec<Node> = item.children().filter(|n| n.has_tag_name("name")).collect();

    names
        .iter()
        .find(|n| n.attribute("type") == Some("primary"))
        .or_else(|| names.first())
        .and_then(|n| n.attribute("value"))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_GAME_NAME.to_string())
}

fn child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

/// Integer `value` attribute of a child element; absent when missing or unparseable.
fn value_of(node: &Node, tag: &str) -> Option<i32> {
    child(node, tag)
        .and_then(|n| n.attribute("value"))
        .and_then(|v| v.trim().parse().ok())
}

fn links(item: &Node, link_type: &str) -> Vec<String> {
    item.children()
        .filter(|n| n.has_tag_name("link") && n.attribute("type") == Some(link_type))
        .filter_map(|n| n.attribute("value").map(str::to_string))
        .collect()
}
