// src/api/parser.rs
//! Turns Notion API bodies into domain values.
//!
//! Parsing is forgiving: missing or mistyped
//! fields become empty strings, `false` or empty sequences. Only a body that
//! is not JSON at all, or an error response, fails.

use super::client::ApiResponse;
use super::types::{NotionApiErrorResponse, PaginatedResponse};
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, UNTITLED_PAGE};
use crate::error::{AppError, NotionErrorCode};
use crate::model::*;
use crate::types::{Annotations, BlockId, DataSourceId, DatabaseId, PageId, RichTextItem, RichTextType};
use serde::Deserialize;
use serde_json::Value;

/// Parses a raw response into JSON, or into the matching [`AppError`].
pub fn parse_api_response(result: ApiResponse<String>) -> Result<Value, AppError> {
    if result.status.is_success() {
        return serde_json::from_str(&result.data).map_err(|e| {
            log::error!("Failed to parse response from {}: {}", result.url, e);
            AppError::MalformedResponse(format!("{} (body: {})", e, preview(&result.data)))
        });
    }

    let status = result.status.as_u16();
    match serde_json::from_str::<NotionApiErrorResponse>(&result.data) {
        Ok(body) => Err(AppError::NotionService {
            code: NotionErrorCode::from_api_response(&body.code),
            message: body.message,
            status: body.status.unwrap_or(status),
        }),
        Err(_) => Err(AppError::NotionService {
            code: NotionErrorCode::from_http_status(status),
            message: format!("HTTP {} from {}: {}", status, result.url, preview(&result.data)),
            status,
        }),
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

pub fn parse_blocks_page(body: Value) -> Result<PaginatedResponse<Block>, AppError> {
    let page: PaginatedResponse<Value> = serde_json::from_value(body)?;
    Ok(page.map(|value| parse_block(&value)))
}

pub fn parse_pages_page(body: Value) -> Result<PaginatedResponse<PageInfo>, AppError> {
    let page: PaginatedResponse<Value> = serde_json::from_value(body)?;
    Ok(page.map(|value| parse_page(&value)))
}

pub fn parse_page(value: &Value) -> PageInfo {
    PageInfo {
        id: PageId::from_raw(str_field(value, "id")),
        title: page_title(&value["properties"]),
        url: str_field(value, "url").to_string(),
    }
}

pub fn parse_database(value: &Value) -> DatabaseInfo {
    let data_sources = value["data_sources"]
        .as_array()
        .map(|sources| {
            sources
                .iter()
                .map(|source| DataSourceRef {
                    id: DataSourceId::from_raw(str_field(source, "id")),
                    name: str_field(source, "name").to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    DatabaseInfo {
        id: DatabaseId::from_raw(str_field(value, "id")),
        title: plain_text_of(&value["title"]),
        data_sources,
    }
}

/// Resolves a page title from its properties.
///
/// Conventional property names win, then any property of type `title`.
pub fn page_title(properties: &Value) -> String {
    const CONVENTIONAL_NAMES: [&str; 4] = ["title", "Title", "Name", "name"];

    let by_name = CONVENTIONAL_NAMES
        .iter()
        .map(|name| plain_text_of(&properties[*name]["title"]))
        .find(|title| !title.is_empty());
    if let Some(title) = by_name {
        return title;
    }

    properties
        .as_object()
        .into_iter()
        .flat_map(|props| props.values())
        .filter(|prop| prop["type"] == "title")
        .map(|prop| plain_text_of(&prop["title"]))
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED_PAGE.to_string())
}

/// Builds a block from its JSON. Never fails: unknown or malformed
/// payloads yield empty content or [`Block::Unsupported`].
pub fn parse_block(value: &Value) -> Block {
    let common = BlockCommon {
        id: BlockId::from_raw(str_field(value, "id")),
        has_children: value["has_children"].as_bool().unwrap_or(false),
        archived: value["archived"].as_bool().unwrap_or(false),
    };
    let block_type = value["type"].as_str().unwrap_or("unsupported");
    let payload = &value[block_type];
    let text = || TextBlockContent::new(parse_rich_text(&payload["rich_text"]));

    match block_type {
        "paragraph" => Block::Paragraph(ParagraphBlock {
            common,
            content: text(),
        }),
        "heading_1" | "heading_2" | "heading_3" => Block::Heading(HeadingBlock {
            common,
            content: text(),
            level: block_type.as_bytes()[block_type.len() - 1] - b'0',
        }),
        "bulleted_list_item" => Block::BulletedListItem(ListItemBlock {
            common,
            content: text(),
        }),
        "numbered_list_item" => Block::NumberedListItem(ListItemBlock {
            common,
            content: text(),
        }),
        "to_do" => Block::ToDo(ToDoBlock {
            common,
            content: text(),
            checked: payload["checked"].as_bool().unwrap_or(false),
        }),
        "toggle" => Block::Toggle(ToggleBlock {
            common,
            content: text(),
        }),
        "quote" => Block::Quote(QuoteBlock {
            common,
            content: text(),
        }),
        "callout" => Block::Callout(CalloutBlock {
            common,
            content: text(),
            icon: payload["icon"]["emoji"].as_str().map(str::to_string),
        }),
        "code" => Block::Code(CodeBlock {
            common,
            language: str_field(payload, "language").to_string(),
            rich_text: parse_rich_text(&payload["rich_text"]),
            caption: parse_rich_text(&payload["caption"]),
        }),
        "equation" => Block::Equation(EquationBlock {
            common,
            expression: str_field(payload, "expression").to_string(),
        }),
        "divider" => Block::Divider(DividerBlock { common }),
        "image" => Block::Image(linked_media(common, payload)),
        "bookmark" => Block::Bookmark(linked_media(common, payload)),
        "embed" => Block::Embed(linked_media(common, payload)),
        "link_preview" => Block::LinkPreview(linked_media(common, payload)),
        "child_page" => Block::ChildPage(ChildPageBlock {
            common,
            title: str_field(payload, "title").to_string(),
        }),
        "child_database" => Block::ChildDatabase(ChildDatabaseBlock {
            common,
            title: str_field(payload, "title").to_string(),
        }),
        "table" => Block::Table(TableBlock {
            common,
            table_width: payload["table_width"].as_u64().unwrap_or(0) as usize,
            has_column_header: payload["has_column_header"].as_bool().unwrap_or(false),
            has_row_header: payload["has_row_header"].as_bool().unwrap_or(false),
        }),
        "table_row" => Block::TableRow(TableRowBlock {
            common,
            cells: payload["cells"]
                .as_array()
                .map(|cells| cells.iter().map(parse_rich_text).collect())
                .unwrap_or_default(),
        }),
        "column_list" => Block::ColumnList(ContainerBlock { common }),
        "column" => Block::Column(ContainerBlock { common }),
        "synced_block" => Block::Synced(ContainerBlock { common }),
        other => Block::Unsupported(UnsupportedBlock {
            common,
            block_type: other.to_string(),
        }),
    }
}

/// Media payloads keep their URL under `external.url`, `file.url` or `url`.
fn linked_media(common: BlockCommon, payload: &Value) -> LinkedMediaBlock {
    let url = payload["url"]
        .as_str()
        .or_else(|| payload["external"]["url"].as_str())
        .or_else(|| payload["file"]["url"].as_str())
        .unwrap_or_default()
        .to_string();
    LinkedMediaBlock {
        common,
        url,
        caption: parse_rich_text(&payload["caption"]),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireRichText {
    #[serde(rename = "type")]
    kind: String,
    text: Option<WireText>,
    equation: Option<WireEquation>,
    mention: Option<WireMention>,
    annotations: Annotations,
    plain_text: String,
    href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireText {
    content: String,
    link: Option<WireLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireLink {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireEquation {
    expression: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireMention {
    #[serde(rename = "type")]
    kind: String,
}

impl From<WireRichText> for RichTextItem {
    fn from(wire: WireRichText) -> Self {
        let text_type = match wire.kind.as_str() {
            "equation" => RichTextType::Equation {
                expression: wire.equation.map(|e| e.expression).unwrap_or_default(),
            },
            "mention" => RichTextType::Mention {
                kind: wire.mention.map(|m| m.kind).unwrap_or_default(),
            },
            _ => {
                let text = wire.text.unwrap_or_default();
                RichTextType::Text {
                    content: text.content,
                    link: text.link.map(|l| l.url).filter(|url| !url.is_empty()),
                }
            }
        };
        RichTextItem {
            text_type,
            annotations: wire.annotations,
            plain_text: wire.plain_text,
            href: wire.href,
        }
    }
}

/// Parses a rich-text array. Items that fail to deserialize are skipped.
pub fn parse_rich_text(value: &Value) -> Vec<RichTextItem> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match WireRichText::deserialize(item) {
            Ok(wire) => Some(RichTextItem::from(wire)),
            Err(e) => {
                log::debug!("Skipping malformed rich text item: {}", e);
                None
            }
        })
        .collect()
}

fn plain_text_of(value: &Value) -> String {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["plain_text"].as_str())
                .collect()
        })
        .unwrap_or_default()
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    fn response(status: u16, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            url: "https://api.notion.com/v1/blocks/x/children".to_string(),
        }
    }

    #[test]
    fn error_body_becomes_typed_service_error() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find block"}"#;
        match parse_api_response(response(404, body)) {
            Err(AppError::NotionService {
                code,
                status,
                message,
            }) => {
                assert_eq!(code, NotionErrorCode::ObjectNotFound);
                assert_eq!(status, 404);
                assert_eq!(message, "Could not find block");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        match parse_api_response(response(502, "<html>Bad Gateway</html>")) {
            Err(err @ AppError::NotionService { .. }) => {
                assert_eq!(err.class(), crate::error::ErrorClass::Unavailable);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn success_body_that_is_not_json_is_malformed() {
        assert!(matches!(
            parse_api_response(response(200, "not json")),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn parses_table_and_rows() {
        let table = parse_block(&json!({
            "id": "6a8b2f4e-7c1d-4e5f-9a0b-1c2d3e4f5a6b",
            "type": "table",
            "has_children": true,
            "table": {"table_width": 3, "has_column_header": true, "has_row_header": false}
        }));
        match &table {
            Block::Table(t) => {
                assert_eq!(t.table_width, 3);
                assert!(t.has_column_header);
                assert!(!t.has_row_header);
                assert!(t.common.has_children);
                assert_eq!(t.common.id.as_str(), "6a8b2f4e7c1d4e5f9a0b1c2d3e4f5a6b");
            }
            other => panic!("expected table, got {:?}", other),
        }

        let row = parse_block(&json!({
            "id": "r1",
            "type": "table_row",
            "table_row": {"cells": [
                [{"type": "text", "text": {"content": "a"}, "plain_text": "a"}],
                []
            ]}
        }));
        match row {
            Block::TableRow(r) => {
                assert_eq!(r.cells.len(), 2);
                assert_eq!(r.cells[0][0].content(), "a");
                assert!(r.cells[1].is_empty());
            }
            other => panic!("expected row, got {:?}", other),
        }
    }

    #[test]
    fn missing_payload_degrades_to_empty_content() {
        let block = parse_block(&json!({"id": "b1", "type": "code"}));
        match block {
            Block::Code(code) => {
                assert_eq!(code.language, "");
                assert!(code.rich_text.is_empty());
            }
            other => panic!("expected code, got {:?}", other),
        }
    }

    #[test]
    fn unknown_types_are_kept_as_unsupported() {
        let block = parse_block(&json!({"id": "b1", "type": "meeting_notes"}));
        assert_eq!(block.block_type(), "meeting_notes");
        assert!(matches!(block, Block::Unsupported(_)));
    }

    #[test]
    fn rich_text_variants_and_annotations() {
        let runs = parse_rich_text(&json!([
            {
                "type": "text",
                "text": {"content": "docs", "link": {"url": "/0f3a"}},
                "annotations": {"bold": true, "italic": false, "strikethrough": false,
                                "underline": false, "code": false, "color": "red_background"},
                "plain_text": "docs",
                "href": "/0f3a"
            },
            {"type": "equation", "equation": {"expression": "x^2"}, "plain_text": "x^2"},
            {"type": "mention", "mention": {"type": "user"}, "plain_text": "@Ada"},
            "garbage"
        ]));

        assert_eq!(runs.len(), 3);
        assert!(runs[0].annotations.bold);
        assert_eq!(runs[0].link(), Some("/0f3a"));
        assert_eq!(runs[1].content(), "x^2");
        assert_eq!(runs[2].content(), "@Ada");
    }

    #[test]
    fn title_lookup_order() {
        let props = json!({
            "Status": {"type": "select"},
            "Task": {"type": "title", "title": [{"plain_text": "Ship "}, {"plain_text": "it"}]}
        });
        assert_eq!(page_title(&props), "Ship it");

        let props = json!({"Name": {"type": "title", "title": [{"plain_text": "Named"}]}});
        assert_eq!(page_title(&props), "Named");

        assert_eq!(page_title(&json!({})), "Untitled");
    }

    #[test]
    fn database_lists_its_data_sources() {
        let db = parse_database(&json!({
            "id": "d1",
            "title": [{"plain_text": "Roadmap"}],
            "data_sources": [{"id": "ds1", "name": "Roadmap"}]
        }));
        assert_eq!(db.title, "Roadmap");
        assert_eq!(db.data_sources.len(), 1);
        assert_eq!(db.data_sources[0].id.as_str(), "ds1");
    }
}
