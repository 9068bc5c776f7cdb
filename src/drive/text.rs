//! Plain-text extraction from structured Google Docs bodies.
//!
//! The Docs API returns a tree of structural elements. Text lives in paragraph text runs,
//! which may be nested inside table cells. Extraction walks the tree in document order and
//! concatenates run contents; the Docs API terminates paragraphs with a trailing newline,
//! so the result is trimmed once at the end.

use serde::Deserialize;

/// Structured document payload returned by `documents.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    pub(crate) body: Option<Body>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Body {
    #[serde(default)]
    pub(crate) content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuralElement {
    paragraph: Option<Paragraph>,
    table: Option<Table>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paragraph {
    #[serde(default)]
    elements: Vec<ParagraphElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParagraphElement {
    text_run: Option<TextRun>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextRun {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Table {
    #[serde(default)]
    table_rows: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TableRow {
    #[serde(default)]
    table_cells: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableCell {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

/// Collect the full plain text of a document in reading order.
pub(crate) fn extract_text(document: &Document) -> String {
    let mut text = String::new();
    if let Some(body) = &document.body {
        for element in &body.content {
            append_element(element, &mut text);
        }
    }
    text.trim().to_string()
}

fn append_element(element: &StructuralElement, text: &mut String) {
    if let Some(paragraph) = &element.paragraph {
        for part in &paragraph.elements {
            if let Some(run) = &part.text_run
                && let Some(content) = &run.content
            {
                text.push_str(content);
            }
        }
    }

    if let Some(table) = &element.table {
        for row in &table.table_rows {
            for cell in &row.table_cells {
                for nested in &cell.content {
                    append_element(nested, text);
                }
            }
        }
    }
}
