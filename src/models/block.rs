//! Nodes of the document-analysis graph.
//!
//! Blocks are immutable inputs: a TABLE owns CELLs, a CELL owns WORDs.
//! Only the parent-owns-children edges are materialized in `children`.

use serde::{Deserialize, Serialize};

/// Block kinds the table pipeline cares about; everything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Table,
    Cell,
    Word,
    Other(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Table => "TABLE",
            Self::Cell => "CELL",
            Self::Word => "WORD",
            Self::Other(name) => name.as_str(),
        }
    }

    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "TABLE" => Self::Table,
            "CELL" => Self::Cell,
            "WORD" => Self::Word,
            _ => Self::Other(name.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<BlockType> for String {
    fn from(kind: BlockType) -> Self {
        kind.as_str().to_string()
    }
}

/// Declared extent of a TABLE block, in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSpan {
    pub row_span: usize,
    pub column_span: usize,
}

impl TableSpan {
    /// A span is usable only when both dimensions are non-zero.
    pub fn is_usable(&self) -> bool {
        self.row_span > 0 && self.column_span > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TableSpan>,
}

impl Block {
    pub fn new(id: &str, block_type: BlockType) -> Self {
        Self {
            id: id.to_string(),
            block_type,
            row_index: None,
            column_index: None,
            text: None,
            children: Vec::new(),
            span: None,
        }
    }

    /// A TABLE block owning the given cell ids, without a declared span.
    pub fn table(id: &str, cells: &[&str]) -> Self {
        let mut block = Self::new(id, BlockType::Table);
        block.children = cells.iter().map(|c| c.to_string()).collect();
        block
    }

    /// A CELL block at 1-based `(row, column)` owning the given word ids.
    pub fn cell(id: &str, row: usize, column: usize, words: &[&str]) -> Self {
        let mut block = Self::new(id, BlockType::Cell);
        block.row_index = Some(row);
        block.column_index = Some(column);
        block.children = words.iter().map(|w| w.to_string()).collect();
        block
    }

    pub fn word(id: &str, text: &str) -> Self {
        let mut block = Self::new(id, BlockType::Word);
        block.text = Some(text.to_string());
        block
    }

    pub fn with_span(mut self, row_span: usize, column_span: usize) -> Self {
        self.span = Some(TableSpan {
            row_span,
            column_span,
        });
        self
    }

    /// 1-based row index; absent indices default to 1.
    pub fn row(&self) -> usize {
        self.row_index.unwrap_or(1)
    }

    /// 1-based column index; absent indices default to 1.
    pub fn column(&self) -> usize {
        self.column_index.unwrap_or(1)
    }

    pub fn is_type(&self, kind: &BlockType) -> bool {
        &self.block_type == kind
    }
}
