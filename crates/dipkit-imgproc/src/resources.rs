//! Named convolution masks and structuring elements.
//!
//! The tables are embedded in the crate as JSON and parsed on first access. A replacement
//! document can be loaded at runtime with [`reload_from_str`] or [`reload_from_path`]; readers
//! holding a previous snapshot keep it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use dipkit_image::ImageError;
use serde::Deserialize;

use crate::filter::ConvolutionMask;
use crate::morphology::StructuringElement;

const EMBEDDED_MASKS: &str = include_str!("../resources/masks.json");
const EMBEDDED_ELEMENTS: &str = include_str!("../resources/structuring_elements.json");

static TABLES: RwLock<Option<Arc<ResourceTables>>> = RwLock::new(None);

type RawMasks = BTreeMap<String, Vec<Vec<i32>>>;
type RawElements = BTreeMap<String, RawElement>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    data: Vec<Vec<u8>>,
    origin_x: usize,
    origin_y: usize,
}

/// Document accepted by the reload hook. A missing section keeps the current table.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    masks: Option<RawMasks>,
    structuring_elements: Option<RawElements>,
}

/// Parsed resource tables.
#[derive(Debug, Clone, Default)]
pub struct ResourceTables {
    masks: BTreeMap<String, ConvolutionMask>,
    elements: BTreeMap<String, StructuringElement>,
}

fn parse_error(what: &str, err: serde_json::Error) -> ImageError {
    ImageError::InvalidArgument(format!("cannot parse {what}: {err}"))
}

fn build_masks(raw: RawMasks) -> Result<BTreeMap<String, ConvolutionMask>, ImageError> {
    raw.into_iter()
        .map(|(name, rows)| Ok((name, ConvolutionMask::new(rows)?)))
        .collect()
}

fn build_elements(raw: RawElements) -> Result<BTreeMap<String, StructuringElement>, ImageError> {
    raw.into_iter()
        .map(|(name, e)| {
            Ok((
                name,
                StructuringElement::new(e.data, e.origin_x, e.origin_y)?,
            ))
        })
        .collect()
}

impl ResourceTables {
    /// Parse the tables compiled into the crate.
    pub fn embedded() -> Result<Self, ImageError> {
        let masks: RawMasks =
            serde_json::from_str(EMBEDDED_MASKS).map_err(|e| parse_error("mask table", e))?;
        let elements: RawElements = serde_json::from_str(EMBEDDED_ELEMENTS)
            .map_err(|e| parse_error("structuring element table", e))?;
        Ok(Self {
            masks: build_masks(masks)?,
            elements: build_elements(elements)?,
        })
    }

    /// Build new tables from a JSON document, falling back to `self` for missing sections.
    ///
    /// The document has the shape `{"masks": {name: [[..]]}, "structuringElements":
    /// {name: {"data": [[..]], "originX": x, "originY": y}}}`.
    pub fn with_document(&self, json: &str) -> Result<Self, ImageError> {
        let doc: RawDocument =
            serde_json::from_str(json).map_err(|e| parse_error("resource document", e))?;
        Ok(Self {
            masks: match doc.masks {
                Some(raw) => build_masks(raw)?,
                None => self.masks.clone(),
            },
            elements: match doc.structuring_elements {
                Some(raw) => build_elements(raw)?,
                None => self.elements.clone(),
            },
        })
    }

    /// Look up a convolution mask.
    pub fn mask(&self, name: &str) -> Result<&ConvolutionMask, ImageError> {
        self.masks
            .get(name)
            .ok_or_else(|| ImageError::UnknownResource(format!("mask '{name}'")))
    }

    /// Look up a structuring element.
    pub fn structuring_element(&self, name: &str) -> Result<&StructuringElement, ImageError> {
        self.elements
            .get(name)
            .ok_or_else(|| ImageError::UnknownResource(format!("structuring element '{name}'")))
    }

    /// Mask names in sorted order.
    pub fn mask_names(&self) -> Vec<&str> {
        self.masks.keys().map(String::as_str).collect()
    }

    /// Structuring element names in sorted order.
    pub fn structuring_element_names(&self) -> Vec<&str> {
        self.elements.keys().map(String::as_str).collect()
    }
}

/// Snapshot of the current tables, parsing the embedded ones on first use.
pub fn tables() -> Result<Arc<ResourceTables>, ImageError> {
    if let Some(tables) = TABLES.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
        return Ok(Arc::clone(tables));
    }
    let mut guard = TABLES.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(tables) = guard.as_ref() {
        return Ok(Arc::clone(tables));
    }
    let tables = Arc::new(ResourceTables::embedded()?);
    log::debug!(
        "loaded {} masks and {} structuring elements",
        tables.masks.len(),
        tables.elements.len()
    );
    *guard = Some(Arc::clone(&tables));
    Ok(tables)
}

/// Replace the tables from a JSON document. See [`ResourceTables::with_document`].
pub fn reload_from_str(json: &str) -> Result<(), ImageError> {
    let current = tables()?;
    let next = Arc::new(current.with_document(json)?);
    *TABLES.write().unwrap_or_else(PoisonError::into_inner) = Some(next);
    log::info!("resource tables reloaded");
    Ok(())
}

/// Replace the tables from a JSON file.
pub fn reload_from_path(path: impl AsRef<Path>) -> Result<(), ImageError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        ImageError::InvalidArgument(format!("cannot read {}: {e}", path.display()))
    })?;
    reload_from_str(&json)
}

/// Look up a convolution mask in the current tables.
pub fn mask(name: &str) -> Result<ConvolutionMask, ImageError> {
    tables()?.mask(name).cloned()
}

/// Look up a structuring element in the current tables.
pub fn structuring_element(name: &str) -> Result<StructuringElement, ImageError> {
    tables()?.structuring_element(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse() -> Result<(), ImageError> {
        let tables = ResourceTables::embedded()?;
        assert_eq!(
            tables.mask_names(),
            vec!["edge1", "edge2", "edge3", "edge5", "laplace1", "laplace2"]
        );
        assert!(tables.structuring_element_names().contains(&"cross"));

        let edge1 = tables.mask("edge1")?;
        assert!(edge1.is_3x3());
        assert_eq!(edge1.weight(1, 1), 5);
        assert_eq!(tables.mask("edge5")?.rows(), 5);

        let cross = tables.structuring_element("cross")?;
        assert_eq!(cross, &StructuringElement::cross(3)?);
        let hline = tables.structuring_element("hline")?;
        assert_eq!((hline.cols(), hline.rows(), hline.origin()), (3, 1, (1, 0)));
        Ok(())
    }

    #[test]
    fn unknown_names() -> Result<(), ImageError> {
        let tables = ResourceTables::embedded()?;
        assert!(matches!(
            tables.mask("nope"),
            Err(ImageError::UnknownResource(_))
        ));
        assert!(matches!(
            tables.structuring_element("nope"),
            Err(ImageError::UnknownResource(_))
        ));
        Ok(())
    }

    #[test]
    fn document_replaces_sections() -> Result<(), ImageError> {
        let tables = ResourceTables::embedded()?;
        let next = tables.with_document(r#"{"masks": {"id": [[1]]}}"#)?;
        assert_eq!(next.mask_names(), vec!["id"]);
        assert_eq!(
            next.structuring_element_names(),
            tables.structuring_element_names()
        );

        let next = tables.with_document(
            r#"{"structuringElements": {"dot": {"data": [[1]], "originX": 0, "originY": 0}}}"#,
        )?;
        assert_eq!(next.structuring_element_names(), vec!["dot"]);
        assert_eq!(next.mask_names(), tables.mask_names());
        Ok(())
    }

    #[test]
    fn document_is_validated() -> Result<(), ImageError> {
        let tables = ResourceTables::embedded()?;
        assert!(tables.with_document("not json").is_err());
        assert!(tables.with_document(r#"{"masks": {"even": [[1, 1]]}}"#).is_err());
        assert!(tables
            .with_document(r#"{"structuringElements": {"x": {"data": [[2]], "originX": 0, "originY": 0}}}"#)
            .is_err());
        Ok(())
    }

    #[test]
    fn global_lookup() -> Result<(), ImageError> {
        assert!(mask("edge2")?.is_3x3());
        assert_eq!(structuring_element("square")?, StructuringElement::square(3)?);
        Ok(())
    }
}
