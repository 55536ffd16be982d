//! PDF read/write primitives backed by `lopdf`.
//!
//! Cropping only rewrites each page's `/MediaBox`; content streams are left
//! as they are.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use tracing::warn;

use crate::error::{CropError, Result};
use crate::models::Rectangle;

/// Number of pages in the PDF at `path`, without rendering anything.
pub fn page_count(path: &Path) -> Result<usize> {
    let doc = load(path)?;
    Ok(doc.get_pages().len())
}

fn load(path: &Path) -> Result<Document> {
    let doc = Document::load(path).map_err(|e| CropError::load(path, e.to_string()))?;
    if doc.is_encrypted() {
        return Err(CropError::Encrypted(path.to_path_buf()));
    }
    Ok(doc)
}

pub struct CropDocument {
    inner: Document,
    page_ids: Vec<ObjectId>,
}

impl CropDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let inner = load(path)?;
        let page_ids = inner.get_pages().into_values().collect();
        Ok(Self { inner, page_ids })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    pub fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(CropError::PageOutOfRange {
                page: index,
                total: self.page_ids.len(),
            })
    }

    /// The page's `/MediaBox`, inherited from the page tree if the page does
    /// not carry its own.
    pub fn media_box(&self, page_id: ObjectId) -> Result<Rectangle> {
        let obj = self
            .resolve_inherited(page_id, b"MediaBox")?
            .ok_or_else(|| CropError::pdf(format!("page {page_id:?} has no /MediaBox")))?;
        let array = self
            .dereference(obj)?
            .as_array()
            .map_err(|e| CropError::pdf(format!("/MediaBox is not an array: {e}")))?;
        if array.len() != 4 {
            return Err(CropError::pdf(format!(
                "/MediaBox has {} entries, expected 4",
                array.len()
            )));
        }

        let mut values = [0.0_f64; 4];
        for (slot, item) in values.iter_mut().zip(array) {
            let number = self
                .dereference(item)?
                .as_float()
                .map_err(|e| CropError::pdf(format!("/MediaBox entry is not a number: {e}")))?;
            *slot = f64::from(number);
        }
        let [x1, y1, x2, y2] = values;
        Ok(Rectangle::new(x1, y1, x2, y2))
    }

    /// Replaces the page's own `/MediaBox`. An inherited box on the parent
    /// is shadowed, not modified.
    pub fn set_media_box(&mut self, page_id: ObjectId, rect: &Rectangle) -> Result<()> {
        let page = self
            .inner
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)?;
        let coords = rect
            .as_array()
            .iter()
            .map(|&v| Object::Real(v as f32))
            .collect::<Vec<_>>();
        page.set("MediaBox", Object::Array(coords));
        Ok(())
    }

    /// Writes the document to `path` through a sibling temporary file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let tmp_path = temporary_sibling(path);
        let written = self.write_to(&tmp_path);
        if let Err(e) = written {
            remove_temporary(&tmp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            remove_temporary(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn write_to(&mut self, tmp_path: &Path) -> Result<()> {
        let mut file = File::create(tmp_path)?;
        self.inner.save_to(&mut file)?;
        file.sync_all()?;
        Ok(())
    }

    fn resolve_inherited(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<&Object>> {
        let mut visited = HashSet::new();
        let mut current = page_id;
        loop {
            if !visited.insert(current) {
                return Err(CropError::pdf(format!("cyclic /Parent chain at {current:?}")));
            }
            let dict = self.inner.get_object(current).and_then(Object::as_dict)?;
            if let Ok(value) = dict.get(key) {
                return Ok(Some(value));
            }
            match dict.get(b"Parent") {
                Ok(parent) => current = parent.as_reference()?,
                Err(_) => return Ok(None),
            }
        }
    }

    fn dereference<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.inner.get_object(*id)?),
            other => Ok(other),
        }
    }
}

fn remove_temporary(tmp_path: &Path) {
    if let Err(e) = fs::remove_file(tmp_path) {
        warn!(path = %tmp_path.display(), error = %e, "failed to remove temporary output");
    }
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn write_pdf(dir: &Path, pages: &[Option<[i64; 4]>], parent_box: Option<[i64; 4]>) -> PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for media_box in pages {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            };
            if let Some(b) = media_box {
                page.set("MediaBox", b.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>());
            }
            kids.push(Object::Reference(doc.add_object(page)));
        }
        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(kids.len() as i64),
            "Kids" => kids,
        };
        if let Some(b) = parent_box {
            pages_dict.set("MediaBox", b.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>());
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.join("fixture.pdf");
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn test_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[Some([0, 0, 612, 792]); 3], None);
        assert_eq!(page_count(&path).unwrap(), 3);
    }

    #[test]
    fn test_garbage_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"definitely not a pdf").unwrap();
        assert!(matches!(page_count(&path), Err(CropError::Load { .. })));
        assert!(matches!(
            page_count(&dir.path().join("missing.pdf")),
            Err(CropError::Load { .. })
        ));
    }

    #[test]
    fn test_media_box_is_inherited_from_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[None, Some([0, 0, 300, 400])], Some([0, 0, 595, 842]));
        let doc = CropDocument::open(&path).unwrap();

        let first = doc.media_box(doc.page_id(0).unwrap()).unwrap();
        assert_eq!(first.as_array(), [0.0, 0.0, 595.0, 842.0]);
        let second = doc.media_box(doc.page_id(1).unwrap()).unwrap();
        assert_eq!(second.as_array(), [0.0, 0.0, 300.0, 400.0]);
    }

    #[test]
    fn test_cyclic_parent_chain_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[None], None);
        let mut doc = CropDocument::open(&path).unwrap();
        let page_id = doc.page_id(0).unwrap();
        doc.inner
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Parent", page_id);

        assert!(matches!(doc.media_box(page_id), Err(CropError::Pdf(_))));
    }

    #[test]
    fn test_parent_loop_through_page_tree_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[None], None);
        let mut doc = CropDocument::open(&path).unwrap();
        let page_id = doc.page_id(0).unwrap();
        let pages_id = doc
            .inner
            .get_object(page_id)
            .and_then(Object::as_dict)
            .and_then(|d| d.get(b"Parent"))
            .and_then(Object::as_reference)
            .unwrap();
        doc.inner
            .get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Parent", page_id);

        assert!(matches!(doc.media_box(page_id), Err(CropError::Pdf(_))));
    }

    #[test]
    fn test_missing_media_box_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[None], None);
        let doc = CropDocument::open(&path).unwrap();
        assert!(matches!(doc.media_box(doc.page_id(0).unwrap()), Err(CropError::Pdf(_))));
    }

    #[test]
    fn test_set_media_box_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[Some([0, 0, 612, 792]); 2], None);
        let mut doc = CropDocument::open(&path).unwrap();
        let page_id = doc.page_id(1).unwrap();
        doc.set_media_box(page_id, &Rectangle::new(10.0, 20.0, 110.0, 220.0)).unwrap();

        let out = dir.path().join("out.pdf");
        doc.save(&out).unwrap();
        assert!(!dir.path().join("out.pdf.tmp").exists());

        let reread = CropDocument::open(&out).unwrap();
        let cropped = reread.media_box(reread.page_id(1).unwrap()).unwrap();
        assert_eq!(cropped.as_array(), [10.0, 20.0, 110.0, 220.0]);
        let untouched = reread.media_box(reread.page_id(0).unwrap()).unwrap();
        assert_eq!(untouched.as_array(), [0.0, 0.0, 612.0, 792.0]);
    }

    #[test]
    fn test_page_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[Some([0, 0, 612, 792])], None);
        let doc = CropDocument::open(&path).unwrap();
        assert!(matches!(
            doc.page_id(5),
            Err(CropError::PageOutOfRange { page: 5, total: 1 })
        ));
    }

    #[test]
    fn test_save_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[Some([0, 0, 612, 792])], None);
        let mut doc = CropDocument::open(&path).unwrap();
        let out = dir.path().join("no-such-dir").join("out.pdf");
        assert!(matches!(doc.save(&out), Err(CropError::Io(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_failed_rename_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[Some([0, 0, 612, 792])], None);
        let mut doc = CropDocument::open(&path).unwrap();
        let out = dir.path().join("outdir");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("keep.txt"), b"occupied").unwrap();

        assert!(matches!(doc.save(&out), Err(CropError::Io(_))));
        assert!(!dir.path().join("outdir.tmp").exists());
        assert!(out.join("keep.txt").exists());
    }
}
