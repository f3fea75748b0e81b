use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tantivy::{doc, Index, IndexWriter};
use tracing::info;

use quarry_core::traits::DocumentIndexer;
use quarry_core::types::NormalizedDocument;

use crate::tantivy_utils::{build_schema, register_tokenizer, CONTENT_FIELD, DOCNO_FIELD};

const WRITER_HEAP_BYTES: usize = 50_000_000;

pub struct TantivyIndexer {
	index: Index,
	index_dir: PathBuf,
	docno_field: tantivy::schema::Field,
	content_field: tantivy::schema::Field,
	show_progress: bool,
}

impl TantivyIndexer {
	/// Create a fresh index at `index_dir`, deleting whatever was there.
	pub fn create(index_dir: &Path) -> Result<Self> {
		let schema = build_schema();
		if index_dir.exists() { std::fs::remove_dir_all(index_dir).with_context(|| format!("removing {}", index_dir.display()))?; }
		std::fs::create_dir_all(index_dir).with_context(|| format!("creating {}", index_dir.display()))?;
		let index = Index::create_in_dir(index_dir, schema.clone())?;
		register_tokenizer(&index);
		let docno_field = schema.get_field(DOCNO_FIELD)?;
		let content_field = schema.get_field(CONTENT_FIELD)?;
		Ok(Self { index, index_dir: index_dir.to_path_buf(), docno_field, content_field, show_progress: false })
	}

	/// Draw a progress bar on stderr while writing.
	pub fn with_progress(mut self, show: bool) -> Self { self.show_progress = show; self }

	fn progress_bar(&self, len: usize) -> ProgressBar {
		if !self.show_progress { return ProgressBar::hidden(); }
		let pb = ProgressBar::new(len as u64);
		if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} docs ({percent}%)") {
			pb.set_style(style.progress_chars("#>-"));
		}
		pb
	}
}

impl DocumentIndexer for TantivyIndexer {
    fn index_documents(&mut self, docs: &[NormalizedDocument]) -> Result<usize> {
        let mut index_writer: IndexWriter = self.index.writer(WRITER_HEAP_BYTES)?;
        let pb = self.progress_bar(docs.len());
        for d in docs {
            index_writer.add_document(doc!(
                self.docno_field => d.doc_id.clone(),
                self.content_field => d.content.clone(),
            ))?;
            pb.inc(1);
        }
        index_writer.commit()?;
        pb.finish_and_clear();
        info!(documents = docs.len(), index_dir = %self.index_dir.display(), "index committed");
        Ok(docs.len())
    }
}
