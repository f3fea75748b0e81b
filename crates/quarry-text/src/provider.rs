use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, PhraseQuery, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, TantivyDocument, Term};
use tracing::{debug, warn};

use quarry_core::error::ProviderError;
use quarry_core::traits::SearchProvider;
use quarry_core::types::{BooleanExpression, Connector, Hit, QueryAtom};

use crate::tantivy_utils::{register_tokenizer, CONTENT_FIELD, CONTENT_TOKENIZER, DOCNO_FIELD};

/// Read-only handle on an existing index. Open once and share across queries.
pub struct TantivyProvider {
	index: Index,
	reader: IndexReader,
	docno_field: Field,
	content_field: Field,
	conjunction_by_default: bool,
}

fn unavailable(e: impl std::fmt::Display) -> ProviderError {
	ProviderError::IndexUnavailable(e.to_string())
}

impl TantivyProvider {
	pub fn open(index_dir: &Path) -> Result<Self, ProviderError> {
		if !index_dir.is_dir() {
			return Err(ProviderError::IndexUnavailable(format!("index directory {} does not exist", index_dir.display())));
		}
		let index = Index::open_in_dir(index_dir).map_err(unavailable)?;
		register_tokenizer(&index);
		let reader = index.reader().map_err(unavailable)?;
		let schema = index.schema();
		let docno_field = schema.get_field(DOCNO_FIELD).map_err(unavailable)?;
		let content_field = schema.get_field(CONTENT_FIELD).map_err(unavailable)?;
		Ok(Self { index, reader, docno_field, content_field, conjunction_by_default: true })
	}

	/// Whether bare terms in native queries are joined with AND (default) or OR.
	pub fn with_conjunction_by_default(mut self, and: bool) -> Self { self.conjunction_by_default = and; self }

	fn default_occur(&self) -> Occur {
		if self.conjunction_by_default { Occur::Must } else { Occur::Should }
	}

	/// Raw user text through tantivy's own query syntax. Text the parser
	/// rejects is searched as its plain words instead.
	fn parse_native(&self, raw: &str) -> Result<Option<Box<dyn Query>>, ProviderError> {
		let mut qp = QueryParser::for_index(&self.index, vec![self.content_field]);
		if self.conjunction_by_default { qp.set_conjunction_by_default(); }
		match qp.parse_query(raw) {
			Ok(query) => Ok(Some(query)),
			Err(e) => {
				warn!(query = raw, error = %e, "query syntax rejected; searching its words");
				let clauses = self.analyze(raw)?
					.into_iter()
					.map(|(_, term)| (self.default_occur(), Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)) as Box<dyn Query>))
					.collect();
				Ok(combine(clauses))
			}
		}
	}

	/// Tokens of `text` under the content analyzer, with their positions.
	fn analyze(&self, text: &str) -> Result<Vec<(usize, Term)>, ProviderError> {
		let mut analyzer = self.index.tokenizers().get(CONTENT_TOKENIZER)
			.ok_or_else(|| unavailable(format!("tokenizer {CONTENT_TOKENIZER} is not registered")))?;
		let mut stream = analyzer.token_stream(text);
		let mut terms = Vec::new();
		while stream.advance() {
			let token = stream.token();
			terms.push((token.position, Term::from_field_text(self.content_field, &token.text)));
		}
		Ok(terms)
	}

	/// One term or phrase query per atom, built from analyzed tokens so no
	/// character in the atom text is read as query syntax. Atoms that analyze
	/// to nothing (stop words, punctuation) are dropped.
	fn build_joined(&self, atoms: &[QueryAtom], connector: Connector) -> Result<Option<Box<dyn Query>>, ProviderError> {
		let occur = match connector { Connector::And => Occur::Must, Connector::Or => Occur::Should };
		let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(atoms.len());
		for atom in atoms {
			let mut terms = self.analyze(atom.text())?;
			let clause: Box<dyn Query> = match terms.len() {
				0 => continue,
				1 => {
					let (_, term) = terms.remove(0);
					Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs))
				}
				_ => {
					let first = terms[0].0;
					let offsets = terms.into_iter().map(|(pos, term)| (pos - first, term)).collect();
					Box::new(PhraseQuery::new_with_offset(offsets))
				}
			};
			clauses.push((occur, clause));
		}
		Ok(combine(clauses))
	}

	fn to_hit(&self, doc: &TantivyDocument, score: f32) -> Option<Hit> {
		let doc_id = doc.get_first(self.docno_field).and_then(|v| v.as_str())?;
		let body = doc.get_first(self.content_field).and_then(|v| v.as_str())?;
		Some(Hit { doc_id: doc_id.to_string(), score, body: body.to_string() })
	}
}

fn combine(clauses: Vec<(Occur, Box<dyn Query>)>) -> Option<Box<dyn Query>> {
	if clauses.is_empty() { return None; }
	let query: Box<dyn Query> = Box::new(BooleanQuery::new(clauses));
	Some(query)
}

impl SearchProvider for TantivyProvider {
    fn execute(&self, expression: &BooleanExpression, limit: usize) -> Result<Vec<Hit>, ProviderError> {
        if limit == 0 { return Ok(vec![]); }
        let query = match expression {
            BooleanExpression::Native(raw) => self.parse_native(raw)?,
            BooleanExpression::Joined { atoms, connector } => self.build_joined(atoms, *connector)?,
        };
        let Some(query) = query else {
            debug!(expression = %expression, "no indexable tokens; nothing to search");
            return Ok(vec![]);
        };
        debug!(expression = %expression, limit, "executing");
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(query.as_ref(), &TopDocs::with_limit(limit)).map_err(unavailable)?;
        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, addr) in top_docs {
            let doc: TantivyDocument = searcher.doc(addr).map_err(unavailable)?;
            match self.to_hit(&doc, score) {
                Some(hit) => hits.push(hit),
                None => warn!(?addr, "stored document lacks docno or content; skipped"),
            }
        }
        Ok(hits)
    }
}
