use tantivy::schema::{Schema, TextFieldIndexing, TextOptions, IndexRecordOption, STRING, STORED};
use tantivy::tokenizer::{TextAnalyzer, SimpleTokenizer, LowerCaser, StopWordFilter};
use tantivy::Index;

pub const DOCNO_FIELD: &str = "docno";
pub const CONTENT_FIELD: &str = "content";
pub const CONTENT_TOKENIZER: &str = "content_with_stopwords";

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	let _docno_field = schema_builder.add_text_field(DOCNO_FIELD, STRING | STORED);
	let content_indexing = TextFieldIndexing::default().set_tokenizer(CONTENT_TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let content_options = TextOptions::default().set_indexing_options(content_indexing).set_stored();
	let _content_field = schema_builder.add_text_field(CONTENT_FIELD, content_options);
	schema_builder.build()
}

/// Must be called on every opened `Index` before parsing or writing, since
/// tokenizers are not persisted with the index.
pub fn register_tokenizer(index: &Index) {
	let stop_words = vec![
		"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
	];
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
		.build();
	index.tokenizers().register(CONTENT_TOKENIZER, tokenizer);
}
