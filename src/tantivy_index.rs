use tantivy::{
    Index,
    IndexReader,
    IndexWriter,
    ReloadPolicy,
    TantivyDocument,
    Term,
    collector::TopDocs,
    doc,
    query::BooleanQuery,
    schema::*,
    tokenizer::{
        LowerCaser,
        RemoveLongFilter,
        SimpleTokenizer,
        TextAnalyzer,
        TokenStream,
    },
};

use crate::{entry_id::EntryId, error::Result};

/// Field names used in the schema.
pub mod fields {
    pub const ENTRY_ID: &str = "entry_id";
    pub const TEXT: &str = "text";
}

const CAPTION_TOKENIZER: &str = "caption";

/// Writer heap size. Tantivy refuses anything below 15MB.
pub const WRITER_MEMORY_BUDGET: usize = 15_000_000;

/// In-memory Tantivy index holding one document per caption line.
pub struct CaptionIndex {
    index: Index,
    reader: IndexReader,
    fields: SchemaFields,
}

/// Resolved field handles for the schema.
#[derive(Clone, Copy)]
struct SchemaFields {
    entry_id: Field,
    text: Field,
}

/// A line-level match.
#[derive(Debug, Clone)]
pub struct Hit {
    pub score: f32,
    /// Raw `caption_id:line` key as stored.
    pub entry_id: String,
}

fn build_schema() -> (Schema, SchemaFields) {
    let mut builder = Schema::builder();

    let entry_id = builder.add_text_field(fields::ENTRY_ID, STRING | STORED);

    let text_opts = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(CAPTION_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    let text = builder.add_text_field(fields::TEXT, text_opts);

    let schema = builder.build();
    let fields = SchemaFields { entry_id, text };

    (schema, fields)
}

fn register_tokenizers(index: &Index) {
    let caption = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(CAPTION_TOKENIZER, caption);
}

impl CaptionIndex {
    /// Create an empty in-memory index.
    pub fn open_in_ram() -> Result<Self> {
        let (schema, fields) = build_schema();
        let index = Index::create_in_ram(schema);
        register_tokenizers(&index);
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            fields,
        })
    }

    /// Create a writer with the given memory budget (in bytes).
    pub fn writer(&self, memory_budget: usize) -> Result<IndexWriter> {
        Ok(self.index.writer(memory_budget)?)
    }

    /// Stage one caption line on the writer. Nothing is visible until the
    /// writer commits and [`CaptionIndex::reload`] runs.
    pub fn add_entry(
        &self,
        writer: &IndexWriter,
        entry: &EntryId,
        text: &str,
    ) -> Result<()> {
        let f = self.fields;
        writer.add_document(doc!(
            f.entry_id => entry.to_string(),
            f.text => text,
        ))?;
        Ok(())
    }

    /// Make the latest commit visible to searches.
    pub fn reload(&self) -> Result<()> {
        Ok(self.reader.reload()?)
    }

    /// Number of line entries visible to searches.
    pub fn num_entries(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Run a match query: the text is analyzed with the caption tokenizer
    /// and any resulting term may match. No query syntax is interpreted.
    ///
    /// Returns at most `limit` hits, best first.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<Hit>> {
        let f = self.fields;

        let mut terms = Vec::new();
        {
            let mut analyzer = self.index.tokenizer_for_field(f.text)?;
            let mut stream = analyzer.token_stream(query_str);
            stream.process(&mut |token| {
                terms.push(Term::from_field_text(f.text, &token.text));
            });
        }

        if terms.is_empty() || limit == 0 {
            return Ok(vec![]);
        }

        let query = BooleanQuery::new_multiterms_query(terms);
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            hits.push(Hit {
                score,
                entry_id: extract_text(&doc, f.entry_id),
            });
        }

        Ok(hits)
    }
}

impl std::fmt::Debug for CaptionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionIndex").finish_non_exhaustive()
    }
}

fn extract_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
