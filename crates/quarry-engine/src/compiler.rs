//! Turns a classified query into provider expressions.

use quarry_core::types::{BooleanExpression, ClassifiedQuery, Connector, QueryShape};

/// One or two expressions compiled from a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    /// AND form for decomposed shapes; the raw text for free queries.
    pub strict: BooleanExpression,
    /// OR form over the same atoms, only for phrase/mixed queries.
    pub relaxed: Option<BooleanExpression>,
}

impl CompiledQuery {
    pub fn expressions(&self) -> impl Iterator<Item = &BooleanExpression> {
        std::iter::once(&self.strict).chain(self.relaxed.as_ref())
    }
}

/// `None` when decomposition left nothing to search for.
pub fn compile(query: &ClassifiedQuery) -> Option<CompiledQuery> {
    match query.shape {
        // Free queries carry no matched quote pair; stray quotes are
        // whitespace, as they were for classification.
        QueryShape::Free => Some(CompiledQuery {
            strict: BooleanExpression::Native(query.raw.replace('"', " ")),
            relaxed: None,
        }),
        QueryShape::Hyphen => {
            let atom = query.atoms.first()?.clone();
            Some(CompiledQuery {
                strict: BooleanExpression::joined(vec![atom], Connector::And),
                relaxed: None,
            })
        }
        QueryShape::PhraseMixed => {
            if query.atoms.is_empty() {
                return None;
            }
            Some(CompiledQuery {
                strict: BooleanExpression::joined(query.atoms.clone(), Connector::And),
                relaxed: Some(BooleanExpression::joined(query.atoms.clone(), Connector::Or)),
            })
        }
    }
}
