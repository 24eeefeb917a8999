use std::fmt;

/// Boolean operator joining a term to the terms before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if token.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    /// Lowercase form used in the site's `bln-base-*` parameters
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// One term of a boolean query with the operator that precedes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryToken {
    pub value: String,
    pub operator: BoolOp,
}

/// Splits a boolean search string into terms and operators
///
/// Whitespace-delimited tokens equal to `AND`/`OR` (any case) close the term
/// being accumulated under the operator seen before it, then become the
/// operator for the next term. Other tokens are space-joined into the
/// current term. The first term carries the default `AND`, which is never
/// emitted.
///
/// # Examples
///
/// ```
/// use newsbank_scraper::query::{tokenize_query, BoolOp};
///
/// let tokens = tokenize_query("rent control OR tenant");
/// assert_eq!(tokens[0].value, "rent control");
/// assert_eq!(tokens[1].operator, BoolOp::Or);
/// ```
pub fn tokenize_query(query: &str) -> Vec<QueryToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut operator = BoolOp::And;

    for part in query.split_whitespace() {
        if let Some(op) = BoolOp::from_token(part) {
            if !current.is_empty() {
                tokens.push(QueryToken {
                    value: std::mem::take(&mut current),
                    operator,
                });
            }
            operator = op;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(part);
        }
    }

    if !current.is_empty() {
        tokens.push(QueryToken {
            value: current,
            operator,
        });
    }

    tokens
}
