//! Cypher render IR.
//!
//! Translation builds these nodes and only turns them into text at the very end via
//! [`ToCypher`]. Parameters are explicit [`CypherExpr::Parameter`] nodes, so the set of
//! parameters a statement references can be read off the tree instead of the text.

use std::collections::BTreeSet;

use crate::schema_catalog::RelationDirection;

pub trait ToCypher {
    fn to_cypher(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CypherLiteral {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl ToCypher for CypherLiteral {
    fn to_cypher(&self) -> String {
        match self {
            CypherLiteral::Null => "null".to_string(),
            CypherLiteral::Integer(i) => i.to_string(),
            CypherLiteral::Float(f) => format!("{:?}", f),
            CypherLiteral::Boolean(b) => b.to_string(),
            CypherLiteral::String(s) => quote_string(s),
        }
    }
}

/// Single-quoted Cypher string literal. Only `\` and `'` are escaped.
pub fn quote_string(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('\'');
    for c in raw.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

#[derive(Debug, Clone, PartialEq)]
pub enum CypherExpr {
    Variable(String),
    Property {
        variable: String,
        key: String,
    },
    /// `$name`
    Parameter(String),
    Literal(CypherLiteral),
    /// `{k:v,k:v}`
    MapLiteral(Vec<(String, CypherExpr)>),
    /// `[a,b]`
    ListLiteral(Vec<CypherExpr>),
    /// Procedure or function invocation, `name(a,b)`
    Call {
        name: String,
        arguments: Vec<CypherExpr>,
    },
    /// `var { .a, b:expr }`
    MapProjection {
        variable: String,
        items: Vec<ProjectionItem>,
    },
    /// `[(row)-[:REL]->(child:Label) WHERE p | projection]`
    PatternComprehension {
        pattern: RelationshipPattern,
        predicates: Vec<CypherExpr>,
        projection: Box<CypherExpr>,
    },
    /// `[var IN source | projection]`
    ListComprehension {
        variable: String,
        source: Box<CypherExpr>,
        projection: Box<CypherExpr>,
    },
    /// `expr[start..end]`, either bound may be open
    Slice {
        expr: Box<CypherExpr>,
        start: Option<Box<CypherExpr>>,
        end: Option<Box<CypherExpr>>,
    },
    Equals(Box<CypherExpr>, Box<CypherExpr>),
    Add(Box<CypherExpr>, Box<CypherExpr>),
}

impl CypherExpr {
    pub fn variable(name: impl Into<String>) -> Self {
        CypherExpr::Variable(name.into())
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        CypherExpr::Parameter(name.into())
    }

    pub fn property(variable: impl Into<String>, key: impl Into<String>) -> Self {
        CypherExpr::Property {
            variable: variable.into(),
            key: key.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        CypherExpr::Literal(CypherLiteral::String(value.into()))
    }

    pub fn call(name: impl Into<String>, arguments: Vec<CypherExpr>) -> Self {
        CypherExpr::Call {
            name: name.into(),
            arguments,
        }
    }

    /// `head(expr)`, first element of a list or null
    pub fn head(expr: CypherExpr) -> Self {
        CypherExpr::call("head", vec![expr])
    }

    pub fn equals(left: CypherExpr, right: CypherExpr) -> Self {
        CypherExpr::Equals(Box::new(left), Box::new(right))
    }

    /// Collect the names of every parameter referenced below this node
    pub fn collect_parameters(&self, names: &mut BTreeSet<String>) {
        match self {
            CypherExpr::Parameter(name) => {
                names.insert(name.clone());
            }
            CypherExpr::Variable(_) | CypherExpr::Property { .. } | CypherExpr::Literal(_) => {}
            CypherExpr::MapLiteral(entries) => {
                for (_, value) in entries {
                    value.collect_parameters(names);
                }
            }
            CypherExpr::ListLiteral(items) => {
                for item in items {
                    item.collect_parameters(names);
                }
            }
            CypherExpr::Call { arguments, .. } => {
                for argument in arguments {
                    argument.collect_parameters(names);
                }
            }
            CypherExpr::MapProjection { items, .. } => {
                for item in items {
                    if let ProjectionItem::Entry { value, .. } = item {
                        value.collect_parameters(names);
                    }
                }
            }
            CypherExpr::PatternComprehension {
                predicates,
                projection,
                ..
            } => {
                for predicate in predicates {
                    predicate.collect_parameters(names);
                }
                projection.collect_parameters(names);
            }
            CypherExpr::ListComprehension {
                source, projection, ..
            } => {
                source.collect_parameters(names);
                projection.collect_parameters(names);
            }
            CypherExpr::Slice { expr, start, end } => {
                expr.collect_parameters(names);
                for bound in [start, end].into_iter().flatten() {
                    bound.collect_parameters(names);
                }
            }
            CypherExpr::Equals(left, right) | CypherExpr::Add(left, right) => {
                left.collect_parameters(names);
                right.collect_parameters(names);
            }
        }
    }
}

fn join_exprs(exprs: &[CypherExpr], separator: &str) -> String {
    exprs
        .iter()
        .map(ToCypher::to_cypher)
        .collect::<Vec<_>>()
        .join(separator)
}

fn where_suffix(predicates: &[CypherExpr]) -> String {
    if predicates.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", join_exprs(predicates, " AND "))
    }
}

impl ToCypher for CypherExpr {
    fn to_cypher(&self) -> String {
        match self {
            CypherExpr::Variable(name) => name.clone(),
            CypherExpr::Property { variable, key } => format!("{}.{}", variable, key),
            CypherExpr::Parameter(name) => format!("${}", name),
            CypherExpr::Literal(literal) => literal.to_cypher(),
            CypherExpr::MapLiteral(entries) => {
                let body = entries
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value.to_cypher()))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{{{}}}", body)
            }
            CypherExpr::ListLiteral(items) => format!("[{}]", join_exprs(items, ",")),
            CypherExpr::Call { name, arguments } => {
                format!("{}({})", name, join_exprs(arguments, ","))
            }
            CypherExpr::MapProjection { variable, items } => {
                if items.is_empty() {
                    return format!("{} {{}}", variable);
                }
                let body = items
                    .iter()
                    .map(ToCypher::to_cypher)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} {{ {} }}", variable, body)
            }
            CypherExpr::PatternComprehension {
                pattern,
                predicates,
                projection,
            } => format!(
                "[{}{} | {}]",
                pattern.to_cypher(),
                where_suffix(predicates),
                projection.to_cypher()
            ),
            CypherExpr::ListComprehension {
                variable,
                source,
                projection,
            } => format!(
                "[{} IN {} | {}]",
                variable,
                source.to_cypher(),
                projection.to_cypher()
            ),
            CypherExpr::Slice { expr, start, end } => format!(
                "{}[{}..{}]",
                expr.to_cypher(),
                start.as_ref().map(|s| s.to_cypher()).unwrap_or_default(),
                end.as_ref().map(|e| e.to_cypher()).unwrap_or_default()
            ),
            CypherExpr::Equals(left, right) => {
                format!("{} = {}", left.to_cypher(), right.to_cypher())
            }
            CypherExpr::Add(left, right) => {
                format!("{} + {}", left.to_cypher(), right.to_cypher())
            }
        }
    }
}

/// One entry of a map projection
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionItem {
    /// `.key`
    Shorthand(String),
    /// `key:value`
    Entry { key: String, value: CypherExpr },
}

impl ToCypher for ProjectionItem {
    fn to_cypher(&self) -> String {
        match self {
            ProjectionItem::Shorthand(key) => format!(".{}", key),
            ProjectionItem::Entry { key, value } => format!("{}:{}", key, value.to_cypher()),
        }
    }
}

/// `(from)-[:NAME]->(to:Label)`; without a relationship type the hop is `--`
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub from: String,
    pub relationship: Option<(String, RelationDirection)>,
    pub to: String,
    pub to_label: String,
}

impl ToCypher for RelationshipPattern {
    fn to_cypher(&self) -> String {
        let hop = match &self.relationship {
            None => "--".to_string(),
            Some((name, RelationDirection::Out)) => format!("-[:{}]->", name),
            Some((name, RelationDirection::In)) => format!("<-[:{}]-", name),
            Some((name, RelationDirection::Both)) => format!("-[:{}]-", name),
        };
        format!("({}){}({}:{})", self.from, hop, self.to, self.to_label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Match {
        variable: String,
        label: String,
        predicates: Vec<CypherExpr>,
    },
    Unwind {
        expr: CypherExpr,
        alias: String,
    },
    Return {
        expr: CypherExpr,
        alias: String,
    },
    Skip(CypherExpr),
    Limit(CypherExpr),
}

impl Clause {
    fn collect_parameters(&self, names: &mut BTreeSet<String>) {
        match self {
            Clause::Match { predicates, .. } => {
                for predicate in predicates {
                    predicate.collect_parameters(names);
                }
            }
            Clause::Unwind { expr, .. } | Clause::Return { expr, .. } => {
                expr.collect_parameters(names)
            }
            Clause::Skip(expr) | Clause::Limit(expr) => expr.collect_parameters(names),
        }
    }
}

impl ToCypher for Clause {
    fn to_cypher(&self) -> String {
        match self {
            Clause::Match {
                variable,
                label,
                predicates,
            } => format!("MATCH ({}:{}){}", variable, label, where_suffix(predicates)),
            Clause::Unwind { expr, alias } => format!("UNWIND {} AS {}", expr.to_cypher(), alias),
            Clause::Return { expr, alias } => format!("RETURN {} AS {}", expr.to_cypher(), alias),
            Clause::Skip(expr) => format!("SKIP {}", expr.to_cypher()),
            Clause::Limit(expr) => format!("LIMIT {}", expr.to_cypher()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CypherStatement {
    pub clauses: Vec<Clause>,
}

impl CypherStatement {
    pub fn new(clauses: Vec<Clause>) -> Self {
        CypherStatement { clauses }
    }

    /// Names of all parameters the rendered statement references
    pub fn parameter_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for clause in &self.clauses {
            clause.collect_parameters(&mut names);
        }
        names
    }
}

impl ToCypher for CypherStatement {
    fn to_cypher(&self) -> String {
        self.clauses
            .iter()
            .map(ToCypher::to_cypher)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
