use std::fmt;

/// Root operation kind of an executable definition
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
        }
    }
}

/// A parsed executable document. Only operation definitions are kept.
#[derive(Debug, PartialEq, Clone)]
pub struct Document<'a> {
    pub operations: Vec<Operation<'a>>,
}

impl<'a> Document<'a> {
    /// Pick the operation to run.
    ///
    /// With a name, the operation carrying that name. Without one, the document must hold
    /// exactly one operation.
    pub fn operation(&self, name: Option<&str>) -> Option<&Operation<'a>> {
        match name {
            Some(name) => self.operations.iter().find(|op| op.name == Some(name)),
            None if self.operations.len() == 1 => self.operations.first(),
            None => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Operation<'a> {
    pub kind: OperationKind,
    pub name: Option<&'a str>,
    pub variable_definitions: Vec<VariableDefinition<'a>>,
    pub selection_set: Vec<FieldSelection<'a>>,
}

impl<'a> Operation<'a> {
    /// Anonymous query with no variables, the shape of `{ ... }` shorthand documents
    pub fn query(selection_set: Vec<FieldSelection<'a>>) -> Self {
        Operation {
            kind: OperationKind::Query,
            name: None,
            variable_definitions: vec![],
            selection_set,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDefinition<'a>> {
        self.variable_definitions.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct VariableDefinition<'a> {
    pub name: &'a str,
    pub var_type: TypeRef,
    pub default_value: Option<ArgValue>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FieldSelection<'a> {
    pub name: &'a str,
    pub alias: Option<&'a str>,
    /// Arguments in query-text order
    pub arguments: Vec<(&'a str, ArgValue)>,
    pub directives: Vec<Directive<'a>>,
    pub selection_set: Vec<FieldSelection<'a>>,
}

impl<'a> FieldSelection<'a> {
    /// Leaf selection without alias, arguments or directives
    pub fn leaf(name: &'a str) -> Self {
        FieldSelection {
            name,
            alias: None,
            arguments: vec![],
            directives: vec![],
            selection_set: vec![],
        }
    }

    pub fn with_alias(mut self, alias: &'a str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn with_argument(mut self, name: &'a str, value: ArgValue) -> Self {
        self.arguments.push((name, value));
        self
    }

    pub fn with_selection(mut self, selection_set: Vec<FieldSelection<'a>>) -> Self {
        self.selection_set = selection_set;
        self
    }

    /// Key under which the field appears in the response: alias if given, else the name
    pub fn response_key(&self) -> &'a str {
        self.alias.unwrap_or(self.name)
    }

    pub fn argument(&self, name: &str) -> Option<&ArgValue> {
        self.arguments
            .iter()
            .find(|(arg_name, _)| *arg_name == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Directive<'a> {
    pub name: &'a str,
    pub arguments: Vec<(&'a str, ArgValue)>,
}

impl Directive<'_> {
    pub fn argument(&self, name: &str) -> Option<&ArgValue> {
        self.arguments
            .iter()
            .find(|(arg_name, _)| *arg_name == name)
            .map(|(_, value)| value)
    }
}

/// Argument value as written in a query or as a schema default
#[derive(Debug, PartialEq, Clone)]
pub enum ArgValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<ArgValue>),
    /// Input object literal, fields in written order
    Object(Vec<(String, ArgValue)>),
    Variable(String),
}

impl ArgValue {
    pub fn contains_variable(&self) -> bool {
        match self {
            ArgValue::Variable(_) => true,
            ArgValue::List(items) => items.iter().any(ArgValue::contains_variable),
            ArgValue::Object(fields) => fields.iter().any(|(_, v)| v.contains_variable()),
            _ => false,
        }
    }

    /// Short kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArgValue::Null => "null",
            ArgValue::Int(_) => "Int",
            ArgValue::Float(_) => "Float",
            ArgValue::String(_) => "String",
            ArgValue::Boolean(_) => "Boolean",
            ArgValue::Enum(_) => "enum value",
            ArgValue::List(_) => "list",
            ArgValue::Object(_) => "input object",
            ArgValue::Variable(_) => "variable",
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Null => write!(f, "null"),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Float(x) => write!(f, "{:?}", x),
            ArgValue::String(s) => write!(f, "{:?}", s),
            ArgValue::Boolean(b) => write!(f, "{}", b),
            ArgValue::Enum(e) => write!(f, "{}", e),
            ArgValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ArgValue::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            ArgValue::Variable(name) => write!(f, "${}", name),
        }
    }
}

/// Declared GraphQL type with list and non-null wrapping
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Innermost named type, e.g. `Person` for `[Person!]!`
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Type with an outer non-null marker removed
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Whether values of this type are lists (multi-value cardinality)
    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), TypeRef::List(_))
    }

    pub fn list_depth(&self) -> usize {
        match self {
            TypeRef::Named(_) => 0,
            TypeRef::NonNull(inner) => inner.list_depth(),
            TypeRef::List(inner) => 1 + inner.list_depth(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}
