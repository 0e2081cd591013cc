use std::collections::HashMap;

use super::params::{ParamValue, ParameterMap};

/// Upper-case the first character, leave the rest untouched
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `<scope><Arg>`: pure, no counters
pub fn allocate(scope: &str, argument: &str) -> String {
    format!("{}{}", scope, capitalize_first(argument))
}

/// Where a field's parameters are named from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamScope {
    /// Preferred scope, e.g. the response alias or the enclosing row variable
    pub scope: String,
    /// Fully qualified scope used when the preferred name is taken by another field
    pub fallback: Option<String>,
    /// Response path of the owning field, e.g. `person.age`
    pub owner: String,
}

impl ParamScope {
    pub fn new(scope: impl Into<String>, owner: impl Into<String>) -> Self {
        ParamScope {
            scope: scope.into(),
            fallback: None,
            owner: owner.into(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Per-statement parameter naming and the resulting flat parameter map.
///
/// Names are claimed by the response path that owns them. A second owner asking for the same
/// name gets the name built from its fallback scope instead, then the `_`-joined response path
/// (`person_score_mult`). Should an alias already produce that too, the path name is suffixed
/// in claim order (`person_score_mult_2`).
#[derive(Debug, Default)]
pub struct ParameterNamer {
    claims: HashMap<String, String>,
    parameters: ParameterMap,
}

impl ParameterNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, scope: &ParamScope, argument: &str) -> String {
        let preferred = allocate(&scope.scope, argument);
        if self.try_claim(&preferred, &scope.owner) {
            log::trace!("Allocated parameter `{}` for `{}`", preferred, scope.owner);
            return preferred;
        }

        let path_name = format!("{}_{}", scope.owner.replace('.', "_"), argument);
        let qualified = scope
            .fallback
            .iter()
            .map(|fallback| allocate(fallback, argument))
            .chain(std::iter::once(path_name.clone()))
            .chain((2..).map(|n| format!("{}_{}", path_name, n)))
            .find(|candidate| self.try_claim(candidate, &scope.owner))
            .unwrap_or_default();
        log::warn!(
            "Parameter name `{}` already used, `{}` falls back to `{}`",
            preferred,
            scope.owner,
            qualified
        );
        qualified
    }

    fn try_claim(&mut self, name: &str, owner: &str) -> bool {
        match self.claims.get(name) {
            Some(existing) => existing == owner,
            None => {
                self.claims.insert(name.to_string(), owner.to_string());
                true
            }
        }
    }

    /// Record the value of a claimed parameter
    pub fn bind(&mut self, name: String, value: ParamValue) {
        self.parameters.insert(name, value);
    }

    pub fn into_parameters(self) -> ParameterMap {
        self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate() {
        assert_eq!(allocate("p3", "name"), "p3Name");
        assert_eq!(allocate("person", "mult"), "personMult");
        assert_eq!(allocate("renamed", "mult"), "renamedMult");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_same_owner_gets_same_name() {
        let mut namer = ParameterNamer::new();
        let scope = ParamScope::new("person", "person.age");
        assert_eq!(namer.claim(&scope, "mult"), "personMult");
        assert_eq!(namer.claim(&scope, "mult"), "personMult");
    }

    #[test]
    fn test_collision_falls_back_to_qualified_scope() {
        let mut namer = ParameterNamer::new();
        let age = ParamScope::new("person", "person.age").with_fallback("personAge");
        let height = ParamScope::new("person", "person.height").with_fallback("personHeight");
        assert_eq!(namer.claim(&age, "mult"), "personMult");
        assert_eq!(namer.claim(&height, "mult"), "personHeightMult");
    }

    #[test]
    fn test_collision_without_fallback_uses_path() {
        let mut namer = ParameterNamer::new();
        assert_eq!(
            namer.claim(&ParamScope::new("person", "person"), "first"),
            "personFirst"
        );
        assert_eq!(
            namer.claim(&ParamScope::new("person", "person.friends"), "first"),
            "person_friends_first"
        );
    }

    #[test]
    fn test_fallback_taken_by_alias() {
        // `personScore: age` then `age` then `score`, all declaring `mult`
        let mut namer = ParameterNamer::new();
        let aliased = ParamScope::new("personScore", "person.personScore")
            .with_fallback("personPersonScore");
        let age = ParamScope::new("person", "person.age").with_fallback("personAge");
        let score = ParamScope::new("person", "person.score").with_fallback("personScore");
        assert_eq!(namer.claim(&aliased, "mult"), "personScoreMult");
        assert_eq!(namer.claim(&age, "mult"), "personMult");
        assert_eq!(namer.claim(&score, "mult"), "person_score_mult");
    }

    #[test]
    fn test_path_name_taken_gets_suffix() {
        let mut namer = ParameterNamer::new();
        let first = ParamScope::new("person", "person.age");
        let underscored = ParamScope::new("person_score", "person.height");
        let score = ParamScope::new("person", "person.score");
        assert_eq!(namer.claim(&first, "mult"), "personMult");
        assert_eq!(namer.claim(&underscored, "_mult"), "person_score_mult");
        assert_eq!(namer.claim(&score, "mult"), "person_score_mult_2");
        assert_eq!(namer.claim(&score, "mult"), "person_score_mult_2");
    }

    #[test]
    fn test_only_bound_names_reach_parameter_map() {
        let mut namer = ParameterNamer::new();
        let scope = ParamScope::new("p", "p");
        let name = namer.claim(&scope, "filter");
        namer.claim(&scope, "unused");
        namer.bind(name, ParamValue::Int(1));
        let parameters = namer.into_parameters();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters["pFilter"], ParamValue::Int(1));
    }
}
